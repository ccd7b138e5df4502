use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::analysis::markets::MarketConfig;
use crate::error::SimError;
use crate::model::constants::{DEFAULT_GAMES, MAX_GAMES, MIN_GAMES};

/// Run settings, read from TOML.
///
/// ```toml
/// num_games = 90000
/// seed = 42
/// transition_table = "data/baserunner_transitions.json"
///
/// [markets]
/// first_inning = true
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimConfig {
    #[serde(default = "default_num_games")]
    pub num_games: usize,

    /// Base RNG seed; drawn at random when absent.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Games per chunk between progress callbacks.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    #[serde(default)]
    pub transition_table: Option<PathBuf>,

    #[serde(default)]
    pub markets: MarketConfig,
}

fn default_num_games() -> usize {
    DEFAULT_GAMES
}
fn default_batch_size() -> usize {
    10_000
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            num_games: default_num_games(),
            seed: None,
            batch_size: default_batch_size(),
            transition_table: None,
            markets: MarketConfig::default(),
        }
    }
}

impl SimConfig {
    pub fn from_toml_str(toml_str: &str) -> Result<Self, SimError> {
        let config: SimConfig = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let toml_str = std::fs::read_to_string(path)?;
        Self::from_toml_str(&toml_str)
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if !(MIN_GAMES..MAX_GAMES).contains(&self.num_games) {
            return Err(SimError::InvalidConfig {
                reason: format!(
                    "num_games {} must be at least {MIN_GAMES} and below {MAX_GAMES}",
                    self.num_games
                ),
            });
        }
        if self.batch_size == 0 {
            return Err(SimError::InvalidConfig {
                reason: "batch_size must be positive".to_string(),
            });
        }
        self.markets.validate()
    }

    /// Configured seed, or a fresh random one.
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| fastrand::u64(..))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::props::PlayerStat;

    #[test]
    fn empty_toml_uses_defaults() {
        let config = SimConfig::from_toml_str("").unwrap();
        assert_eq!(config, SimConfig::default());
        assert_eq!(config.num_games, 90_000);
        assert_eq!(config.batch_size, 10_000);
    }

    #[test]
    fn game_count_bounds() {
        assert!(SimConfig::from_toml_str("num_games = 9999").is_err());
        assert!(SimConfig::from_toml_str("num_games = 10000").is_ok());
        assert!(SimConfig::from_toml_str("num_games = 999999").is_ok());
        assert!(SimConfig::from_toml_str("num_games = 1000000").is_err());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = SimConfig::from_toml_str("games = 5").unwrap_err();
        assert!(matches!(err, SimError::ConfigParse(_)));
    }

    #[test]
    fn markets_from_toml() {
        let config = SimConfig::from_toml_str(
            r#"
            seed = 7

            [markets]
            first_inning = false

            [[markets.sides]]
            period = { type = "first_five" }
            lines = [0.5, 1.5]

            [[markets.totals]]
            scope = "combined"
            period = { type = "inning", inning = 1 }
            lines = [0.5]

            [[markets.player_props]]
            stat = "Ks"
            lines = [5.5, 6.5]
            "#,
        )
        .unwrap();
        assert_eq!(config.seed, Some(7));
        assert!(!config.markets.first_inning);
        assert!(config.markets.scoring_order);
        assert_eq!(
            config.markets.player_lines(),
            vec![(PlayerStat::Strikeouts, vec![5.5, 6.5])]
        );
        assert_eq!(config.markets.sides[0].lines, vec![0.5, 1.5]);
        assert_eq!(config.markets.totals.len(), 1);
    }
}
