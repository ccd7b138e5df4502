//! Error type shared by the table loader, the engine and the simulation loop.

use crate::model::event::EventType;

/// Every fallible operation in the crate returns this error.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// The static transition data failed structural validation at load time.
    #[error("malformed transition table: {reason}")]
    MalformedTable {
        /// Description of the problem.
        reason: String,
    },

    /// The transition table is not valid JSON or is missing fields.
    #[error("failed to parse transition table: {0}")]
    TableParse(#[from] serde_json::Error),

    /// Reading an input file failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A simulation reached an (event, state) pair the table does not cover.
    #[error("no transitions found for {event}-{key}")]
    MissingTransition {
        /// Plate-appearance event.
        event: EventType,
        /// Base/out key, e.g. `XOO-1`.
        key: String,
    },

    /// The plate-appearance model has no probabilities for a batter/pitcher pair.
    #[error("no matchup probabilities for batter {batter} against pitcher {pitcher}")]
    MissingMatchup {
        /// Batter id.
        batter: u32,
        /// Pitcher id.
        pitcher: u32,
    },

    /// A player lacks the stats needed to build matchup probabilities.
    #[error("missing stats for player {player}: {reason}")]
    MissingStats {
        /// Player id.
        player: u32,
        /// Which stats are missing.
        reason: String,
    },

    /// A probability was outside [0, 1] or not finite.
    #[error("invalid probability: {value} (must be finite and within [0, 1])")]
    InvalidProbability {
        /// The offending value.
        value: f64,
    },

    /// A starting game state violates a structural invariant.
    #[error("invalid game state: {reason}")]
    InvalidGameState {
        /// Description of the problem.
        reason: String,
    },

    /// Two partial aggregates were built for different market configurations.
    #[error("cannot merge aggregates built for different market configurations")]
    IncompatibleAggregates,

    /// A configuration value is out of range.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the problem.
        reason: String,
    },

    /// The configuration file is not valid TOML.
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_missing_transition() {
        let e = SimError::MissingTransition {
            event: EventType::HomeRun,
            key: "XOO-1".to_string(),
        };
        assert_eq!(e.to_string(), "no transitions found for HR-XOO-1");
    }

    #[test]
    fn error_missing_matchup() {
        let e = SimError::MissingMatchup {
            batter: 7,
            pitcher: 42,
        };
        assert_eq!(
            e.to_string(),
            "no matchup probabilities for batter 7 against pitcher 42"
        );
    }

    #[test]
    fn error_invalid_probability() {
        let e = SimError::InvalidProbability { value: 1.5 };
        assert_eq!(
            e.to_string(),
            "invalid probability: 1.5 (must be finite and within [0, 1])"
        );
    }

    #[test]
    fn error_malformed_table() {
        let e = SimError::MalformedTable {
            reason: "empty outcome list for K-OOO-0".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "malformed transition table: empty outcome list for K-OOO-0"
        );
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync + std::error::Error>() {}
        assert_impl::<SimError>();
    }
}
