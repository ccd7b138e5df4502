//! Batter-versus-pitcher event rates.
//!
//! Rates come from the log5 method: a batter's rate against the pitcher's
//! rate, both relative to the league rate for the same handedness split.
//! Home and away multipliers are applied afterwards and the result is
//! normalized so each pair sums to one.

use crate::error::SimError;
use crate::model::event::{EventType, Handedness, TeamSide};
use crate::model::game::StartingState;
use crate::model::player::{EventProbabilities, Player};
use crate::model::team::{MatchupLineups, TeamLineup};

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Draws the classified result of a plate appearance.
pub trait PlateAppearanceModel: Send + Sync {
    fn draw_event(
        &self,
        batting_side: TeamSide,
        batter: u32,
        pitcher: u32,
        rng: &mut fastrand::Rng,
    ) -> Result<EventType, SimError>;
}

/// League-wide rates per handedness split, keyed `{bat}hit{pitch}pitch`.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct LeagueAverages {
    #[serde(rename = "RhitLpitch")]
    pub r_hit_l_pitch: EventProbabilities,
    #[serde(rename = "RhitRpitch")]
    pub r_hit_r_pitch: EventProbabilities,
    #[serde(rename = "LhitLpitch")]
    pub l_hit_l_pitch: EventProbabilities,
    #[serde(rename = "LhitRpitch")]
    pub l_hit_r_pitch: EventProbabilities,
}

impl LeagueAverages {
    pub fn get(&self, batting: Handedness, pitching: Handedness) -> Option<&EventProbabilities> {
        match (batting, pitching) {
            (Handedness::Right, Handedness::Left) => Some(&self.r_hit_l_pitch),
            (Handedness::Right, Handedness::Right) => Some(&self.r_hit_r_pitch),
            (Handedness::Left, Handedness::Left) => Some(&self.l_hit_l_pitch),
            (Handedness::Left, Handedness::Right) => Some(&self.l_hit_r_pitch),
            _ => None,
        }
    }
}

/// Season counting stats for one split of league play.
#[derive(Debug, PartialEq, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct LeagueTotals {
    pub pa: f64,
    #[serde(default)]
    pub sh: f64,
    #[serde(default)]
    pub so: f64,
    pub bb: f64,
    #[serde(default)]
    pub hbp: f64,
    #[serde(rename = "1B")]
    pub singles: f64,
    #[serde(rename = "2B")]
    pub doubles: f64,
    #[serde(rename = "3B")]
    pub triples: f64,
    pub hr: f64,
    pub ab: f64,
    /// Hits; derived from the hit types when absent.
    #[serde(default)]
    pub h: Option<f64>,
}

impl LeagueTotals {
    /// Event rates per plate appearance, excluding sacrifice bunts.
    /// Hit-by-pitch counts as a walk.
    pub fn rates(&self) -> Result<EventProbabilities, SimError> {
        let used_pa = self.pa - self.sh;
        if used_pa <= 0.0 {
            return Err(SimError::InvalidConfig {
                reason: "league totals have no plate appearances".to_string(),
            });
        }
        let hits = self
            .h
            .unwrap_or(self.singles + self.doubles + self.triples + self.hr);
        let raw = EventProbabilities::from_array([
            self.so / used_pa,
            (self.bb + self.hbp) / used_pa,
            self.singles / used_pa,
            self.doubles / used_pa,
            self.triples / used_pa,
            self.hr / used_pa,
            (self.ab - hits - self.so) / used_pa,
        ]);
        raw.normalized().ok_or(SimError::InvalidProbability { value: raw.sum() })
    }
}

/// Per-event scaling for the batting team's venue side.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct HomeFieldMultipliers {
    pub home: EventProbabilities,
    pub away: EventProbabilities,
}

impl HomeFieldMultipliers {
    /// No venue effect.
    pub fn neutral() -> Self {
        let ones = EventProbabilities::from_array([1.0; 7]);
        HomeFieldMultipliers {
            home: ones,
            away: ones,
        }
    }

    /// Ratio of home (and away) rates to neutral-site rates. A zero neutral
    /// rate leaves that event unscaled.
    pub fn from_league_totals(
        home: &LeagueTotals,
        away: &LeagueTotals,
        neutral: &LeagueTotals,
    ) -> Result<Self, SimError> {
        let neutral = neutral.rates()?;
        let ratio = |base: f64, target: f64| if base == 0.0 { 1.0 } else { target / base };
        Ok(HomeFieldMultipliers {
            home: neutral.zip_with(&home.rates()?, ratio),
            away: neutral.zip_with(&away.rates()?, ratio),
        })
    }

    pub fn for_side(&self, side: TeamSide) -> &EventProbabilities {
        match side {
            TeamSide::Home => &self.home,
            TeamSide::Away => &self.away,
        }
    }
}

impl Default for HomeFieldMultipliers {
    fn default() -> Self {
        Self::neutral()
    }
}

/// A matchup as supplied by the host: both lineups, the league context and
/// an optional mid-game starting point.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchupInput {
    pub lineups: MatchupLineups,
    pub league_averages: LeagueAverages,
    #[serde(default)]
    pub home_field: HomeFieldMultipliers,
    #[serde(default)]
    pub start: StartingState,
}

impl MatchupInput {
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// log5 estimate of an event rate. Degenerate league rates (0 or 1) are
/// returned as-is.
pub fn log5(batter: f64, pitcher: f64, league: f64) -> f64 {
    if league == 0.0 || league == 1.0 {
        return league;
    }
    let numerator = batter * pitcher * (1.0 - league);
    let denominator = batter * pitcher - league * batter - league * pitcher + league;
    if denominator == 0.0 {
        return 0.0;
    }
    numerator / denominator
}

/// Resolves switch hitters and switch pitchers to a concrete
/// (batting side, pitching side) split.
pub fn resolve_handedness(batter: Handedness, pitcher: Handedness) -> (Handedness, Handedness) {
    match (batter, pitcher) {
        (Handedness::Switch, Handedness::Switch) => (Handedness::Left, Handedness::Right),
        (batting, Handedness::Switch) => (batting, batting),
        (Handedness::Switch, pitching) => (opposite(pitching), pitching),
        (batting, pitching) => (batting, pitching),
    }
}

fn opposite(side: Handedness) -> Handedness {
    match side {
        Handedness::Right => Handedness::Left,
        _ => Handedness::Right,
    }
}

/// Normalized event rates for one batter against one pitcher.
pub fn batter_pitcher_probabilities(
    batter: &Player,
    pitcher: &Player,
    league: &LeagueAverages,
    multipliers: &EventProbabilities,
) -> Result<EventProbabilities, SimError> {
    let (batting, pitching) = resolve_handedness(batter.batting_side, pitcher.pitching_side);

    let batter_rates =
        batter
            .stats
            .hitting_against(pitching)
            .ok_or_else(|| SimError::MissingStats {
                player: batter.id,
                reason: format!("no hitting stats against {pitching:?}-handed pitching"),
            })?;
    let pitcher_rates =
        pitcher
            .stats
            .pitching_against(batting)
            .ok_or_else(|| SimError::MissingStats {
                player: pitcher.id,
                reason: format!("no pitching stats against {batting:?}-handed batters"),
            })?;
    let league_rates = league
        .get(batting, pitching)
        .ok_or_else(|| SimError::MissingStats {
            player: batter.id,
            reason: format!("no league averages for {batting:?} against {pitching:?}"),
        })?;

    let combined = EventProbabilities::from_array(std::array::from_fn(|i| {
        log5(
            batter_rates.to_array()[i],
            pitcher_rates.to_array()[i],
            league_rates.to_array()[i],
        )
    }));
    let normalized = combined
        .normalized()
        .ok_or(SimError::InvalidProbability {
            value: combined.sum(),
        })?;
    let adjusted = normalized.zip_with(multipliers, |rate, factor| rate * factor);
    adjusted.normalized().ok_or(SimError::InvalidProbability {
        value: adjusted.sum(),
    })
}

/// Rates for every batter against every pitcher the batter can face, precomputed
/// before simulation.
#[derive(Debug, Clone, Default)]
pub struct MatchupProbabilities {
    away: HashMap<(u32, u32), EventProbabilities>,
    home: HashMap<(u32, u32), EventProbabilities>,
}

impl MatchupProbabilities {
    pub fn build(
        lineups: &MatchupLineups,
        league: &LeagueAverages,
        multipliers: &HomeFieldMultipliers,
    ) -> Result<Self, SimError> {
        let away = side_probabilities(
            &lineups.away,
            &lineups.home,
            league,
            multipliers.for_side(TeamSide::Away),
        )?;
        let home = side_probabilities(
            &lineups.home,
            &lineups.away,
            league,
            multipliers.for_side(TeamSide::Home),
        )?;
        debug!(
            away_pairs = away.len(),
            home_pairs = home.len(),
            "built matchup probabilities"
        );
        Ok(MatchupProbabilities { away, home })
    }

    pub fn get(&self, batting_side: TeamSide, batter: u32, pitcher: u32) -> Option<&EventProbabilities> {
        match batting_side {
            TeamSide::Away => self.away.get(&(batter, pitcher)),
            TeamSide::Home => self.home.get(&(batter, pitcher)),
        }
    }

    /// Overrides the rates for one pair.
    pub fn insert(
        &mut self,
        batting_side: TeamSide,
        batter: u32,
        pitcher: u32,
        rates: EventProbabilities,
    ) {
        let pairs = match batting_side {
            TeamSide::Away => &mut self.away,
            TeamSide::Home => &mut self.home,
        };
        pairs.insert((batter, pitcher), rates);
    }

    pub fn len(&self) -> usize {
        self.away.len() + self.home.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn side_probabilities(
    batting: &TeamLineup,
    fielding: &TeamLineup,
    league: &LeagueAverages,
    multipliers: &EventProbabilities,
) -> Result<HashMap<(u32, u32), EventProbabilities>, SimError> {
    let mut pairs = HashMap::new();
    for batter in &batting.lineup {
        for pitcher in fielding.pitchers() {
            let rates = batter_pitcher_probabilities(batter, pitcher, league, multipliers)?;
            pairs.insert((batter.id, pitcher.id), rates);
        }
    }
    Ok(pairs)
}

impl PlateAppearanceModel for MatchupProbabilities {
    fn draw_event(
        &self,
        batting_side: TeamSide,
        batter: u32,
        pitcher: u32,
        rng: &mut fastrand::Rng,
    ) -> Result<EventType, SimError> {
        let rates = self
            .get(batting_side, batter, pitcher)
            .ok_or(SimError::MissingMatchup { batter, pitcher })?;
        Ok(rates.draw(rng.f64()))
    }
}
