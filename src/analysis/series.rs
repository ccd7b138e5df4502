//! Three-game series outcome from independent per-game win probabilities.

use super::aggregator::SimResults;
use crate::error::SimError;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of games in a series this combinator understands.
pub const SERIES_LENGTH: usize = 3;

/// The home side's win probability in one game of the series.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct SeriesGameProbability {
    home_win: f64,
}

impl SeriesGameProbability {
    pub fn new(home_win: f64) -> Result<Self, SimError> {
        if !home_win.is_finite() || !(0.0..=1.0).contains(&home_win) {
            return Err(SimError::InvalidProbability { value: home_win });
        }
        Ok(SeriesGameProbability { home_win })
    }

    pub fn home_win(&self) -> f64 {
        self.home_win
    }
}

/// Series win and loss probability for one side.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct SideSeriesProbability {
    pub win_percent: f64,
    pub loss_percent: f64,
}

impl SideSeriesProbability {
    fn from_win(win_percent: f64) -> Self {
        SideSeriesProbability {
            win_percent,
            loss_percent: 1.0 - win_percent,
        }
    }
}

/// Probability that each side wins at least two of the three games. The
/// away side's win is the home side's loss.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct SeriesOutcomeProbability {
    pub home: SideSeriesProbability,
    pub away: SideSeriesProbability,
}

/// `None` unless exactly three games are given.
pub fn series_probability(games: &[SeriesGameProbability]) -> Option<SeriesOutcomeProbability> {
    let [g1, g2, g3] = games else {
        return None;
    };
    let (p1, p2, p3) = (g1.home_win, g2.home_win, g3.home_win);
    let home = p1 * p2 * p3
        + p1 * p2 * (1.0 - p3)
        + p1 * (1.0 - p2) * p3
        + (1.0 - p1) * p2 * p3;
    let home = SideSeriesProbability::from_win(home);
    Some(SeriesOutcomeProbability {
        home,
        away: SideSeriesProbability {
            win_percent: home.loss_percent,
            loss_percent: home.win_percent,
        },
    })
}

/// Builds the series outcome from simulated games 1, 2 and 3, using each
/// game's full-game home moneyline success share. `None` unless exactly
/// those three games are present.
pub fn series_probability_from_results(
    results: &BTreeMap<u8, SimResults>,
) -> Option<SeriesOutcomeProbability> {
    if results.len() != SERIES_LENGTH {
        return None;
    }
    let games = (1..=SERIES_LENGTH as u8)
        .map(|number| {
            let counts = results.get(&number)?.home_moneyline()?;
            Some(SeriesGameProbability {
                home_win: counts.success_ratio(),
            })
        })
        .collect::<Option<Vec<_>>>()?;
    series_probability(&games)
}
