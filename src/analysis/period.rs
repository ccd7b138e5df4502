use crate::model::constants::FIRST_FIVE_INNINGS;
use crate::model::event::TeamSide;
use crate::model::game::GameSummary;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stretch of the game a market settles on.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "type", content = "inning", rename_all = "snake_case")]
pub enum Period {
    FullGame,
    /// Score after five complete innings.
    FirstFive,
    /// Runs scored in a single inning.
    Inning(u16),
}

impl Period {
    pub fn runs(&self, game: &GameSummary, side: TeamSide) -> u32 {
        let line = &game.line_score;
        match self {
            Period::FullGame => line.total(side),
            Period::FirstFive => line.through(side, FIRST_FIVE_INNINGS),
            Period::Inning(n) => line.in_inning(side, *n),
        }
    }

    pub fn combined_runs(&self, game: &GameSummary) -> u32 {
        self.runs(game, TeamSide::Away) + self.runs(game, TeamSide::Home)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::FullGame => f.write_str("M0"),
            Period::FirstFive => f.write_str("H1"),
            Period::Inning(n) => write!(f, "I{n}"),
        }
    }
}
