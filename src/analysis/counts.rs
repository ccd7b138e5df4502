use serde::{Deserialize, Serialize};
use std::ops::AddAssign;

/// How a single game settled against a line.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Settlement {
    Success,
    Failure,
    Push,
}

/// Settlement tallies for one line across all simulated games.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default, Serialize, Deserialize)]
pub struct OutcomeCounts {
    pub success: u64,
    pub failure: u64,
    pub push: u64,
    pub total: u64,
}

impl OutcomeCounts {
    pub fn record(&mut self, settlement: Settlement) {
        self.record_many(settlement, 1);
    }

    /// Records `games` games that all settled the same way.
    pub fn record_many(&mut self, settlement: Settlement, games: u64) {
        match settlement {
            Settlement::Success => self.success += games,
            Settlement::Failure => self.failure += games,
            Settlement::Push => self.push += games,
        }
        self.total += games;
    }

    /// The opposite side of the same line: successes and failures swap.
    pub fn mirrored(&self) -> Self {
        OutcomeCounts {
            success: self.failure,
            failure: self.success,
            push: self.push,
            total: self.total,
        }
    }

    /// Share of all games that succeeded, pushes included in the denominator.
    pub fn success_ratio(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.success as f64 / self.total as f64
    }

    /// Share of decided games that succeeded.
    pub fn cover_probability(&self) -> f64 {
        let decided = self.success + self.failure;
        if decided == 0 {
            return 0.0;
        }
        self.success as f64 / decided as f64
    }
}

impl AddAssign for OutcomeCounts {
    fn add_assign(&mut self, other: Self) {
        self.success += other.success;
        self.failure += other.failure;
        self.push += other.push;
        self.total += other.total;
    }
}

/// Settles a game value against a threshold, `Success` when `value < line`.
pub fn settle_below(value: f64, line: f64) -> Settlement {
    if value < line {
        Settlement::Success
    } else if value > line {
        Settlement::Failure
    } else {
        Settlement::Push
    }
}
