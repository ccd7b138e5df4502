//! Conversions between win probabilities and American odds.

use super::counts::OutcomeCounts;
use crate::model::constants::Z_95;

/// Break-even American odds for a success probability. `None` at 0 or 1,
/// where the odds are unbounded.
pub fn proportion_to_american_odds(proportion: f64) -> Option<f64> {
    if !(proportion > 0.0 && proportion < 1.0) {
        return None;
    }
    if proportion >= 0.5 {
        Some(-100.0 * proportion / (1.0 - proportion))
    } else {
        Some(100.0 * (1.0 - proportion) / proportion)
    }
}

/// Implied probability of American odds (vig included).
pub fn american_odds_to_probability(odds: f64) -> f64 {
    if odds >= 0.0 {
        100.0 / (odds + 100.0)
    } else {
        odds / (odds - 100.0)
    }
}

/// Success probability from settlement counts. Pushes are dropped unless
/// `pushes_fail`, in which case they count against the bet.
pub fn counts_to_probability(counts: &OutcomeCounts, pushes_fail: bool) -> Option<f64> {
    let denominator = if pushes_fail {
        counts.success + counts.failure + counts.push
    } else {
        counts.success + counts.failure
    };
    if denominator == 0 {
        return None;
    }
    Some(counts.success as f64 / denominator as f64)
}

pub fn counts_to_american_odds(counts: &OutcomeCounts, pushes_fail: bool) -> Option<f64> {
    counts_to_probability(counts, pushes_fail).and_then(proportion_to_american_odds)
}

/// Half-width of the 95% confidence interval of a proportion over `total` trials.
pub fn margin_of_error(total: u64, proportion: f64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    Z_95 * (proportion * (1.0 - proportion) / total as f64).sqrt()
}

/// Removes the bookmaker margin from a two-way market.
pub fn devig(probability: f64, other: f64) -> f64 {
    probability / (probability + other)
}

pub fn devig_american_odds(odds: f64, other: f64) -> Option<f64> {
    proportion_to_american_odds(devig(
        american_odds_to_probability(odds),
        american_odds_to_probability(other),
    ))
}
