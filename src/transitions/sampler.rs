use crate::model::bases::BaseState;

/// One branch of the distribution for an (event, base/out state) pair, with the
/// running cumulative probability used for sampling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrecomputedOutcome {
    pub new_bases: BaseState,
    pub runs_on_play: u8,
    pub outs_on_play: u8,
    pub probability: f64,
    pub cumulative_probability: f64,
}

/// Ordered, non-empty list of outcomes with cumulative probabilities frozen at
/// construction time.
#[derive(Debug, Clone, PartialEq)]
pub struct OutcomeDistribution {
    outcomes: Box<[PrecomputedOutcome]>,
}

/// Raw branch before cumulative probabilities are known.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionOutcome {
    pub new_bases: BaseState,
    pub runs_on_play: u8,
    pub outs_on_play: u8,
    pub probability: f64,
}

impl OutcomeDistribution {
    /// Freezes `outcomes` in the given order. Cumulative probabilities are a
    /// single left-to-right running sum. Returns `None` for an empty list.
    pub fn new(outcomes: Vec<TransitionOutcome>) -> Option<Self> {
        if outcomes.is_empty() {
            return None;
        }
        let mut cumulative = 0.0;
        let outcomes = outcomes
            .into_iter()
            .map(|outcome| {
                cumulative += outcome.probability;
                PrecomputedOutcome {
                    new_bases: outcome.new_bases,
                    runs_on_play: outcome.runs_on_play,
                    outs_on_play: outcome.outs_on_play,
                    probability: outcome.probability,
                    cumulative_probability: cumulative,
                }
            })
            .collect();
        Some(OutcomeDistribution { outcomes })
    }

    pub fn outcomes(&self) -> &[PrecomputedOutcome] {
        &self.outcomes
    }

    /// Number of outcomes; at least one.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// Final cumulative value; one for a well-formed table.
    pub fn total_probability(&self) -> f64 {
        self.last().cumulative_probability
    }

    fn last(&self) -> &PrecomputedOutcome {
        // Non-empty by construction.
        &self.outcomes[self.outcomes.len() - 1]
    }

    /// Returns the first outcome whose cumulative probability is strictly
    /// greater than `r`, found by binary search. A draw at or past the final
    /// cumulative value (floating-point slack) clamps to the last outcome.
    pub fn sample(&self, r: f64) -> &PrecomputedOutcome {
        let index = self
            .outcomes
            .partition_point(|outcome| outcome.cumulative_probability <= r);
        if index >= self.outcomes.len() {
            return self.last();
        }
        &self.outcomes[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(runs: u8, probability: f64) -> TransitionOutcome {
        TransitionOutcome {
            new_bases: BaseState::EMPTY,
            runs_on_play: runs,
            outs_on_play: 0,
            probability,
        }
    }

    #[test]
    fn empty_list_is_rejected() {
        assert!(OutcomeDistribution::new(vec![]).is_none());
    }

    #[test]
    fn cumulative_follows_input_order() {
        let dist =
            OutcomeDistribution::new(vec![outcome(0, 0.5), outcome(1, 0.2), outcome(2, 0.3)])
                .unwrap();
        let cumulative: Vec<f64> = dist
            .outcomes()
            .iter()
            .map(|o| o.cumulative_probability)
            .collect();
        assert_eq!(dist.len(), 3);
        assert_eq!(cumulative[0], 0.5);
        assert!((cumulative[1] - 0.7).abs() < 1e-12);
        assert!((cumulative[2] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn boundary_draws_move_to_next_outcome() {
        let dist =
            OutcomeDistribution::new(vec![outcome(0, 0.25), outcome(1, 0.25), outcome(2, 0.5)])
                .unwrap();
        assert_eq!(dist.sample(0.0).runs_on_play, 0);
        assert_eq!(dist.sample(0.2499).runs_on_play, 0);
        // Cumulative must be strictly greater than the draw.
        assert_eq!(dist.sample(0.25).runs_on_play, 1);
        assert_eq!(dist.sample(0.5).runs_on_play, 2);
    }

    #[test]
    fn draw_past_final_cumulative_clamps() {
        let dist = OutcomeDistribution::new(vec![outcome(0, 0.3), outcome(4, 0.6)]).unwrap();
        assert!(dist.total_probability() < 1.0);
        assert_eq!(dist.sample(0.95).runs_on_play, 4);
        assert_eq!(dist.sample(1.0).runs_on_play, 4);
    }

    #[test]
    fn zero_probability_branch_is_never_chosen() {
        let dist =
            OutcomeDistribution::new(vec![outcome(0, 0.5), outcome(1, 0.0), outcome(2, 0.5)])
                .unwrap();
        assert_eq!(dist.sample(0.5).runs_on_play, 2);
    }
}
