use super::table::TransitionTable;
use crate::error::SimError;
use crate::model::bases::{BaseState, TransitionKey};
use crate::model::event::EventType;

use std::sync::Arc;

/// Result of applying one event to a base/out state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayTransition {
    pub new_bases: BaseState,
    pub runs_on_play: u8,
    pub outs_on_play: u8,
}

/// Stochastic baserunning: given an event and the current bases and outs,
/// draws the next state from the transition table.
///
/// Cheap to clone; every clone shares the same read-only table.
#[derive(Debug, Clone)]
pub struct BaserunningEngine {
    table: Arc<TransitionTable>,
}

impl BaserunningEngine {
    pub fn new(table: Arc<TransitionTable>) -> Self {
        BaserunningEngine { table }
    }

    pub fn table(&self) -> &TransitionTable {
        &self.table
    }

    /// Draws one outcome for `event` from the `(bases, outs)` state using a
    /// single uniform draw from `rng`.
    pub fn process_event(
        &self,
        event: EventType,
        bases: BaseState,
        outs: u8,
        rng: &mut fastrand::Rng,
    ) -> Result<PlayTransition, SimError> {
        let key = TransitionKey::new(bases, outs)?;
        let distribution =
            self.table
                .get(event, &key)
                .ok_or_else(|| SimError::MissingTransition {
                    event,
                    key: key.to_string(),
                })?;
        let outcome = distribution.sample(rng.f64());
        Ok(PlayTransition {
            new_bases: outcome.new_bases,
            runs_on_play: outcome.runs_on_play,
            outs_on_play: outcome.outs_on_play,
        })
    }
}
