//! Loader for the precomputed baserunner transition table.
//!
//! The input is a JSON object keyed by event type, then by base/out key:
//!
//! ```json
//! { "1B": { "XOO-0": [ { "end_state": "XXO-0", "probability": 0.71,
//!                       "runs_scored": 0, "outs_made": 0 }, ... ] } }
//! ```
//!
//! The table is built once and never mutated; share it behind an `Arc`.

use super::sampler::{OutcomeDistribution, TransitionOutcome};
use crate::error::SimError;
use crate::model::bases::{BaseState, TransitionKey, TRANSITION_KEY_COUNT};
use crate::model::constants::{OUTS_PER_HALF, PROBABILITY_TOLERANCE};
use crate::model::event::EventType;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawOutcome {
    pub end_state: String,
    pub probability: f64,
    pub runs_scored: u8,
    pub outs_made: u8,
}

/// Event name -> base/out key -> outcome records, exactly as stored on disk.
pub type RawTransitionMap = BTreeMap<String, BTreeMap<String, Vec<RawOutcome>>>;

/// An (event, key) pair whose outcome probabilities do not sum to one.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbabilityDeviation {
    pub event: EventType,
    pub key: TransitionKey,
    pub total: f64,
}

#[derive(Debug, Clone)]
pub struct TransitionTable {
    entries: Vec<Option<OutcomeDistribution>>,
    populated: usize,
}

impl TransitionTable {
    pub fn from_json_str(json: &str) -> Result<Self, SimError> {
        let raw: RawTransitionMap = serde_json::from_str(json)?;
        Self::from_raw(&raw)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, SimError> {
        let raw: RawTransitionMap = serde_json::from_reader(reader)?;
        Self::from_raw(&raw)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let table = Self::from_reader(std::io::BufReader::new(file))?;
        info!(
            path = %path.display(),
            entries = table.len(),
            "loaded transition table"
        );
        Ok(table)
    }

    pub fn from_raw(raw: &RawTransitionMap) -> Result<Self, SimError> {
        let mut entries = vec![None; EventType::COUNT * TRANSITION_KEY_COUNT];
        let mut populated = 0;

        for (event_name, states) in raw {
            let event: EventType = event_name
                .parse()
                .map_err(|reason| SimError::MalformedTable { reason })?;

            for (key_str, outcomes) in states {
                let key = TransitionKey::parse(key_str)?;
                let decoded = outcomes
                    .iter()
                    .map(|outcome| decode_outcome(event, &key, outcome))
                    .collect::<Result<Vec<_>, _>>()?;
                let distribution =
                    OutcomeDistribution::new(decoded).ok_or_else(|| SimError::MalformedTable {
                        reason: format!("empty outcome list for {event}-{key}"),
                    })?;

                let total = distribution.total_probability();
                if (total - 1.0).abs() > PROBABILITY_TOLERANCE {
                    warn!(%event, %key, total, "outcome probabilities do not sum to one");
                }

                let slot = &mut entries[slot_index(event, &key)];
                if slot.is_none() {
                    populated += 1;
                }
                *slot = Some(distribution);
            }
        }

        Ok(TransitionTable { entries, populated })
    }

    pub fn get(&self, event: EventType, key: &TransitionKey) -> Option<&OutcomeDistribution> {
        self.entries[slot_index(event, key)].as_ref()
    }

    /// Number of populated (event, key) pairs.
    pub fn len(&self) -> usize {
        self.populated
    }

    pub fn is_empty(&self) -> bool {
        self.populated == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (EventType, TransitionKey, &OutcomeDistribution)> {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| {
                let distribution = entry.as_ref()?;
                let (event, key) = slot_key(index)?;
                Some((event, key, distribution))
            })
    }

    /// Every (event, key) pair whose probabilities miss one by more than `tolerance`.
    pub fn validate_probabilities(&self, tolerance: f64) -> Vec<ProbabilityDeviation> {
        self.iter()
            .filter(|(_, _, distribution)| {
                (distribution.total_probability() - 1.0).abs() > tolerance
            })
            .map(|(event, key, distribution)| ProbabilityDeviation {
                event,
                key,
                total: distribution.total_probability(),
            })
            .collect()
    }
}

fn slot_index(event: EventType, key: &TransitionKey) -> usize {
    event.index() * TRANSITION_KEY_COUNT + key.index()
}

fn slot_key(index: usize) -> Option<(EventType, TransitionKey)> {
    let event = *EventType::ALL.get(index / TRANSITION_KEY_COUNT)?;
    let key_index = index % TRANSITION_KEY_COUNT;
    let bases = BaseState::from_index(key_index % 8);
    let outs = u8::try_from(key_index / 8).ok()?;
    let key = TransitionKey::new(bases, outs).ok()?;
    Some((event, key))
}

fn decode_outcome(
    event: EventType,
    key: &TransitionKey,
    outcome: &RawOutcome,
) -> Result<TransitionOutcome, SimError> {
    if !outcome.probability.is_finite() || outcome.probability <= 0.0 || outcome.probability > 1.0
    {
        return Err(SimError::MalformedTable {
            reason: format!(
                "probability {} for {event}-{key} is outside (0, 1]",
                outcome.probability
            ),
        });
    }
    if key.outs() + outcome.outs_made > OUTS_PER_HALF {
        return Err(SimError::MalformedTable {
            reason: format!(
                "{} outs made from {event}-{key} exceeds three outs",
                outcome.outs_made
            ),
        });
    }
    Ok(TransitionOutcome {
        new_bases: BaseState::from_end_state(&outcome.end_state)?,
        runs_on_play: outcome.runs_scored,
        outs_on_play: outcome.outs_made,
        probability: outcome.probability,
    })
}
