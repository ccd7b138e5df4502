use crate::error::SimError;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const OCCUPIED: char = 'X';
pub const EMPTY: char = 'O';

/// Number of distinct base states.
pub const BASE_STATE_COUNT: usize = 8;
/// Out counts the table is keyed by (0..=3).
pub const OUT_COUNT_VALUES: usize = 4;
/// Number of distinct transition keys per event (4 out counts x 8 base states).
pub const TRANSITION_KEY_COUNT: usize = OUT_COUNT_VALUES * BASE_STATE_COUNT;

/// Occupancy of first, second and third base.
///
/// Serialized as `[first, second, third]`.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default, Hash, Serialize, Deserialize)]
#[serde(from = "[bool; 3]", into = "[bool; 3]")]
pub struct BaseState {
    pub first: bool,
    pub second: bool,
    pub third: bool,
}

impl BaseState {
    pub const EMPTY: BaseState = BaseState {
        first: false,
        second: false,
        third: false,
    };

    pub fn new(first: bool, second: bool, third: bool) -> Self {
        BaseState {
            first,
            second,
            third,
        }
    }

    /// All 8 base states, ordered by [`BaseState::index`].
    pub fn all() -> impl Iterator<Item = BaseState> {
        (0..BASE_STATE_COUNT).map(BaseState::from_index)
    }

    /// Bit 0 = first, bit 1 = second, bit 2 = third.
    pub fn index(&self) -> usize {
        usize::from(self.first) | usize::from(self.second) << 1 | usize::from(self.third) << 2
    }

    pub fn from_index(index: usize) -> Self {
        BaseState {
            first: index & 1 != 0,
            second: index & 2 != 0,
            third: index & 4 != 0,
        }
    }

    pub fn runners(&self) -> u8 {
        u8::from(self.first) + u8::from(self.second) + u8::from(self.third)
    }

    /// Three-character code, e.g. `XOX` for runners on first and third.
    pub fn encode(&self) -> String {
        [self.first, self.second, self.third]
            .iter()
            .map(|&occupied| if occupied { OCCUPIED } else { EMPTY })
            .collect()
    }

    /// Strict inverse of [`BaseState::encode`]: exactly three `X`/`O` characters.
    pub fn decode(code: &str) -> Result<Self, SimError> {
        let chars: Vec<char> = code.chars().collect();
        if chars.len() != 3 || chars.iter().any(|&c| c != OCCUPIED && c != EMPTY) {
            return Err(SimError::MalformedTable {
                reason: format!("invalid base code {code:?}"),
            });
        }
        Ok(BaseState::new(
            chars[0] == OCCUPIED,
            chars[1] == OCCUPIED,
            chars[2] == OCCUPIED,
        ))
    }

    /// Decodes the leading base segment of a table `end_state` such as `XOO-1`.
    /// Each of the first three characters is tested against the occupied symbol;
    /// anything after them is ignored.
    pub fn from_end_state(end_state: &str) -> Result<Self, SimError> {
        let mut chars = end_state.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(first), Some(second), Some(third)) => Ok(BaseState::new(
                first == OCCUPIED,
                second == OCCUPIED,
                third == OCCUPIED,
            )),
            _ => Err(SimError::MalformedTable {
                reason: format!("end_state {end_state:?} is shorter than three characters"),
            }),
        }
    }
}

impl From<[bool; 3]> for BaseState {
    fn from(bases: [bool; 3]) -> Self {
        BaseState::new(bases[0], bases[1], bases[2])
    }
}

impl From<BaseState> for [bool; 3] {
    fn from(bases: BaseState) -> Self {
        [bases.first, bases.second, bases.third]
    }
}

impl fmt::Display for BaseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

/// Base occupancy plus out count, the key of the transition table (`XOO-1`).
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct TransitionKey {
    bases: BaseState,
    outs: u8,
}

impl TransitionKey {
    pub fn new(bases: BaseState, outs: u8) -> Result<Self, SimError> {
        if usize::from(outs) >= OUT_COUNT_VALUES {
            return Err(SimError::InvalidGameState {
                reason: format!("out count {outs} is outside 0..=3"),
            });
        }
        Ok(TransitionKey { bases, outs })
    }

    pub fn bases(&self) -> BaseState {
        self.bases
    }

    pub fn outs(&self) -> u8 {
        self.outs
    }

    /// Dense index in `0..TRANSITION_KEY_COUNT`.
    pub fn index(&self) -> usize {
        usize::from(self.outs) * BASE_STATE_COUNT + self.bases.index()
    }

    pub fn parse(key: &str) -> Result<Self, SimError> {
        let (code, outs) = key.split_once('-').ok_or_else(|| SimError::MalformedTable {
            reason: format!("transition key {key:?} has no '-' separator"),
        })?;
        let bases = BaseState::decode(code)?;
        let outs: u8 = outs.parse().map_err(|_| SimError::MalformedTable {
            reason: format!("transition key {key:?} has a non-numeric out count"),
        })?;
        TransitionKey::new(bases, outs).map_err(|_| SimError::MalformedTable {
            reason: format!("transition key {key:?} has an out count outside 0..=3"),
        })
    }
}

impl fmt::Display for TransitionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.bases, self.outs)
    }
}
