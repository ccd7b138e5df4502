use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Classified result of a plate appearance (or a baserunning event).
///
/// The transition table is keyed by these names: `K`, `BB`, `1B`, `2B`, `3B`,
/// `HR`, `OUT`, `SB`, `CS`.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize, Hash, PartialOrd, Ord)]
pub enum EventType {
    #[serde(rename = "K")]
    Strikeout,
    #[serde(rename = "BB")]
    Walk,
    #[serde(rename = "1B")]
    Single,
    #[serde(rename = "2B")]
    Double,
    #[serde(rename = "3B")]
    Triple,
    #[serde(rename = "HR")]
    HomeRun,
    #[serde(rename = "OUT")]
    Out,
    #[serde(rename = "SB")]
    StolenBase,
    #[serde(rename = "CS")]
    CaughtStealing,
}

impl EventType {
    pub const COUNT: usize = 9;

    pub const ALL: [EventType; EventType::COUNT] = [
        EventType::Strikeout,
        EventType::Walk,
        EventType::Single,
        EventType::Double,
        EventType::Triple,
        EventType::HomeRun,
        EventType::Out,
        EventType::StolenBase,
        EventType::CaughtStealing,
    ];

    /// Events a batter can produce, in the order the outcome model draws them.
    pub const PLATE_APPEARANCE: [EventType; 7] = [
        EventType::Strikeout,
        EventType::Walk,
        EventType::Single,
        EventType::Double,
        EventType::Triple,
        EventType::HomeRun,
        EventType::Out,
    ];

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn is_hit(&self) -> bool {
        matches!(
            self,
            EventType::Single | EventType::Double | EventType::Triple | EventType::HomeRun
        )
    }

    pub fn code(&self) -> &'static str {
        match self {
            EventType::Strikeout => "K",
            EventType::Walk => "BB",
            EventType::Single => "1B",
            EventType::Double => "2B",
            EventType::Triple => "3B",
            EventType::HomeRun => "HR",
            EventType::Out => "OUT",
            EventType::StolenBase => "SB",
            EventType::CaughtStealing => "CS",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for EventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventType::ALL
            .iter()
            .find(|event| event.code() == s)
            .copied()
            .ok_or_else(|| format!("unknown event type {s:?}"))
    }
}

#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Serialize, Deserialize, Hash)]
pub enum Handedness {
    #[serde(rename = "L")]
    Left,
    #[default]
    #[serde(rename = "R")]
    Right,
    #[serde(rename = "S")]
    Switch,
}

#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Serialize, Deserialize, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TeamSide {
    #[default]
    Away,
    Home,
}

impl TeamSide {
    pub fn opponent(&self) -> TeamSide {
        match self {
            TeamSide::Away => TeamSide::Home,
            TeamSide::Home => TeamSide::Away,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize, Hash)]
pub enum PitcherRole {
    #[serde(rename = "SP")]
    Starter,
    #[serde(rename = "RP")]
    Reliever,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_matches_all_order() {
        for (i, event) in EventType::ALL.iter().enumerate() {
            assert_eq!(event.index(), i);
        }
    }

    #[test]
    fn codes_round_trip_through_serde() {
        for event in EventType::ALL {
            let json = serde_json::to_string(&event).unwrap();
            assert_eq!(json, format!("\"{}\"", event.code()));
            assert_eq!(event.code().parse::<EventType>().unwrap(), event);
        }
        assert!("XX".parse::<EventType>().is_err());
    }
}
