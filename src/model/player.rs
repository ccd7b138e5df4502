use super::event::{EventType, Handedness};
use serde::{Deserialize, Serialize};

/// Per-plate-appearance event rates (`adj_perc_*` in the stats feed).
#[derive(Debug, PartialEq, Clone, Copy, Default, Serialize, Deserialize)]
pub struct EventProbabilities {
    #[serde(rename = "adj_perc_K")]
    pub strikeout: f64,
    #[serde(rename = "adj_perc_BB")]
    pub walk: f64,
    #[serde(rename = "adj_perc_1B")]
    pub single: f64,
    #[serde(rename = "adj_perc_2B")]
    pub double: f64,
    #[serde(rename = "adj_perc_3B")]
    pub triple: f64,
    #[serde(rename = "adj_perc_HR")]
    pub home_run: f64,
    #[serde(rename = "adj_perc_OUT")]
    pub out: f64,
}

impl EventProbabilities {
    /// Builds rates in [`EventType::PLATE_APPEARANCE`] order.
    pub fn from_array(values: [f64; 7]) -> Self {
        EventProbabilities {
            strikeout: values[0],
            walk: values[1],
            single: values[2],
            double: values[3],
            triple: values[4],
            home_run: values[5],
            out: values[6],
        }
    }

    pub fn to_array(&self) -> [f64; 7] {
        [
            self.strikeout,
            self.walk,
            self.single,
            self.double,
            self.triple,
            self.home_run,
            self.out,
        ]
    }

    /// Rate for a plate-appearance event; baserunning events have none.
    pub fn get(&self, event: EventType) -> f64 {
        match event {
            EventType::Strikeout => self.strikeout,
            EventType::Walk => self.walk,
            EventType::Single => self.single,
            EventType::Double => self.double,
            EventType::Triple => self.triple,
            EventType::HomeRun => self.home_run,
            EventType::Out => self.out,
            EventType::StolenBase | EventType::CaughtStealing => 0.0,
        }
    }

    pub fn sum(&self) -> f64 {
        self.to_array().iter().sum()
    }

    /// Element-wise combination with another set of rates.
    pub fn zip_with(&self, other: &EventProbabilities, f: impl Fn(f64, f64) -> f64) -> Self {
        let a = self.to_array();
        let b = other.to_array();
        EventProbabilities::from_array(std::array::from_fn(|i| f(a[i], b[i])))
    }

    /// Scales the rates so they sum to one. Returns `None` when the sum is not
    /// a positive finite number.
    pub fn normalized(&self) -> Option<Self> {
        let sum = self.sum();
        if !sum.is_finite() || sum <= 0.0 {
            return None;
        }
        Some(EventProbabilities::from_array(
            self.to_array().map(|value| value / sum),
        ))
    }

    /// Picks the first event whose running sum exceeds `r`, checking events in
    /// [`EventType::PLATE_APPEARANCE`] order. Falls back to an out when the
    /// rates sum to slightly less than `r`.
    pub fn draw(&self, r: f64) -> EventType {
        let mut cumulative = 0.0;
        for (event, rate) in EventType::PLATE_APPEARANCE.iter().zip(self.to_array()) {
            cumulative += rate;
            if r < cumulative {
                return *event;
            }
        }
        EventType::Out
    }
}

#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStats {
    #[serde(default)]
    pub hit_vs_l: Option<EventProbabilities>,
    #[serde(default)]
    pub hit_vs_r: Option<EventProbabilities>,
    #[serde(default)]
    pub pitch_vs_l: Option<EventProbabilities>,
    #[serde(default)]
    pub pitch_vs_r: Option<EventProbabilities>,
}

impl PlayerStats {
    /// Hitting rates against a pitcher throwing with `pitching_side`.
    pub fn hitting_against(&self, pitching_side: Handedness) -> Option<&EventProbabilities> {
        match pitching_side {
            Handedness::Left => self.hit_vs_l.as_ref(),
            Handedness::Right => self.hit_vs_r.as_ref(),
            Handedness::Switch => None,
        }
    }

    /// Pitching rates against a batter hitting from `batting_side`.
    pub fn pitching_against(&self, batting_side: Handedness) -> Option<&EventProbabilities> {
        match batting_side {
            Handedness::Left => self.pitch_vs_l.as_ref(),
            Handedness::Right => self.pitch_vs_r.as_ref(),
            Handedness::Switch => None,
        }
    }
}

#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: u32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub batting_side: Handedness,
    #[serde(default)]
    pub pitching_side: Handedness,
    #[serde(default)]
    pub stats: PlayerStats,
}
