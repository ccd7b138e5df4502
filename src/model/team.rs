use super::event::TeamSide;
use super::player::Player;
use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamLineup {
    #[serde(default)]
    pub team_name: String,
    /// Batting order.
    pub lineup: Vec<Player>,
    pub starting_pitcher: Player,
    /// Relief pitchers available for substitution.
    #[serde(default)]
    pub bullpen: Vec<Player>,
}

impl TeamLineup {
    /// Starting pitcher followed by the bullpen.
    pub fn pitchers(&self) -> impl Iterator<Item = &Player> {
        std::iter::once(&self.starting_pitcher).chain(self.bullpen.iter())
    }
}

#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
pub struct MatchupLineups {
    pub home: TeamLineup,
    pub away: TeamLineup,
}

impl MatchupLineups {
    pub fn team(&self, side: TeamSide) -> &TeamLineup {
        match side {
            TeamSide::Home => &self.home,
            TeamSide::Away => &self.away,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
