#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use ballpark_core::analysis::markets::MarketConfig;
use ballpark_core::error::SimError;
use ballpark_core::model::event::{EventType, Handedness, TeamSide};
use ballpark_core::model::game::StartingState;
use ballpark_core::model::player::{EventProbabilities, Player, PlayerStats};
use ballpark_core::model::team::{MatchupLineups, TeamLineup};
use ballpark_core::simulation::batch::SimulationContext;
use ballpark_core::simulation::matchup::{MatchupInput, PlateAppearanceModel};
use ballpark_core::transitions::{BaserunningEngine, TransitionTable};

pub const TRANSITIONS_JSON: &str = include_str!("../../data/baserunner_transitions.json");
pub const SAMPLE_MATCHUP_JSON: &str = include_str!("../../data/sample_matchup.json");

pub const AWAY_STARTER: u32 = 50;
pub const HOME_STARTER: u32 = 60;

pub fn transition_table() -> Arc<TransitionTable> {
    Arc::new(TransitionTable::from_json_str(TRANSITIONS_JSON).expect("Failed to load table"))
}

pub fn engine() -> BaserunningEngine {
    BaserunningEngine::new(transition_table())
}

pub fn sample_matchup() -> MatchupInput {
    MatchupInput::from_json(SAMPLE_MATCHUP_JSON).expect("Failed to parse sample matchup")
}

pub fn league_rates() -> EventProbabilities {
    EventProbabilities::from_array([0.224, 0.085, 0.142, 0.044, 0.004, 0.031, 0.47])
}

pub fn player(id: u32, batting_side: Handedness, pitching_side: Handedness) -> Player {
    let rates = Some(league_rates());
    Player {
        id,
        name: Some(format!("Player {id}")),
        batting_side,
        pitching_side,
        stats: PlayerStats {
            hit_vs_l: rates,
            hit_vs_r: rates,
            pitch_vs_l: rates,
            pitch_vs_r: rates,
        },
    }
}

fn team(name: &str, first_batter: u32, starter: u32) -> TeamLineup {
    TeamLineup {
        team_name: name.to_string(),
        lineup: (first_batter..first_batter + 9)
            .map(|id| player(id, Handedness::Right, Handedness::Right))
            .collect(),
        starting_pitcher: player(starter, Handedness::Right, Handedness::Right),
        bullpen: (starter + 1..starter + 3)
            .map(|id| player(id, Handedness::Right, Handedness::Left))
            .collect(),
    }
}

/// Nine right-handed batters per side, a starter and two relievers.
pub fn simple_lineups() -> MatchupLineups {
    MatchupLineups {
        away: team("Visitors", 1, AWAY_STARTER),
        home: team("Hosts", 11, HOME_STARTER),
    }
}

/// The same rates for every batter and pitcher.
pub struct FixedRates(pub EventProbabilities);

impl PlateAppearanceModel for FixedRates {
    fn draw_event(
        &self,
        _batting_side: TeamSide,
        _batter: u32,
        _pitcher: u32,
        rng: &mut fastrand::Rng,
    ) -> Result<EventType, SimError> {
        Ok(self.0.draw(rng.f64()))
    }
}

/// Always produces the same event.
pub struct Always(pub EventType);

impl PlateAppearanceModel for Always {
    fn draw_event(
        &self,
        _batting_side: TeamSide,
        _batter: u32,
        _pitcher: u32,
        _rng: &mut fastrand::Rng,
    ) -> Result<EventType, SimError> {
        Ok(self.0)
    }
}

/// Plays back a fixed list of events, then strikes everybody out.
pub struct Scripted(Mutex<VecDeque<EventType>>);

impl Scripted {
    pub fn new(events: &[EventType]) -> Self {
        Scripted(Mutex::new(events.iter().copied().collect()))
    }
}

impl PlateAppearanceModel for Scripted {
    fn draw_event(
        &self,
        _batting_side: TeamSide,
        _batter: u32,
        _pitcher: u32,
        _rng: &mut fastrand::Rng,
    ) -> Result<EventType, SimError> {
        let mut events = self.0.lock().expect("Failed to lock script");
        Ok(events.pop_front().unwrap_or(EventType::Strikeout))
    }
}

pub fn context(model: Arc<dyn PlateAppearanceModel>, start: StartingState) -> SimulationContext {
    SimulationContext {
        engine: engine(),
        model,
        lineups: Arc::new(simple_lineups()),
        start,
        markets: Arc::new(MarketConfig::default()),
    }
}

pub fn sample_context() -> SimulationContext {
    SimulationContext::from_input(engine(), sample_matchup(), Arc::new(MarketConfig::default()))
        .expect("Failed to build sample context")
}
