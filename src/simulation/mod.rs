pub mod batch;
pub mod game;
pub mod matchup;
pub mod pitching;

pub use batch::{simulate_in_batches, simulate_matchup, BatchProgress, SimulationContext};
pub use game::simulate_game;
pub use matchup::{
    HomeFieldMultipliers, LeagueAverages, LeagueTotals, MatchupInput, MatchupProbabilities,
    PlateAppearanceModel,
};
