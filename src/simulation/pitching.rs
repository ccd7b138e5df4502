use crate::model::constants::{
    MIN_BATTERS_BEFORE_SUBSTITUTION, RELIEVER_MAX_BATTERS, STARTER_MAX_BATTERS,
};
use crate::model::event::{PitcherRole, TeamSide};
use crate::model::game::{GameState, PitcherState};

use tracing::trace;

/// Whether the pitcher has reached the workload limit for the role.
pub fn should_substitute(pitcher: &PitcherState) -> bool {
    if pitcher.batters_faced < MIN_BATTERS_BEFORE_SUBSTITUTION {
        return false;
    }
    let limit = match pitcher.role {
        PitcherRole::Starter => STARTER_MAX_BATTERS,
        PitcherRole::Reliever => RELIEVER_MAX_BATTERS,
    };
    pitcher.batters_faced >= limit
}

/// Replaces the fielding side's pitcher with a random reliever once the
/// workload limit is reached. Returns the new pitcher's id, or `None` when no
/// change was made (limit not reached, or the bullpen is empty).
pub fn evaluate_substitution(state: &mut GameState, rng: &mut fastrand::Rng) -> Option<u32> {
    let side = state.fielding_side();
    if !should_substitute(state.pitcher(side)) {
        return None;
    }
    let bullpen = state.bullpen_mut(side);
    if bullpen.is_empty() {
        trace!(?side, "bullpen exhausted, pitcher stays in");
        return None;
    }
    let reliever = bullpen.swap_remove(rng.usize(..bullpen.len()));
    *state.pitcher_mut(side) = PitcherState {
        id: reliever,
        batters_faced: 0,
        role: PitcherRole::Reliever,
    };
    trace!(?side, reliever, "pitching change");
    Some(reliever)
}

/// Pitcher a batter on `batting_side` is facing.
pub fn opposing_pitcher(state: &GameState, batting_side: TeamSide) -> u32 {
    state.pitcher(batting_side.opponent()).id
}
