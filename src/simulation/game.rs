use super::matchup::PlateAppearanceModel;
use super::pitching::{evaluate_substitution, opposing_pitcher};
use crate::error::SimError;
use crate::model::constants::MAX_PLATE_APPEARANCES;
use crate::model::game::{GameState, GameSummary, StartingState};
use crate::model::team::MatchupLineups;
use crate::transitions::engine::BaserunningEngine;

/// Plays one game from `start` to a decision.
///
/// Each plate appearance draws an event from `model`, resolves baserunning
/// through `engine`, then checks for a walk-off or a completed half inning,
/// evaluates a pitching change and rolls over the half inning.
pub fn simulate_game<M>(
    engine: &BaserunningEngine,
    model: &M,
    lineups: &MatchupLineups,
    start: &StartingState,
    rng: &mut fastrand::Rng,
) -> Result<GameSummary, SimError>
where
    M: PlateAppearanceModel + ?Sized,
{
    let mut state = GameState::new(lineups, start)?;

    while !state.is_over() {
        if state.plate_appearances >= MAX_PLATE_APPEARANCES {
            return Err(SimError::InvalidGameState {
                reason: format!(
                    "game still undecided after {MAX_PLATE_APPEARANCES} plate appearances"
                ),
            });
        }
        play_plate_appearance(&mut state, engine, model, lineups, rng)?;
        if state.is_over() {
            break;
        }
        evaluate_substitution(&mut state, rng);
        state.advance_half_inning();
    }

    Ok(GameSummary {
        line_score: state.line_score,
        innings: state.inning,
        plate_appearances: state.plate_appearances,
        box_score: state.box_score,
    })
}

fn play_plate_appearance<M>(
    state: &mut GameState,
    engine: &BaserunningEngine,
    model: &M,
    lineups: &MatchupLineups,
    rng: &mut fastrand::Rng,
) -> Result<(), SimError>
where
    M: PlateAppearanceModel + ?Sized,
{
    let side = state.batting_side();
    let lineup = &lineups.team(side).lineup;
    let batter = lineup[state.lineup_pos(side)].id;
    let pitcher = opposing_pitcher(state, side);

    let event = model.draw_event(side, batter, pitcher, rng)?;
    let play = engine.process_event(event, state.bases, state.outs, rng)?;

    let runs = u32::from(play.runs_on_play);
    // Credited even when zero so the line score covers every inning played.
    state.line_score.add_runs(side, state.inning, runs);
    state
        .box_score
        .record_play(side, batter, pitcher, event, runs);
    let pos = state.lineup_pos_mut(side);
    *pos = (*pos + 1) % lineup.len();
    state.pitcher_mut(side.opponent()).batters_faced += 1;
    state.bases = play.new_bases;
    state.outs += play.outs_on_play;
    state.plate_appearances += 1;
    Ok(())
}
