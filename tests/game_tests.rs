mod common;

use std::sync::Arc;

use ballpark_core::error::SimError;
use ballpark_core::model::bases::BaseState;
use ballpark_core::model::event::{EventType, PitcherRole, TeamSide};
use ballpark_core::model::game::{GameState, LineScore, PitcherState, StartingState};
use ballpark_core::simulation::game::simulate_game;
use ballpark_core::simulation::matchup::MatchupProbabilities;
use ballpark_core::simulation::pitching::evaluate_substitution;

use common::{Always, FixedRates, Scripted};

fn tied_bottom_ninth() -> StartingState {
    StartingState {
        inning: 9,
        top_inning: false,
        line_score: LineScore {
            away: vec![0; 9],
            home: vec![0; 8],
        },
        ..StartingState::default()
    }
}

#[test]
fn test_walk_off_ends_the_game_immediately() {
    let mut rng = fastrand::Rng::with_seed(3);
    let game = simulate_game(
        &common::engine(),
        &Always(EventType::HomeRun),
        &common::simple_lineups(),
        &tied_bottom_ninth(),
        &mut rng,
    )
    .expect("Failed to simulate game");
    assert_eq!(game.plate_appearances, 1);
    assert_eq!(game.innings, 9);
    assert_eq!(game.final_score(TeamSide::Home), 1);
    assert_eq!(game.winner(), Some(TeamSide::Home));
}

#[test]
fn test_bottom_of_ninth_skipped_when_home_leads() {
    let start = StartingState {
        inning: 9,
        top_inning: true,
        line_score: LineScore {
            away: vec![0; 8],
            home: vec![1, 0, 0, 0, 0, 0, 0, 0],
        },
        ..StartingState::default()
    };
    let mut rng = fastrand::Rng::with_seed(3);
    let game = simulate_game(
        &common::engine(),
        &Always(EventType::Strikeout),
        &common::simple_lineups(),
        &start,
        &mut rng,
    )
    .expect("Failed to simulate game");
    assert_eq!(game.plate_appearances, 3);
    assert_eq!(game.innings, 9);
    assert_eq!(game.line_score.home.len(), 8);
    assert_eq!(game.winner(), Some(TeamSide::Home));
}

#[test]
fn test_extra_innings_start_with_runner_on_second() {
    // Bottom 9 goes down in order, then the away side homers with the
    // automatic runner aboard and the home side fails to answer.
    let script = Scripted::new(&[
        EventType::Strikeout,
        EventType::Strikeout,
        EventType::Strikeout,
        EventType::HomeRun,
    ]);
    let mut rng = fastrand::Rng::with_seed(3);
    let game = simulate_game(
        &common::engine(),
        &script,
        &common::simple_lineups(),
        &tied_bottom_ninth(),
        &mut rng,
    )
    .expect("Failed to simulate game");
    assert_eq!(game.innings, 10);
    assert_eq!(game.line_score.in_inning(TeamSide::Away, 10), 2);
    assert_eq!(game.line_score.in_inning(TeamSide::Home, 10), 0);
    assert_eq!(game.winner(), Some(TeamSide::Away));
    assert_eq!(game.plate_appearances, 3 + 4 + 3);
}

#[test]
fn test_full_games_always_have_a_winner() {
    let engine = common::engine();
    let lineups = common::simple_lineups();
    let model = FixedRates(common::league_rates());
    for seed in 0..200 {
        let mut rng = fastrand::Rng::with_seed(seed);
        let game = simulate_game(&engine, &model, &lineups, &StartingState::default(), &mut rng)
            .expect("Failed to simulate game");
        assert!(game.winner().is_some());
        assert!(game.innings >= 9);
        // 17 half innings at the least, a double play at most per batter.
        assert!(game.plate_appearances >= 34);
    }
}

#[test]
fn test_box_score_accounts_for_every_run() {
    let engine = common::engine();
    let lineups = common::simple_lineups();
    let model = FixedRates(common::league_rates());
    for seed in 0..50 {
        let mut rng = fastrand::Rng::with_seed(seed);
        let game = simulate_game(&engine, &model, &lineups, &StartingState::default(), &mut rng)
            .expect("Failed to simulate game");
        let box_score = &game.box_score;

        for side in [TeamSide::Away, TeamSide::Home] {
            let rbi: u32 = lineups
                .team(side)
                .lineup
                .iter()
                .filter_map(|p| box_score.batting.get(&p.id))
                .map(|line| line.runs_batted_in)
                .sum();
            assert_eq!(rbi, game.final_score(side));
        }
        let plate_appearances: u32 = box_score
            .batting
            .values()
            .map(|line| line.plate_appearances)
            .sum();
        let batters_faced: u32 = box_score
            .pitching
            .values()
            .map(|line| line.batters_faced)
            .sum();
        assert_eq!(plate_appearances, game.plate_appearances);
        assert_eq!(batters_faced, game.plate_appearances);

        // Someone always wins, so someone scored.
        assert!(box_score.first_to_score.is_some());
        assert!(box_score.last_to_score.is_some());
    }
}

#[test]
fn test_sample_matchup_plays_to_completion() {
    let input = common::sample_matchup();
    let model = MatchupProbabilities::build(
        &input.lineups,
        &input.league_averages,
        &input.home_field,
    )
    .expect("Failed to build matchup probabilities");
    let mut rng = fastrand::Rng::with_seed(9);
    let game = simulate_game(&common::engine(), &model, &input.lineups, &input.start, &mut rng)
        .expect("Failed to simulate game");
    assert!(game.winner().is_some());
}

#[test]
fn test_endless_game_is_cut_off() {
    // Nobody ever records an out.
    let mut rng = fastrand::Rng::with_seed(1);
    let result = simulate_game(
        &common::engine(),
        &Always(EventType::Walk),
        &common::simple_lineups(),
        &StartingState::default(),
        &mut rng,
    );
    assert!(matches!(result, Err(SimError::InvalidGameState { .. })));
}

#[test]
fn test_missing_transition_ends_the_game_with_an_error() {
    // The sample table has no stolen-base rows.
    let mut rng = fastrand::Rng::with_seed(1);
    let result = simulate_game(
        &common::engine(),
        &Always(EventType::StolenBase),
        &common::simple_lineups(),
        &StartingState::default(),
        &mut rng,
    );
    assert!(matches!(
        result,
        Err(SimError::MissingTransition {
            event: EventType::StolenBase,
            ..
        })
    ));
}

#[test]
fn test_unknown_pair_is_a_missing_matchup() {
    let mut rng = fastrand::Rng::with_seed(1);
    let result = simulate_game(
        &common::engine(),
        &MatchupProbabilities::default(),
        &common::simple_lineups(),
        &StartingState::default(),
        &mut rng,
    );
    assert!(matches!(
        result,
        Err(SimError::MissingMatchup {
            batter: 1,
            pitcher: common::HOME_STARTER
        })
    ));
}

#[test]
fn test_invalid_starting_states() {
    let lineups = common::simple_lineups();
    let three_outs = StartingState {
        outs: 3,
        ..StartingState::default()
    };
    assert!(GameState::new(&lineups, &three_outs).is_err());

    let past_lineup = StartingState {
        home_lineup_pos: 9,
        ..StartingState::default()
    };
    assert!(GameState::new(&lineups, &past_lineup).is_err());

    let stranger = StartingState {
        away_pitcher: Some(PitcherState {
            id: 999,
            batters_faced: 0,
            role: PitcherRole::Reliever,
        }),
        ..StartingState::default()
    };
    assert!(GameState::new(&lineups, &stranger).is_err());
}

#[test]
fn test_mid_game_start_keeps_bases_and_score() {
    let start = StartingState {
        inning: 9,
        top_inning: false,
        outs: 2,
        bases: BaseState::new(true, true, true),
        line_score: LineScore {
            away: vec![3],
            home: vec![0],
        },
        ..StartingState::default()
    };
    let mut rng = fastrand::Rng::with_seed(5);
    let game = simulate_game(
        &common::engine(),
        &Always(EventType::HomeRun),
        &common::simple_lineups(),
        &start,
        &mut rng,
    )
    .expect("Failed to simulate game");
    assert_eq!(game.final_score(TeamSide::Home), 4);
    assert_eq!(game.final_score(TeamSide::Away), 3);
    assert_eq!(game.plate_appearances, 1);
}

#[test]
fn test_tired_starter_is_replaced_from_bullpen() {
    let lineups = common::simple_lineups();
    let start = StartingState {
        home_pitcher: Some(PitcherState {
            id: common::HOME_STARTER,
            batters_faced: 27,
            role: PitcherRole::Starter,
        }),
        ..StartingState::default()
    };
    let mut state = GameState::new(&lineups, &start).expect("Failed to build state");
    let mut rng = fastrand::Rng::with_seed(8);

    // Top of the inning: the home side is in the field.
    let reliever = evaluate_substitution(&mut state, &mut rng).expect("Failed to substitute");
    assert!([common::HOME_STARTER + 1, common::HOME_STARTER + 2].contains(&reliever));
    assert_eq!(state.home_pitcher.role, PitcherRole::Reliever);
    assert_eq!(state.home_pitcher.batters_faced, 0);
    assert_eq!(state.home_bullpen.len(), 1);
    assert!(!state.home_bullpen.contains(&reliever));

    // A fresh reliever stays in.
    assert_eq!(evaluate_substitution(&mut state, &mut rng), None);
}

#[test]
fn test_empty_bullpen_keeps_the_pitcher() {
    let mut lineups = common::simple_lineups();
    lineups.home.bullpen.clear();
    let start = StartingState {
        home_pitcher: Some(PitcherState {
            id: common::HOME_STARTER,
            batters_faced: 40,
            role: PitcherRole::Starter,
        }),
        ..StartingState::default()
    };
    let mut state = GameState::new(&lineups, &start).expect("Failed to build state");
    let mut rng = fastrand::Rng::with_seed(8);
    assert_eq!(evaluate_substitution(&mut state, &mut rng), None);
    assert_eq!(state.home_pitcher.id, common::HOME_STARTER);
}

#[test]
fn test_custom_model_is_shareable() {
    let model: Arc<dyn ballpark_core::simulation::matchup::PlateAppearanceModel> =
        Arc::new(FixedRates(common::league_rates()));
    let ctx = common::context(model, StartingState::default());
    let mut rng = fastrand::Rng::with_seed(11);
    let game = simulate_game(
        &ctx.engine,
        ctx.model.as_ref(),
        &ctx.lineups,
        &ctx.start,
        &mut rng,
    )
    .expect("Failed to simulate game");
    assert!(game.winner().is_some());
}
