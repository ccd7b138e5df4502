//! Parallel Monte Carlo runner.
//!
//! Game `i` of a run always uses an RNG seeded with `seed + i`, so the
//! aggregate for a given seed is identical whatever the thread count or
//! batch size.

use super::game::simulate_game;
use super::matchup::{MatchupInput, MatchupProbabilities, PlateAppearanceModel};
use crate::analysis::aggregator::{ResultAggregator, SimResults};
use crate::analysis::markets::MarketConfig;
use crate::error::SimError;
use crate::model::game::StartingState;
use crate::model::team::MatchupLineups;
use crate::transitions::engine::BaserunningEngine;

use rayon::prelude::*;
use std::ops::{ControlFlow, Range};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Everything a worker needs to play games for one matchup. Shared
/// read-only across threads.
#[derive(Clone)]
pub struct SimulationContext {
    pub engine: BaserunningEngine,
    pub model: Arc<dyn PlateAppearanceModel>,
    pub lineups: Arc<MatchupLineups>,
    pub start: StartingState,
    pub markets: Arc<MarketConfig>,
}

impl SimulationContext {
    /// Precomputes matchup probabilities for `input` and bundles them with
    /// the shared engine.
    pub fn from_input(
        engine: BaserunningEngine,
        input: MatchupInput,
        markets: Arc<MarketConfig>,
    ) -> Result<Self, SimError> {
        let model =
            MatchupProbabilities::build(&input.lineups, &input.league_averages, &input.home_field)?;
        Ok(SimulationContext {
            engine,
            model: Arc::new(model),
            lineups: Arc::new(input.lineups),
            start: input.start,
            markets,
        })
    }
}

/// Progress reported to the host between batches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchProgress {
    pub completed: usize,
    pub total: usize,
}

pub fn simulate_matchup(
    ctx: &SimulationContext,
    num_games: usize,
    seed: u64,
) -> Result<SimResults, SimError> {
    let started = Instant::now();
    let aggregator = run_games(ctx, 0..num_games as u64, seed)?;
    let mut results = aggregator.finish();
    results.seed = Some(seed);
    info!(
        games = results.games,
        seed,
        mean_total_runs = results.mean_total_runs,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "simulation complete"
    );
    Ok(results)
}

/// Runs `num_games` in chunks of `batch_size`, calling `on_batch` after
/// each chunk. Returning [`ControlFlow::Break`] cancels the run and discards
/// partial counts (`Ok(None)`).
pub fn simulate_in_batches<F>(
    ctx: &SimulationContext,
    num_games: usize,
    batch_size: usize,
    seed: u64,
    mut on_batch: F,
) -> Result<Option<SimResults>, SimError>
where
    F: FnMut(BatchProgress) -> ControlFlow<()>,
{
    if batch_size == 0 {
        return Err(SimError::InvalidConfig {
            reason: "batch size must be positive".to_string(),
        });
    }
    let started = Instant::now();
    let mut total = ResultAggregator::new(Arc::clone(&ctx.markets));
    let mut completed = 0;

    while completed < num_games {
        let end = (completed + batch_size).min(num_games);
        let batch = run_games(ctx, completed as u64..end as u64, seed)?;
        total = total.merge(batch)?;
        completed = end;
        debug!(completed, total = num_games, "batch finished");

        if on_batch(BatchProgress {
            completed,
            total: num_games,
        })
        .is_break()
        {
            info!(completed, total = num_games, "simulation cancelled");
            return Ok(None);
        }
    }

    let mut results = total.finish();
    results.seed = Some(seed);
    info!(
        games = results.games,
        seed,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "batched simulation complete"
    );
    Ok(Some(results))
}

fn run_games(
    ctx: &SimulationContext,
    games: Range<u64>,
    seed: u64,
) -> Result<ResultAggregator, SimError> {
    let template = ResultAggregator::new(Arc::clone(&ctx.markets));
    games
        .into_par_iter()
        .try_fold(
            || template.empty_like(),
            |mut aggregator, index| {
                let mut rng = fastrand::Rng::with_seed(seed.wrapping_add(index));
                let game = simulate_game(
                    &ctx.engine,
                    ctx.model.as_ref(),
                    &ctx.lineups,
                    &ctx.start,
                    &mut rng,
                )?;
                aggregator.record(&game);
                Ok::<_, SimError>(aggregator)
            },
        )
        .try_reduce(|| template.empty_like(), |a, b| a.merge(b))
}
