//! Running tallies of settled lines across simulated games.
//!
//! Each worker owns a [`ResultAggregator`]; partial aggregates are merged by
//! summing counts, so the result does not depend on how games were split.

use super::counts::OutcomeCounts;
use super::markets::{MarketConfig, MarketLine, TotalScope};
use super::odds::{margin_of_error, proportion_to_american_odds};
use super::period::Period;
use super::props::{
    FirstInningProps, PlayerPropResult, PlayerProps, PlayerStat, ScoringOrderProps,
};
use crate::error::SimError;
use crate::model::event::TeamSide;
use crate::model::game::GameSummary;

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct ResultAggregator {
    config: Arc<MarketConfig>,
    lines: Arc<[MarketLine]>,
    counts: Vec<OutcomeCounts>,
    first_inning: Option<FirstInningProps>,
    scoring_order: Option<ScoringOrderProps>,
    player_lines: Arc<[(PlayerStat, Vec<f64>)]>,
    player_props: Option<PlayerProps>,
    games: u64,
    total_runs: u64,
}

impl ResultAggregator {
    pub fn new(config: Arc<MarketConfig>) -> Self {
        let lines: Arc<[MarketLine]> = config.expand().into();
        let player_lines: Arc<[(PlayerStat, Vec<f64>)]> = config.player_lines().into();
        Self::with_lines(config, lines, player_lines)
    }

    fn with_lines(
        config: Arc<MarketConfig>,
        lines: Arc<[MarketLine]>,
        player_lines: Arc<[(PlayerStat, Vec<f64>)]>,
    ) -> Self {
        let player_props = (!player_lines.is_empty())
            .then(|| PlayerProps::new(player_lines.iter().map(|(stat, _)| *stat).collect()));
        ResultAggregator {
            counts: vec![OutcomeCounts::default(); lines.len()],
            first_inning: config.first_inning.then(FirstInningProps::default),
            scoring_order: config.scoring_order.then(ScoringOrderProps::default),
            player_props,
            player_lines,
            config,
            lines,
            games: 0,
            total_runs: 0,
        }
    }

    /// Empty aggregator for the same markets; cheap, shares the expanded lines.
    pub fn empty_like(&self) -> Self {
        Self::with_lines(
            Arc::clone(&self.config),
            Arc::clone(&self.lines),
            Arc::clone(&self.player_lines),
        )
    }

    pub fn games(&self) -> u64 {
        self.games
    }

    pub fn record(&mut self, game: &GameSummary) {
        for (line, counts) in self.lines.iter().zip(self.counts.iter_mut()) {
            counts.record(line.settle(game));
        }
        if let Some(props) = self.first_inning.as_mut() {
            props.record(game);
        }
        if let Some(props) = self.scoring_order.as_mut() {
            props.record(game);
        }
        if let Some(props) = self.player_props.as_mut() {
            props.record(game);
        }
        self.games += 1;
        self.total_runs += u64::from(Period::FullGame.combined_runs(game));
    }

    pub fn merge(mut self, other: ResultAggregator) -> Result<Self, SimError> {
        if !Arc::ptr_eq(&self.config, &other.config) && self.config != other.config {
            return Err(SimError::IncompatibleAggregates);
        }
        for (counts, other) in self.counts.iter_mut().zip(other.counts) {
            *counts += other;
        }
        if let (Some(props), Some(other)) =
            (self.first_inning.as_mut(), other.first_inning.as_ref())
        {
            props.merge(other);
        }
        if let (Some(props), Some(other)) =
            (self.scoring_order.as_mut(), other.scoring_order.as_ref())
        {
            props.merge(other);
        }
        if let (Some(props), Some(other)) =
            (self.player_props.as_mut(), other.player_props.as_ref())
        {
            props.merge(other);
        }
        self.games += other.games;
        self.total_runs += other.total_runs;
        Ok(self)
    }

    pub fn finish(&self) -> SimResults {
        let mut sides = Vec::new();
        let mut totals = Vec::new();
        for (line, counts) in self.lines.iter().zip(&self.counts) {
            match *line {
                MarketLine::Side { side, period, line } => sides.push(SideResult {
                    side,
                    period,
                    line,
                    counts: *counts,
                }),
                MarketLine::Total {
                    scope,
                    period,
                    line,
                } => totals.push(TotalResult {
                    scope,
                    period,
                    line,
                    over: *counts,
                    under: counts.mirrored(),
                }),
            }
        }
        let mean_total_runs = if self.games == 0 {
            0.0
        } else {
            self.total_runs as f64 / self.games as f64
        };
        SimResults {
            run_id: Uuid::new_v4(),
            seed: None,
            games: self.games,
            mean_total_runs,
            sides,
            totals,
            first_inning: self.first_inning,
            scoring_order: self.scoring_order,
            player_props: self
                .player_props
                .as_ref()
                .map(|props| props.settle(&self.player_lines, self.games))
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct SideResult {
    pub side: TeamSide,
    pub period: Period,
    pub line: f64,
    pub counts: OutcomeCounts,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct TotalResult {
    pub scope: TotalScope,
    pub period: Period,
    pub line: f64,
    pub over: OutcomeCounts,
    pub under: OutcomeCounts,
}

/// Cover probability and fair prices for one sides line.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct LineSummary {
    pub side: TeamSide,
    pub period: Period,
    pub line: f64,
    pub cover_probability: f64,
    pub margin_of_error: f64,
    pub fair_odds: Option<f64>,
    /// Price at the low end of the confidence interval.
    pub variance_odds: Option<f64>,
}

/// Aggregate output of a matchup simulation.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct SimResults {
    pub run_id: Uuid,
    pub seed: Option<u64>,
    pub games: u64,
    pub mean_total_runs: f64,
    pub sides: Vec<SideResult>,
    pub totals: Vec<TotalResult>,
    pub first_inning: Option<FirstInningProps>,
    pub scoring_order: Option<ScoringOrderProps>,
    pub player_props: Vec<PlayerPropResult>,
}

impl SimResults {
    pub fn side(&self, side: TeamSide, period: Period, line: f64) -> Option<&OutcomeCounts> {
        self.sides
            .iter()
            .find(|r| r.side == side && r.period == period && r.line == line)
            .map(|r| &r.counts)
    }

    pub fn total(&self, scope: TotalScope, period: Period, line: f64) -> Option<&TotalResult> {
        self.totals
            .iter()
            .find(|r| r.scope == scope && r.period == period && r.line == line)
    }

    pub fn player_prop(
        &self,
        player: u32,
        stat: PlayerStat,
        line: f64,
    ) -> Option<&PlayerPropResult> {
        self.player_props
            .iter()
            .find(|r| r.player == player && r.stat == stat && r.line == line)
    }

    /// Full-game moneyline counts for the home team.
    pub fn home_moneyline(&self) -> Option<&OutcomeCounts> {
        self.side(TeamSide::Home, Period::FullGame, 0.0)
    }

    pub fn line_summaries(&self) -> Vec<LineSummary> {
        self.sides
            .iter()
            .map(|result| {
                let cover = result.counts.cover_probability();
                let moe = margin_of_error(result.counts.total, cover);
                LineSummary {
                    side: result.side,
                    period: result.period,
                    line: result.line,
                    cover_probability: cover,
                    margin_of_error: moe,
                    fair_odds: proportion_to_american_odds(cover),
                    variance_odds: proportion_to_american_odds((cover - moe).clamp(0.0, 1.0)),
                }
            })
            .collect()
    }
}
