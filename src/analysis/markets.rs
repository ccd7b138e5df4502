use super::counts::{settle_below, Settlement};
use super::period::Period;
use super::props::{PlayerPropMarket, PlayerStat};
use crate::error::SimError;
use crate::model::event::TeamSide;
use crate::model::game::GameSummary;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Whose runs a totals line counts.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TotalScope {
    Combined,
    Home,
    Away,
}

impl TotalScope {
    pub fn runs(&self, period: Period, game: &GameSummary) -> u32 {
        match self {
            TotalScope::Combined => period.combined_runs(game),
            TotalScope::Home => period.runs(game, TeamSide::Home),
            TotalScope::Away => period.runs(game, TeamSide::Away),
        }
    }
}

impl fmt::Display for TotalScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TotalScope::Combined => f.write_str("combined"),
            TotalScope::Home => f.write_str("home"),
            TotalScope::Away => f.write_str("away"),
        }
    }
}

/// Run-line (spread) lines for one period, both teams.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SidesMarket {
    pub period: Period,
    pub lines: Vec<f64>,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TotalsMarket {
    pub scope: TotalScope,
    pub period: Period,
    pub lines: Vec<f64>,
}

/// The lines every simulated game is settled against.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MarketConfig {
    #[serde(default = "default_sides")]
    pub sides: Vec<SidesMarket>,
    #[serde(default = "default_totals")]
    pub totals: Vec<TotalsMarket>,
    #[serde(default = "default_first_inning")]
    pub first_inning: bool,
    /// First and last team to score.
    #[serde(default = "default_scoring_order")]
    pub scoring_order: bool,
    #[serde(default = "default_player_props")]
    pub player_props: Vec<PlayerPropMarket>,
}

impl Default for MarketConfig {
    fn default() -> Self {
        MarketConfig {
            sides: default_sides(),
            totals: default_totals(),
            first_inning: default_first_inning(),
            scoring_order: default_scoring_order(),
            player_props: default_player_props(),
        }
    }
}

fn default_sides() -> Vec<SidesMarket> {
    vec![
        SidesMarket {
            period: Period::FullGame,
            lines: vec![1.5],
        },
        SidesMarket {
            period: Period::FirstFive,
            lines: vec![0.5],
        },
    ]
}

fn default_totals() -> Vec<TotalsMarket> {
    let team_full_game = vec![
        2.0, 2.5, 3.0, 3.5, 4.0, 4.5, 5.0, 5.5, 6.0, 6.5, 7.5, 8.0, 8.5,
    ];
    let team_first_five = half_steps(0.5, 4.0);
    vec![
        TotalsMarket {
            scope: TotalScope::Combined,
            period: Period::FullGame,
            lines: half_steps(6.5, 12.0),
        },
        TotalsMarket {
            scope: TotalScope::Combined,
            period: Period::FirstFive,
            lines: half_steps(2.5, 8.5),
        },
        TotalsMarket {
            scope: TotalScope::Home,
            period: Period::FullGame,
            lines: team_full_game.clone(),
        },
        TotalsMarket {
            scope: TotalScope::Away,
            period: Period::FullGame,
            lines: team_full_game,
        },
        TotalsMarket {
            scope: TotalScope::Home,
            period: Period::FirstFive,
            lines: team_first_five.clone(),
        },
        TotalsMarket {
            scope: TotalScope::Away,
            period: Period::FirstFive,
            lines: team_first_five,
        },
    ]
}

fn default_first_inning() -> bool {
    true
}

fn default_scoring_order() -> bool {
    true
}

fn default_player_props() -> Vec<PlayerPropMarket> {
    vec![
        PlayerPropMarket {
            stat: PlayerStat::Hits,
            lines: vec![0.5, 1.5],
        },
        PlayerPropMarket {
            stat: PlayerStat::HomeRuns,
            lines: vec![0.5],
        },
        PlayerPropMarket {
            stat: PlayerStat::RunsBattedIn,
            lines: vec![0.5, 1.5],
        },
        PlayerPropMarket {
            stat: PlayerStat::Strikeouts,
            lines: vec![3.5, 4.5, 5.5, 6.5],
        },
    ]
}

fn half_steps(from: f64, to: f64) -> Vec<f64> {
    let steps = ((to - from) * 2.0).round() as usize;
    (0..=steps).map(|i| from + i as f64 * 0.5).collect()
}

/// One concrete line to settle, after expansion of a [`MarketConfig`].
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
#[serde(tag = "market", rename_all = "lowercase")]
pub enum MarketLine {
    Side {
        side: TeamSide,
        period: Period,
        line: f64,
    },
    /// Settled from the over's point of view.
    Total {
        scope: TotalScope,
        period: Period,
        line: f64,
    },
}

impl MarketLine {
    pub fn settle(&self, game: &GameSummary) -> Settlement {
        match *self {
            MarketLine::Side { side, period, line } => {
                let own = f64::from(period.runs(game, side));
                let opponent = f64::from(period.runs(game, side.opponent()));
                settle_below(opponent - own, line)
            }
            MarketLine::Total {
                scope,
                period,
                line,
            } => {
                let runs = f64::from(scope.runs(period, game));
                // Over: the mirror of "below".
                settle_below(-runs, -line)
            }
        }
    }
}

impl MarketConfig {
    pub fn validate(&self) -> Result<(), SimError> {
        let lines = self
            .sides
            .iter()
            .flat_map(|m| m.lines.iter())
            .chain(self.totals.iter().flat_map(|m| m.lines.iter()))
            .chain(self.player_props.iter().flat_map(|m| m.lines.iter()));
        for line in lines {
            if !line.is_finite() {
                return Err(SimError::InvalidConfig {
                    reason: format!("market line {line} is not a finite number"),
                });
            }
        }
        let periods = self
            .sides
            .iter()
            .map(|m| m.period)
            .chain(self.totals.iter().map(|m| m.period));
        for period in periods {
            if period == Period::Inning(0) {
                return Err(SimError::InvalidConfig {
                    reason: "innings are numbered from 1".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Every line the aggregator settles, in a stable order.
    ///
    /// Sides: the full-game moneyline (0) is always included and every
    /// positive line also adds its negative, for each team. Totals: the
    /// configured lines, deduplicated and sorted.
    pub fn expand(&self) -> Vec<MarketLine> {
        let mut expanded = Vec::new();

        let mut side_periods: Vec<(Period, Vec<f64>)> = Vec::new();
        let mut add_side_line = |period: Period, line: f64| {
            match side_periods.iter_mut().find(|(p, _)| *p == period) {
                Some((_, lines)) => lines.push(line),
                None => side_periods.push((period, vec![line])),
            }
        };
        add_side_line(Period::FullGame, 0.0);
        for market in &self.sides {
            for &line in &market.lines {
                add_side_line(market.period, line);
                if line > 0.0 {
                    add_side_line(market.period, -line);
                }
            }
        }
        for (period, mut lines) in side_periods {
            sort_dedup(&mut lines);
            for side in [TeamSide::Home, TeamSide::Away] {
                expanded.extend(
                    lines
                        .iter()
                        .map(|&line| MarketLine::Side { side, period, line }),
                );
            }
        }

        for market in &self.totals {
            let mut lines = market.lines.clone();
            sort_dedup(&mut lines);
            expanded.extend(lines.into_iter().map(|line| MarketLine::Total {
                scope: market.scope,
                period: market.period,
                line,
            }));
        }
        expanded
    }

    /// Player prop lines grouped by stat, deduplicated and sorted.
    pub fn player_lines(&self) -> Vec<(PlayerStat, Vec<f64>)> {
        let mut grouped: Vec<(PlayerStat, Vec<f64>)> = Vec::new();
        for market in &self.player_props {
            match grouped.iter_mut().find(|(stat, _)| *stat == market.stat) {
                Some((_, lines)) => lines.extend_from_slice(&market.lines),
                None => grouped.push((market.stat, market.lines.clone())),
            }
        }
        grouped.retain(|(_, lines)| !lines.is_empty());
        for (_, lines) in &mut grouped {
            sort_dedup(lines);
        }
        grouped
    }
}

fn sort_dedup(lines: &mut Vec<f64>) {
    lines.sort_by(f64::total_cmp);
    lines.dedup();
}
