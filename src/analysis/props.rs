//! Yes/no and over/under props: first-inning scoring, scoring order and
//! per-player stat lines.

use super::counts::{settle_below, OutcomeCounts, Settlement};
use super::period::Period;
use crate::model::event::TeamSide;
use crate::model::game::{BoxScore, GameSummary};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

fn yes_no(happened: bool) -> Settlement {
    if happened {
        Settlement::Success
    } else {
        Settlement::Failure
    }
}

/// "Scores in the first inning" tallies; success means a run scored.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default, Serialize, Deserialize)]
pub struct FirstInningProps {
    pub away: OutcomeCounts,
    pub home: OutcomeCounts,
    pub either: OutcomeCounts,
}

impl FirstInningProps {
    pub fn record(&mut self, game: &GameSummary) {
        let away = Period::Inning(1).runs(game, TeamSide::Away) > 0;
        let home = Period::Inning(1).runs(game, TeamSide::Home) > 0;
        self.away.record(yes_no(away));
        self.home.record(yes_no(home));
        self.either.record(yes_no(away || home));
    }

    pub fn merge(&mut self, other: &FirstInningProps) {
        self.away += other.away;
        self.home += other.home;
        self.either += other.either;
    }
}

/// One yes/no count per team.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TeamCounts {
    pub away: OutcomeCounts,
    pub home: OutcomeCounts,
}

impl TeamCounts {
    /// Success for the side that did it, failure for the other. A scoreless
    /// game is a failure for both.
    fn record(&mut self, side: Option<TeamSide>) {
        self.away.record(yes_no(side == Some(TeamSide::Away)));
        self.home.record(yes_no(side == Some(TeamSide::Home)));
    }

    fn merge(&mut self, other: &TeamCounts) {
        self.away += other.away;
        self.home += other.home;
    }
}

/// First and last team to score.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ScoringOrderProps {
    pub first: TeamCounts,
    pub last: TeamCounts,
}

impl ScoringOrderProps {
    pub fn record(&mut self, game: &GameSummary) {
        self.first.record(game.box_score.first_to_score);
        self.last.record(game.box_score.last_to_score);
    }

    pub fn merge(&mut self, other: &ScoringOrderProps) {
        self.first.merge(&other.first);
        self.last.merge(&other.last);
    }
}

/// A counting stat a player prop is written on.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlayerStat {
    #[serde(rename = "H")]
    Hits,
    #[serde(rename = "HR")]
    HomeRuns,
    #[serde(rename = "RBI")]
    RunsBattedIn,
    /// Strikeouts recorded as a pitcher.
    #[serde(rename = "Ks")]
    Strikeouts,
}

impl PlayerStat {
    /// The player's value in one game, or `None` when the player did not bat (or
    /// pitch, for strikeouts).
    pub fn value(&self, box_score: &BoxScore, player: u32) -> Option<u32> {
        match self {
            PlayerStat::Hits => box_score.batting.get(&player).map(|line| line.hits),
            PlayerStat::HomeRuns => box_score.batting.get(&player).map(|line| line.home_runs),
            PlayerStat::RunsBattedIn => box_score
                .batting
                .get(&player)
                .map(|line| line.runs_batted_in),
            PlayerStat::Strikeouts => box_score.pitching.get(&player).map(|line| line.strikeouts),
        }
    }

    fn is_pitching(&self) -> bool {
        matches!(self, PlayerStat::Strikeouts)
    }
}

impl fmt::Display for PlayerStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerStat::Hits => f.write_str("H"),
            PlayerStat::HomeRuns => f.write_str("HR"),
            PlayerStat::RunsBattedIn => f.write_str("RBI"),
            PlayerStat::Strikeouts => f.write_str("Ks"),
        }
    }
}

/// Over/under lines for one stat, offered for every player who records it.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlayerPropMarket {
    pub stat: PlayerStat,
    pub lines: Vec<f64>,
}

/// Number of games per stat value, over the games a player appeared in.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
struct StatHistogram {
    values: BTreeMap<u32, u64>,
    games: u64,
}

impl StatHistogram {
    fn record(&mut self, value: u32) {
        *self.values.entry(value).or_default() += 1;
        self.games += 1;
    }

    fn merge(&mut self, other: &StatHistogram) {
        for (&value, &games) in &other.values {
            *self.values.entry(value).or_default() += games;
        }
        self.games += other.games;
    }

    /// Settles `line` as an over across `total_games`. Games the player sat
    /// out count as zero.
    fn settle_over(&self, line: f64, total_games: u64) -> OutcomeCounts {
        let over = |value: u32| settle_below(-f64::from(value), -line);
        let mut counts = OutcomeCounts::default();
        for (&value, &games) in &self.values {
            counts.record_many(over(value), games);
        }
        counts.record_many(over(0), total_games.saturating_sub(self.games));
        counts
    }
}

/// Per-player stat tallies. A player gets an entry for a stat the first
/// time the player records it in a batting (or pitching) role.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct PlayerProps {
    stats: Vec<PlayerStat>,
    tallies: BTreeMap<(u32, PlayerStat), StatHistogram>,
}

impl PlayerProps {
    pub fn new(stats: Vec<PlayerStat>) -> Self {
        PlayerProps {
            stats,
            tallies: BTreeMap::new(),
        }
    }

    pub fn record(&mut self, game: &GameSummary) {
        let box_score = &game.box_score;
        for &stat in &self.stats {
            let players: Vec<u32> = if stat.is_pitching() {
                box_score.pitching.keys().copied().collect()
            } else {
                box_score.batting.keys().copied().collect()
            };
            for player in players {
                if let Some(value) = stat.value(box_score, player) {
                    self.tallies.entry((player, stat)).or_default().record(value);
                }
            }
        }
    }

    pub fn merge(&mut self, other: &PlayerProps) {
        for (key, histogram) in &other.tallies {
            self.tallies.entry(*key).or_default().merge(histogram);
        }
    }

    /// Settled counts for every (player, stat, line), players in id order.
    pub fn settle(
        &self,
        lines: &[(PlayerStat, Vec<f64>)],
        total_games: u64,
    ) -> Vec<PlayerPropResult> {
        let mut results = Vec::new();
        for (&(player, stat), histogram) in &self.tallies {
            let Some((_, stat_lines)) = lines.iter().find(|(s, _)| *s == stat) else {
                continue;
            };
            for &line in stat_lines {
                let over = histogram.settle_over(line, total_games);
                results.push(PlayerPropResult {
                    player,
                    stat,
                    line,
                    over,
                    under: over.mirrored(),
                });
            }
        }
        results
    }
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct PlayerPropResult {
    pub player: u32,
    pub stat: PlayerStat,
    pub line: f64,
    pub over: OutcomeCounts,
    pub under: OutcomeCounts,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::event::EventType;
    use crate::model::game::LineScore;

    fn game(plays: &[(TeamSide, u32, u32, EventType, u32)]) -> GameSummary {
        let mut summary = GameSummary {
            line_score: LineScore::default(),
            innings: 9,
            ..GameSummary::default()
        };
        for &(side, batter, pitcher, event, runs) in plays {
            summary
                .box_score
                .record_play(side, batter, pitcher, event, runs);
            summary.line_score.add_runs(side, 1, runs);
        }
        summary
    }

    #[test]
    fn scoring_order_counts_both_teams() {
        let mut props = ScoringOrderProps::default();
        props.record(&game(&[
            (TeamSide::Away, 1, 60, EventType::HomeRun, 1),
            (TeamSide::Home, 11, 50, EventType::Double, 2),
        ]));
        props.record(&game(&[(TeamSide::Away, 1, 60, EventType::Out, 0)]));

        assert_eq!(props.first.away.success, 1);
        assert_eq!(props.first.home.success, 0);
        assert_eq!(props.last.home.success, 1);
        assert_eq!(props.last.away.success, 0);
        // Scoreless game fails for both.
        assert_eq!(props.first.away.failure, 1);
        assert_eq!(props.first.home.failure, 2);
        assert_eq!(props.first.away.total, 2);
    }

    #[test]
    fn player_absent_from_a_game_counts_as_zero() {
        let mut props = PlayerProps::new(vec![PlayerStat::Hits, PlayerStat::Strikeouts]);
        props.record(&game(&[
            (TeamSide::Away, 1, 60, EventType::Single, 0),
            (TeamSide::Away, 1, 60, EventType::Double, 0),
            (TeamSide::Away, 2, 60, EventType::Strikeout, 0),
        ]));
        props.record(&game(&[(TeamSide::Away, 2, 61, EventType::Single, 0)]));

        let lines = vec![
            (PlayerStat::Hits, vec![0.5, 2.0]),
            (PlayerStat::Strikeouts, vec![0.5]),
        ];
        let results = props.settle(&lines, 2);
        let find = |player, stat, line| {
            results
                .iter()
                .find(|r| r.player == player && r.stat == stat && r.line == line)
                .unwrap()
        };

        let batter = find(1, PlayerStat::Hits, 0.5);
        assert_eq!((batter.over.success, batter.over.failure), (1, 1));
        let two_hits = find(1, PlayerStat::Hits, 2.0);
        assert_eq!((two_hits.over.push, two_hits.over.failure), (1, 1));
        assert_eq!(find(2, PlayerStat::Hits, 0.5).over.success, 1);
        assert_eq!(find(60, PlayerStat::Strikeouts, 0.5).over.success, 1);
        assert_eq!(find(61, PlayerStat::Strikeouts, 0.5).under.success, 2);
        // Pitchers get no hitting props.
        assert!(results
            .iter()
            .all(|r| r.stat != PlayerStat::Hits || r.player < 50));
    }

    #[test]
    fn merged_tallies_match_one_pass() {
        let games = [
            game(&[(TeamSide::Home, 11, 50, EventType::HomeRun, 3)]),
            game(&[(TeamSide::Home, 11, 50, EventType::Walk, 0)]),
            game(&[(TeamSide::Home, 12, 50, EventType::Single, 1)]),
        ];
        let stats = vec![PlayerStat::RunsBattedIn];
        let mut whole = PlayerProps::new(stats.clone());
        games.iter().for_each(|g| whole.record(g));

        let mut left = PlayerProps::new(stats.clone());
        let mut right = PlayerProps::new(stats);
        left.record(&games[0]);
        right.record(&games[1]);
        right.record(&games[2]);
        left.merge(&right);

        let lines = vec![(PlayerStat::RunsBattedIn, vec![0.5, 2.5])];
        assert_eq!(left.settle(&lines, 3), whole.settle(&lines, 3));
    }
}
