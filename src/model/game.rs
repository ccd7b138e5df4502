use super::bases::BaseState;
use super::constants::{
    EXTRA_INNING_RUNNER, OUTS_PER_HALF, REGULATION_INNINGS,
};
use super::event::{EventType, PitcherRole, TeamSide};
use super::player::Player;
use super::team::{MatchupLineups, TeamLineup};
use crate::error::SimError;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Runs per inning for both sides. Index 0 is the first inning.
#[derive(Debug, PartialEq, Eq, Clone, Default, Serialize, Deserialize)]
pub struct LineScore {
    #[serde(default)]
    pub away: Vec<u32>,
    #[serde(default)]
    pub home: Vec<u32>,
}

impl LineScore {
    fn innings_mut(&mut self, side: TeamSide) -> &mut Vec<u32> {
        match side {
            TeamSide::Away => &mut self.away,
            TeamSide::Home => &mut self.home,
        }
    }

    pub fn innings(&self, side: TeamSide) -> &[u32] {
        match side {
            TeamSide::Away => &self.away,
            TeamSide::Home => &self.home,
        }
    }

    /// Credits `runs` to `side` in the 1-based `inning`.
    pub fn add_runs(&mut self, side: TeamSide, inning: u16, runs: u32) {
        let index = usize::from(inning.max(1)) - 1;
        let innings = self.innings_mut(side);
        if innings.len() <= index {
            innings.resize(index + 1, 0);
        }
        innings[index] += runs;
    }

    pub fn total(&self, side: TeamSide) -> u32 {
        self.innings(side).iter().sum()
    }

    /// Runs scored by `side` in innings `1..=inning`.
    pub fn through(&self, side: TeamSide, inning: u16) -> u32 {
        self.innings(side)
            .iter()
            .take(usize::from(inning))
            .sum()
    }

    /// Runs scored by `side` in the 1-based `inning` alone.
    pub fn in_inning(&self, side: TeamSide, inning: u16) -> u32 {
        match usize::from(inning).checked_sub(1) {
            Some(index) => self.innings(side).get(index).copied().unwrap_or(0),
            None => 0,
        }
    }
}

/// The pitcher currently on the mound for one side.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PitcherState {
    pub id: u32,
    #[serde(default)]
    pub batters_faced: u32,
    pub role: PitcherRole,
}

impl PitcherState {
    pub fn starter(pitcher: &Player) -> Self {
        PitcherState {
            id: pitcher.id,
            batters_faced: 0,
            role: PitcherRole::Starter,
        }
    }

    pub fn reliever(pitcher: &Player) -> Self {
        PitcherState {
            id: pitcher.id,
            batters_faced: 0,
            role: PitcherRole::Reliever,
        }
    }
}

/// Where a simulation picks up. The default is the first pitch of a new game.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StartingState {
    pub inning: u16,
    pub top_inning: bool,
    pub outs: u8,
    pub bases: BaseState,
    pub line_score: LineScore,
    pub away_lineup_pos: usize,
    pub home_lineup_pos: usize,
    /// Pitcher on the mound for the away side; the starter when absent.
    pub away_pitcher: Option<PitcherState>,
    /// Pitcher on the mound for the home side; the starter when absent.
    pub home_pitcher: Option<PitcherState>,
}

impl Default for StartingState {
    fn default() -> Self {
        StartingState {
            inning: 1,
            top_inning: true,
            outs: 0,
            bases: BaseState::EMPTY,
            line_score: LineScore::default(),
            away_lineup_pos: 0,
            home_lineup_pos: 0,
            away_pitcher: None,
            home_pitcher: None,
        }
    }
}

/// One batter's line for a single game.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default, Serialize, Deserialize)]
pub struct BattingLine {
    pub plate_appearances: u32,
    pub hits: u32,
    pub home_runs: u32,
    /// Every run that scored on the batter's plate appearances.
    pub runs_batted_in: u32,
}

/// One pitcher's line for a single game.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PitchingLine {
    pub batters_faced: u32,
    pub strikeouts: u32,
}

/// Scoring order and player lines for the plays simulated in one game.
/// Runs already on the starting line score are not attributed.
#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
pub struct BoxScore {
    pub first_to_score: Option<TeamSide>,
    pub last_to_score: Option<TeamSide>,
    pub batting: BTreeMap<u32, BattingLine>,
    pub pitching: BTreeMap<u32, PitchingLine>,
}

impl BoxScore {
    pub fn record_play(
        &mut self,
        batting_side: TeamSide,
        batter: u32,
        pitcher: u32,
        event: EventType,
        runs: u32,
    ) {
        if runs > 0 {
            self.first_to_score.get_or_insert(batting_side);
            self.last_to_score = Some(batting_side);
        }

        let line = self.batting.entry(batter).or_default();
        line.plate_appearances += 1;
        line.runs_batted_in += runs;
        if event.is_hit() {
            line.hits += 1;
        }
        if event == EventType::HomeRun {
            line.home_runs += 1;
        }

        let line = self.pitching.entry(pitcher).or_default();
        line.batters_faced += 1;
        if event == EventType::Strikeout {
            line.strikeouts += 1;
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct GameState {
    pub inning: u16,
    pub top_inning: bool,
    pub outs: u8,
    pub bases: BaseState,
    pub line_score: LineScore,
    pub away_lineup_pos: usize,
    pub home_lineup_pos: usize,
    pub away_pitcher: PitcherState,
    pub home_pitcher: PitcherState,
    pub away_bullpen: Vec<u32>,
    pub home_bullpen: Vec<u32>,
    pub plate_appearances: u32,
    pub box_score: BoxScore,
}

impl GameState {
    /// Builds the live state for `lineups` from a validated starting point.
    pub fn new(lineups: &MatchupLineups, start: &StartingState) -> Result<Self, SimError> {
        if start.inning == 0 {
            return Err(SimError::InvalidGameState {
                reason: "innings are numbered from 1".to_string(),
            });
        }
        if start.outs >= OUTS_PER_HALF {
            return Err(SimError::InvalidGameState {
                reason: format!("cannot start a half inning with {} outs", start.outs),
            });
        }
        check_lineup(&lineups.away, start.away_lineup_pos, "away")?;
        check_lineup(&lineups.home, start.home_lineup_pos, "home")?;

        let away_pitcher = resolve_pitcher(&lineups.away, start.away_pitcher)?;
        let home_pitcher = resolve_pitcher(&lineups.home, start.home_pitcher)?;

        Ok(GameState {
            inning: start.inning,
            top_inning: start.top_inning,
            outs: start.outs,
            bases: start.bases,
            line_score: start.line_score.clone(),
            away_lineup_pos: start.away_lineup_pos,
            home_lineup_pos: start.home_lineup_pos,
            away_bullpen: bullpen_without(&lineups.away, away_pitcher.id),
            home_bullpen: bullpen_without(&lineups.home, home_pitcher.id),
            away_pitcher,
            home_pitcher,
            plate_appearances: 0,
            box_score: BoxScore::default(),
        })
    }

    pub fn batting_side(&self) -> TeamSide {
        if self.top_inning {
            TeamSide::Away
        } else {
            TeamSide::Home
        }
    }

    pub fn fielding_side(&self) -> TeamSide {
        self.batting_side().opponent()
    }

    pub fn score(&self, side: TeamSide) -> u32 {
        self.line_score.total(side)
    }

    pub fn lineup_pos(&self, side: TeamSide) -> usize {
        match side {
            TeamSide::Away => self.away_lineup_pos,
            TeamSide::Home => self.home_lineup_pos,
        }
    }

    pub fn lineup_pos_mut(&mut self, side: TeamSide) -> &mut usize {
        match side {
            TeamSide::Away => &mut self.away_lineup_pos,
            TeamSide::Home => &mut self.home_lineup_pos,
        }
    }

    pub fn pitcher(&self, side: TeamSide) -> &PitcherState {
        match side {
            TeamSide::Away => &self.away_pitcher,
            TeamSide::Home => &self.home_pitcher,
        }
    }

    pub fn pitcher_mut(&mut self, side: TeamSide) -> &mut PitcherState {
        match side {
            TeamSide::Away => &mut self.away_pitcher,
            TeamSide::Home => &mut self.home_pitcher,
        }
    }

    pub fn bullpen_mut(&mut self, side: TeamSide) -> &mut Vec<u32> {
        match side {
            TeamSide::Away => &mut self.away_bullpen,
            TeamSide::Home => &mut self.home_bullpen,
        }
    }

    pub fn is_half_over(&self) -> bool {
        self.outs >= OUTS_PER_HALF
    }

    /// True once the game has a winner:
    /// - the home side leads at any point of the bottom of the 9th or later
    ///   (walk-off, or the bottom half is skipped after the top of the 9th+);
    /// - a bottom half of the 9th or later finished with the scores apart.
    pub fn is_over(&self) -> bool {
        let away = self.score(TeamSide::Away);
        let home = self.score(TeamSide::Home);
        if self.inning < REGULATION_INNINGS {
            return false;
        }
        if self.top_inning {
            // Top half complete and the home side is ahead: bottom half not played.
            return self.is_half_over() && home > away;
        }
        home > away || (self.is_half_over() && home != away)
    }

    /// Rolls over to the next half inning once three outs are recorded.
    pub fn advance_half_inning(&mut self) {
        if !self.is_half_over() {
            return;
        }
        if !self.top_inning {
            self.inning += 1;
        }
        self.top_inning = !self.top_inning;
        self.outs = 0;
        self.bases = if self.inning > REGULATION_INNINGS {
            BaseState::from(EXTRA_INNING_RUNNER)
        } else {
            BaseState::EMPTY
        };
    }
}

fn check_lineup(team: &TeamLineup, pos: usize, label: &str) -> Result<(), SimError> {
    if team.lineup.is_empty() {
        return Err(SimError::InvalidGameState {
            reason: format!("{label} lineup is empty"),
        });
    }
    if pos >= team.lineup.len() {
        return Err(SimError::InvalidGameState {
            reason: format!(
                "{label} lineup position {pos} is past the end of a {}-man lineup",
                team.lineup.len()
            ),
        });
    }
    Ok(())
}

fn resolve_pitcher(
    team: &TeamLineup,
    current: Option<PitcherState>,
) -> Result<PitcherState, SimError> {
    match current {
        None => Ok(PitcherState::starter(&team.starting_pitcher)),
        Some(pitcher) if team.pitchers().any(|p| p.id == pitcher.id) => Ok(pitcher),
        Some(pitcher) => Err(SimError::InvalidGameState {
            reason: format!(
                "pitcher {} is not on the {:?} staff",
                pitcher.id, team.team_name
            ),
        }),
    }
}

fn bullpen_without(team: &TeamLineup, pitcher_id: u32) -> Vec<u32> {
    team.bullpen
        .iter()
        .map(|p| p.id)
        .filter(|&id| id != pitcher_id)
        .collect()
}

/// Terminal record of one simulated game, the unit the aggregator consumes.
#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
pub struct GameSummary {
    pub line_score: LineScore,
    /// Last inning in which a plate appearance happened.
    pub innings: u16,
    pub plate_appearances: u32,
    #[serde(default)]
    pub box_score: BoxScore,
}

impl GameSummary {
    pub fn final_score(&self, side: TeamSide) -> u32 {
        self.line_score.total(side)
    }

    pub fn winner(&self) -> Option<TeamSide> {
        let away = self.final_score(TeamSide::Away);
        let home = self.final_score(TeamSide::Home);
        match home.cmp(&away) {
            std::cmp::Ordering::Greater => Some(TeamSide::Home),
            std::cmp::Ordering::Less => Some(TeamSide::Away),
            std::cmp::Ordering::Equal => None,
        }
    }
}
