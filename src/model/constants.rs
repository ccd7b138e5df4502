// Regulation length of a game; the home half of the last inning is skipped
// when the home team already leads.
pub const REGULATION_INNINGS: u16 = 9;

// "First five" markets settle on the score after five complete innings.
pub const FIRST_FIVE_INNINGS: u16 = 5;

pub const OUTS_PER_HALF: u8 = 3;

// Extra innings start with the previous half's last batter on second.
pub const EXTRA_INNING_RUNNER: [bool; 3] = [false, true, false];

// Pitcher substitution thresholds (batters faced).
pub const MIN_BATTERS_BEFORE_SUBSTITUTION: u32 = 3;
pub const STARTER_MAX_BATTERS: u32 = 27;
pub const RELIEVER_MAX_BATTERS: u32 = 5;

// Tolerance for outcome probabilities summing to one.
pub const PROBABILITY_TOLERANCE: f64 = 1e-6;

// Accepted range for the number of simulated games per matchup.
pub const MIN_GAMES: usize = 10_000;
pub const MAX_GAMES: usize = 1_000_000;
pub const DEFAULT_GAMES: usize = 90_000;

// 95% confidence z-score used for margin of error.
pub const Z_95: f64 = 1.96;

// Upper bound on plate appearances in one game; a table whose outs never
// accumulate would otherwise never finish.
pub const MAX_PLATE_APPEARANCES: u32 = 10_000;
