/// Rating of a team with no prior season
pub const BASELINE_RATING: f64 = 1500.0;

/// Rating difference at which the favourite is a 10:1 pick
pub const RATING_SCALE: f64 = 400.0;

/// Base update step per game
pub const K_FACTOR: f64 = 8.0;

/// Update weight of a regular season game
pub const REGULAR_SEASON_IMPORTANCE: f64 = 1.0;

/// Update weight of a playoff game
pub const PLAYOFF_IMPORTANCE: f64 = 1.5;

/// Margin-of-victory damping: multiplier = ln(gd + 1) * D / (|gap| * W + D)
pub const MARGIN_DAMPING: f64 = 2.2;

/// Weight of the rating gap in the margin damping
pub const RATING_GAP_WEIGHT: f64 = 0.01;

/// Share of last season's distance from baseline that carries over
pub const CARRYOVER_RETENTION: f64 = 2.0 / 3.0;

/// Probability a game goes past regulation
pub const EXTRA_TIME_PROB: f64 = 0.233;

/// Probability an extra-time game is settled by shootout
pub const SHOOTOUT_PROB: f64 = 0.579;

/// Goal differential credited to a simulated game when ratings move
pub const SIMULATED_GOAL_DIFFERENTIAL: u32 = 1;

/// Standings points for a win
pub const POINTS_PER_WIN: u32 = 2;

/// Standings points for an overtime or shootout loss
pub const POINTS_PER_OT_LOSS: u32 = 1;

/// Wins needed to take a best-of-seven series
pub const SERIES_WINS: u8 = 4;

/// Automatic qualifiers per division
pub const DIVISION_QUALIFIERS: usize = 3;

/// Wild cards per conference
pub const WILD_CARDS: usize = 2;

/// Trials per projection
pub const DEFAULT_TRIALS: usize = 100_000;
