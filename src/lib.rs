//! Season Core - Monte Carlo projection of an NHL-style hockey season.
//!
//! Team strength follows an Elo-style rating model; the rest of the regular
//! season and a 16-team best-of-seven playoff bracket are simulated many
//! times, resuming from any real results, to estimate each team's chances
//! of every standings and playoff outcome. Python bindings via PyO3 are
//! available behind the `python` feature.

pub mod bracket;
pub mod config;
pub mod constants;
pub mod error;
pub mod game;
pub mod league;
pub mod logging;
pub mod prior;
pub mod rating;
pub mod sampler;
pub mod season;
pub mod series;
pub mod simulator;
pub mod standings;
pub mod tally;
pub mod team;

#[cfg(feature = "python")]
mod python;

pub use bracket::{PlayoffEngine, PlayoffResult, Round};
pub use config::{RatingConfig, SamplerConfig, SimulationConfig};
pub use error::{Result, SimError};
pub use game::{Game, GameRecord, Phase, ResultKind, Schedule};
pub use league::{nhl_divisions, DivisionLayout, League, TeamId};
pub use logging::init_tracing;
pub use prior::PriorRatings;
pub use rating::{season_start_rating, update_rating, win_expectation, RatingModel};
pub use sampler::{Decision, GameOutcome, Sampler};
pub use season::{Matchup, Rules, TodaysGames};
pub use series::SeriesState;
pub use simulator::{SeasonSimulator, TrialOutcome};
pub use standings::{Seeding, Standings};
pub use tally::{Projection, Tally, TeamProjection};
pub use team::{LeagueState, TeamState};
