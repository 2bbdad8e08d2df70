use thiserror::Error;

/// Errors raised while setting up or running a season projection
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Unknown team: {0}")]
    UnknownTeam(String),

    #[error("Malformed bracket in {round}: {reason}")]
    MalformedBracket { round: String, reason: String },

    #[error("Invalid game: {0}")]
    InvalidGame(String),

    #[error("Invalid league: {0}")]
    InvalidLeague(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Simulation cancelled before any trial completed")]
    Cancelled,
}

impl SimError {
    pub(crate) fn bracket(round: impl ToString, reason: impl Into<String>) -> Self {
        SimError::MalformedBracket {
            round: round.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for SimError
pub type Result<T> = std::result::Result<T, SimError>;
