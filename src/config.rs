use chrono::NaiveDate;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::constants::{
    BASELINE_RATING, CARRYOVER_RETENTION, DEFAULT_TRIALS, EXTRA_TIME_PROB, K_FACTOR,
    MARGIN_DAMPING, PLAYOFF_IMPORTANCE, RATING_GAP_WEIGHT, RATING_SCALE,
    REGULAR_SEASON_IMPORTANCE, SHOOTOUT_PROB, SIMULATED_GOAL_DIFFERENTIAL,
};
use crate::error::{Result, SimError};

/// Environment variable prefix, e.g. `SEASON_SIM__TRIALS=5000`
pub const ENV_PREFIX: &str = "SEASON_SIM";

/// Top-level projection settings.
///
/// Every field has a default, so an empty file (or no file at all) yields
/// the standard 100,000-trial projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of independent trials
    pub trials: usize,
    /// Master seed; `None` draws one from the OS
    pub seed: Option<u64>,
    /// Date used for the same-day matchup report (defaults to local today)
    pub today: Option<NaiveDate>,
    /// Move ratings after simulated games as well as real ones
    pub update_simulated_ratings: bool,
    /// Goal differential assumed for a simulated game's rating update
    pub simulated_goal_differential: u32,
    pub rating: RatingConfig,
    pub sampler: SamplerConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            trials: DEFAULT_TRIALS,
            seed: None,
            today: None,
            update_simulated_ratings: true,
            simulated_goal_differential: SIMULATED_GOAL_DIFFERENTIAL,
            rating: RatingConfig::default(),
            sampler: SamplerConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingConfig {
    pub baseline: f64,
    pub scale: f64,
    pub k_factor: f64,
    pub regular_importance: f64,
    pub playoff_importance: f64,
    pub margin_damping: f64,
    pub rating_gap_weight: f64,
    pub carryover_retention: f64,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            baseline: BASELINE_RATING,
            scale: RATING_SCALE,
            k_factor: K_FACTOR,
            regular_importance: REGULAR_SEASON_IMPORTANCE,
            playoff_importance: PLAYOFF_IMPORTANCE,
            margin_damping: MARGIN_DAMPING,
            rating_gap_weight: RATING_GAP_WEIGHT,
            carryover_retention: CARRYOVER_RETENTION,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    pub extra_time_prob: f64,
    pub shootout_prob: f64,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            extra_time_prob: EXTRA_TIME_PROB,
            shootout_prob: SHOOTOUT_PROB,
        }
    }
}

impl SimulationConfig {
    /// Load configuration from an optional TOML file, overridden by
    /// `SEASON_SIM__*` environment variables, then validate it.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let builder = Config::builder()
            .add_source(File::from(path.as_ref()).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );

        let config: SimulationConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the simulation cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.trials == 0 {
            return Err(SimError::InvalidConfig("trials must be positive".into()));
        }

        let probs = [
            ("sampler.extra_time_prob", self.sampler.extra_time_prob),
            ("sampler.shootout_prob", self.sampler.shootout_prob),
            ("rating.carryover_retention", self.rating.carryover_retention),
        ];
        for (name, value) in probs {
            if !(0.0..=1.0).contains(&value) {
                return Err(SimError::InvalidConfig(format!(
                    "{} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }

        let positive = [
            ("rating.scale", self.rating.scale),
            ("rating.k_factor", self.rating.k_factor),
            ("rating.margin_damping", self.rating.margin_damping),
        ];
        for (name, value) in positive {
            if !(value > 0.0) {
                return Err(SimError::InvalidConfig(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_constants() {
        let config = SimulationConfig::default();
        assert_eq!(config.trials, DEFAULT_TRIALS);
        assert_eq!(config.rating.k_factor, K_FACTOR);
        assert_eq!(config.sampler.extra_time_prob, EXTRA_TIME_PROB);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_partial_toml() {
        let path = std::env::temp_dir().join(format!("season_core_cfg_{}.toml", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "trials = 250").unwrap();
        writeln!(file, "seed = 7").unwrap();
        writeln!(file, "today = \"2018-04-01\"").unwrap();
        writeln!(file, "[rating]").unwrap();
        writeln!(file, "k_factor = 10.0").unwrap();
        drop(file);

        let config = SimulationConfig::load_from(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.trials, 250);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.today, NaiveDate::from_ymd_opt(2018, 4, 1));
        assert_eq!(config.rating.k_factor, 10.0);
        // Untouched sections keep their defaults
        assert_eq!(config.rating.baseline, BASELINE_RATING);
        assert_eq!(config.sampler.shootout_prob, SHOOTOUT_PROB);
    }

    #[test]
    fn test_validate_rejects_bad_probability() {
        let mut config = SimulationConfig::default();
        config.sampler.extra_time_prob = 1.5;
        assert!(matches!(config.validate(), Err(SimError::InvalidConfig(_))));
    }

    #[test]
    fn test_validate_rejects_zero_trials() {
        let config = SimulationConfig {
            trials: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
