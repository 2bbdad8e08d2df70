use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::config::SimulationConfig;
use crate::constants::{
    BASELINE_RATING, DEFAULT_TRIALS, EXTRA_TIME_PROB, K_FACTOR, PLAYOFF_IMPORTANCE,
    REGULAR_SEASON_IMPORTANCE, SHOOTOUT_PROB,
};
use crate::error::SimError;
use crate::game::{GameRecord, Phase};
use crate::league::{nhl_divisions, League};
use crate::logging::{init_tracing, DEFAULT_DIRECTIVE};
use crate::prior::PriorRatings;
use crate::rating;
use crate::simulator::SeasonSimulator;

impl From<SimError> for PyErr {
    fn from(err: SimError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

/// Probability that a team rated `rating_a` beats one rated `rating_b`.
#[pyfunction]
fn win_expectation(rating_a: f64, rating_b: f64) -> f64 {
    rating::win_expectation(rating_a, rating_b)
}

/// Rating after one game; `playoff` selects the playoff importance weight.
#[pyfunction]
#[pyo3(signature = (rating_a, rating_b, actual, expected, goal_differential, playoff = false))]
fn update_rating(
    rating_a: f64,
    rating_b: f64,
    actual: f64,
    expected: f64,
    goal_differential: u32,
    playoff: bool,
) -> f64 {
    let phase = if playoff { Phase::Playoff } else { Phase::Regular };
    rating::update_rating(rating_a, rating_b, actual, expected, goal_differential, phase)
}

#[pyfunction]
#[pyo3(signature = (prior = None))]
fn season_start_rating(prior: Option<f64>) -> f64 {
    rating::season_start_rating(prior)
}

/// Install the tracing subscriber. Returns false if one was already set.
#[pyfunction]
#[pyo3(signature = (directive = None))]
fn init_logging(directive: Option<&str>) -> bool {
    init_tracing(directive.unwrap_or(DEFAULT_DIRECTIVE))
}

/// Season projection over a schedule given as JSON.
#[pyclass]
pub struct Simulator {
    inner: SeasonSimulator,
}

#[pymethods]
impl Simulator {
    /// `games` is the schedule JSON; `priors` last season's ratings;
    /// `league` a division list (defaults to the NHL alignment); `config` a
    /// TOML file path. `trials` and `seed` override the configuration.
    #[new]
    #[pyo3(signature = (games, priors = None, league = None, config = None, trials = None, seed = None))]
    fn new(
        games: &str,
        priors: Option<&str>,
        league: Option<&str>,
        config: Option<&str>,
        trials: Option<usize>,
        seed: Option<u64>,
    ) -> PyResult<Self> {
        let league = match league {
            Some(json) => League::from_json(json)?,
            None => League::new(nhl_divisions())?,
        };
        let records = GameRecord::list_from_json(games)?;
        let priors = match priors {
            Some(json) => PriorRatings::from_json(json)?,
            None => PriorRatings::new(),
        };

        let mut settings = match config {
            Some(path) => SimulationConfig::load_from(path)?,
            None => SimulationConfig::default(),
        };
        if let Some(trials) = trials {
            settings.trials = trials;
        }
        if seed.is_some() {
            settings.seed = seed;
        }

        let inner = SeasonSimulator::new(league, &records, &priors, settings)?;
        Ok(Simulator { inner })
    }

    /// Run every trial and return the projection as JSON.
    fn run(&self, py: Python<'_>) -> PyResult<String> {
        let projection = py.allow_threads(|| self.inner.run())?;
        Ok(serde_json::to_string(&projection).map_err(SimError::from)?)
    }

    /// Win probabilities for the report date's games as JSON.
    fn todays_games(&self) -> PyResult<String> {
        Ok(serde_json::to_string(self.inner.todays_games()).map_err(SimError::from)?)
    }

    #[getter]
    fn trials(&self) -> usize {
        self.inner.config().trials
    }

    fn __repr__(&self) -> String {
        format!(
            "Simulator({} teams, {} games remaining)",
            self.inner.league().len(),
            self.inner.schedule().future_regular.len()
        )
    }
}

/// Python module definition
#[pymodule]
fn season_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<Simulator>()?;

    m.add_function(wrap_pyfunction!(win_expectation, m)?)?;
    m.add_function(wrap_pyfunction!(update_rating, m)?)?;
    m.add_function(wrap_pyfunction!(season_start_rating, m)?)?;
    m.add_function(wrap_pyfunction!(init_logging, m)?)?;

    // Constants
    m.add("BASELINE_RATING", BASELINE_RATING)?;
    m.add("K_FACTOR", K_FACTOR)?;
    m.add("REGULAR_SEASON_IMPORTANCE", REGULAR_SEASON_IMPORTANCE)?;
    m.add("PLAYOFF_IMPORTANCE", PLAYOFF_IMPORTANCE)?;
    m.add("EXTRA_TIME_PROB", EXTRA_TIME_PROB)?;
    m.add("SHOOTOUT_PROB", SHOOTOUT_PROB)?;
    m.add("DEFAULT_TRIALS", DEFAULT_TRIALS)?;

    Ok(())
}
