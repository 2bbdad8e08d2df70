use statrs::function::logistic::logistic;
use std::f64::consts::LN_10;

use crate::config::RatingConfig;
use crate::game::Phase;

/// Probability that a team rated `rating_a` beats one rated `rating_b`.
///
/// Logistic in the rating difference on the base-10, 400-point scale:
/// `1 / (1 + 10^((b - a) / 400))`.
pub fn win_expectation(rating_a: f64, rating_b: f64) -> f64 {
    RatingModel::default().win_expectation(rating_a, rating_b)
}

/// New rating of team A after one game, using the default model constants.
///
/// # Arguments
/// * `rating_a` - Team A's rating before the game
/// * `rating_b` - Opponent's rating before the game
/// * `actual` - 1.0 win, 0.5 non-regulation loss, 0.0 regulation loss
/// * `expected` - Team A's win expectation before the game
/// * `goal_differential` - Absolute goal margin
/// * `phase` - Playoff games move ratings further
pub fn update_rating(
    rating_a: f64,
    rating_b: f64,
    actual: f64,
    expected: f64,
    goal_differential: u32,
    phase: Phase,
) -> f64 {
    RatingModel::default().update(rating_a, rating_b, actual, expected, goal_differential, phase)
}

/// Season-opening rating from last season's final rating, if any.
pub fn season_start_rating(prior: Option<f64>) -> f64 {
    RatingModel::default().season_start(prior)
}

/// Elo-style model with margin-of-victory damping.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingModel {
    pub baseline: f64,
    pub scale: f64,
    pub k_factor: f64,
    pub regular_importance: f64,
    pub playoff_importance: f64,
    pub margin_damping: f64,
    pub rating_gap_weight: f64,
    pub carryover_retention: f64,
}

impl Default for RatingModel {
    fn default() -> Self {
        RatingModel::from(&RatingConfig::default())
    }
}

impl From<&RatingConfig> for RatingModel {
    fn from(config: &RatingConfig) -> Self {
        RatingModel {
            baseline: config.baseline,
            scale: config.scale,
            k_factor: config.k_factor,
            regular_importance: config.regular_importance,
            playoff_importance: config.playoff_importance,
            margin_damping: config.margin_damping,
            rating_gap_weight: config.rating_gap_weight,
            carryover_retention: config.carryover_retention,
        }
    }
}

impl RatingModel {
    pub fn win_expectation(&self, rating_a: f64, rating_b: f64) -> f64 {
        // 10^(d/s) == e^(d * ln10 / s)
        logistic((rating_a - rating_b) * LN_10 / self.scale)
    }

    pub fn importance(&self, phase: Phase) -> f64 {
        match phase {
            Phase::Playoff => self.playoff_importance,
            _ => self.regular_importance,
        }
    }

    /// Grows with the goal margin, shrinks as the rating gap widens so a
    /// favourite's blowout of a weak side moves little.
    pub fn margin_multiplier(&self, rating_a: f64, rating_b: f64, goal_differential: u32) -> f64 {
        let damping = self.margin_damping
            / ((rating_a - rating_b).abs() * self.rating_gap_weight + self.margin_damping);
        f64::from(goal_differential).ln_1p() * damping
    }

    pub fn update(
        &self,
        rating_a: f64,
        rating_b: f64,
        actual: f64,
        expected: f64,
        goal_differential: u32,
        phase: Phase,
    ) -> f64 {
        let step = self.k_factor
            * self.importance(phase)
            * self.margin_multiplier(rating_a, rating_b, goal_differential);
        rating_a + step * (actual - expected)
    }

    /// Both sides' new ratings for a game between `home` and `away`.
    ///
    /// `scores` are the (home, away) actual scores; each side is updated
    /// against its own expectation from the pre-game ratings.
    pub fn update_pair(
        &self,
        home: f64,
        away: f64,
        scores: (f64, f64),
        goal_differential: u32,
        phase: Phase,
    ) -> (f64, f64) {
        let expected_home = self.win_expectation(home, away);
        let expected_away = 1.0 - expected_home;
        (
            self.update(home, away, scores.0, expected_home, goal_differential, phase),
            self.update(away, home, scores.1, expected_away, goal_differential, phase),
        )
    }

    pub fn season_start(&self, prior: Option<f64>) -> f64 {
        match prior {
            Some(rating) => self.baseline + (rating - self.baseline) * self.carryover_retention,
            None => self.baseline,
        }
    }
}
