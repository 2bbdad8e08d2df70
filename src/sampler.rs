use rand::Rng;

use crate::config::SamplerConfig;
use crate::game::{Game, Phase, ResultKind};
use crate::league::TeamId;

/// How a finished game was settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decision {
    Regulation,
    Overtime,
    Shootout,
}

impl Decision {
    pub fn from_result(result: ResultKind) -> Option<Self> {
        match result {
            ResultKind::Regulation => Some(Decision::Regulation),
            ResultKind::Overtime => Some(Decision::Overtime),
            ResultKind::Shootout => Some(Decision::Shootout),
            ResultKind::NotPlayed => None,
        }
    }
}

/// Result of one game, real or simulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameOutcome {
    pub home_won: bool,
    pub decision: Decision,
}

impl GameOutcome {
    /// Outcome of a played game record; `None` if it has not been played.
    pub fn from_game(game: &Game) -> Option<Self> {
        Decision::from_result(game.result).map(|decision| GameOutcome {
            home_won: game.home_goals > game.away_goals,
            decision,
        })
    }

    /// Actual (home, away) scores for the rating update. A loss past
    /// regulation scores 0.5.
    pub fn scores(&self) -> (f64, f64) {
        let loser = if self.decision == Decision::Regulation { 0.0 } else { 0.5 };
        if self.home_won {
            (1.0, loser)
        } else {
            (loser, 1.0)
        }
    }

    pub fn winner(&self, home: TeamId, away: TeamId) -> TeamId {
        if self.home_won {
            home
        } else {
            away
        }
    }

    pub fn loser(&self, home: TeamId, away: TeamId) -> TeamId {
        if self.home_won {
            away
        } else {
            home
        }
    }

    /// Regulation and overtime wins count toward the tie-break; shootout
    /// wins do not.
    pub fn credits_regulation_win(&self) -> bool {
        self.decision != Decision::Shootout
    }

    /// Loser takes an overtime loss rather than a plain loss.
    pub fn loser_takes_point(&self) -> bool {
        self.decision != Decision::Regulation
    }
}

/// Draws simulated game results from a win expectation.
#[derive(Debug, Clone, PartialEq)]
pub struct Sampler {
    pub extra_time_prob: f64,
    pub shootout_prob: f64,
}

impl Default for Sampler {
    fn default() -> Self {
        Sampler::from(&SamplerConfig::default())
    }
}

impl From<&SamplerConfig> for Sampler {
    fn from(config: &SamplerConfig) -> Self {
        Sampler {
            extra_time_prob: config.extra_time_prob,
            shootout_prob: config.shootout_prob,
        }
    }
}

impl Sampler {
    /// Deterministic core of `sample`: home wins iff `win_draw <= e_home`,
    /// the game goes past regulation iff `extra_draw <= extra_time_prob`,
    /// and a regular season extra-time game is a shootout iff
    /// `shootout_draw <= shootout_prob`. Playoff overtime never ends in a
    /// shootout.
    pub fn resolve(
        &self,
        home_expectation: f64,
        phase: Phase,
        win_draw: f64,
        extra_draw: f64,
        shootout_draw: f64,
    ) -> GameOutcome {
        let decision = if extra_draw > self.extra_time_prob {
            Decision::Regulation
        } else if phase != Phase::Playoff && shootout_draw <= self.shootout_prob {
            Decision::Shootout
        } else {
            Decision::Overtime
        };

        GameOutcome {
            home_won: win_draw <= home_expectation,
            decision,
        }
    }

    pub fn sample<R: Rng + ?Sized>(&self, home_expectation: f64, phase: Phase, rng: &mut R) -> GameOutcome {
        let win_draw: f64 = rng.gen();
        let extra_draw: f64 = rng.gen();
        let shootout_draw: f64 = rng.gen();
        self.resolve(home_expectation, phase, win_draw, extra_draw, shootout_draw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rating::win_expectation;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_resolve_thresholds() {
        let sampler = Sampler::default();

        let reg = sampler.resolve(0.6, Phase::Regular, 0.6, 0.9, 0.0);
        assert!(reg.home_won);
        assert_eq!(reg.decision, Decision::Regulation);

        let so = sampler.resolve(0.6, Phase::Regular, 0.61, 0.233, 0.579);
        assert!(!so.home_won);
        assert_eq!(so.decision, Decision::Shootout);

        let ot = sampler.resolve(0.6, Phase::Regular, 0.1, 0.1, 0.58);
        assert_eq!(ot.decision, Decision::Overtime);
    }

    #[test]
    fn test_no_playoff_shootouts() {
        let sampler = Sampler::default();
        let outcome = sampler.resolve(0.5, Phase::Playoff, 0.2, 0.0, 0.0);
        assert_eq!(outcome.decision, Decision::Overtime);
    }

    #[test]
    fn test_scores_and_credits() {
        let reg = GameOutcome { home_won: true, decision: Decision::Regulation };
        assert_eq!(reg.scores(), (1.0, 0.0));
        assert!(reg.credits_regulation_win());
        assert!(!reg.loser_takes_point());

        let ot = GameOutcome { home_won: false, decision: Decision::Overtime };
        assert_eq!(ot.scores(), (0.5, 1.0));
        assert!(ot.credits_regulation_win());
        assert!(ot.loser_takes_point());

        let so = GameOutcome { home_won: true, decision: Decision::Shootout };
        assert_eq!(so.scores(), (1.0, 0.5));
        assert!(!so.credits_regulation_win());
        assert_eq!(so.winner(TeamId(3), TeamId(4)), TeamId(3));
        assert_eq!(so.loser(TeamId(3), TeamId(4)), TeamId(4));
    }

    #[test]
    fn test_sampled_win_rate_tracks_expectation() {
        let sampler = Sampler::default();
        let e = win_expectation(1550.0, 1450.0);
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        let trials = 100_000;
        let mut home_wins = 0u32;
        let mut extra_time = 0u32;
        for _ in 0..trials {
            let outcome = sampler.sample(e, Phase::Regular, &mut rng);
            if outcome.home_won {
                home_wins += 1;
            }
            if outcome.decision != Decision::Regulation {
                extra_time += 1;
            }
        }

        let expected = e * trials as f64;
        assert!(
            (home_wins as f64 - expected).abs() <= 0.01 * expected,
            "{} home wins, expected about {}",
            home_wins,
            expected
        );
        let extra_rate = extra_time as f64 / trials as f64;
        assert!((extra_rate - 0.233).abs() < 0.01, "extra time rate {}", extra_rate);
    }

    #[test]
    fn test_outcome_from_game() {
        let game = Game {
            date: chrono::NaiveDate::from_ymd_opt(2018, 1, 1).unwrap(),
            phase: Phase::Regular,
            result: ResultKind::Shootout,
            home: TeamId(0),
            away: TeamId(1),
            home_goals: 2,
            away_goals: 3,
        };
        let outcome = GameOutcome::from_game(&game).unwrap();
        assert!(!outcome.home_won);
        assert_eq!(outcome.decision, Decision::Shootout);

        let unplayed = Game { result: ResultKind::NotPlayed, ..game };
        assert!(GameOutcome::from_game(&unplayed).is_none());
    }
}
