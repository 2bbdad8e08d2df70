use chrono::{Local, NaiveDate};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

use crate::bracket::{PlayoffEngine, PlayoffResult};
use crate::config::SimulationConfig;
use crate::error::Result;
use crate::game::{GameRecord, Phase, Schedule};
use crate::league::League;
use crate::prior::PriorRatings;
use crate::season::{Baseline, Rules, TodaysGames};
use crate::standings::{Seeding, Standings};
use crate::tally::{Projection, Tally};
use crate::team::LeagueState;

/// Everything one trial produced.
#[derive(Debug, Clone)]
pub struct TrialOutcome {
    pub state: LeagueState,
    pub seeding: Seeding,
    pub playoffs: PlayoffResult,
}

/// Monte Carlo season projection over a fixed league and schedule.
pub struct SeasonSimulator {
    league: League,
    schedule: Schedule,
    rules: Rules,
    config: SimulationConfig,
    baseline: Baseline,
    today: NaiveDate,
}

impl SeasonSimulator {
    /// Resolve the games against the league and build the baseline state
    /// shared by every trial.
    pub fn new(
        league: League,
        records: &[GameRecord],
        priors: &PriorRatings,
        config: SimulationConfig,
    ) -> Result<Self> {
        config.validate()?;
        let schedule = Schedule::from_records(records, &league)?;
        let rules = Rules::from(&config);
        let today = config.today.unwrap_or_else(|| Local::now().date_naive());

        let known = league.team_ids().filter(|&t| priors.get(league.name(t)).is_some()).count();
        if known < priors.len() {
            debug!(ignored = priors.len() - known, "prior ratings for teams outside the league");
        }

        let baseline = Baseline::build(&league, &schedule, priors, &rules, today);
        info!(
            teams = league.len(),
            played = schedule.past_regular.len(),
            remaining = schedule.future_regular.len(),
            playoff_games = schedule.past_playoff.len(),
            "baseline built"
        );

        Ok(SeasonSimulator {
            league,
            schedule,
            rules,
            config,
            baseline,
            today,
        })
    }

    pub fn league(&self) -> &League {
        &self.league
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn baseline(&self) -> &Baseline {
        &self.baseline
    }

    pub fn todays_games(&self) -> &TodaysGames {
        &self.baseline.todays_games
    }

    /// Run the configured number of trials.
    pub fn run(&self) -> Result<Projection> {
        self.run_until(&AtomicBool::new(false))
    }

    /// Run trials until done or until `cancel` is set. Trials finished before
    /// cancellation still make a valid projection.
    pub fn run_until(&self, cancel: &AtomicBool) -> Result<Projection> {
        let requested = self.config.trials;
        info!(trials = requested, seed = ?self.config.seed, "starting simulation");

        let tally = self.run_trials(requested, cancel)?;

        if (tally.trials as usize) < requested {
            warn!(completed = tally.trials, requested, "simulation cancelled early");
        }
        if tally.unmatched_playoff_games > 0 && tally.trials > 0 {
            warn!(
                per_trial = tally.unmatched_playoff_games / tally.trials,
                "played playoff games matched no series and were skipped"
            );
        }

        let projection = tally.project(
            &self.league,
            &self.baseline.state,
            &self.baseline.current,
            self.today,
            self.schedule.regular_season_complete(),
        )?;
        info!(trials = projection.trials, "simulation finished");
        Ok(projection)
    }

    /// Run `trials` independent trials in parallel and return the raw counters.
    ///
    /// Each trial gets its own generator seeded from the master stream, so a
    /// fixed seed gives the same tally however rayon schedules the work.
    pub fn run_trials(&self, trials: usize, cancel: &AtomicBool) -> Result<Tally> {
        let mut master = match self.config.seed {
            Some(s) => ChaCha8Rng::seed_from_u64(s),
            None => ChaCha8Rng::from_entropy(),
        };
        let seeds: Vec<u64> = (0..trials).map(|_| master.gen::<u64>()).collect();
        let teams = self.league.len();

        seeds
            .par_iter()
            .try_fold(
                || Tally::new(teams),
                |mut tally, &seed| {
                    if cancel.load(Ordering::Relaxed) {
                        return Ok(tally);
                    }
                    let mut rng = ChaCha8Rng::seed_from_u64(seed);
                    let outcome = self.run_trial(&mut rng)?;
                    tally.record(&outcome.state, &outcome.seeding, &outcome.playoffs);
                    Ok(tally)
                },
            )
            .try_reduce(|| Tally::new(teams), |a, b| Ok(a.merge(b)))
    }

    /// One full trial: finish the regular season, seed the playoffs and
    /// play them out.
    pub fn run_trial<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<TrialOutcome> {
        let mut state = self.baseline.state.clone();
        for game in &self.schedule.future_regular {
            self.rules
                .simulate(&mut state, game.home, game.away, Phase::Regular, rng);
        }

        let seeding = Standings::compute(&self.league, &state).seed(&self.league)?;

        let mut past = self.schedule.past_playoff.clone();
        let playoffs = PlayoffEngine::new(&self.rules).run(&seeding, &mut state, &mut past, rng)?;

        Ok(TrialOutcome {
            state,
            seeding,
            playoffs,
        })
    }
}
