use chrono::NaiveDate;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::SimulationConfig;
use crate::constants::SIMULATED_GOAL_DIFFERENTIAL;
use crate::game::{Game, Phase, Schedule};
use crate::league::{League, TeamId};
use crate::prior::PriorRatings;
use crate::rating::RatingModel;
use crate::sampler::{GameOutcome, Sampler};
use crate::team::LeagueState;

/// Rating model, sampler and simulated-game policy shared by all trials.
#[derive(Debug, Clone)]
pub struct Rules {
    pub model: RatingModel,
    pub sampler: Sampler,
    pub update_simulated_ratings: bool,
    pub simulated_goal_differential: u32,
}

impl Default for Rules {
    fn default() -> Self {
        Rules {
            model: RatingModel::default(),
            sampler: Sampler::default(),
            update_simulated_ratings: true,
            simulated_goal_differential: SIMULATED_GOAL_DIFFERENTIAL,
        }
    }
}

impl From<&SimulationConfig> for Rules {
    fn from(config: &SimulationConfig) -> Self {
        Rules {
            model: RatingModel::from(&config.rating),
            sampler: Sampler::from(&config.sampler),
            update_simulated_ratings: config.update_simulated_ratings,
            simulated_goal_differential: config.simulated_goal_differential,
        }
    }
}

impl Rules {
    /// Apply a real result: both ratings move by the actual margin, and a
    /// regular season game also lands in the records. Unplayed games are
    /// left alone.
    pub fn replay(&self, state: &mut LeagueState, game: &Game) -> Option<GameOutcome> {
        let outcome = GameOutcome::from_game(game)?;
        self.apply(state, game.home, game.away, &outcome, game.goal_differential(), game.phase, true);
        Some(outcome)
    }

    /// Draw a result for `home` vs `away` from their current ratings and
    /// apply it.
    pub fn simulate<R: Rng + ?Sized>(
        &self,
        state: &mut LeagueState,
        home: TeamId,
        away: TeamId,
        phase: Phase,
        rng: &mut R,
    ) -> GameOutcome {
        let expectation = self.model.win_expectation(state.rating(home), state.rating(away));
        let outcome = self.sampler.sample(expectation, phase, rng);
        self.apply(
            state,
            home,
            away,
            &outcome,
            self.simulated_goal_differential,
            phase,
            self.update_simulated_ratings,
        );
        outcome
    }

    #[allow(clippy::too_many_arguments)]
    fn apply(
        &self,
        state: &mut LeagueState,
        home: TeamId,
        away: TeamId,
        outcome: &GameOutcome,
        goal_differential: u32,
        phase: Phase,
        update_ratings: bool,
    ) {
        if update_ratings {
            let ratings = self.model.update_pair(
                state.rating(home),
                state.rating(away),
                outcome.scores(),
                goal_differential,
                phase,
            );
            state.set_ratings(home, away, ratings);
        }
        if phase == Phase::Regular {
            state.record_result(home, away, outcome);
        }
    }
}

/// Win probabilities for one game on the report date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Matchup {
    pub home_team: String,
    pub away_team: String,
    pub home_prob: f64,
    pub away_prob: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodaysGames {
    pub date: NaiveDate,
    pub data: Vec<Matchup>,
}

/// State every trial starts from, built once.
#[derive(Debug, Clone)]
pub struct Baseline {
    /// Season-start ratings with every played regular season game applied
    pub state: LeagueState,
    /// `state` with the played playoff games applied as well
    pub current: LeagueState,
    pub todays_games: TodaysGames,
}

impl Baseline {
    pub fn build(
        league: &League,
        schedule: &Schedule,
        priors: &PriorRatings,
        rules: &Rules,
        today: NaiveDate,
    ) -> Self {
        let mut state = LeagueState::new(
            league
                .team_ids()
                .map(|t| rules.model.season_start(priors.get(league.name(t)))),
        );

        let mut matchups = Vec::new();
        for game in &schedule.past_regular {
            if game.date == today {
                matchups.push(matchup(league, &rules.model, &state, game));
            }
            rules.replay(&mut state, game);
        }

        let mut current = state.clone();
        for game in &schedule.past_playoff {
            if game.date == today {
                matchups.push(matchup(league, &rules.model, &current, game));
            }
            rules.replay(&mut current, game);
        }

        let upcoming = schedule.future_regular.iter().chain(&schedule.future_playoff);
        for game in upcoming.filter(|g| g.date == today) {
            matchups.push(matchup(league, &rules.model, &current, game));
        }

        Baseline {
            state,
            current,
            todays_games: TodaysGames {
                date: today,
                data: matchups,
            },
        }
    }
}

fn matchup(league: &League, model: &RatingModel, state: &LeagueState, game: &Game) -> Matchup {
    let home_prob = model.win_expectation(state.rating(game.home), state.rating(game.away));
    Matchup {
        home_team: league.name(game.home).to_string(),
        away_team: league.name(game.away).to_string(),
        home_prob,
        away_prob: 1.0 - home_prob,
    }
}
