use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::bracket::PlayoffResult;
use crate::error::{Result, SimError};
use crate::league::League;
use crate::standings::Seeding;
use crate::team::LeagueState;

/// Integer counters for one team, summed over trials.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamTally {
    pub wins: u64,
    pub losses: u64,
    pub ot_losses: u64,
    pub points: u64,
    pub division_places: [u64; 3],
    pub wild_cards: [u64; 2],
    pub made_playoffs: u64,
    pub conference_best: u64,
    pub league_best: u64,
    /// Times the team reached rounds 2, 3 and 4
    pub reached: [u64; 3],
    pub champion: u64,
}

impl TeamTally {
    fn merge(&mut self, other: &TeamTally) {
        self.wins += other.wins;
        self.losses += other.losses;
        self.ot_losses += other.ot_losses;
        self.points += other.points;
        for (a, b) in self.division_places.iter_mut().zip(other.division_places) {
            *a += b;
        }
        for (a, b) in self.wild_cards.iter_mut().zip(other.wild_cards) {
            *a += b;
        }
        self.made_playoffs += other.made_playoffs;
        self.conference_best += other.conference_best;
        self.league_best += other.league_best;
        for (a, b) in self.reached.iter_mut().zip(other.reached) {
            *a += b;
        }
        self.champion += other.champion;
    }
}

/// Counters for every team across the trials run so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tally {
    pub trials: u64,
    pub teams: Vec<TeamTally>,
    /// Real playoff games skipped because no series matched them, summed
    /// over trials
    pub unmatched_playoff_games: u64,
}

impl Tally {
    pub fn new(teams: usize) -> Self {
        Tally {
            trials: 0,
            teams: vec![TeamTally::default(); teams],
            unmatched_playoff_games: 0,
        }
    }

    /// Fold one finished trial into the counters.
    pub fn record(&mut self, state: &LeagueState, seeding: &Seeding, playoffs: &PlayoffResult) {
        self.trials += 1;
        self.unmatched_playoff_games += playoffs.unmatched_games as u64;

        for (team, record) in state.iter() {
            let tally = &mut self.teams[team.index()];
            tally.wins += u64::from(record.wins);
            tally.losses += u64::from(record.losses);
            tally.ot_losses += u64::from(record.ot_losses);
            tally.points += u64::from(record.points());
        }

        for places in &seeding.division_places {
            for (place, team) in places.iter().enumerate() {
                self.teams[team.index()].division_places[place] += 1;
            }
        }
        for cards in &seeding.wild_cards {
            for (slot, team) in cards.iter().enumerate() {
                self.teams[team.index()].wild_cards[slot] += 1;
            }
        }
        for team in seeding.qualifiers() {
            self.teams[team.index()].made_playoffs += 1;
        }
        for team in &seeding.conference_best {
            self.teams[team.index()].conference_best += 1;
        }
        self.teams[seeding.league_best.index()].league_best += 1;

        for (round, teams) in playoffs.advanced.iter().enumerate() {
            for team in teams {
                self.teams[team.index()].reached[round] += 1;
            }
        }
        self.teams[playoffs.champion.index()].champion += 1;
    }

    /// Combine two partial tallies; used as the parallel reduction.
    pub fn merge(mut self, other: Tally) -> Tally {
        self.trials += other.trials;
        self.unmatched_playoff_games += other.unmatched_playoff_games;
        for (a, b) in self.teams.iter_mut().zip(&other.teams) {
            a.merge(b);
        }
        self
    }

    /// Normalize the counters by the number of trials.
    ///
    /// `real` supplies the actual record so far and `current` the rating
    /// every team holds today.
    pub fn project(
        &self,
        league: &League,
        real: &LeagueState,
        current: &LeagueState,
        date: NaiveDate,
        playoffs: bool,
    ) -> Result<Projection> {
        if self.trials == 0 {
            return Err(SimError::Cancelled);
        }
        let n = self.trials as f64;
        let avg = |count: u64| count as f64 / n;

        let data = league
            .team_ids()
            .map(|team| {
                let tally = &self.teams[team.index()];
                let record = &real[team];
                TeamProjection {
                    name: league.name(team).to_string(),
                    division: league.division_of(team).name.clone(),
                    conference: league.conference_of(team).name.clone(),
                    elo: current.rating(team),
                    wins: record.wins,
                    losses: record.losses,
                    ot_losses: record.ot_losses,
                    regulation_wins: record.regulation_wins,
                    avg_wins: avg(tally.wins),
                    avg_losses: avg(tally.losses),
                    avg_ot_losses: avg(tally.ot_losses),
                    avg_points: avg(tally.points),
                    d1: avg(tally.division_places[0]),
                    d2: avg(tally.division_places[1]),
                    d3: avg(tally.division_places[2]),
                    wc1: avg(tally.wild_cards[0]),
                    wc2: avg(tally.wild_cards[1]),
                    made_playoffs: avg(tally.made_playoffs),
                    conference_best: avg(tally.conference_best),
                    league_best: avg(tally.league_best),
                    r2: avg(tally.reached[0]),
                    r3: avg(tally.reached[1]),
                    r4: avg(tally.reached[2]),
                    cup: avg(tally.champion),
                }
            })
            .collect();

        Ok(Projection {
            date,
            playoffs,
            trials: self.trials,
            data,
        })
    }
}

/// Long-run averages and probabilities for one team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamProjection {
    pub name: String,
    pub division: String,
    pub conference: String,
    pub elo: f64,
    #[serde(rename = "w")]
    pub wins: u32,
    #[serde(rename = "l")]
    pub losses: u32,
    #[serde(rename = "otl")]
    pub ot_losses: u32,
    #[serde(rename = "row")]
    pub regulation_wins: u32,
    #[serde(rename = "aw")]
    pub avg_wins: f64,
    #[serde(rename = "al")]
    pub avg_losses: f64,
    #[serde(rename = "aotl")]
    pub avg_ot_losses: f64,
    #[serde(rename = "apts")]
    pub avg_points: f64,
    pub d1: f64,
    pub d2: f64,
    pub d3: f64,
    pub wc1: f64,
    pub wc2: f64,
    #[serde(rename = "playoffs")]
    pub made_playoffs: f64,
    #[serde(rename = "conf")]
    pub conference_best: f64,
    #[serde(rename = "pres")]
    pub league_best: f64,
    pub r2: f64,
    pub r3: f64,
    pub r4: f64,
    pub cup: f64,
}

/// One projection run, in the shape of a results-history entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub date: NaiveDate,
    /// True once the regular season is over
    pub playoffs: bool,
    pub trials: u64,
    pub data: Vec<TeamProjection>,
}

impl Projection {
    pub fn team(&self, name: &str) -> Option<&TeamProjection> {
        self.data.iter().find(|t| t.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::league::tests::small_league;
    use crate::league::TeamId;
    use crate::standings::Standings;

    fn trial() -> (LeagueState, Seeding, PlayoffResult) {
        let league = small_league();
        let mut state = LeagueState::new(vec![1500.0; league.len()]);
        for t in league.team_ids() {
            state[t].wins = 60 - t.index() as u32;
            state[t].losses = t.index() as u32;
            state[t].regulation_wins = state[t].wins;
        }
        let seeding = Standings::compute(&league, &state).seed(&league).unwrap();
        let playoffs = PlayoffResult {
            advanced: [
                [0, 1, 4, 5, 8, 9, 12, 13].map(TeamId).to_vec(),
                [0, 4, 8, 12].map(TeamId).to_vec(),
                [0, 8].map(TeamId).to_vec(),
            ],
            champion: TeamId(8),
            unmatched_games: 1,
        };
        (state, seeding, playoffs)
    }

    #[test]
    fn test_record_counts_outcomes() {
        let (state, seeding, playoffs) = trial();
        let mut tally = Tally::new(16);
        tally.record(&state, &seeding, &playoffs);

        let a1 = &tally.teams[0];
        assert_eq!(a1.division_places, [1, 0, 0]);
        assert_eq!(a1.made_playoffs, 1);
        assert_eq!(a1.conference_best, 1);
        assert_eq!(a1.league_best, 1);
        assert_eq!(a1.reached, [1, 1, 1]);
        assert_eq!(a1.champion, 0);
        assert_eq!(a1.points, 120);

        assert_eq!(tally.teams[3].wild_cards, [1, 0]);
        assert_eq!(tally.teams[8].champion, 1);
        assert_eq!(tally.unmatched_playoff_games, 1);
    }

    #[test]
    fn test_merge_and_project() {
        let league = small_league();
        let (state, seeding, playoffs) = trial();

        let mut left = Tally::new(16);
        left.record(&state, &seeding, &playoffs);
        let mut right = Tally::new(16);
        right.record(&state, &seeding, &playoffs);
        right.record(&state, &seeding, &playoffs);
        let tally = left.merge(right);
        assert_eq!(tally.trials, 3);

        let date = NaiveDate::from_ymd_opt(2018, 4, 1).unwrap();
        let projection = tally.project(&league, &state, &state, date, false).unwrap();
        let a1 = projection.team("A1").unwrap();
        assert_eq!(a1.division, "A");
        assert_eq!(a1.conference, "East");
        assert!((a1.avg_wins - 60.0).abs() < 1e-12);
        assert!((a1.r4 - 1.0).abs() < 1e-12);

        let cups: f64 = projection.data.iter().map(|t| t.cup).sum();
        assert!((cups - 1.0).abs() < 1e-12);
        let made: f64 = projection.data.iter().map(|t| t.made_playoffs).sum();
        assert!((made - 16.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_tally_is_cancelled() {
        let league = small_league();
        let state = LeagueState::new(vec![1500.0; league.len()]);
        let date = NaiveDate::from_ymd_opt(2018, 4, 1).unwrap();
        let result = Tally::new(16).project(&league, &state, &state, date, false);
        assert!(matches!(result, Err(SimError::Cancelled)));
    }

    #[test]
    fn test_projection_uses_history_keys() {
        let league = small_league();
        let (state, seeding, playoffs) = trial();
        let mut tally = Tally::new(16);
        tally.record(&state, &seeding, &playoffs);
        let date = NaiveDate::from_ymd_opt(2018, 4, 1).unwrap();
        let projection = tally.project(&league, &state, &state, date, true).unwrap();

        let json = serde_json::to_value(&projection).unwrap();
        assert_eq!(json["date"], "2018-04-01");
        assert_eq!(json["playoffs"], true);
        let team = &json["data"][0];
        for key in ["name", "elo", "w", "row", "aw", "aotl", "wc1", "playoffs", "conf", "pres", "r4", "cup"] {
            assert!(team.get(key).is_some(), "missing {}", key);
        }
    }
}
