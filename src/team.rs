use std::ops::{Index, IndexMut};

use crate::constants::{POINTS_PER_OT_LOSS, POINTS_PER_WIN};
use crate::league::TeamId;
use crate::sampler::GameOutcome;

/// Per-trial state of one team: current rating and regular season record.
#[derive(Clone, Debug, PartialEq)]
pub struct TeamState {
    pub rating: f64,
    pub wins: u32,
    pub losses: u32,
    pub ot_losses: u32,
    /// Wins outside the shootout; standings tie-break
    pub regulation_wins: u32,
}

impl TeamState {
    pub fn new(rating: f64) -> Self {
        TeamState {
            rating,
            wins: 0,
            losses: 0,
            ot_losses: 0,
            regulation_wins: 0,
        }
    }

    pub fn points(&self) -> u32 {
        self.wins * POINTS_PER_WIN + self.ot_losses * POINTS_PER_OT_LOSS
    }

    pub fn games_played(&self) -> u32 {
        self.wins + self.losses + self.ot_losses
    }
}

/// Every team's state for one trial, indexed by `TeamId`.
#[derive(Clone, Debug, PartialEq)]
pub struct LeagueState {
    teams: Vec<TeamState>,
}

impl LeagueState {
    pub fn new(ratings: impl IntoIterator<Item = f64>) -> Self {
        LeagueState {
            teams: ratings.into_iter().map(TeamState::new).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TeamId, &TeamState)> {
        self.teams.iter().enumerate().map(|(i, t)| (TeamId(i), t))
    }

    pub fn rating(&self, team: TeamId) -> f64 {
        self[team].rating
    }

    pub fn set_ratings(&mut self, home: TeamId, away: TeamId, ratings: (f64, f64)) {
        self[home].rating = ratings.0;
        self[away].rating = ratings.1;
    }

    /// Credit a regular season result to both teams' records.
    pub fn record_result(&mut self, home: TeamId, away: TeamId, outcome: &GameOutcome) {
        let winner = outcome.winner(home, away);
        let loser = outcome.loser(home, away);

        let w = &mut self[winner];
        w.wins += 1;
        if outcome.credits_regulation_win() {
            w.regulation_wins += 1;
        }

        let l = &mut self[loser];
        if outcome.loser_takes_point() {
            l.ot_losses += 1;
        } else {
            l.losses += 1;
        }
    }
}

impl Index<TeamId> for LeagueState {
    type Output = TeamState;

    fn index(&self, team: TeamId) -> &TeamState {
        &self.teams[team.index()]
    }
}

impl IndexMut<TeamId> for LeagueState {
    fn index_mut(&mut self, team: TeamId) -> &mut TeamState {
        &mut self.teams[team.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::Decision;

    #[test]
    fn test_points() {
        let team = TeamState {
            rating: 1500.0,
            wins: 40,
            losses: 30,
            ot_losses: 12,
            regulation_wins: 35,
        };
        assert_eq!(team.points(), 92);
        assert_eq!(team.games_played(), 82);
    }

    #[test]
    fn test_record_result_bookkeeping() {
        let mut state = LeagueState::new([1500.0, 1500.0]);
        let (home, away) = (TeamId(0), TeamId(1));

        state.record_result(home, away, &GameOutcome { home_won: true, decision: Decision::Regulation });
        state.record_result(home, away, &GameOutcome { home_won: false, decision: Decision::Overtime });
        state.record_result(home, away, &GameOutcome { home_won: true, decision: Decision::Shootout });

        let h = &state[home];
        assert_eq!((h.wins, h.losses, h.ot_losses, h.regulation_wins), (2, 0, 1, 1));
        let a = &state[away];
        assert_eq!((a.wins, a.losses, a.ot_losses, a.regulation_wins), (1, 1, 1, 1));
        assert_eq!(h.points(), 5);
        assert_eq!(a.points(), 4);
    }

    #[test]
    fn test_clone_is_independent() {
        let baseline = LeagueState::new([1510.0, 1490.0]);
        let mut trial = baseline.clone();
        trial.set_ratings(TeamId(0), TeamId(1), (1600.0, 1400.0));
        assert_eq!(baseline.rating(TeamId(0)), 1510.0);
        assert_eq!(trial.rating(TeamId(1)), 1400.0);
    }
}
