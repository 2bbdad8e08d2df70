use crate::constants::SERIES_WINS;
use crate::league::TeamId;

/// A best-of-seven series between two teams; `home` holds home ice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesState {
    pub home: TeamId,
    pub away: TeamId,
    pub home_wins: u8,
    pub away_wins: u8,
}

impl SeriesState {
    pub fn new(home: TeamId, away: TeamId) -> Self {
        SeriesState {
            home,
            away,
            home_wins: 0,
            away_wins: 0,
        }
    }

    /// True when the two teams are exactly this series' participants.
    pub fn involves(&self, a: TeamId, b: TeamId) -> bool {
        (self.home == a && self.away == b) || (self.home == b && self.away == a)
    }

    pub fn is_complete(&self) -> bool {
        self.home_wins == SERIES_WINS || self.away_wins == SERIES_WINS
    }

    pub fn winner(&self) -> Option<TeamId> {
        if self.home_wins == SERIES_WINS {
            Some(self.home)
        } else if self.away_wins == SERIES_WINS {
            Some(self.away)
        } else {
            None
        }
    }

    pub fn min_wins(&self) -> u8 {
        self.home_wins.min(self.away_wins)
    }

    pub fn games_played(&self) -> u8 {
        self.home_wins + self.away_wins
    }

    /// Games still needed if the series leader won every one of them:
    /// `min(wA, wB) + 4 - (wA + wB)`.
    pub fn games_needed(&self) -> u8 {
        (self.min_wins() + SERIES_WINS).saturating_sub(self.games_played())
    }

    /// Credit a game win to `team`. Returns false, changing nothing, if the
    /// series is already decided or `team` is not in it.
    pub fn record_win(&mut self, team: TeamId) -> bool {
        if self.is_complete() {
            return false;
        }
        if team == self.home {
            self.home_wins += 1;
        } else if team == self.away {
            self.away_wins += 1;
        } else {
            return false;
        }
        true
    }
}

/// Progress of a playoff round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundStage {
    /// Pairings fixed, nothing played
    Scheduled,
    /// Some games played, at least one series undecided
    InProgress,
    /// Every series decided
    Complete,
}

pub fn check_finished(series: &[SeriesState]) -> bool {
    series.iter().all(SeriesState::is_complete)
}

pub fn round_stage(series: &[SeriesState]) -> RoundStage {
    if check_finished(series) {
        RoundStage::Complete
    } else if series.iter().all(|s| s.games_played() == 0) {
        RoundStage::Scheduled
    } else {
        RoundStage::InProgress
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series_at(home_wins: u8, away_wins: u8) -> SeriesState {
        SeriesState {
            home_wins,
            away_wins,
            ..SeriesState::new(TeamId(0), TeamId(1))
        }
    }

    #[test]
    fn test_games_needed() {
        assert_eq!(series_at(0, 0).games_needed(), 4);
        assert_eq!(series_at(3, 1).games_needed(), 1);
        assert_eq!(series_at(1, 3).games_needed(), 1);
        assert_eq!(series_at(2, 2).games_needed(), 2);
        assert_eq!(series_at(3, 3).games_needed(), 1);
        assert_eq!(series_at(4, 2).games_needed(), 0);
    }

    #[test]
    fn test_never_past_four() {
        let mut series = series_at(3, 2);
        assert!(series.record_win(TeamId(0)));
        assert!(series.is_complete());
        assert_eq!(series.winner(), Some(TeamId(0)));

        assert!(!series.record_win(TeamId(1)));
        assert!(!series.record_win(TeamId(0)));
        assert_eq!((series.home_wins, series.away_wins), (4, 2));
    }

    #[test]
    fn test_record_win_ignores_outsider() {
        let mut series = series_at(1, 1);
        assert!(!series.record_win(TeamId(7)));
        assert_eq!(series.games_played(), 2);
    }

    #[test]
    fn test_involves_either_order() {
        let series = SeriesState::new(TeamId(4), TeamId(9));
        assert!(series.involves(TeamId(9), TeamId(4)));
        assert!(series.involves(TeamId(4), TeamId(9)));
        assert!(!series.involves(TeamId(4), TeamId(5)));
    }

    #[test]
    fn test_check_finished_and_stage() {
        let mut round = vec![series_at(0, 0), series_at(0, 0)];
        assert_eq!(round_stage(&round), RoundStage::Scheduled);

        round[0] = series_at(4, 1);
        assert!(!check_finished(&round));
        assert_eq!(round_stage(&round), RoundStage::InProgress);

        round[1] = series_at(3, 4);
        assert!(check_finished(&round));
        assert_eq!(round_stage(&round), RoundStage::Complete);
        assert_eq!(round[1].winner(), Some(TeamId(1)));
    }
}
