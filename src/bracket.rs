use rand::Rng;
use std::cmp::Ordering;
use std::fmt;
use tracing::debug;

use crate::error::{Result, SimError};
use crate::game::{Game, Phase};
use crate::league::TeamId;
use crate::season::Rules;
use crate::series::{round_stage, RoundStage, SeriesState};
use crate::standings::{Seeding, StandingEntry};
use crate::team::LeagueState;

/// Playoff rounds in the order they are played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Round {
    First,
    Second,
    ConferenceFinal,
    Final,
}

impl Round {
    pub const ALL: [Round; 4] = [Round::First, Round::Second, Round::ConferenceFinal, Round::Final];

    pub fn index(self) -> usize {
        match self {
            Round::First => 0,
            Round::Second => 1,
            Round::ConferenceFinal => 2,
            Round::Final => 3,
        }
    }

    pub fn next(self) -> Option<Round> {
        Round::ALL.get(self.index() + 1).copied()
    }

    /// Inside a division the better seed has home ice; once divisions meet,
    /// the better regular season record does.
    fn seed_decides_home_ice(self) -> bool {
        matches!(self, Round::First | Round::Second)
    }
}

impl fmt::Display for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Round::First => "first round",
            Round::Second => "second round",
            Round::ConferenceFinal => "conference final",
            Round::Final => "final",
        })
    }
}

/// A qualified team with its place in its bracket group (0 = division
/// winner, 3 = wild card) and its regular season standing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entrant {
    pub team: TeamId,
    pub seed: usize,
    pub standing: StandingEntry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pairing {
    pub home: Entrant,
    pub away: Entrant,
}

/// Round one: in every group the division winner meets the wild card and
/// second place meets third.
pub fn first_round(seeding: &Seeding) -> Vec<Pairing> {
    seeding
        .groups
        .iter()
        .flat_map(|group| {
            let entrant = |seed: usize| Entrant {
                team: group[seed].team,
                seed,
                standing: group[seed],
            };
            [
                Pairing { home: entrant(0), away: entrant(3) },
                Pairing { home: entrant(1), away: entrant(2) },
            ]
        })
        .collect()
}

/// Pair `winners` (in bracket order) for `round`: series `j` is the winners
/// of the previous round's series `2j` and `2j + 1`.
pub fn next_round(round: Round, winners: &[Entrant]) -> Result<Vec<Pairing>> {
    if winners.is_empty() || winners.len() % 2 != 0 {
        return Err(SimError::bracket(
            round,
            format!("cannot pair {} advancing teams", winners.len()),
        ));
    }

    Ok(winners
        .chunks_exact(2)
        .map(|pair| {
            let (a, b) = (pair[0], pair[1]);
            let a_home = if round.seed_decides_home_ice() {
                a.seed <= b.seed
            } else {
                a.standing.cmp_record(&b.standing) != Ordering::Greater
            };
            if a_home {
                Pairing { home: a, away: b }
            } else {
                Pairing { home: b, away: a }
            }
        })
        .collect())
}

/// Outcome of one trial's playoffs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayoffResult {
    /// Series winners of rounds 1-3, i.e. the teams reaching rounds 2-4
    pub advanced: [Vec<TeamId>; 3],
    pub champion: TeamId,
    /// Played playoff games that fit no series and were skipped
    pub unmatched_games: usize,
}

/// Resolves the bracket for one trial, resuming from real results.
pub struct PlayoffEngine<'a> {
    rules: &'a Rules,
}

impl<'a> PlayoffEngine<'a> {
    pub fn new(rules: &'a Rules) -> Self {
        PlayoffEngine { rules }
    }

    /// Play every round from `seeding` to a champion.
    ///
    /// `past` holds the played playoff games not yet consumed, in date
    /// order; each round takes the games that belong to it and leaves the
    /// rest for later rounds. Whatever is left after the final is skipped.
    pub fn run<R: Rng + ?Sized>(
        &self,
        seeding: &Seeding,
        state: &mut LeagueState,
        past: &mut Vec<Game>,
        rng: &mut R,
    ) -> Result<PlayoffResult> {
        let mut advanced: [Vec<TeamId>; 3] = Default::default();
        let mut unmatched = 0;
        let mut pairings = first_round(seeding);
        let mut round = Round::First;

        loop {
            let (winners, skipped) = self.play_round(round, &pairings, state, past, rng)?;
            unmatched += skipped;

            let Some(next) = round.next() else {
                let [champion] = winners[..] else {
                    return Err(SimError::bracket(
                        round,
                        format!("{} teams won the final", winners.len()),
                    ));
                };
                unmatched += past.len();
                past.clear();
                return Ok(PlayoffResult {
                    advanced,
                    champion: champion.team,
                    unmatched_games: unmatched,
                });
            };

            advanced[round.index()] = winners.iter().map(|e| e.team).collect();
            pairings = next_round(next, &winners)?;
            round = next;
        }
    }

    /// Replay this round's real games, simulate whatever is undecided and
    /// return the series winners in bracket order plus the skipped-game count.
    fn play_round<R: Rng + ?Sized>(
        &self,
        round: Round,
        pairings: &[Pairing],
        state: &mut LeagueState,
        past: &mut Vec<Game>,
        rng: &mut R,
    ) -> Result<(Vec<Entrant>, usize)> {
        let mut series: Vec<SeriesState> = pairings
            .iter()
            .map(|p| SeriesState::new(p.home.team, p.away.team))
            .collect();

        let skipped = self.replay(&mut series, state, past);
        let stage = round_stage(&series);
        debug!(round = %round, ?stage, series = series.len(), "round resumed");

        if stage != RoundStage::Complete {
            for s in series.iter_mut().filter(|s| !s.is_complete()) {
                self.complete_series(s, state, rng);
            }
        }

        let winners = pairings
            .iter()
            .zip(&series)
            .map(|(pairing, s)| match s.winner() {
                Some(team) if team == pairing.home.team => Ok(pairing.home),
                Some(_) => Ok(pairing.away),
                None => Err(SimError::bracket(
                    round,
                    format!("series {:?} vs {:?} has no winner", s.home, s.away),
                )),
            })
            .collect::<Result<Vec<_>>>()?;

        Ok((winners, skipped))
    }

    /// Consume the games in `past` that belong to one of `series`, applying
    /// them against the trial's current ratings. A game for a series that is
    /// already decided is dropped and counted.
    fn replay(
        &self,
        series: &mut [SeriesState],
        state: &mut LeagueState,
        past: &mut Vec<Game>,
    ) -> usize {
        let mut skipped = 0;
        past.retain(|game| {
            let Some(s) = series.iter_mut().find(|s| s.involves(game.home, game.away)) else {
                return true;
            };
            if s.is_complete() {
                skipped += 1;
                return false;
            }
            if let Some(outcome) = self.rules.replay(state, game) {
                s.record_win(outcome.winner(game.home, game.away));
            }
            false
        });
        skipped
    }

    /// Simulate an undecided series to four wins and return how many games
    /// that took.
    ///
    /// Only the games the leader would need are scheduled up front; each
    /// simulated game that raises the trailing side's win count schedules
    /// one more.
    pub fn complete_series<R: Rng + ?Sized>(
        &self,
        series: &mut SeriesState,
        state: &mut LeagueState,
        rng: &mut R,
    ) -> u8 {
        let mut scheduled = series.games_needed();
        let mut simulated = 0;

        while scheduled > 0 && !series.is_complete() {
            scheduled -= 1;
            let low = series.min_wins();
            let outcome = self
                .rules
                .simulate(state, series.home, series.away, Phase::Playoff, rng);
            series.record_win(outcome.winner(series.home, series.away));
            simulated += 1;
            if series.min_wins() > low {
                scheduled += 1;
            }
        }

        simulated
    }
}
