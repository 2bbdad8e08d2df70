use std::cmp::Ordering;

use crate::constants::{DIVISION_QUALIFIERS, WILD_CARDS};
use crate::error::{Result, SimError};
use crate::league::{League, TeamId};
use crate::team::LeagueState;

/// One row of a standings table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StandingEntry {
    pub team: TeamId,
    pub points: u32,
    pub regulation_wins: u32,
    /// 1-based position in the table this entry was ranked in
    pub rank: usize,
}

impl StandingEntry {
    pub fn of(team: TeamId, state: &LeagueState) -> Self {
        StandingEntry {
            team,
            points: state[team].points(),
            regulation_wins: state[team].regulation_wins,
            rank: 0,
        }
    }

    /// `Less` when `self` ranks above `other`: points, then regulation wins.
    pub fn cmp_record(&self, other: &StandingEntry) -> Ordering {
        other
            .points
            .cmp(&self.points)
            .then(other.regulation_wins.cmp(&self.regulation_wins))
    }
}

/// Rank `teams` by record. The sort is stable, so teams level on both
/// points and regulation wins keep the order they were given in.
pub fn rank(teams: impl IntoIterator<Item = TeamId>, state: &LeagueState) -> Vec<StandingEntry> {
    let entries = teams.into_iter().map(|t| StandingEntry::of(t, state)).collect();
    rerank(entries)
}

fn rerank(mut entries: Vec<StandingEntry>) -> Vec<StandingEntry> {
    entries.sort_by(StandingEntry::cmp_record);
    for (i, entry) in entries.iter_mut().enumerate() {
        entry.rank = i + 1;
    }
    entries
}

/// Division, conference and league tables for one trial.
#[derive(Debug, Clone)]
pub struct Standings {
    pub divisions: Vec<Vec<StandingEntry>>,
    pub conferences: Vec<Vec<StandingEntry>>,
    pub league: Vec<StandingEntry>,
}

/// Playoff qualifiers and bracket groups derived from the standings.
#[derive(Debug, Clone)]
pub struct Seeding {
    /// Division finishers 1..3, per division
    pub division_places: Vec<[TeamId; DIVISION_QUALIFIERS]>,
    /// Wild cards 1 and 2, per conference
    pub wild_cards: Vec<[TeamId; WILD_CARDS]>,
    /// `[d1, d2, d3, wild card]` per division, conference by conference
    pub groups: Vec<[StandingEntry; DIVISION_QUALIFIERS + 1]>,
    pub conference_best: Vec<TeamId>,
    pub league_best: TeamId,
}

impl Seeding {
    pub fn qualifiers(&self) -> impl Iterator<Item = TeamId> + '_ {
        self.groups.iter().flat_map(|g| g.iter().map(|e| e.team))
    }
}

impl Standings {
    pub fn compute(league: &League, state: &LeagueState) -> Self {
        let divisions = league
            .divisions()
            .iter()
            .map(|d| rank(d.teams.iter().copied(), state))
            .collect();

        let conferences = league
            .conferences()
            .iter()
            .map(|c| {
                let members = c
                    .divisions
                    .iter()
                    .flat_map(|&d| league.divisions()[d].teams.iter().copied());
                rank(members, state)
            })
            .collect();

        Standings {
            divisions,
            conferences,
            league: rank(league.team_ids(), state),
        }
    }

    /// Pick division qualifiers and wild cards and pair the wild cards with
    /// division winners: the better division winner meets the second wild card.
    pub fn seed(&self, league: &League) -> Result<Seeding> {
        let mut division_places = Vec::with_capacity(self.divisions.len());
        for (division, table) in league.divisions().iter().zip(&self.divisions) {
            let places: [TeamId; DIVISION_QUALIFIERS] = table
                .iter()
                .take(DIVISION_QUALIFIERS)
                .map(|e| e.team)
                .collect::<Vec<_>>()
                .try_into()
                .map_err(|_| {
                    SimError::bracket(
                        "seeding",
                        format!("division {} has too few teams", division.name),
                    )
                })?;
            division_places.push(places);
        }

        let mut wild_cards = Vec::with_capacity(league.conferences().len());
        let mut groups = Vec::with_capacity(self.divisions.len());

        for (conference, table) in league.conferences().iter().zip(&self.conferences) {
            let pool: Vec<StandingEntry> = table
                .iter()
                .filter(|e| {
                    !conference
                        .divisions
                        .iter()
                        .any(|&d| division_places[d].contains(&e.team))
                })
                .copied()
                .collect();
            let pool = rerank(pool);
            let (wc1, wc2) = match pool.as_slice() {
                [first, second, ..] => (*first, *second),
                _ => {
                    return Err(SimError::bracket(
                        "seeding",
                        format!("conference {} has fewer than {} wild cards", conference.name, WILD_CARDS),
                    ))
                }
            };
            wild_cards.push([wc1.team, wc2.team]);

            let [first, second] = conference.divisions;
            let leader_first = self.divisions[first][0];
            let leader_second = self.divisions[second][0];
            let (wc_first, wc_second) = if leader_first.cmp_record(&leader_second) == Ordering::Greater {
                (wc1, wc2)
            } else {
                (wc2, wc1)
            };

            for (division, wild_card) in [(first, wc_first), (second, wc_second)] {
                let table = &self.divisions[division];
                groups.push([table[0], table[1], table[2], wild_card]);
            }
        }

        let conference_best = self.conferences.iter().map(|t| t[0].team).collect();
        let league_best = self
            .league
            .first()
            .map(|e| e.team)
            .ok_or_else(|| SimError::bracket("seeding", "league has no teams"))?;

        Ok(Seeding {
            division_places,
            wild_cards,
            groups,
            conference_best,
            league_best,
        })
    }
}
