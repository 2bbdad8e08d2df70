use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::constants::{DIVISION_QUALIFIERS, WILD_CARDS};
use crate::error::{Result, SimError};

/// Slot of a team in every per-trial state array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TeamId(pub usize);

impl TeamId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Division as supplied by the caller: name, owning conference, members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DivisionLayout {
    pub name: String,
    pub conference: String,
    pub teams: Vec<String>,
}

impl DivisionLayout {
    pub fn new(name: &str, conference: &str, teams: &[&str]) -> Self {
        DivisionLayout {
            name: name.to_string(),
            conference: conference.to_string(),
            teams: teams.iter().map(|t| t.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Division {
    pub name: String,
    pub conference: usize,
    pub teams: Vec<TeamId>,
}

#[derive(Debug, Clone)]
pub struct Conference {
    pub name: String,
    /// Indices into `League::divisions`, in the order they were listed
    pub divisions: [usize; 2],
}

/// League roster and alignment with a name index built once.
///
/// The bracket assumes two conferences of two divisions each; anything else
/// is rejected up front.
#[derive(Debug, Clone)]
pub struct League {
    names: Vec<String>,
    team_division: Vec<usize>,
    divisions: Vec<Division>,
    conferences: Vec<Conference>,
    index: HashMap<String, TeamId>,
}

impl League {
    pub fn new(layouts: Vec<DivisionLayout>) -> Result<Self> {
        let mut names = Vec::new();
        let mut team_division = Vec::new();
        let mut divisions: Vec<Division> = Vec::with_capacity(layouts.len());
        let mut conference_names: Vec<String> = Vec::new();
        let mut conference_divisions: Vec<Vec<usize>> = Vec::new();
        let mut index = HashMap::new();

        for layout in layouts {
            let conference = match conference_names.iter().position(|c| *c == layout.conference) {
                Some(i) => i,
                None => {
                    conference_names.push(layout.conference.clone());
                    conference_divisions.push(Vec::new());
                    conference_names.len() - 1
                }
            };

            if layout.teams.len() < DIVISION_QUALIFIERS {
                return Err(SimError::InvalidLeague(format!(
                    "division {} has {} teams, needs at least {}",
                    layout.name,
                    layout.teams.len(),
                    DIVISION_QUALIFIERS
                )));
            }

            let division = divisions.len();
            let mut teams = Vec::with_capacity(layout.teams.len());
            for name in layout.teams {
                let id = TeamId(names.len());
                if index.insert(name.clone(), id).is_some() {
                    return Err(SimError::InvalidLeague(format!("{} is listed twice", name)));
                }
                names.push(name);
                team_division.push(division);
                teams.push(id);
            }

            conference_divisions[conference].push(division);
            divisions.push(Division {
                name: layout.name,
                conference,
                teams,
            });
        }

        if conference_names.len() != 2 {
            return Err(SimError::InvalidLeague(format!(
                "expected 2 conferences, found {}",
                conference_names.len()
            )));
        }

        let mut conferences = Vec::with_capacity(2);
        for (name, members) in conference_names.into_iter().zip(conference_divisions) {
            let [first, second] = members[..] else {
                return Err(SimError::InvalidLeague(format!(
                    "conference {} has {} divisions, expected 2",
                    name,
                    members.len()
                )));
            };
            let size = divisions[first].teams.len() + divisions[second].teams.len();
            if size < 2 * DIVISION_QUALIFIERS + WILD_CARDS {
                return Err(SimError::InvalidLeague(format!(
                    "conference {} has {} teams, too few for {} wild cards",
                    name, size, WILD_CARDS
                )));
            }
            conferences.push(Conference {
                name,
                divisions: [first, second],
            });
        }

        Ok(League {
            names,
            team_division,
            divisions,
            conferences,
            index,
        })
    }

    /// Parse a JSON array of `DivisionLayout`.
    pub fn from_json(json: &str) -> Result<Self> {
        let layouts: Vec<DivisionLayout> = serde_json::from_str(json)?;
        League::new(layouts)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn team_id(&self, name: &str) -> Result<TeamId> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| SimError::UnknownTeam(name.to_string()))
    }

    pub fn name(&self, team: TeamId) -> &str {
        &self.names[team.index()]
    }

    pub fn team_ids(&self) -> impl Iterator<Item = TeamId> {
        (0..self.names.len()).map(TeamId)
    }

    pub fn divisions(&self) -> &[Division] {
        &self.divisions
    }

    pub fn conferences(&self) -> &[Conference] {
        &self.conferences
    }

    pub fn division_of(&self, team: TeamId) -> &Division {
        &self.divisions[self.team_division[team.index()]]
    }

    pub fn conference_of(&self, team: TeamId) -> &Conference {
        &self.conferences[self.division_of(team).conference]
    }
}

/// The 2017-18 NHL alignment.
pub fn nhl_divisions() -> Vec<DivisionLayout> {
    vec![
        DivisionLayout::new(
            "Atlantic",
            "Eastern",
            &[
                "Boston Bruins",
                "Buffalo Sabres",
                "Detroit Red Wings",
                "Florida Panthers",
                "Montr\u{e9}al Canadiens",
                "Ottawa Senators",
                "Tampa Bay Lightning",
                "Toronto Maple Leafs",
            ],
        ),
        DivisionLayout::new(
            "Metropolitan",
            "Eastern",
            &[
                "Carolina Hurricanes",
                "Columbus Blue Jackets",
                "New Jersey Devils",
                "New York Islanders",
                "New York Rangers",
                "Philadelphia Flyers",
                "Pittsburgh Penguins",
                "Washington Capitals",
            ],
        ),
        DivisionLayout::new(
            "Central",
            "Western",
            &[
                "Chicago Blackhawks",
                "Colorado Avalanche",
                "Dallas Stars",
                "Minnesota Wild",
                "Nashville Predators",
                "St. Louis Blues",
                "Winnipeg Jets",
            ],
        ),
        DivisionLayout::new(
            "Pacific",
            "Western",
            &[
                "Anaheim Ducks",
                "Arizona Coyotes",
                "Calgary Flames",
                "Edmonton Oilers",
                "Los Angeles Kings",
                "San Jose Sharks",
                "Vancouver Canucks",
                "Vegas Golden Knights",
            ],
        ),
    ]
}
