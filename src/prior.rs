use serde::Deserialize;
use std::collections::HashMap;

use crate::error::Result;

/// Final ratings from the previous season, keyed by team name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriorRatings {
    ratings: HashMap<String, f64>,
}

#[derive(Deserialize)]
struct PriorTeam {
    name: String,
    elo: f64,
}

#[derive(Deserialize)]
struct Snapshot {
    data: Vec<PriorTeam>,
}

/// Either a bare team list or a results history of dated snapshots.
#[derive(Deserialize)]
#[serde(untagged)]
enum PriorFile {
    History(Vec<Snapshot>),
    Teams(Vec<PriorTeam>),
}

impl PriorRatings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a prior-season snapshot. A results history uses its most
    /// recent entry.
    pub fn from_json(json: &str) -> Result<Self> {
        let teams = match serde_json::from_str::<PriorFile>(json)? {
            PriorFile::History(mut history) => history.pop().map(|s| s.data).unwrap_or_default(),
            PriorFile::Teams(teams) => teams,
        };
        Ok(teams.into_iter().map(|t| (t.name, t.elo)).collect())
    }

    pub fn insert(&mut self, name: &str, rating: f64) {
        self.ratings.insert(name.to_string(), rating);
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.ratings.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }
}

impl FromIterator<(String, f64)> for PriorRatings {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        PriorRatings {
            ratings: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_team_list() {
        let json = r#"[{"name": "Boston Bruins", "elo": 1540.5}, {"name": "Buffalo Sabres", "elo": 1450.0}]"#;
        let priors = PriorRatings::from_json(json).unwrap();
        assert_eq!(priors.len(), 2);
        assert_eq!(priors.get("Boston Bruins"), Some(1540.5));
        assert_eq!(priors.get("Vegas Golden Knights"), None);
    }

    #[test]
    fn test_history_uses_last_snapshot() {
        let json = r#"[
            {"date": "2017-04-01", "playoffs": false, "data": [{"name": "Ottawa Senators", "elo": 1510.0, "w": 40}]},
            {"date": "2017-06-12", "playoffs": true, "data": [{"name": "Ottawa Senators", "elo": 1525.0, "w": 44}]}
        ]"#;
        let priors = PriorRatings::from_json(json).unwrap();
        assert_eq!(priors.get("Ottawa Senators"), Some(1525.0));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(PriorRatings::from_json(r#"{"elo": 3}"#).is_err());
    }
}
