use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, SimError};
use crate::league::{League, TeamId};

/// Competition phase of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Regular,
    Playoff,
    /// Preseason, all-star and other games outside the projection
    Exhibition,
}

impl Phase {
    pub fn code(&self) -> &'static str {
        match self {
            Phase::Regular => "R",
            Phase::Playoff => "P",
            Phase::Exhibition => "X",
        }
    }
}

impl FromStr for Phase {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "R" => Phase::Regular,
            "P" => Phase::Playoff,
            _ => Phase::Exhibition,
        })
    }
}

/// How a game was (or will be) decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultKind {
    Regulation,
    Overtime,
    Shootout,
    NotPlayed,
}

impl ResultKind {
    pub fn code(&self) -> &'static str {
        match self {
            ResultKind::Regulation => "REG",
            ResultKind::Overtime => "OT",
            ResultKind::Shootout => "SO",
            ResultKind::NotPlayed => "TBD",
        }
    }

    pub fn is_played(&self) -> bool {
        !matches!(self, ResultKind::NotPlayed)
    }
}

impl FromStr for ResultKind {
    type Err = std::convert::Infallible;

    /// Multi-overtime ordinals ("2OT", "3OT") are overtime; anything that
    /// is not a final result (live period ordinals, "TBD") is unplayed.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "REG" => ResultKind::Regulation,
            "SO" => ResultKind::Shootout,
            s if s.ends_with("OT") => ResultKind::Overtime,
            _ => ResultKind::NotPlayed,
        })
    }
}

macro_rules! serde_by_code {
    ($ty:ty) => {
        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
                serializer.serialize_str(self.code())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                match raw.parse::<$ty>() {
                    Ok(value) => Ok(value),
                    Err(never) => match never {},
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.code())
            }
        }
    };
}

serde_by_code!(Phase);
serde_by_code!(ResultKind);

/// One game as delivered by the schedule collaborator. Never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    pub date: NaiveDate,
    #[serde(rename = "gameType")]
    pub phase: Phase,
    #[serde(rename = "resultType")]
    pub result: ResultKind,
    pub home_team: String,
    pub away_team: String,
    #[serde(default)]
    pub home_goals: u32,
    #[serde(default)]
    pub away_goals: u32,
}

impl GameRecord {
    /// Parse a JSON array of game records.
    pub fn list_from_json(json: &str) -> Result<Vec<GameRecord>> {
        Ok(serde_json::from_str(json)?)
    }
}

/// A game resolved against the league roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Game {
    pub date: NaiveDate,
    pub phase: Phase,
    pub result: ResultKind,
    pub home: TeamId,
    pub away: TeamId,
    pub home_goals: u32,
    pub away_goals: u32,
}

impl Game {
    pub fn resolve(record: &GameRecord, league: &League) -> Result<Self> {
        let mut game = Game {
            date: record.date,
            phase: record.phase,
            result: record.result,
            home: league.team_id(&record.home_team)?,
            away: league.team_id(&record.away_team)?,
            home_goals: record.home_goals,
            away_goals: record.away_goals,
        };

        if game.home == game.away {
            return Err(SimError::InvalidGame(format!(
                "{} on {} is listed against itself",
                record.home_team, record.date
            )));
        }
        // A live game can carry a result code while still level
        if game.is_played() && game.home_goals == game.away_goals {
            tracing::warn!(
                home = %record.home_team,
                away = %record.away_team,
                date = %record.date,
                goals = game.home_goals,
                "level game reported as final, treating it as unplayed"
            );
            game.result = ResultKind::NotPlayed;
        }

        Ok(game)
    }

    pub fn is_played(&self) -> bool {
        self.result.is_played()
    }

    /// Winner implied by the goals; `None` until the game is played.
    pub fn winner(&self) -> Option<TeamId> {
        if !self.is_played() {
            return None;
        }
        Some(if self.home_goals > self.away_goals { self.home } else { self.away })
    }

    pub fn goal_differential(&self) -> u32 {
        self.home_goals.abs_diff(self.away_goals)
    }
}

/// Games split by phase and by whether they have been played, each list in
/// chronological order.
#[derive(Debug, Clone, Default)]
pub struct Schedule {
    pub past_regular: Vec<Game>,
    pub future_regular: Vec<Game>,
    pub past_playoff: Vec<Game>,
    pub future_playoff: Vec<Game>,
}

impl Schedule {
    pub fn from_records(records: &[GameRecord], league: &League) -> Result<Self> {
        let mut schedule = Schedule::default();
        let mut exhibition = 0usize;

        for record in records {
            if record.phase == Phase::Exhibition {
                exhibition += 1;
                continue;
            }
            let game = Game::resolve(record, league)?;
            let bucket = match (game.phase, game.is_played()) {
                (Phase::Regular, true) => &mut schedule.past_regular,
                (Phase::Regular, false) => &mut schedule.future_regular,
                (_, true) => &mut schedule.past_playoff,
                (_, false) => &mut schedule.future_playoff,
            };
            bucket.push(game);
        }

        // Stable: games on the same date keep their delivered order
        for games in [
            &mut schedule.past_regular,
            &mut schedule.future_regular,
            &mut schedule.past_playoff,
            &mut schedule.future_playoff,
        ] {
            games.sort_by_key(|g| g.date);
        }

        if exhibition > 0 {
            tracing::debug!(exhibition, "ignored games outside the regular season and playoffs");
        }

        Ok(schedule)
    }

    pub fn regular_season_complete(&self) -> bool {
        self.future_regular.is_empty()
    }
}
