//! Cumulative statistics kept on the player's machine.
//!
//! The stored record carries a `version`. Older unversioned records (and
//! records with missing or mistyped fields) are migrated by filling the gaps
//! with zeroes; anything that is not a JSON object is replaced outright.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const STATS_VERSION: u32 = 1;

#[derive(Debug)]
pub enum StatsError {
    Json(serde_json::Error),
    NotAnObject,
    UnsupportedVersion(u64),
}

impl fmt::Display for StatsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(e) => write!(f, "Malformed stats: {}", e),
            Self::NotAnObject => write!(f, "Stats must be a JSON object"),
            Self::UnsupportedVersion(v) => write!(f, "Unsupported stats version {}", v),
        }
    }
}

impl std::error::Error for StatsError {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredStats {
    pub version: u32,
    pub played: u32,
    pub won: u32,
    pub streak: u32,
    pub max_streak: u32,
    // attempts -> rounds finished with that many guesses
    pub guesses: BTreeMap<u32, u32>,
}

impl Default for StoredStats {
    fn default() -> Self {
        Self {
            version: STATS_VERSION,
            played: 0,
            won: 0,
            streak: 0,
            max_streak: 0,
            guesses: BTreeMap::new(),
        }
    }
}

fn count(obj: &Map<String, Value>, key: &str) -> u32 {
    obj.get(key)
        .and_then(Value::as_u64)
        .map(|n| u32::try_from(n).unwrap_or(u32::MAX))
        .unwrap_or(0)
}

impl StoredStats {
    pub fn parse(raw: &str) -> Result<Self, StatsError> {
        let value: Value = serde_json::from_str(raw).map_err(StatsError::Json)?;
        Self::from_value(&value)
    }

    pub fn from_value(value: &Value) -> Result<Self, StatsError> {
        let obj = value.as_object().ok_or(StatsError::NotAnObject)?;

        let version = obj.get("version").and_then(Value::as_u64).unwrap_or(0);
        if version > u64::from(STATS_VERSION) {
            return Err(StatsError::UnsupportedVersion(version));
        }

        let guesses = obj
            .get("guesses")
            .and_then(Value::as_object)
            .map(|histogram| {
                histogram
                    .iter()
                    .filter_map(|(attempts, n)| {
                        let attempts = attempts.parse::<u32>().ok()?;
                        let n = u32::try_from(n.as_u64()?).ok()?;
                        Some((attempts, n))
                    })
                    .collect()
            })
            .unwrap_or_default();

        let mut stats = Self {
            version: STATS_VERSION,
            played: count(obj, "played"),
            won: count(obj, "won"),
            streak: count(obj, "streak"),
            max_streak: count(obj, "maxStreak"),
            guesses,
        };
        stats.won = stats.won.min(stats.played);
        stats.max_streak = stats.max_streak.max(stats.streak);
        Ok(stats)
    }

    /// Folds a finished round in. `server_streak` is authoritative for the
    /// current streak; the best streak is kept locally.
    pub fn record_round(&mut self, won: bool, attempts: u32, server_streak: u32) {
        self.played = self.played.saturating_add(1);
        if won {
            self.won = self.won.saturating_add(1);
        }
        self.streak = server_streak;
        self.max_streak = self.max_streak.max(server_streak);
        *self.guesses.entry(attempts).or_insert(0) += 1;
    }

    pub fn win_percentage(&self) -> u32 {
        if self.played == 0 {
            return 0;
        }
        ((u64::from(self.won) * 100 + u64::from(self.played) / 2) / u64::from(self.played)) as u32
    }
}

/// Totals for the current run of the program only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub words_played: u32,
    pub hints_used: u32,
}
