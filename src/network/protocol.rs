//! Leaderboard Wire Format
//!
//! The leaderboard service stores every field as a string. Ranked lists come
//! back as an array of flat objects; submissions send a list of name/value
//! pairs. Numbers are parsed on the way in and formatted on the way out.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::game::score::ScoreEntry;

// =============================================================================
// SERVER -> CLIENT
// =============================================================================

/// One row of `GET .../rankedlist`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireScoreEntry {
    /// Player name.
    #[serde(rename = "playerID")]
    pub player_id: String,
    /// Submission timestamp.
    #[serde(default)]
    pub highscore: String,
    /// Whole seconds.
    pub total_time: String,
    /// Whole seconds.
    pub puzzle_time: String,
    /// Whole meters.
    #[serde(default)]
    pub distance: String,
    /// Count.
    pub hints: String,
    /// Count.
    pub skips: String,
}

/// A wire row with a non-numeric field.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("field {field} of {player} is not a number: {value:?}")]
pub struct FieldError {
    /// Player the row belongs to.
    pub player: String,
    /// Offending field.
    pub field: &'static str,
    /// Raw value.
    pub value: String,
}

impl WireScoreEntry {
    fn number<T: std::str::FromStr>(&self, field: &'static str, value: &str) -> Result<T, FieldError> {
        value.trim().parse().map_err(|_| FieldError {
            player: self.player_id.clone(),
            field,
            value: value.to_string(),
        })
    }
}

impl TryFrom<WireScoreEntry> for ScoreEntry {
    type Error = FieldError;

    fn try_from(wire: WireScoreEntry) -> Result<Self, Self::Error> {
        // Older rows have no distance
        let distance_meters = if wire.distance.trim().is_empty() {
            0
        } else {
            wire.number("distance", &wire.distance)?
        };

        Ok(ScoreEntry {
            total_time_secs: wire.number("totalTime", &wire.total_time)?,
            puzzle_time_secs: wire.number("puzzleTime", &wire.puzzle_time)?,
            hints: wire.number("hints", &wire.hints)?,
            skips: wire.number("skips", &wire.skips)?,
            distance_meters,
            username: wire.player_id,
            highscore: wire.highscore,
        })
    }
}

impl From<&ScoreEntry> for WireScoreEntry {
    fn from(entry: &ScoreEntry) -> Self {
        Self {
            player_id: entry.username.clone(),
            highscore: entry.highscore.clone(),
            total_time: entry.total_time_secs.to_string(),
            puzzle_time: entry.puzzle_time_secs.to_string(),
            distance: entry.distance_meters.to_string(),
            hints: entry.hints.to_string(),
            skips: entry.skips.to_string(),
        }
    }
}

/// Convert a fetched list, dropping rows that do not parse.
pub fn parse_ranked_list(rows: Vec<WireScoreEntry>) -> Vec<ScoreEntry> {
    rows.into_iter()
        .filter_map(|row| match ScoreEntry::try_from(row) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(error = %e, "Skipping leaderboard row");
                None
            }
        })
        .collect()
}

// =============================================================================
// CLIENT -> SERVER
// =============================================================================

/// One `{"name": ..., "value": ...}` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedValue {
    /// Field name.
    pub name: String,
    /// Field value.
    pub value: String,
}

impl NamedValue {
    fn new(name: &str, value: impl ToString) -> Self {
        Self { name: name.to_string(), value: value.to_string() }
    }
}

/// Body of `POST .../{player}/score`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitScoreRequest {
    /// Fields in server order.
    pub score_entries: Vec<NamedValue>,
}

impl From<&ScoreEntry> for SubmitScoreRequest {
    fn from(entry: &ScoreEntry) -> Self {
        Self {
            score_entries: vec![
                NamedValue::new("highscore", &entry.highscore),
                NamedValue::new("totalTime", entry.total_time_secs),
                NamedValue::new("puzzleTime", entry.puzzle_time_secs),
                NamedValue::new("distance", entry.distance_meters),
                NamedValue::new("hints", entry.hints),
                NamedValue::new("skips", entry.skips),
            ],
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
