//! Configuration
//!
//! Runtime settings come from the environment (`GameConfig::from_env`), the
//! quest layout from a JSON file or the built-in seven-chapter hunt. A
//! malformed quest is rejected here so nothing downstream has to cope with
//! half-configured puzzles.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::Coordinates;

/// Default leaderboard game identifier.
pub const DEFAULT_GAME_ID: &str = "ARTreasureHunt";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("quest file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid quest: {0}")]
    InvalidQuest(String),

    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },
}

// =============================================================================
// RUNTIME CONFIG
// =============================================================================

/// Leaderboard endpoint settings.
#[derive(Debug, Clone)]
pub struct LeaderboardConfig {
    /// Base URL of the leaderboard service. `None` disables all requests.
    pub base_url: Option<String>,
    /// Game identifier used in every request path.
    pub game_id: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            game_id: DEFAULT_GAME_ID.to_string(),
            timeout_secs: 10,
        }
    }
}

/// Process-wide game settings.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Directory holding the four save files.
    pub save_dir: PathBuf,
    /// Leaderboard endpoint.
    pub leaderboard: LeaderboardConfig,
    /// Seconds of play between autosaves.
    pub autosave_interval_secs: f64,
    /// Seconds between GPS samples fed to the session.
    pub gps_interval_secs: f64,
    /// Frames per second of the game loop.
    pub frame_rate: u32,
    /// Seconds to wait before re-probing connectivity after a failure.
    pub connectivity_retry_secs: f64,
    /// Seconds to wait before re-probing connectivity after a success.
    pub connectivity_recheck_secs: f64,
    /// Optional quest layout file. Built-in quest when `None`.
    pub quest_file: Option<PathBuf>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            save_dir: PathBuf::from("savegame"),
            leaderboard: LeaderboardConfig::default(),
            autosave_interval_secs: 5.0,
            gps_interval_secs: 5.0,
            frame_rate: 30,
            connectivity_retry_secs: 2.0,
            connectivity_recheck_secs: 5.0,
            quest_file: None,
        }
    }
}

impl GameConfig {
    /// Load from `TREASURE_*` environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(dir) = std::env::var("TREASURE_SAVE_DIR") {
            config.save_dir = PathBuf::from(dir);
        }
        if let Ok(url) = std::env::var("TREASURE_LEADERBOARD_URL") {
            if !url.is_empty() {
                config.leaderboard.base_url = Some(url.trim_end_matches('/').to_string());
            }
        }
        if let Ok(id) = std::env::var("TREASURE_GAME_ID") {
            config.leaderboard.game_id = id;
        }
        if let Ok(secs) = std::env::var("TREASURE_AUTOSAVE_SECS") {
            config.autosave_interval_secs = parse_positive("TREASURE_AUTOSAVE_SECS", &secs)?;
        }
        if let Ok(rate) = std::env::var("TREASURE_FRAME_RATE") {
            config.frame_rate = rate
                .parse::<u32>()
                .ok()
                .filter(|r| *r > 0)
                .ok_or(ConfigError::InvalidValue { key: "TREASURE_FRAME_RATE", value: rate })?;
        }
        if let Ok(path) = std::env::var("TREASURE_QUEST_FILE") {
            config.quest_file = Some(PathBuf::from(path));
        }

        Ok(config)
    }

    /// Seconds per frame.
    pub fn frame_secs(&self) -> f64 {
        1.0 / self.frame_rate.max(1) as f64
    }

    /// Quest layout from `quest_file`, or the built-in hunt.
    pub fn load_quest(&self) -> Result<QuestDefinition, ConfigError> {
        match &self.quest_file {
            Some(path) => QuestDefinition::from_json_file(path),
            None => Ok(QuestDefinition::builtin()),
        }
    }
}

fn parse_positive(key: &'static str, value: &str) -> Result<f64, ConfigError> {
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
        .ok_or_else(|| ConfigError::InvalidValue { key, value: value.to_string() })
}

// =============================================================================
// QUEST DEFINITION
// =============================================================================

/// Logic behind a chapter's physical puzzle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MechanismKind {
    /// No on-screen mechanism; solved by the game directly or via skip.
    None,
    /// Animated map that finishes after being watched for `seconds`.
    Reveal { seconds: f64 },
    /// Number dials that must show `combination`.
    CombinationLock { dials: usize, combination: Vec<u8> },
    /// Square sliding-tile puzzle with one gap.
    SlidingTiles { size: usize, seed: Option<u64> },
    /// Levers that must all be flipped.
    ConnectedLevers { count: usize },
    /// Toggle buttons where pressing one also flips its linked buttons.
    ToggleButtons { count: usize, links: Vec<Vec<usize>> },
    /// Buttons (numbered from 1) that must be pressed in `sequence`.
    SoundSequence { buttons: u8, sequence: Vec<u8> },
    /// Three cylinders turned by tilting the device to the target angles.
    RotatingLock { solution: Vec<f64> },
}

/// Static description of one chapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChapterDefinition {
    /// Chapter heading.
    pub title: String,
    /// GPS target of the location.
    pub coordinates: Coordinates,
    /// First clue pointing at the location.
    pub clue_text: String,
    /// Second clue, shown once the player has arrived.
    #[serde(default)]
    pub clue_text_2: String,
    /// Names of the AR image targets at the location.
    pub image_targets: Vec<String>,
    /// Whether the puzzle offers tiered hints.
    #[serde(default)]
    pub has_help_function: bool,
    /// First hint.
    #[serde(default)]
    pub tier1_help_text: String,
    /// Second hint.
    #[serde(default)]
    pub tier2_help_text: String,
    /// The puzzle's mechanism.
    pub mechanism: MechanismKind,
}

/// Ordered list of chapters making up one hunt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestDefinition {
    /// Chapters in play order.
    pub chapters: Vec<ChapterDefinition>,
}

impl QuestDefinition {
    /// Parse and validate a quest file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Parse and validate quest JSON.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let definition: Self = serde_json::from_str(text)?;
        definition.validate()?;
        Ok(definition)
    }

    /// Number of chapters.
    pub fn len(&self) -> usize {
        self.chapters.len()
    }

    /// True if there are no chapters.
    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }

    /// Reject layouts the game cannot run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chapters.is_empty() {
            return Err(ConfigError::InvalidQuest("quest has no chapters".into()));
        }

        for (i, chapter) in self.chapters.iter().enumerate() {
            if !chapter.coordinates.is_valid() {
                return Err(invalid(i, "coordinates are not numbers"));
            }
            validate_mechanism(i, &chapter.mechanism)?;
        }

        Ok(())
    }

    /// The built-in hunt around Zurich's old town.
    pub fn builtin() -> Self {
        let chapter = |title: &str, lat: f64, lon: f64, target: &str, mechanism: MechanismKind| {
            ChapterDefinition {
                title: title.to_string(),
                coordinates: Coordinates::new(lat, lon),
                clue_text: format!("Find the place of {}.", title.to_lowercase()),
                clue_text_2: "Look for the marked picture.".to_string(),
                image_targets: vec![target.to_string()],
                has_help_function: !matches!(mechanism, MechanismKind::Reveal { .. }),
                tier1_help_text: "Look closely at every part of the mechanism.".to_string(),
                tier2_help_text: "The journal holds the missing piece.".to_string(),
                mechanism,
            }
        };

        Self {
            chapters: vec![
                chapter("Prologue", 47.3763, 8.5477, "map_wall", MechanismKind::Reveal { seconds: 8.0 }),
                chapter(
                    "Chapter I",
                    47.3745,
                    8.5446,
                    "lock_box",
                    MechanismKind::CombinationLock { dials: 4, combination: vec![3, 5, 8, 7] },
                ),
                chapter(
                    "Chapter II",
                    47.3720,
                    8.5437,
                    "tile_plate",
                    MechanismKind::SlidingTiles { size: 3, seed: None },
                ),
                chapter(
                    "Chapter III",
                    47.3701,
                    8.5411,
                    "lever_gate",
                    MechanismKind::ConnectedLevers { count: 2 },
                ),
                chapter(
                    "Chapter IV",
                    47.3688,
                    8.5393,
                    "bell_tower",
                    MechanismKind::SoundSequence { buttons: 3, sequence: vec![2, 3, 1, 3] },
                ),
                chapter(
                    "Chapter V",
                    47.3668,
                    8.5426,
                    "signal_panel",
                    MechanismKind::ToggleButtons {
                        count: 4,
                        links: vec![vec![1], vec![0, 2], vec![1, 3], vec![2]],
                    },
                ),
                chapter(
                    "Chapter VI",
                    47.3664,
                    8.5460,
                    "vault_door",
                    MechanismKind::RotatingLock { solution: vec![180.0, 90.0, 0.0] },
                ),
            ],
        }
    }
}

fn invalid(chapter: usize, reason: &str) -> ConfigError {
    ConfigError::InvalidQuest(format!("chapter {}: {}", chapter, reason))
}

fn validate_mechanism(i: usize, kind: &MechanismKind) -> Result<(), ConfigError> {
    match kind {
        MechanismKind::None => {}
        MechanismKind::Reveal { seconds } => {
            if !(seconds.is_finite() && *seconds > 0.0) {
                return Err(invalid(i, "reveal duration must be positive"));
            }
        }
        MechanismKind::CombinationLock { dials, combination } => {
            if *dials == 0 || combination.len() != *dials {
                return Err(invalid(i, "combination length must match the dial count"));
            }
            if combination.iter().any(|d| *d > 9) {
                return Err(invalid(i, "combination digits must be 0-9"));
            }
        }
        MechanismKind::SlidingTiles { size, .. } => {
            if !(2..=15).contains(size) {
                return Err(invalid(i, "sliding puzzle grid must be 2x2 to 15x15"));
            }
        }
        MechanismKind::ConnectedLevers { count } => {
            if *count == 0 {
                return Err(invalid(i, "lever puzzle needs at least one lever"));
            }
        }
        MechanismKind::ToggleButtons { count, links } => {
            if *count == 0 || links.len() != *count {
                return Err(invalid(i, "every toggle button needs a link list"));
            }
            if links.iter().flatten().any(|j| *j >= *count) {
                return Err(invalid(i, "toggle link points past the last button"));
            }
        }
        MechanismKind::SoundSequence { buttons, sequence } => {
            if sequence.is_empty() || sequence.iter().any(|b| *b == 0 || *b > *buttons) {
                return Err(invalid(i, "sound sequence must use buttons 1..=buttons"));
            }
        }
        MechanismKind::RotatingLock { solution } => {
            if solution.len() != 3 {
                return Err(invalid(i, "rotating lock needs exactly three target angles"));
            }
        }
    }
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
