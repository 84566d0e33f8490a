//! Game Context
//!
//! Everything the screens and the frame loop share, owned in one place and
//! passed around by `&mut`. Replaces process-wide singletons: a test can
//! build as many independent contexts as it likes.

use tracing::{error, info, warn};

use super::quest::Quest;
use super::session::{default_username, GameSession};
use crate::config::{ConfigError, GameConfig, QuestDefinition};
use crate::core::Coordinates;
use crate::mechanics::{build_drivers, Interaction, MechanismDriver};
use crate::network::{LeaderboardClient, LeaderboardTracker};
use crate::persist::SaveStore;

/// Latest device sensor values. Readers tolerate stale or missing data.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SensorReadings {
    /// Last GPS fix; [`Coordinates::UNKNOWN`] until the first one.
    pub location: Coordinates,
    /// Gravity vector in device coordinates.
    pub gravity: Option<[f64; 3]>,
    /// Compass heading in degrees from true north.
    pub heading: Option<f64>,
}

impl Default for SensorReadings {
    fn default() -> Self {
        Self { location: Coordinates::UNKNOWN, gravity: None, heading: None }
    }
}

/// Shared game state.
#[derive(Debug)]
pub struct GameContext {
    /// Settings.
    pub config: GameConfig,
    /// Counters of the current run.
    pub session: GameSession,
    /// Progress through the hunt.
    pub quest: Quest,
    /// One mechanism per puzzle, same order as the quest.
    pub mechanisms: Vec<MechanismDriver>,
    /// Chapter last opened from the index.
    pub selected_chapter: usize,
    /// Sensor values fed in by the frame loop.
    pub sensors: SensorReadings,
    /// Result of the last connectivity probe.
    pub connected_to_internet: bool,
    /// Async leaderboard requests.
    pub leaderboard: LeaderboardTracker,
    /// Save files.
    pub store: SaveStore,
    /// Name proposed on the epilogue.
    pub username: String,
}

impl GameContext {
    /// Build a context from `config` and the quest layout it points at.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        let definition = config.load_quest()?;
        Self::with_quest(config, &definition)
    }

    /// Build a context for an explicit quest layout.
    pub fn with_quest(config: GameConfig, definition: &QuestDefinition) -> Result<Self, ConfigError> {
        let quest = Quest::new(definition)?;
        let mechanisms = build_drivers(definition.chapters.iter().map(|c| &c.mechanism));

        let client = match LeaderboardClient::new(&config.leaderboard) {
            Ok(client) => Some(client),
            Err(e) => {
                warn!(error = %e, "Leaderboard disabled");
                None
            }
        };

        Ok(Self {
            store: SaveStore::new(config.save_dir.clone()),
            config,
            session: GameSession::new(),
            quest,
            mechanisms,
            selected_chapter: 0,
            sensors: SensorReadings::default(),
            connected_to_internet: false,
            leaderboard: LeaderboardTracker::new(client),
            username: default_username(),
        })
    }

    // =========================================================================
    // LIFECYCLE
    // =========================================================================

    /// Restore progress from the save directory. Missing saves leave a
    /// fresh game.
    pub fn load_saved(&mut self) {
        if let Some(snapshot) = self.store.load_quest() {
            self.quest.restore(&snapshot);
        }
        if let Some(session) = self.store.load_session() {
            if let Some(entry) = &session.leaderboard_entry {
                self.username = entry.username.clone();
            }
            self.session = session;
        }
        info!(
            game_started = self.session.game_started,
            solved = self.quest.puzzles().iter().filter(|p| p.is_solved()).count(),
            "Saved game loaded"
        );
    }

    /// Write all save files. Failures are logged, never fatal.
    pub fn save_all(&self) {
        if let Err(e) = self.store.save_quest(&self.quest.snapshot()) {
            error!(error = %e, "Failed to save quest");
        }
        if let Err(e) = self.store.save_session(&self.session) {
            error!(error = %e, "Failed to save session");
        }
    }

    /// Throw away all progress and begin a new game.
    pub fn start_game(&mut self) {
        if let Err(e) = self.store.delete_all() {
            error!(error = %e, "Failed to delete old save");
        }
        self.session.start_game();
        self.quest.reset();
        self.selected_chapter = 0;
        self.username = default_username();
        self.leaderboard.clear_submit();
    }

    /// Continue an existing game; timers resume if the quest had started.
    pub fn resume_game(&mut self) {
        if self.session.quest_started && !self.quest.is_complete() {
            self.session.start_quest();
        }
    }

    /// Stop the timers and save.
    pub fn pause_game(&mut self) {
        self.session.pause();
        self.save_all();
    }

    /// Forward a touch to the mechanism of puzzle `i` if it is in view.
    pub fn interact(&mut self, i: usize, interaction: Interaction) -> bool {
        let in_view = self.quest.puzzle(i).is_some_and(|p| p.is_in_view());
        if !in_view {
            return false;
        }
        self.mechanisms
            .get_mut(i)
            .is_some_and(|driver| driver.mechanism_mut().interact(interaction))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context_in(dir: &std::path::Path) -> GameContext {
        let config = GameConfig { save_dir: dir.to_path_buf(), ..GameConfig::default() };
        GameContext::new(config).unwrap()
    }

    #[test]
    fn test_new_context() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context_in(dir.path());
        assert_eq!(ctx.quest.len(), 7);
        assert_eq!(ctx.mechanisms.len(), 7);
        assert!(!ctx.leaderboard.is_configured());
        assert!(!ctx.sensors.location.is_valid());
    }

    #[test]
    fn test_save_and_load_round() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context_in(dir.path());
        ctx.start_game();
        ctx.quest.solve(0);
        ctx.session.start_quest();
        ctx.session.needed_hint();
        ctx.pause_game();

        let mut other = context_in(dir.path());
        other.load_saved();
        assert!(other.session.game_started);
        assert_eq!(other.session.hints_needed, 1);
        assert!(other.quest.chapter(1).unwrap().is_unlocked());
        assert!(!other.session.is_running());

        other.resume_game();
        assert!(other.session.is_running());
    }

    #[test]
    fn test_start_game_wipes_progress() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context_in(dir.path());
        ctx.quest.solve(0);
        ctx.save_all();

        ctx.start_game();
        assert!(!ctx.quest.is_started());
        assert!(ctx.store.load_quest().is_none());
    }

    #[test]
    fn test_interact_requires_view() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context_in(dir.path());
        assert!(!ctx.interact(1, Interaction::TurnDial(0)));
        ctx.quest.set_in_view(1, true);
        assert!(ctx.interact(1, Interaction::TurnDial(0)));
    }
}
