//! Game Session
//!
//! Counters and timers of the current run. One instance lives in the
//! [`GameContext`](crate::game::context::GameContext); it is reset on
//! "new game", accumulates while the quest timer runs, and is persisted as
//! `game.json`.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::score::{final_score, ScoreEntry};
use crate::core::{Coordinates, Distance, Duration};

/// State of the current run.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSession {
    /// Hints taken (puzzle tiers and location distance help).
    pub hints_needed: u32,
    /// Puzzles skipped.
    pub puzzles_skipped: u32,
    /// Time since the quest started, excluding pauses.
    pub total_time: Duration,
    /// Part of `total_time` spent with a puzzle in view.
    pub puzzle_time: Duration,
    /// Distance covered while the quest was running.
    pub walked_distance: Distance,
    /// A game exists (new game was chosen at least once).
    pub game_started: bool,
    /// Prologue puzzle solved, timers armed.
    pub quest_started: bool,
    /// Score was accepted by the leaderboard.
    pub entered_leaderboard: bool,
    /// What was submitted to the leaderboard.
    pub leaderboard_entry: Option<ScoreEntry>,
    #[serde(skip)]
    running: bool,
    #[serde(skip)]
    last_location: Coordinates,
}

impl GameSession {
    /// Fresh session with no game.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear everything.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Begin a new game. Timers stay off until the quest starts.
    pub fn start_game(&mut self) {
        self.reset();
        self.game_started = true;
        info!("New game started");
    }

    /// Arm timers and distance tracking.
    pub fn start_quest(&mut self) {
        if !self.quest_started {
            info!("Quest started");
        }
        self.quest_started = true;
        self.running = true;
        self.last_location = Coordinates::UNKNOWN;
    }

    /// Stop accumulating time and distance.
    pub fn pause(&mut self) {
        if self.running {
            info!(total = %self.total_time, "Game paused");
        }
        self.running = false;
    }

    /// Timers are accumulating.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Count one hint.
    pub fn needed_hint(&mut self) {
        self.hints_needed += 1;
    }

    /// Count one skipped puzzle.
    pub fn skipped_puzzle(&mut self) {
        self.puzzles_skipped += 1;
    }

    /// Accumulate one frame.
    ///
    /// Distance only grows by deltas between two valid fixes; time goes to
    /// the puzzle timer as well when a puzzle is in view.
    pub fn advance(&mut self, dt: Duration, location: Coordinates, looking_at_puzzle: bool) {
        if !self.running {
            return;
        }

        if self.last_location.is_valid() && location != self.last_location {
            let delta = self.last_location.distance_to(&location);
            if delta.is_valid() {
                self.walked_distance += delta;
            }
        }
        self.last_location = location;

        self.total_time += dt;
        if looking_at_puzzle {
            self.puzzle_time += dt;
        }
    }

    /// Time not spent looking at puzzles.
    pub fn walking_time(&self) -> Duration {
        self.total_time - self.puzzle_time
    }

    /// Points for the run so far.
    pub fn final_score(&self) -> u32 {
        final_score(
            self.walking_time().seconds_int(),
            self.puzzle_time.seconds_int(),
            self.hints_needed,
            self.puzzles_skipped,
        )
    }

    /// Leaderboard entry for the run so far.
    pub fn score_entry(&self, username: impl Into<String>) -> ScoreEntry {
        ScoreEntry {
            username: username.into(),
            highscore: chrono::Utc::now().timestamp().to_string(),
            total_time_secs: self.total_time.seconds_int(),
            puzzle_time_secs: self.puzzle_time.seconds_int(),
            distance_meters: self.walked_distance.meters_int(),
            hints: self.hints_needed,
            skips: self.puzzles_skipped,
        }
    }

    /// Record an accepted leaderboard submission. Only one per game.
    pub fn enter_leaderboard(&mut self, entry: ScoreEntry) {
        info!(username = %entry.username, score = entry.score(), "Entered leaderboard");
        self.entered_leaderboard = true;
        self.leaderboard_entry = Some(entry);
    }
}

/// Placeholder player name derived from the local time, used until the
/// player types a name.
pub fn default_username() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const A: Coordinates = Coordinates::new(47.3763, 8.5477);
    const B: Coordinates = Coordinates::new(47.3773, 8.5477);

    fn dt(secs: f64) -> Duration {
        Duration::from_seconds(secs)
    }

    #[test]
    fn test_nothing_accumulates_until_quest_starts() {
        let mut session = GameSession::new();
        session.start_game();
        session.advance(dt(10.0), A, true);
        assert_eq!(session.total_time, Duration::ZERO);
        assert!(session.game_started);
        assert!(!session.quest_started);
    }

    #[test]
    fn test_time_split_between_walking_and_puzzles() {
        let mut session = GameSession::new();
        session.start_quest();
        session.advance(dt(30.0), A, false);
        session.advance(dt(12.0), A, true);

        assert_eq!(session.total_time.seconds(), 42.0);
        assert_eq!(session.puzzle_time.seconds(), 12.0);
        assert_eq!(session.walking_time().seconds(), 30.0);
    }

    #[test]
    fn test_walked_distance_skips_invalid_fixes() {
        let mut session = GameSession::new();
        session.start_quest();
        session.advance(dt(1.0), A, false);
        session.advance(dt(1.0), Coordinates::UNKNOWN, false);
        session.advance(dt(1.0), B, false);
        // The gap in the fix drops the A->B leg
        assert_eq!(session.walked_distance.meters(), 0.0);

        session.advance(dt(1.0), A, false);
        let leg = A.distance_to(&B).meters();
        assert!((session.walked_distance.meters() - leg).abs() < 1e-9);
        assert!(leg > 100.0 && leg < 120.0);
    }

    #[test]
    fn test_pause_stops_accumulation() {
        let mut session = GameSession::new();
        session.start_quest();
        session.advance(dt(5.0), A, false);
        session.pause();
        session.advance(dt(5.0), B, true);
        assert_eq!(session.total_time.seconds(), 5.0);
        assert_eq!(session.walked_distance.meters(), 0.0);
    }

    #[test]
    fn test_start_game_resets_counters() {
        let mut session = GameSession::new();
        session.start_quest();
        session.needed_hint();
        session.skipped_puzzle();
        session.advance(dt(5.0), A, false);

        session.start_game();
        assert_eq!(session.hints_needed, 0);
        assert_eq!(session.puzzles_skipped, 0);
        assert_eq!(session.total_time, Duration::ZERO);
        assert!(!session.is_running());
        assert!(!session.quest_started);
    }

    #[test]
    fn test_score_entry_rounds_measurements() {
        let mut session = GameSession::new();
        session.start_quest();
        session.advance(dt(100.4), A, false);
        session.advance(dt(20.2), A, true);
        session.needed_hint();

        let entry = session.score_entry("ada");
        assert_eq!(entry.username, "ada");
        assert_eq!(entry.total_time_secs, 121);
        assert_eq!(entry.puzzle_time_secs, 20);
        assert_eq!(entry.hints, 1);
        assert_eq!(entry.score(), session.final_score());
        assert!(entry.highscore.parse::<i64>().is_ok());
    }

    #[test]
    fn test_persisted_shape_skips_runtime_state() {
        let mut session = GameSession::new();
        session.start_quest();
        session.advance(dt(3.0), A, false);

        let json = serde_json::to_string(&session).unwrap();
        assert!(!json.contains("running"));
        assert!(!json.contains("last_location"));

        let restored: GameSession = serde_json::from_str(&json).unwrap();
        assert!(restored.quest_started);
        assert!(!restored.is_running());
        assert_eq!(restored.total_time.seconds(), 3.0);
    }

    #[test]
    fn test_default_username_shape() {
        let name = default_username();
        assert_eq!(name.len(), "2015-06-01 12:00:00".len());
    }
}
