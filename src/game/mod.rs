//! Game Logic Module
//!
//! Quest progression, the run's counters and the frame loop.
//!
//! ## Module Structure
//!
//! - `chapter`, `location`, `puzzle`: the three records of each quest step
//! - `quest`: ordered steps with unlocking and the help ladders
//! - `session`: timers, walked distance and penalty counters of a run
//! - `score`: scoring formula and leaderboard ranking
//! - `context`: state shared by screens and the loop
//! - `tick`: per-frame update and the async driver
//! - `events`: quest events for logging

pub mod chapter;
pub mod context;
pub mod events;
pub mod location;
pub mod puzzle;
pub mod quest;
pub mod score;
pub mod session;
pub mod tick;

// Re-export key types
pub use chapter::Chapter;
pub use context::{GameContext, SensorReadings};
pub use events::QuestEvent;
pub use location::{Location, LocationHelpStep};
pub use puzzle::{HelpStep, Puzzle};
pub use quest::{Quest, QuestSnapshot};
pub use score::{final_score, rank_entries, RankedEntry, Ranking, ScoreEntry, ScoringConfig};
pub use session::GameSession;
pub use tick::{FrameInput, FrameSource, GameLoop, IntervalTimer, StepResult};
