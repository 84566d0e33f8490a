//! # AR Treasure Hunt Core
//!
//! Engine-independent core of an augmented-reality treasure hunt: the
//! screen flow, quest progression, scoring, geodesy, save files and the
//! leaderboard client. Rendering, AR tracking and sensors stay outside;
//! they hand in plain readings and get back plain view models.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    AR TREASURE HUNT                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Value types                               │
//! │  ├── coordinates - WGS84 points, haversine, bearing, DMS     │
//! │  ├── distance.rs - Metres with an "unknown" state            │
//! │  ├── duration.rs - Seconds, rendered as M:SS / H:MM:SS       │
//! │  └── rng.rs      - Seedable Xorshift128+ for scrambling      │
//! │                                                              │
//! │  game/           - Progression and the frame loop            │
//! │  ├── quest.rs    - Chapters, locations, puzzles, help        │
//! │  ├── session.rs  - Timers and penalty counters               │
//! │  ├── score.rs    - Scoring formula and ranking               │
//! │  ├── context.rs  - Shared game state                         │
//! │  └── tick.rs     - Per-frame update, autosave, async driver  │
//! │                                                              │
//! │  flow/           - Screens, popovers, view models            │
//! │  mechanics/      - Physical puzzle logic                     │
//! │  persist/        - JSON save files                           │
//! │  network/        - Leaderboard HTTP client and tracker       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## State Ownership
//!
//! There are no globals. A [`GameContext`] owns every piece of shared
//! state and is passed by `&mut` to screens and subsystems, so tests can
//! run any number of games side by side.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod config;
pub mod core;
pub mod flow;
pub mod game;
pub mod mechanics;
pub mod network;
pub mod persist;

// Re-export commonly used types
pub use config::{ConfigError, GameConfig, QuestDefinition};
pub use core::{Coordinates, Distance, Duration};
pub use flow::{Action, FlowController, Frame, Screen, View};
pub use game::{final_score, GameContext, GameLoop, GameSession, Quest};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
