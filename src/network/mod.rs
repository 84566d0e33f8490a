//! Network Layer
//!
//! HTTP client for the remote leaderboard and the tracker that feeds its
//! results back into the frame loop. Game logic never waits on the network;
//! everything here is fire-and-poll.

pub mod leaderboard;
pub mod protocol;
pub mod tracker;

pub use leaderboard::{LeaderboardClient, LeaderboardError};
pub use protocol::{NamedValue, SubmitScoreRequest, WireScoreEntry};
pub use tracker::{LeaderboardStatus, LeaderboardTracker, SubmitStatus, TrackerUpdate};
