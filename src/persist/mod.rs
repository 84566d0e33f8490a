//! Save Games
//!
//! Progress is written as plain JSON snapshots, one file per entity kind,
//! in a single save directory. Loading never fails the game: a missing or
//! corrupt file means "start fresh".

pub mod store;

pub use store::{PersistError, SaveStore, CHAPTERS_FILE, GAME_FILE, LOCATIONS_FILE, PUZZLES_FILE};
