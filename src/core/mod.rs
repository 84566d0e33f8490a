//! Core value types.
//!
//! Geodesy used for GPS navigation hints (coordinates, distance, duration)
//! and the seedable RNG used to scramble puzzles.

pub mod coordinates;
pub mod distance;
pub mod duration;
pub mod rng;

// Re-export core types
pub use coordinates::{Coordinates, Dms, Hemisphere, EARTH_RADIUS_METERS};
pub use distance::Distance;
pub use duration::Duration;
pub use rng::DeterministicRng;
