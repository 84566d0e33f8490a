//! Real-world locations and their navigation help.

use serde::{Deserialize, Serialize};

use crate::core::{Coordinates, Distance};

/// Persisted location flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationData {
    /// Location is part of the unlocked journal.
    pub unlocked: bool,
    /// Player has arrived here.
    pub visited: bool,
    /// Distance to the location is shown.
    pub distance_help_active: bool,
    /// Compass direction to the location is shown.
    pub direction_help_active: bool,
}

/// What a call to [`Location::help`] revealed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LocationHelpStep {
    /// First level: distance to target.
    Distance,
    /// Second level: bearing to target.
    Direction,
    /// Both levels were already active.
    Exhausted,
}

/// A GPS target with clue text.
#[derive(Clone, Debug)]
pub struct Location {
    /// Position in the quest.
    pub index: usize,
    /// Where the puzzle is.
    pub coordinates: Coordinates,
    /// Clue leading to the location.
    pub clue_text: String,
    /// Clue shown once there.
    pub clue_text_2: String,
    /// AR image targets placed at this location.
    pub image_targets: Vec<String>,
    data: LocationData,
}

impl Location {
    /// Create a locked location.
    pub fn new(
        index: usize,
        coordinates: Coordinates,
        clue_text: impl Into<String>,
        clue_text_2: impl Into<String>,
        image_targets: Vec<String>,
    ) -> Self {
        Self {
            index,
            coordinates,
            clue_text: clue_text.into(),
            clue_text_2: clue_text_2.into(),
            image_targets,
            data: LocationData::default(),
        }
    }

    pub fn is_unlocked(&self) -> bool {
        self.data.unlocked
    }

    pub fn is_visited(&self) -> bool {
        self.data.visited
    }

    pub fn distance_help_active(&self) -> bool {
        self.data.distance_help_active
    }

    pub fn direction_help_active(&self) -> bool {
        self.data.direction_help_active
    }

    /// Returns true if the location was locked before.
    pub fn unlock(&mut self) -> bool {
        !std::mem::replace(&mut self.data.unlocked, true)
    }

    /// Returns true on the first visit.
    pub fn visit(&mut self) -> bool {
        !std::mem::replace(&mut self.data.visited, true)
    }

    /// Escalate navigation help by one level.
    ///
    /// Distance always comes before direction, so direction help never
    /// shows up without distance help.
    pub fn help(&mut self) -> LocationHelpStep {
        if self.data.direction_help_active {
            LocationHelpStep::Exhausted
        } else if !self.data.distance_help_active {
            self.data.distance_help_active = true;
            LocationHelpStep::Distance
        } else {
            self.data.direction_help_active = true;
            LocationHelpStep::Direction
        }
    }

    /// Distance from `from` to this location.
    pub fn distance_from(&self, from: &Coordinates) -> Distance {
        from.distance_to(&self.coordinates)
    }

    /// Bearing from `from` to this location (NaN without a fix).
    pub fn bearing_from(&self, from: &Coordinates) -> f64 {
        from.bearing_to(&self.coordinates)
    }

    /// Whether `target` is one of this location's image targets.
    pub fn owns_target(&self, target: &str) -> bool {
        self.image_targets.iter().any(|t| t == target)
    }

    pub fn reset(&mut self) {
        self.data = LocationData::default();
    }

    /// Snapshot for persistence.
    pub fn data(&self) -> LocationData {
        self.data
    }

    /// Restore from a snapshot. A direction flag without distance is repaired.
    pub fn apply(&mut self, mut data: LocationData) {
        if data.direction_help_active {
            data.distance_help_active = true;
        }
        self.data = data;
    }
}
