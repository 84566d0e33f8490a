//! Quest Events
//!
//! Progression changes recorded by the quest, drained once per frame by the
//! game loop for logging and UI feedback.

use serde::{Deserialize, Serialize};

/// Something that changed in the quest.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestEvent {
    /// Puzzle was solved (by play or by skip)
    PuzzleSolved { puzzle: usize },

    /// Chapter and its location became available
    ChapterUnlocked { chapter: usize },

    /// Player opened a chapter for the first time
    ChapterRead { chapter: usize },

    /// Puzzle hint tier was revealed
    HintUsed { puzzle: usize, tier: u8 },

    /// Puzzle was skipped after both hint tiers
    PuzzleSkipped { puzzle: usize },

    /// Location navigation help was revealed
    LocationHelpUsed { location: usize, direction: bool },

    /// Puzzle was recognised by the camera for the first time
    PuzzleSeen { puzzle: usize },

    /// Player reached a location
    LocationVisited { location: usize },
}

impl QuestEvent {
    /// Whether the event changes the score-relevant counters.
    pub fn is_penalty(&self) -> bool {
        matches!(
            self,
            QuestEvent::HintUsed { .. }
                | QuestEvent::PuzzleSkipped { .. }
                | QuestEvent::LocationHelpUsed { direction: false, .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_penalty_events() {
        assert!(QuestEvent::HintUsed { puzzle: 1, tier: 1 }.is_penalty());
        assert!(QuestEvent::PuzzleSkipped { puzzle: 1 }.is_penalty());
        assert!(QuestEvent::LocationHelpUsed { location: 2, direction: false }.is_penalty());
        assert!(!QuestEvent::LocationHelpUsed { location: 2, direction: true }.is_penalty());
        assert!(!QuestEvent::PuzzleSolved { puzzle: 1 }.is_penalty());
    }
}
