//! Puzzle progression state.
//!
//! The mechanism a player manipulates lives in [`crate::mechanics`]; this
//! type only tracks solved/seen flags and the help ladder
//! (tier 1, tier 2, then skip).

use serde::{Deserialize, Serialize};

/// Persisted puzzle flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleData {
    /// Puzzle is done.
    pub solved: bool,
    /// Puzzle has been recognised by the camera.
    pub seen: bool,
    /// First hint revealed.
    pub tier1_help_active: bool,
    /// Second hint revealed.
    pub tier2_help_active: bool,
    /// Solved by skipping.
    pub skipped: bool,
}

/// What a call to [`Puzzle::help`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HelpStep {
    /// Revealed the first hint.
    Tier1,
    /// Revealed the second hint.
    Tier2,
    /// Marked the puzzle skipped; the caller must solve it.
    Skip,
    /// Puzzle already solved, nothing changed.
    None,
}

/// A solvable challenge at a location.
#[derive(Clone, Debug)]
pub struct Puzzle {
    /// Position in the quest.
    pub index: usize,
    /// Whether tiered help is offered for this puzzle.
    pub has_help_function: bool,
    /// First hint.
    pub tier1_help_text: String,
    /// Second hint.
    pub tier2_help_text: String,
    data: PuzzleData,
    in_view: bool,
    needs_reset: bool,
}

impl Puzzle {
    /// Create an unsolved puzzle.
    pub fn new(
        index: usize,
        has_help_function: bool,
        tier1_help_text: impl Into<String>,
        tier2_help_text: impl Into<String>,
    ) -> Self {
        Self {
            index,
            has_help_function,
            tier1_help_text: tier1_help_text.into(),
            tier2_help_text: tier2_help_text.into(),
            data: PuzzleData::default(),
            in_view: false,
            needs_reset: true,
        }
    }

    pub fn is_solved(&self) -> bool {
        self.data.solved
    }

    pub fn is_seen(&self) -> bool {
        self.data.seen
    }

    pub fn is_skipped(&self) -> bool {
        self.data.skipped
    }

    pub fn tier1_help_active(&self) -> bool {
        self.data.tier1_help_active
    }

    pub fn tier2_help_active(&self) -> bool {
        self.data.tier2_help_active
    }

    /// Recognised by the camera in the current frame.
    pub fn is_in_view(&self) -> bool {
        self.in_view
    }

    pub(crate) fn set_in_view(&mut self, in_view: bool) {
        self.in_view = in_view;
    }

    /// Returns true on the first sighting.
    pub fn see(&mut self) -> bool {
        !std::mem::replace(&mut self.data.seen, true)
    }

    /// Mark solved. Returns false if it already was.
    pub fn solve(&mut self) -> bool {
        !std::mem::replace(&mut self.data.solved, true)
    }

    /// Climb one rung of the help ladder.
    pub fn help(&mut self) -> HelpStep {
        if self.data.solved {
            HelpStep::None
        } else if !self.data.tier1_help_active {
            self.data.tier1_help_active = true;
            HelpStep::Tier1
        } else if !self.data.tier2_help_active {
            self.data.tier2_help_active = true;
            HelpStep::Tier2
        } else if !self.data.skipped {
            self.data.skipped = true;
            HelpStep::Skip
        } else {
            HelpStep::None
        }
    }

    /// Text of the most advanced revealed hint.
    pub fn active_help_text(&self) -> Option<&str> {
        if self.data.tier2_help_active {
            Some(&self.tier2_help_text)
        } else if self.data.tier1_help_active {
            Some(&self.tier1_help_text)
        } else {
            None
        }
    }

    /// Whether the mechanism must be put back into its start layout.
    pub fn needs_reset(&self) -> bool {
        self.needs_reset
    }

    /// Acknowledge that the mechanism was reset.
    pub fn reset_over(&mut self) {
        self.needs_reset = false;
    }

    /// Clear all progress and ask for a mechanism reset.
    pub fn reset(&mut self) {
        self.data = PuzzleData::default();
        self.in_view = false;
        self.needs_reset = true;
    }

    /// Snapshot for persistence.
    pub fn data(&self) -> PuzzleData {
        self.data
    }

    /// Restore from a snapshot.
    pub fn apply(&mut self, data: PuzzleData) {
        self.data = data;
        self.needs_reset = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn puzzle() -> Puzzle {
        Puzzle::new(3, true, "first", "second")
    }

    #[test]
    fn test_help_ladder_order() {
        let mut p = puzzle();
        assert_eq!(p.active_help_text(), None);

        assert_eq!(p.help(), HelpStep::Tier1);
        assert_eq!(p.active_help_text(), Some("first"));

        assert_eq!(p.help(), HelpStep::Tier2);
        assert_eq!(p.active_help_text(), Some("second"));

        assert_eq!(p.help(), HelpStep::Skip);
        assert!(p.is_skipped());
        // Skip does not solve by itself
        assert!(!p.is_solved());
    }

    #[test]
    fn test_help_after_solve_is_noop() {
        let mut p = puzzle();
        assert!(p.solve());
        assert_eq!(p.help(), HelpStep::None);
        assert_eq!(p.data(), PuzzleData { solved: true, ..Default::default() });
    }

    #[test]
    fn test_solve_reports_first_time_only() {
        let mut p = puzzle();
        assert!(p.solve());
        assert!(!p.solve());
    }

    #[test]
    fn test_reset_requests_mechanism_reset() {
        let mut p = puzzle();
        p.reset_over();
        p.solve();
        p.set_in_view(true);
        p.reset();
        assert!(p.needs_reset());
        assert!(!p.is_in_view());
        assert!(!p.is_solved());
    }
}
