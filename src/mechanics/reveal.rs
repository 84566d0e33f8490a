//! Map reveal: an animation that finishes once watched long enough.

use serde::{Deserialize, Serialize};

use super::{MechanismFrame, PuzzleMechanism};

/// Plays while the target is in view and the previous puzzle is solved,
/// pauses otherwise.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Reveal {
    duration: f64,
    elapsed: f64,
    started: bool,
}

impl Reveal {
    pub fn new(seconds: f64) -> Self {
        Self { duration: seconds, elapsed: 0.0, started: false }
    }

    /// Fraction played, `0..=1`.
    pub fn progress(&self) -> f64 {
        (self.elapsed / self.duration).clamp(0.0, 1.0)
    }

    pub fn is_playing(&self) -> bool {
        self.started && self.elapsed < self.duration
    }
}

impl PuzzleMechanism for Reveal {
    fn check_if_solved(&mut self, _frame: &MechanismFrame) -> bool {
        self.started && self.elapsed >= self.duration
    }

    fn reset(&mut self) {
        self.elapsed = 0.0;
        self.started = false;
    }

    fn on_skip(&mut self) {
        self.started = true;
        self.elapsed = self.duration;
    }

    fn on_update(&mut self, frame: &MechanismFrame) {
        if frame.in_view && frame.previous_solved {
            self.started = true;
            self.elapsed = (self.elapsed + frame.dt.seconds()).min(self.duration);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Duration;

    fn watching(in_view: bool) -> MechanismFrame {
        MechanismFrame {
            in_view,
            previous_solved: true,
            ..MechanismFrame::idle(Duration::from_seconds(1.0))
        }
    }

    #[test]
    fn test_plays_only_in_view() {
        let mut reveal = Reveal::new(3.0);
        reveal.on_update(&watching(false));
        assert_eq!(reveal.progress(), 0.0);

        reveal.on_update(&watching(true));
        reveal.on_update(&watching(false));
        reveal.on_update(&watching(true));
        assert!(!reveal.check_if_solved(&watching(true)));
        assert!(reveal.is_playing());

        reveal.on_update(&watching(true));
        assert!(reveal.check_if_solved(&watching(true)));
        assert_eq!(reveal.progress(), 1.0);
    }

    #[test]
    fn test_waits_for_previous_puzzle() {
        let mut reveal = Reveal::new(1.0);
        let mut frame = watching(true);
        frame.previous_solved = false;
        reveal.on_update(&frame);
        assert!(!reveal.check_if_solved(&frame));
    }

    #[test]
    fn test_reset_and_skip() {
        let mut reveal = Reveal::new(2.0);
        reveal.on_skip();
        assert!(reveal.check_if_solved(&watching(false)));
        reveal.reset();
        assert!(!reveal.check_if_solved(&watching(false)));
    }
}
