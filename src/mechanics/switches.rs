//! Switch puzzles
//!
//! Three puzzles built from the animated components: levers that must all
//! be flipped, toggle buttons that flip their neighbours, and buttons that
//! must be pressed in a melody order. Each component's action fires on the
//! rising edge of its motion, one frame after the touch.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::components::{ButtonPress, EdgeTrigger, LeverPull};
use super::{MechanismFrame, PuzzleMechanism};

// =============================================================================
// CONNECTED LEVERS
// =============================================================================

/// Every lever must end up toggled.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConnectedLevers {
    toggled: Vec<bool>,
    levers: Vec<LeverPull>,
    triggers: Vec<EdgeTrigger>,
}

impl ConnectedLevers {
    /// Puzzle with `count` levers, all up.
    pub fn new(count: usize) -> Self {
        Self {
            toggled: vec![false; count],
            levers: vec![LeverPull::new(); count],
            triggers: vec![EdgeTrigger::default(); count],
        }
    }

    /// Player pulls lever `i`.
    pub fn pull(&mut self, i: usize) -> bool {
        self.levers.get_mut(i).is_some_and(LeverPull::touch)
    }

    /// Flip lever `i`'s state. Out-of-range indices are ignored.
    pub fn toggle(&mut self, i: usize) {
        if let Some(t) = self.toggled.get_mut(i) {
            *t = !*t;
        }
    }

    /// Lever `i` is toggled; false when out of range.
    pub fn is_toggled(&self, i: usize) -> bool {
        self.toggled.get(i).copied().unwrap_or(false)
    }

    /// The levers.
    pub fn levers(&self) -> &[LeverPull] {
        &self.levers
    }

    fn set_activated(&mut self, activated: bool) {
        for lever in &mut self.levers {
            if activated {
                lever.activate();
            } else {
                lever.deactivate();
            }
        }
    }
}

impl PuzzleMechanism for ConnectedLevers {
    fn check_if_solved(&mut self, _frame: &MechanismFrame) -> bool {
        self.toggled.iter().all(|t| *t)
    }

    fn reset(&mut self) {
        self.toggled.iter_mut().for_each(|t| *t = false);
        self.triggers.iter_mut().for_each(|t| *t = EdgeTrigger::default());
        for lever in &mut self.levers {
            lever.force_up();
        }
        self.set_activated(true);
    }

    fn on_skip(&mut self) {
        self.toggled.iter_mut().for_each(|t| *t = true);
        for lever in &mut self.levers {
            lever.force_down();
        }
        self.set_activated(false);
    }

    fn on_solve(&mut self) {
        self.set_activated(false);
    }

    fn on_update(&mut self, frame: &MechanismFrame) {
        for i in 0..self.levers.len() {
            if self.triggers[i].poll(self.levers[i].is_moving()) {
                self.toggle(i);
            }
            self.levers[i].tick(frame.dt);
        }
    }
}

// =============================================================================
// TOGGLE BUTTONS
// =============================================================================

/// Pressing a button flips it and every button linked to it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToggleButtons {
    toggled: Vec<bool>,
    links: Vec<Vec<usize>>,
    buttons: Vec<ButtonPress>,
    triggers: Vec<EdgeTrigger>,
}

impl ToggleButtons {
    /// Puzzle with one button per entry of `links`.
    pub fn new(links: Vec<Vec<usize>>) -> Self {
        let count = links.len();
        Self {
            toggled: vec![false; count],
            links,
            buttons: vec![ButtonPress::momentary(); count],
            triggers: vec![EdgeTrigger::default(); count],
        }
    }

    /// Player presses button `i`.
    pub fn press(&mut self, i: usize) -> bool {
        self.buttons.get_mut(i).is_some_and(ButtonPress::touch)
    }

    /// Flip button `i` and its linked buttons.
    pub fn toggle(&mut self, i: usize) {
        let Some(links) = self.links.get(i) else {
            return;
        };
        for j in std::iter::once(i).chain(links.iter().copied()) {
            if let Some(t) = self.toggled.get_mut(j) {
                *t = !*t;
            }
        }
    }

    /// Button `i` is lit.
    pub fn is_toggled(&self, i: usize) -> bool {
        self.toggled.get(i).copied().unwrap_or(false)
    }

    /// Number of buttons.
    pub fn count(&self) -> usize {
        self.toggled.len()
    }

    fn set_activated(&mut self, activated: bool) {
        for button in &mut self.buttons {
            if activated {
                button.activate();
            } else {
                button.deactivate();
            }
        }
    }
}

impl PuzzleMechanism for ToggleButtons {
    fn check_if_solved(&mut self, _frame: &MechanismFrame) -> bool {
        self.toggled.iter().all(|t| *t)
    }

    fn reset(&mut self) {
        self.toggled.iter_mut().for_each(|t| *t = false);
        for button in &mut self.buttons {
            button.force_idle();
        }
        self.set_activated(true);
    }

    fn on_skip(&mut self) {
        self.toggled.iter_mut().for_each(|t| *t = true);
        self.set_activated(false);
    }

    fn on_solve(&mut self) {
        self.set_activated(false);
    }

    fn on_update(&mut self, frame: &MechanismFrame) {
        for i in 0..self.buttons.len() {
            if self.triggers[i].poll(self.buttons[i].is_pressed()) {
                self.toggle(i);
            }
            self.buttons[i].tick(frame.dt);
        }
    }
}

// =============================================================================
// SOUND SEQUENCE
// =============================================================================

/// Seconds a sound button stays down while its tone plays.
pub const TONE_SECS: f64 = 0.6;

/// Buttons that each play a tone; the last presses must match the melody.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SoundSequence {
    sequence: Vec<u8>,
    history: Vec<u8>,
    buttons: Vec<ButtonPress>,
    triggers: Vec<EdgeTrigger>,
    /// Tone time left per button.
    playing: Vec<f64>,
}

impl SoundSequence {
    /// `buttons` buttons numbered from 1.
    pub fn new(buttons: u8, sequence: Vec<u8>) -> Self {
        let count = buttons as usize;
        Self {
            sequence,
            history: Vec::new(),
            buttons: vec![ButtonPress::held(); count],
            triggers: vec![EdgeTrigger::default(); count],
            playing: vec![0.0; count],
        }
    }

    /// Player touches button `number` (1-based).
    pub fn touch(&mut self, number: u8) -> bool {
        let Some(i) = (number as usize).checked_sub(1) else {
            return false;
        };
        self.buttons.get_mut(i).is_some_and(ButtonPress::touch)
    }

    /// Record a press of button `number`.
    pub fn press(&mut self, number: u8) {
        self.history.push(number);
        if self.history.len() > self.sequence.len() {
            self.history.remove(0);
        }
        debug!(button = number, "Sound button pressed");
    }

    /// Most recent presses, oldest first.
    pub fn history(&self) -> &[u8] {
        &self.history
    }

    fn set_activated(&mut self, activated: bool) {
        for button in &mut self.buttons {
            if activated {
                button.activate();
            } else {
                button.deactivate();
            }
        }
    }
}

impl PuzzleMechanism for SoundSequence {
    fn check_if_solved(&mut self, _frame: &MechanismFrame) -> bool {
        self.history == self.sequence
    }

    fn reset(&mut self) {
        self.history.clear();
        for button in &mut self.buttons {
            button.force_idle();
        }
        self.playing.iter_mut().for_each(|p| *p = 0.0);
        self.set_activated(true);
    }

    fn on_skip(&mut self) {
        self.history = self.sequence.clone();
        self.set_activated(false);
    }

    fn on_solve(&mut self) {
        self.set_activated(false);
    }

    fn on_update(&mut self, frame: &MechanismFrame) {
        let dt = frame.dt.seconds();
        for i in 0..self.buttons.len() {
            if self.triggers[i].poll(self.buttons[i].is_pressed()) {
                self.press(i as u8 + 1);
                self.playing[i] = TONE_SECS;
            }
            if self.playing[i] > 0.0 {
                self.playing[i] -= dt;
                if self.playing[i] <= 0.0 {
                    self.buttons[i].release();
                }
            }
            self.buttons[i].tick(frame.dt);
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Duration;

    fn run(mechanism: &mut impl PuzzleMechanism, seconds: f64) {
        let frame = MechanismFrame::idle(Duration::from_seconds(0.05));
        let steps = (seconds / 0.05).ceil() as usize;
        for _ in 0..steps {
            mechanism.on_update(&frame);
        }
    }

    fn solved(mechanism: &mut impl PuzzleMechanism) -> bool {
        mechanism.check_if_solved(&MechanismFrame::idle(Duration::ZERO))
    }

    #[test]
    fn test_levers_toggle_on_pull() {
        let mut levers = ConnectedLevers::new(2);
        assert!(levers.pull(0));
        run(&mut levers, 0.5);
        assert!(levers.is_toggled(0));
        assert!(levers.levers()[0].is_down());
        assert!(!solved(&mut levers));

        assert!(levers.pull(1));
        run(&mut levers, 0.5);
        assert!(solved(&mut levers));

        // Pulling back untoggles
        assert!(levers.pull(0));
        run(&mut levers, 0.5);
        assert!(!levers.is_toggled(0));
    }

    #[test]
    fn test_lever_toggle_out_of_range_ignored() {
        let mut levers = ConnectedLevers::new(2);
        levers.toggle(5);
        assert!(!levers.is_toggled(5));
        assert!(!levers.pull(5));
    }

    #[test]
    fn test_lever_skip_and_reset() {
        let mut levers = ConnectedLevers::new(3);
        levers.on_skip();
        assert!(solved(&mut levers));
        assert!(!levers.pull(0));

        levers.reset();
        assert!(!solved(&mut levers));
        assert!(levers.levers().iter().all(|l| !l.is_down()));
        assert!(levers.pull(0));
    }

    #[test]
    fn test_toggle_buttons_flip_links() {
        let mut buttons = ToggleButtons::new(vec![vec![1], vec![0, 2], vec![1, 3], vec![2]]);
        buttons.toggle(1);
        assert_eq!(
            (0..4).map(|i| buttons.is_toggled(i)).collect::<Vec<_>>(),
            vec![true, true, true, false]
        );

        // 0 flips {0,1}; 3 flips {3,2}
        buttons.reset();
        assert!(buttons.press(0));
        run(&mut buttons, 0.6);
        assert!(buttons.press(3));
        run(&mut buttons, 0.6);
        assert!(solved(&mut buttons));
    }

    #[test]
    fn test_toggle_press_fires_once() {
        let mut buttons = ToggleButtons::new(vec![vec![], vec![]]);
        buttons.press(0);
        run(&mut buttons, 1.0);
        assert!(buttons.is_toggled(0));
        assert!(!buttons.is_toggled(1));
    }

    #[test]
    fn test_sound_sequence_keeps_last_presses() {
        let mut sound = SoundSequence::new(3, vec![2, 3, 1]);
        for number in [1, 2, 3, 1] {
            assert!(sound.touch(number));
            run(&mut sound, 1.5);
        }
        assert_eq!(sound.history(), &[2, 3, 1]);
        assert!(solved(&mut sound));
    }

    #[test]
    fn test_sound_button_blocked_while_playing() {
        let mut sound = SoundSequence::new(3, vec![1]);
        assert!(sound.touch(1));
        run(&mut sound, 0.3);
        assert!(!sound.touch(1));
        assert!(!sound.touch(0));
        assert!(!sound.touch(4));
    }

    #[test]
    fn test_sound_skip() {
        let mut sound = SoundSequence::new(3, vec![3, 3]);
        sound.on_skip();
        assert!(solved(&mut sound));
        assert!(!sound.touch(1));
    }
}
