//! Combination lock: a row of number dials that must show a fixed code.

use serde::{Deserialize, Serialize};

use super::components::TRAVEL_SECS;
use super::{MechanismFrame, PuzzleMechanism};
use crate::core::Duration;

/// Dial angle at digit 0, in degrees.
const ZERO_ANGLE: f64 = 54.0;

/// Degrees per digit step.
const STEP_ANGLE: f64 = 18.0;

/// One number wheel.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Dial {
    digit: u8,
    /// Seconds left in the current turn.
    turning: Option<f64>,
    activated: bool,
}

impl Dial {
    /// Advance one digit, wrapping 9 to 0. Ignored while turning.
    pub fn turn(&mut self) -> bool {
        if !self.activated || self.turning.is_some() {
            return false;
        }
        self.digit = (self.digit + 1) % 10;
        self.turning = Some(TRAVEL_SECS);
        true
    }

    fn tick(&mut self, dt: Duration) {
        if let Some(left) = self.turning {
            let left = left - dt.seconds();
            self.turning = (left > 0.0).then_some(left);
        }
    }

    /// Shown digit.
    pub fn digit(&self) -> u8 {
        self.digit
    }

    /// Snap to a digit.
    pub fn set_digit(&mut self, digit: u8) {
        self.digit = digit % 10;
        self.turning = None;
    }

    /// Resting angle of the wheel for its digit.
    pub fn angle(&self) -> f64 {
        ZERO_ANGLE + STEP_ANGLE * self.digit as f64
    }

    pub fn is_turning(&self) -> bool {
        self.turning.is_some()
    }
}

/// Dials plus the code that opens them.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CombinationLock {
    combination: Vec<u8>,
    dials: Vec<Dial>,
}

impl CombinationLock {
    /// Lock with one dial per combination digit.
    pub fn new(combination: Vec<u8>) -> Self {
        let dials = vec![Dial { activated: true, ..Dial::default() }; combination.len()];
        Self { combination, dials }
    }

    /// Turn dial `i` by one digit.
    pub fn turn(&mut self, i: usize) -> bool {
        self.dials.get_mut(i).is_some_and(Dial::turn)
    }

    /// All dials.
    pub fn dials(&self) -> &[Dial] {
        &self.dials
    }

    /// Digits currently shown.
    pub fn digits(&self) -> Vec<u8> {
        self.dials.iter().map(Dial::digit).collect()
    }

    fn set_activated(&mut self, activated: bool) {
        for dial in &mut self.dials {
            dial.activated = activated;
        }
    }
}

impl PuzzleMechanism for CombinationLock {
    fn check_if_solved(&mut self, _frame: &MechanismFrame) -> bool {
        self.dials
            .iter()
            .zip(&self.combination)
            .all(|(dial, digit)| dial.digit == *digit)
    }

    fn reset(&mut self) {
        for dial in &mut self.dials {
            dial.set_digit(0);
        }
        self.set_activated(true);
    }

    fn on_skip(&mut self) {
        for (dial, digit) in self.dials.iter_mut().zip(&self.combination) {
            dial.set_digit(*digit);
        }
        self.set_activated(false);
    }

    fn on_solve(&mut self) {
        self.set_activated(false);
    }

    fn on_update(&mut self, frame: &MechanismFrame) {
        for dial in &mut self.dials {
            dial.tick(frame.dt);
        }
    }
}
