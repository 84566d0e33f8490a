//! Animated puzzle components
//!
//! Push buttons and levers move over a fixed travel time. Each component is
//! a small state machine advanced by [`tick`](ButtonPress::tick) with the
//! frame delta, so nothing here depends on wall-clock time.

use serde::{Deserialize, Serialize};

use crate::core::Duration;

/// Seconds for a button or lever to travel between its end positions.
pub const TRAVEL_SECS: f64 = 0.25;

/// Depth of a fully pressed button.
pub const BUTTON_DEPTH: f64 = 0.04;

/// Lever angle at either end, in degrees (up is positive).
pub const LEVER_ANGLE: f64 = 38.0;

// =============================================================================
// BUTTON
// =============================================================================

/// Phase of a push button.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum ButtonPhase {
    /// Resting at the top.
    Idle,
    /// Moving down; seconds elapsed.
    Pressing(f64),
    /// Fully down, waiting for release.
    Held,
    /// Moving back up; seconds elapsed.
    Releasing(f64),
}

/// A push button that travels down, optionally stays down, then returns.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ButtonPress {
    phase: ButtonPhase,
    activated: bool,
    hold: bool,
    release_requested: bool,
}

impl ButtonPress {
    /// Button that stays down until [`release`](Self::release) is called.
    pub fn held() -> Self {
        Self { phase: ButtonPhase::Idle, activated: true, hold: true, release_requested: false }
    }

    /// Button that returns on its own once fully pressed.
    pub fn momentary() -> Self {
        Self { hold: false, ..Self::held() }
    }

    /// Player touched the button. Ignored while moving or deactivated.
    pub fn touch(&mut self) -> bool {
        if !self.activated || self.is_moving() {
            return false;
        }
        self.phase = ButtonPhase::Pressing(0.0);
        self.release_requested = false;
        true
    }

    /// Let a held button come back up.
    pub fn release(&mut self) {
        self.release_requested = true;
    }

    /// Advance by one frame.
    pub fn tick(&mut self, dt: Duration) {
        let dt = dt.seconds();
        self.phase = match self.phase {
            ButtonPhase::Idle => ButtonPhase::Idle,
            ButtonPhase::Pressing(t) if t + dt >= TRAVEL_SECS => {
                if self.hold && !self.release_requested {
                    ButtonPhase::Held
                } else {
                    ButtonPhase::Releasing(0.0)
                }
            }
            ButtonPhase::Pressing(t) => ButtonPhase::Pressing(t + dt),
            ButtonPhase::Held if self.release_requested => ButtonPhase::Releasing(0.0),
            ButtonPhase::Held => ButtonPhase::Held,
            ButtonPhase::Releasing(t) if t + dt >= TRAVEL_SECS => {
                self.release_requested = false;
                ButtonPhase::Idle
            }
            ButtonPhase::Releasing(t) => ButtonPhase::Releasing(t + dt),
        };
    }

    /// Current phase.
    pub fn phase(&self) -> ButtonPhase {
        self.phase
    }

    /// Down and waiting (the moment the button's action fires).
    pub fn is_pressed(&self) -> bool {
        match self.phase {
            ButtonPhase::Held => true,
            // Momentary buttons count as pressed for their whole stroke
            ButtonPhase::Pressing(_) | ButtonPhase::Releasing(_) => !self.hold,
            ButtonPhase::Idle => false,
        }
    }

    /// Not at rest.
    pub fn is_moving(&self) -> bool {
        self.phase != ButtonPhase::Idle
    }

    /// Depth below the rest position, `0..=BUTTON_DEPTH`.
    pub fn depth(&self) -> f64 {
        let fraction = match self.phase {
            ButtonPhase::Idle => 0.0,
            ButtonPhase::Pressing(t) => t / TRAVEL_SECS,
            ButtonPhase::Held => 1.0,
            ButtonPhase::Releasing(t) => 1.0 - t / TRAVEL_SECS,
        };
        BUTTON_DEPTH * fraction.clamp(0.0, 1.0)
    }

    pub fn activate(&mut self) {
        self.activated = true;
    }

    pub fn deactivate(&mut self) {
        self.activated = false;
    }

    pub fn is_activated(&self) -> bool {
        self.activated
    }

    /// Snap back to rest.
    pub fn force_idle(&mut self) {
        self.phase = ButtonPhase::Idle;
        self.release_requested = false;
    }
}

// =============================================================================
// EDGE TRIGGER
// =============================================================================

/// Fires once per rising edge of a boolean signal.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct EdgeTrigger {
    performed: bool,
}

impl EdgeTrigger {
    /// Feed this frame's signal; true on the first frame it is high.
    pub fn poll(&mut self, signal: bool) -> bool {
        if signal {
            !std::mem::replace(&mut self.performed, true)
        } else {
            self.performed = false;
            false
        }
    }
}

// =============================================================================
// LEVER
// =============================================================================

/// A lever that swings between up and down.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LeverPull {
    down: bool,
    /// Seconds into the current swing.
    moving: Option<f64>,
    activated: bool,
}

impl Default for LeverPull {
    fn default() -> Self {
        Self { down: false, moving: None, activated: true }
    }
}

impl LeverPull {
    /// Lever in the up position.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a swing to the other side. Ignored while moving or deactivated.
    pub fn touch(&mut self) -> bool {
        if !self.activated || self.moving.is_some() {
            return false;
        }
        self.moving = Some(0.0);
        true
    }

    /// Advance by one frame.
    pub fn tick(&mut self, dt: Duration) {
        if let Some(t) = self.moving {
            let t = t + dt.seconds();
            if t >= TRAVEL_SECS {
                self.moving = None;
                self.down = !self.down;
            } else {
                self.moving = Some(t);
            }
        }
    }

    pub fn is_moving(&self) -> bool {
        self.moving.is_some()
    }

    /// Resting position is down (only meaningful while not moving).
    pub fn is_down(&self) -> bool {
        self.down
    }

    /// Current angle in degrees, `+LEVER_ANGLE` up to `-LEVER_ANGLE` down.
    pub fn angle(&self) -> f64 {
        let (from, to) = if self.down {
            (-LEVER_ANGLE, LEVER_ANGLE)
        } else {
            (LEVER_ANGLE, -LEVER_ANGLE)
        };
        match self.moving {
            Some(t) => from + (to - from) * (t / TRAVEL_SECS).clamp(0.0, 1.0),
            None => from,
        }
    }

    pub fn force_up(&mut self) {
        self.down = false;
        self.moving = None;
    }

    pub fn force_down(&mut self) {
        self.down = true;
        self.moving = None;
    }

    pub fn activate(&mut self) {
        self.activated = true;
    }

    pub fn deactivate(&mut self) {
        self.activated = false;
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> Duration {
        Duration::from_seconds(0.1)
    }

    #[test]
    fn test_held_button_waits_for_release() {
        let mut button = ButtonPress::held();
        assert!(button.touch());
        assert!(!button.is_pressed());

        for _ in 0..3 {
            button.tick(frame());
        }
        assert_eq!(button.phase(), ButtonPhase::Held);
        assert!(button.is_pressed());
        assert!((button.depth() - BUTTON_DEPTH).abs() < 1e-12);

        // Still held without a release
        button.tick(frame());
        assert!(button.is_pressed());
        // Touching while moving is ignored
        assert!(!button.touch());

        button.release();
        button.tick(frame());
        assert!(matches!(button.phase(), ButtonPhase::Releasing(_)));
        for _ in 0..3 {
            button.tick(frame());
        }
        assert_eq!(button.phase(), ButtonPhase::Idle);
        assert_eq!(button.depth(), 0.0);
    }

    #[test]
    fn test_momentary_button_returns_alone() {
        let mut button = ButtonPress::momentary();
        button.touch();
        assert!(button.is_pressed());
        for _ in 0..10 {
            button.tick(frame());
        }
        assert!(!button.is_moving());
        assert!(!button.is_pressed());
    }

    #[test]
    fn test_deactivated_button_ignores_touch() {
        let mut button = ButtonPress::momentary();
        button.deactivate();
        assert!(!button.touch());
        button.activate();
        assert!(button.touch());
    }

    #[test]
    fn test_edge_trigger() {
        let mut trigger = EdgeTrigger::default();
        assert!(!trigger.poll(false));
        assert!(trigger.poll(true));
        assert!(!trigger.poll(true));
        assert!(!trigger.poll(false));
        assert!(trigger.poll(true));
    }

    #[test]
    fn test_lever_swings() {
        let mut lever = LeverPull::new();
        assert_eq!(lever.angle(), LEVER_ANGLE);
        assert!(lever.touch());
        lever.tick(Duration::from_seconds(0.125));
        assert!(lever.is_moving());
        assert!(lever.angle().abs() < 1e-9);
        assert!(!lever.touch());

        lever.tick(Duration::from_seconds(0.2));
        assert!(!lever.is_moving());
        assert!(lever.is_down());
        assert_eq!(lever.angle(), -LEVER_ANGLE);

        lever.force_up();
        assert!(!lever.is_down());
        lever.deactivate();
        assert!(!lever.touch());
    }
}
