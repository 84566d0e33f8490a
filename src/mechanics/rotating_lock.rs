//! Rotating lock
//!
//! Three nested cylinders are turned by tilting the device. The outer
//! cylinder follows the tilt until it reaches its target angle and locks,
//! then the middle, then the inner. Tilt is only read while the camera
//! screen is open and the lock is in view.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{MechanismFrame, PuzzleMechanism};

/// Degrees of slack when matching a target angle.
pub const ANGLE_TOLERANCE: f64 = 4.0;

/// Number of cylinders.
pub const CYLINDERS: usize = 3;

/// Roll angle of the device from its gravity vector, in `[0, 360)`.
///
/// Gravity is projected onto the screen plane and measured against
/// straight down; the sign follows the x component. Returns `None` for a
/// vector with no in-plane component.
pub fn tilt_from_gravity(gravity: [f64; 3]) -> Option<f64> {
    let [x, y, _] = gravity;
    let len = (x * x + y * y).sqrt();
    if len <= f64::EPSILON || !len.is_finite() {
        return None;
    }

    // Angle between (0, -1) and the projected vector
    let cos = (-y / len).clamp(-1.0, 1.0);
    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let angle = sign * cos.acos().to_degrees();
    Some(angle - 360.0 * (angle / 360.0).floor())
}

/// Cylinder lock state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RotatingLock {
    solution: [f64; CYLINDERS],
    cylinders: [f64; CYLINDERS],
    locked: [bool; CYLINDERS],
}

impl RotatingLock {
    /// Lock opened by `solution` (outer, middle, inner).
    pub fn new(solution: [f64; CYLINDERS]) -> Self {
        Self { solution, cylinders: [0.0; CYLINDERS], locked: [false; CYLINDERS] }
    }

    /// Build from a config list; `None` unless it has exactly three angles.
    pub fn from_slice(solution: &[f64]) -> Option<Self> {
        let solution: [f64; CYLINDERS] = solution.try_into().ok()?;
        Some(Self::new(solution))
    }

    /// Current cylinder angles, outer first.
    pub fn cylinders(&self) -> [f64; CYLINDERS] {
        self.cylinders
    }

    /// Which cylinders have locked in place.
    pub fn locked(&self) -> [bool; CYLINDERS] {
        self.locked
    }

    /// Feed one tilt reading.
    fn apply_tilt(&mut self, angle: f64) {
        let Some(stage) = self.locked.iter().position(|l| !l) else {
            return;
        };

        // The active cylinder drags the inner ones with it
        for cylinder in &mut self.cylinders[stage..] {
            *cylinder = angle;
        }

        let goal = self.solution[stage];
        if (goal - angle).abs() < ANGLE_TOLERANCE {
            self.locked[stage] = true;
            self.cylinders[stage] = goal;
            debug!(stage, goal, "Rotating lock cylinder locked");
        }
    }
}

impl PuzzleMechanism for RotatingLock {
    fn check_if_solved(&mut self, frame: &MechanismFrame) -> bool {
        if frame.camera_active && frame.in_view {
            if let Some(angle) = frame.tilt_degrees {
                self.apply_tilt(angle);
            }
        }
        self.locked.iter().all(|l| *l)
    }

    fn reset(&mut self) {
        self.cylinders = [0.0; CYLINDERS];
        self.locked = [false; CYLINDERS];
    }

    fn on_skip(&mut self) {
        self.cylinders = self.solution;
        self.locked = [true; CYLINDERS];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Duration;

    fn tilted(angle: f64) -> MechanismFrame {
        MechanismFrame {
            camera_active: true,
            in_view: true,
            tilt_degrees: Some(angle),
            ..MechanismFrame::idle(Duration::from_seconds(0.03))
        }
    }

    #[test]
    fn test_tilt_from_gravity() {
        let upright = tilt_from_gravity([0.0, -9.81, 0.0]).unwrap();
        assert!(upright.abs() < 1e-9);

        let right = tilt_from_gravity([9.81, 0.0, 0.0]).unwrap();
        assert!((right - 90.0).abs() < 1e-9);

        let left = tilt_from_gravity([-9.81, 0.0, 0.0]).unwrap();
        assert!((left - 270.0).abs() < 1e-9);

        let upside_down = tilt_from_gravity([0.0, 9.81, 0.0]).unwrap();
        assert!((upside_down - 180.0).abs() < 1e-9);

        assert!(tilt_from_gravity([0.0, 0.0, -9.81]).is_none());
    }

    #[test]
    fn test_stages_lock_in_order() {
        let mut lock = RotatingLock::new([180.0, 90.0, 0.0]);

        // Matching the middle target first does nothing special
        assert!(!lock.check_if_solved(&tilted(90.0)));
        assert_eq!(lock.locked(), [false, false, false]);
        assert_eq!(lock.cylinders(), [90.0, 90.0, 90.0]);

        assert!(!lock.check_if_solved(&tilted(178.5)));
        assert_eq!(lock.locked(), [true, false, false]);
        assert_eq!(lock.cylinders(), [180.0, 178.5, 178.5]);

        assert!(!lock.check_if_solved(&tilted(92.0)));
        assert_eq!(lock.locked(), [true, true, false]);

        assert!(lock.check_if_solved(&tilted(3.0)));
        assert_eq!(lock.cylinders(), [180.0, 90.0, 0.0]);
    }

    #[test]
    fn test_ignores_tilt_outside_camera() {
        let mut lock = RotatingLock::new([180.0, 90.0, 0.0]);
        let mut frame = tilted(180.0);
        frame.camera_active = false;
        lock.check_if_solved(&frame);

        let mut frame = tilted(180.0);
        frame.in_view = false;
        lock.check_if_solved(&frame);

        assert_eq!(lock.locked(), [false, false, false]);
    }

    #[test]
    fn test_skip_and_reset() {
        let mut lock = RotatingLock::from_slice(&[180.0, 90.0, 0.0]).unwrap();
        lock.on_skip();
        assert!(lock.check_if_solved(&MechanismFrame::idle(Duration::ZERO)));
        lock.reset();
        assert_eq!(lock.cylinders(), [0.0; 3]);
        assert!(RotatingLock::from_slice(&[1.0]).is_none());
    }
}
