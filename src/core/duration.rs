//! Game-clock duration in seconds.
//!
//! Kept separate from [`std::time::Duration`] because session timers are
//! accumulated from float frame deltas, may be subtracted below zero when
//! derived (walking = total - puzzle), and render as `M:SS` / `H:MM:SS`.

use std::fmt;
use std::ops::{Add, AddAssign, Sub};

use serde::{Deserialize, Serialize};

/// Elapsed time in seconds.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Duration {
    seconds: f64,
}

impl Duration {
    /// Zero duration.
    pub const ZERO: Self = Self { seconds: 0.0 };

    /// Create from seconds.
    #[inline]
    pub const fn from_seconds(seconds: f64) -> Self {
        Self { seconds }
    }

    /// Create from minutes.
    #[inline]
    pub fn from_minutes(minutes: f64) -> Self {
        Self { seconds: minutes * 60.0 }
    }

    /// Create from hours.
    #[inline]
    pub fn from_hours(hours: f64) -> Self {
        Self { seconds: hours * 3600.0 }
    }

    /// Build from hours, minutes and seconds.
    pub fn from_hms(hours: u32, minutes: u32, seconds: f64) -> Self {
        Self::from_seconds(3600.0 * hours as f64 + 60.0 * minutes as f64 + seconds)
    }

    /// Raw seconds.
    #[inline]
    pub fn seconds(&self) -> f64 {
        self.seconds
    }

    /// Fractional minutes.
    #[inline]
    pub fn minutes(&self) -> f64 {
        self.seconds / 60.0
    }

    /// Fractional hours.
    #[inline]
    pub fn hours(&self) -> f64 {
        self.seconds / 3600.0
    }

    /// Total seconds rounded to the nearest integer.
    pub fn seconds_int(&self) -> i64 {
        self.seconds.round() as i64
    }

    /// Total whole minutes, rounded down.
    pub fn minutes_int(&self) -> i64 {
        (self.seconds / 60.0).floor() as i64
    }

    /// Total whole hours, rounded down.
    pub fn hours_int(&self) -> i64 {
        (self.seconds / 3600.0).floor() as i64
    }
}

impl From<std::time::Duration> for Duration {
    fn from(d: std::time::Duration) -> Self {
        Self::from_seconds(d.as_secs_f64())
    }
}

impl Add for Duration {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::from_seconds(self.seconds + rhs.seconds)
    }
}

impl Sub for Duration {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::from_seconds(self.seconds - rhs.seconds)
    }
}

impl AddAssign for Duration {
    fn add_assign(&mut self, rhs: Self) {
        self.seconds += rhs.seconds;
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Components truncate toward zero
        let mut t = self.seconds;
        let h = (t / 3600.0) as i64;
        t -= 3600.0 * h as f64;
        let min = (t / 60.0) as i64;
        t -= 60.0 * min as f64;
        let s = t as i64;

        if h == 0 {
            write!(f, "{}:{:02}", min, s)
        } else {
            write!(f, "{}:{:02}:{:02}", h, min, s)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_agree() {
        assert_eq!(Duration::from_hms(1, 2, 3.0).seconds(), 3723.0);
        assert_eq!(Duration::from_minutes(2.0), Duration::from_seconds(120.0));
        assert_eq!(Duration::from_hours(0.5), Duration::from_seconds(1800.0));
        let std = std::time::Duration::from_millis(1500);
        assert_eq!(Duration::from(std).seconds(), 1.5);
    }

    #[test]
    fn test_integer_views() {
        let d = Duration::from_seconds(7259.6);
        assert_eq!(d.seconds_int(), 7260);
        assert_eq!(d.minutes_int(), 120);
        assert_eq!(d.hours_int(), 2);
    }

    #[test]
    fn test_arithmetic() {
        let total = Duration::from_seconds(600.0);
        let puzzle = Duration::from_seconds(150.0);
        assert_eq!((total - puzzle).seconds(), 450.0);

        let mut acc = Duration::ZERO;
        acc += Duration::from_seconds(0.25);
        acc += Duration::from_seconds(0.25);
        assert_eq!(acc + total, Duration::from_seconds(600.5));
    }

    #[test]
    fn test_display() {
        assert_eq!(Duration::from_seconds(0.0).to_string(), "0:00");
        assert_eq!(Duration::from_seconds(65.9).to_string(), "1:05");
        assert_eq!(Duration::from_seconds(3599.0).to_string(), "59:59");
        assert_eq!(Duration::from_hms(1, 2, 3.0).to_string(), "1:02:03");
        assert_eq!(Duration::from_hms(12, 0, 9.0).to_string(), "12:00:09");
    }
}
