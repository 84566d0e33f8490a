//! Distance in meters.

use std::fmt;
use std::ops::{Add, AddAssign, Sub};

use serde::{Deserialize, Serialize};

/// A length in meters.
///
/// NaN marks an unknown distance (no GPS fix yet). It propagates through
/// arithmetic and is reported by [`Distance::is_valid`].
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Distance {
    meters: f64,
}

impl Distance {
    /// Zero distance.
    pub const ZERO: Self = Self { meters: 0.0 };

    /// Unknown distance.
    pub const INVALID: Self = Self { meters: f64::NAN };

    /// Create from meters.
    #[inline]
    pub const fn from_meters(meters: f64) -> Self {
        Self { meters }
    }

    /// Create from kilometers.
    #[inline]
    pub fn from_kilometers(kilometers: f64) -> Self {
        Self { meters: kilometers * 1000.0 }
    }

    /// False for the unknown distance.
    #[inline]
    pub fn is_valid(&self) -> bool {
        !self.meters.is_nan()
    }

    /// Raw meters.
    #[inline]
    pub fn meters(&self) -> f64 {
        self.meters
    }

    /// Raw kilometers.
    #[inline]
    pub fn kilometers(&self) -> f64 {
        self.meters / 1000.0
    }

    /// Meters rounded to the nearest integer.
    pub fn meters_int(&self) -> i64 {
        self.meters.round() as i64
    }

    /// Whole kilometers, rounded down.
    pub fn kilometers_int(&self) -> i64 {
        (self.meters / 1000.0).floor() as i64
    }
}

impl Add for Distance {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::from_meters(self.meters + rhs.meters)
    }
}

impl Sub for Distance {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::from_meters(self.meters - rhs.meters)
    }
}

impl AddAssign for Distance {
    fn add_assign(&mut self, rhs: Self) {
        self.meters += rhs.meters;
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_valid() {
            write!(f, "unknown")
        } else if self.meters > 1000.0 {
            let km = (self.meters / 10.0).round() / 100.0;
            write!(f, "{} km", km)
        } else {
            write!(f, "{} m", self.meters.round())
        }
    }
}
