//! Geographic coordinates
//!
//! Latitude/longitude in decimal degrees with great-circle distance
//! (haversine) and initial bearing. A NaN component means "no fix yet";
//! every derived quantity of such a point is itself invalid.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::distance::Distance;

/// Mean Earth radius used by the haversine formula.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Hemisphere letter of a degrees/minutes/seconds reading.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Hemisphere {
    North,
    South,
    East,
    West,
}

impl Hemisphere {
    fn sign(self) -> f64 {
        match self {
            Hemisphere::North | Hemisphere::East => 1.0,
            Hemisphere::South | Hemisphere::West => -1.0,
        }
    }
}

/// One axis written as degrees, minutes, seconds.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dms {
    /// Whole degrees.
    pub degrees: u32,
    /// Arc minutes.
    pub minutes: u32,
    /// Arc seconds.
    pub seconds: f64,
    /// Hemisphere the reading refers to.
    pub hemisphere: Hemisphere,
}

impl Dms {
    /// Convenience constructor.
    pub fn new(degrees: u32, minutes: u32, seconds: f64, hemisphere: Hemisphere) -> Self {
        Self { degrees, minutes, seconds, hemisphere }
    }

    fn to_decimal(self) -> f64 {
        let magnitude = self.degrees as f64 + self.minutes as f64 / 60.0 + self.seconds / 3600.0;
        self.hemisphere.sign() * magnitude
    }
}

/// A point on the Earth's surface.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Degrees north of the equator (negative for south).
    pub latitude: f64,
    /// Degrees east of Greenwich (negative for west).
    pub longitude: f64,
}

impl Default for Coordinates {
    fn default() -> Self {
        Self::UNKNOWN
    }
}

impl Coordinates {
    /// Placeholder for "no GPS fix".
    pub const UNKNOWN: Self = Self { latitude: f64::NAN, longitude: f64::NAN };

    /// Create from decimal degrees.
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Create from degrees/minutes/seconds readings.
    pub fn from_dms(latitude: Dms, longitude: Dms) -> Self {
        Self::new(latitude.to_decimal(), longitude.to_decimal())
    }

    /// True when both components are numbers.
    #[inline]
    pub fn is_valid(&self) -> bool {
        !self.latitude.is_nan() && !self.longitude.is_nan()
    }

    /// Great-circle distance using the haversine formula.
    ///
    /// Returns [`Distance::INVALID`] if either point is invalid.
    pub fn distance_to(&self, other: &Coordinates) -> Distance {
        if !self.is_valid() || !other.is_valid() {
            return Distance::INVALID;
        }

        let d_lat = (other.latitude - self.latitude).to_radians();
        let d_lon = (other.longitude - self.longitude).to_radians();
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();

        let a = (d_lat / 2.0).sin().powi(2)
            + (d_lon / 2.0).sin().powi(2) * lat1.cos() * lat2.cos();
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        Distance::from_meters(EARTH_RADIUS_METERS * c)
    }

    /// Initial bearing towards `destination`, in degrees from true north.
    ///
    /// Result lies in `[0, 360)`, or is NaN if either point is invalid.
    pub fn bearing_to(&self, destination: &Coordinates) -> f64 {
        if !self.is_valid() || !destination.is_valid() {
            return f64::NAN;
        }

        let lat1 = self.latitude.to_radians();
        let lat2 = destination.latitude.to_radians();
        let d_lon = (destination.longitude - self.longitude).to_radians();

        let y = d_lon.sin() * lat2.cos();
        let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lon.cos();
        let bearing = y.atan2(x).to_degrees();

        let normalized = bearing - 360.0 * (bearing / 360.0).floor();
        // -0.0 and 360.0 can fall out of the floor arithmetic
        if normalized >= 360.0 || normalized == 0.0 {
            0.0
        } else {
            normalized
        }
    }
}

/// Split an absolute angle into degrees, minutes, seconds and tenths.
fn dms_parts(value: f64) -> (u64, u64, u64, u64) {
    let degrees = value.abs();
    let minutes = degrees.fract() * 60.0;
    let seconds = minutes.fract() * 60.0;
    let tenths = seconds.fract() * 10.0;
    (
        degrees.floor() as u64,
        minutes.floor() as u64,
        seconds.floor() as u64,
        tenths.floor() as u64,
    )
}

impl fmt::Display for Coordinates {
    /// Formats as `47° 41' 8.3'' N 8° 39' 29.5'' E`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_valid() {
            return write!(f, "unknown position");
        }

        let lat_dir = if self.latitude >= 0.0 { "N" } else { "S" };
        let lon_dir = if self.longitude >= 0.0 { "E" } else { "W" };
        let (la_d, la_m, la_s, la_t) = dms_parts(self.latitude);
        let (lo_d, lo_m, lo_s, lo_t) = dms_parts(self.longitude);

        write!(
            f,
            "{}° {}' {}.{}'' {} {}° {}' {}.{}'' {}",
            la_d, la_m, la_s, la_t, lat_dir, lo_d, lo_m, lo_s, lo_t, lon_dir
        )
    }
}

// =============================================================================
// TESTS
// =============================================================================
