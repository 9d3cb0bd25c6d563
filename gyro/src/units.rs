//! A lightweight uom-ish library, just the quantities the gyro pipeline reports.

use std::ops::{Add, AddAssign, Sub};

use gyro_types::time::Microseconds;
use serde::{Deserialize, Serialize};

/// Monotonic time since boot
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct Timestamp {
    micros: Microseconds,
}

impl std::fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} µs", self.micros)
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{:06}", self.micros / 1_000_000, self.micros % 1_000_000)
    }
}

impl Timestamp {
    pub fn zero() -> Timestamp {
        Timestamp { micros: 0 }
    }

    pub fn from_micros(micros: Microseconds) -> Timestamp {
        Timestamp { micros }
    }

    pub fn as_micros(&self) -> Microseconds {
        self.micros
    }

    /// Time elapsed since `earlier`, zero if `earlier` is in the future
    pub fn saturating_since(&self, earlier: Timestamp) -> Time {
        Time::from_micros(self.micros.saturating_sub(earlier.micros) as f64)
    }
}

impl Sub<Timestamp> for Timestamp {
    type Output = Time;

    fn sub(self, rhs: Timestamp) -> Self::Output {
        Time::from_micros(self.micros as f64 - rhs.micros as f64)
    }
}

impl Add<Time> for Timestamp {
    type Output = Timestamp;

    fn add(self, rhs: Time) -> Self::Output {
        let mut ts = self;
        ts += rhs;
        ts
    }
}

impl AddAssign<Time> for Timestamp {
    fn add_assign(&mut self, rhs: Time) {
        self.micros = self.micros.saturating_add_signed(rhs.as_micros().round() as i64);
    }
}

#[derive(Copy, Clone, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Time {
    seconds: f64,
}

impl std::fmt::Debug for Time {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} s", self.seconds)
    }
}

impl Time {
    pub fn from_secs(seconds: f64) -> Time {
        Time { seconds }
    }

    pub fn from_millis(millis: f64) -> Time {
        Time {
            seconds: millis / 1_000.0,
        }
    }

    pub fn from_micros(micros: f64) -> Time {
        Time {
            seconds: micros / 1_000_000.0,
        }
    }

    pub fn as_secs(&self) -> f64 {
        self.seconds
    }

    pub fn as_millis(&self) -> f64 {
        self.seconds * 1_000.0
    }

    pub fn as_micros(&self) -> f64 {
        self.seconds * 1_000_000.0
    }
}

impl Add<Time> for Time {
    type Output = Time;

    fn add(self, rhs: Time) -> Self::Output {
        Time::from_secs(self.as_secs() + rhs.as_secs())
    }
}

impl Sub<Time> for Time {
    type Output = Time;

    fn sub(self, rhs: Time) -> Self::Output {
        Time::from_secs(self.as_secs() - rhs.as_secs())
    }
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Frequency {
    hertz: u16,
}

impl std::fmt::Debug for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} Hz", self.hertz)
    }
}

impl Frequency {
    pub fn from_hertz(hertz: u16) -> Frequency {
        Frequency { hertz }
    }

    pub fn as_hertz(&self) -> u16 {
        self.hertz
    }

    /// Whole microseconds per cycle, `None` for 0 Hz
    pub fn period_micros(&self) -> Option<u32> {
        1_000_000_u32.checked_div(u32::from(self.hertz))
    }
}

#[derive(Copy, Clone, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Temperature {
    degrees_celsius: f32,
}

impl std::fmt::Debug for Temperature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} °C", self.degrees_celsius)
    }
}

impl Temperature {
    pub fn from_degrees_celsius(degrees_celsius: f32) -> Temperature {
        Temperature { degrees_celsius }
    }

    pub fn as_degrees_celsius(&self) -> f32 {
        self.degrees_celsius
    }
}

#[derive(Copy, Clone, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct AngularVelocity {
    radians_per_second: f32,
}

impl std::fmt::Debug for AngularVelocity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} °·s⁻¹", self.as_degrees_per_second())
    }
}

impl AngularVelocity {
    pub fn from_degrees_per_second(degrees_per_second: f32) -> AngularVelocity {
        AngularVelocity {
            radians_per_second: degrees_per_second.to_radians(),
        }
    }

    pub fn from_radians_per_second(radians_per_second: f32) -> AngularVelocity {
        AngularVelocity { radians_per_second }
    }

    pub fn as_degrees_per_second(&self) -> f32 {
        self.radians_per_second.to_degrees()
    }

    pub fn as_radians_per_second(&self) -> f32 {
        self.radians_per_second
    }
}
