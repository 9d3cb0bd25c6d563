use crate::time::Microseconds;
use heapless::Vec;
use serde::Serialize;

/// Largest number of raw readings a single FIFO burst can carry.
pub const MAX_BURST: usize = 16;

pub type Burst = Vec<i16, MAX_BURST>;

/// A single raw angular-rate reading, in sensor units.
#[derive(Copy, Clone, PartialEq, Debug, Serialize)]
pub struct RawSample {
    pub timestamp_sample: Microseconds,
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl RawSample {
    pub fn new(timestamp_sample: Microseconds, x: f32, y: f32, z: f32) -> Self {
        Self {
            timestamp_sample,
            x,
            y,
            z,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SampleError {
    #[error("FIFO burst exceeds the maximum of {capacity} samples")]
    BurstOverflow { capacity: usize },
    #[error("FIFO axis lengths differ (x={x}, y={y}, z={z})")]
    AxisLengthMismatch { x: usize, y: usize, z: usize },
}

/// A burst of equally spaced raw readings drained from the sensor FIFO.
///
/// `timestamp_sample` is the time of the newest reading and `dt` the spacing
/// between readings, both in microseconds. The three axes always hold the
/// same number of readings.
#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct FifoSample {
    pub timestamp_sample: Microseconds,
    pub dt: f32,
    x: Burst,
    y: Burst,
    z: Burst,
}

impl FifoSample {
    pub fn new(timestamp_sample: Microseconds, dt: f32) -> Self {
        Self {
            timestamp_sample,
            dt,
            x: Vec::new(),
            y: Vec::new(),
            z: Vec::new(),
        }
    }

    pub fn from_slices(
        timestamp_sample: Microseconds,
        dt: f32,
        x: &[i16],
        y: &[i16],
        z: &[i16],
    ) -> Result<Self, SampleError> {
        if x.len() != y.len() || x.len() != z.len() {
            return Err(SampleError::AxisLengthMismatch {
                x: x.len(),
                y: y.len(),
                z: z.len(),
            });
        }
        let burst = |s: &[i16]| {
            Burst::from_slice(s).map_err(|_| SampleError::BurstOverflow {
                capacity: MAX_BURST,
            })
        };
        Ok(Self {
            timestamp_sample,
            dt,
            x: burst(x)?,
            y: burst(y)?,
            z: burst(z)?,
        })
    }

    pub fn push(&mut self, x: i16, y: i16, z: i16) -> Result<(), SampleError> {
        if self.x.is_full() {
            return Err(SampleError::BurstOverflow {
                capacity: MAX_BURST,
            });
        }
        // Capacity was checked above and all three axes grow together
        let _ = self.x.push(x);
        let _ = self.y.push(y);
        let _ = self.z.push(z);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn x(&self) -> &[i16] {
        &self.x
    }

    pub fn y(&self) -> &[i16] {
        &self.y
    }

    pub fn z(&self) -> &[i16] {
        &self.z
    }

    pub fn axes(&self) -> [&[i16]; 3] {
        [self.x.as_slice(), self.y.as_slice(), self.z.as_slice()]
    }

    /// The fixed-capacity buffers backing each axis
    pub fn bursts(&self) -> [&Burst; 3] {
        [&self.x, &self.y, &self.z]
    }

    /// The newest reading on each axis
    pub fn newest(&self) -> Option<[i16; 3]> {
        Some([*self.x.last()?, *self.y.last()?, *self.z.last()?])
    }

    /// Time covered by the burst, `len × dt`
    pub fn span(&self) -> f32 {
        self.len() as f32 * self.dt
    }
}
