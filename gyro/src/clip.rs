use gyro_types::prelude::FifoSample;
use na::Vector3;
use tracing::trace;

/// Largest magnitude the sensor can report, in raw units
pub const MAX_RAW_VALUE: f32 = i16::MAX as f32;

/// Fraction of the full-scale range treated as saturated
const CLIP_LIMIT_FRACTION: f32 = 0.999;

/// Counts saturated readings.
///
/// Per-axis counts live as long as the detector. The window count is the
/// total across all axes since the last integration window closed.
#[derive(Debug, Clone)]
pub struct ClipDetector {
    limit: f32,
    per_axis: [u64; 3],
    window: u32,
}

impl Default for ClipDetector {
    fn default() -> Self {
        Self {
            limit: MAX_RAW_VALUE,
            per_axis: [0; 3],
            window: 0,
        }
    }
}

/// 99.9% of the full-scale range in raw units, never below the sensor's
/// own saturation point.
pub fn clip_limit(range: f32, scale: f32) -> f32 {
    // f32::max ignores a NaN operand
    ((range / scale) * CLIP_LIMIT_FRACTION).max(MAX_RAW_VALUE)
}

/// Number of readings with `|v| >= limit`
pub fn count_clipped(samples: &[i16], limit: i16) -> u32 {
    let limit = i32::from(limit);
    samples
        .iter()
        .filter(|&&v| i32::from(v).abs() >= limit)
        .count() as u32
}

impl ClipDetector {
    pub fn new(range: f32, scale: f32) -> Self {
        Self {
            limit: clip_limit(range, scale),
            ..Default::default()
        }
    }

    pub fn update_limit(&mut self, range: f32, scale: f32) {
        self.limit = clip_limit(range, scale);
    }

    pub fn limit(&self) -> f32 {
        self.limit
    }

    /// The limit clamped into the raw sample range, for FIFO readings
    pub fn raw_limit(&self) -> i16 {
        self.limit.clamp(i16::MIN as f32, i16::MAX as f32) as i16
    }

    /// Checks a raw, rotated, unscaled reading
    pub fn evaluate(&mut self, raw: &Vector3<f32>) -> [bool; 3] {
        let mut clipped = [false; 3];
        for (axis, value) in raw.iter().enumerate() {
            if value.abs() >= self.limit {
                clipped[axis] = true;
                self.per_axis[axis] += 1;
                self.window += 1;
            }
        }
        if clipped.iter().any(|c| *c) {
            trace!(?clipped, limit = self.limit, "Clipping");
        }
        clipped
    }

    /// Checks every raw reading of a burst, before rotation
    pub fn evaluate_fifo(&mut self, sample: &FifoSample) -> [u32; 3] {
        let limit = self.raw_limit();
        let mut counts = [0; 3];
        for (axis, values) in sample.axes().iter().enumerate() {
            counts[axis] = count_clipped(values, limit);
            self.per_axis[axis] += u64::from(counts[axis]);
            self.window += counts[axis];
        }
        if counts.iter().any(|c| *c > 0) {
            trace!(?counts, limit, "Clipping");
        }
        counts
    }

    /// Lifetime clip count per axis
    pub fn per_axis(&self) -> [u64; 3] {
        self.per_axis
    }

    pub fn window_count(&self) -> u32 {
        self.window
    }

    pub fn reset_window(&mut self) {
        self.window = 0;
    }
}
