//! Delta-angle integration over short windows.
//!
//! Two ingestion paths share one window state:
//!  - [`Integrator::put`] sums calibrated single samples.
//!  - [`Integrator::put_fifo`] integrates raw FIFO bursts with the
//!    trapezoidal rule and calibrates the integral when the window closes.
//!
//! A window is closed when `sample_count` reaches the reset threshold. On the
//! single-sample path that counts samples, on the FIFO path it counts bursts.
//! The caller consumes the returned window and then calls [`Integrator::reset`].

use crate::{calibration::Calibration, error::GyroError, units::Frequency};
use gyro_types::prelude::{FifoSample, Microseconds};
use na::Vector3;

/// Minimum span of motion covered by one integration window
pub const INTEGRATION_TARGET_SPAN_US: u32 = 4_000;

pub const DEFAULT_UPDATE_RATE_HZ: u16 = 1_000;

/// A closed integration window
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct IntegratedWindow {
    pub delta_angle: Vector3<f32>,
    /// Time covered by the window, in microseconds
    pub dt: u32,
    pub samples: u32,
}

#[derive(Debug, Clone)]
pub struct Integrator {
    accumulated: Vector3<f32>,
    sample_count: u32,
    fifo_sample_count: u32,
    /// Newest reading of the previous burst, per axis. Survives resets.
    last_sample: Vector3<f32>,
    prev_timestamp: Microseconds,
    window_span: u64,

    update_interval: u32,
    reset_threshold: u32,
}

impl Default for Integrator {
    fn default() -> Self {
        let update_interval = 1_000_000 / u32::from(DEFAULT_UPDATE_RATE_HZ);
        Self {
            accumulated: Vector3::zeros(),
            sample_count: 0,
            fifo_sample_count: 0,
            last_sample: Vector3::zeros(),
            prev_timestamp: 0,
            window_span: 0,
            update_interval,
            reset_threshold: reset_threshold_for_interval(update_interval),
        }
    }
}

/// Number of ingestions needed to cover the target span, at least one
pub fn reset_threshold_for_interval(update_interval: u32) -> u32 {
    (INTEGRATION_TARGET_SPAN_US / update_interval.max(1)).max(1)
}

impl Integrator {
    pub fn new(update_rate: Frequency) -> Result<Self, GyroError> {
        let mut integrator = Self::default();
        integrator.set_update_rate(update_rate)?;
        Ok(integrator)
    }

    /// Recomputes the reset threshold. A zero rate is rejected and leaves
    /// the current configuration in place.
    pub fn set_update_rate(&mut self, update_rate: Frequency) -> Result<u32, GyroError> {
        let update_interval = update_rate
            .period_micros()
            .ok_or(GyroError::ZeroUpdateRate)?;
        self.update_interval = update_interval;
        self.reset_threshold = reset_threshold_for_interval(update_interval);
        Ok(self.reset_threshold)
    }

    pub fn update_interval(&self) -> u32 {
        self.update_interval
    }

    pub fn reset_threshold(&self) -> u32 {
        self.reset_threshold
    }

    pub fn accumulated(&self) -> Vector3<f32> {
        self.accumulated
    }

    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    pub fn fifo_sample_count(&self) -> u32 {
        self.fifo_sample_count
    }

    pub fn last_sample(&self) -> Vector3<f32> {
        self.last_sample
    }

    pub fn prev_timestamp(&self) -> Microseconds {
        self.prev_timestamp
    }

    /// Adds one calibrated sample. Returns the window once enough samples
    /// have accumulated.
    pub fn put(
        &mut self,
        timestamp: Microseconds,
        calibrated: Vector3<f32>,
    ) -> Option<IntegratedWindow> {
        let dt = if self.prev_timestamp == 0 {
            u64::from(self.update_interval)
        } else {
            timestamp.saturating_sub(self.prev_timestamp)
        };

        self.window_span += dt;
        self.accumulated += calibrated;
        self.sample_count += 1;
        self.prev_timestamp = timestamp;

        (self.sample_count >= self.reset_threshold).then(|| IntegratedWindow {
            delta_angle: self.accumulated,
            dt: u32::try_from(self.window_span).unwrap_or(u32::MAX),
            samples: self.sample_count,
        })
    }

    /// True when `sample` arrived more than two burst spans after the
    /// previous one, so the window in progress no longer describes
    /// continuous motion.
    pub fn is_stale(&self, sample: &FifoSample) -> bool {
        self.prev_timestamp != 0
            && sample.timestamp_sample > self.prev_timestamp
            && (sample.timestamp_sample - self.prev_timestamp) as f32 > 2.0 * sample.span()
    }

    /// Integrates a raw burst. Empty bursts are ignored.
    ///
    /// Readings are equally spaced, so the trapezoidal sum is accumulated in
    /// units of `dt` and converted to seconds on close. The newest reading is
    /// kept so the trapezoid spanning two bursts is completed by the next one.
    ///
    /// Does not update the previous timestamp, see
    /// [`Integrator::set_prev_timestamp`].
    pub fn put_fifo(
        &mut self,
        sample: &FifoSample,
        calibration: &Calibration,
    ) -> Option<IntegratedWindow> {
        if sample.is_empty() {
            return None;
        }

        self.sample_count += 1;
        self.fifo_sample_count += sample.len() as u32;

        for (axis, values) in sample.axes().iter().enumerate() {
            if let Some((newest, older)) = values.split_last() {
                let newest = f32::from(*newest);
                let sum: i32 = older.iter().map(|v| i32::from(*v)).sum();
                self.accumulated[axis] += 0.5 * (self.last_sample[axis] + newest) + sum as f32;
                self.last_sample[axis] = newest;
            }
        }

        if self.fifo_sample_count > 0 && self.sample_count >= self.reset_threshold {
            let delta_angle = calibration
                .calibrate_integral(self.accumulated, self.fifo_sample_count)
                * (1e-6 * sample.dt);

            Some(IntegratedWindow {
                delta_angle,
                dt: (self.fifo_sample_count as f32 * sample.dt) as u32,
                samples: self.fifo_sample_count,
            })
        } else {
            None
        }
    }

    /// Records the time of the burst just ingested, for gap detection.
    /// Called after any reset caused by the burst.
    pub fn set_prev_timestamp(&mut self, timestamp: Microseconds) {
        self.prev_timestamp = timestamp;
    }

    pub fn reset(&mut self) {
        self.sample_count = 0;
        self.fifo_sample_count = 0;
        self.accumulated = Vector3::zeros();
        self.window_span = 0;
        self.prev_timestamp = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use gyro_types::prelude::Rotation;

    fn burst(timestamp: Microseconds, dt: f32, values: &[i16]) -> FifoSample {
        FifoSample::from_slices(timestamp, dt, values, values, values).unwrap()
    }

    #[test]
    fn reset_threshold_from_rate() {
        let mut i = Integrator::default();
        assert_eq!(i.set_update_rate(Frequency::from_hertz(1000)), Ok(4));
        assert_eq!(i.update_interval(), 1000);
        assert_eq!(i.set_update_rate(Frequency::from_hertz(8000)), Ok(32));
        assert_eq!(i.set_update_rate(Frequency::from_hertz(800)), Ok(3));
        // Slower than the target span, close every ingestion
        assert_eq!(i.set_update_rate(Frequency::from_hertz(100)), Ok(1));
    }

    #[test]
    fn zero_rate_rejected() {
        let mut i = Integrator::new(Frequency::from_hertz(2000)).unwrap();
        assert_eq!(
            i.set_update_rate(Frequency::from_hertz(0)),
            Err(GyroError::ZeroUpdateRate)
        );
        assert_eq!(i.reset_threshold(), 8);
        assert!(Integrator::new(Frequency::from_hertz(0)).is_err());
    }

    #[test]
    fn single_sample_window_is_a_plain_sum() {
        let mut i = Integrator::new(Frequency::from_hertz(1000)).unwrap();
        let v = Vector3::new(1.0, 0.0, 0.0);

        assert!(i.put(1_000, v).is_none());
        assert!(i.put(2_000, v).is_none());
        assert!(i.put(3_000, v).is_none());
        let window = i.put(4_000, v).unwrap();

        assert_eq!(window.delta_angle, Vector3::new(4.0, 0.0, 0.0));
        assert_eq!(window.samples, 4);
        // First sample of a window is assumed one nominal interval long
        assert_eq!(window.dt, 4_000);

        i.reset();
        assert_eq!(i.sample_count(), 0);
        assert_eq!(i.accumulated(), Vector3::zeros());
        assert_eq!(i.prev_timestamp(), 0);
    }

    #[test]
    fn single_sample_dt_follows_timestamps() {
        let mut i = Integrator::new(Frequency::from_hertz(1000)).unwrap();
        let v = Vector3::new(0.5, -0.5, 2.0);
        i.put(10_000, v);
        i.put(11_500, v);
        i.put(12_000, v);
        let window = i.put(14_000, v).unwrap();
        assert_eq!(window.dt, 1_000 + 1_500 + 500 + 2_000);
        assert_eq!(window.delta_angle, v * 4.0);
    }

    #[test]
    fn trapezoid_of_constant_signal_is_sum() {
        let mut i = Integrator::new(Frequency::from_hertz(100)).unwrap();
        // Keep the window open so the accumulator can be inspected
        i.reset_threshold = u32::MAX;
        let cal = Calibration::default();

        i.put_fifo(&burst(1_000, 125.0, &[7; 8]), &cal);
        assert_eq!(i.last_sample(), Vector3::new(7.0, 7.0, 7.0));

        let before = i.accumulated();
        i.put_fifo(&burst(2_000, 125.0, &[7; 8]), &cal);
        assert_eq!(i.accumulated() - before, Vector3::new(56.0, 56.0, 56.0));
    }

    #[test]
    fn trapezoid_carries_edge_between_bursts() {
        let mut i = Integrator::default();
        i.reset_threshold = u32::MAX;
        let cal = Calibration::default();

        // 0.5 * (0 + 4) + (1 + 2 + 3)
        i.put_fifo(&burst(1_000, 100.0, &[1, 2, 3, 4]), &cal);
        assert_eq!(i.accumulated().x, 8.0);

        // 0.5 * (4 + 10) + (6)
        i.put_fifo(&burst(1_200, 100.0, &[6, 10]), &cal);
        assert_eq!(i.accumulated().x, 8.0 + 13.0);
        assert_eq!(i.fifo_sample_count(), 6);
        assert_eq!(i.sample_count(), 2);

        i.reset();
        assert_eq!(i.last_sample().x, 10.0);
    }

    #[test]
    fn fifo_window_closes_on_burst_count() {
        let mut i = Integrator::new(Frequency::from_hertz(1000)).unwrap();
        let cal = Calibration::default();
        let values = [100_i16; 8];

        for n in 1..4 {
            assert!(i.put_fifo(&burst(n * 1_000, 125.0, &values), &cal).is_none());
        }
        let window = i.put_fifo(&burst(4_000, 125.0, &values), &cal).unwrap();

        assert_eq!(window.samples, 32);
        assert_eq!(window.dt, 4_000);
        // First burst starts from a zero edge: 32 * 100 - 0.5 * 100
        let expected = (3_200.0 - 50.0) * 1e-6 * 125.0;
        assert_relative_eq!(window.delta_angle, Vector3::from_element(expected), epsilon = 1e-6);
    }

    #[test]
    fn fifo_window_dt_truncates_to_whole_micros() {
        let mut i = Integrator::new(Frequency::from_hertz(1000)).unwrap();
        let cal = Calibration::default();
        let window = (1..=4)
            .filter_map(|n| i.put_fifo(&burst(n * 1_000, 124.9, &[1; 8]), &cal))
            .last()
            .unwrap();
        // 32 * 124.9 = 3996.8
        assert_eq!(window.dt, 3_996);
    }

    #[test]
    fn fifo_window_applies_rotation_scale_and_offset() {
        let mut i = Integrator::new(Frequency::from_hertz(100)).unwrap();
        let mut cal = Calibration::new(Rotation::Yaw90, 0.01).unwrap();
        cal.set_offset(Vector3::new(0.5, 0.0, 0.0));
        i.last_sample = Vector3::new(200.0, 0.0, 0.0);

        let sample = FifoSample::from_slices(1_000, 250.0, &[200; 4], &[0; 4], &[0; 4]).unwrap();
        let window = i.put_fifo(&sample, &cal).unwrap();

        // raw x integral 800 -> board y, scaled to 8, x offset 0.5 * 4 samples
        let expected = Vector3::new(-2.0, 8.0, 0.0) * (1e-6 * 250.0);
        assert_relative_eq!(window.delta_angle, expected, epsilon = 1e-7);
        assert_eq!(window.dt, 1_000);
    }

    #[test]
    fn empty_burst_is_a_no_op() {
        let mut i = Integrator::new(Frequency::from_hertz(100)).unwrap();
        let cal = Calibration::default();
        assert!(i.put_fifo(&FifoSample::new(1_000, 125.0), &cal).is_none());
        assert_eq!(i.sample_count(), 0);
        assert_eq!(i.fifo_sample_count(), 0);
    }

    #[test]
    fn stale_detection() {
        let mut i = Integrator::default();
        let sample = burst(10_000, 125.0, &[1; 8]);

        // No previous burst, nothing to compare against
        assert!(!i.is_stale(&sample));

        i.set_prev_timestamp(8_000);
        assert!(!i.is_stale(&sample));
        i.set_prev_timestamp(7_999);
        assert!(i.is_stale(&sample));

        // Out of order bursts are not gaps
        i.set_prev_timestamp(20_000);
        assert!(!i.is_stale(&sample));
    }
}
