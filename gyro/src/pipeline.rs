//! Conditioning pipeline for a single gyroscope.
//!
//! Each ingestion publishes the calibrated rate right away, feeds the
//! integrator, publishes a delta angle when a window closes and finally
//! gives the status throttle a chance to publish.

use crate::{
    calibration::Calibration,
    channel::{Publisher, Topic, TracedMessage},
    clip::ClipDetector,
    clock::Clock,
    config::GyroConfig,
    error::GyroError,
    integrator::{IntegratedWindow, Integrator},
    reports::{GyroFifoReport, GyroIntegratedReport, GyroReport, GyroStatusReport},
    status::StatusThrottle,
    units::{AngularVelocity, Frequency, Temperature, Timestamp},
    vibration::VibrationEstimator,
};
use gyro_types::prelude::*;
use na::Vector3;
use tracing::{debug, trace, warn};

/// One topic per report type
#[derive(Debug, Default)]
pub struct GyroTopics {
    pub gyro: Topic<GyroReport>,
    pub integrated: Topic<GyroIntegratedReport>,
    pub fifo: Topic<GyroFifoReport>,
    pub status: Topic<GyroStatusReport>,
}

impl GyroTopics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publishers(&self) -> GyroPublishers {
        GyroPublishers {
            gyro: self.gyro.publisher(),
            integrated: self.integrated.publisher(),
            fifo: self.fifo.publisher(),
            status: self.status.publisher(),
        }
    }
}

#[derive(Debug)]
pub struct GyroPublishers {
    pub gyro: Publisher<GyroReport>,
    pub integrated: Publisher<GyroIntegratedReport>,
    pub fifo: Publisher<GyroFifoReport>,
    pub status: Publisher<GyroStatusReport>,
}

#[derive(Debug)]
pub struct GyroPipeline<C: Clock> {
    clock: C,
    device_id: DeviceId,
    calibration: Calibration,
    /// Full-scale range, rad/s
    range: f32,
    update_rate: Frequency,
    temperature: Temperature,
    error_count: u64,

    clip: ClipDetector,
    integrator: Integrator,
    vibration: VibrationEstimator,
    status: StatusThrottle,

    publishers: GyroPublishers,
}

impl<C: Clock> GyroPipeline<C> {
    pub fn new(
        clock: C,
        device_id: DeviceId,
        rotation: Rotation,
        publishers: GyroPublishers,
    ) -> Self {
        let calibration = Calibration::with_rotation(rotation);
        let range = GyroConfig::nominal().range();
        Self {
            clock,
            device_id,
            clip: ClipDetector::new(range, calibration.scale()),
            calibration,
            range,
            update_rate: Frequency::from_hertz(crate::integrator::DEFAULT_UPDATE_RATE_HZ),
            temperature: Temperature::default(),
            error_count: 0,
            integrator: Integrator::default(),
            vibration: VibrationEstimator::default(),
            status: StatusThrottle::default(),
            publishers,
        }
    }

    pub fn from_config(
        config: &GyroConfig,
        clock: C,
        publishers: GyroPublishers,
    ) -> Result<Self, GyroError> {
        let calibration = config.calibration()?;
        let update_rate = config.update_rate();
        let range = config.range();
        Ok(Self {
            clock,
            device_id: config.device_id,
            clip: ClipDetector::new(range, calibration.scale()),
            calibration,
            range,
            update_rate,
            temperature: Temperature::from_degrees_celsius(config.temperature),
            error_count: 0,
            integrator: Integrator::new(update_rate)?,
            vibration: VibrationEstimator::default(),
            status: StatusThrottle::default(),
            publishers,
        })
    }

    /// Conditions a single raw sample, in sensor units
    pub fn ingest_sample(&mut self, timestamp_sample: Microseconds, x: f32, y: f32, z: f32) {
        let now = self.clock.now();
        let raw = Vector3::new(x, y, z);

        // Saturation is judged in the board frame, before scaling
        self.clip.evaluate(&self.calibration.rotate(raw));

        let calibrated = self.calibration.calibrate(raw);
        self.publish_rate(timestamp_sample, calibrated, now);

        if let Some(window) = self.integrator.put(timestamp_sample, calibrated) {
            self.close_window(timestamp_sample, window, now);
        }

        self.publish_status(now);
    }

    /// Conditions a burst of raw FIFO readings. Empty bursts are ignored.
    pub fn ingest_fifo(&mut self, sample: &FifoSample) {
        if sample.is_empty() {
            return;
        }
        let now = self.clock.now();

        let n = sample.len() as f32;
        let mut average = Vector3::zeros();
        for (axis, values) in sample.axes().iter().enumerate() {
            let sum: i32 = values.iter().map(|v| i32::from(*v)).sum();
            average[axis] = sum as f32 / n;
        }
        self.publish_rate(
            sample.timestamp_sample,
            self.calibration.calibrate(average),
            now,
        );

        self.clip.evaluate_fifo(sample);

        if self.integrator.is_stale(sample) {
            debug!(
                timestamp = sample.timestamp_sample,
                prev_timestamp = self.integrator.prev_timestamp(),
                "Gap between FIFO bursts, resetting integrator"
            );
            self.reset_integrator();
        }

        if let Some(window) = self.integrator.put_fifo(sample, &self.calibration) {
            self.close_window(sample.timestamp_sample, window, now);
        }
        self.integrator.set_prev_timestamp(sample.timestamp_sample);

        let [x, y, z] = sample.bursts();
        let report = GyroFifoReport {
            device_id: self.device_id,
            timestamp_sample: Timestamp::from_micros(sample.timestamp_sample),
            dt: sample.dt,
            scale: self.calibration.scale(),
            samples: sample.len() as u8,
            x: x.clone(),
            y: y.clone(),
            z: z.clone(),
            timestamp: now,
        };
        fire_and_forget(&mut self.publishers.fifo, report);

        self.publish_status(now);
    }

    pub fn set_calibration_offset(&mut self, x: f32, y: f32, z: f32) {
        self.calibration.set_offset(Vector3::new(x, y, z));
    }

    pub fn set_update_rate(&mut self, rate_hz: u16) -> Result<(), GyroError> {
        let rate = Frequency::from_hertz(rate_hz);
        match self.integrator.set_update_rate(rate) {
            Ok(reset_threshold) => {
                debug!(?rate, reset_threshold, "Update rate changed");
                self.update_rate = rate;
                Ok(())
            }
            Err(e) => {
                warn!(err = %e, "Rejected update rate");
                Err(e)
            }
        }
    }

    pub fn set_scale(&mut self, scale: f32) -> Result<(), GyroError> {
        if let Err(e) = self.calibration.set_scale(scale) {
            warn!(err = %e, "Rejected scale");
            return Err(e);
        }
        self.clip.update_limit(self.range, scale);
        Ok(())
    }

    /// Full-scale range in rad/s
    pub fn set_range(&mut self, range: f32) {
        self.range = range;
        self.clip.update_limit(range, self.calibration.scale());
    }

    pub fn set_device_id(&mut self, device_id: DeviceId) {
        self.device_id = device_id;
    }

    pub fn set_device_type(&mut self, devtype: u8) {
        self.device_id = self.device_id.with_devtype(devtype);
    }

    pub fn set_temperature(&mut self, temperature: Temperature) {
        self.temperature = temperature;
    }

    pub fn set_error_count(&mut self, error_count: u64) {
        self.error_count = error_count;
    }

    pub fn increment_error_count(&mut self) {
        self.error_count = self.error_count.saturating_add(1);
    }

    pub fn reset_error_count(&mut self) {
        self.error_count = 0;
    }

    pub fn device_id(&self) -> DeviceId {
        self.device_id
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    pub fn range(&self) -> f32 {
        self.range
    }

    pub fn update_rate(&self) -> Frequency {
        self.update_rate
    }

    pub fn temperature(&self) -> Temperature {
        self.temperature
    }

    pub fn error_count(&self) -> u64 {
        self.error_count
    }

    pub fn clip(&self) -> &ClipDetector {
        &self.clip
    }

    pub fn integrator(&self) -> &Integrator {
        &self.integrator
    }

    pub fn vibration(&self) -> &VibrationEstimator {
        &self.vibration
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    fn publish_rate(&mut self, timestamp_sample: Microseconds, rate: Vector3<f32>, now: Timestamp) {
        let report = GyroReport {
            timestamp_sample: Timestamp::from_micros(timestamp_sample),
            device_id: self.device_id,
            temperature: self.temperature,
            x: AngularVelocity::from_radians_per_second(rate.x),
            y: AngularVelocity::from_radians_per_second(rate.y),
            z: AngularVelocity::from_radians_per_second(rate.z),
            timestamp: now,
        };
        fire_and_forget(&mut self.publishers.gyro, report);
    }

    fn close_window(
        &mut self,
        timestamp_sample: Microseconds,
        window: IntegratedWindow,
        now: Timestamp,
    ) {
        self.vibration.update(&window.delta_angle);

        debug!(
            dt = window.dt,
            samples = window.samples,
            clip_count = self.clip.window_count(),
            "Integration window closed"
        );

        let report = GyroIntegratedReport {
            timestamp_sample: Timestamp::from_micros(timestamp_sample),
            device_id: self.device_id,
            error_count: self.error_count,
            delta_angle: window.delta_angle.into(),
            dt: window.dt,
            samples: window.samples,
            clip_count: self.clip.window_count(),
            timestamp: now,
        };
        fire_and_forget(&mut self.publishers.integrated, report);

        self.reset_integrator();
    }

    fn reset_integrator(&mut self) {
        self.integrator.reset();
        self.clip.reset_window();
    }

    fn publish_status(&mut self, now: Timestamp) {
        if !self.status.poll(now) {
            return;
        }

        let report = GyroStatusReport {
            device_id: self.device_id,
            error_count: self.error_count,
            full_scale_range: AngularVelocity::from_radians_per_second(self.range),
            rotation: self.calibration.rotation(),
            measure_rate_hz: self.update_rate,
            temperature: self.temperature,
            vibration_metric: self.vibration.vibration_metric(),
            coning_vibration: self.vibration.coning_vibration(),
            clipping: self.clip.per_axis(),
            timestamp: now,
        };
        fire_and_forget(&mut self.publishers.status, report);
    }
}

fn fire_and_forget<T: Clone + TracedMessage>(publisher: &mut Publisher<T>, msg: T) {
    let topic = msg.topic();
    if let Err(e) = publisher.publish(msg) {
        trace!(topic, err = %e, "Publish failed");
    }
}
