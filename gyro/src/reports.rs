//! Records published by the pipeline, one topic each.

use crate::{
    channel::TracedMessage,
    units::{AngularVelocity, Frequency, Temperature, Timestamp},
};
use gyro_types::prelude::*;
use gyro_types::sample::Burst;
use serde::Serialize;

/// Calibrated angular rate, once per ingestion
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GyroReport {
    pub timestamp_sample: Timestamp,
    pub device_id: DeviceId,
    pub temperature: Temperature,
    pub x: AngularVelocity,
    pub y: AngularVelocity,
    pub z: AngularVelocity,
    pub timestamp: Timestamp,
}

impl TracedMessage for GyroReport {
    fn topic(&self) -> &'static str {
        "gyro"
    }
}

/// Delta angle over one closed integration window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GyroIntegratedReport {
    pub timestamp_sample: Timestamp,
    pub device_id: DeviceId,
    pub error_count: u64,
    /// Radians
    pub delta_angle: [f32; 3],
    /// Microseconds
    pub dt: u32,
    pub samples: u32,
    pub clip_count: u32,
    pub timestamp: Timestamp,
}

impl TracedMessage for GyroIntegratedReport {
    fn topic(&self) -> &'static str {
        "gyro_integrated"
    }
}

/// A FIFO burst exactly as it was ingested
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GyroFifoReport {
    pub device_id: DeviceId,
    pub timestamp_sample: Timestamp,
    pub dt: f32,
    pub scale: f32,
    pub samples: u8,
    pub x: Burst,
    pub y: Burst,
    pub z: Burst,
    pub timestamp: Timestamp,
}

impl TracedMessage for GyroFifoReport {
    fn topic(&self) -> &'static str {
        "gyro_fifo"
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GyroStatusReport {
    pub device_id: DeviceId,
    pub error_count: u64,
    pub full_scale_range: AngularVelocity,
    pub rotation: Rotation,
    pub measure_rate_hz: Frequency,
    pub temperature: Temperature,
    pub vibration_metric: f32,
    pub coning_vibration: f32,
    /// Lifetime clip count per axis
    pub clipping: [u64; 3],
    pub timestamp: Timestamp,
}

impl TracedMessage for GyroStatusReport {
    fn topic(&self) -> &'static str {
        "gyro_status"
    }
}
