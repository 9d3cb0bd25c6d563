use crate::error::GyroError;
use gyro_types::prelude::Rotation;
use na::{Matrix3, Vector3};

/// Board rotation, range scale and bias offset for one sensor.
///
/// Rotation is always applied to raw values, before scaling.
#[derive(Debug, Clone, PartialEq)]
pub struct Calibration {
    rotation: Rotation,
    dcm: Matrix3<f32>,
    scale: f32,
    offset: Vector3<f32>,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            rotation: Rotation::None,
            dcm: Matrix3::identity(),
            scale: 1.0,
            offset: Vector3::zeros(),
        }
    }
}

impl Calibration {
    pub fn new(rotation: Rotation, scale: f32) -> Result<Self, GyroError> {
        check_scale(scale)?;
        Ok(Self {
            rotation,
            dcm: rotation.dcm(),
            scale,
            offset: Vector3::zeros(),
        })
    }

    /// Unit scale and zero offset
    pub fn with_rotation(rotation: Rotation) -> Self {
        Self {
            rotation,
            dcm: rotation.dcm(),
            ..Default::default()
        }
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn offset(&self) -> Vector3<f32> {
        self.offset
    }

    pub fn set_scale(&mut self, scale: f32) -> Result<(), GyroError> {
        check_scale(scale)?;
        self.scale = scale;
        Ok(())
    }

    pub fn set_offset(&mut self, offset: Vector3<f32>) {
        self.offset = offset;
    }

    /// Raw sample in the board frame, still in sensor units
    pub fn rotate(&self, raw: Vector3<f32>) -> Vector3<f32> {
        self.rotation.rotate_axes(raw)
    }

    /// Calibrated angular rate of a single raw sample
    pub fn calibrate(&self, raw: Vector3<f32>) -> Vector3<f32> {
        self.rotate(raw) * self.scale - self.offset
    }

    /// Calibrates a sum of `samples` raw readings.
    ///
    /// The sum was accumulated without removing the offset, so the offset is
    /// scaled up to the number of readings before it is subtracted.
    pub fn calibrate_integral(&self, raw_sum: Vector3<f32>, samples: u32) -> Vector3<f32> {
        let delta_angle_uncalibrated = self.dcm * raw_sum * self.scale;
        delta_angle_uncalibrated - self.offset * samples as f32
    }
}

fn check_scale(scale: f32) -> Result<(), GyroError> {
    if scale.is_finite() && scale > 0.0 {
        Ok(())
    } else {
        Err(GyroError::InvalidScale(scale))
    }
}
