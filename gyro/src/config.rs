use crate::{calibration::Calibration, error::GyroError, units::Frequency};
use gyro_types::prelude::{DeviceId, Rotation};
use serde::Deserialize;
use std::{fs, io, path::Path};
use thiserror::Error;

#[derive(Clone, PartialEq, Debug, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct GyroConfig {
    pub device_id: DeviceId,
    pub rotation: Rotation,
    /// Raw sensor units to rad/s
    pub scale: f32,
    /// Full-scale range, degrees per second
    pub range_dps: f32,
    pub update_rate_hz: u16,
    /// Bias in rad/s, board frame
    pub offset: [f32; 3],
    /// Degrees Celsius
    pub temperature: f32,
    /// Subscriber inbox capacity, unbounded when absent
    pub queue_depth: Option<usize>,
}

impl Default for GyroConfig {
    fn default() -> Self {
        Self::nominal()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file. {0}")]
    Io(#[from] io::Error),
    #[error("Failed to parse config file. {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid config. {0}")]
    Invalid(#[from] GyroError),
}

impl GyroConfig {
    /// Unrotated sensor reporting rad/s directly at 1 kHz
    pub fn nominal() -> Self {
        Self {
            device_id: DeviceId::default(),
            rotation: Rotation::None,
            scale: 1.0,
            range_dps: 2000.0,
            update_rate_hz: 1000,
            offset: [0.0; 3],
            temperature: 0.0,
            queue_depth: None,
        }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_str_checked(&content)
    }

    pub fn from_str_checked(s: &str) -> Result<Self, ConfigError> {
        let cfg: GyroConfig = toml::from_str(s)?;
        cfg.calibration()?;
        cfg.update_rate()
            .period_micros()
            .ok_or(GyroError::ZeroUpdateRate)?;
        Ok(cfg)
    }

    pub fn calibration(&self) -> Result<Calibration, GyroError> {
        let mut calibration = Calibration::new(self.rotation, self.scale)?;
        calibration.set_offset(self.offset.into());
        Ok(calibration)
    }

    pub fn update_rate(&self) -> Frequency {
        Frequency::from_hertz(self.update_rate_hz)
    }

    /// Full-scale range in rad/s
    pub fn range(&self) -> f32 {
        self.range_dps.to_radians()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn empty_is_nominal() {
        assert_eq!(GyroConfig::from_str_checked("").unwrap(), GyroConfig::nominal());
    }

    #[test]
    fn parse_full() {
        let cfg = GyroConfig::from_str_checked(indoc! {r#"
            device-id = 2516490
            rotation = "roll180-yaw90"
            scale = 0.0010642
            range-dps = 2000.0
            update-rate-hz = 8000
            offset = [0.001, -0.002, 0.0]
            temperature = 41.5
            queue-depth = 16
        "#})
        .unwrap();

        assert_eq!(cfg.device_id, DeviceId::from_raw(2_516_490));
        assert_eq!(cfg.rotation, Rotation::Roll180Yaw90);
        assert_eq!(cfg.update_rate(), Frequency::from_hertz(8000));
        assert_eq!(cfg.queue_depth, Some(16));
        let cal = cfg.calibration().unwrap();
        assert_eq!(cal.offset().y, -0.002);
    }

    #[test]
    fn rejects_invalid_values() {
        let err = GyroConfig::from_str_checked("scale = 0.0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(GyroError::InvalidScale(_))));

        let err = GyroConfig::from_str_checked("update-rate-hz = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(GyroError::ZeroUpdateRate)));

        let err = GyroConfig::from_str_checked(r#"rotation = "yaw45""#).unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }
}
