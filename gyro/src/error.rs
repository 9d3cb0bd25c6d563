use thiserror::Error;

/// Rejected reconfiguration. Ingestion itself never fails.
#[derive(Debug, Copy, Clone, PartialEq, Error)]
pub enum GyroError {
    #[error("Update rate must be non-zero")]
    ZeroUpdateRate,
    #[error("Scale must be finite and positive, got {0}")]
    InvalidScale(f32),
}
