use super::error_code::{self, AnchorwatchErrorCode};

/// Sensor registry errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SensorError {
    #[error("sensor {sensor} ({category}) may not auto-stage repairs")]
    AutoStageNotPermitted { sensor: String, category: String },

    #[error("sensor already registered: {0}")]
    DuplicateSensor(String),
}

impl AnchorwatchErrorCode for SensorError {
    fn error_code(&self) -> &'static str {
        error_code::SENSOR_ERROR
    }
}
