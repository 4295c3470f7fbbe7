//! Sensor registry. Enforces the auto-staging rule at registration time.

use anchorwatch_core::config::SensorConfig;
use anchorwatch_core::errors::SensorError;
use anchorwatch_core::models::{Finding, SensorCategory};
use anchorwatch_core::traits::{ISensor, SensorInput};

use crate::{
    ConfigDriftSensor, ExposurePreconditionSensor, PermissionDriftSensor, ThreeWayMatchSensor,
};

#[derive(Default)]
pub struct SensorRegistry {
    sensors: Vec<Box<dyn ISensor>>,
}

impl std::fmt::Debug for SensorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SensorRegistry")
            .field("sensors", &self.ids())
            .finish()
    }
}

impl SensorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in sensor not listed in `config.disabled`.
    pub fn with_builtins(config: &SensorConfig) -> Result<Self, SensorError> {
        let builtins: Vec<Box<dyn ISensor>> = vec![
            Box::new(PermissionDriftSensor),
            Box::new(ConfigDriftSensor),
            Box::new(ThreeWayMatchSensor),
            Box::new(ExposurePreconditionSensor),
        ];
        let mut registry = Self::new();
        for sensor in builtins {
            if config.disabled.contains(sensor.id()) {
                tracing::info!(sensor = sensor.id(), "sensor disabled by configuration");
                continue;
            }
            registry.register(sensor)?;
        }
        Ok(registry)
    }

    /// Add a sensor. Non-drift sensors that declare auto-staging are refused.
    pub fn register(&mut self, sensor: Box<dyn ISensor>) -> Result<(), SensorError> {
        if sensor.may_auto_stage() && sensor.category() != SensorCategory::Drift {
            tracing::warn!(
                sensor = sensor.id(),
                category = %sensor.category(),
                "refusing sensor that declares auto-staging outside drift detection"
            );
            return Err(SensorError::AutoStageNotPermitted {
                sensor: sensor.id().to_string(),
                category: sensor.category().to_string(),
            });
        }
        if self.sensors.iter().any(|s| s.id() == sensor.id()) {
            return Err(SensorError::DuplicateSensor(sensor.id().to_string()));
        }
        self.sensors.push(sensor);
        Ok(())
    }

    /// Run every sensor against one anchor, in registration order.
    pub fn evaluate_all(&self, input: &SensorInput<'_>) -> Vec<Finding> {
        self.sensors.iter().map(|s| s.evaluate(input)).collect()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.sensors.iter().map(|s| s.id()).collect()
    }

    pub fn len(&self) -> usize {
        self.sensors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sensors.is_empty()
    }
}
