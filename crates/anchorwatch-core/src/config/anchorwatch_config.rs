//! Top-level Anchorwatch configuration with layered resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{
    BudgetConfig, CheckpointConfig, ConfidenceConfig, EffectivenessConfig, LoopConfig,
    MinimizationConfig, ObservabilityConfig, RepairConfig, SensorConfig,
};
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Environment variables (`ANCHORWATCH_*`)
/// 2. Config file (TOML)
/// 3. Compiled defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnchorwatchConfig {
    pub budget: BudgetConfig,
    pub minimization: MinimizationConfig,
    pub confidence: ConfidenceConfig,
    pub sensors: SensorConfig,
    pub repair: RepairConfig,
    pub effectiveness: EffectivenessConfig,
    pub checkpoint: CheckpointConfig,
    pub pressure_loop: LoopConfig,
    pub observability: ObservabilityConfig,
}

impl AnchorwatchConfig {
    /// Load from an optional TOML file, apply environment overrides, validate.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => {
                let content =
                    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
                        path: path.display().to_string(),
                    })?;
                toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                    path: path.display().to_string(),
                    message: e.to_string(),
                })?
            }
            None => Self::default(),
        };
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML string. Missing keys take their defaults.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }

    /// Apply `ANCHORWATCH_*` overrides using `lookup` to read variables.
    /// A value that does not parse for its field is an error naming the
    /// variable.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        fn parsed<T, F>(lookup: &F, key: &str) -> Result<Option<T>, ConfigError>
        where
            T: std::str::FromStr,
            T::Err: std::fmt::Display,
            F: Fn(&str) -> Option<String>,
        {
            let Some(raw) = lookup(key) else {
                return Ok(None);
            };
            raw.trim()
                .parse()
                .map(Some)
                .map_err(|e: T::Err| ConfigError::ParseError {
                    path: format!("${key}"),
                    message: format!("{raw:?}: {e}"),
                })
        }

        if let Some(v) = parsed(&lookup, "ANCHORWATCH_BUDGET_UNITS_PER_WINDOW")? {
            self.budget.units_per_window = v;
        }
        if let Some(v) = parsed(&lookup, "ANCHORWATCH_BUDGET_WINDOW_MS")? {
            self.budget.window_ms = v;
        }
        if let Some(v) = parsed(&lookup, "ANCHORWATCH_CONFIDENCE_FLOOR")? {
            self.confidence.floor = v;
        }
        if let Some(v) = parsed(&lookup, "ANCHORWATCH_REPAIR_EXECUTION_ENABLED")? {
            self.repair.execution_enabled = v;
        }
        if let Some(v) = lookup("ANCHORWATCH_REPAIR_SIGNING_KEY_HEX") {
            self.repair.signing_key_hex = Some(v);
        }
        if let Some(v) = lookup("ANCHORWATCH_CHECKPOINT_PATH") {
            self.checkpoint.path = Some(v);
        }
        if let Some(v) = parsed(&lookup, "ANCHORWATCH_LOOP_TICK_MS")? {
            self.pressure_loop.tick_ms = v;
        }
        if let Some(v) = parsed(&lookup, "ANCHORWATCH_LOOP_BATCH_SIZE")? {
            self.pressure_loop.batch_size = v;
        }
        if let Some(v) = lookup("ANCHORWATCH_LOG_LEVEL") {
            self.observability.log_level = v;
        }
        Ok(())
    }

    /// Validate the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn unit_interval(field: &str, value: f64) -> Result<(), ConfigError> {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ValidationFailed {
                    field: field.to_string(),
                    message: "must be between 0.0 and 1.0".to_string(),
                });
            }
            Ok(())
        }
        fn non_zero(field: &str, value: u64) -> Result<(), ConfigError> {
            if value == 0 {
                return Err(ConfigError::ValidationFailed {
                    field: field.to_string(),
                    message: "must be greater than 0".to_string(),
                });
            }
            Ok(())
        }

        non_zero("budget.units_per_window", self.budget.units_per_window)?;
        non_zero("budget.window_ms", self.budget.window_ms)?;
        non_zero("budget.units_per_anchor", self.budget.units_per_anchor)?;
        if self.budget.units_per_anchor > self.budget.units_per_window {
            return Err(ConfigError::ValidationFailed {
                field: "budget.units_per_anchor".to_string(),
                message: "must not exceed budget.units_per_window".to_string(),
            });
        }

        unit_interval("confidence.floor", self.confidence.floor)?;
        unit_interval("confidence.warning_threshold", self.confidence.warning_threshold)?;
        unit_interval("confidence.critical_threshold", self.confidence.critical_threshold)?;
        if self.confidence.warning_threshold > self.confidence.critical_threshold {
            return Err(ConfigError::ValidationFailed {
                field: "confidence.warning_threshold".to_string(),
                message: "must not exceed confidence.critical_threshold".to_string(),
            });
        }

        unit_interval("effectiveness.threshold", self.effectiveness.threshold)?;
        non_zero("effectiveness.window", self.effectiveness.window as u64)?;
        if self.effectiveness.min_samples > self.effectiveness.window {
            return Err(ConfigError::ValidationFailed {
                field: "effectiveness.min_samples".to_string(),
                message: "must not exceed effectiveness.window".to_string(),
            });
        }

        non_zero("repair.staged_ttl_cycles", self.repair.staged_ttl_cycles)?;
        if let Some(key) = &self.repair.signing_key_hex {
            if key.len() != 64 || !key.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(ConfigError::ValidationFailed {
                    field: "repair.signing_key_hex".to_string(),
                    message: "must be 64 hex characters".to_string(),
                });
            }
        }

        non_zero("pressure_loop.tick_ms", self.pressure_loop.tick_ms)?;
        non_zero("pressure_loop.batch_size", self.pressure_loop.batch_size as u64)?;
        non_zero(
            "pressure_loop.max_concurrency",
            self.pressure_loop.max_concurrency as u64,
        )?;
        if self.pressure_loop.collaborator_backoff_base_ms > self.pressure_loop.collaborator_backoff_max_ms {
            return Err(ConfigError::ValidationFailed {
                field: "pressure_loop.collaborator_backoff_base_ms".to_string(),
                message: "must not exceed collaborator_backoff_max_ms".to_string(),
            });
        }

        non_zero("observability.kpi_window", self.observability.kpi_window as u64)?;
        non_zero(
            "observability.event_channel_capacity",
            self.observability.event_channel_capacity as u64,
        )?;
        Ok(())
    }
}
