//! Configuration system for Anchorwatch.
//! TOML-based, layered: env > config file > compiled defaults.

pub mod anchorwatch_config;
pub mod budget_config;
pub mod checkpoint_config;
pub mod confidence_config;
pub mod defaults;
pub mod effectiveness_config;
pub mod loop_config;
pub mod minimization_config;
pub mod observability_config;
pub mod repair_config;
pub mod sensor_config;

pub use anchorwatch_config::AnchorwatchConfig;
pub use budget_config::BudgetConfig;
pub use checkpoint_config::CheckpointConfig;
pub use confidence_config::ConfidenceConfig;
pub use effectiveness_config::EffectivenessConfig;
pub use loop_config::LoopConfig;
pub use minimization_config::MinimizationConfig;
pub use observability_config::ObservabilityConfig;
pub use repair_config::RepairConfig;
pub use sensor_config::SensorConfig;
