//! Tracing setup: subscriber initialization, span macros, structured events.

pub mod events;
pub mod spans;

use std::sync::Once;

use anchorwatch_core::config::ObservabilityConfig;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Environment variable holding the filter directives.
pub const LOG_ENV: &str = "ANCHORWATCH_LOG";

/// Filter used when `ANCHORWATCH_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "anchorwatch=info";

/// Initialize human-readable logging.
///
/// Reads `ANCHORWATCH_LOG` for per-crate levels, e.g.
/// `ANCHORWATCH_LOG=anchorwatch_loop=debug,anchorwatch_repair=info`.
/// Idempotent; later calls are no-ops.
pub fn init_tracing() {
    init(DEFAULT_FILTER, false);
}

/// Initialize JSON-lines logging with the same filter rules as [`init_tracing`].
pub fn init_tracing_json() {
    init(DEFAULT_FILTER, true);
}

/// Initialize from the `[observability]` config section. `ANCHORWATCH_LOG`
/// still wins over `log_level`.
pub fn init_from_config(config: &ObservabilityConfig) {
    let default = format!("anchorwatch={}", config.log_level);
    init(&default, config.json_logs);
}

fn init(default_filter: &str, json: bool) {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_filter));
        let registry = tracing_subscriber::registry().with(filter);
        // A subscriber installed by an embedding process takes precedence.
        let _ = if json {
            registry
                .with(fmt::layer().json().with_target(true).with_thread_ids(true))
                .try_init()
        } else {
            registry
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_thread_ids(true)
                        .with_file(true)
                        .with_line_number(true),
                )
                .try_init()
        };
    });
}
