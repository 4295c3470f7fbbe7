//! anchorwatchd: runs the pressure loop against a file-backed inventory until
//! interrupted.

use std::path::PathBuf;
use std::sync::Arc;

use anchorwatch_core::AnchorwatchConfig;
use anchorwatch_loop::{Inventory, LoopEvent, PressureLoop};
use anchorwatch_observability::tracing_setup;
use anchorwatch_repair::KeyedHashSigner;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "anchorwatchd", version, about = "Anchorwatch verification daemon")]
struct Args {
    /// TOML configuration file. Compiled defaults apply when absent.
    #[arg(long, env = "ANCHORWATCH_CONFIG")]
    config: Option<PathBuf>,

    /// JSON inventory of anchors and their current telemetry.
    #[arg(long, env = "ANCHORWATCH_INVENTORY", default_value = "data/inventory.json")]
    inventory: PathBuf,

    /// Emit logs as JSON lines regardless of configuration.
    #[arg(long)]
    json_logs: bool,

    /// Stop after this many cycles instead of waiting for a signal.
    #[arg(long)]
    cycles: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = AnchorwatchConfig::load(args.config.as_deref())?;
    if args.json_logs {
        tracing_setup::init_tracing_json();
    } else {
        tracing_setup::init_from_config(&config.observability);
    }

    let inventory = Inventory::load(&args.inventory)?;
    tracing::info!(
        anchors = inventory.anchors.len(),
        inventory = %args.inventory.display(),
        execution_enabled = config.repair.execution_enabled,
        "anchorwatchd starting"
    );

    let signer = Arc::new(KeyedHashSigner::from_config(&config.repair)?);
    let pressure = PressureLoop::new(config, inventory.into_collaborators(signer))?;
    let mut events = pressure.subscribe();
    let handle = pressure.spawn();

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);
    let mut completed = 0u64;
    loop {
        tokio::select! {
            _ = &mut shutdown => {
                tracing::info!("shutdown signal received");
                break;
            }
            event = events.recv() => match event {
                Ok(LoopEvent::Cycle(report)) if report.is_completed() => {
                    completed += 1;
                    if args.cycles.is_some_and(|limit| completed >= limit) {
                        break;
                    }
                }
                Ok(LoopEvent::Stopped { .. }) => break,
                Ok(_) => {}
                Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "event subscriber lagged");
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            },
        }
    }

    let pressure = handle.shutdown().await?;
    let health = pressure.health();
    tracing::info!(
        cycles = pressure.cycle(),
        status = ?health.overall_status,
        proposals = pressure.proposals().len(),
        "anchorwatchd stopped"
    );
    Ok(())
}
