use anchorwatch_core::{AnchorwatchError, AnchorwatchResult};
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

use crate::pressure_loop::PressureLoop;
use crate::report::LoopEvent;

/// Control handle for a spawned [`PressureLoop`].
///
/// Dropping the handle stops the loop after its in-flight cycle.
#[derive(Debug)]
pub struct LoopHandle {
    pub(crate) stop: watch::Sender<bool>,
    pub(crate) events: broadcast::Sender<LoopEvent>,
    pub(crate) join: JoinHandle<PressureLoop>,
}

impl LoopHandle {
    /// Request a cooperative stop. Interrupts the inter-cycle sleep; a cycle
    /// already running completes and is checkpointed first.
    pub fn stop(&self) {
        self.stop.send_replace(true);
    }

    /// Subscribe to cycle reports and integrity alerts.
    pub fn events(&self) -> broadcast::Receiver<LoopEvent> {
        self.events.subscribe()
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Wait for the loop task to end and take back the loop state.
    pub async fn join(self) -> AnchorwatchResult<PressureLoop> {
        self.join.await.map_err(|e| {
            tracing::error!(error = %e, "pressure loop task ended abnormally");
            AnchorwatchError::Cancelled
        })
    }

    /// [`LoopHandle::stop`] followed by [`LoopHandle::join`].
    pub async fn shutdown(self) -> AnchorwatchResult<PressureLoop> {
        self.stop();
        self.join().await
    }
}
