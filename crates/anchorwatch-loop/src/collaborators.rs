use std::sync::Arc;

use anchorwatch_core::traits::{
    IAnchorSource, IAuthoritySource, IExecutionBackend, ISigner, ITelemetryCollector,
};

/// The external systems the loop talks to. Every call goes through these
/// traits so tests and the daemon can plug in their own implementations.
#[derive(Clone)]
pub struct Collaborators {
    pub anchors: Arc<dyn IAnchorSource>,
    pub collector: Arc<dyn ITelemetryCollector>,
    pub signer: Arc<dyn ISigner>,
    pub authority: Arc<dyn IAuthoritySource>,
    pub backend: Arc<dyn IExecutionBackend>,
}
