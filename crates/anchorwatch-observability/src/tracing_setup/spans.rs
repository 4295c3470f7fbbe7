//! Span definitions for a whole cycle and for one anchor's evaluation.

/// Create a cycle span.
#[macro_export]
macro_rules! cycle_span {
    ($cycle:expr) => {
        tracing::info_span!("anchorwatch.cycle", cycle = $cycle)
    };
}

/// Create a per-anchor evaluation span.
#[macro_export]
macro_rules! anchor_span {
    ($anchor_id:expr, $cycle:expr) => {
        tracing::debug_span!("anchorwatch.anchor", anchor_id = %$anchor_id, cycle = $cycle)
    };
}

/// Create a repair processing span.
#[macro_export]
macro_rules! repair_span {
    ($repair_id:expr) => {
        tracing::debug_span!("anchorwatch.repair", repair_id = %$repair_id)
    };
}

/// Span names as constants for programmatic use.
pub mod names {
    pub const CYCLE: &str = "anchorwatch.cycle";
    pub const ANCHOR: &str = "anchorwatch.anchor";
    pub const REPAIR: &str = "anchorwatch.repair";
}
