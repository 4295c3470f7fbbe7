use anchorwatch_core::models::{AnchorId, EriBand};
use serde::Serialize;

/// What a caller may show for an ERI.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EriDisplay {
    Indeterminate,
    Scored { value: f64, band: EriBand },
}

/// A gated ERI. Fields are private and there is no public constructor, so a
/// numeric value can only come out of the confidence floor enforcer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayableEri {
    anchor_id: AnchorId,
    display: EriDisplay,
    confidence: f64,
    missing_inputs: Vec<String>,
}

impl DisplayableEri {
    pub(crate) fn new(
        anchor_id: AnchorId,
        display: EriDisplay,
        confidence: f64,
        missing_inputs: Vec<String>,
    ) -> Self {
        Self {
            anchor_id,
            display,
            confidence,
            missing_inputs,
        }
    }

    pub fn anchor_id(&self) -> &AnchorId {
        &self.anchor_id
    }

    pub fn display(&self) -> EriDisplay {
        self.display
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Inputs whose presence would raise confidence.
    pub fn missing_inputs(&self) -> &[String] {
        &self.missing_inputs
    }

    pub fn is_indeterminate(&self) -> bool {
        self.display == EriDisplay::Indeterminate
    }

    pub fn value(&self) -> Option<f64> {
        match self.display {
            EriDisplay::Scored { value, .. } => Some(value),
            EriDisplay::Indeterminate => None,
        }
    }

    pub fn band(&self) -> Option<EriBand> {
        match self.display {
            EriDisplay::Scored { band, .. } => Some(band),
            EriDisplay::Indeterminate => None,
        }
    }

    pub fn is_critical(&self) -> bool {
        self.band() == Some(EriBand::Critical)
    }
}
