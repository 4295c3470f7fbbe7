use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::defaults;
use crate::models::ConsentTier;

/// Declared minimal field sets, one allow-list per consent tier.
///
/// Tiers are independent lists: a field allowed at `standard` is not
/// implicitly allowed at `extended`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MinimizationConfig {
    pub minimal: BTreeSet<String>,
    pub standard: BTreeSet<String>,
    pub extended: BTreeSet<String>,
}

impl MinimizationConfig {
    pub fn allow_list(&self, tier: ConsentTier) -> &BTreeSet<String> {
        match tier {
            ConsentTier::Minimal => &self.minimal,
            ConsentTier::Standard => &self.standard,
            ConsentTier::Extended => &self.extended,
        }
    }
}

fn to_set(fields: &[&str]) -> BTreeSet<String> {
    fields.iter().map(|f| f.to_string()).collect()
}

impl Default for MinimizationConfig {
    fn default() -> Self {
        Self {
            minimal: to_set(defaults::DEFAULT_MINIMAL_FIELDS),
            standard: to_set(defaults::DEFAULT_STANDARD_FIELDS),
            extended: to_set(defaults::DEFAULT_EXTENDED_FIELDS),
        }
    }
}
