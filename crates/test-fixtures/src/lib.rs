//! Test fixtures for Anchorwatch: JSON fixture loading, anchor builders and
//! in-memory collaborators shared by every crate's tests.

pub mod builders;
pub mod collaborators;

use serde::de::DeserializeOwned;
use std::path::PathBuf;

pub use builders::{anchor, fields, policy, unconsented};
pub use collaborators::{
    FailingSigner, RecordingBackend, ScriptedAuthority, ScriptedCollector, StaticAnchorSource,
};

/// Root directory of the bundled fixture data.
fn fixtures_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
}

/// Load and deserialize a JSON fixture file.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let path = fixtures_root().join(relative_path);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}
