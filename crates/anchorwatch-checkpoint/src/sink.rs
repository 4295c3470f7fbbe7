//! Checkpoint sinks.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use anchorwatch_core::errors::CheckpointError;
use anchorwatch_core::models::Checkpoint;
use anchorwatch_core::traits::ICheckpointSink;

/// In-memory sink. Records can be handed back for inspection.
#[derive(Debug, Default, Clone)]
pub struct MemoryCheckpointSink {
    records: Vec<Checkpoint>,
}

impl MemoryCheckpointSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sink pre-populated with existing records, e.g. a restored audit copy.
    pub fn from_records(records: Vec<Checkpoint>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl ICheckpointSink for MemoryCheckpointSink {
    fn append(&mut self, checkpoint: &Checkpoint) -> Result<(), CheckpointError> {
        self.records.push(checkpoint.clone());
        Ok(())
    }

    fn read_all(&self) -> Result<Vec<Checkpoint>, CheckpointError> {
        Ok(self.records.clone())
    }
}

/// Append-only JSON Lines file, one checkpoint per line.
#[derive(Debug, Clone)]
pub struct JsonlCheckpointSink {
    path: PathBuf,
}

impl JsonlCheckpointSink {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, e: std::io::Error) -> CheckpointError {
        CheckpointError::Io {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        }
    }
}

impl ICheckpointSink for JsonlCheckpointSink {
    fn append(&mut self, checkpoint: &Checkpoint) -> Result<(), CheckpointError> {
        let line = serde_json::to_string(checkpoint).map_err(|e| CheckpointError::Serialization {
            reason: e.to_string(),
        })?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.io_error(e))?;
        writeln!(file, "{line}").map_err(|e| self.io_error(e))?;
        file.sync_data().map_err(|e| self.io_error(e))
    }

    fn read_all(&self) -> Result<Vec<Checkpoint>, CheckpointError> {
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.io_error(e)),
        };
        let mut records = Vec::new();
        for (idx, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| self.io_error(e))?;
            if line.trim().is_empty() {
                continue;
            }
            let record = serde_json::from_str(&line).map_err(|e| CheckpointError::CorruptRecord {
                line: idx + 1,
                reason: e.to_string(),
            })?;
            records.push(record);
        }
        Ok(records)
    }
}
