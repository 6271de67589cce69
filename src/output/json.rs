//! JSON file snapshot sink
//!
//! Writes the snapshot as the JSON array the landing page loads. The file is
//! written to a temporary sibling first and renamed into place, so readers
//! never see a half-written snapshot.

use crate::config::OutputConfig;
use crate::model::Snapshot;
use crate::output::traits::{PersistOutcome, SinkError, SinkResult, SnapshotSink};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Sink that replaces a JSON file with each new snapshot
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    path: PathBuf,
    write_empty: bool,
}

impl JsonFileSink {
    /// Creates a sink writing to `path`
    ///
    /// Empty snapshots are skipped unless `write_empty` is set, so a pass
    /// that found nothing leaves the last good file in place.
    pub fn new(path: impl Into<PathBuf>, write_empty: bool) -> Self {
        Self {
            path: path.into(),
            write_empty,
        }
    }

    pub fn from_config(config: &OutputConfig) -> Self {
        Self::new(&config.snapshot_path, config.write_empty)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> SinkResult<PathBuf> {
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| {
                SinkError::Write(format!("'{}' is not a file path", self.path.display()))
            })?
            .to_string_lossy();
        Ok(self.path.with_file_name(format!(".{}.tmp", file_name)))
    }
}

impl SnapshotSink for JsonFileSink {
    fn persist(&self, snapshot: &Snapshot) -> SinkResult<PersistOutcome> {
        if snapshot.is_empty() && !self.write_empty {
            tracing::info!(
                "Snapshot is empty, keeping existing {}",
                self.path.display()
            );
            return Ok(PersistOutcome::KeptPrevious);
        }

        let json = serde_json::to_vec(snapshot)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let temp_path = self.temp_path()?;
        if let Err(e) = write_and_rename(&temp_path, &self.path, &json) {
            if let Err(cleanup) = fs::remove_file(&temp_path) {
                tracing::debug!(
                    "Could not remove {}: {}",
                    temp_path.display(),
                    cleanup
                );
            }
            return Err(e.into());
        }

        tracing::info!(
            "Wrote {} companies ({} bytes) to {}",
            snapshot.len(),
            json.len(),
            self.path.display()
        );

        Ok(PersistOutcome::Written)
    }
}

/// Writes `contents` to `temp_path`, syncs it and renames it over `target`
fn write_and_rename(temp_path: &Path, target: &Path, contents: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(temp_path)?;
    file.write_all(contents)?;
    file.sync_all()?;
    drop(file);
    fs::rename(temp_path, target)
}

/// Reads a snapshot file written by [`JsonFileSink`]
pub fn load_snapshot(path: &Path) -> SinkResult<Snapshot> {
    let content = fs::read(path)?;
    Ok(serde_json::from_slice(&content)?)
}
