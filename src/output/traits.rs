//! Snapshot sink trait and error types

use crate::model::Snapshot;
use thiserror::Error;

/// Errors that can occur while persisting a snapshot
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to write snapshot: {0}")]
    Write(String),
}

/// Result type for sink operations
pub type SinkResult<T> = Result<T, SinkError>;

/// What a sink did with a snapshot it accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistOutcome {
    /// The snapshot replaced the previous one
    Written,

    /// The snapshot was empty and the previous one was left in place
    KeptPrevious,
}

/// Destination for the snapshot of a completed pass
///
/// Called exactly once per completed pass with the full collection. A new
/// snapshot replaces the previous one; nothing is merged.
pub trait SnapshotSink {
    fn persist(&self, snapshot: &Snapshot) -> SinkResult<PersistOutcome>;
}

impl<T: SnapshotSink + ?Sized> SnapshotSink for &T {
    fn persist(&self, snapshot: &Snapshot) -> SinkResult<PersistOutcome> {
        (**self).persist(snapshot)
    }
}
