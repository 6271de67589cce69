//! Output module for persisting snapshots and reporting on passes
//!
//! This module handles:
//! - The snapshot sink contract and its JSON file implementation
//! - Counters collected during a pass
//! - Summaries of persisted snapshots

mod json;
pub mod stats;
mod traits;

pub use json::{load_snapshot, JsonFileSink};
pub use stats::{print_snapshot_summary, print_statistics, PassStats, SnapshotSummary};
pub use traits::{PersistOutcome, SinkError, SinkResult, SnapshotSink};
