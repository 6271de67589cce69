//! Pass and snapshot statistics
//!
//! `PassStats` is filled in by the coordinator while a pass runs;
//! `SnapshotSummary` is computed from a persisted snapshot file.

use crate::model::Snapshot;
use std::time::Duration;

/// Counters collected during one crawl pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassStats {
    /// Listing pages fetched successfully, the final empty page included
    pub pages_fetched: u32,

    /// Listing pages given up on after failing
    pub pages_skipped: u32,

    /// Company entries found on listing pages
    pub organizations_seen: u32,

    /// Companies added to the snapshot
    pub organizations_kept: u32,

    /// Companies skipped because their profile is incomplete
    pub skipped_incomplete: u32,

    /// Companies skipped because they have no open posting or their job list failed
    pub skipped_no_postings: u32,

    /// Open postings added to the snapshot
    pub postings_kept: u32,

    /// Kept companies without a map token
    pub map_tokens_missing: u32,

    /// Listing page timeouts
    pub timeouts: u32,

    /// Non-timeout fetch failures, detail pages included
    pub fetch_errors: u32,

    /// Whether the sink wrote the snapshot
    pub persisted: bool,

    /// Whether the sink skipped an empty snapshot and kept the previous one
    pub kept_previous: bool,

    /// Wall time of the pass
    pub elapsed: Duration,
}

impl PassStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Share of seen companies that made it into the snapshot, as a percentage
    pub fn keep_rate(&self) -> f64 {
        if self.organizations_seen == 0 {
            return 0.0;
        }
        (self.organizations_kept as f64 / self.organizations_seen as f64) * 100.0
    }

    /// Short description of what happened to the snapshot
    pub fn snapshot_status(&self) -> &'static str {
        if self.persisted {
            "persisted"
        } else if self.kept_previous {
            "empty, kept previous snapshot"
        } else {
            "NOT persisted"
        }
    }
}

/// Summary of a persisted snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotSummary {
    pub organizations: usize,
    pub postings: usize,
    pub hiring: usize,
    pub with_map: usize,
    pub with_known_type: usize,
}

impl SnapshotSummary {
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        let mut summary = Self {
            organizations: snapshot.len(),
            postings: snapshot.posting_count(),
            ..Self::default()
        };

        for org in snapshot {
            if org.is_hiring {
                summary.hiring += 1;
            }
            if !org.map_token.is_empty() {
                summary.with_map += 1;
            }
            summary.with_known_type += org
                .postings
                .iter()
                .filter(|p| p.employment_type.is_known())
                .count();
        }

        summary
    }
}

/// Prints pass statistics to stdout in a formatted manner
pub fn print_statistics(stats: &PassStats) {
    println!("=== Crawl Pass Statistics ===\n");

    println!("Listing Pages:");
    println!("  Fetched: {}", stats.pages_fetched);
    println!("  Skipped: {}", stats.pages_skipped);
    println!("  Timeouts: {}", stats.timeouts);
    println!("  Fetch errors: {}", stats.fetch_errors);
    println!();

    println!("Companies:");
    println!("  Seen: {}", stats.organizations_seen);
    println!("  Kept: {} ({:.1}%)", stats.organizations_kept, stats.keep_rate());
    println!("  Incomplete profile: {}", stats.skipped_incomplete);
    println!("  No open postings: {}", stats.skipped_no_postings);
    println!("  Without map: {}", stats.map_tokens_missing);
    println!();

    println!("Postings kept: {}", stats.postings_kept);
    println!("Snapshot: {}", stats.snapshot_status());
    println!("Elapsed: {:.1}s", stats.elapsed.as_secs_f64());
}

/// Prints a snapshot summary to stdout
pub fn print_snapshot_summary(summary: &SnapshotSummary) {
    println!("=== Snapshot Statistics ===\n");
    println!("  Companies: {}", summary.organizations);
    println!("  Hiring: {}", summary.hiring);
    println!("  With map: {}", summary.with_map);
    println!("  Postings: {}", summary.postings);
    println!("  Postings with known type: {}", summary.with_known_type);
}
