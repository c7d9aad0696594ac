//! Durable storage for scan results.
//!
//! A store holds two things:
//! - the best-known record per iteration count (at most one current row per key)
//! - an append-only checkpoint log whose current value is its maximum
//!
//! The orchestrator is the only writer. It reads a [`Snapshot`] at session
//! start and hands everything the session produced to [`ResultStore::commit`]
//! in one call, which applies all of it or none of it.
//!
//! # Architecture
//!
//! ```text
//! ResultStore (trait)
//! └── SqliteStore (rusqlite, WAL, one transaction per commit)
//! ```

mod secure_fs;
mod sqlite;

pub use sqlite::SqliteStore;

use anyhow::Result;

use lychrel_types::{BestMap, IterationRecord, Number};

/// Checkpoint used when nothing has been scanned yet.
pub const INITIAL_CHECKPOINT: u32 = 1;

/// Everything a session needs from the store before scanning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub records: BestMap,
    /// Next unscanned number.
    pub checkpoint: Number,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            records: BestMap::new(),
            checkpoint: Number::from(INITIAL_CHECKPOINT),
        }
    }
}

/// One row of the checkpoint log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckpointEntry {
    pub last_number: Number,
    /// RFC 3339 UTC timestamp.
    pub recorded_at: String,
}

/// Durable record/checkpoint storage.
pub trait ResultStore {
    /// Current records and checkpoint.
    fn load(&self) -> Result<Snapshot>;

    /// Persist `records` and append `checkpoint` atomically.
    ///
    /// A record only replaces a stored one with a smaller number.
    fn commit(&mut self, records: &[IterationRecord], checkpoint: &Number) -> Result<()>;

    /// Records ascending by iteration count.
    fn list_records(&self) -> Result<Vec<IterationRecord>> {
        Ok(self.load()?.records.records())
    }

    /// Checkpoint log, oldest first.
    fn checkpoint_history(&self) -> Result<Vec<CheckpointEntry>>;
}
