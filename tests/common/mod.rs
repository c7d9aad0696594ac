//! Shared test utilities and fixtures
//!
//! Common infrastructure for integration tests.

#![allow(dead_code)]

use anyhow::{Result, bail};

use lychrel_core::IterationCap;
use lychrel_engine::{Orchestrator, SessionRequest};
use lychrel_store::{CheckpointEntry, ResultStore, Snapshot, SqliteStore};
use lychrel_types::{IterationRecord, Number, PartitionMode};

/// Cap small enough to keep scans over a few thousand numbers fast.
pub fn test_cap() -> IterationCap {
    IterationCap::new(120).expect("cap within maximum")
}

pub fn memory_orchestrator() -> Orchestrator<SqliteStore> {
    Orchestrator::new(SqliteStore::open_in_memory().expect("open in-memory store"))
        .with_cap(test_cap())
}

pub fn request(start: Option<u64>, span: i64, workers: i64) -> SessionRequest {
    SessionRequest::new(start.map(Into::into), span, workers).expect("valid request")
}

pub fn dynamic_request(start: Option<u64>, span: i64, workers: i64, chunk: i64) -> SessionRequest {
    request(start, span, workers)
        .partitioned(PartitionMode::Dynamic, chunk)
        .expect("valid chunk size")
}

/// Store whose commits fail until `healthy` is set. Reads pass through.
pub struct FailingStore {
    pub inner: SqliteStore,
    pub healthy: bool,
    pub attempts: usize,
}

impl FailingStore {
    pub fn new() -> Self {
        Self {
            inner: SqliteStore::open_in_memory().expect("open in-memory store"),
            healthy: false,
            attempts: 0,
        }
    }
}

impl ResultStore for FailingStore {
    fn load(&self) -> Result<Snapshot> {
        self.inner.load()
    }

    fn commit(&mut self, records: &[IterationRecord], checkpoint: &Number) -> Result<()> {
        self.attempts += 1;
        if !self.healthy {
            bail!("disk full");
        }
        self.inner.commit(records, checkpoint)
    }

    fn checkpoint_history(&self) -> Result<Vec<CheckpointEntry>> {
        self.inner.checkpoint_history()
    }
}
