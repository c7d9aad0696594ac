//! Scan orchestration for lychrel.
//!
//! # Architecture
//!
//! ```text
//! Orchestrator<S: ResultStore>
//! ├── SessionRequest (validated before anything runs)
//! ├── load Snapshot ──► window = [start, start + workers * span)
//! ├── ThreadPool ──► static ranges | dynamic chunks ──► partial BestMaps
//! ├── merge(loaded, partials) ──► ChangeSet (new + improved)
//! └── commit(changes, window.end) as one unit
//! ```
//!
//! A session either commits everything it found together with the advanced
//! checkpoint, or commits nothing. Since merging only ever lowers a number,
//! re-running a window that was already committed changes nothing.

mod partition;
mod request;

pub use request::{DEFAULT_CHUNK_SIZE, RequestError, SessionRequest};

use std::time::{Duration, Instant};

use rayon::ThreadPoolBuildError;
use thiserror::Error;

use lychrel_core::IterationCap;
use lychrel_store::ResultStore;
use lychrel_types::{IterationRecord, Number, PartitionMode, ScanWindow, merge};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Request(#[from] RequestError),
    #[error("failed to start worker pool")]
    WorkerPool(#[source] ThreadPoolBuildError),
    #[error("result store failed, session not committed: {0:#}")]
    Store(anyhow::Error),
}

/// Outcome of one committed session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionReport {
    pub window: ScanWindow,
    pub workers: usize,
    pub partition: PartitionMode,
    /// Iteration counts seen for the first time.
    pub new_records_found: usize,
    /// Known iteration counts that got a smaller number.
    pub improved_records: usize,
    /// Records held after the commit.
    pub total_records: usize,
    pub deepest: Option<IterationRecord>,
    pub elapsed: Duration,
}

/// Read-only summary of a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreStatus {
    pub checkpoint: Number,
    pub records: usize,
    pub sessions: usize,
    pub deepest: Option<IterationRecord>,
    /// RFC 3339 time of the most recent commit.
    pub last_session_at: Option<String>,
}

/// Runs scan sessions against a store. The only writer to that store.
pub struct Orchestrator<S> {
    store: S,
    cap: IterationCap,
}

impl<S: ResultStore> Orchestrator<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            cap: IterationCap::MAX,
        }
    }

    /// Use a smaller iteration cap. Records found under a lower cap stay valid,
    /// but numbers needing more steps are missed for good once the checkpoint
    /// moves past them.
    #[must_use]
    pub fn with_cap(mut self, cap: IterationCap) -> Self {
        self.cap = cap;
        self
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Scan one window and commit the results.
    pub fn run_session(&mut self, request: &SessionRequest) -> Result<SessionReport, SessionError> {
        let started = Instant::now();
        let pool = partition::build_pool(request.workers())?;

        let snapshot = self.store.load().map_err(SessionError::Store)?;
        let window = request.window(&snapshot.checkpoint);

        let span = tracing::info_span!("session", %window);
        let _guard = span.enter();
        tracing::info!(
            workers = request.workers(),
            partition = %request.partition(),
            known = snapshot.records.len(),
            "Session started"
        );

        let unit = match request.partition() {
            PartitionMode::Static => request.per_worker_span(),
            PartitionMode::Dynamic => request.chunk_size(),
        };
        let found = partition::scan_window(&pool, &window, request.partition(), unit, self.cap);

        let merged = merge(&snapshot.records, &found);
        let changes = merged.changes_since(&snapshot.records);

        self.store
            .commit(&changes.records(), &window.end())
            .map_err(SessionError::Store)?;

        let report = SessionReport {
            workers: request.workers(),
            partition: request.partition(),
            new_records_found: changes.new.len(),
            improved_records: changes.improved.len(),
            total_records: merged.len(),
            deepest: merged.deepest(),
            elapsed: started.elapsed(),
            window,
        };
        tracing::info!(
            new = report.new_records_found,
            improved = report.improved_records,
            elapsed_ms = report.elapsed.as_millis() as u64,
            "Session committed"
        );
        Ok(report)
    }

    /// All records, ascending by iteration count. Does not scan.
    pub fn list_records(&self) -> Result<Vec<IterationRecord>, SessionError> {
        self.store.list_records().map_err(SessionError::Store)
    }

    pub fn status(&self) -> Result<StoreStatus, SessionError> {
        let snapshot = self.store.load().map_err(SessionError::Store)?;
        let history = self
            .store
            .checkpoint_history()
            .map_err(SessionError::Store)?;
        Ok(StoreStatus {
            checkpoint: snapshot.checkpoint,
            records: snapshot.records.len(),
            sessions: history.len(),
            deepest: snapshot.records.deepest(),
            last_session_at: history.last().map(|entry| entry.recorded_at.clone()),
        })
    }
}
