//! Validated session parameters.
//!
//! Everything a caller can get wrong is rejected here, before the store is
//! opened for reading or a worker is started.

use std::num::NonZeroUsize;

use num_bigint::BigInt;
use thiserror::Error;

use lychrel_types::{Number, PartitionMode, ScanWindow};

/// Work-unit size for dynamic partitioning when none is given.
pub const DEFAULT_CHUNK_SIZE: u64 = 256;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("worker count must be positive (got {0})")]
    NonPositiveWorkers(i64),
    #[error("per-worker span must be positive (got {0})")]
    NonPositiveSpan(i64),
    #[error("chunk size must be positive (got {0})")]
    NonPositiveChunkSize(i64),
    #[error("start must not be negative (got {0})")]
    NegativeStart(BigInt),
    #[error("a window of {workers} workers x {span} numbers does not fit in 64 bits")]
    WindowTooLarge { workers: usize, span: u64 },
}

/// Parameters for one scan session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRequest {
    start: Option<Number>,
    per_worker_span: u64,
    workers: NonZeroUsize,
    partition: PartitionMode,
    chunk_size: u64,
}

impl SessionRequest {
    /// Validate the core parameters. Partitioning defaults to static.
    ///
    /// `explicit_start` of `None` means "resume from the stored checkpoint".
    pub fn new(
        explicit_start: Option<BigInt>,
        per_worker_span: i64,
        worker_count: i64,
    ) -> Result<Self, RequestError> {
        let workers = usize::try_from(worker_count)
            .ok()
            .and_then(NonZeroUsize::new)
            .ok_or(RequestError::NonPositiveWorkers(worker_count))?;
        let per_worker_span = u64::try_from(per_worker_span)
            .ok()
            .filter(|&span| span > 0)
            .ok_or(RequestError::NonPositiveSpan(per_worker_span))?;
        let start = explicit_start
            .map(|start| start.to_biguint().ok_or(RequestError::NegativeStart(start)))
            .transpose()?;

        if per_worker_span.checked_mul(workers.get() as u64).is_none() {
            return Err(RequestError::WindowTooLarge {
                workers: workers.get(),
                span: per_worker_span,
            });
        }

        Ok(Self {
            start,
            per_worker_span,
            workers,
            partition: PartitionMode::Static,
            chunk_size: DEFAULT_CHUNK_SIZE,
        })
    }

    /// Choose the partitioning strategy. `chunk_size` only matters for dynamic mode
    /// but is validated either way.
    pub fn partitioned(mut self, mode: PartitionMode, chunk_size: i64) -> Result<Self, RequestError> {
        self.chunk_size = u64::try_from(chunk_size)
            .ok()
            .filter(|&size| size > 0)
            .ok_or(RequestError::NonPositiveChunkSize(chunk_size))?;
        self.partition = mode;
        Ok(self)
    }

    #[must_use]
    pub const fn per_worker_span(&self) -> u64 {
        self.per_worker_span
    }

    #[must_use]
    pub const fn workers(&self) -> usize {
        self.workers.get()
    }

    #[must_use]
    pub const fn partition(&self) -> PartitionMode {
        self.partition
    }

    #[must_use]
    pub const fn chunk_size(&self) -> u64 {
        self.chunk_size
    }

    /// Numbers scanned per session: `workers * per_worker_span`.
    #[must_use]
    pub const fn window_len(&self) -> u64 {
        // Overflow is ruled out in `new`.
        self.per_worker_span * self.workers.get() as u64
    }

    /// The session window, starting at the explicit start or else `checkpoint`.
    #[must_use]
    pub fn window(&self, checkpoint: &Number) -> ScanWindow {
        let start = self.start.as_ref().unwrap_or(checkpoint).clone();
        ScanWindow::new(start, self.window_len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_request() {
        let request = SessionRequest::new(None, 100, 4).unwrap();
        assert_eq!(request.workers(), 4);
        assert_eq!(request.per_worker_span(), 100);
        assert_eq!(request.window_len(), 400);
        assert_eq!(request.partition(), PartitionMode::Static);
        assert_eq!(request.chunk_size(), DEFAULT_CHUNK_SIZE);
    }

    #[test]
    fn window_resumes_from_checkpoint() {
        let request = SessionRequest::new(None, 10, 2).unwrap();
        let window = request.window(&Number::from(51u32));
        assert_eq!(window, ScanWindow::new(51u32, 20));
    }

    #[test]
    fn explicit_start_overrides_checkpoint() {
        let request = SessionRequest::new(Some(BigInt::from(7)), 10, 1).unwrap();
        let window = request.window(&Number::from(1_000u32));
        assert_eq!(window, ScanWindow::new(7u32, 10));
    }

    #[test]
    fn zero_start_allowed() {
        let request = SessionRequest::new(Some(BigInt::from(0)), 1, 1).unwrap();
        let window = request.window(&Number::from(50u32));
        assert_eq!(window, ScanWindow::new(0u32, 1));
    }

    #[test]
    fn rejects_non_positive_workers() {
        assert_eq!(
            SessionRequest::new(None, 10, 0),
            Err(RequestError::NonPositiveWorkers(0))
        );
        assert_eq!(
            SessionRequest::new(None, 10, -3),
            Err(RequestError::NonPositiveWorkers(-3))
        );
    }

    #[test]
    fn rejects_non_positive_span() {
        assert_eq!(
            SessionRequest::new(None, 0, 1),
            Err(RequestError::NonPositiveSpan(0))
        );
        assert_eq!(
            SessionRequest::new(None, -1, 1),
            Err(RequestError::NonPositiveSpan(-1))
        );
    }

    #[test]
    fn rejects_negative_start() {
        assert_eq!(
            SessionRequest::new(Some(BigInt::from(-5)), 10, 1),
            Err(RequestError::NegativeStart(BigInt::from(-5)))
        );
    }

    #[test]
    fn rejects_overflowing_window() {
        assert!(matches!(
            SessionRequest::new(None, i64::MAX, 4),
            Err(RequestError::WindowTooLarge { workers: 4, .. })
        ));
    }

    #[test]
    fn partition_and_chunk_size() {
        let request = SessionRequest::new(None, 10, 1)
            .unwrap()
            .partitioned(PartitionMode::Dynamic, 16)
            .unwrap();
        assert_eq!(request.partition(), PartitionMode::Dynamic);
        assert_eq!(request.chunk_size(), 16);

        assert_eq!(
            SessionRequest::new(None, 10, 1)
                .unwrap()
                .partitioned(PartitionMode::Dynamic, 0),
            Err(RequestError::NonPositiveChunkSize(0))
        );
    }
}
