//! Splitting a session window across the worker pool.
//!
//! Both strategies end in the same reduction (minimum-by-key), so for a given
//! window they produce the same map no matter how work was split or which
//! worker finished first.

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use lychrel_core::{IterationCap, check, scan_range};
use lychrel_types::{BestMap, CheckOutcome, PartitionMode, ScanWindow};

use crate::SessionError;

/// Dedicated pool of `workers` OS threads.
pub(crate) fn build_pool(workers: usize) -> Result<ThreadPool, SessionError> {
    ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|index| format!("lychrel-worker-{index}"))
        .build()
        .map_err(SessionError::WorkerPool)
}

/// Scan `window` on `pool` with the chosen strategy.
pub(crate) fn scan_window(
    pool: &ThreadPool,
    window: &ScanWindow,
    mode: PartitionMode,
    unit: u64,
    cap: IterationCap,
) -> BestMap {
    match mode {
        PartitionMode::Static => scan_static(pool, window, unit, cap),
        PartitionMode::Dynamic => scan_dynamic(pool, window, unit, cap),
    }
}

/// One contiguous sub-range of `span` numbers per worker, each through the
/// range scanner.
fn scan_static(pool: &ThreadPool, window: &ScanWindow, span: u64, cap: IterationCap) -> BestMap {
    let ranges: Vec<ScanWindow> = window.chunks(span).collect();
    pool.install(|| {
        ranges
            .par_iter()
            .map(|range| {
                let local = scan_range(range, cap);
                tracing::debug!(%range, found = local.len(), "Range scanned");
                local
            })
            .reduce(BestMap::new, absorb)
    })
}

/// The window as a stream of `chunk`-sized work units. Each number's outcome
/// goes straight into the worker's running map.
fn scan_dynamic(pool: &ThreadPool, window: &ScanWindow, chunk: u64, cap: IterationCap) -> BestMap {
    let chunks = window.chunk_count(chunk);
    pool.install(|| {
        (0..chunks)
            .into_par_iter()
            .fold(BestMap::new, |mut best, index| {
                for n in window.chunk(index, chunk).numbers() {
                    if let CheckOutcome::Found(iterations) = check(&n, cap) {
                        best.observe(iterations, n);
                    }
                }
                best
            })
            .reduce(BestMap::new, absorb)
    })
}

fn absorb(mut acc: BestMap, part: BestMap) -> BestMap {
    acc.absorb(part);
    acc
}
