//! Worker count and partitioning never change committed results.

use proptest::prelude::*;

use lychrel_core::scan_range;
use lychrel_types::ScanWindow;

use crate::common::{dynamic_request, memory_orchestrator, request, test_cap};

#[test]
fn static_and_dynamic_agree() {
    let mut by_range = memory_orchestrator();
    by_range.run_session(&request(None, 150, 4)).unwrap();

    let mut by_chunk = memory_orchestrator();
    by_chunk
        .run_session(&dynamic_request(None, 150, 4, 11))
        .unwrap();

    assert_eq!(
        by_range.list_records().unwrap(),
        by_chunk.list_records().unwrap()
    );
    assert_eq!(
        by_range.status().unwrap().checkpoint,
        by_chunk.status().unwrap().checkpoint
    );
}

#[test]
fn repeated_runs_are_identical() {
    let runs: Vec<_> = (0..3)
        .map(|_| {
            let mut orchestrator = memory_orchestrator();
            orchestrator
                .run_session(&dynamic_request(Some(500), 100, 3, 1))
                .unwrap();
            orchestrator.list_records().unwrap()
        })
        .collect();
    assert_eq!(runs[0], runs[1]);
    assert_eq!(runs[1], runs[2]);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn any_split_matches_sequential_scan(
        start in 0u64..3_000,
        span in 1i64..120,
        workers in 1i64..5,
        chunk in 1i64..40,
        dynamic in any::<bool>(),
    ) {
        let session = if dynamic {
            dynamic_request(Some(start), span, workers, chunk)
        } else {
            request(Some(start), span, workers)
        };
        let mut orchestrator = memory_orchestrator();
        let report = orchestrator.run_session(&session).unwrap();

        let window = ScanWindow::new(start, (span * workers) as u64);
        prop_assert_eq!(&report.window, &window);
        prop_assert_eq!(
            orchestrator.list_records().unwrap(),
            scan_range(&window, test_cap()).records()
        );
    }
}
