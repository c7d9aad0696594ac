//! Splitting a search into sessions must not change what it finds.

use proptest::prelude::*;

use lychrel_core::scan_range;
use lychrel_engine::Orchestrator;
use lychrel_store::{ResultStore, SqliteStore};
use lychrel_types::{Number, ScanWindow};

use crate::common::{dynamic_request, memory_orchestrator, request, test_cap};

#[test]
fn two_sessions_equal_one() {
    let mut split = memory_orchestrator();
    split.run_session(&request(None, 300, 1)).unwrap();
    split.run_session(&request(None, 250, 2)).unwrap();

    let mut whole = memory_orchestrator();
    whole.run_session(&request(None, 800, 1)).unwrap();

    assert_eq!(split.list_records().unwrap(), whole.list_records().unwrap());
    assert_eq!(
        split.status().unwrap().checkpoint,
        whole.status().unwrap().checkpoint
    );
    assert_eq!(split.status().unwrap().checkpoint, Number::from(801u32));
}

#[test]
fn many_small_sessions_match_direct_scan() {
    let mut orchestrator = memory_orchestrator();
    for _ in 0..10 {
        orchestrator
            .run_session(&dynamic_request(None, 25, 4, 3))
            .unwrap();
    }

    let expected = scan_range(&ScanWindow::new(1u32, 1_000), test_cap());
    assert_eq!(orchestrator.list_records().unwrap(), expected.records());
    assert_eq!(orchestrator.status().unwrap().sessions, 10);
}

#[test]
fn known_minimal_records_after_first_thousand() {
    let mut orchestrator = memory_orchestrator();
    orchestrator.run_session(&request(None, 1_000, 4)).unwrap();

    let records = orchestrator.list_records().unwrap();
    let expected = [1u32, 12, 23, 83, 95, 236, 107, 248, 267];
    for (iterations, number) in expected.into_iter().enumerate() {
        let record = records
            .iter()
            .find(|record| record.iterations as usize == iterations)
            .unwrap_or_else(|| panic!("missing record for {iterations} iterations"));
        assert_eq!(record.number, Number::from(number), "{iterations} iterations");
    }
}

#[test]
fn resume_after_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("results.sqlite");

    {
        let mut orchestrator =
            Orchestrator::new(SqliteStore::open(&path).unwrap()).with_cap(test_cap());
        orchestrator.run_session(&request(None, 200, 2)).unwrap();
    }

    let mut orchestrator = Orchestrator::new(SqliteStore::open(&path).unwrap()).with_cap(test_cap());
    let report = orchestrator.run_session(&request(None, 100, 1)).unwrap();
    assert_eq!(report.window, ScanWindow::new(401u32, 100));

    let store = orchestrator.into_store();
    let snapshot = store.load().unwrap();
    assert_eq!(snapshot.checkpoint, Number::from(501u32));
    assert_eq!(
        snapshot.records.records(),
        scan_range(&ScanWindow::new(1u32, 500), test_cap()).records()
    );
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn any_split_point_matches_one_session(k in 1i64..600, m in 1i64..600) {
        let mut split = memory_orchestrator();
        split.run_session(&request(None, k, 1)).unwrap();
        split.run_session(&request(None, m, 1)).unwrap();

        let mut whole = memory_orchestrator();
        whole.run_session(&request(None, k + m, 1)).unwrap();

        prop_assert_eq!(split.list_records().unwrap(), whole.list_records().unwrap());
        let checkpoint = split.status().unwrap().checkpoint;
        prop_assert_eq!(&checkpoint, &whole.status().unwrap().checkpoint);
        prop_assert_eq!(checkpoint, Number::from((k + m + 1) as u64));
    }
}
