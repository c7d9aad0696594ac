//! Commits are all-or-nothing, and every stored record checks out.

use lychrel_core::{check, is_palindrome, walk};
use lychrel_engine::{Orchestrator, SessionError, SessionRequest};
use lychrel_types::{CheckOutcome, Number, ScanWindow};

use crate::common::{FailingStore, memory_orchestrator, request, test_cap};

#[test]
fn failed_commit_leaves_store_untouched() {
    let mut orchestrator = Orchestrator::new(FailingStore::new()).with_cap(test_cap());

    let err = orchestrator
        .run_session(&request(None, 100, 2))
        .unwrap_err();
    assert!(matches!(err, SessionError::Store(_)));
    assert!(err.to_string().contains("disk full"));

    let status = orchestrator.status().unwrap();
    assert_eq!(status.checkpoint, Number::from(1u32));
    assert_eq!(status.records, 0);
    assert_eq!(status.sessions, 0);
}

#[test]
fn retry_after_failure_rescans_same_window() {
    let mut orchestrator = Orchestrator::new(FailingStore::new()).with_cap(test_cap());
    let session = request(None, 100, 2);
    assert!(orchestrator.run_session(&session).is_err());

    let mut store = orchestrator.into_store();
    store.healthy = true;
    let mut orchestrator = Orchestrator::new(store).with_cap(test_cap());
    let report = orchestrator.run_session(&session).unwrap();

    assert_eq!(report.window, ScanWindow::new(1u32, 200));
    assert_eq!(orchestrator.store().attempts, 2);
    assert_eq!(orchestrator.status().unwrap().checkpoint, Number::from(201u32));
}

#[test]
fn invalid_request_never_reaches_store() {
    let mut orchestrator = Orchestrator::new(FailingStore::new()).with_cap(test_cap());
    assert!(SessionRequest::new(None, 0, 1).is_err());
    assert_eq!(orchestrator.store().attempts, 0);
    // A valid request does reach it.
    let _ = orchestrator.run_session(&request(None, 1, 1));
    assert_eq!(orchestrator.store().attempts, 1);
}

#[test]
fn every_record_walks_to_a_palindrome_in_exactly_its_count() {
    let mut orchestrator = memory_orchestrator();
    orchestrator.run_session(&request(None, 500, 4)).unwrap();

    let records = orchestrator.list_records().unwrap();
    assert!(!records.is_empty());
    for record in records {
        assert_eq!(
            check(&record.number, test_cap()),
            CheckOutcome::Found(record.iterations),
            "record {} for {} iterations",
            record.number,
            record.iterations
        );
        assert!(is_palindrome(&walk(&record.number, record.iterations)));
    }
}

#[test]
fn records_are_minimal_for_their_count() {
    let mut orchestrator = memory_orchestrator();
    orchestrator.run_session(&request(None, 400, 1)).unwrap();

    for record in orchestrator.list_records().unwrap() {
        let below = ScanWindow::between(1u32, record.number.clone()).unwrap();
        for n in below.numbers() {
            assert_ne!(
                check(&n, test_cap()),
                CheckOutcome::Found(record.iterations),
                "{n} beats {} for {} iterations",
                record.number,
                record.iterations
            );
        }
    }
}
