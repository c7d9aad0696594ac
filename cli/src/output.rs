//! Plain-text rendering of command results for stdout.

use std::fmt::Write;

use lychrel_core::to_base12;
use lychrel_engine::{SessionReport, StoreStatus};
use lychrel_types::{CheckOutcome, IterationRecord, Number};

#[must_use]
pub fn session_report(report: &SessionReport) -> String {
    let mut out = String::new();
    let last = report.window.end() - 1u32;
    let _ = writeln!(out, "Start: {}", report.window.start());
    let _ = writeln!(out, "End: {last}");
    let _ = writeln!(out, "Number of workers: {}", report.workers);
    let _ = writeln!(out, "Partitioning: {}", report.partition);
    let _ = writeln!(out, "Found new numbers: {}", report.new_records_found);
    if report.improved_records > 0 {
        let _ = writeln!(out, "Improved numbers: {}", report.improved_records);
    }
    if let Some(deepest) = &report.deepest {
        let _ = writeln!(out, "Deepest: {}", describe(deepest));
    }
    let _ = writeln!(out, "Elapsed: {:.2?}", report.elapsed);
    out
}

/// One line per record: iterations, decimal number, duodecimal number.
#[must_use]
pub fn records(records: &[IterationRecord]) -> String {
    records
        .iter()
        .map(|record| {
            format!(
                "{}\t{}\t{}\n",
                record.iterations,
                record.number,
                to_base12(&record.number)
            )
        })
        .collect()
}

#[must_use]
pub fn status(status: &StoreStatus) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Checkpoint: {}", status.checkpoint);
    let _ = writeln!(out, "Records: {}", status.records);
    let _ = writeln!(out, "Sessions: {}", status.sessions);
    if let Some(deepest) = &status.deepest {
        let _ = writeln!(out, "Deepest: {}", describe(deepest));
    }
    if let Some(at) = &status.last_session_at {
        let _ = writeln!(out, "Last session: {at}");
    }
    out
}

/// `palindrome` is the number reached, when the walk converged.
#[must_use]
pub fn check(n: &Number, outcome: CheckOutcome, palindrome: Option<&Number>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Number: {n} ({} in base 12)", to_base12(n));
    let _ = writeln!(out, "Result: {outcome}");
    if let Some(palindrome) = palindrome {
        let _ = writeln!(
            out,
            "Palindrome: {palindrome} ({} in base 12)",
            to_base12(palindrome)
        );
    }
    out
}

fn describe(record: &IterationRecord) -> String {
    format!(
        "{} iterations at {} ({} in base 12)",
        record.iterations,
        record.number,
        to_base12(&record.number)
    )
}
