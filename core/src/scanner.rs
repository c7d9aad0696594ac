//! Sequential scan of one window.

use lychrel_types::{BestMap, CheckOutcome, ScanWindow};

use crate::detector::{IterationCap, check};

/// Run the detector over every number in `window`, ascending.
///
/// The first number found for an iteration count is kept and never
/// overwritten, which makes it the minimum within the window. Numbers that
/// do not converge within `cap` are left out.
#[must_use]
pub fn scan_range(window: &ScanWindow, cap: IterationCap) -> BestMap {
    let mut best = BestMap::new();
    for n in window.numbers() {
        if let CheckOutcome::Found(iterations) = check(&n, cap) {
            best.observe_first(iterations, || n);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::is_palindrome;
    use crate::kernel::walk;
    use lychrel_types::Number;
    use proptest::prelude::*;

    fn cap() -> IterationCap {
        IterationCap::new(60).unwrap()
    }

    /// Per-number checks reduced with an explicit minimum.
    fn scan_reference(start: u32, end: u32, cap: IterationCap) -> BestMap {
        let mut best = BestMap::new();
        for n in start..end {
            let n = Number::from(n);
            if let Some(iterations) = check(&n, cap).iterations() {
                let smaller = best.get(iterations).is_none_or(|known| &n < known);
                if smaller {
                    best.observe(iterations, n);
                }
            }
        }
        best
    }

    #[test]
    fn records_reach_palindromes() {
        let window = ScanWindow::new(1u32, 99);
        let best = scan_range(&window, cap());
        assert!(!best.is_empty());
        for (iterations, number) in best.iter() {
            assert!(is_palindrome(&walk(number, iterations)), "{iterations}: {number}");
        }
    }

    #[test]
    fn single_digits_are_zero_step() {
        let best = scan_range(&ScanWindow::new(1u32, 11), cap());
        assert_eq!(best.get(0), Some(&Number::from(1u32)));
        assert_eq!(best.len(), 1);
    }

    #[test]
    fn first_hit_is_minimum() {
        // 23 is the first number below 24 needing two steps.
        let best = scan_range(&ScanWindow::new(1u32, 24), cap());
        assert_eq!(best, scan_reference(1, 24, cap()));
        assert_eq!(best.get(2), Some(&Number::from(23u32)));
    }

    #[test]
    fn empty_window_is_empty_map() {
        assert!(scan_range(&ScanWindow::new(40u32, 0), cap()).is_empty());
    }

    proptest! {
        #[test]
        fn matches_per_number_reference(start in 0u32..400, len in 0u32..120) {
            let window = ScanWindow::new(start, u64::from(len));
            prop_assert_eq!(
                scan_range(&window, cap()),
                scan_reference(start, start + len, cap())
            );
        }
    }
}
