//! Palindrome detection with a bounded reverse-and-add walk.

use thiserror::Error;

use lychrel_types::{CheckOutcome, IterationCount, Number};

use crate::digits::{BASE, is_palindromic, reversed_value};

/// Hard upper bound on iterations any caller may request.
pub const MAX_ITERS: IterationCount = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("iteration cap {requested} exceeds the maximum of {max}", max = MAX_ITERS)]
pub struct CapError {
    pub requested: IterationCount,
}

/// Number of walk positions the detector examines, at most [`MAX_ITERS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IterationCap(IterationCount);

impl IterationCap {
    pub const MAX: IterationCap = IterationCap(MAX_ITERS);

    pub const fn new(cap: IterationCount) -> Result<Self, CapError> {
        if cap > MAX_ITERS {
            Err(CapError { requested: cap })
        } else {
            Ok(Self(cap))
        }
    }

    #[must_use]
    pub const fn get(self) -> IterationCount {
        self.0
    }
}

impl Default for IterationCap {
    fn default() -> Self {
        Self::MAX
    }
}

/// True iff the base-12 digits of `n` read the same in both directions.
#[must_use]
pub fn is_palindrome(n: &Number) -> bool {
    is_palindromic(&n.to_radix_be(BASE))
}

/// Walk `n` under reverse-and-add until it is a palindrome.
///
/// Position `i` is tested before the `i`-th step, so a number that already
/// is a palindrome reports `Found(0)`. Positions `0..cap` are tested.
#[must_use]
pub fn check(n: &Number, cap: IterationCap) -> CheckOutcome {
    let mut current = n.clone();
    for i in 0..cap.get() {
        let digits = current.to_radix_be(BASE);
        if is_palindromic(&digits) {
            return CheckOutcome::Found(i);
        }
        current += reversed_value(&digits);
    }
    CheckOutcome::NotFound
}
