//! One reverse-and-add step in base 12.

use lychrel_types::Number;

use crate::digits::{BASE, reversed_value};

/// `n + reverse(n)` where the reversal is over the base-12 digits of `n`.
#[must_use]
pub fn step(n: &Number) -> Number {
    let digits = n.to_radix_be(BASE);
    n + reversed_value(&digits)
}

/// Apply [`step`] `steps` times.
#[must_use]
pub fn walk(n: &Number, steps: u32) -> Number {
    (0..steps).fold(n.clone(), |current, _| step(&current))
}
