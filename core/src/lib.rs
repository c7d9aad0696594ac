//! Base-12 reverse-and-add arithmetic for lychrel.
//!
//! Leaf-first:
//!
//! ```text
//! digits   - Number <-> DigitSequence (base 12)
//! kernel   - step(n) = n + reverse(n)
//! detector - bounded walk until a palindrome: Found(i) | NotFound
//! scanner  - detector over a ScanWindow, folded into a BestMap
//! ```
//!
//! Everything here is a pure function of its arguments, so it can run on any
//! worker thread without coordination.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory

mod detector;
mod digits;
mod kernel;
mod scanner;

pub use detector::{CapError, IterationCap, MAX_ITERS, check, is_palindrome};
pub use digits::{BASE, DigitError, DigitSequence, from_base12, to_base12};
pub use kernel::{step, walk};
pub use scanner::scan_range;
