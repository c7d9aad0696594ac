//! Core domain types for lychrel.
//!
//! This crate contains pure domain types with no IO, no threads, and minimal
//! dependencies. Everything here can be used from any layer of the workspace:
//! the detector produces [`CheckOutcome`]s, the scanners fold them into
//! [`BestMap`]s, and the store persists [`IterationRecord`]s.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory

mod best;
mod window;

pub use best::{BestMap, ChangeSet, Observation, merge};
pub use window::{Chunks, ScanWindow, WindowError};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Arbitrary-precision non-negative integer.
///
/// Reverse-and-add walks overflow 64 bits long before the iteration cap is
/// reached, so every number flowing through the search uses this type.
pub type Number = num_bigint::BigUint;

/// Number of reverse-and-add steps needed to reach a palindrome.
pub type IterationCount = u32;

// ============================================================================
// Detector outcome
// ============================================================================

/// Result of running the palindrome detector on one number.
///
/// `NotFound` means the iteration cap was exhausted. It is a normal outcome
/// and never compares against a real iteration count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckOutcome {
    /// The walk reached a palindrome after this many steps (0 = already one).
    Found(IterationCount),
    /// No palindrome within the cap.
    NotFound,
}

impl CheckOutcome {
    #[must_use]
    pub const fn iterations(self) -> Option<IterationCount> {
        match self {
            CheckOutcome::Found(iterations) => Some(iterations),
            CheckOutcome::NotFound => None,
        }
    }

    #[must_use]
    pub const fn is_found(self) -> bool {
        matches!(self, CheckOutcome::Found(_))
    }
}

impl fmt::Display for CheckOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckOutcome::Found(1) => f.write_str("palindrome after 1 iteration"),
            CheckOutcome::Found(n) => write!(f, "palindrome after {n} iterations"),
            CheckOutcome::NotFound => f.write_str("no palindrome within the iteration cap"),
        }
    }
}

// ============================================================================
// Partitioning
// ============================================================================

/// How a session window is divided among workers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartitionMode {
    /// One contiguous sub-range per worker, each scanned in a single pass.
    #[default]
    Static,
    /// Small fixed-size chunks pulled by whichever worker is free.
    Dynamic,
}

#[derive(Debug, Error)]
#[error("invalid partition mode '{0}'; expected one of: static, dynamic")]
pub struct ParsePartitionModeError(String);

impl PartitionMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            PartitionMode::Static => "static",
            PartitionMode::Dynamic => "dynamic",
        }
    }
}

impl fmt::Display for PartitionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PartitionMode {
    type Err = ParsePartitionModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "static" => Ok(PartitionMode::Static),
            "dynamic" => Ok(PartitionMode::Dynamic),
            _ => Err(ParsePartitionModeError(s.to_string())),
        }
    }
}

// ============================================================================
// Records
// ============================================================================

/// The smallest known number that needs exactly `iterations` steps.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IterationRecord {
    pub iterations: IterationCount,
    pub number: Number,
}

impl IterationRecord {
    #[must_use]
    pub fn new(iterations: IterationCount, number: impl Into<Number>) -> Self {
        Self {
            iterations,
            number: number.into(),
        }
    }
}

impl From<(IterationCount, Number)> for IterationRecord {
    fn from((iterations, number): (IterationCount, Number)) -> Self {
        Self { iterations, number }
    }
}
