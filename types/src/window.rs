//! Half-open scan windows over the natural numbers.

use std::fmt;

use num_traits::ToPrimitive;
use thiserror::Error;

use crate::Number;

/// A half-open range `[start, start + len)` of consecutive numbers.
///
/// The start is unbounded; the length is a machine word because a window is
/// something a session actually iterates over.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScanWindow {
    start: Number,
    len: u64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WindowError {
    #[error("window span of {0} numbers does not fit in 64 bits")]
    TooLarge(Number),
}

impl ScanWindow {
    #[must_use]
    pub fn new(start: impl Into<Number>, len: u64) -> Self {
        Self {
            start: start.into(),
            len,
        }
    }

    /// Build `[start, end)`. An `end` at or below `start` yields an empty window.
    pub fn between(start: impl Into<Number>, end: impl Into<Number>) -> Result<Self, WindowError> {
        let start = start.into();
        let end = end.into();
        if end <= start {
            return Ok(Self { start, len: 0 });
        }
        let span = end - &start;
        let len = span.to_u64().ok_or(WindowError::TooLarge(span))?;
        Ok(Self { start, len })
    }

    #[must_use]
    pub fn start(&self) -> &Number {
        &self.start
    }

    /// Exclusive upper bound.
    #[must_use]
    pub fn end(&self) -> Number {
        &self.start + self.len
    }

    #[must_use]
    pub const fn len(&self) -> u64 {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Every number in the window, ascending.
    pub fn numbers(&self) -> impl Iterator<Item = Number> + '_ {
        (0..self.len).map(move |offset| &self.start + offset)
    }

    /// Split into consecutive sub-windows of `size` numbers (the last may be shorter).
    ///
    /// A `size` of zero is treated as one.
    #[must_use]
    pub fn chunks(&self, size: u64) -> Chunks<'_> {
        Chunks {
            window: self,
            size: size.max(1),
            offset: 0,
        }
    }

    /// Number of sub-windows [`chunks`](Self::chunks) yields for `size`.
    #[must_use]
    pub fn chunk_count(&self, size: u64) -> u64 {
        self.len.div_ceil(size.max(1))
    }

    /// The `index`-th sub-window of `size` numbers, clipped to this window.
    #[must_use]
    pub fn chunk(&self, index: u64, size: u64) -> ScanWindow {
        let size = size.max(1);
        let offset = index.saturating_mul(size).min(self.len);
        let len = size.min(self.len - offset);
        ScanWindow {
            start: &self.start + offset,
            len,
        }
    }
}

impl fmt::Display for ScanWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end())
    }
}

/// Iterator returned by [`ScanWindow::chunks`].
#[derive(Debug)]
pub struct Chunks<'a> {
    window: &'a ScanWindow,
    size: u64,
    offset: u64,
}

impl Iterator for Chunks<'_> {
    type Item = ScanWindow;

    fn next(&mut self) -> Option<Self::Item> {
        if self.offset >= self.window.len {
            return None;
        }
        let len = self.size.min(self.window.len - self.offset);
        let chunk = ScanWindow {
            start: &self.window.start + self.offset,
            len,
        };
        self.offset += len;
        Some(chunk)
    }
}
