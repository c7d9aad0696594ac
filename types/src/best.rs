//! Best-known map: iteration count → smallest number needing that many steps.
//!
//! All combination goes through the minimum-by-key rule, which is commutative
//! and associative. Any number of partial maps can therefore be folded in any
//! order (or grouping) and produce the same result.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use crate::{IterationCount, IterationRecord, Number};

/// What [`BestMap::observe`] did with a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    /// First number seen for this iteration count.
    Inserted,
    /// Replaced a larger number.
    Improved,
    /// An equal or smaller number was already known.
    Kept,
}

/// Minimum-by-key map from iteration count to number.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BestMap {
    entries: BTreeMap<IterationCount, Number>,
}

/// Records that differ between a merged map and the map it was built on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    /// Iteration counts the base map did not have at all.
    pub new: Vec<IterationRecord>,
    /// Iteration counts whose number went down.
    pub improved: Vec<IterationRecord>,
}

impl ChangeSet {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.new.is_empty() && self.improved.is_empty()
    }

    /// New and improved records together, ascending by iteration count.
    #[must_use]
    pub fn records(&self) -> Vec<IterationRecord> {
        let mut records: Vec<IterationRecord> =
            self.new.iter().chain(&self.improved).cloned().collect();
        records.sort_by_key(|record| record.iterations);
        records
    }
}

impl BestMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer `number` as a candidate for `iterations`, keeping the minimum.
    pub fn observe(&mut self, iterations: IterationCount, number: Number) -> Observation {
        match self.entries.entry(iterations) {
            Entry::Vacant(slot) => {
                slot.insert(number);
                Observation::Inserted
            }
            Entry::Occupied(mut slot) => {
                if number < *slot.get() {
                    slot.insert(number);
                    Observation::Improved
                } else {
                    Observation::Kept
                }
            }
        }
    }

    /// Record `number` only if `iterations` has not been seen yet.
    ///
    /// Used by ascending scans, where the first hit per key is already minimal.
    pub fn observe_first(&mut self, iterations: IterationCount, number: impl FnOnce() -> Number) {
        self.entries.entry(iterations).or_insert_with(number);
    }

    /// Fold `other` into `self` under the minimum-by-key rule.
    pub fn absorb(&mut self, other: BestMap) {
        for (iterations, number) in other.entries {
            self.observe(iterations, number);
        }
    }

    /// Fold any number of maps into one.
    #[must_use]
    pub fn merge_all<I>(maps: I) -> BestMap
    where
        I: IntoIterator<Item = BestMap>,
    {
        maps.into_iter().fold(BestMap::new(), |mut acc, map| {
            acc.absorb(map);
            acc
        })
    }

    /// New and improved records of `self` relative to `base`.
    ///
    /// Keys where `self` is equal to or larger than `base` are not reported:
    /// a committed number never moves up.
    #[must_use]
    pub fn changes_since(&self, base: &BestMap) -> ChangeSet {
        let mut changes = ChangeSet::default();
        for (&iterations, number) in &self.entries {
            match base.get(iterations) {
                None => changes.new.push(IterationRecord::new(iterations, number.clone())),
                Some(known) if number < known => changes
                    .improved
                    .push(IterationRecord::new(iterations, number.clone())),
                Some(_) => {}
            }
        }
        changes
    }

    #[must_use]
    pub fn get(&self, iterations: IterationCount) -> Option<&Number> {
        self.entries.get(&iterations)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries ascending by iteration count.
    pub fn iter(&self) -> impl Iterator<Item = (IterationCount, &Number)> {
        self.entries.iter().map(|(&iterations, number)| (iterations, number))
    }

    /// Largest iteration count recorded so far.
    #[must_use]
    pub fn deepest(&self) -> Option<IterationRecord> {
        self.entries
            .last_key_value()
            .map(|(&iterations, number)| IterationRecord::new(iterations, number.clone()))
    }

    #[must_use]
    pub fn records(&self) -> Vec<IterationRecord> {
        self.iter()
            .map(|(iterations, number)| IterationRecord::new(iterations, number.clone()))
            .collect()
    }
}

/// Pure minimum-by-key combination of two maps.
///
/// Neither input is modified. `merge(a, b) == merge(b, a)`.
#[must_use]
pub fn merge(base: &BestMap, overlay: &BestMap) -> BestMap {
    let mut combined = base.clone();
    combined.absorb(overlay.clone());
    combined
}

impl FromIterator<(IterationCount, Number)> for BestMap {
    fn from_iter<T: IntoIterator<Item = (IterationCount, Number)>>(iter: T) -> Self {
        let mut map = BestMap::new();
        for (iterations, number) in iter {
            map.observe(iterations, number);
        }
        map
    }
}

impl FromIterator<IterationRecord> for BestMap {
    fn from_iter<T: IntoIterator<Item = IterationRecord>>(iter: T) -> Self {
        iter.into_iter()
            .map(|record| (record.iterations, record.number))
            .collect()
    }
}
