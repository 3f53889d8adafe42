//! Append-only search history for convergence analysis.

use serde::{Deserialize, Serialize};

/// A record that marks a point of a search and the best makespan so far.
pub trait HistoryRecord {
    /// Temperature step or generation index.
    fn marker(&self) -> usize;

    /// Best makespan found up to and including this point.
    fn best_makespan(&self) -> u64;
}

/// Ordered, append-only sequence of search records.
///
/// The first record describes the initial state (marker 0); each later
/// record closes one temperature step or generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchHistory<E> {
    records: Vec<E>,
}

impl<E> Default for SearchHistory<E> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

impl<E> SearchHistory<E> {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, record: E) {
        self.records.push(record);
    }

    /// All records in order.
    pub fn records(&self) -> &[E] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no record was written.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The most recent record.
    pub fn last(&self) -> Option<&E> {
        self.records.last()
    }

    /// Iterates over the records.
    pub fn iter(&self) -> std::slice::Iter<'_, E> {
        self.records.iter()
    }
}

impl<E: HistoryRecord> SearchHistory<E> {
    /// `(marker, best makespan)` pairs, ready for a convergence plot.
    pub fn best_curve(&self) -> Vec<(usize, u64)> {
        self.records
            .iter()
            .map(|r| (r.marker(), r.best_makespan()))
            .collect()
    }

    /// Whether the best makespan never increases along the history.
    pub fn is_monotone(&self) -> bool {
        self.records
            .windows(2)
            .all(|w| w[1].best_makespan() <= w[0].best_makespan())
    }
}

impl<'a, E> IntoIterator for &'a SearchHistory<E> {
    type Item = &'a E;
    type IntoIter = std::slice::Iter<'a, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
