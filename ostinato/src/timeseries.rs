//! The local table produced by collecting a series collection.

use std::collections::HashMap;
use std::sync::Arc;

use crate::index::DateTimeIndex;
use crate::series::Series;

/// An in-memory mapping from key to [`Series`], all sharing one index.
///
/// Built only by [`SeriesCollection::collect`]; every key appears exactly
/// once and every series has the index's length. Iteration order is
/// unspecified — source partitions may have been processed out of order,
/// and the table is key-addressed.
///
/// [`SeriesCollection::collect`]: crate::SeriesCollection::collect
#[derive(Debug, Clone)]
pub struct TimeSeries {
    index: Arc<DateTimeIndex>,
    series: HashMap<String, Series>,
}

impl TimeSeries {
    pub(crate) fn new(index: Arc<DateTimeIndex>, series: HashMap<String, Series>) -> Self {
        Self { index, series }
    }

    /// Returns the shared index.
    pub fn index(&self) -> &Arc<DateTimeIndex> {
        &self.index
    }

    /// Returns the series for `key`, if present.
    pub fn get(&self, key: &str) -> Option<&Series> {
        self.series.get(key)
    }

    /// Returns true if `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.series.contains_key(key)
    }

    /// Returns the number of series in the table.
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// Returns true if the table holds no series.
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Iterates over `(key, series)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Series)> {
        self.series.iter().map(|(key, series)| (key.as_str(), series))
    }

    /// Returns the keys in unspecified order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(String::as_str)
    }

    /// Returns the keys in sorted order. Handy for deterministic output.
    pub fn sorted_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.keys().collect();
        keys.sort_unstable();
        keys
    }
}
