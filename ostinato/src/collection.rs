//! Partitioned series collections and the collect barrier.
//!
//! A [`SeriesCollection`] holds an ordered set of partitions, each a list of
//! `(key, values)` entries, all aligned to one shared [`DateTimeIndex`]. The
//! partitioning itself comes from an external substrate (a cluster engine, a
//! thread pool, a test fixture); this module only requires that partitions
//! can be iterated and that per-partition work can run independently.
//!
//! Collections are values: [`filter`](SeriesCollection::filter) and
//! [`map_series`](SeriesCollection::map_series) construct new collections
//! and never mutate the original, so a collection can be reused concurrently
//! while derived collections are being built.
//!
//! [`collect`](SeriesCollection::collect) is the synchronization point: it
//! waits for every partition, enforces collection-wide key uniqueness, and
//! assembles a local [`TimeSeries`] table — or fails as a whole. There is no
//! partially assembled result.
//!
//! # Example
//!
//! ```rust
//! use ostinato::{DateTimeIndex, Frequency, SeriesCollection};
//! use chrono::{TimeZone, Utc};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
//! let index = DateTimeIndex::uniform(t0, 3, Frequency::days(1)?)?.into_shared();
//!
//! let collection = SeriesCollection::new(
//!     index,
//!     vec![
//!         vec![("x".to_string(), vec![1.0, 2.0, 3.0])],
//!         vec![("y".to_string(), vec![4.0, 5.0, 6.0])],
//!     ],
//! )?;
//!
//! let table = collection.collect()?;
//! assert_eq!(table.len(), 2);
//! assert_eq!(table.get("y").unwrap().values(), &[4.0, 5.0, 6.0]);
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use tracing::debug;

use crate::error::{CollectError, Result};
use crate::index::DateTimeIndex;
use crate::series::Series;
use crate::substrate::{Substrate, Threaded};
use crate::timeseries::TimeSeries;

/// One partition: an ordered list of `(key, values)` entries.
pub type Partition = Vec<(String, Vec<f64>)>;

/// A partitioned collection of named vectors sharing one [`DateTimeIndex`].
#[derive(Debug, Clone)]
pub struct SeriesCollection {
    index: Arc<DateTimeIndex>,
    partitions: Vec<Partition>,
}

impl SeriesCollection {
    /// Creates a collection from a shared index and partitioned entries.
    ///
    /// Every value vector must match the index length; this is validated
    /// here, at the constructing call, not deferred to `collect`.
    ///
    /// # Errors
    ///
    /// Returns [`CollectError::LengthMismatch`] naming the first offending
    /// key, its partition, and both lengths.
    pub fn new(index: Arc<DateTimeIndex>, partitions: Vec<Partition>) -> Result<Self> {
        for (position, partition) in partitions.iter().enumerate() {
            for (key, values) in partition {
                if values.len() != index.len() {
                    return Err(CollectError::LengthMismatch {
                        key: key.clone(),
                        partition: position,
                        values: values.len(),
                        index: index.len(),
                    }
                    .into());
                }
            }
        }
        Ok(Self { index, partitions })
    }

    /// Returns the shared index.
    pub fn index(&self) -> &Arc<DateTimeIndex> {
        &self.index
    }

    /// Returns the partitions in order.
    pub fn partitions(&self) -> &[Partition] {
        &self.partitions
    }

    /// Returns the number of partitions.
    pub fn partition_count(&self) -> usize {
        self.partitions.len()
    }

    /// Returns the total number of entries across all partitions.
    pub fn series_count(&self) -> usize {
        self.partitions.iter().map(Vec::len).sum()
    }

    /// Gathers every entry into a local [`TimeSeries`] table.
    ///
    /// Runs on the default [`Threaded`] substrate; see
    /// [`collect_with`](Self::collect_with) for the contract.
    ///
    /// # Errors
    ///
    /// See [`collect_with`](Self::collect_with).
    pub fn collect(&self) -> Result<TimeSeries> {
        self.collect_with(&Threaded)
    }

    /// Gathers every entry into a local [`TimeSeries`] table on `substrate`.
    ///
    /// This is a barrier: every partition's work completes before assembly
    /// begins, and the result is all-or-nothing. If any partition fails, the
    /// first error in partition order is returned and no partial table is
    /// observable. Partitions may run in any order; the assembled table is
    /// key-addressed, so only completeness and key uniqueness matter.
    ///
    /// # Errors
    ///
    /// - [`CollectError::DuplicateKey`] if the same key appears in two
    ///   partitions (or twice in one). Key uniqueness is enforced, never
    ///   silently resolved.
    /// - Any error produced by a partition's own computation.
    pub fn collect_with<S: Substrate>(&self, substrate: &S) -> Result<TimeSeries> {
        debug!(
            partitions = self.partition_count(),
            entries = self.series_count(),
            "collecting series collection"
        );

        // Barrier: all partitions finish before any merging happens.
        let partition_results: Vec<Result<Vec<Series>>> =
            substrate.map_partitions(&self.partitions, |_, partition| {
                partition
                    .iter()
                    .map(|(key, values)| {
                        Series::new(key.clone(), Arc::clone(&self.index), values.clone())
                    })
                    .collect()
            });

        // Merge in partition order so the reported error is deterministic
        // even though execution was not.
        let mut table: HashMap<String, Series> = HashMap::with_capacity(self.series_count());
        for (position, result) in partition_results.into_iter().enumerate() {
            for series in result? {
                match table.entry(series.key().to_string()) {
                    Entry::Vacant(slot) => {
                        slot.insert(series);
                    }
                    Entry::Occupied(slot) => {
                        return Err(CollectError::DuplicateKey {
                            key: slot.key().clone(),
                            partition: position,
                        }
                        .into());
                    }
                }
            }
        }

        debug!(series = table.len(), "collect complete");
        Ok(TimeSeries::new(Arc::clone(&self.index), table))
    }

    /// Returns a new collection retaining only entries whose key satisfies
    /// `predicate`.
    ///
    /// The shared index is unchanged and the original collection is not
    /// mutated. Partition count is preserved: partitions whose entries are
    /// all filtered away stay as empty partitions, so the substrate layout
    /// of derived collections matches the source.
    pub fn filter<P>(&self, predicate: P) -> Self
    where
        P: Fn(&str) -> bool,
    {
        let partitions = self
            .partitions
            .iter()
            .map(|partition| {
                partition
                    .iter()
                    .filter(|(key, _)| predicate(key))
                    .cloned()
                    .collect()
            })
            .collect();
        Self {
            index: Arc::clone(&self.index),
            partitions,
        }
    }

    /// Applies `f` independently to each `(key, values)` entry.
    ///
    /// Runs on the default [`Threaded`] substrate; see
    /// [`map_series_with`](Self::map_series_with).
    ///
    /// # Errors
    ///
    /// See [`map_series_with`](Self::map_series_with).
    pub fn map_series<F>(&self, f: F) -> Result<Self>
    where
        F: Fn(&str, &[f64]) -> Vec<f64> + Sync,
    {
        self.map_series_with(&Threaded, f)
    }

    /// Applies `f` independently to each `(key, values)` entry on `substrate`.
    ///
    /// Produces a new collection over the same shared index; the original is
    /// unchanged, including when `f` misbehaves.
    ///
    /// # Errors
    ///
    /// Returns [`CollectError::LengthMismatch`] naming the key whose mapped
    /// vector does not match the index length. The first offending entry in
    /// partition order is reported.
    pub fn map_series_with<S, F>(&self, substrate: &S, f: F) -> Result<Self>
    where
        S: Substrate,
        F: Fn(&str, &[f64]) -> Vec<f64> + Sync,
    {
        let index_len = self.index.len();
        let mapped: Vec<Result<Partition>> =
            substrate.map_partitions(&self.partitions, |position, partition| {
                partition
                    .iter()
                    .map(|(key, values)| {
                        let out = f(key, values);
                        if out.len() != index_len {
                            return Err(CollectError::LengthMismatch {
                                key: key.clone(),
                                partition: position,
                                values: out.len(),
                                index: index_len,
                            }
                            .into());
                        }
                        Ok((key.clone(), out))
                    })
                    .collect()
            });

        let partitions = mapped.into_iter().collect::<Result<Vec<Partition>>>()?;
        Ok(Self {
            index: Arc::clone(&self.index),
            partitions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frequency::Frequency;
    use crate::substrate::Sequential;
    use chrono::{DateTime, TimeZone, Utc};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    fn daily_index(periods: i64) -> Arc<DateTimeIndex> {
        DateTimeIndex::uniform(t0(), periods, Frequency::days(1).unwrap())
            .unwrap()
            .into_shared()
    }

    fn two_partition_collection() -> SeriesCollection {
        SeriesCollection::new(
            daily_index(3),
            vec![
                vec![("x".to_string(), vec![1.0, 2.0, 3.0])],
                vec![("y".to_string(), vec![4.0, 5.0, 6.0])],
            ],
        )
        .unwrap()
    }

    #[test]
    fn new_validates_entry_lengths() {
        let err = SeriesCollection::new(
            daily_index(3),
            vec![vec![("x".to_string(), vec![1.0, 2.0])]],
        )
        .expect_err("must fail");
        assert!(matches!(
            err,
            crate::OstinatoError::Collect(CollectError::LengthMismatch {
                partition: 0,
                values: 2,
                index: 3,
                ..
            })
        ));
    }

    #[test]
    fn collect_gathers_all_partitions() {
        let table = two_partition_collection().collect().unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("x").unwrap().values(), &[1.0, 2.0, 3.0]);
        assert_eq!(table.get("y").unwrap().values(), &[4.0, 5.0, 6.0]);
    }

    #[test]
    fn collect_rejects_duplicate_keys_across_partitions() {
        let collection = SeriesCollection::new(
            daily_index(1),
            vec![
                vec![("a".to_string(), vec![1.0])],
                vec![("a".to_string(), vec![2.0])],
            ],
        )
        .unwrap();

        let err = collection.collect().expect_err("must fail");
        assert!(matches!(
            err,
            crate::OstinatoError::Collect(CollectError::DuplicateKey { partition: 1, .. })
        ));
    }

    #[test]
    fn collect_rejects_duplicate_keys_within_a_partition() {
        let collection = SeriesCollection::new(
            daily_index(1),
            vec![vec![
                ("a".to_string(), vec![1.0]),
                ("a".to_string(), vec![2.0]),
            ]],
        )
        .unwrap();

        assert!(collection.collect().is_err());
    }

    #[test]
    fn collect_with_sequential_matches_threaded() {
        let collection = two_partition_collection();
        let seq = collection.collect_with(&Sequential).unwrap();
        let thr = collection.collect_with(&Threaded).unwrap();
        assert_eq!(seq.len(), thr.len());
        for (key, series) in seq.iter() {
            assert_eq!(thr.get(key).unwrap().values(), series.values());
        }
    }

    #[test]
    fn filter_keeps_index_and_original() {
        let collection = two_partition_collection();
        let filtered = collection.filter(|key| key == "x");

        assert_eq!(filtered.series_count(), 1);
        assert_eq!(filtered.partition_count(), 2); // empty partition retained
        assert!(Arc::ptr_eq(filtered.index(), collection.index()));

        // Original untouched.
        assert_eq!(collection.series_count(), 2);
        assert_eq!(collection.collect().unwrap().len(), 2);
    }

    #[test]
    fn map_series_transforms_values() {
        let collection = two_partition_collection();
        let doubled = collection
            .map_series(|_, values| values.iter().map(|v| v * 2.0).collect())
            .unwrap();

        let table = doubled.collect().unwrap();
        assert_eq!(table.get("x").unwrap().values(), &[2.0, 4.0, 6.0]);
        assert_eq!(table.get("y").unwrap().values(), &[8.0, 10.0, 12.0]);
    }

    #[test]
    fn map_series_rejects_wrong_length_and_leaves_original() {
        let collection = two_partition_collection();
        let err = collection
            .map_series(|_, _| vec![0.0]) // wrong length
            .expect_err("must fail");
        assert!(matches!(
            err,
            crate::OstinatoError::Collect(CollectError::LengthMismatch { values: 1, index: 3, .. })
        ));

        // Original unchanged and still collectible.
        assert_eq!(collection.collect().unwrap().len(), 2);
    }

    #[test]
    fn empty_collection_collects_to_empty_table() {
        let collection = SeriesCollection::new(daily_index(3), vec![]).unwrap();
        let table = collection.collect().unwrap();
        assert!(table.is_empty());
    }
}
