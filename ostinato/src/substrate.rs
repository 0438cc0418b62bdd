//! Execution substrates: how per-partition work actually runs.
//!
//! A [`Substrate`] is the seam between the engine's semantics and whatever
//! executes them. The contract is deliberately narrow: iterate partitions,
//! run a closure once per partition, hand the results back in partition
//! order. Nothing in the engine holds an ambient runtime handle; callers
//! pass a substrate value explicitly wherever execution strategy matters.
//!
//! Two substrates ship with the crate:
//!
//! - [`Threaded`] — one rayon task per partition, no shared mutable state.
//! - [`Sequential`] — a plain in-order loop, useful for deterministic
//!   debugging and tests.

use rayon::prelude::*;

use crate::collection::Partition;

/// Runs a closure over every partition of a collection.
///
/// Implementations must apply `job` exactly once per partition and return
/// the results in partition order, regardless of execution order. The job
/// receives the partition position and a reference to the partition; it must
/// not rely on any cross-partition state.
pub trait Substrate {
    /// Applies `job` to every partition, returning results in partition order.
    fn map_partitions<T, F>(&self, partitions: &[Partition], job: F) -> Vec<T>
    where
        T: Send,
        F: Fn(usize, &Partition) -> T + Sync;
}

/// Parallel substrate: one rayon task per partition.
#[derive(Debug, Clone, Copy, Default)]
pub struct Threaded;

impl Substrate for Threaded {
    fn map_partitions<T, F>(&self, partitions: &[Partition], job: F) -> Vec<T>
    where
        T: Send,
        F: Fn(usize, &Partition) -> T + Sync,
    {
        partitions
            .par_iter()
            .enumerate()
            .map(|(position, partition)| job(position, partition))
            .collect()
    }
}

/// In-order substrate: runs every partition on the calling thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sequential;

impl Substrate for Sequential {
    fn map_partitions<T, F>(&self, partitions: &[Partition], job: F) -> Vec<T>
    where
        T: Send,
        F: Fn(usize, &Partition) -> T + Sync,
    {
        partitions
            .iter()
            .enumerate()
            .map(|(position, partition)| job(position, partition))
            .collect()
    }
}
