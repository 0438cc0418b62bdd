//! # ostinato
//!
//! Date-time indexing and aligned time-series collection engine.
//!
//! ostinato is a Rust library for building ordered timestamp indexes,
//! aligning named value vectors against them, and gathering partitioned
//! collections of such vectors into local keyed tables. It is the
//! self-contained core behind thin language bindings that hand series
//! handles across a process boundary.
//!
//! ## Key Properties
//!
//! - Uniform indexes are formula-generated: length, access, and lookup cost
//!   O(1)/O(log n) without ever materializing the timestamp sequence
//! - Every value is immutable after construction — indexes are shared via
//!   `Arc` by any number of series and collections with no locking
//! - Invariants (step >= 1, strictly increasing timestamps, value/index
//!   length equality) are validated at construction, never at use time
//! - Collecting a partitioned collection is a barrier: all partitions
//!   complete before assembly, and failure yields no partial table
//! - Execution strategy is pluggable through a narrow substrate trait;
//!   nothing holds an ambient runtime handle
//!
//! ## Quick Start
//!
//! ```rust
//! use ostinato::{DateTimeIndex, Frequency, SeriesCollection};
//! use chrono::{TimeZone, Utc};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Three days starting 2024-01-01.
//! let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
//! let index = DateTimeIndex::uniform(start, 3, Frequency::days(1)?)?.into_shared();
//!
//! // Two partitions of named vectors aligned to that index.
//! let collection = SeriesCollection::new(
//!     index,
//!     vec![
//!         vec![("x".to_string(), vec![1.0, 2.0, 3.0])],
//!         vec![("y".to_string(), vec![4.0, 5.0, 6.0])],
//!     ],
//! )?;
//!
//! // Barrier: gather everything into one local table.
//! let table = collection.collect()?;
//! assert_eq!(table.get("x").unwrap().at(2)?, 3.0);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`Frequency`] — rule for stepping a timestamp forward by fixed units
//! - [`DateTimeIndex`] — ordered, deduplicated timestamp sequence, uniform
//!   or irregular, shared by aligned series
//! - [`Series`] — named numeric vector aligned 1:1 to an index
//! - [`SeriesCollection`] — partitioned set of named vectors over one index
//! - [`TimeSeries`] — the local table a collect produces
//! - [`Substrate`] — execution seam for per-partition work
//!
//! ## Modules
//!
//! For lower-level access, the individual modules are also public:
//!
//! - [`frequency`] — frequency construction and timestamp stepping
//! - [`index`] — index construction, lookup, slicing, equality
//! - [`series`] — series access and reindexing
//! - [`collection`] — partitioned collections, collect/filter/map
//! - [`substrate`] — threaded and sequential execution substrates
//! - [`timeseries`] — the collected table
//! - [`error`] — error types

pub mod collection;
pub mod error;
pub mod frequency;
pub mod index;
pub mod series;
pub mod substrate;
pub mod timeseries;

// Re-export primary API types at crate root for convenience.
pub use collection::{Partition, SeriesCollection};
pub use error::{CollectError, FrequencyError, IndexError, OstinatoError, Result, SeriesError};
pub use frequency::{Frequency, TimeUnit};
pub use index::DateTimeIndex;
pub use series::Series;
pub use substrate::{Sequential, Substrate, Threaded};
pub use timeseries::TimeSeries;
