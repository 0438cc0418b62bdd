//! Error types for the ostinato time-series engine.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// The main error type for all ostinato operations.
///
/// This enum covers every error condition the engine can produce, from
/// frequency construction through index building to collection assembly.
#[derive(Error, Debug)]
pub enum OstinatoError {
    /// Error constructing a frequency.
    #[error("frequency error: {0}")]
    Frequency(#[from] FrequencyError),

    /// Error constructing or slicing a date-time index.
    #[error("index error: {0}")]
    Index(#[from] IndexError),

    /// Error constructing or accessing a series.
    #[error("series error: {0}")]
    Series(#[from] SeriesError),

    /// Error assembling or transforming a series collection.
    #[error("collect error: {0}")]
    Collect(#[from] CollectError),
}

/// Errors that can occur when constructing or parsing a frequency.
#[derive(Error, Debug)]
pub enum FrequencyError {
    /// The step multiplier was zero. A frequency must advance time.
    #[error("frequency step must be >= 1, got {step}")]
    ZeroStep {
        /// The rejected step value.
        step: u32,
    },

    /// A compact frequency string (e.g. "1d", "30m") could not be parsed.
    #[error("unparseable frequency '{input}': expected <step><unit> with unit one of s, m, h, d, w")]
    Unparseable {
        /// The input that failed to parse.
        input: String,
    },
}

/// Errors that can occur when constructing or slicing a date-time index.
#[derive(Error, Debug)]
pub enum IndexError {
    /// A uniform index was requested with a negative period count.
    #[error("uniform index requires periods >= 0, got {periods}")]
    NegativePeriods {
        /// The rejected period count.
        periods: i64,
    },

    /// An irregular index input was not strictly increasing.
    #[error("timestamps must be strictly increasing: {current} at position {position} does not follow {previous}")]
    Unsorted {
        /// Position of the out-of-order timestamp.
        position: usize,
        /// The timestamp at `position - 1`.
        previous: DateTime<Utc>,
        /// The offending timestamp at `position`.
        current: DateTime<Utc>,
    },

    /// An irregular index input contained the same timestamp twice.
    #[error("duplicate timestamp {timestamp} at position {position}")]
    DuplicateTimestamp {
        /// Position of the second occurrence.
        position: usize,
        /// The duplicated timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A slice range was not within the index bounds.
    #[error("invalid slice {from}..{to} for index of length {len}")]
    SliceOutOfRange {
        /// The requested start position (inclusive).
        from: usize,
        /// The requested end position (exclusive).
        to: usize,
        /// The index length.
        len: usize,
    },
}

/// Errors that can occur when constructing or accessing a series.
#[derive(Error, Debug)]
pub enum SeriesError {
    /// The value vector length did not match the index length.
    #[error("series '{key}' has {values} values but its index has {index} timestamps")]
    LengthMismatch {
        /// The series key.
        key: String,
        /// The value vector length.
        values: usize,
        /// The index length.
        index: usize,
    },

    /// A positional access was outside the series bounds.
    #[error("position {position} is out of range for series of length {len}")]
    OutOfRange {
        /// The requested position.
        position: usize,
        /// The series length.
        len: usize,
    },
}

/// Errors that can occur when assembling or transforming a series collection.
#[derive(Error, Debug)]
pub enum CollectError {
    /// The same key appeared in more than one entry across the collection.
    ///
    /// Key uniqueness is a collection-wide invariant: it is enforced, never
    /// silently resolved by dropping one of the entries.
    #[error("duplicate key '{key}' encountered in partition {partition}")]
    DuplicateKey {
        /// The duplicated key.
        key: String,
        /// The partition in which the second occurrence was found.
        partition: usize,
    },

    /// An entry's value vector did not match the shared index length.
    #[error("entry '{key}' in partition {partition} has {values} values but the shared index has {index} timestamps")]
    LengthMismatch {
        /// The offending key.
        key: String,
        /// The partition holding the entry.
        partition: usize,
        /// The value vector length.
        values: usize,
        /// The shared index length.
        index: usize,
    },
}

/// Type alias for `Result<T, OstinatoError>`.
pub type Result<T> = std::result::Result<T, OstinatoError>;
