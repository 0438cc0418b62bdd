//! Date-time indexes: ordered, deduplicated timestamp sequences.
//!
//! A [`DateTimeIndex`] is the spine every series and collection aligns to.
//! It comes in two variants:
//!
//! - **Uniform** — generated from a start timestamp, a period count, and a
//!   [`Frequency`]. Element `i` is `frequency.advance(start, i)`. The
//!   sequence is never materialized; length, access, and lookup are all
//!   computed from the formula.
//! - **Irregular** — an explicitly enumerated sequence, validated to be
//!   strictly increasing at construction.
//!
//! Indexes are immutable once built and shared through [`Arc`] by many
//! series and collections at once. Because there is no back-mutation, no
//! locking is ever needed; "changing" an index means constructing a new one.
//!
//! # Example
//!
//! ```rust
//! use ostinato::{DateTimeIndex, Frequency};
//! use chrono::{TimeZone, Utc};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
//! let index = DateTimeIndex::uniform(t0, 3, Frequency::days(1)?)?;
//!
//! assert_eq!(index.len(), 3);
//! assert_eq!(index.locate(Frequency::days(1)?.advance(t0, 2)), Some(2));
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{IndexError, Result};
use crate::frequency::Frequency;

/// An ordered, deduplicated sequence of timestamps.
///
/// Construct with [`DateTimeIndex::uniform`] or [`DateTimeIndex::irregular`];
/// both validate their invariants up front so every built index is strictly
/// increasing. Share with [`DateTimeIndex::into_shared`] or `Arc::new`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DateTimeIndex {
    /// Formula-generated index: element i = `frequency.advance(start, i)`.
    Uniform {
        /// The first timestamp.
        start: DateTime<Utc>,
        /// Number of elements.
        periods: usize,
        /// Step rule between consecutive elements.
        frequency: Frequency,
    },
    /// Explicitly enumerated index, strictly increasing.
    Irregular {
        /// The ordered timestamps.
        timestamps: Vec<DateTime<Utc>>,
    },
}

impl DateTimeIndex {
    /// Creates a uniform index of `periods` elements starting at `start`.
    ///
    /// Element `i` is `frequency.advance(start, i)`. Since the frequency's
    /// step is validated at its own construction, every generated sequence
    /// is strictly increasing by construction.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::NegativePeriods`] if `periods < 0`. Zero
    /// periods is valid and yields an empty index.
    pub fn uniform(start: DateTime<Utc>, periods: i64, frequency: Frequency) -> Result<Self> {
        if periods < 0 {
            return Err(IndexError::NegativePeriods { periods }.into());
        }
        Ok(Self::Uniform {
            start,
            periods: periods as usize,
            frequency,
        })
    }

    /// Creates an irregular index from an explicit timestamp sequence.
    ///
    /// # Errors
    ///
    /// - [`IndexError::DuplicateTimestamp`] if two adjacent timestamps are
    ///   equal, reporting the position of the second occurrence.
    /// - [`IndexError::Unsorted`] if any timestamp does not strictly follow
    ///   its predecessor, reporting both timestamps and the position.
    pub fn irregular(timestamps: Vec<DateTime<Utc>>) -> Result<Self> {
        for (position, pair) in timestamps.windows(2).enumerate() {
            let (previous, current) = (pair[0], pair[1]);
            if current == previous {
                return Err(IndexError::DuplicateTimestamp {
                    position: position + 1,
                    timestamp: current,
                }
                .into());
            }
            if current < previous {
                return Err(IndexError::Unsorted {
                    position: position + 1,
                    previous,
                    current,
                }
                .into());
            }
        }
        Ok(Self::Irregular { timestamps })
    }

    /// Wraps the index for shared ownership.
    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Returns the number of timestamps.
    pub fn len(&self) -> usize {
        match self {
            Self::Uniform { periods, .. } => *periods,
            Self::Irregular { timestamps } => timestamps.len(),
        }
    }

    /// Returns true if the index holds no timestamps.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the timestamp at `position`, or `None` if out of range.
    pub fn get(&self, position: usize) -> Option<DateTime<Utc>> {
        match self {
            Self::Uniform {
                start,
                periods,
                frequency,
            } => {
                if position < *periods {
                    Some(frequency.advance(*start, position as i64))
                } else {
                    None
                }
            }
            Self::Irregular { timestamps } => timestamps.get(position).copied(),
        }
    }

    /// Returns the first timestamp, or `None` if the index is empty.
    pub fn first(&self) -> Option<DateTime<Utc>> {
        self.get(0)
    }

    /// Returns the last timestamp, or `None` if the index is empty.
    pub fn last(&self) -> Option<DateTime<Utc>> {
        self.len().checked_sub(1).and_then(|i| self.get(i))
    }

    /// Finds the position holding exactly `timestamp`, or `None`.
    ///
    /// O(log n) for both variants. A uniform index inverts the generation
    /// formula: the candidate position is the step count between `start` and
    /// `timestamp`, then re-advancing verifies the hit so timestamps that
    /// fall between steps (or off the second grid) miss cleanly. An
    /// irregular index binary-searches its stored sequence.
    pub fn locate(&self, timestamp: DateTime<Utc>) -> Option<usize> {
        match self {
            Self::Uniform {
                start,
                periods,
                frequency,
            } => {
                let delta_seconds = (timestamp - *start).num_seconds();
                if delta_seconds < 0 {
                    return None;
                }
                let candidate = delta_seconds.div_euclid(frequency.step_seconds());
                if (candidate as usize) < *periods
                    && frequency.advance(*start, candidate) == timestamp
                {
                    Some(candidate as usize)
                } else {
                    None
                }
            }
            Self::Irregular { timestamps } => timestamps.binary_search(&timestamp).ok(),
        }
    }

    /// Returns a new index covering the half-open position range `[from, to)`.
    ///
    /// A uniform index stays uniform (new start, new count, same frequency);
    /// an irregular index copies the sub-range. Either way the result is a
    /// contiguous sub-range of an already strictly-increasing sequence, so
    /// the ordering invariant carries over untouched.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::SliceOutOfRange`] if `from > to` or `to > len`.
    pub fn slice(&self, from: usize, to: usize) -> Result<Self> {
        if from > to || to > self.len() {
            return Err(IndexError::SliceOutOfRange {
                from,
                to,
                len: self.len(),
            }
            .into());
        }
        match self {
            Self::Uniform {
                start, frequency, ..
            } => Ok(Self::Uniform {
                start: frequency.advance(*start, from as i64),
                periods: to - from,
                frequency: *frequency,
            }),
            Self::Irregular { timestamps } => Ok(Self::Irregular {
                timestamps: timestamps[from..to].to_vec(),
            }),
        }
    }

    /// Iterates over the timestamps in order.
    pub fn iter(&self) -> impl Iterator<Item = DateTime<Utc>> + '_ {
        (0..self.len()).map(|i| {
            self.get(i)
                .expect("position within 0..len must be populated")
        })
    }

    /// Materializes the full timestamp sequence.
    pub fn to_vec(&self) -> Vec<DateTime<Utc>> {
        self.iter().collect()
    }
}

/// Sequence equality: two indexes are equal iff they enumerate the identical
/// ordered timestamps, regardless of variant. A uniform index equals an
/// irregular one spelling out the same sequence.
impl PartialEq for DateTimeIndex {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            // Same generation parameters, no enumeration needed.
            (
                Self::Uniform {
                    start: a_start,
                    periods: a_periods,
                    frequency: a_freq,
                },
                Self::Uniform {
                    start: b_start,
                    periods: b_periods,
                    frequency: b_freq,
                },
            ) if a_start == b_start && a_periods == b_periods => {
                // Frequencies only matter when there are steps to take.
                *a_periods < 2 || a_freq.step_seconds() == b_freq.step_seconds()
            }
            _ => self.len() == other.len() && self.iter().eq(other.iter()),
        }
    }
}

impl Eq for DateTimeIndex {}

/// Untrusted wire shape; converted through the validating constructors.
#[derive(Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum IndexRepr {
    Uniform {
        start: DateTime<Utc>,
        periods: i64,
        frequency: Frequency,
    },
    Irregular {
        timestamps: Vec<DateTime<Utc>>,
    },
}

impl<'de> Deserialize<'de> for DateTimeIndex {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let repr = IndexRepr::deserialize(deserializer)?;
        let index = match repr {
            IndexRepr::Uniform {
                start,
                periods,
                frequency,
            } => Self::uniform(start, periods, frequency),
            IndexRepr::Irregular { timestamps } => Self::irregular(timestamps),
        };
        index.map_err(D::Error::custom)
    }
}
