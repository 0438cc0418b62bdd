//! Series: a named numeric vector aligned 1:1 with a shared index.
//!
//! Every [`Series`] references a [`DateTimeIndex`] through an [`Arc`] and
//! carries exactly one value per index position: position `i` in the values
//! corresponds to timestamp `i` in the index. The length invariant is
//! enforced at construction and the series is immutable afterwards.
//!
//! Missing observations are represented by the [`Series::MISSING`] sentinel
//! (`f64::NAN`); [`Series::is_missing`] wraps the NaN test so callers never
//! compare NaN directly.

use std::sync::Arc;

use serde::Serialize;

use crate::error::{Result, SeriesError};
use crate::index::DateTimeIndex;

/// A named numeric vector aligned 1:1 with a [`DateTimeIndex`].
#[derive(Debug, Clone, Serialize)]
pub struct Series {
    key: String,
    #[serde(skip)]
    index: Arc<DateTimeIndex>,
    values: Vec<f64>,
}

impl Series {
    /// Sentinel marking a missing observation after alignment.
    pub const MISSING: f64 = f64::NAN;

    /// Creates a series from a key, a shared index, and values.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::LengthMismatch`] if `values.len()` differs
    /// from `index.len()`; the error names the key and both lengths.
    pub fn new(
        key: impl Into<String>,
        index: Arc<DateTimeIndex>,
        values: Vec<f64>,
    ) -> Result<Self> {
        let key = key.into();
        if values.len() != index.len() {
            return Err(SeriesError::LengthMismatch {
                key,
                values: values.len(),
                index: index.len(),
            }
            .into());
        }
        Ok(Self { key, index, values })
    }

    /// Returns the series key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the shared index.
    pub fn index(&self) -> &Arc<DateTimeIndex> {
        &self.index
    }

    /// Returns the values in index order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Returns the number of observations (== index length).
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the series is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the value at `position`.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::OutOfRange`] if `position` is outside
    /// `[0, len)`.
    pub fn at(&self, position: usize) -> Result<f64> {
        self.values
            .get(position)
            .copied()
            .ok_or_else(|| {
                SeriesError::OutOfRange {
                    position,
                    len: self.values.len(),
                }
                .into()
            })
    }

    /// Returns true if `value` is the missing sentinel.
    pub fn is_missing(value: f64) -> bool {
        value.is_nan()
    }

    /// Reindexes the series onto another index.
    ///
    /// Each timestamp of `other` is looked up in this series' index via
    /// [`DateTimeIndex::locate`]; hits copy the original value, misses
    /// become [`Series::MISSING`]. Aligning a series to its own index is
    /// the identity. This is the basis for joining series with different
    /// sampling.
    pub fn align_to(&self, other: &Arc<DateTimeIndex>) -> Self {
        let values = other
            .iter()
            .map(|ts| match self.index.locate(ts) {
                Some(position) => self.values[position],
                None => Self::MISSING,
            })
            .collect();
        Self {
            key: self.key.clone(),
            index: Arc::clone(other),
            values,
        }
    }
}
