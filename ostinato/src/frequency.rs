//! Frequencies: rules for stepping a timestamp forward by fixed units.
//!
//! A [`Frequency`] pairs a [`TimeUnit`] with a positive step multiplier and
//! advances timestamps by whole steps. Every supported unit is a fixed-width
//! duration, which makes advancement exactly additive:
//! `advance(advance(t, n), m) == advance(t, n + m)`.
//!
//! Frequencies are immutable values. Validation happens once, at
//! construction; [`Frequency::advance`] can never fail.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::FrequencyError;

const SECONDS_PER_MINUTE: i64 = 60;
const SECONDS_PER_HOUR: i64 = 60 * 60;
const SECONDS_PER_DAY: i64 = 24 * 60 * 60;
const SECONDS_PER_WEEK: i64 = 7 * 24 * 60 * 60;

/// Fixed-width calendar unit for a [`Frequency`].
///
/// Calendar months and years are intentionally absent: end-of-month clamping
/// breaks the additivity guarantee that uniform indexes rely on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    /// One second.
    Seconds,
    /// One minute (60 seconds).
    Minutes,
    /// One hour (3600 seconds).
    Hours,
    /// One day (86400 seconds).
    Days,
    /// One week (604800 seconds).
    Weeks,
}

impl TimeUnit {
    /// Returns the unit width in whole seconds.
    pub const fn seconds(self) -> i64 {
        match self {
            Self::Seconds => 1,
            Self::Minutes => SECONDS_PER_MINUTE,
            Self::Hours => SECONDS_PER_HOUR,
            Self::Days => SECONDS_PER_DAY,
            Self::Weeks => SECONDS_PER_WEEK,
        }
    }

    /// Returns the single-character suffix used in compact notation.
    pub const fn suffix(self) -> char {
        match self {
            Self::Seconds => 's',
            Self::Minutes => 'm',
            Self::Hours => 'h',
            Self::Days => 'd',
            Self::Weeks => 'w',
        }
    }
}

/// A rule for advancing a timestamp by N logical steps.
///
/// Constructed once, immutable, and freely copied. The step multiplier is
/// validated at construction so use sites never re-check it.
///
/// # Examples
///
/// ```rust
/// use ostinato::Frequency;
/// use chrono::{TimeZone, Utc};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let daily = Frequency::days(1)?;
/// let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
/// assert_eq!(daily.advance(t0, 2), Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Frequency {
    unit: TimeUnit,
    step: u32,
}

impl Frequency {
    /// Creates a frequency from a unit and a step multiplier.
    ///
    /// # Errors
    ///
    /// Returns [`FrequencyError::ZeroStep`] if `step` is zero.
    pub fn new(unit: TimeUnit, step: u32) -> Result<Self, FrequencyError> {
        if step == 0 {
            return Err(FrequencyError::ZeroStep { step });
        }
        Ok(Self { unit, step })
    }

    /// Creates a frequency of `step` seconds.
    ///
    /// # Errors
    ///
    /// Returns [`FrequencyError::ZeroStep`] if `step` is zero.
    pub fn seconds(step: u32) -> Result<Self, FrequencyError> {
        Self::new(TimeUnit::Seconds, step)
    }

    /// Creates a frequency of `step` minutes.
    ///
    /// # Errors
    ///
    /// Returns [`FrequencyError::ZeroStep`] if `step` is zero.
    pub fn minutes(step: u32) -> Result<Self, FrequencyError> {
        Self::new(TimeUnit::Minutes, step)
    }

    /// Creates a frequency of `step` hours.
    ///
    /// # Errors
    ///
    /// Returns [`FrequencyError::ZeroStep`] if `step` is zero.
    pub fn hours(step: u32) -> Result<Self, FrequencyError> {
        Self::new(TimeUnit::Hours, step)
    }

    /// Creates a frequency of `step` days.
    ///
    /// # Errors
    ///
    /// Returns [`FrequencyError::ZeroStep`] if `step` is zero.
    pub fn days(step: u32) -> Result<Self, FrequencyError> {
        Self::new(TimeUnit::Days, step)
    }

    /// Creates a frequency of `step` weeks.
    ///
    /// # Errors
    ///
    /// Returns [`FrequencyError::ZeroStep`] if `step` is zero.
    pub fn weeks(step: u32) -> Result<Self, FrequencyError> {
        Self::new(TimeUnit::Weeks, step)
    }

    /// Returns the calendar unit.
    pub const fn unit(&self) -> TimeUnit {
        self.unit
    }

    /// Returns the step multiplier. Always >= 1.
    pub const fn step(&self) -> u32 {
        self.step
    }

    /// Returns the width of one step in whole seconds.
    pub const fn step_seconds(&self) -> i64 {
        self.unit.seconds() * self.step as i64
    }

    /// Returns the duration of one step.
    pub fn duration(&self) -> Duration {
        Duration::seconds(self.step_seconds())
    }

    /// Advances `timestamp` by `n` steps.
    ///
    /// Purely functional and deterministic. Negative `n` steps backwards.
    /// Additivity holds exactly: `advance(advance(t, n), m) == advance(t, n + m)`.
    pub fn advance(&self, timestamp: DateTime<Utc>, n: i64) -> DateTime<Utc> {
        timestamp + Duration::seconds(self.step_seconds() * n)
    }
}

impl Display for Frequency {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.step, self.unit.suffix())
    }
}

impl FromStr for Frequency {
    type Err = FrequencyError;

    /// Parses compact notation: `"10s"`, `"30m"`, `"4h"`, `"1d"`, `"2w"`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let unparseable = || FrequencyError::Unparseable {
            input: value.to_owned(),
        };

        let unit = match trimmed.chars().last() {
            Some('s') => TimeUnit::Seconds,
            Some('m') => TimeUnit::Minutes,
            Some('h') => TimeUnit::Hours,
            Some('d') => TimeUnit::Days,
            Some('w') => TimeUnit::Weeks,
            _ => return Err(unparseable()),
        };
        let digits = &trimmed[..trimmed.len() - 1];
        let step: u32 = digits.parse().map_err(|_| unparseable())?;

        Self::new(unit, step)
    }
}

impl Serialize for Frequency {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Frequency {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::from_str(&value).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn rejects_zero_step() {
        let err = Frequency::days(0).expect_err("must fail");
        assert!(matches!(err, FrequencyError::ZeroStep { step: 0 }));
    }

    #[test]
    fn advance_steps_forward() {
        let daily = Frequency::days(1).unwrap();
        assert_eq!(
            daily.advance(t0(), 3),
            Utc.with_ymd_and_hms(2024, 1, 4, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn advance_zero_is_identity() {
        let hourly = Frequency::hours(6).unwrap();
        assert_eq!(hourly.advance(t0(), 0), t0());
    }

    #[test]
    fn advance_negative_steps_backward() {
        let daily = Frequency::days(1).unwrap();
        assert_eq!(
            daily.advance(t0(), -1),
            Utc.with_ymd_and_hms(2023, 12, 31, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn advance_is_additive() {
        let freqs = [
            Frequency::seconds(7).unwrap(),
            Frequency::minutes(30).unwrap(),
            Frequency::hours(4).unwrap(),
            Frequency::days(1).unwrap(),
            Frequency::weeks(2).unwrap(),
        ];
        for f in freqs {
            for n in 0..5i64 {
                for m in 0..5i64 {
                    assert_eq!(f.advance(f.advance(t0(), n), m), f.advance(t0(), n + m));
                }
            }
        }
    }

    #[test]
    fn step_seconds_scales_with_step() {
        assert_eq!(Frequency::days(2).unwrap().step_seconds(), 2 * 86_400);
        assert_eq!(Frequency::weeks(1).unwrap().step_seconds(), 604_800);
    }

    #[test]
    fn parses_compact_notation() {
        let f: Frequency = "30m".parse().unwrap();
        assert_eq!(f.unit(), TimeUnit::Minutes);
        assert_eq!(f.step(), 30);
        assert_eq!(f.to_string(), "30m");
    }

    #[test]
    fn rejects_bad_notation() {
        for input in ["", "d", "1y", "x5h", "0d", "-1d"] {
            assert!(input.parse::<Frequency>().is_err(), "accepted {input:?}");
        }
    }

    #[test]
    fn serde_round_trips_as_string() {
        let f = Frequency::hours(4).unwrap();
        let json = serde_json::to_string(&f).unwrap();
        assert_eq!(json, "\"4h\"");
        let back: Frequency = serde_json::from_str(&json).unwrap();
        assert_eq!(back, f);
    }
}
