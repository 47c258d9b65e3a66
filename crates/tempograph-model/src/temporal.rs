//! # Temporal Types — UTC-Only Instants and Bitemporal Keys
//!
//! Defines `Timestamp`, a UTC-only wall-clock instant with millisecond
//! precision, and `TemporalKey`, the validity window of a bitemporal record.
//!
//! ## Round-Trip Invariant
//!
//! A temporal key attached to a serialized representation must come back
//! byte-identical: no timezone normalization drift, no precision loss.
//! `Timestamp` enforces this structurally — every constructor truncates to
//! milliseconds (the precision the wire format carries), and rendering is
//! always UTC with a `Z` suffix, so `parse(to_iso8601(t)) == t` holds for
//! every `Timestamp`.
//!
//! Non-UTC inputs are converted to UTC at construction; after that point a
//! `Timestamp` has exactly one textual form.

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// A UTC-only instant, truncated to millisecond precision.
///
/// # Construction
///
/// - [`Timestamp::from_utc()`] — from a `DateTime<Utc>`, truncating sub-milliseconds.
/// - [`Timestamp::parse()`] — from an RFC 3339 string, converting any offset to UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a timestamp from a `chrono::DateTime<Utc>`, truncating
    /// sub-millisecond components.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(truncate_to_millis(dt))
    }

    /// Parse a timestamp from an RFC 3339 string.
    ///
    /// Offsets other than `Z` are accepted and converted to UTC; the stored
    /// instant is always UTC. Sub-millisecond digits are truncated.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::BadTimestamp`] if the string is not valid RFC 3339.
    pub fn parse(s: &str) -> Result<Self, ModelError> {
        let dt = DateTime::parse_from_rfc3339(s).map_err(|e| ModelError::BadTimestamp {
            input: s.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self(truncate_to_millis(dt.with_timezone(&Utc))))
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Render as ISO 8601 with millisecond precision and `Z` suffix,
    /// e.g. `2026-01-15T12:00:00.000Z`.
    ///
    /// This is the one canonical textual form; `parse` of this output
    /// reproduces the identical `Timestamp`.
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

/// Truncate a `DateTime<Utc>` to millisecond precision.
fn truncate_to_millis(dt: DateTime<Utc>) -> DateTime<Utc> {
    let millis = dt.nanosecond() / 1_000_000 * 1_000_000;
    dt.with_nanosecond(millis).unwrap_or(dt)
}

/// The bitemporal validity window of a domain object: zero, one, or two
/// independent date dimensions.
///
/// `business_date` is the date along which the record is effective in the
/// business domain; `processing_date` is the date the system recorded it.
/// Objects without temporal dimensions carry the empty key.
///
/// A `TemporalKey` is immutable once attached to an object identity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TemporalKey {
    /// Business effective date, if the object has a business dimension.
    pub business_date: Option<Timestamp>,
    /// System processing date, if the object has a processing dimension.
    pub processing_date: Option<Timestamp>,
}

impl TemporalKey {
    /// The empty key, for objects with no temporal dimension.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A key with only a business dimension.
    pub fn business(business_date: Timestamp) -> Self {
        Self {
            business_date: Some(business_date),
            processing_date: None,
        }
    }

    /// A key with only a processing dimension.
    pub fn processing(processing_date: Timestamp) -> Self {
        Self {
            business_date: None,
            processing_date: Some(processing_date),
        }
    }

    /// A full bitemporal key.
    pub fn bitemporal(business_date: Timestamp, processing_date: Timestamp) -> Self {
        Self {
            business_date: Some(business_date),
            processing_date: Some(processing_date),
        }
    }

    /// True if the key carries no temporal dimension at all.
    pub fn is_empty(&self) -> bool {
        self.business_date.is_none() && self.processing_date.is_none()
    }
}

impl std::fmt::Display for TemporalKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.business_date, &self.processing_date) {
            (None, None) => Ok(()),
            (Some(b), None) => write!(f, "b={b}"),
            (None, Some(p)) => write!(f, "p={p}"),
            (Some(b), Some(p)) => write!(f, "b={b},p={p}"),
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Every timestamp survives a render/parse cycle unchanged.
        #[test]
        fn iso8601_round_trip(secs in 0i64..4_102_444_800i64, millis in 0u32..1000) {
            let dt = DateTime::from_timestamp(secs, millis * 1_000_000).unwrap();
            let ts = Timestamp::from_utc(dt);
            let parsed = Timestamp::parse(&ts.to_iso8601()).unwrap();
            prop_assert_eq!(parsed, ts);
        }
    }
}
