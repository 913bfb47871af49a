//! Time-to-expiry from a valuation timestamp and an expiration date.
//!
//! Both inputs are checked against a fixed pattern before any calendar
//! arithmetic happens, so a format mismatch is reported as such rather than
//! as a parse failure:
//!
//! - valuation: `M/D/YYYY H:MM` (month/day/hour with 1 or 2 digits, year 2000-2099)
//! - expiration: `DD/MM/YYYY`, taken at midnight
//!
//! Years are counted on a fixed 365-day basis with no leap-year adjustment.

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;
use std::sync::OnceLock;
use tracing::warn;

use crate::error::{VolError, VolResult};

/// Seconds in the 365-day year used for every duration
pub const SECONDS_PER_YEAR: f64 = 365.0 * 24.0 * 3600.0;

fn valuation_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"^(0?[1-9]|1[0-2])/(0?[1-9]|[12][0-9]|3[01])/(20[0-9]{2}) (0?[0-9]|1[0-9]|2[0-3]):([0-5][0-9])$",
        )
        .expect("valuation pattern is a valid regex")
    })
}

fn expiration_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^([0-9]{2})/([0-9]{2})/([0-9]{4})$")
            .expect("expiration pattern is a valid regex")
    })
}

/// Whether `value` has the `M/D/YYYY H:MM` shape.
pub fn is_valid_valuation_format(value: &str) -> bool {
    valuation_pattern().is_match(value)
}

/// Whether `value` has the `DD/MM/YYYY` shape.
pub fn is_valid_expiration_format(value: &str) -> bool {
    expiration_pattern().is_match(value)
}

fn field(caps: &regex::Captures<'_>, index: usize) -> u32 {
    // Both patterns capture ASCII digits only (`[0-9]`, not the Unicode-aware `\d`).
    caps[index].parse().unwrap_or(0)
}

/// Parse a valuation timestamp (`M/D/YYYY H:MM`).
pub fn parse_valuation_timestamp(value: &str) -> VolResult<NaiveDateTime> {
    let caps = valuation_pattern()
        .captures(value)
        .ok_or_else(|| VolError::InvalidTimestamp {
            value: value.to_string(),
        })?;

    let (month, day, year) = (field(&caps, 1), field(&caps, 2), field(&caps, 3));
    let (hour, minute) = (field(&caps, 4), field(&caps, 5));

    NaiveDate::from_ymd_opt(year as i32, month, day)
        .and_then(|date| date.and_hms_opt(hour, minute, 0))
        .ok_or_else(|| VolError::InvalidCalendarDate {
            value: value.to_string(),
        })
}

/// Parse an expiration date (`DD/MM/YYYY`) as midnight of that day.
pub fn parse_expiration_date(value: &str) -> VolResult<NaiveDateTime> {
    let caps = expiration_pattern()
        .captures(value)
        .ok_or_else(|| VolError::InvalidExpirationDate {
            value: value.to_string(),
        })?;

    let (day, month, year) = (field(&caps, 1), field(&caps, 2), field(&caps, 3));

    NaiveDate::from_ymd_opt(year as i32, month, day)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| VolError::InvalidCalendarDate {
            value: value.to_string(),
        })
}

/// Fractional years between `valuation` and `expiration`.
///
/// Fails when either string does not match its format, names an impossible
/// date, or when the expiration precedes the valuation. Equal instants give
/// zero.
pub fn years_to_expiry(valuation: &str, expiration: &str) -> VolResult<f64> {
    let result = parse_valuation_timestamp(valuation).and_then(|start| {
        let end = parse_expiration_date(expiration)?;
        if end < start {
            return Err(VolError::ExpirationBeforeValuation {
                valuation: valuation.to_string(),
                expiration: expiration.to_string(),
            });
        }
        let seconds = (end - start).num_seconds() as f64;
        Ok(seconds / SECONDS_PER_YEAR)
    });

    if let Err(err) = &result {
        warn!(valuation, expiration, %err, "time to expiry unavailable");
    }
    result
}
