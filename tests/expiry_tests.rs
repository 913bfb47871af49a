
use impvol_lib::expiry::{parse_expiration_date, parse_valuation_timestamp, SECONDS_PER_YEAR};
use impvol_lib::{years_to_expiry, VolError};
use test_utils::assert_close;

/// 1 day 11 h 42 min to midnight of the expiration day, on a 365-day year.
#[test]
fn test_sample_timestamp() {
    let years = years_to_expiry("10/18/2023 12:18", "20/10/2023").unwrap();
    assert_close(years, 128_520.0 / SECONDS_PER_YEAR, 1e-15, "years to expiry");
    assert_close(years, 0.004_075_342, 1e-9, "years to expiry");
}

/// Single-digit month, day and hour are accepted.
#[test]
fn test_short_fields() {
    let a = years_to_expiry("1/2/2024 9:05", "03/01/2024").unwrap();
    let b = years_to_expiry("01/02/2024 09:05", "03/01/2024").unwrap();
    assert_eq!(a, b);
    assert_close(a, (14.0 * 3600.0 + 55.0 * 60.0) / SECONDS_PER_YEAR, 1e-15, "short fields");
}

/// No leap-year adjustment: a full leap year counts as 366/365.
#[test]
fn test_fixed_365_day_year() {
    let years = years_to_expiry("1/1/2024 0:00", "01/01/2025").unwrap();
    assert_close(years, 366.0 / 365.0, 1e-12, "leap year");
}

/// Valuation exactly at expiry is zero, not an error.
#[test]
fn test_zero_when_equal() {
    assert_eq!(years_to_expiry("10/20/2023 0:00", "20/10/2023"), Ok(0.0));
}

#[test]
fn test_expiration_before_valuation() {
    assert!(matches!(
        years_to_expiry("10/21/2023 10:00", "20/10/2023"),
        Err(VolError::ExpirationBeforeValuation { .. })
    ));
}

#[test]
fn test_malformed_inputs() {
    assert!(matches!(
        years_to_expiry("2023-10-19 17:00", "20/10/2023"),
        Err(VolError::InvalidTimestamp { .. })
    ));
    assert!(matches!(
        years_to_expiry("", "20/10/2023"),
        Err(VolError::InvalidTimestamp { .. })
    ));
    assert!(matches!(
        years_to_expiry("10/18/2023 12:18", "2023-10-20"),
        Err(VolError::InvalidExpirationDate { .. })
    ));
    assert!(matches!(
        years_to_expiry("10/18/2023 12:18", "30/02/2024"),
        Err(VolError::InvalidCalendarDate { .. })
    ));
}

/// Only ASCII digits are accepted; other Unicode digits are a format error.
#[test]
fn test_non_ascii_digits_are_a_format_error() {
    assert!(matches!(
        years_to_expiry("10/18/2023 12:18", "٢٠/١٠/٢٠٢٣"),
        Err(VolError::InvalidExpirationDate { .. })
    ));
    assert!(matches!(
        years_to_expiry("١٠/١٨/٢٠٢٣ ١٢:١٨", "20/10/2023"),
        Err(VolError::InvalidTimestamp { .. })
    ));
}

#[test]
fn test_parsed_instants() {
    let valuation = parse_valuation_timestamp("10/18/2023 12:18").unwrap();
    assert_eq!(valuation.to_string(), "2023-10-18 12:18:00");

    let expiration = parse_expiration_date("20/10/2023").unwrap();
    assert_eq!(expiration.to_string(), "2023-10-20 00:00:00");
}
