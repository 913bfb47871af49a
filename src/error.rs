//! Typed failures of the volatility core.
//!
//! Every fallible numeric computation returns one of these instead of an
//! in-band sentinel, so a legitimate value can never be mistaken for an error.

use thiserror::Error;

/// Result type alias using [`VolError`].
pub type VolResult<T> = std::result::Result<T, VolError>;

/// Row-local failure kinds produced by the core.
///
/// None of these abort a batch: the pipeline stores them in the affected
/// [`OptionRecord`](crate::OptionRecord) fields and moves on.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VolError {
    /// Valuation timestamp does not match `M/D/YYYY H:MM`.
    #[error("invalid valuation timestamp format: {value:?}")]
    InvalidTimestamp { value: String },

    /// Expiration date does not match `DD/MM/YYYY`.
    #[error("invalid expiration date format: {value:?}")]
    InvalidExpirationDate { value: String },

    /// The string matched its pattern but names no real calendar date.
    #[error("not a calendar date: {value:?}")]
    InvalidCalendarDate { value: String },

    /// Expiration lies before the valuation instant.
    #[error("expiration {expiration} precedes valuation {valuation}")]
    ExpirationBeforeValuation {
        valuation: String,
        expiration: String,
    },

    /// A quote field is still absent after gap repair.
    #[error("missing quote field: {field}")]
    MissingQuote { field: &'static str },

    /// Bid or ask cannot enter a logarithm.
    #[error("invalid quote pair: bid={bid}, ask={ask}")]
    InvalidQuote { bid: f64, ask: f64 },

    /// Negative radicand in the spread volatility estimator.
    #[error("negative variance estimate: {radicand}")]
    NegativeVariance { radicand: f64 },

    /// Bisection exhausted its iteration budget.
    #[error("bisection did not converge after {iterations} iterations (last sigma {last_volatility:.6})")]
    NotConverged {
        iterations: usize,
        last_volatility: f64,
    },

    /// Row does not satisfy the solver's preconditions.
    #[error("row not priceable: {reason}")]
    NotPriceable { reason: String },

    /// Only calls are supported.
    #[error("unsupported option kind: {0:?}")]
    UnsupportedKind(String),

    /// Configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl VolError {
    /// Create a not-priceable error.
    pub fn not_priceable(reason: impl Into<String>) -> Self {
        VolError::NotPriceable {
            reason: reason.into(),
        }
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        VolError::InvalidConfig(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = VolError::NotConverged {
            iterations: 500,
            last_volatility: 4.99999,
        };
        assert!(err.to_string().contains("500 iterations"));

        let err = VolError::InvalidTimestamp {
            value: "2023-10-18".to_string(),
        };
        assert!(err.to_string().contains("2023-10-18"));

        let err = VolError::MissingQuote { field: "under_ask" };
        assert_eq!(err.to_string(), "missing quote field: under_ask");

        let err = VolError::not_priceable("years to expiry is zero");
        assert!(err.to_string().contains("years to expiry is zero"));
    }
}
