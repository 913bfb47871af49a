//! Spread-based volatility of the underlying
//!
//! A single-period Garman-Klass estimator that uses the bid as the low/open
//! proxy and the ask as the high/close proxy:
//!
//! ```text
//! l     = ln(bid) - ln(ask)
//! raw   = sqrt(0.5 * l^2 - (2 ln 2 - 1) * l^2)
//! sigma = raw * sqrt(trading minutes per year)
//! ```

use crate::error::{VolError, VolResult};
use crate::pipeline::config::{SESSION_MINUTES_PER_DAY, TRADING_DAYS_PER_YEAR};

/// Default annualization factor: 390 session minutes x 256 trading days
pub const TRADING_MINUTES_PER_YEAR: f64 = SESSION_MINUTES_PER_DAY * TRADING_DAYS_PER_YEAR;

/// Per-period (unannualized) estimate.
///
/// Bid and ask must be positive and finite. A negative radicand is reported
/// as [`VolError::NegativeVariance`] rather than turned into NaN.
pub fn garman_klass_raw(bid: f64, ask: f64) -> VolResult<f64> {
    if !(bid > 0.0 && ask > 0.0 && bid.is_finite() && ask.is_finite()) {
        return Err(VolError::InvalidQuote { bid, ask });
    }

    let log_diff = bid.ln() - ask.ln();
    let sq = log_diff * log_diff;
    let term1 = 0.5 * sq;
    let term2 = (2.0 * std::f64::consts::LN_2 - 1.0) * sq;
    let radicand = term1 - term2;

    // NaN fails this test as well
    if !(radicand >= 0.0) {
        return Err(VolError::NegativeVariance { radicand });
    }
    Ok(radicand.sqrt())
}

/// Annualized spread volatility.
pub fn annualized_spread_volatility(
    bid: f64,
    ask: f64,
    trading_minutes_per_year: f64,
) -> VolResult<f64> {
    Ok(garman_klass_raw(bid, ask)? * trading_minutes_per_year.sqrt())
}
