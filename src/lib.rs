//! # impvol-lib: Implied Volatility from Quote Series
//!
//! `impvol-lib` turns a chronologically ordered series of option and
//! underlying bid/ask quotes into per-sample implied volatilities, next to a
//! spread-based estimate of the underlying's own volatility.
//!
//! ## Core Features
//!
//! - **Gap repair**: missing or malformed quote cells are filled from their
//!   neighbours (boundary carry, interior averaging)
//! - **Black-Scholes inversion**: European call implied volatility by bisection
//! - **Spread volatility**: Garman-Klass style estimator on bid/ask, annualized
//!   by trading minutes
//! - **Explicit failures**: every row-level problem is a [`VolError`] kept in
//!   the record, never a magic number, and never aborts the batch
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use impvol_lib::{compute_option_records, default_configs, io, VolatilitySummary};
//!
//! let quotes = io::read_raw_quotes("Exp_Octubre.csv")?;
//! let config = default_configs::standard().with_expiration_date("20/10/2023");
//!
//! let records = compute_option_records(&quotes, &config)?;
//! io::write_option_records("output.csv", &records)?;
//! println!("{}", VolatilitySummary::from_records(&records));
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Configuration Presets
//!
//! - `standard()`: bracket [1e-5, 5], tolerance 1e-5, 500 iterations
//! - `precise()`: tolerance 1e-9, 1000 iterations
//! - `fast()`: tolerance 1e-3, 100 iterations

// ================================================================================================
// MODULES
// ================================================================================================

pub mod error;
pub mod expiry;
pub mod io;
pub mod models;
pub mod pipeline;
pub mod plot;
pub mod repair;
pub mod summary;

// ================================================================================================
// IMPORTS
// ================================================================================================

use anyhow::Result;

// ================================================================================================
// PUBLIC RE-EXPORTS
// ================================================================================================

pub use error::{VolError, VolResult};

// Records and configuration
pub use pipeline::{
    config::{BisectionConfig, PipelineConfig},
    driver::{compute_record, compute_records, run_pipeline},
    types::{OptionKind, OptionRecord, PricingInputs, RawQuote, RepairedQuote},
};

// Numerical building blocks
pub use expiry::years_to_expiry;
pub use models::bs::{bs_call_price, BlackScholes};
pub use models::implied_vol::{
    check_bracket, find_implied_volatility, implied_volatility, solve_bisection,
    BracketViolation, IvSolution,
};
pub use models::realized_vol::{
    annualized_spread_volatility, garman_klass_raw, TRADING_MINUTES_PER_YEAR,
};
pub use models::traits::OptionPricer;
pub use repair::{fill_gaps, parse_decimal, repair_missing_values, repair_series};
pub use summary::{SeriesStats, VolatilitySummary};

// ================================================================================================
// DEFAULT CONFIGURATIONS
// ================================================================================================

/// Pre-configured pipeline settings.
///
/// All presets share the market constants of [`PipelineConfig::default()`]
/// (100% simple annual rate, strike 1033, 390 x 256 trading minutes) and
/// differ only in the bisection settings. Override the market constants
/// with the `with_*` builders.
pub mod default_configs {
    use crate::pipeline::config::{BisectionConfig, PipelineConfig};

    /// Bracket [1e-5, 5], price tolerance 1e-5, at most 500 iterations.
    ///
    /// # Example
    ///
    /// ```rust
    /// use impvol_lib::default_configs;
    ///
    /// let config = default_configs::standard();
    /// assert_eq!(config.solver.max_iterations, 500);
    /// ```
    pub fn standard() -> PipelineConfig {
        PipelineConfig::default()
    }

    /// Price tolerance 1e-9 with up to 1000 iterations.
    pub fn precise() -> PipelineConfig {
        PipelineConfig::default().with_solver(BisectionConfig::precise())
    }

    /// Price tolerance 1e-3 with up to 100 iterations.
    pub fn fast() -> PipelineConfig {
        PipelineConfig::default().with_solver(BisectionConfig::fast())
    }
}

/// Repair a raw quote series and compute one [`OptionRecord`] per quote.
///
/// The configuration is validated first; that is the only failure. Row-level
/// problems (bad timestamps, missing quotes, non-convergence) are recorded in
/// the affected fields and the row is kept.
///
/// # Example
///
/// ```rust
/// use impvol_lib::{compute_option_records, default_configs, OptionKind, RawQuote};
///
/// let quote = RawQuote {
///     description: "GFGC1033OC".into(),
///     strike: "1033".into(),
///     kind: OptionKind::Call,
///     bid: "130".into(),
///     ask: "178,999".into(),
///     under_bid: "1180,5".into(),
///     under_ask: "1184,85".into(),
///     created_at: "10/18/2023 12:18".into(),
/// };
///
/// let records = compute_option_records(&[quote], &default_configs::standard())?;
/// assert!(records[0].implied_volatility.is_ok());
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn compute_option_records(
    quotes: &[RawQuote],
    config: &PipelineConfig,
) -> Result<Vec<OptionRecord>> {
    config.validate()?;
    Ok(run_pipeline(quotes, config))
}
