use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::error::{VolError, VolResult};
use crate::expiry::parse_expiration_date;
use crate::pipeline::types::OptionKind;

/// Regular trading session length in minutes (6.5 hours)
pub const SESSION_MINUTES_PER_DAY: f64 = 390.0;

/// Approximate number of trading days per year
pub const TRADING_DAYS_PER_YEAR: f64 = 256.0;

/// Bisection solver configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BisectionConfig {
    /// Lower end of the volatility bracket
    #[serde(default = "default_lower")]
    pub lower: f64,
    /// Upper end of the volatility bracket
    #[serde(default = "default_upper")]
    pub upper: f64,
    /// Absolute price tolerance
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
}

impl Default for BisectionConfig {
    fn default() -> Self {
        Self {
            lower: default_lower(),
            upper: default_upper(),
            tolerance: default_tolerance(),
            max_iterations: default_max_iterations(),
        }
    }
}

impl BisectionConfig {
    /// Tight tolerance with a larger iteration budget
    pub fn precise() -> Self {
        Self {
            tolerance: 1e-9,
            max_iterations: 1000,
            ..Self::default()
        }
    }

    /// Loose tolerance, suited to quick looks at a series
    pub fn fast() -> Self {
        Self {
            tolerance: 1e-3,
            max_iterations: 100,
            ..Self::default()
        }
    }

    pub fn with_bracket(mut self, lower: f64, upper: f64) -> Self {
        self.lower = lower;
        self.upper = upper;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn validate(&self) -> VolResult<()> {
        if !(self.lower.is_finite() && self.upper.is_finite()) || self.lower >= self.upper {
            return Err(VolError::config(format!(
                "bisection bracket [{}, {}] must be finite with lower < upper",
                self.lower, self.upper
            )));
        }
        if self.lower <= 0.0 {
            return Err(VolError::config(format!(
                "bisection lower bound must be positive, got {}",
                self.lower
            )));
        }
        if !(self.tolerance > 0.0) {
            return Err(VolError::config(format!(
                "tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        if self.max_iterations == 0 {
            return Err(VolError::config("max_iterations must be at least 1"));
        }
        Ok(())
    }
}

/// Everything the pipeline needs besides the quotes themselves.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PipelineConfig {
    /// Annual simple risk-free rate (1.0 = 100%); converted with `ln(1 + rf)`
    #[serde(default = "default_risk_free_rate")]
    pub risk_free_rate: f64,

    #[serde(default = "default_strike_price")]
    pub strike_price: f64,

    /// Label written to every output row. `None` keeps each row's own description.
    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub kind: OptionKind,

    /// Expiration date, `DD/MM/YYYY`
    #[serde(default = "default_expiration_date")]
    pub expiration_date: String,

    #[serde(default)]
    pub solver: BisectionConfig,

    /// Annualization factor for the spread volatility estimator
    #[serde(default = "default_trading_minutes_per_year")]
    pub trading_minutes_per_year: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            risk_free_rate: default_risk_free_rate(),
            strike_price: default_strike_price(),
            description: None,
            kind: OptionKind::Call,
            expiration_date: default_expiration_date(),
            solver: BisectionConfig::default(),
            trading_minutes_per_year: default_trading_minutes_per_year(),
        }
    }
}

impl PipelineConfig {
    /// Parse a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s).context("failed to parse pipeline config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("in {}", path.display()))
    }

    pub fn with_solver(mut self, solver: BisectionConfig) -> Self {
        self.solver = solver;
        self
    }

    pub fn with_expiration_date(mut self, date: impl Into<String>) -> Self {
        self.expiration_date = date.into();
        self
    }

    pub fn with_strike(mut self, strike: f64) -> Self {
        self.strike_price = strike;
        self
    }

    pub fn with_risk_free_rate(mut self, rate: f64) -> Self {
        self.risk_free_rate = rate;
        self
    }

    /// Continuously-compounded equivalent of the configured simple rate.
    pub fn continuous_rate(&self) -> f64 {
        self.risk_free_rate.ln_1p()
    }

    pub fn validate(&self) -> VolResult<()> {
        if !(self.risk_free_rate > -1.0) || !self.risk_free_rate.is_finite() {
            return Err(VolError::config(format!(
                "risk-free rate must be finite and greater than -100%, got {}",
                self.risk_free_rate
            )));
        }
        if !(self.strike_price > 0.0) || !self.strike_price.is_finite() {
            return Err(VolError::config(format!(
                "strike price must be positive, got {}",
                self.strike_price
            )));
        }
        if !(self.trading_minutes_per_year > 0.0) {
            return Err(VolError::config(format!(
                "trading minutes per year must be positive, got {}",
                self.trading_minutes_per_year
            )));
        }
        parse_expiration_date(&self.expiration_date)?;
        self.solver.validate()
    }
}

fn default_lower() -> f64 {
    1e-5
}

fn default_upper() -> f64 {
    5.0
}

fn default_tolerance() -> f64 {
    1e-5
}

fn default_max_iterations() -> usize {
    500
}

fn default_risk_free_rate() -> f64 {
    1.0
}

fn default_strike_price() -> f64 {
    1033.0
}

fn default_expiration_date() -> String {
    "20/10/2023".to_string()
}

fn default_trading_minutes_per_year() -> f64 {
    SESSION_MINUTES_PER_DAY * TRADING_DAYS_PER_YEAR
}
