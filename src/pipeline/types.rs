use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{VolError, VolResult};

/// Option kind. Only European calls are priced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OptionKind {
    #[default]
    Call,
}

impl OptionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OptionKind::Call => "CALL",
        }
    }
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OptionKind {
    type Err = VolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "CALL" => Ok(OptionKind::Call),
            _ => Err(VolError::UnsupportedKind(s.to_string())),
        }
    }
}

/// One time sample as handed over by ingestion, quote fields still raw text.
///
/// Quote fields may use a comma as decimal separator and may be empty or
/// malformed; see [`parse_decimal`](crate::repair::parse_decimal).
#[derive(Debug, Clone, PartialEq)]
pub struct RawQuote {
    /// Instrument label, e.g. `GFGC1033OC`
    pub description: String,
    /// Strike as it appears in the source
    pub strike: String,
    pub kind: OptionKind,
    pub bid: String,
    pub ask: String,
    pub under_bid: String,
    pub under_ask: String,
    /// Valuation timestamp, `M/D/YYYY H:MM`
    pub created_at: String,
}

/// A quote after gap repair. `None` means the field could not be recovered.
#[derive(Debug, Clone, PartialEq)]
pub struct RepairedQuote {
    pub description: String,
    pub strike: String,
    pub kind: OptionKind,
    pub bid: Option<f64>,
    pub ask: Option<f64>,
    pub under_bid: Option<f64>,
    pub under_ask: Option<f64>,
    pub created_at: String,
}

/// Inputs to a European call price, everything except volatility.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricingInputs {
    /// Underlying price S
    pub spot: f64,
    /// Strike price K
    pub strike: f64,
    /// Time to expiry T in years
    pub years_to_expiry: f64,
    /// Continuously-compounded risk-free rate r
    pub rate: f64,
}

impl PricingInputs {
    pub fn new(spot: f64, strike: f64, years_to_expiry: f64, rate: f64) -> Self {
        Self {
            spot,
            strike,
            years_to_expiry,
            rate,
        }
    }
}

/// Fully computed output row.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionRecord {
    pub description: String,
    pub strike: f64,
    pub kind: OptionKind,
    pub bid: Option<f64>,
    pub ask: Option<f64>,
    pub under_bid: Option<f64>,
    pub under_ask: Option<f64>,
    pub created_at: String,
    /// Fractional years between `created_at` and the configured expiration
    pub years_to_expiry: VolResult<f64>,
    /// Option mid-price
    pub price: Option<f64>,
    /// Underlying mid-price
    pub under_price: Option<f64>,
    /// `under_price - strike`
    pub intrinsic_value: Option<f64>,
    /// `price - intrinsic_value`
    pub extrinsic_value: Option<f64>,
    /// Annualized spread volatility of the underlying
    pub under_volatility: VolResult<f64>,
    pub implied_volatility: VolResult<f64>,
}

impl OptionRecord {
    /// Implied minus underlying volatility, when both are available.
    pub fn volatility_premium(&self) -> Option<f64> {
        match (&self.implied_volatility, &self.under_volatility) {
            (Ok(iv), Ok(uv)) => Some(iv - uv),
            _ => None,
        }
    }
}

/// Arithmetic mean of a bid/ask pair.
pub fn mid_price(bid: Option<f64>, ask: Option<f64>) -> Option<f64> {
    Some((bid? + ask?) / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_kind_parsing() {
        assert_eq!("CALL".parse::<OptionKind>(), Ok(OptionKind::Call));
        assert_eq!(" call ".parse::<OptionKind>(), Ok(OptionKind::Call));
        assert!(matches!(
            "PUT".parse::<OptionKind>(),
            Err(VolError::UnsupportedKind(_))
        ));
    }

    #[test]
    fn test_mid_price() {
        assert_eq!(mid_price(Some(130.0), Some(178.0)), Some(154.0));
        assert_eq!(mid_price(None, Some(178.0)), None);
    }
}
