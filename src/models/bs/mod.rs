// Black-Scholes pricing of a European call on a non-dividend-paying
// underlying. Inputs are not validated: T <= 0 or sigma <= 0 give IEEE-754
// NaN/inf and must be screened by the caller.

use crate::models::traits::OptionPricer;
use crate::pipeline::types::PricingInputs;

/// Standard normal CDF: 0.5 * [1 + erf(x / sqrt(2))]
pub fn norm_cdf(x: f64) -> f64 {
    0.5 * (1.0 + libm::erf(x / std::f64::consts::SQRT_2))
}

/// d1 and d2 of the Black-Scholes formula.
#[allow(non_snake_case)]
pub fn d1_d2(S: f64, K: f64, T: f64, r: f64, sigma: f64) -> (f64, f64) {
    let vol_sqrt_t = sigma * T.sqrt();
    let d1 = ((S / K).ln() + (r + 0.5 * sigma * sigma) * T) / vol_sqrt_t;
    (d1, d1 - vol_sqrt_t)
}

/// Price of a European call option under Black-Scholes assumptions.
#[allow(non_snake_case)]
pub fn bs_call_price(S: f64, K: f64, T: f64, r: f64, sigma: f64) -> f64 {
    let (d1, d2) = d1_d2(S, K, T, r, sigma);
    S * norm_cdf(d1) - K * (-r * T).exp() * norm_cdf(d2)
}

/// Black-Scholes call pricer for use with the implied volatility solver.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlackScholes;

impl OptionPricer for BlackScholes {
    fn call_price(&self, inputs: &PricingInputs, sigma: f64) -> f64 {
        bs_call_price(
            inputs.spot,
            inputs.strike,
            inputs.years_to_expiry,
            inputs.rate,
            sigma,
        )
    }
}
