pub mod bs;
pub mod implied_vol;
pub mod realized_vol;

/// Common traits used by the volatility solvers
pub mod traits {
    use crate::pipeline::types::PricingInputs;

    /// A call pricing model that can be inverted for volatility.
    ///
    /// Implementations must be monotonically increasing in `sigma` for the
    /// bisection solver to bracket its root.
    pub trait OptionPricer {
        fn call_price(&self, inputs: &PricingInputs, sigma: f64) -> f64;
    }
}
