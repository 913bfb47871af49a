use tracing::{trace, warn};

use crate::error::{VolError, VolResult};
use crate::models::bs::BlackScholes;
use crate::models::traits::OptionPricer;
use crate::pipeline::config::BisectionConfig;
use crate::pipeline::types::PricingInputs;

/// A converged implied volatility
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IvSolution {
    pub volatility: f64,
    /// Bisection steps taken, counting the converging one
    pub iterations: usize,
}

/// Where the target price falls relative to the prices at the bracket ends
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BracketViolation {
    /// Target is below the price at the lower bound
    BelowLower { target: f64, price_at_lower: f64 },
    /// Target is above the price at the upper bound
    AboveUpper { target: f64, price_at_upper: f64 },
}

/// Check that `target` lies between the model prices at both bracket ends.
///
/// The solver never acts on this; it only reports it.
pub fn check_bracket<P: OptionPricer>(
    pricer: &P,
    inputs: &PricingInputs,
    target: f64,
    config: &BisectionConfig,
) -> Option<BracketViolation> {
    let price_at_lower = pricer.call_price(inputs, config.lower);
    let price_at_upper = pricer.call_price(inputs, config.upper);

    if target < price_at_lower {
        Some(BracketViolation::BelowLower {
            target,
            price_at_lower,
        })
    } else if target > price_at_upper {
        Some(BracketViolation::AboveUpper {
            target,
            price_at_upper,
        })
    } else {
        None
    }
}

/// Invert `pricer` for volatility by bisection on `[config.lower, config.upper]`.
///
/// Each step prices the midpoint `p`; it returns `p` as soon as the price is
/// within `config.tolerance` of `target`, otherwise moves the lower end up
/// when the target is above the midpoint price and the upper end down when
/// it is not. After `config.max_iterations` steps without convergence the
/// result is [`VolError::NotConverged`].
///
/// The bracket is a precondition: a target outside the achievable price range
/// drives the search to a bound and ends in `NotConverged`. Inputs are not
/// validated here.
pub fn solve_bisection<P: OptionPricer>(
    pricer: &P,
    inputs: &PricingInputs,
    target: f64,
    config: &BisectionConfig,
) -> VolResult<IvSolution> {
    if let Some(violation) = check_bracket(pricer, inputs, target, config) {
        warn!(
            ?violation,
            lower = config.lower,
            upper = config.upper,
            "target price not bracketed by volatility bounds"
        );
    }

    let (mut a, mut b) = (config.lower, config.upper);
    let mut p = (a + b) / 2.0;

    for i in 0..config.max_iterations {
        p = (a + b) / 2.0;
        let price = pricer.call_price(inputs, p);

        if (price - target).abs() < config.tolerance {
            trace!(volatility = p, iterations = i + 1, "bisection converged");
            return Ok(IvSolution {
                volatility: p,
                iterations: i + 1,
            });
        }

        if target > price {
            a = p;
        } else {
            b = p;
        }
    }

    Err(VolError::NotConverged {
        iterations: config.max_iterations,
        last_volatility: p,
    })
}

/// Black-Scholes implied volatility of a call.
pub fn implied_volatility(
    inputs: &PricingInputs,
    market_price: f64,
    config: &BisectionConfig,
) -> VolResult<IvSolution> {
    solve_bisection(&BlackScholes, inputs, market_price, config)
}

/// Positional form: spot, strike, years, continuous rate, market price,
/// bracket, tolerance and iteration budget.
#[allow(clippy::too_many_arguments)]
pub fn find_implied_volatility(
    spot: f64,
    strike: f64,
    years_to_expiry: f64,
    rate: f64,
    market_price: f64,
    lower: f64,
    upper: f64,
    tolerance: f64,
    max_iterations: usize,
) -> VolResult<f64> {
    let inputs = PricingInputs::new(spot, strike, years_to_expiry, rate);
    let config = BisectionConfig {
        lower,
        upper,
        tolerance,
        max_iterations,
    };
    implied_volatility(&inputs, market_price, &config).map(|s| s.volatility)
}
