//! Implied volatility by bisection
//!
//! The Black-Scholes call price is strictly increasing in volatility, so a
//! bracketing interval can be halved until the model price matches the
//! observed market price. Bisection is slower than Newton steps but needs no
//! vega and cannot diverge; its cost is bounded by the iteration budget.

pub mod solver;

pub use solver::*;
