//! Quote gap repair
//!
//! Raw quote series arrive with empty or malformed bid/ask cells. This module
//! parses the cells with a locale-tolerant decimal rule and fills the gaps of
//! each column from its neighbours, producing a new series.

pub mod decimal;
pub mod gaps;

pub use decimal::*;
pub use gaps::*;
