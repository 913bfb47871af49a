use tracing::{debug, info};

use crate::error::{VolError, VolResult};
use crate::expiry::years_to_expiry;
use crate::models::implied_vol::implied_volatility;
use crate::models::realized_vol::annualized_spread_volatility;
use crate::pipeline::config::PipelineConfig;
use crate::pipeline::types::{mid_price, OptionRecord, PricingInputs, RawQuote, RepairedQuote};
use crate::repair::{repair_missing_values, QuoteColumn};

/// Project one repaired quote into an output record.
///
/// Every failure stays inside the record: a bad timestamp marks the expiry
/// and the implied volatility as unavailable, missing quotes leave the
/// derived prices empty, and the remaining fields are still computed.
pub fn compute_record(quote: &RepairedQuote, config: &PipelineConfig) -> OptionRecord {
    let strike = config.strike_price;

    let years = if quote.created_at.trim().is_empty() {
        Err(VolError::InvalidTimestamp {
            value: quote.created_at.clone(),
        })
    } else {
        years_to_expiry(&quote.created_at, &config.expiration_date)
    };

    let price = mid_price(quote.bid, quote.ask);
    let under_price = mid_price(quote.under_bid, quote.under_ask);

    let under_volatility = match (quote.under_bid, quote.under_ask) {
        (Some(bid), Some(ask)) => {
            annualized_spread_volatility(bid, ask, config.trading_minutes_per_year)
        }
        (None, _) => Err(VolError::MissingQuote {
            field: QuoteColumn::UnderBid.name(),
        }),
        (_, None) => Err(VolError::MissingQuote {
            field: QuoteColumn::UnderAsk.name(),
        }),
    };

    let implied_volatility = solve_row(&years, price, under_price, config);

    let intrinsic_value = under_price.map(|s| s - strike);
    let extrinsic_value = match (price, intrinsic_value) {
        (Some(p), Some(iv)) => Some(p - iv),
        _ => None,
    };

    OptionRecord {
        description: config
            .description
            .clone()
            .unwrap_or_else(|| quote.description.clone()),
        strike,
        kind: config.kind,
        bid: quote.bid,
        ask: quote.ask,
        under_bid: quote.under_bid,
        under_ask: quote.under_ask,
        created_at: quote.created_at.clone(),
        years_to_expiry: years,
        price,
        under_price,
        intrinsic_value,
        extrinsic_value,
        under_volatility,
        implied_volatility,
    }
}

/// Run the solver when the row meets its preconditions: positive time to
/// expiry, positive option price and positive underlying price.
fn solve_row(
    years: &VolResult<f64>,
    price: Option<f64>,
    under_price: Option<f64>,
    config: &PipelineConfig,
) -> VolResult<f64> {
    let years = match years {
        Ok(t) if *t > 0.0 => *t,
        Ok(t) => return Err(VolError::not_priceable(format!("years to expiry is {t}"))),
        Err(err) => return Err(VolError::not_priceable(err.to_string())),
    };
    let price = match price {
        Some(p) if p > 0.0 => p,
        Some(p) => return Err(VolError::not_priceable(format!("option price is {p}"))),
        None => return Err(VolError::not_priceable("option price unavailable")),
    };
    let spot = match under_price {
        Some(s) if s > 0.0 => s,
        Some(s) => return Err(VolError::not_priceable(format!("underlying price is {s}"))),
        None => return Err(VolError::not_priceable("underlying price unavailable")),
    };

    let inputs = PricingInputs::new(spot, config.strike_price, years, config.continuous_rate());
    implied_volatility(&inputs, price, &config.solver).map(|solution| {
        debug!(
            volatility = solution.volatility,
            iterations = solution.iterations,
            "implied volatility"
        );
        solution.volatility
    })
}

/// Compute output records for an already repaired series.
pub fn compute_records(quotes: &[RepairedQuote], config: &PipelineConfig) -> Vec<OptionRecord> {
    let records: Vec<OptionRecord> = quotes.iter().map(|q| compute_record(q, config)).collect();

    let converged = records
        .iter()
        .filter(|r| r.implied_volatility.is_ok())
        .count();
    info!(
        rows = records.len(),
        converged,
        failed = records.len() - converged,
        "computed option records"
    );

    records
}

/// Full pipeline: gap repair followed by per-row computation.
pub fn run_pipeline(raw: &[RawQuote], config: &PipelineConfig) -> Vec<OptionRecord> {
    let repaired = repair_missing_values(raw);
    compute_records(&repaired, config)
}
