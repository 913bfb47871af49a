use tracing::debug;

use super::decimal::parse_decimal;
use crate::pipeline::types::{RawQuote, RepairedQuote};

/// The four quote columns that go through gap repair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteColumn {
    Bid,
    Ask,
    UnderBid,
    UnderAsk,
}

impl QuoteColumn {
    pub const ALL: [QuoteColumn; 4] = [
        QuoteColumn::Bid,
        QuoteColumn::Ask,
        QuoteColumn::UnderBid,
        QuoteColumn::UnderAsk,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            QuoteColumn::Bid => "bid",
            QuoteColumn::Ask => "ask",
            QuoteColumn::UnderBid => "under_bid",
            QuoteColumn::UnderAsk => "under_ask",
        }
    }

    pub fn get(&self, quote: &RepairedQuote) -> Option<f64> {
        match self {
            QuoteColumn::Bid => quote.bid,
            QuoteColumn::Ask => quote.ask,
            QuoteColumn::UnderBid => quote.under_bid,
            QuoteColumn::UnderAsk => quote.under_ask,
        }
    }

    fn set(&self, quote: &mut RepairedQuote, value: Option<f64>) {
        match self {
            QuoteColumn::Bid => quote.bid = value,
            QuoteColumn::Ask => quote.ask = value,
            QuoteColumn::UnderBid => quote.under_bid = value,
            QuoteColumn::UnderAsk => quote.under_ask = value,
        }
    }
}

/// Fill the gaps of one ordered column.
///
/// 1. A missing first value takes the first valid value after it.
/// 2. A missing last value takes the nearest valid value before it.
/// 3. A missing interior value takes the mean of the nearest valid values on
///    each side (earlier fills included); with one side empty it stays missing.
///
/// Boundaries are settled before the interior, so whenever the column holds
/// at least one value every gap gets filled and a second pass changes nothing.
/// A column with no value at all is returned unchanged.
pub fn fill_gaps(series: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut filled = series.to_vec();
    let n = filled.len();
    if n == 0 {
        return filled;
    }

    if filled[0].is_none() {
        filled[0] = filled[1..].iter().find_map(|v| *v);
    }

    let last = n - 1;
    if filled[last].is_none() {
        filled[last] = filled[..last].iter().rev().find_map(|v| *v);
    }

    for i in 1..last {
        if filled[i].is_some() {
            continue;
        }
        let lower = filled[..=i].iter().rev().find_map(|v| *v);
        let upper = filled[i..].iter().find_map(|v| *v);
        if let (Some(lower), Some(upper)) = (lower, upper) {
            filled[i] = Some((lower + upper) / 2.0);
        }
    }

    filled
}

/// Repair every quote column of an ordered series, returning a new series.
pub fn repair_series(quotes: &[RepairedQuote]) -> Vec<RepairedQuote> {
    let mut repaired = quotes.to_vec();

    for column in QuoteColumn::ALL {
        let original: Vec<Option<f64>> = quotes.iter().map(|q| column.get(q)).collect();
        let filled = fill_gaps(&original);

        let gaps = original.iter().filter(|v| v.is_none()).count();
        let remaining = filled.iter().filter(|v| v.is_none()).count();
        if gaps > 0 {
            debug!(
                column = column.name(),
                gaps,
                filled = gaps - remaining,
                remaining,
                "repaired quote column"
            );
        }

        for (quote, value) in repaired.iter_mut().zip(filled) {
            column.set(quote, value);
        }
    }

    repaired
}

impl From<&RawQuote> for RepairedQuote {
    fn from(raw: &RawQuote) -> Self {
        RepairedQuote {
            description: raw.description.clone(),
            strike: raw.strike.clone(),
            kind: raw.kind,
            bid: parse_decimal(&raw.bid),
            ask: parse_decimal(&raw.ask),
            under_bid: parse_decimal(&raw.under_bid),
            under_ask: parse_decimal(&raw.under_ask),
            created_at: raw.created_at.clone(),
        }
    }
}

/// Parse the raw quote fields and repair the gaps.
pub fn repair_missing_values(raw: &[RawQuote]) -> Vec<RepairedQuote> {
    let parsed: Vec<RepairedQuote> = raw.iter().map(RepairedQuote::from).collect();
    repair_series(&parsed)
}
