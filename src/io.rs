//! CSV ingestion and output.
//!
//! Input files are `;`-delimited with a header line and the columns
//! `description;strike;kind;bid;ask;under_bid;under_ask;created_at`, quote
//! cells possibly using a decimal comma. Output is the fixed 15-column,
//! comma-delimited layout below; numbers carry no trailing `.0` and unavailable
//! numeric cells are written as `-1`.

use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use serde::{Serialize, Serializer};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::warn;

use crate::error::VolResult;
use crate::pipeline::types::{OptionKind, OptionRecord, RawQuote};

/// Value written in place of an unavailable number
pub const MISSING_VALUE: f64 = -1.0;

/// Column headers of the output file, in order
pub const OUTPUT_HEADER: [&str; 15] = [
    "Description",
    "Strike",
    "Kind",
    "Bid",
    "Ask",
    "Under Bid",
    "Under Ask",
    "Created At",
    "Price",
    "Valor intrinsico",
    "Valor extrinsico",
    "Under Price",
    "Implied volatility",
    "Under volatility",
    "Years to expiration",
];

const INPUT_FIELDS: usize = 8;

fn quote_from_record(record: &StringRecord) -> Option<VolResult<RawQuote>> {
    if record.len() < INPUT_FIELDS {
        return None;
    }
    let cell = |i: usize| record.get(i).unwrap_or_default().to_string();

    Some(cell(2).parse::<OptionKind>().map(|kind| RawQuote {
        description: cell(0),
        strike: cell(1),
        kind,
        bid: cell(3),
        ask: cell(4),
        under_bid: cell(5),
        under_ask: cell(6),
        created_at: cell(7),
    }))
}

/// Read raw quotes from any reader. The first line is a header.
///
/// Lines with fewer than eight fields or an unsupported option kind are
/// skipped with a warning.
pub fn read_raw_quotes_from_reader<R: Read>(reader: R) -> Result<Vec<RawQuote>> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut quotes = Vec::new();
    for (line, result) in rdr.records().enumerate() {
        let record = result.with_context(|| format!("failed to read quote line {}", line + 2))?;
        match quote_from_record(&record) {
            Some(Ok(quote)) => quotes.push(quote),
            Some(Err(err)) => warn!(line = line + 2, %err, "skipping quote line"),
            None => warn!(
                line = line + 2,
                fields = record.len(),
                "skipping short quote line"
            ),
        }
    }
    Ok(quotes)
}

/// Read raw quotes from a `;`-delimited file.
pub fn read_raw_quotes(path: impl AsRef<Path>) -> Result<Vec<RawQuote>> {
    let path = path.as_ref();
    let file =
        File::open(path).with_context(|| format!("failed to open quote file {}", path.display()))?;
    read_raw_quotes_from_reader(file).with_context(|| format!("in {}", path.display()))
}

/// Flat, serializable form of an [`OptionRecord`]
#[derive(Debug, Clone, Serialize)]
pub struct OutputRow {
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Strike", serialize_with = "plain_number")]
    pub strike: f64,
    #[serde(rename = "Kind")]
    pub kind: OptionKind,
    #[serde(rename = "Bid", serialize_with = "plain_number")]
    pub bid: f64,
    #[serde(rename = "Ask", serialize_with = "plain_number")]
    pub ask: f64,
    #[serde(rename = "Under Bid", serialize_with = "plain_number")]
    pub under_bid: f64,
    #[serde(rename = "Under Ask", serialize_with = "plain_number")]
    pub under_ask: f64,
    #[serde(rename = "Created At")]
    pub created_at: String,
    #[serde(rename = "Price", serialize_with = "plain_number")]
    pub price: f64,
    #[serde(rename = "Valor intrinsico", serialize_with = "plain_number")]
    pub intrinsic_value: f64,
    #[serde(rename = "Valor extrinsico", serialize_with = "plain_number")]
    pub extrinsic_value: f64,
    #[serde(rename = "Under Price", serialize_with = "plain_number")]
    pub under_price: f64,
    #[serde(rename = "Implied volatility", serialize_with = "plain_number")]
    pub implied_volatility: f64,
    #[serde(rename = "Under volatility", serialize_with = "plain_number")]
    pub under_volatility: f64,
    #[serde(rename = "Years to expiration", serialize_with = "plain_number")]
    pub years_to_expiry: f64,
}

/// Numbers are written in plain decimal notation: `1033`, `-1`, `0.3918931004844211`.
fn plain_number<S>(value: &f64, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(value)
}

fn or_missing(value: Option<f64>) -> f64 {
    value.unwrap_or(MISSING_VALUE)
}

impl From<&OptionRecord> for OutputRow {
    fn from(r: &OptionRecord) -> Self {
        OutputRow {
            description: r.description.clone(),
            strike: r.strike,
            kind: r.kind,
            bid: or_missing(r.bid),
            ask: or_missing(r.ask),
            under_bid: or_missing(r.under_bid),
            under_ask: or_missing(r.under_ask),
            created_at: r.created_at.clone(),
            price: or_missing(r.price),
            intrinsic_value: or_missing(r.intrinsic_value),
            extrinsic_value: or_missing(r.extrinsic_value),
            under_price: or_missing(r.under_price),
            implied_volatility: or_missing(r.implied_volatility.as_ref().ok().copied()),
            under_volatility: or_missing(r.under_volatility.as_ref().ok().copied()),
            years_to_expiry: or_missing(r.years_to_expiry.as_ref().ok().copied()),
        }
    }
}

/// Write records to any writer, header first.
pub fn write_option_records_to_writer<W: Write>(writer: W, records: &[OptionRecord]) -> Result<()> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(OUTPUT_HEADER)?;
    for record in records {
        wtr.serialize(OutputRow::from(record))?;
    }
    wtr.flush().context("failed to flush option records")?;
    Ok(())
}

/// Write records to a CSV file.
pub fn write_option_records(path: impl AsRef<Path>, records: &[OptionRecord]) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)
        .with_context(|| format!("failed to create output file {}", path.display()))?;
    write_option_records_to_writer(file, records).with_context(|| format!("in {}", path.display()))
}
