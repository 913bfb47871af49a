//! Descriptive statistics over a computed batch.

use statrs::statistics::Statistics;
use std::fmt;

use crate::pipeline::types::OptionRecord;

/// Mean and dispersion of one series, over its available values only
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesStats {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; NaN with fewer than two values
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl SeriesStats {
    /// `None` when `values` is empty.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        Some(Self {
            count: values.len(),
            mean: values.mean(),
            std_dev: values.std_dev(),
            min: values.min(),
            max: values.max(),
        })
    }
}

/// Batch-level view of a pipeline run
#[derive(Debug, Clone, PartialEq)]
pub struct VolatilitySummary {
    pub rows: usize,
    /// Rows whose implied volatility converged
    pub converged: usize,
    pub implied: Option<SeriesStats>,
    pub underlying: Option<SeriesStats>,
    /// Implied minus underlying volatility, on rows that have both
    pub premium: Option<SeriesStats>,
}

impl VolatilitySummary {
    pub fn from_records(records: &[OptionRecord]) -> Self {
        let implied: Vec<f64> = records
            .iter()
            .filter_map(|r| r.implied_volatility.as_ref().ok().copied())
            .collect();
        let underlying: Vec<f64> = records
            .iter()
            .filter_map(|r| r.under_volatility.as_ref().ok().copied())
            .collect();
        let premium: Vec<f64> = records
            .iter()
            .filter_map(OptionRecord::volatility_premium)
            .collect();

        Self {
            rows: records.len(),
            converged: implied.len(),
            implied: SeriesStats::from_values(&implied),
            underlying: SeriesStats::from_values(&underlying),
            premium: SeriesStats::from_values(&premium),
        }
    }
}

fn write_stats(f: &mut fmt::Formatter<'_>, label: &str, stats: &Option<SeriesStats>) -> fmt::Result {
    match stats {
        Some(s) => writeln!(
            f,
            "  {label:<12} n={:<5} mean={:.4} sd={:.4} min={:.4} max={:.4}",
            s.count, s.mean, s.std_dev, s.min, s.max
        ),
        None => writeln!(f, "  {label:<12} n=0"),
    }
}

impl fmt::Display for VolatilitySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} rows, {} with implied volatility",
            self.rows, self.converged
        )?;
        write_stats(f, "implied", &self.implied)?;
        write_stats(f, "underlying", &self.underlying)?;
        write_stats(f, "premium", &self.premium)
    }
}
