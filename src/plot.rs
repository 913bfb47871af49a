//! SVG charts of a computed batch.
//!
//! The x axis is the sample index in chronological order, labelled with each
//! sample's `created_at`; rows whose value is unavailable are left out of the
//! series rather than plotted as zero.

use anyhow::{anyhow, Result};
use plotters::prelude::*;
use std::path::Path;

use crate::pipeline::types::OptionRecord;

const CHART_SIZE: (u32, u32) = (1280, 768);
const X_LABELS: usize = 10;

fn indexed<F>(records: &[OptionRecord], value: F) -> Vec<(f64, f64)>
where
    F: Fn(&OptionRecord) -> Option<f64>,
{
    records
        .iter()
        .enumerate()
        .filter_map(|(i, r)| value(r).map(|v| (i as f64, v)))
        .collect()
}

/// y range covering every point, padded by 5% and always containing `floor`.
fn padded_range<'a>(series: impl IntoIterator<Item = &'a (f64, f64)>, floor: f64) -> (f64, f64) {
    let (lo, hi) = series
        .into_iter()
        .fold((floor, floor), |(lo, hi), &(_, y)| (lo.min(y), hi.max(y)));
    let padding = ((hi - lo) * 0.05).max(1e-3);
    (lo - padding, hi + padding)
}

/// Tick label for position `x`: the `created_at` of the sample there, or
/// empty between samples and outside the batch.
pub(crate) fn sample_label(records: &[OptionRecord], x: f64) -> String {
    let index = x.round();
    if (x - index).abs() > 1e-9 || index < 0.0 {
        return String::new();
    }
    records
        .get(index as usize)
        .map(|r| r.created_at.clone())
        .unwrap_or_default()
}

fn x_range(records: &[OptionRecord]) -> std::ops::Range<f64> {
    0.0..(records.len().max(2) - 1) as f64
}

/// Implied and underlying volatility over time.
pub fn plot_volatility_series(records: &[OptionRecord], path: impl AsRef<Path>) -> Result<()> {
    let implied = indexed(records, |r| r.implied_volatility.as_ref().ok().copied());
    let underlying = indexed(records, |r| r.under_volatility.as_ref().ok().copied());
    if implied.is_empty() && underlying.is_empty() {
        return Err(anyhow!("no volatility values to plot"));
    }

    let (y_min, y_max) = padded_range(implied.iter().chain(underlying.iter()), 0.0);

    let label = |x: &f64| sample_label(records, *x);

    let root = SVGBackend::new(path.as_ref(), CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .caption("Implied vs Underlying Volatility", ("sans-serif", 30))
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range(records), y_min..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Created At")
        .y_desc("Volatility")
        .x_labels(X_LABELS)
        .x_label_formatter(&label)
        .draw()?;

    chart
        .draw_series(std::iter::once(PathElement::new(implied.clone(), BLUE)))?
        .label("Implied volatility")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));
    chart.draw_series(implied.iter().map(|pt| Circle::new(*pt, 2, BLUE.filled())))?;

    chart
        .draw_series(std::iter::once(PathElement::new(underlying.clone(), GREEN)))?
        .label("Underlying volatility")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], GREEN));
    chart.draw_series(underlying.iter().map(|pt| Circle::new(*pt, 2, GREEN.filled())))?;

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

/// Implied minus underlying volatility, with a zero reference line.
pub fn plot_volatility_premium(records: &[OptionRecord], path: impl AsRef<Path>) -> Result<()> {
    let premium = indexed(records, OptionRecord::volatility_premium);
    if premium.is_empty() {
        return Err(anyhow!("no rows with both implied and underlying volatility"));
    }

    let (y_min, y_max) = padded_range(premium.iter(), 0.0);
    let xs = x_range(records);

    let label = |x: &f64| sample_label(records, *x);

    let root = SVGBackend::new(path.as_ref(), CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .caption("Implied volatility - Underlying volatility", ("sans-serif", 30))
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(xs.clone(), y_min..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Created At")
        .y_desc("Volatility")
        .x_labels(X_LABELS)
        .x_label_formatter(&label)
        .draw()?;

    chart.draw_series(std::iter::once(PathElement::new(
        vec![(xs.start, 0.0), (xs.end, 0.0)],
        BLACK.stroke_width(1),
    )))?;
    chart.draw_series(std::iter::once(PathElement::new(premium.clone(), BLUE)))?;
    chart.draw_series(premium.iter().map(|pt| Circle::new(*pt, 2, BLUE.filled())))?;

    root.present()?;
    Ok(())
}
