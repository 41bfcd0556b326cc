use indexmap::IndexMap;
use tracing::trace;

use crate::core::types::{CellValue, Series};

/// Sums `|y|` per x across visible series.
///
/// Only series with a point at a given x contribute to that x; points without
/// an observation contribute nothing.
#[must_use]
pub fn percent_denominators(series: &[Series]) -> IndexMap<CellValue, f64> {
    let mut sums: IndexMap<CellValue, f64> = IndexMap::new();
    for s in series.iter().filter(|s| s.visible) {
        for (x, point) in &s.source_data {
            if let Some(y) = point.y {
                *sums.entry(x.clone()).or_insert(0.0) += y.abs();
            }
        }
    }
    sums
}

/// Annotates every point of every visible series with its share of the
/// per-x total, in percent.
///
/// A zero total is not guarded: the share comes out as `NaN` or an infinity
/// and formats as an empty string downstream.
///
/// With `replace_y` the series' `y` output array is rebuilt in arrival order
/// from the computed percentages.
pub fn apply_percent_values(series: &mut [Series], replace_y: bool) {
    let sums = percent_denominators(series);
    trace!(positions = sums.len(), replace_y, "apply percent values");

    for s in series.iter_mut().filter(|s| s.visible) {
        for (x, point) in s.source_data.iter_mut() {
            point.y_percent = match (point.y, sums.get(x)) {
                (Some(y), Some(sum)) => Some(y / sum * 100.0),
                _ => None,
            };
        }
        if replace_y {
            s.y = s.source_data.values().map(|point| point.y_percent).collect();
        }
    }
}
