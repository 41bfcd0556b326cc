use indexmap::IndexSet;
use tracing::trace;

use crate::core::types::{CellValue, Series};

/// Which point value a re-projected `y` array carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YSource {
    Value,
    Percent,
}

/// Ordered union of the x keys of all visible series.
///
/// Series are walked in slice order and points in arrival order, so the
/// union keeps first-seen order unless `sorted` asks for natural ordering.
#[must_use]
pub fn unified_x_values(series: &[Series], sorted: bool) -> Vec<CellValue> {
    let mut union: IndexSet<CellValue> = IndexSet::new();
    for s in series.iter().filter(|s| s.visible) {
        union.extend(s.source_data.keys().cloned());
    }
    let mut domain: Vec<CellValue> = union.into_iter().collect();
    if sorted {
        domain.sort();
    }
    domain
}

/// Re-projects every visible series onto the shared x domain.
///
/// Positions where a series has no point receive `fill_y` for `y` and `None`
/// for the error bar, so all visible series end up with equal-length arrays.
pub fn unify_x_axis(
    series: &mut [Series],
    sorted: bool,
    fill_y: Option<f64>,
    source: YSource,
) -> Vec<CellValue> {
    let domain = unified_x_values(series, sorted);
    trace!(domain_len = domain.len(), sorted, ?fill_y, "unify x axis");

    for s in series.iter_mut().filter(|s| s.visible) {
        let mut y = Vec::with_capacity(domain.len());
        let mut error_y = Vec::with_capacity(domain.len());
        for x in &domain {
            match s.source_data.get(x) {
                Some(point) => {
                    y.push(match source {
                        YSource::Value => point.y,
                        YSource::Percent => point.y_percent,
                    });
                    error_y.push(point.y_error);
                }
                None => {
                    y.push(fill_y);
                    error_y.push(None);
                }
            }
        }
        s.x = domain.clone();
        s.y = y;
        s.error_y = error_y;
    }
    domain
}
