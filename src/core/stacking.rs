use tracing::trace;

use crate::core::types::Series;

/// Stacks visible series on top of each other in slice order.
///
/// Expects arrays already aligned on a shared x domain with missing values
/// filled with `0`. The first visible series is left as-is; each later one
/// becomes `previous[i] + current[i]`, where `previous` is the already
/// stacked array of the visible series right before it. An absent value on
/// either side counts as `0`.
pub fn accumulate_stacks(series: &mut [Series]) {
    let mut previous: Option<Vec<Option<f64>>> = None;
    let mut stacked = 0usize;

    for s in series.iter_mut().filter(|s| s.visible) {
        if let Some(prev) = previous.as_ref() {
            for (i, value) in s.y.iter_mut().enumerate() {
                let below = prev.get(i).copied().flatten().unwrap_or(0.0);
                *value = Some(below + value.unwrap_or(0.0));
            }
        }
        previous = Some(s.y.clone());
        stacked += 1;
    }
    trace!(stacked, "accumulate stacks");
}
