use tracing::{debug, trace};

use crate::core::{
    Series, SeriesType, YSource, accumulate_stacks, apply_percent_values, unify_x_axis,
};

use super::{ChartOptions, SeriesTextRenderer};

/// Pipeline family selected from the global series type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartFamily {
    Pie,
    LineArea,
    Heatmap,
    /// Bar, scatter, bubble, box and any unrecognized type.
    Default,
}

impl From<SeriesType> for ChartFamily {
    fn from(series_type: SeriesType) -> Self {
        match series_type {
            SeriesType::Pie => Self::Pie,
            SeriesType::Line | SeriesType::Area => Self::LineArea,
            SeriesType::Heatmap => Self::Heatmap,
            SeriesType::Bar
            | SeriesType::Scatter
            | SeriesType::Bubble
            | SeriesType::Box
            | SeriesType::Other => Self::Default,
        }
    }
}

/// How visible series are aligned on x after percent normalization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Alignment {
    /// Keep each series in its own arrival order.
    Independent,
    /// Unify on a shared domain and re-project.
    Unified { fill_y: Option<f64> },
    /// Unify with zero fill, then accumulate in series order.
    Stacked,
}

/// Resolved sequence of passes for one set of options.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformPlan {
    pub family: ChartFamily,
    pub percent: bool,
    pub alignment: Alignment,
    pub sort_x: bool,
}

impl TransformPlan {
    #[must_use]
    pub fn resolve(options: &ChartOptions) -> Self {
        let family = ChartFamily::from(options.global_series_type);
        let stacking = options.series.stacking;
        let percent = match family {
            ChartFamily::Pie => true,
            ChartFamily::Heatmap => false,
            ChartFamily::LineArea | ChartFamily::Default => options.series.percent_values,
        };

        let unify_categories = !stacking
            && options.x_axis.is_category()
            && options.sort_x
            && options.global_series_type != SeriesType::Box;
        let alignment = match family {
            ChartFamily::Pie | ChartFamily::Heatmap => Alignment::Independent,
            ChartFamily::LineArea if stacking => Alignment::Stacked,
            ChartFamily::LineArea | ChartFamily::Default if unify_categories => {
                Alignment::Unified {
                    fill_y: options.missing_values_as_zero.then_some(0.0),
                }
            }
            ChartFamily::LineArea | ChartFamily::Default => Alignment::Independent,
        };

        Self {
            family,
            percent,
            alignment,
            sort_x: options.sort_x,
        }
    }
}

/// Entry point turning loaded series into renderer-ready arrays.
///
/// Holds no state between runs: every call rebuilds the output arrays of the
/// visible series from their source points, so running it twice on the same
/// input yields the same output. Hidden series are never read or written.
#[derive(Debug, Clone, Copy)]
pub struct SeriesTransformDispatcher<'a> {
    options: &'a ChartOptions,
    plan: TransformPlan,
}

impl<'a> SeriesTransformDispatcher<'a> {
    #[must_use]
    pub fn new(options: &'a ChartOptions) -> Self {
        Self {
            options,
            plan: TransformPlan::resolve(options),
        }
    }

    #[must_use]
    pub fn plan(&self) -> TransformPlan {
        self.plan
    }

    pub fn run(&self, series: &mut [Series]) {
        let plan = self.plan;
        let visible = series.iter().filter(|s| s.visible).count();
        debug!(
            family = ?plan.family,
            visible,
            hidden = series.len() - visible,
            percent = plan.percent,
            alignment = ?plan.alignment,
            "prepare series"
        );

        if plan.family == ChartFamily::Heatmap || visible == 0 {
            return;
        }

        let pie = plan.family == ChartFamily::Pie;
        for s in series.iter_mut().filter(|s| s.visible) {
            s.clear_output();
            for point in s.source_data.values_mut() {
                point.y_percent = None;
            }
            if pie {
                s.project_pie_data();
            } else {
                s.project_source_data();
            }
        }

        if plan.percent {
            apply_percent_values(series, !pie);
        }

        let y_source = if plan.percent && !pie {
            YSource::Percent
        } else {
            YSource::Value
        };
        match plan.alignment {
            Alignment::Independent => {}
            Alignment::Unified { fill_y } => {
                let domain = unify_x_axis(series, true, fill_y, y_source);
                trace!(domain_len = domain.len(), "unified category axis");
            }
            Alignment::Stacked => {
                let domain = unify_x_axis(series, plan.sort_x, Some(0.0), y_source);
                accumulate_stacks(series);
                trace!(domain_len = domain.len(), "stacked series");
            }
        }

        let renderer = SeriesTextRenderer::new(self.options);
        for s in series.iter_mut().filter(|s| s.visible) {
            renderer.render_series(s);
        }
    }
}

/// Runs the full preparation pipeline for `options` over `series`.
pub fn prepare_series(series: &mut [Series], options: &ChartOptions) {
    SeriesTransformDispatcher::new(options).run(series);
}
