use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

use crate::core::axis_value::DEFAULT_DATE_TIME_FORMAT;
use crate::core::number_format::{DEFAULT_NUMBER_FORMAT, DEFAULT_PERCENT_FORMAT};
use crate::core::{AxisType, Series, SeriesType};
use crate::error::{ChartError, ChartResult};

/// Axis configuration relevant to value normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AxisOptions {
    #[serde(rename = "type")]
    pub axis_type: Option<AxisType>,
}

impl AxisOptions {
    #[must_use]
    pub fn new(axis_type: AxisType) -> Self {
        Self {
            axis_type: Some(axis_type),
        }
    }

    #[must_use]
    pub fn is_category(self) -> bool {
        self.axis_type.is_some_and(AxisType::is_category)
    }
}

/// Per-series overrides keyed by series name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct SeriesOptions {
    #[serde(rename = "type")]
    pub series_type: Option<SeriesType>,
    /// Index into [`ChartOptions::y_axis`]; anything other than `1` means the primary axis.
    pub y_axis: usize,
}

/// Series-wide value transforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct StackingOptions {
    pub percent_values: bool,
    pub stacking: bool,
}

/// Chart configuration consumed by one preparation pass.
///
/// Field names follow the camelCase JSON layout used by dashboard hosts; the
/// structure is assumed valid and is not checked beyond its JSON shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChartOptions {
    pub global_series_type: SeriesType,
    pub series_options: IndexMap<String, SeriesOptions>,
    pub series: StackingOptions,
    pub sort_x: bool,
    /// Fill gaps with `0` instead of `None` when unifying x without stacking.
    pub missing_values_as_zero: bool,
    pub x_axis: AxisOptions,
    /// Primary and secondary y axes; a shorter JSON array leaves the rest at their defaults.
    #[serde(deserialize_with = "deserialize_y_axes")]
    pub y_axis: [AxisOptions; 2],
    pub number_format: String,
    pub percent_format: String,
    pub date_time_format: String,
    /// Empty means the built-in text for the chart family.
    pub text_format: String,
}

fn deserialize_y_axes<'de, D>(deserializer: D) -> Result<[AxisOptions; 2], D::Error>
where
    D: Deserializer<'de>,
{
    let listed = Vec::<AxisOptions>::deserialize(deserializer)?;
    let mut axes = [AxisOptions::default(); 2];
    for (slot, axis) in axes.iter_mut().zip(listed) {
        *slot = axis;
    }
    Ok(axes)
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            global_series_type: SeriesType::default(),
            series_options: IndexMap::new(),
            series: StackingOptions::default(),
            sort_x: true,
            missing_values_as_zero: false,
            x_axis: AxisOptions::default(),
            y_axis: [AxisOptions::default(); 2],
            number_format: DEFAULT_NUMBER_FORMAT.to_owned(),
            percent_format: DEFAULT_PERCENT_FORMAT.to_owned(),
            date_time_format: DEFAULT_DATE_TIME_FORMAT.to_owned(),
            text_format: String::new(),
        }
    }
}

impl ChartOptions {
    #[must_use]
    pub fn new(global_series_type: SeriesType) -> Self {
        Self {
            global_series_type,
            ..Self::default()
        }
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidConfig(format!("failed to parse chart options: {e}")))
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            ChartError::Serialization(format!("failed to serialize chart options: {e}"))
        })
    }

    #[must_use]
    pub fn with_percent_values(mut self, enabled: bool) -> Self {
        self.series.percent_values = enabled;
        self
    }

    #[must_use]
    pub fn with_stacking(mut self, enabled: bool) -> Self {
        self.series.stacking = enabled;
        self
    }

    #[must_use]
    pub fn with_sort_x(mut self, enabled: bool) -> Self {
        self.sort_x = enabled;
        self
    }

    #[must_use]
    pub fn with_missing_values_as_zero(mut self, enabled: bool) -> Self {
        self.missing_values_as_zero = enabled;
        self
    }

    #[must_use]
    pub fn with_x_axis_type(mut self, axis_type: AxisType) -> Self {
        self.x_axis = AxisOptions::new(axis_type);
        self
    }

    #[must_use]
    pub fn with_y_axis_type(mut self, index: usize, axis_type: AxisType) -> Self {
        if let Some(axis) = self.y_axis.get_mut(index) {
            *axis = AxisOptions::new(axis_type);
        }
        self
    }

    #[must_use]
    pub fn with_number_format(mut self, pattern: impl Into<String>) -> Self {
        self.number_format = pattern.into();
        self
    }

    #[must_use]
    pub fn with_percent_format(mut self, pattern: impl Into<String>) -> Self {
        self.percent_format = pattern.into();
        self
    }

    #[must_use]
    pub fn with_date_time_format(mut self, pattern: impl Into<String>) -> Self {
        self.date_time_format = pattern.into();
        self
    }

    #[must_use]
    pub fn with_text_format(mut self, template: impl Into<String>) -> Self {
        self.text_format = template.into();
        self
    }

    #[must_use]
    pub fn with_series_options(mut self, name: impl Into<String>, options: SeriesOptions) -> Self {
        self.series_options.insert(name.into(), options);
        self
    }

    /// Resolves the family of one trace: per-series override, then the
    /// series' own type, then the global type.
    #[must_use]
    pub fn resolve_series_type(&self, series: &Series) -> SeriesType {
        self.series_options
            .get(&series.name)
            .and_then(|options| options.series_type)
            .or(series.series_type)
            .unwrap_or(self.global_series_type)
    }

    /// Axis type used for a series' y values.
    #[must_use]
    pub fn y_axis_type_for(&self, series: &Series) -> Option<AxisType> {
        let index = self
            .series_options
            .get(&series.name)
            .map_or(0, |options| usize::from(options.y_axis == 1));
        self.y_axis[index].axis_type
    }
}
