use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::primitives::decimal_to_f64;
use crate::error::{ChartError, ChartResult};

/// Raw cell value as delivered by the query-result loader.
///
/// The derived ordering is the natural ordering used when sorting an x-domain:
/// `Null < Bool < Number < DateTime < Text`, each kind compared by value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Null,
    Bool(bool),
    Number(OrderedFloat<f64>),
    DateTime(DateTime<Utc>),
    Text(String),
}

impl CellValue {
    #[must_use]
    pub fn number(value: f64) -> Self {
        Self::Number(OrderedFloat(value))
    }

    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(value) => write!(f, "{value}"),
            Self::Number(value) => write_plain_number(f, value.0),
            Self::DateTime(value) => {
                f.write_str(&value.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            Self::Text(value) => f.write_str(value),
        }
    }
}

// Integral values print without a trailing `.0` so category keys read like the source cell.
fn write_plain_number(f: &mut fmt::Formatter<'_>, value: f64) -> fmt::Result {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        write!(f, "{}", value as i64)
    } else {
        write!(f, "{value}")
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        Self::number(value as f64)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<DateTime<Utc>> for CellValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::DateTime(value)
    }
}

/// Chart family of a trace.
///
/// Unknown tags deserialize to [`SeriesType::Other`], which the dispatcher
/// handles like any other default-family trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SeriesType {
    #[default]
    Line,
    Area,
    #[serde(alias = "column")]
    Bar,
    Pie,
    Scatter,
    Bubble,
    Box,
    Heatmap,
    #[serde(other)]
    Other,
}

impl SeriesType {
    /// Scatter-like families format `y` as an axis value instead of a number.
    #[must_use]
    pub fn formats_y_as_axis_value(self) -> bool {
        matches!(self, Self::Scatter | Self::Bubble)
    }
}

impl FromStr for SeriesType {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "line" => Ok(Self::Line),
            "area" => Ok(Self::Area),
            "bar" | "column" => Ok(Self::Bar),
            "pie" => Ok(Self::Pie),
            "scatter" => Ok(Self::Scatter),
            "bubble" => Ok(Self::Bubble),
            "box" => Ok(Self::Box),
            "heatmap" => Ok(Self::Heatmap),
            _ => Ok(Self::Other),
        }
    }
}

/// Original record a point was built from.
///
/// `x`/`y` hold the unprocessed cell values; `raw` carries every column of
/// the row and is merged into the text-template token bag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SourceRow {
    pub x: CellValue,
    pub y: CellValue,
    #[serde(rename = "$raw")]
    pub raw: IndexMap<String, CellValue>,
}

/// One observation inside a series, keyed by its x value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Point {
    pub x: CellValue,
    #[serde(default)]
    pub y: Option<f64>,
    #[serde(default)]
    pub y_error: Option<f64>,
    #[serde(default)]
    pub size: Option<f64>,
    #[serde(default, skip_deserializing)]
    pub y_percent: Option<f64>,
    #[serde(default)]
    pub row: SourceRow,
}

impl Point {
    #[must_use]
    pub fn new(x: impl Into<CellValue>, y: f64) -> Self {
        let x = x.into();
        Self {
            row: SourceRow {
                x: x.clone(),
                y: CellValue::number(y),
                raw: IndexMap::new(),
            },
            x,
            y: Some(y),
            y_error: None,
            size: None,
            y_percent: None,
        }
    }

    /// Point without an observation, e.g. a `NULL` cell in the y column.
    #[must_use]
    pub fn missing(x: impl Into<CellValue>) -> Self {
        let x = x.into();
        Self {
            row: SourceRow {
                x: x.clone(),
                y: CellValue::Null,
                raw: IndexMap::new(),
            },
            x,
            y: None,
            y_error: None,
            size: None,
            y_percent: None,
        }
    }

    pub fn from_decimal(x: impl Into<CellValue>, y: Decimal) -> ChartResult<Self> {
        Ok(Self::new(x, decimal_to_f64(y, "y")?))
    }

    #[must_use]
    pub fn with_error(mut self, y_error: f64) -> Self {
        self.y_error = Some(y_error);
        self
    }

    #[must_use]
    pub fn with_size(mut self, size: f64) -> Self {
        self.size = Some(size);
        self
    }

    #[must_use]
    pub fn with_raw_y(mut self, y: impl Into<CellValue>) -> Self {
        self.row.y = y.into();
        self
    }

    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.row.raw.insert(name.into(), value.into());
        self
    }

    fn fill_row_defaults(&mut self) {
        if self.row.x.is_null() {
            self.row.x = self.x.clone();
        }
        if self.row.y.is_null() {
            if let Some(y) = self.y {
                self.row.y = CellValue::number(y);
            }
        }
    }
}

/// One chart trace: its source points plus the arrays handed to the renderer.
///
/// `source_data` keeps arrival order; every output array is rebuilt from it on
/// each preparation pass, so hosts can re-run the pipeline on the same input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    pub name: String,
    #[serde(rename = "type", default)]
    pub series_type: Option<SeriesType>,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(rename = "data", default, with = "source_data_as_points")]
    pub source_data: IndexMap<CellValue, Point>,
    #[serde(default)]
    pub x: Vec<CellValue>,
    #[serde(default)]
    pub labels: Vec<CellValue>,
    #[serde(default)]
    pub y: Vec<Option<f64>>,
    #[serde(default)]
    pub error_y: Vec<Option<f64>>,
    #[serde(default)]
    pub text: Vec<String>,
    #[serde(default)]
    pub hover: Vec<String>,
}

fn default_visible() -> bool {
    true
}

impl Series {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            series_type: None,
            visible: true,
            source_data: IndexMap::new(),
            x: Vec::new(),
            labels: Vec::new(),
            y: Vec::new(),
            error_y: Vec::new(),
            text: Vec::new(),
            hover: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_type(mut self, series_type: SeriesType) -> Self {
        self.series_type = Some(series_type);
        self
    }

    #[must_use]
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    #[must_use]
    pub fn with_point(mut self, point: Point) -> Self {
        self.push_point(point);
        self
    }

    #[must_use]
    pub fn with_points(mut self, points: impl IntoIterator<Item = Point>) -> Self {
        for point in points {
            self.push_point(point);
        }
        self
    }

    /// Inserts a point keyed by its x value.
    ///
    /// A duplicate x replaces the earlier point but keeps its original position.
    pub fn push_point(&mut self, point: Point) {
        self.source_data.insert(point.x.clone(), point);
    }

    #[must_use]
    pub fn point(&self, x: &CellValue) -> Option<&Point> {
        self.source_data.get(x)
    }

    pub fn clear_output(&mut self) {
        self.x.clear();
        self.labels.clear();
        self.y.clear();
        self.error_y.clear();
        self.text.clear();
        self.hover.clear();
    }

    /// Rebuilds `x`/`y`/`error_y` from `source_data` in arrival order.
    pub fn project_source_data(&mut self) {
        let len = self.source_data.len();
        self.x = Vec::with_capacity(len);
        self.y = Vec::with_capacity(len);
        self.error_y = Vec::with_capacity(len);
        for (x, point) in &self.source_data {
            self.x.push(x.clone());
            self.y.push(point.y);
            self.error_y.push(point.y_error);
        }
    }

    /// Pie traces expose their keys as `labels` and leave `x` empty.
    pub fn project_pie_data(&mut self) {
        self.project_source_data();
        self.labels = std::mem::take(&mut self.x);
    }
}

mod source_data_as_points {
    use indexmap::IndexMap;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{CellValue, Point};

    pub(super) fn serialize<S>(
        data: &IndexMap<CellValue, Point>,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(data.values())
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<IndexMap<CellValue, Point>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let points = Vec::<Point>::deserialize(deserializer)?;
        let mut data = IndexMap::with_capacity(points.len());
        for mut point in points {
            point.fill_row_defaults();
            data.insert(point.x.clone(), point);
        }
        Ok(data)
    }
}
