use serde::{Deserialize, Serialize};

use crate::core::{CellValue, Series};
use crate::error::{ChartError, ChartResult};

pub const PREPARED_SERIES_JSON_SCHEMA_V1: u32 = 1;

/// Renderer-facing view of one prepared trace.
///
/// Pie traces carry `labels`; every other family carries `x`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreparedSeries {
    pub name: String,
    pub visible: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub x: Vec<CellValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<CellValue>,
    pub y: Vec<Option<f64>>,
    pub error_y: Vec<Option<f64>>,
    pub text: Vec<String>,
    pub hover: Vec<String>,
}

impl From<&Series> for PreparedSeries {
    fn from(series: &Series) -> Self {
        Self {
            name: series.name.clone(),
            visible: series.visible,
            x: series.x.clone(),
            labels: series.labels.clone(),
            y: series.y.clone(),
            error_y: series.error_y.clone(),
            text: series.text.clone(),
            hover: series.hover.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreparedSeriesJsonContractV1 {
    pub schema_version: u32,
    pub series: Vec<PreparedSeries>,
}

impl PreparedSeriesJsonContractV1 {
    #[must_use]
    pub fn from_series(series: &[Series]) -> Self {
        Self {
            schema_version: PREPARED_SERIES_JSON_SCHEMA_V1,
            series: series.iter().map(PreparedSeries::from).collect(),
        }
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            ChartError::Serialization(format!("failed to serialize prepared series v1: {e}"))
        })
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let payload: Self = serde_json::from_str(input).map_err(|e| {
            ChartError::InvalidData(format!("failed to parse prepared series payload: {e}"))
        })?;
        if payload.schema_version != PREPARED_SERIES_JSON_SCHEMA_V1 {
            return Err(ChartError::InvalidData(format!(
                "unsupported prepared series schema version: {}",
                payload.schema_version
            )));
        }
        Ok(payload)
    }
}

/// Parses loaded series (name, type, visibility and `data` points) from JSON.
pub fn series_from_json_str(input: &str) -> ChartResult<Vec<Series>> {
    serde_json::from_str(input)
        .map_err(|e| ChartError::InvalidData(format!("failed to parse series json payload: {e}")))
}
