//! series-prep: turns loaded query-result series into chart-ready traces.
//!
//! The `core` module holds the value passes (axis normalization, number
//! formatting, percent shares, x unification, stacking); `api` holds the
//! configuration, text templates and the [`prepare_series`] entry point.

pub mod api;
pub mod core;
pub mod error;
pub mod telemetry;

pub use api::{ChartOptions, SeriesTransformDispatcher, prepare_series};
pub use crate::core::{CellValue, Point, Series, SeriesType};
pub use error::{ChartError, ChartResult};
