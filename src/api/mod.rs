//! Configuration, text rendering and the preparation entry point.

mod dispatcher;
mod json_contract;
mod options;
mod text_template;

pub use dispatcher::{
    Alignment, ChartFamily, SeriesTransformDispatcher, TransformPlan, prepare_series,
};
pub use json_contract::{
    PREPARED_SERIES_JSON_SCHEMA_V1, PreparedSeries, PreparedSeriesJsonContractV1,
    series_from_json_str,
};
pub use options::{AxisOptions, ChartOptions, SeriesOptions, StackingOptions};
pub use text_template::{
    SeriesTextRenderer, TOKEN_NAME, TOKEN_SIZE, TOKEN_X, TOKEN_Y, TOKEN_Y_ERROR, TOKEN_Y_PERCENT,
    TextFormatter, TextTemplate, TokenBag,
};
