pub mod axis_value;
pub mod number_format;
pub mod percent;
pub mod primitives;
pub mod stacking;
pub mod types;
pub mod x_axis;

pub use axis_value::{AxisType, DateTimePattern, normalize_value, parse_datetime};
pub use number_format::{NumberFormatter, NumberPattern, format_number};
pub use percent::{apply_percent_values, percent_denominators};
pub use stacking::accumulate_stacks;
pub use types::{CellValue, Point, Series, SeriesType, SourceRow};
pub use x_axis::{YSource, unified_x_values, unify_x_axis};
