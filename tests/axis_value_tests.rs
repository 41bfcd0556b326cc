use chrono::{TimeZone, Utc};
use series_prep::core::{AxisType, CellValue, DateTimePattern, normalize_value};

#[test]
fn datetime_axis_renders_parsed_strings_with_pattern() {
    let pattern = DateTimePattern::new("YYYY-MM-DD HH:mm");
    let value = CellValue::text("2024-03-05 10:20:30");

    let normalized = normalize_value(&value, Some(AxisType::Datetime), &pattern);
    assert_eq!(normalized, CellValue::text("2024-03-05 10:20"));
}

#[test]
fn datetime_axis_reads_numbers_as_epoch_millis() {
    let pattern = DateTimePattern::new("%Y-%m-%d");
    let normalized = normalize_value(&CellValue::number(0.0), Some(AxisType::Datetime), &pattern);
    assert_eq!(normalized, CellValue::text("1970-01-01"));
}

#[test]
fn datetime_cells_are_formatted_on_any_axis() {
    let pattern = DateTimePattern::new("DD/MM/YY");
    let time = Utc
        .with_ymd_and_hms(2023, 12, 31, 23, 0, 0)
        .single()
        .expect("valid time");

    let normalized = normalize_value(&CellValue::DateTime(time), None, &pattern);
    assert_eq!(normalized, CellValue::text("31/12/23"));
}

#[test]
fn unparsable_datetime_values_pass_through() {
    let pattern = DateTimePattern::default();
    for value in [
        CellValue::text("soon"),
        CellValue::Null,
        CellValue::Bool(true),
    ] {
        assert_eq!(
            normalize_value(&value, Some(AxisType::Datetime), &pattern),
            value
        );
    }
}

#[test]
fn category_axis_coerces_to_text_keys() {
    let pattern = DateTimePattern::default();
    assert_eq!(
        normalize_value(&CellValue::number(5.0), Some(AxisType::Category), &pattern),
        CellValue::text("5")
    );
    assert_eq!(
        normalize_value(&CellValue::Bool(false), Some(AxisType::Category), &pattern),
        CellValue::text("false")
    );
    assert_eq!(
        normalize_value(&CellValue::Null, Some(AxisType::Category), &pattern),
        CellValue::Null
    );
}

#[test]
fn numeric_and_unknown_axes_pass_values_through() {
    let pattern = DateTimePattern::default();
    let value = CellValue::number(12.345);
    for axis in [
        Some(AxisType::Linear),
        Some(AxisType::Logarithmic),
        Some(AxisType::Auto),
        Some(AxisType::Unknown),
        None,
    ] {
        assert_eq!(normalize_value(&value, axis, &pattern), value);
    }
}

#[test]
fn normalization_is_stable_under_repeated_calls() {
    let pattern = DateTimePattern::new("YYYY-MM-DD");
    let value = CellValue::text("2024-01-15T08:00:00Z");

    let first = normalize_value(&value, Some(AxisType::Datetime), &pattern);
    let second = normalize_value(&value, Some(AxisType::Datetime), &pattern);
    assert_eq!(first, second);
    assert_eq!(first, CellValue::text("2024-01-15"));
}
