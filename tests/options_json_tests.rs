use series_prep::api::{
    ChartOptions, PREPARED_SERIES_JSON_SCHEMA_V1, PreparedSeriesJsonContractV1,
    series_from_json_str,
};
use series_prep::core::{AxisType, CellValue, SeriesType};
use series_prep::prepare_series;

#[test]
fn options_parse_from_dashboard_json() {
    let options = ChartOptions::from_json_str(
        r#"{
            "globalSeriesType": "column",
            "seriesOptions": { "revenue": { "type": "line", "yAxis": 1 } },
            "series": { "percentValues": true, "stacking": false },
            "sortX": false,
            "xAxis": { "type": "category" },
            "yAxis": [{ "type": "linear" }, { "type": "log" }],
            "numberFormat": "0.00",
            "textFormat": "{{ @@y }}"
        }"#,
    )
    .expect("parse options");

    assert_eq!(options.global_series_type, SeriesType::Bar);
    assert_eq!(
        options.series_options["revenue"].series_type,
        Some(SeriesType::Line)
    );
    assert_eq!(options.series_options["revenue"].y_axis, 1);
    assert!(options.series.percent_values);
    assert!(!options.sort_x);
    assert_eq!(options.x_axis.axis_type, Some(AxisType::Category));
    assert_eq!(options.y_axis[1].axis_type, Some(AxisType::Logarithmic));
    assert_eq!(options.number_format, "0.00");
    assert_eq!(options.percent_format, "0[.]00%");
    assert_eq!(options.text_format, "{{ @@y }}");
}

#[test]
fn unknown_types_and_auto_axes_are_accepted() {
    let options = ChartOptions::from_json_str(
        r#"{ "globalSeriesType": "waterfall", "xAxis": { "type": "-" }, "yAxis": [{ "type": "weird" }, {}] }"#,
    )
    .expect("parse options");

    assert_eq!(options.global_series_type, SeriesType::Other);
    assert_eq!(options.x_axis.axis_type, Some(AxisType::Auto));
    assert_eq!(options.y_axis[0].axis_type, Some(AxisType::Unknown));
    assert_eq!(options.y_axis[1].axis_type, None);
}

#[test]
fn short_y_axis_list_falls_back_to_default_axes() {
    let single = ChartOptions::from_json_str(r#"{ "yAxis": [{ "type": "datetime" }] }"#)
        .expect("parse options");
    assert_eq!(single.y_axis[0].axis_type, Some(AxisType::Datetime));
    assert_eq!(single.y_axis[1].axis_type, None);

    let empty = ChartOptions::from_json_str(r#"{ "yAxis": [] }"#).expect("parse options");
    assert_eq!(empty.y_axis, ChartOptions::default().y_axis);
}

#[test]
fn malformed_options_are_reported() {
    let err = ChartOptions::from_json_str("{ \"sortX\": 3 }").expect_err("should fail");
    assert!(err.to_string().contains("invalid config"));
}

#[test]
fn loaded_series_prepare_into_versioned_contract() {
    let mut series = series_from_json_str(
        r#"[
            { "name": "A", "data": [
                { "x": "b", "y": 2, "row": { "$raw": { "region": "EU" } } },
                { "x": "a", "y": 1 }
            ] },
            { "name": "B", "visible": false, "data": [{ "x": "z", "y": 9 }] }
        ]"#,
    )
    .expect("parse series");

    assert_eq!(series[0].source_data[0].row.x, CellValue::text("b"));
    assert_eq!(series[0].source_data[0].row.y, CellValue::number(2.0));

    let options = ChartOptions::new(SeriesType::Line)
        .with_x_axis_type(AxisType::Category)
        .with_text_format("{{ region }}");
    prepare_series(&mut series, &options);

    let contract = PreparedSeriesJsonContractV1::from_series(&series);
    assert_eq!(contract.schema_version, PREPARED_SERIES_JSON_SCHEMA_V1);
    assert_eq!(contract.series[0].x, vec![CellValue::text("a"), CellValue::text("b")]);
    assert_eq!(
        contract.series[0].text,
        vec!["{{ region }}".to_owned(), "EU".to_owned()]
    );
    assert!(contract.series[1].y.is_empty());

    let json = contract.to_json_pretty().expect("serialize");
    let parsed = PreparedSeriesJsonContractV1::from_json_str(&json).expect("parse contract");
    assert_eq!(parsed, contract);
}

#[test]
fn contract_rejects_unknown_schema_version() {
    let err = PreparedSeriesJsonContractV1::from_json_str(r#"{ "schema_version": 99, "series": [] }"#)
        .expect_err("should fail");
    assert!(err.to_string().contains("unsupported prepared series schema version"));
}
