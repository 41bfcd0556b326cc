use criterion::{Criterion, criterion_group, criterion_main};
use series_prep::api::ChartOptions;
use series_prep::core::{AxisType, Point, Series, SeriesType, format_number};
use series_prep::prepare_series;
use std::hint::black_box;

fn generated_series(series_count: usize, points_per_series: usize) -> Vec<Series> {
    (0..series_count)
        .map(|s| {
            Series::new(format!("series-{s}")).with_points((0..points_per_series).map(|i| {
                // Offset keys per series so unification has gaps to fill.
                let key = format!("k{:05}", i * 2 + s % 2);
                Point::new(key, 100.0 + (i as f64) * 0.05 + s as f64)
                    .with_field("bucket", (i % 7) as i64)
            }))
        })
        .collect()
}

fn bench_stacked_area_10k(c: &mut Criterion) {
    let options = ChartOptions::new(SeriesType::Area)
        .with_x_axis_type(AxisType::Category)
        .with_percent_values(true)
        .with_stacking(true);
    let input = generated_series(4, 2_500);

    c.bench_function("stacked_area_10k", |b| {
        b.iter(|| {
            let mut series = input.clone();
            prepare_series(black_box(&mut series), black_box(&options));
            series
        })
    });
}

fn bench_templated_bar_10k(c: &mut Criterion) {
    let options = ChartOptions::new(SeriesType::Bar)
        .with_x_axis_type(AxisType::Category)
        .with_text_format("{{ @@name }} @ {{ @@x }}: @@y ({{ bucket }})");
    let input = generated_series(4, 2_500);

    c.bench_function("templated_bar_10k", |b| {
        b.iter(|| {
            let mut series = input.clone();
            prepare_series(black_box(&mut series), black_box(&options));
            series
        })
    });
}

fn bench_number_format(c: &mut Criterion) {
    c.bench_function("number_format_grouped", |b| {
        b.iter(|| format_number(black_box(Some(1_234_567.891)), black_box("0,0.00")))
    });
}

criterion_group!(
    benches,
    bench_stacked_area_10k,
    bench_templated_bar_10k,
    bench_number_format
);
criterion_main!(benches);
