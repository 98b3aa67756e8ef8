use chart_grid::api::{AxisOptions, DatasetRange, LayoutConfig, LayoutEngine};
use chart_grid::core::{
    CalendarAxis, CalendarAxisOptions, CalendarConfig, DivisionTable, NumericAxis,
    NumericAxisOptions, Viewport, search_divisions,
};
use chart_grid::render::{AxisRenderer, AxisSide, AxisStyle};
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

const JAN_1_2024: f64 = 1_704_067_200.0;

fn bench_numeric_axis_grid(c: &mut Criterion) {
    c.bench_function("numeric_axis_grid", |b| {
        b.iter(|| {
            let axis = NumericAxis::new(
                black_box(1_600.0),
                black_box(-1_234.5),
                black_box(98_765.4),
                NumericAxisOptions::default(),
            )
            .expect("valid axis");
            let _ = axis.grid_points(0.0);
            let _ = axis.subdivision_points(0.0);
        })
    });
}

fn bench_calendar_division_search(c: &mut Criterion) {
    let table = DivisionTable::global();
    let year = 366 * 86_400;

    c.bench_function("calendar_division_search_year", |b| {
        b.iter(|| {
            let _ = search_divisions(
                table.iter(),
                black_box(1_200.0),
                black_box(JAN_1_2024 as i64),
                black_box(JAN_1_2024 as i64 + year),
                black_box(40.0),
                CalendarConfig::default(),
            )
            .expect("search succeeds");
        })
    });
}

fn bench_calendar_axis_measure(c: &mut Criterion) {
    let axis = CalendarAxis::new(
        1_600.0,
        JAN_1_2024,
        JAN_1_2024 + 30.0 * 86_400.0,
        CalendarAxisOptions::default().with_min_space(40.0),
    )
    .expect("valid calendar axis");
    let style = AxisStyle::default();
    let mut renderer = AxisRenderer::default();

    c.bench_function("calendar_axis_measure_cached", |b| {
        b.iter(|| {
            let _ = renderer.measure(black_box(&axis), AxisSide::Bottom, &style);
        })
    });
}

fn bench_layout_compute(c: &mut Criterion) {
    let config = LayoutConfig::new(Viewport::new(1600, 900))
        .with_x_axis(AxisOptions::calendar())
        .with_y_axis(1, AxisOptions::default())
        .with_dataset(DatasetRange::new(
            "price",
            (JAN_1_2024, JAN_1_2024 + 90.0 * 86_400.0),
            (95.5, 2_480.0),
        ))
        .with_dataset(
            DatasetRange::new(
                "volume",
                (JAN_1_2024, JAN_1_2024 + 90.0 * 86_400.0),
                (0.0, 3.5e6),
            )
            .on_y_axis(1),
        )
        .with_double_axes(true, true);
    let mut engine = LayoutEngine::new(config).expect("engine init");

    c.bench_function("layout_compute_two_y_axes", |b| {
        b.iter(|| {
            let _ = engine.compute().expect("layout should converge");
        })
    });
}

criterion_group!(
    benches,
    bench_numeric_axis_grid,
    bench_calendar_division_search,
    bench_calendar_axis_measure,
    bench_layout_compute
);
criterion_main!(benches);
