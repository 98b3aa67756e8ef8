use approx::assert_relative_eq;
use chart_grid::core::{GridAxis, LogAxis, NumericAxis, NumericAxisOptions};
use chart_grid::error::ChartError;

fn values(points: &[chart_grid::core::GridPoint]) -> Vec<f64> {
    points.iter().map(|point| point.value).collect()
}

#[test]
fn hundred_over_five_hundred_pixels_ticks_every_quarter() {
    let options = NumericAxisOptions::default().with_min_space(50.0);
    let axis = NumericAxis::new(500.0, 0.0, 100.0, options).expect("valid axis");

    assert_eq!(axis.step(), 25.0);
    let points = axis.grid_points(0.0);
    assert_eq!(values(&points), vec![0.0, 25.0, 50.0, 75.0, 100.0]);

    let positions: Vec<f64> = points.iter().map(|point| point.position).collect();
    assert_eq!(positions, vec![0.0, 125.0, 250.0, 375.0, 500.0]);

    let labels: Vec<String> = points.iter().map(|point| point.text.joined()).collect();
    assert_eq!(labels, vec!["0", "25", "50", "75", "100"]);
}

#[test]
fn range_is_widened_to_whole_steps() {
    let options = NumericAxisOptions::default().with_min_space(50.0);
    let axis = NumericAxis::new(500.0, 3.0, 97.0, options).expect("valid axis");

    assert_eq!(axis.min(), 0.0);
    assert_eq!(axis.max(), 100.0);
}

#[test]
fn grid_start_offsets_every_position() {
    let options = NumericAxisOptions::default().with_min_space(50.0);
    let axis = NumericAxis::new(500.0, 0.0, 100.0, options).expect("valid axis");

    let shifted = axis.grid_points(40.0);
    assert_eq!(shifted[0].position, 40.0);
    assert_eq!(shifted[4].position, 540.0);
}

#[test]
fn fixed_step_bypasses_the_search() {
    let options = NumericAxisOptions::default()
        .with_min_space(50.0)
        .with_fixed_step(10.0);
    let axis = NumericAxis::new(500.0, 0.0, 100.0, options).expect("valid axis");

    assert_eq!(axis.step(), 10.0);
    assert_eq!(axis.grid_points(0.0).len(), 11);
}

#[test]
fn reversed_axis_maps_minimum_to_far_end() {
    let mut options = NumericAxisOptions::default().with_min_space(50.0);
    options.reversed = true;
    let axis = NumericAxis::new(500.0, 0.0, 100.0, options).expect("valid axis");

    assert_eq!(axis.position(0.0), 500.0);
    assert_eq!(axis.position(100.0), 0.0);
    assert_relative_eq!(axis.value(125.0), 75.0, epsilon = 1e-9);
    assert!(GridAxis::reversed(&axis));
}

#[test]
fn zero_reports_pixel_of_value_zero() {
    let options = NumericAxisOptions::default().with_min_space(50.0);
    let axis = NumericAxis::new(500.0, -50.0, 50.0, options).expect("valid axis");

    assert_relative_eq!(axis.zero(), 250.0, epsilon = 1e-9);
    assert_relative_eq!(axis.unit(), 5.0, epsilon = 1e-9);
}

#[test]
fn subdivisions_avoid_main_ticks() {
    let options = NumericAxisOptions::default().with_min_space(50.0);
    let axis = NumericAxis::new(500.0, 0.0, 100.0, options).expect("valid axis");

    let main: Vec<f64> = axis.grid_points(0.0).iter().map(|p| p.position).collect();
    let subs = axis.subdivision_points(0.0);
    assert!(!subs.is_empty());
    for sub in &subs {
        assert!(
            main.iter().all(|tick| (tick - sub.position).abs() >= 1.0),
            "subdivision at {} collides with a main tick",
            sub.position
        );
        assert!(sub.text.is_blank());
    }
}

#[test]
fn equal_bounds_are_a_zero_length_axis() {
    let result = NumericAxis::new(500.0, 5.0, 5.0, NumericAxisOptions::default());
    assert!(matches!(result, Err(ChartError::ZeroLengthAxis { .. })));
}

#[test]
fn min_unit_keeps_integer_steps() {
    let options = NumericAxisOptions::default()
        .with_min_space(50.0)
        .with_min_unit(1.0);
    let axis = NumericAxis::new(500.0, 0.0, 10.0, options).expect("valid axis");

    assert_eq!(axis.step(), 5.0);
    assert!(axis.grid_points(0.0).iter().all(|p| p.value.fract() == 0.0));
}

#[test]
fn log_axis_ticks_on_powers() {
    let options = NumericAxisOptions::default().with_min_space(30.0);
    let axis = LogAxis::new(300.0, 1.0, 1000.0, 10.0, options).expect("valid log axis");

    assert_eq!(values(&axis.grid_points(0.0)), vec![1.0, 10.0, 100.0, 1000.0]);
    assert_relative_eq!(axis.position(100.0), 200.0, epsilon = 1e-9);
    assert_relative_eq!(axis.value(100.0), 10.0, epsilon = 1e-9);
}
