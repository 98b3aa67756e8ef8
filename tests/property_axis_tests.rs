use chart_grid::core::{CalendarAxis, CalendarAxisOptions, NumericAxis, NumericAxisOptions};
use proptest::prelude::*;

proptest! {
    #[test]
    fn numeric_axis_round_trip_property(
        min in -1_000_000.0f64..1_000_000.0,
        span in 0.001f64..1_000_000.0,
        length in 50.0f64..2_000.0,
        value_factor in 0.0f64..1.0
    ) {
        let max = min + span;
        let axis = NumericAxis::new(length, min, max, NumericAxisOptions::default())
            .expect("valid axis");
        let value = axis.min() + value_factor * (axis.max() - axis.min());

        let recovered = axis.value(axis.position(value));
        let tolerance = 1e-9 * (axis.max() - axis.min()).max(value.abs()).max(1.0);
        prop_assert!((recovered - value).abs() <= tolerance);
    }

    #[test]
    fn numeric_grid_generation_is_restartable(
        min in -10_000.0f64..10_000.0,
        span in 0.01f64..10_000.0,
        length in 50.0f64..2_000.0,
        start in -500.0f64..500.0
    ) {
        let axis = NumericAxis::new(length, min, min + span, NumericAxisOptions::default())
            .expect("valid axis");
        prop_assert_eq!(axis.grid_points(start), axis.grid_points(start));
        prop_assert_eq!(axis.subdivision_points(start), axis.subdivision_points(start));
    }

    #[test]
    fn numeric_ticks_respect_min_space(
        min in -10_000.0f64..10_000.0,
        span in 0.01f64..10_000.0,
        min_space in 10.0f64..80.0,
        spaces in 3.0f64..25.0
    ) {
        let length = min_space * spaces;
        let options = NumericAxisOptions::default().with_min_space(min_space);
        let axis = NumericAxis::new(length, min, min + span, options).expect("valid axis");
        let points = axis.grid_points(0.0);
        prop_assert!(points.len() >= 2);
        prop_assert!(points.len() <= 1_000);
        for pair in points.windows(2) {
            let gap = pair[1].position - pair[0].position;
            prop_assert!(gap >= min_space * (1.0 - 1e-6), "gap {} below {}", gap, min_space);
        }
    }

    #[test]
    fn calendar_grid_generation_is_restartable(
        min in 0i64..2_000_000_000,
        span in 60i64..400_000_000,
        length in 100.0f64..1_500.0
    ) {
        let options = CalendarAxisOptions::default().with_min_space(40.0);
        let axis = CalendarAxis::new(length, min as f64, (min + span) as f64, options)
            .expect("valid calendar axis");
        let first = axis.grid_points(12.5);
        prop_assert_eq!(&first, &axis.grid_points(12.5));
        prop_assert!(!first.is_empty());
        prop_assert!(first.len() <= 1_000);
        prop_assert!(axis.grid_unit_count() >= 1);
        prop_assert!(axis.end() >= axis.start());
    }
}
