use approx::assert_relative_eq;
use chart_grid::api::{
    AxisOptions, AxisRole, DatasetRange, FixedPadding, Guideline, LayoutConfig, LayoutEngine,
    MAX_LAYOUT_PASSES, Orientation,
};
use chart_grid::core::text::rotate_extents;
use chart_grid::core::{
    ChartAxis, EstimatedTextMetrics, FontMetrics, GridAxis, TextMetrics, TextSize, Viewport,
};
use chart_grid::error::ChartError;
use chart_grid::render::{AxisSide, AxisStyle, NullRenderer};

const JAN_1_2024: f64 = 1_704_067_200.0;
const JAN_8_2024: f64 = 1_704_672_000.0;

fn basic_config() -> LayoutConfig {
    LayoutConfig::new(Viewport::new(800, 600))
        .with_dataset(DatasetRange::new("prices", (0.0, 100.0), (0.0, 1_000.0)))
}

#[test]
fn padding_converges_and_keeps_axes_on_canvas() {
    let mut engine = LayoutEngine::new(basic_config()).expect("valid config");
    let layout = engine.compute().expect("layout fits");

    assert!(layout.converged);
    assert!((1..=MAX_LAYOUT_PASSES).contains(&layout.passes));
    assert!(layout.padding.left > 0.0, "y labels need room on the left");
    assert!(layout.padding.bottom > 0.0, "x labels need room below");

    let content = layout.content_bounds();
    assert!(content.x1 >= 0.0 && content.y1 >= 0.0);
    assert!(content.x2 <= 800.0 && content.y2 <= 600.0);

    let x = layout.axis(AxisRole::X { mirror: false }).expect("x axis");
    assert_eq!(x.side, AxisSide::Bottom);
    assert_relative_eq!(x.axis.length(), layout.plot.width());
    let y = layout
        .axis(AxisRole::Y {
            index: 0,
            mirror: false,
        })
        .expect("primary y axis");
    assert_eq!(y.side, AxisSide::Left);
    assert_relative_eq!(y.axis.length(), layout.plot.height());
    assert_eq!(y.origin, (layout.plot.x1, layout.plot.y2));
}

#[test]
fn tiny_canvas_reports_not_enough_space() {
    let config = LayoutConfig::new(Viewport::new(30, 30))
        .with_dataset(DatasetRange::new("wide", (0.0, 1.0), (0.0, 1.0e6)));
    let mut engine = LayoutEngine::new(config).expect("valid config");

    let result = engine.compute();
    assert!(matches!(result, Err(ChartError::NotEnoughSpace { .. })));
}

/// Makes one specific label very wide so the right padding flips between two
/// grid steps on every pass.
struct SeesawMetrics;

impl TextMetrics for SeesawMetrics {
    fn measure(
        &self,
        text: &str,
        _font: &str,
        font_size: f64,
        angle_deg: f64,
        _line_spacing: f64,
    ) -> TextSize {
        let width = if text == "125" {
            1_000.0
        } else {
            6.0 * text.chars().count() as f64
        };
        rotate_extents(width, font_size, angle_deg)
    }

    fn baseline(&self, _font: &str, font_size: f64) -> f64 {
        font_size * 0.8
    }
}

#[test]
fn oscillating_padding_stops_at_the_pass_cap() {
    // Only the right side is free. A wide plot picks step 25 and ends on
    // "125", which pushes the plot down to 500 px; that picks step 50 and
    // ends on "150", which frees the space again.
    let config = LayoutConfig::new(Viewport::new(1000, 600))
        .with_x_axis(AxisOptions::default().with_min_space(100.0))
        .with_dataset(DatasetRange::new("seesaw", (0.0, 101.0), (0.0, 1.0)))
        .with_fixed_padding(FixedPadding {
            left: Some(0.0),
            top: Some(0.0),
            bottom: Some(50.0),
            right: None,
        });
    let mut engine = LayoutEngine::with_metrics(config, SeesawMetrics).expect("valid config");
    let layout = engine.compute().expect("cap keeps the last padding");

    assert_eq!(layout.passes, MAX_LAYOUT_PASSES);
    assert!(!layout.converged);
    assert!(layout.plot.width() >= 0.0);
    assert!(layout.plot.height() >= 0.0);
    assert!(layout.padding.right == 9.0 || layout.padding.right == 500.0);
}

#[test]
fn x_and_y_styles_measure_with_their_own_fonts() {
    let metrics = || {
        EstimatedTextMetrics::new().with_font(FontMetrics {
            name: "narrow".to_owned(),
            digit: 0.1,
            ..FontMetrics::default()
        })
    };
    let regular = LayoutEngine::with_metrics(basic_config(), metrics())
        .expect("valid config")
        .compute()
        .expect("layout fits");
    let narrow_y = basic_config().with_styles(
        AxisStyle::default(),
        AxisStyle::default().with_font("narrow"),
    );
    let narrow = LayoutEngine::with_metrics(narrow_y, metrics())
        .expect("valid config")
        .compute()
        .expect("layout fits");

    assert!(
        narrow.padding.left < regular.padding.left,
        "narrow y labels need less room: {} vs {}",
        narrow.padding.left,
        regular.padding.left
    );
    assert_eq!(narrow.padding.bottom, regular.padding.bottom);
}

#[test]
fn fixed_padding_sides_are_not_converged() {
    let config = basic_config().with_fixed_padding(FixedPadding {
        left: Some(100.0),
        top: Some(0.0),
        ..FixedPadding::default()
    });
    let mut engine = LayoutEngine::new(config).expect("valid config");
    let layout = engine.compute().expect("layout fits");

    assert_eq!(layout.padding.left, 100.0);
    assert_eq!(layout.padding.top, 0.0);
    assert_eq!(layout.plot.x1, 100.0);
}

#[test]
fn secondary_axes_stack_after_the_mirrored_primary() {
    let config = basic_config()
        .with_y_axis(1, AxisOptions::default())
        .with_dataset(DatasetRange::new("volume", (0.0, 100.0), (0.0, 5.0e5)).on_y_axis(1))
        .with_double_axes(false, true);
    let gap = config.axis_gap;
    let mut engine = LayoutEngine::new(config).expect("valid config");
    let layout = engine.compute().expect("layout fits");

    let mirror = layout
        .axis(AxisRole::Y {
            index: 0,
            mirror: true,
        })
        .expect("mirrored primary");
    assert_eq!(mirror.side, AxisSide::Right);
    assert_eq!(mirror.offset, 0.0);
    assert_eq!(mirror.origin.0, layout.plot.x2);

    let secondary = layout
        .axis(AxisRole::Y {
            index: 1,
            mirror: false,
        })
        .expect("secondary axis");
    assert_eq!(secondary.side, AxisSide::Right);
    let mirror_width = mirror.bounds.x2 - mirror.origin.0;
    assert_relative_eq!(secondary.offset, mirror_width + gap, epsilon = 1e-9);
    assert_relative_eq!(secondary.origin.0, layout.plot.x2 + secondary.offset);
    assert!(layout.content_bounds().x2 <= 800.0);
}

#[test]
fn double_x_mirrors_the_x_axis_on_top() {
    let config = basic_config().with_double_axes(true, false);
    let mut engine = LayoutEngine::new(config).expect("valid config");
    let layout = engine.compute().expect("layout fits");

    let top = layout.axis(AxisRole::X { mirror: true }).expect("top axis");
    assert_eq!(top.side, AxisSide::Top);
    assert_eq!(top.origin, (layout.plot.x1, layout.plot.y1));
    assert!(layout.padding.top >= 20.0, "top labels need room above the plot");
}

#[test]
fn inverted_fixed_bounds_are_rejected() {
    let config = basic_config().with_y_axis(0, AxisOptions::default().with_bounds(Some(10.0), Some(0.0)));
    let mut engine = LayoutEngine::new(config).expect("valid config");
    assert!(matches!(
        engine.compute(),
        Err(ChartError::InvertedBounds { .. })
    ));
}

#[test]
fn axis_without_data_or_bounds_is_non_numeric() {
    let mut engine = LayoutEngine::new(LayoutConfig::default()).expect("valid config");
    match engine.compute() {
        Err(ChartError::NonNumericBounds { axis }) => assert_eq!(axis, "x"),
        other => panic!("expected NonNumericBounds, got {other:?}"),
    }
}

#[test]
fn guidelines_extend_the_axis_range() {
    let config = LayoutConfig::new(Viewport::new(800, 600))
        .with_dataset(DatasetRange::new("small", (0.0, 10.0), (0.0, 50.0)))
        .with_guideline(Guideline {
            orientation: Orientation::Y,
            axis: 0,
            value: 200.0,
        });
    let mut engine = LayoutEngine::new(config).expect("valid config");
    let layout = engine.compute().expect("layout fits");

    let y = layout
        .axis(AxisRole::Y {
            index: 0,
            mirror: false,
        })
        .expect("primary y axis");
    assert_eq!(y.ends.max, 200.0);
    assert!(y.axis.grid_points(0.0).iter().any(|point| point.value >= 200.0));
}

#[test]
fn calendar_x_axis_is_built_from_epoch_seconds() {
    let config = LayoutConfig::new(Viewport::new(900, 400))
        .with_x_axis(AxisOptions::calendar())
        .with_dataset(DatasetRange::new("ticks", (JAN_1_2024, JAN_8_2024), (0.0, 10.0)));
    let mut engine = LayoutEngine::new(config).expect("valid config");
    let layout = engine.compute().expect("layout fits");

    let x = layout.axis(AxisRole::X { mirror: false }).expect("x axis");
    assert!(matches!(x.axis, ChartAxis::Calendar(_)));
    assert!(!x.axis.grid_points(0.0).is_empty());
    assert!(engine.text_overlap(x) <= 0.0);
}

#[test]
fn computed_layout_renders_through_null_renderer() {
    let mut engine = LayoutEngine::new(basic_config().with_double_axes(true, true))
        .expect("valid config");
    let layout = engine.compute().expect("layout fits");

    let mut backend = NullRenderer::default();
    let frame = engine.render(&layout, &mut backend).expect("frame renders");

    assert_eq!(backend.frames_rendered, 1);
    assert_eq!(backend.last_text_count, frame.texts.len());
    assert!(!frame.lines.is_empty());
    for text in &frame.texts {
        assert!(text.x >= 0.0 && text.x <= 800.0);
        assert!(text.y >= 0.0 && text.y <= 600.0);
    }
}

#[test]
fn invalid_config_is_rejected_up_front() {
    let config = LayoutConfig::new(Viewport::new(0, 600));
    assert!(matches!(
        LayoutEngine::new(config),
        Err(ChartError::InvalidViewport { .. })
    ));

    let orphan = basic_config()
        .with_dataset(DatasetRange::new("orphan", (0.0, 1.0), (0.0, 1.0)).on_y_axis(3));
    assert!(matches!(
        LayoutEngine::new(orphan),
        Err(ChartError::InvalidData(_))
    ));
}
