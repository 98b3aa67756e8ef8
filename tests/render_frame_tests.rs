use chart_grid::core::Viewport;
use chart_grid::error::ChartError;
use chart_grid::render::{Color, LinePrimitive, NullRenderer, RenderFrame, Renderer, TextPrimitive};

fn label(text: &str) -> TextPrimitive {
    TextPrimitive::new(text, 10.0, 20.0, 12.0, Color::BLACK)
}

fn frame_with(lines: Vec<LinePrimitive>, texts: Vec<TextPrimitive>) -> RenderFrame {
    RenderFrame {
        lines,
        texts,
        ..RenderFrame::new(Viewport::new(320, 200))
    }
}

#[test]
fn null_renderer_records_frame_counts() {
    let frame = frame_with(
        vec![
            LinePrimitive::new(0.0, 0.0, 100.0, 0.0, 1.0, Color::BLACK),
            LinePrimitive::new(0.0, 0.0, 0.0, 5.0, 1.0, Color::BLACK),
        ],
        vec![label("25")],
    );

    let mut renderer = NullRenderer::default();
    renderer.render(&frame).expect("valid frame");
    renderer.render(&frame).expect("valid frame");

    assert_eq!(renderer.frames_rendered, 2);
    assert_eq!(renderer.last_line_count, 2);
    assert_eq!(renderer.last_text_count, 1);
}

#[test]
fn extend_keeps_the_receiving_viewport() {
    let mut frame = frame_with(Vec::new(), vec![label("a")]);
    let mut other = RenderFrame::new(Viewport::new(10, 10));
    other.texts.push(label("b"));
    frame.extend(other);

    assert_eq!(frame.viewport, Viewport::new(320, 200));
    assert_eq!(frame.texts.len(), 2);
    assert!(RenderFrame::new(Viewport::new(1, 1)).is_empty());
}

#[test]
fn invalid_primitives_fail_validation() {
    let cases = [
        frame_with(
            vec![LinePrimitive::new(f64::NAN, 0.0, 1.0, 1.0, 1.0, Color::BLACK)],
            Vec::new(),
        ),
        frame_with(
            vec![LinePrimitive::new(0.0, 0.0, 1.0, 1.0, 0.0, Color::BLACK)],
            Vec::new(),
        ),
        frame_with(Vec::new(), vec![label("")]),
        frame_with(
            Vec::new(),
            vec![TextPrimitive::new(
                "x",
                0.0,
                0.0,
                12.0,
                Color::rgba(0.0, 0.0, 0.0, 2.0),
            )],
        ),
    ];
    for frame in cases {
        assert!(matches!(frame.validate(), Err(ChartError::InvalidData(_))));
    }

    let mut renderer = NullRenderer::default();
    let empty_viewport = RenderFrame::new(Viewport::new(0, 200));
    assert!(matches!(
        renderer.render(&empty_viewport),
        Err(ChartError::InvalidViewport { .. })
    ));
    assert_eq!(renderer.frames_rendered, 0);
}
