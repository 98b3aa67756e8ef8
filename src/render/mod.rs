mod axis_renderer;
mod frame;
mod null_renderer;
mod primitives;

pub use axis_renderer::{
    AxisGeometry, AxisRenderer, AxisSide, AxisStyle, LocalRect, PlacedText, TickMark,
    render_geometry,
};
pub use frame::RenderFrame;
pub use null_renderer::NullRenderer;
pub use primitives::{Color, LinePrimitive, TextPrimitive};

use crate::error::ChartResult;

/// Contract implemented by any rendering backend.
///
/// Backends receive a fully materialized, deterministic `RenderFrame` so
/// drawing code stays isolated from axis layout.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()>;
}
