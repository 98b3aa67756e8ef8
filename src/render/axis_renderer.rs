//! Axis measurement and drawing.
//!
//! [`AxisRenderer::layout`] is the only place tick, label and title placement
//! is computed. Measuring reads the bounding box of that geometry and drawing
//! translates the same geometry into frame primitives, so the two can never
//! disagree about where text lands.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::{
    BoundingBox, EstimatedTextMetrics, GridAxis, MeasureCache, MeasureCacheStats, TextMetrics,
    Viewport,
};
use crate::render::{Color, LinePrimitive, RenderFrame, TextPrimitive};

/// Edge of the plot rectangle an axis is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisSide {
    Bottom,
    Top,
    Left,
    Right,
}

impl AxisSide {
    #[must_use]
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::Bottom | Self::Top)
    }

    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Bottom => Self::Top,
            Self::Top => Self::Bottom,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Maps an axis-local `(along, out)` pair to screen space.
    ///
    /// `along` runs with the axis (left to right, bottom to top) and `out`
    /// points away from the plot.
    #[must_use]
    pub fn to_screen(self, origin: (f64, f64), along: f64, out: f64) -> (f64, f64) {
        let (x0, y0) = origin;
        match self {
            Self::Bottom => (x0 + along, y0 + out),
            Self::Top => (x0 + along, y0 - out),
            Self::Left => (x0 - out, y0 - along),
            Self::Right => (x0 + out, y0 - along),
        }
    }
}

/// Per-orientation axis styling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisStyle {
    /// Font name handed to the text measurer.
    pub font: String,
    pub font_size: f64,
    pub line_spacing: f64,
    /// Label rotation in degrees.
    pub text_angle: f64,
    /// Gap between tick ends, labels and the title.
    pub text_space: f64,
    pub tick_length: f64,
    pub subdivision_tick_length: f64,
    pub show_axis_line: bool,
    pub show_ticks: bool,
    pub show_subdivisions: bool,
    pub show_labels: bool,
    pub title: Option<String>,
    pub title_font_size: f64,
    pub line_color: Color,
    pub text_color: Color,
    pub stroke_width: f64,
}

impl Default for AxisStyle {
    fn default() -> Self {
        Self {
            font: "sans-serif".to_owned(),
            font_size: 12.0,
            line_spacing: 1.2,
            text_angle: 0.0,
            text_space: 3.0,
            tick_length: 5.0,
            subdivision_tick_length: 2.0,
            show_axis_line: true,
            show_ticks: true,
            show_subdivisions: true,
            show_labels: true,
            title: None,
            title_font_size: 14.0,
            line_color: Color::BLACK,
            text_color: Color::BLACK,
            stroke_width: 1.0,
        }
    }
}

impl AxisStyle {
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_font(mut self, font: impl Into<String>) -> Self {
        self.font = font.into();
        self
    }

    #[must_use]
    pub fn with_font_size(mut self, font_size: f64) -> Self {
        self.font_size = font_size;
        self
    }

    #[must_use]
    pub fn with_text_angle(mut self, text_angle: f64) -> Self {
        self.text_angle = text_angle;
        self
    }
}

/// Rectangle in the axis-local `(along, out)` frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalRect {
    pub along1: f64,
    pub along2: f64,
    pub out1: f64,
    pub out2: f64,
}

impl LocalRect {
    fn centered(along: f64, along_extent: f64, out: f64, out_extent: f64) -> Self {
        Self {
            along1: along - along_extent / 2.0,
            along2: along + along_extent / 2.0,
            out1: out,
            out2: out + out_extent,
        }
    }

    #[must_use]
    pub fn along_center(&self) -> f64 {
        (self.along1 + self.along2) / 2.0
    }

    #[must_use]
    pub fn out_center(&self) -> f64 {
        (self.out1 + self.out2) / 2.0
    }

    #[must_use]
    pub fn to_screen(&self, side: AxisSide, origin: (f64, f64)) -> BoundingBox {
        let (x1, y1) = side.to_screen(origin, self.along1, self.out1);
        let (x2, y2) = side.to_screen(origin, self.along2, self.out2);
        BoundingBox::new(x1, y1, x2, y2)
    }
}

/// Tick mark running outward from the axis line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickMark {
    pub along: f64,
    pub length: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedText {
    pub text: String,
    pub rect: LocalRect,
}

/// Axis-local geometry shared by measuring and drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisGeometry {
    pub side: AxisSide,
    pub length: f64,
    pub axis_line: bool,
    pub ticks: Vec<TickMark>,
    pub subdivision_ticks: Vec<TickMark>,
    /// Labels in axis order.
    pub labels: Vec<PlacedText>,
    pub title: Option<PlacedText>,
}

impl AxisGeometry {
    /// Screen-space bounding box of everything the axis draws at `origin`.
    #[must_use]
    pub fn bounding_box(&self, origin: (f64, f64)) -> BoundingBox {
        let mut bbox = BoundingBox::empty();
        let mut grow_local = |rect: LocalRect| bbox.grow_box(&rect.to_screen(self.side, origin));

        if self.axis_line {
            grow_local(LocalRect {
                along1: 0.0,
                along2: self.length,
                out1: 0.0,
                out2: 0.0,
            });
        }
        for tick in self.ticks.iter().chain(&self.subdivision_ticks) {
            grow_local(LocalRect {
                along1: tick.along,
                along2: tick.along,
                out1: 0.0,
                out2: tick.length,
            });
        }
        for text in self.labels.iter().chain(&self.title) {
            grow_local(text.rect);
        }
        bbox
    }

    /// Most negative gap between consecutive label boxes, or 0 when none
    /// overlap.
    #[must_use]
    pub fn text_overlap(&self) -> f64 {
        let mut rects: Vec<LocalRect> = self.labels.iter().map(|label| label.rect).collect();
        rects.sort_by(|left, right| left.along1.total_cmp(&right.along1));
        rects
            .windows(2)
            .map(|pair| pair[1].along1 - pair[0].along2)
            .fold(0.0, f64::min)
    }
}

/// Measures and draws axes with a memoising text measurer.
#[derive(Debug)]
pub struct AxisRenderer<M: TextMetrics = EstimatedTextMetrics> {
    metrics: M,
    cache: MeasureCache,
}

impl Default for AxisRenderer {
    fn default() -> Self {
        Self::new(EstimatedTextMetrics::default())
    }
}

impl<M: TextMetrics> AxisRenderer<M> {
    #[must_use]
    pub fn new(metrics: M) -> Self {
        Self {
            metrics,
            cache: MeasureCache::default(),
        }
    }

    #[must_use]
    pub fn metrics(&self) -> &M {
        &self.metrics
    }

    #[must_use]
    pub fn cache_stats(&self) -> MeasureCacheStats {
        self.cache.stats()
    }

    /// Extents of `text` along and away from an axis on `side`.
    fn text_extents(
        &mut self,
        side: AxisSide,
        text: &str,
        font: &str,
        font_size: f64,
        angle_deg: f64,
        line_spacing: f64,
    ) -> (f64, f64) {
        let size = self
            .cache
            .measure(&self.metrics, text, font, font_size, angle_deg, line_spacing);
        if side.is_horizontal() {
            (size.width, size.height)
        } else {
            (size.height, size.width)
        }
    }

    /// Computes tick, label and title placement for `axis` on `side`.
    pub fn layout(&mut self, axis: &dyn GridAxis, side: AxisSide, style: &AxisStyle) -> AxisGeometry {
        let length = axis.length();
        let points = axis.grid_points(0.0);

        let ticks = if style.show_ticks {
            points
                .iter()
                .map(|point| TickMark {
                    along: point.position,
                    length: style.tick_length,
                })
                .collect()
        } else {
            Vec::new()
        };
        let subdivision_ticks = if style.show_ticks && style.show_subdivisions {
            axis.subdivision_points(0.0)
                .iter()
                .map(|point| TickMark {
                    along: point.position,
                    length: style.subdivision_tick_length,
                })
                .collect()
        } else {
            Vec::new()
        };

        let label_out = if style.show_ticks { style.tick_length } else { 0.0 } + style.text_space;
        let mut labels = Vec::new();
        if style.show_labels {
            let anchors: Vec<(f64, String)> = if axis.block_centered() {
                points
                    .windows(2)
                    .map(|pair| {
                        (
                            (pair[0].position + pair[1].position) / 2.0,
                            pair[0].text.joined(),
                        )
                    })
                    .collect()
            } else {
                points
                    .iter()
                    .map(|point| (point.position, point.text.joined()))
                    .collect()
            };
            for (along, text) in anchors {
                if text.trim().is_empty() {
                    continue;
                }
                let (along_extent, out_extent) = self.text_extents(
                    side,
                    &text,
                    &style.font,
                    style.font_size,
                    style.text_angle,
                    style.line_spacing,
                );
                labels.push(PlacedText {
                    text,
                    rect: LocalRect::centered(along, along_extent, label_out, out_extent),
                });
            }
        }

        let title = style
            .title
            .as_deref()
            .filter(|title| !title.is_empty())
            .map(|title| {
                let labels_end = labels
                    .iter()
                    .map(|label| label.rect.out2)
                    .fold(label_out - style.text_space, f64::max);
                let angle = if side.is_horizontal() { 0.0 } else { 90.0 };
                let (along_extent, out_extent) = self.text_extents(
                    side,
                    title,
                    &style.font,
                    style.title_font_size,
                    angle,
                    style.line_spacing,
                );
                PlacedText {
                    text: title.to_owned(),
                    rect: LocalRect::centered(
                        length / 2.0,
                        along_extent,
                        labels_end + style.text_space,
                        out_extent,
                    ),
                }
            });

        trace!(
            ?side,
            length,
            ticks = points.len(),
            labels = labels.len(),
            "axis geometry"
        );
        AxisGeometry {
            side,
            length,
            axis_line: style.show_axis_line,
            ticks,
            subdivision_ticks,
            labels,
            title,
        }
    }

    /// Bounding box of the axis drawn at the screen origin `(0, 0)`.
    pub fn measure(&mut self, axis: &dyn GridAxis, side: AxisSide, style: &AxisStyle) -> BoundingBox {
        self.layout(axis, side, style).bounding_box((0.0, 0.0))
    }

    pub fn text_overlap(&mut self, axis: &dyn GridAxis, side: AxisSide, style: &AxisStyle) -> f64 {
        self.layout(axis, side, style).text_overlap()
    }

    /// Emits the axis primitives with the axis origin at `origin`.
    ///
    /// For horizontal axes the origin is the left end of the axis line; for
    /// vertical axes it is the bottom end.
    pub fn draw(
        &mut self,
        axis: &dyn GridAxis,
        side: AxisSide,
        style: &AxisStyle,
        origin: (f64, f64),
        viewport: Viewport,
    ) -> RenderFrame {
        let geometry = self.layout(axis, side, style);
        render_geometry(&geometry, style, origin, viewport)
    }
}

/// Translates axis-local geometry into frame primitives at `origin`.
#[must_use]
pub fn render_geometry(
    geometry: &AxisGeometry,
    style: &AxisStyle,
    origin: (f64, f64),
    viewport: Viewport,
) -> RenderFrame {
    let side = geometry.side;
    let mut frame = RenderFrame::new(viewport);
    let line = |along1: f64, out1: f64, along2: f64, out2: f64| {
        let (x1, y1) = side.to_screen(origin, along1, out1);
        let (x2, y2) = side.to_screen(origin, along2, out2);
        LinePrimitive::new(x1, y1, x2, y2, style.stroke_width, style.line_color)
    };

    if geometry.axis_line {
        frame.lines.push(line(0.0, 0.0, geometry.length, 0.0));
    }
    for tick in geometry.ticks.iter().chain(&geometry.subdivision_ticks) {
        frame.lines.push(line(tick.along, 0.0, tick.along, tick.length));
    }

    for label in &geometry.labels {
        let (x, y) = side.to_screen(origin, label.rect.along_center(), label.rect.out_center());
        frame.texts.push(
            TextPrimitive::new(label.text.clone(), x, y, style.font_size, style.text_color)
                .with_rotation(style.text_angle)
                .with_line_spacing(style.line_spacing),
        );
    }
    if let Some(title) = &geometry.title {
        let (x, y) = side.to_screen(origin, title.rect.along_center(), title.rect.out_center());
        let rotation = match side {
            AxisSide::Left => -90.0,
            AxisSide::Right => 90.0,
            AxisSide::Bottom | AxisSide::Top => 0.0,
        };
        frame.texts.push(
            TextPrimitive::new(title.text.clone(), x, y, style.title_font_size, style.text_color)
                .with_rotation(rotation),
        );
    }
    frame
}

#[cfg(test)]
mod tests {
    use super::{AxisSide, LocalRect};

    #[test]
    fn local_frame_maps_outward_away_from_plot() {
        let origin = (100.0, 200.0);
        assert_eq!(AxisSide::Bottom.to_screen(origin, 10.0, 5.0), (110.0, 205.0));
        assert_eq!(AxisSide::Top.to_screen(origin, 10.0, 5.0), (110.0, 195.0));
        assert_eq!(AxisSide::Left.to_screen(origin, 10.0, 5.0), (95.0, 190.0));
        assert_eq!(AxisSide::Right.to_screen(origin, 10.0, 5.0), (105.0, 190.0));
    }

    #[test]
    fn local_rect_normalises_on_vertical_sides() {
        let rect = LocalRect {
            along1: 0.0,
            along2: 20.0,
            out1: 3.0,
            out2: 13.0,
        };
        let bbox = rect.to_screen(AxisSide::Left, (50.0, 100.0));
        assert_eq!((bbox.x1, bbox.x2), (37.0, 47.0));
        assert_eq!((bbox.y1, bbox.y2), (80.0, 100.0));
    }
}
