//! Padding convergence around the plot rectangle.
//!
//! Axis text size depends on the axis length and the axis length depends on
//! the padding reserved for text, so padding is found by fixed-point
//! iteration: build trial axes for the current guess, measure how far they
//! spill past the plot rectangle, and adopt that spill as the next guess.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::axis_ends::{AxisEnds, resolve_axis_ends};
use super::{FixedPadding, LayoutConfig, Orientation, Padding};
use crate::core::{BoundingBox, ChartAxis, EstimatedTextMetrics, TextMetrics, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::render::{AxisRenderer, AxisSide, AxisStyle, RenderFrame, Renderer};

/// Upper bound on layout passes.
pub const MAX_LAYOUT_PASSES: usize = 10;

/// Which configured axis a placed axis renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AxisRole {
    X { mirror: bool },
    Y { index: usize, mirror: bool },
}

/// One axis frozen at its final position.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedAxis {
    pub role: AxisRole,
    pub side: AxisSide,
    pub axis: ChartAxis,
    pub ends: AxisEnds,
    /// Outward distance from the plot edge to the axis line.
    pub offset: f64,
    /// Screen position of the axis start (left end or bottom end).
    pub origin: (f64, f64),
    /// Screen-space extent measured at `origin`.
    pub bounds: BoundingBox,
}

/// Result of [`LayoutEngine::compute`].
#[derive(Debug, Clone, PartialEq)]
pub struct ChartLayout {
    pub viewport: Viewport,
    pub padding: Padding,
    pub plot: BoundingBox,
    pub axes: Vec<PlacedAxis>,
    pub passes: usize,
    /// `false` when the pass cap was hit and the last guess was kept.
    pub converged: bool,
}

impl ChartLayout {
    #[must_use]
    pub fn axis(&self, role: AxisRole) -> Option<&PlacedAxis> {
        self.axes.iter().find(|placed| placed.role == role)
    }

    /// Union of every axis box and the plot rectangle.
    #[must_use]
    pub fn content_bounds(&self) -> BoundingBox {
        let mut bounds = self.plot;
        for placed in &self.axes {
            bounds.grow_box(&placed.bounds);
        }
        bounds
    }
}

/// Axis ranges resolved once per layout; only lengths change between passes.
#[derive(Debug, Clone)]
struct ResolvedRanges {
    x: AxisEnds,
    y: Vec<(usize, AxisEnds)>,
}

/// Drives trial axis construction and measurement to a stable padding.
#[derive(Debug)]
pub struct LayoutEngine<M: TextMetrics = EstimatedTextMetrics> {
    config: LayoutConfig,
    renderer: AxisRenderer<M>,
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig) -> ChartResult<Self> {
        Self::with_metrics(config, EstimatedTextMetrics::new())
    }
}

impl<M: TextMetrics> LayoutEngine<M> {
    pub fn with_metrics(config: LayoutConfig, metrics: M) -> ChartResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            renderer: AxisRenderer::new(metrics),
        })
    }

    #[must_use]
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    #[must_use]
    pub fn renderer(&self) -> &AxisRenderer<M> {
        &self.renderer
    }

    /// Resolves every axis range from fixed bounds, datasets and guidelines.
    fn resolve_ranges(&self) -> ChartResult<ResolvedRanges> {
        let config = &self.config;
        let x = resolve_axis_ends(
            "x",
            &config.x_axis,
            config.datasets.iter().map(|dataset| dataset.x_extent()),
            config
                .guidelines
                .iter()
                .filter(|guide| guide.orientation == Orientation::X)
                .map(|guide| guide.value),
        )?;

        let mut y = Vec::new();
        for index in config.active_y_axes() {
            let options = config.y_axes.get(index).ok_or_else(|| {
                ChartError::InvalidData(format!("y axis {index} is not configured"))
            })?;
            let ends = resolve_axis_ends(
                &format!("y{index}"),
                options,
                config
                    .datasets
                    .iter()
                    .filter(|dataset| dataset.y_axis == index)
                    .map(|dataset| dataset.y_extent()),
                config
                    .guidelines
                    .iter()
                    .filter(|guide| guide.orientation == Orientation::Y && guide.axis == index)
                    .map(|guide| guide.value),
            )?;
            y.push((index, ends));
        }
        Ok(ResolvedRanges { x, y })
    }

    /// Runs the padding convergence loop.
    ///
    /// Fails with [`ChartError::NotEnoughSpace`] as soon as a trial leaves
    /// less than one pixel for the plot in either dimension.
    pub fn compute(&mut self) -> ChartResult<ChartLayout> {
        self.config.validate()?;
        let ranges = self.resolve_ranges()?;
        let fixed = self.config.fixed_padding;
        let mut padding = apply_fixed(Padding::default(), fixed);

        for pass in 1..=MAX_LAYOUT_PASSES {
            let trial = self.trial(&ranges, padding)?;
            let next = apply_fixed(required_padding(&trial), fixed);
            debug!(
                pass,
                top = next.top,
                right = next.right,
                bottom = next.bottom,
                left = next.left,
                "layout pass"
            );
            if next == padding {
                return Ok(ChartLayout {
                    passes: pass,
                    converged: true,
                    ..trial
                });
            }
            padding = next;
        }

        warn!(
            passes = MAX_LAYOUT_PASSES,
            top = padding.top,
            right = padding.right,
            bottom = padding.bottom,
            left = padding.left,
            "layout did not converge; keeping last padding"
        );
        let trial = self.trial(&ranges, padding)?;
        Ok(ChartLayout {
            passes: MAX_LAYOUT_PASSES,
            converged: false,
            ..trial
        })
    }

    /// Builds and measures every axis for one padding guess.
    fn trial(&mut self, ranges: &ResolvedRanges, padding: Padding) -> ChartResult<ChartLayout> {
        let viewport = self.config.viewport;
        let width = f64::from(viewport.width);
        let height = f64::from(viewport.height);
        let plot = BoundingBox::new(
            padding.left,
            padding.top,
            width - padding.right,
            height - padding.bottom,
        );
        let plot_width = width - padding.left - padding.right;
        let plot_height = height - padding.top - padding.bottom;
        let x_axes = if self.config.double_x { 2 } else { 1 };
        let y_axes = ranges.y.len() + usize::from(self.config.double_y);
        if plot_width < 1.0 {
            return Err(ChartError::NotEnoughSpace { axes: y_axes });
        }
        if plot_height < 1.0 {
            return Err(ChartError::NotEnoughSpace { axes: x_axes });
        }

        let config = &self.config;
        let mut axes = Vec::with_capacity(x_axes + y_axes);

        let x_axis = config.x_axis.build_axis(plot_width, ranges.x.min, ranges.x.max)?;
        let mut x_sides = vec![(AxisSide::Bottom, false)];
        if config.double_x {
            x_sides.push((AxisSide::Top, true));
        }
        for (side, mirror) in x_sides {
            let origin = match side {
                AxisSide::Top => (plot.x1, plot.y1),
                _ => (plot.x1, plot.y2),
            };
            let bounds = self
                .renderer
                .measure(&x_axis, side, &config.x_style)
                .translated(origin.0, origin.1);
            axes.push(PlacedAxis {
                role: AxisRole::X { mirror },
                side,
                axis: x_axis.clone(),
                ends: ranges.x,
                offset: 0.0,
                origin,
                bounds,
            });
        }

        // Right-hand stack: the mirrored primary first, then secondary axes.
        let mut right_offset = 0.0;
        for (position, &(index, ends)) in ranges.y.iter().enumerate() {
            let options = config.y_axes.get(index).ok_or_else(|| {
                ChartError::InvalidData(format!("y axis {index} is not configured"))
            })?;
            let y_axis = options.build_axis(plot_height, ends.min, ends.max)?;

            let mut placements = Vec::new();
            if position == 0 {
                placements.push((AxisSide::Left, false));
                if config.double_y {
                    placements.push((AxisSide::Right, true));
                }
            } else {
                placements.push((AxisSide::Right, false));
            }

            for (side, mirror) in placements {
                let local = self.renderer.measure(&y_axis, side, &config.y_style);
                let offset = if side == AxisSide::Right {
                    let offset = right_offset;
                    right_offset += local.x2.max(0.0) + config.axis_gap;
                    offset
                } else {
                    0.0
                };
                let origin = match side {
                    AxisSide::Right => (plot.x2 + offset, plot.y2),
                    _ => (plot.x1, plot.y2),
                };
                axes.push(PlacedAxis {
                    role: AxisRole::Y { index, mirror },
                    side,
                    axis: y_axis.clone(),
                    ends,
                    offset,
                    origin,
                    bounds: local.translated(origin.0, origin.1),
                });
            }
        }

        Ok(ChartLayout {
            viewport,
            padding,
            plot,
            axes,
            passes: 0,
            converged: false,
        })
    }

    /// Emits primitives for every placed axis.
    pub fn draw(&mut self, layout: &ChartLayout) -> RenderFrame {
        let mut frame = RenderFrame::new(layout.viewport);
        for placed in &layout.axes {
            let style = self.style_for(placed.role).clone();
            frame.extend(self.renderer.draw(
                &placed.axis,
                placed.side,
                &style,
                placed.origin,
                layout.viewport,
            ));
        }
        frame
    }

    /// Draws `layout` and hands the frame to `renderer`.
    pub fn render<R: Renderer + ?Sized>(
        &mut self,
        layout: &ChartLayout,
        renderer: &mut R,
    ) -> ChartResult<RenderFrame> {
        let frame = self.draw(layout);
        renderer.render(&frame)?;
        Ok(frame)
    }

    /// Most negative label gap of the placed axis, see
    /// [`AxisRenderer::text_overlap`].
    pub fn text_overlap(&mut self, placed: &PlacedAxis) -> f64 {
        let style = self.style_for(placed.role).clone();
        self.renderer.text_overlap(&placed.axis, placed.side, &style)
    }

    fn style_for(&self, role: AxisRole) -> &AxisStyle {
        match role {
            AxisRole::X { .. } => &self.config.x_style,
            AxisRole::Y { .. } => &self.config.y_style,
        }
    }
}

/// Padding each side needs so that every axis box stays on the canvas.
fn required_padding(trial: &ChartLayout) -> Padding {
    let plot = trial.plot;
    let mut bounds = BoundingBox::empty();
    for placed in &trial.axes {
        bounds.grow_box(&placed.bounds);
    }
    if bounds.is_empty() {
        return Padding::default();
    }
    let spill = |value: f64| value.max(0.0).ceil();
    Padding {
        top: spill(plot.y1 - bounds.y1),
        right: spill(bounds.x2 - plot.x2),
        bottom: spill(bounds.y2 - plot.y2),
        left: spill(plot.x1 - bounds.x1),
    }
}

fn apply_fixed(padding: Padding, fixed: FixedPadding) -> Padding {
    Padding {
        top: fixed.top.unwrap_or(padding.top),
        right: fixed.right.unwrap_or(padding.right),
        bottom: fixed.bottom.unwrap_or(padding.bottom),
        left: fixed.left.unwrap_or(padding.left),
    }
}

#[cfg(test)]
mod tests {
    use super::{apply_fixed, required_padding};
    use crate::api::{FixedPadding, Padding};

    #[test]
    fn fixed_sides_are_kept() {
        let fixed = FixedPadding {
            left: Some(40.0),
            ..FixedPadding::default()
        };
        let padding = apply_fixed(Padding::uniform(7.0), fixed);
        assert_eq!(padding.left, 40.0);
        assert_eq!(padding.top, 7.0);
    }

    #[test]
    fn no_axes_need_no_padding() {
        let layout = super::ChartLayout {
            viewport: crate::core::Viewport::new(100, 100),
            padding: Padding::default(),
            plot: crate::core::BoundingBox::new(0.0, 0.0, 100.0, 100.0),
            axes: Vec::new(),
            passes: 0,
            converged: false,
        };
        assert_eq!(required_padding(&layout), Padding::default());
    }
}
