use serde::{Deserialize, Serialize};

use super::AxisOptions;
use crate::core::Viewport;
use crate::error::{ChartError, ChartResult};
use crate::render::AxisStyle;

/// Space reserved around the plot rectangle, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Padding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Padding {
    #[must_use]
    pub fn uniform(value: f64) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }
}

/// Per-side padding overrides. Fixed sides are excluded from convergence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FixedPadding {
    pub top: Option<f64>,
    pub right: Option<f64>,
    pub bottom: Option<f64>,
    pub left: Option<f64>,
}

/// Data extents of one dataset, as supplied by series construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DatasetRange {
    pub name: String,
    /// Index into [`LayoutConfig::y_axes`].
    pub y_axis: usize,
    pub x_min: Option<f64>,
    pub x_max: Option<f64>,
    pub y_min: Option<f64>,
    pub y_max: Option<f64>,
}

impl DatasetRange {
    #[must_use]
    pub fn new(name: impl Into<String>, x: (f64, f64), y: (f64, f64)) -> Self {
        Self {
            name: name.into(),
            y_axis: 0,
            x_min: Some(x.0),
            x_max: Some(x.1),
            y_min: Some(y.0),
            y_max: Some(y.1),
        }
    }

    #[must_use]
    pub fn on_y_axis(mut self, y_axis: usize) -> Self {
        self.y_axis = y_axis;
        self
    }

    pub(crate) fn x_extent(&self) -> (f64, f64) {
        (
            self.x_min.unwrap_or(f64::NAN),
            self.x_max.unwrap_or(f64::NAN),
        )
    }

    pub(crate) fn y_extent(&self) -> (f64, f64) {
        (
            self.y_min.unwrap_or(f64::NAN),
            self.y_max.unwrap_or(f64::NAN),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    X,
    Y,
}

/// Horizontal or vertical reference line that the axis range must include.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Guideline {
    pub orientation: Orientation,
    /// Y axis index; ignored for X guidelines.
    #[serde(default)]
    pub axis: usize,
    pub value: f64,
}

/// Complete description of a chart's axes, as loaded by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub viewport: Viewport,
    pub fixed_padding: FixedPadding,
    pub x_axis: AxisOptions,
    pub y_axes: Vec<AxisOptions>,
    pub datasets: Vec<DatasetRange>,
    pub guidelines: Vec<Guideline>,
    /// Mirror the X axis at the top of the plot.
    pub double_x: bool,
    /// Mirror the primary Y axis on the right of the plot.
    pub double_y: bool,
    /// Gap between stacked right-hand axes.
    pub axis_gap: f64,
    pub x_style: AxisStyle,
    pub y_style: AxisStyle,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::new(800, 600),
            fixed_padding: FixedPadding::default(),
            x_axis: AxisOptions::default(),
            y_axes: vec![AxisOptions::default()],
            datasets: Vec::new(),
            guidelines: Vec::new(),
            double_x: false,
            double_y: false,
            axis_gap: 10.0,
            x_style: AxisStyle::default(),
            y_style: AxisStyle::default(),
        }
    }
}

impl LayoutConfig {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_x_axis(mut self, options: AxisOptions) -> Self {
        self.x_axis = options;
        self
    }

    #[must_use]
    pub fn with_y_axis(mut self, index: usize, options: AxisOptions) -> Self {
        if self.y_axes.len() <= index {
            self.y_axes.resize_with(index + 1, AxisOptions::default);
        }
        self.y_axes[index] = options;
        self
    }

    #[must_use]
    pub fn with_dataset(mut self, dataset: DatasetRange) -> Self {
        self.datasets.push(dataset);
        self
    }

    #[must_use]
    pub fn with_guideline(mut self, guideline: Guideline) -> Self {
        self.guidelines.push(guideline);
        self
    }

    #[must_use]
    pub fn with_fixed_padding(mut self, fixed_padding: FixedPadding) -> Self {
        self.fixed_padding = fixed_padding;
        self
    }

    #[must_use]
    pub fn with_double_axes(mut self, double_x: bool, double_y: bool) -> Self {
        self.double_x = double_x;
        self.double_y = double_y;
        self
    }

    #[must_use]
    pub fn with_styles(mut self, x_style: AxisStyle, y_style: AxisStyle) -> Self {
        self.x_style = x_style;
        self.y_style = y_style;
        self
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let config: Self = serde_json::from_str(input).map_err(|e| {
            ChartError::InvalidData(format!("failed to parse layout config json: {e}"))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            ChartError::InvalidData(format!("failed to serialize layout config json: {e}"))
        })
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }
        if self.y_axes.is_empty() {
            return Err(ChartError::InvalidData(
                "layout needs at least one y axis".to_owned(),
            ));
        }
        for dataset in &self.datasets {
            if dataset.y_axis >= self.y_axes.len() {
                return Err(ChartError::InvalidData(format!(
                    "dataset `{}` uses y axis {} but only {} are configured",
                    dataset.name,
                    dataset.y_axis,
                    self.y_axes.len()
                )));
            }
        }
        for padding in [
            self.fixed_padding.top,
            self.fixed_padding.right,
            self.fixed_padding.bottom,
            self.fixed_padding.left,
        ]
        .into_iter()
        .flatten()
        {
            if !padding.is_finite() || padding < 0.0 {
                return Err(ChartError::InvalidData(
                    "fixed padding must be finite and >= 0".to_owned(),
                ));
            }
        }
        if !self.axis_gap.is_finite() || self.axis_gap < 0.0 {
            return Err(ChartError::InvalidData(
                "axis gap must be finite and >= 0".to_owned(),
            ));
        }
        Ok(())
    }

    /// Y axis indexes in use: every index a dataset is assigned to, and the
    /// primary axis when no dataset is present.
    #[must_use]
    pub fn active_y_axes(&self) -> Vec<usize> {
        let mut indexes: Vec<usize> = self.datasets.iter().map(|dataset| dataset.y_axis).collect();
        if indexes.is_empty() {
            indexes.push(0);
        }
        indexes.sort_unstable();
        indexes.dedup();
        indexes
    }
}
