mod axis_config;
mod axis_ends;
mod layout_config;
mod layout_engine;

pub use axis_config::{AxisOptions, ScaleKind};
pub use axis_ends::{AxisEnds, resolve_axis_ends};
pub use layout_config::{
    DatasetRange, FixedPadding, Guideline, LayoutConfig, Orientation, Padding,
};
pub use layout_engine::{
    AxisRole, ChartLayout, LayoutEngine, MAX_LAYOUT_PASSES, PlacedAxis,
};
