//! chart-grid: axis layout and grid-division engine.
//!
//! Turns numeric and calendar value ranges into tick positions, labels and
//! text placement, and converges on the padding a plot rectangle needs so
//! axis text never clips.

pub mod api;
pub mod core;
pub mod error;
pub mod render;
pub mod telemetry;

pub use api::{AxisOptions, ChartLayout, LayoutConfig, LayoutEngine};
pub use error::{ChartError, ChartResult};
