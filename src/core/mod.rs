pub mod axis;
pub mod calendar;
pub mod calendar_axis;
pub mod division;
pub mod grid;
pub mod label_format;
pub mod log_axis;
pub mod numeric_axis;
pub mod text;
pub mod types;

pub use axis::{ChartAxis, GridAxis};
pub use calendar::{CalendarConfig, CalendarTimeZone, calendar_timestamp};
pub use calendar_axis::{CalendarAxis, CalendarAxisOptions, DivisionChoice, search_divisions};
pub use division::{Division, DivisionId, DivisionTable, FixedDivision, TimeUnit};
pub use grid::{GRID_END_TOLERANCE_PX, MAX_GRID_POINTS};
pub use label_format::{
    AxisLabelLocale, CalendarLabelFormat, NumericLabelFormat, suppress_repeated_levels,
};
pub use log_axis::LogAxis;
pub use numeric_axis::{NumericAxis, NumericAxisOptions};
pub use text::{
    EstimatedTextMetrics, FontMetrics, FontMetricsCache, MeasureCache, MeasureCacheStats,
    TextMetrics, TextSize,
};
pub use types::{BoundingBox, GridLabel, GridPoint, Viewport};
