use crate::core::{CalendarAxis, GridPoint, LogAxis, NumericAxis};

/// Common contract of every axis variant.
///
/// Positions are pixel offsets along the axis from its origin; `start` in the
/// grid methods shifts every returned position.
pub trait GridAxis {
    fn length(&self) -> f64;
    fn position(&self, value: f64) -> f64;
    fn value(&self, position: f64) -> f64;
    /// Pixels per nominal unit (value unit, power of the base or grid unit).
    fn unit(&self) -> f64;
    fn zero(&self) -> f64;
    fn reversed(&self) -> bool;
    /// Labels sit between grid points instead of on them.
    fn block_centered(&self) -> bool;
    fn grid_points(&self, start: f64) -> Vec<GridPoint>;
    fn subdivision_points(&self, start: f64) -> Vec<GridPoint>;
}

/// Axis instance produced by the layout engine.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartAxis {
    Numeric(NumericAxis),
    Log(LogAxis),
    Calendar(CalendarAxis),
}

macro_rules! dispatch {
    ($self:ident, $axis:ident => $body:expr) => {
        match $self {
            ChartAxis::Numeric($axis) => $body,
            ChartAxis::Log($axis) => $body,
            ChartAxis::Calendar($axis) => $body,
        }
    };
}

impl GridAxis for ChartAxis {
    fn length(&self) -> f64 {
        dispatch!(self, axis => axis.length())
    }

    fn position(&self, value: f64) -> f64 {
        dispatch!(self, axis => axis.position(value))
    }

    fn value(&self, position: f64) -> f64 {
        dispatch!(self, axis => axis.value(position))
    }

    fn unit(&self) -> f64 {
        dispatch!(self, axis => axis.unit())
    }

    fn zero(&self) -> f64 {
        dispatch!(self, axis => axis.zero())
    }

    fn reversed(&self) -> bool {
        dispatch!(self, axis => axis.options().reversed)
    }

    fn block_centered(&self) -> bool {
        dispatch!(self, axis => axis.options().block_centered)
    }

    fn grid_points(&self, start: f64) -> Vec<GridPoint> {
        dispatch!(self, axis => axis.grid_points(start))
    }

    fn subdivision_points(&self, start: f64) -> Vec<GridPoint> {
        dispatch!(self, axis => axis.subdivision_points(start))
    }
}

macro_rules! forward_grid_axis {
    ($($ty:ty),+) => {$(
        impl GridAxis for $ty {
            fn length(&self) -> f64 {
                <$ty>::length(self)
            }

            fn position(&self, value: f64) -> f64 {
                <$ty>::position(self, value)
            }

            fn value(&self, position: f64) -> f64 {
                <$ty>::value(self, position)
            }

            fn unit(&self) -> f64 {
                <$ty>::unit(self)
            }

            fn zero(&self) -> f64 {
                <$ty>::zero(self)
            }

            fn reversed(&self) -> bool {
                self.options().reversed
            }

            fn block_centered(&self) -> bool {
                self.options().block_centered
            }

            fn grid_points(&self, start: f64) -> Vec<GridPoint> {
                <$ty>::grid_points(self, start)
            }

            fn subdivision_points(&self, start: f64) -> Vec<GridPoint> {
                <$ty>::subdivision_points(self, start)
            }
        }
    )+};
}

forward_grid_axis!(NumericAxis, LogAxis, CalendarAxis);

impl From<NumericAxis> for ChartAxis {
    fn from(axis: NumericAxis) -> Self {
        Self::Numeric(axis)
    }
}

impl From<LogAxis> for ChartAxis {
    fn from(axis: LogAxis) -> Self {
        Self::Log(axis)
    }
}

impl From<CalendarAxis> for ChartAxis {
    fn from(axis: CalendarAxis) -> Self {
        Self::Calendar(axis)
    }
}
