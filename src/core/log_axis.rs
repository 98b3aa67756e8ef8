use crate::core::grid::{GRID_END_TOLERANCE_PX, MAX_GRID_POINTS, PositionBuckets};
use crate::core::numeric_axis::validate_length;
use crate::core::{GridPoint, NumericAxisOptions};
use crate::error::{ChartError, ChartResult};

/// Logarithmic value axis.
///
/// Bounds are widened to whole powers of `base`; main ticks sit on powers
/// (thinned to every n-th power when they would be closer than `min_space`)
/// and subdivisions on integer multiples of each power.
#[derive(Debug, Clone, PartialEq)]
pub struct LogAxis {
    length: f64,
    base: f64,
    log_min: f64,
    log_max: f64,
    power_step: i32,
    options: NumericAxisOptions,
}

impl LogAxis {
    pub fn new(
        length: f64,
        min: f64,
        max: f64,
        base: f64,
        options: NumericAxisOptions,
    ) -> ChartResult<Self> {
        validate_length(length)?;
        if !base.is_finite() || base <= 1.0 {
            return Err(ChartError::InvalidData(format!(
                "log axis base must be finite and > 1, got {base}"
            )));
        }
        if !min.is_finite() || !max.is_finite() || min <= 0.0 || max <= 0.0 {
            return Err(ChartError::InvalidData(format!(
                "log axis bounds must be finite and > 0, got [{min}, {max}]"
            )));
        }
        if min >= max {
            return Err(ChartError::ZeroLengthAxis { min, max });
        }

        let log_min = (min.log(base) + 1e-9).floor();
        let mut log_max = (max.log(base) - 1e-9).ceil();
        if log_max <= log_min {
            log_max = log_min + 1.0;
        }

        let decades = log_max - log_min;
        let decade_px = length / decades;
        let power_step = if options.min_space > 0.0 && decade_px < options.min_space {
            (options.min_space / decade_px).ceil() as i32
        } else {
            1
        };

        Ok(Self {
            length,
            base,
            log_min,
            log_max,
            power_step: power_step.max(1),
            options,
        })
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        self.length
    }

    #[must_use]
    pub fn min(&self) -> f64 {
        self.base.powf(self.log_min)
    }

    #[must_use]
    pub fn max(&self) -> f64 {
        self.base.powf(self.log_max)
    }

    #[must_use]
    pub fn options(&self) -> &NumericAxisOptions {
        &self.options
    }

    /// Pixels per power of the base.
    #[must_use]
    pub fn unit(&self) -> f64 {
        self.length / (self.log_max - self.log_min)
    }

    #[must_use]
    pub fn position(&self, value: f64) -> f64 {
        let offset = if value > 0.0 {
            (value.log(self.base) - self.log_min) * self.unit()
        } else {
            f64::NEG_INFINITY
        };
        if self.options.reversed {
            self.length - offset
        } else {
            offset
        }
    }

    #[must_use]
    pub fn value(&self, position: f64) -> f64 {
        let offset = if self.options.reversed {
            self.length - position
        } else {
            position
        };
        self.base.powf(self.log_min + offset / self.unit())
    }

    /// Log axes have no zero; the axis start stands in for it.
    #[must_use]
    pub fn zero(&self) -> f64 {
        self.position(self.min())
    }

    #[must_use]
    pub fn grid_points(&self, start: f64) -> Vec<GridPoint> {
        let mut points = Vec::new();
        let mut exponent = self.log_min as i32;
        while points.len() < MAX_GRID_POINTS {
            let value = self.base.powi(exponent);
            let offset = (f64::from(exponent) - self.log_min) * self.unit();
            if offset > self.length + GRID_END_TOLERANCE_PX {
                break;
            }
            let step = value.min(1.0);
            points.push(GridPoint::new(
                start + self.position(value),
                value,
                self.options.format.format(value, step),
            ));
            exponent += self.power_step;
        }
        points
    }

    /// Multiples of each power (2, 3, … base-1 for base 10).
    #[must_use]
    pub fn subdivision_points(&self, start: f64) -> Vec<GridPoint> {
        let buckets = PositionBuckets::from_points(&self.grid_points(start));
        let whole_base = self.base.round();
        if self.power_step != 1 || (whole_base - self.base).abs() > 1e-9 || whole_base < 3.0 {
            return Vec::new();
        }

        let mut points = Vec::new();
        let mut previous = f64::NEG_INFINITY;
        let mut exponent = self.log_min as i32;
        'outer: while f64::from(exponent) < self.log_max {
            let power = self.base.powi(exponent);
            for multiple in 2..(whole_base as i32) {
                let value = power * f64::from(multiple);
                let position = self.position(value);
                if (position - previous).abs() < self.options.min_subdivision_space {
                    continue;
                }
                if points.len() >= MAX_GRID_POINTS {
                    break 'outer;
                }
                previous = position;
                if !buckets.collides(start + position) {
                    points.push(GridPoint::new(start + position, value, String::new()));
                }
            }
            exponent += 1;
        }
        points
    }
}
