use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::grid::{GRID_END_TOLERANCE_PX, MAX_GRID_POINTS, PositionBuckets};
use crate::core::{GridPoint, NumericLabelFormat};
use crate::error::{ChartError, ChartResult};

/// Mantissas tried for "nice" grid steps, smallest first.
const NICE_MULTIPLIERS: [f64; 3] = [1.0, 2.5, 5.0];

/// Maximum rounds of widen-then-search before the step is accepted.
const MAX_FIT_ROUNDS: usize = 4;

/// Construction options shared by numeric and log axes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumericAxisOptions {
    /// Minimum pixel distance between main ticks.
    pub min_space: f64,
    /// Steps must be whole multiples of this value when set.
    pub min_unit: Option<f64>,
    /// Fixed grid step, bypassing the search.
    pub fixed_step: Option<f64>,
    pub min_subdivision_space: f64,
    pub fixed_subdivision: Option<f64>,
    pub reversed: bool,
    pub block_centered: bool,
    pub format: NumericLabelFormat,
}

impl Default for NumericAxisOptions {
    fn default() -> Self {
        Self {
            min_space: 15.0,
            min_unit: None,
            fixed_step: None,
            min_subdivision_space: 5.0,
            fixed_subdivision: None,
            reversed: false,
            block_centered: false,
            format: NumericLabelFormat::default(),
        }
    }
}

impl NumericAxisOptions {
    #[must_use]
    pub fn with_min_space(mut self, min_space: f64) -> Self {
        self.min_space = min_space;
        self
    }

    #[must_use]
    pub fn with_fixed_step(mut self, step: f64) -> Self {
        self.fixed_step = Some(step);
        self
    }

    #[must_use]
    pub fn with_min_unit(mut self, min_unit: f64) -> Self {
        self.min_unit = Some(min_unit);
        self
    }
}

/// Linear value axis with nice-number grid steps.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericAxis {
    length: f64,
    min: f64,
    max: f64,
    step: f64,
    unit_size: f64,
    options: NumericAxisOptions,
}

impl NumericAxis {
    /// Builds an axis over `[min, max]`, widened to whole grid steps.
    pub fn new(length: f64, min: f64, max: f64, options: NumericAxisOptions) -> ChartResult<Self> {
        validate_length(length)?;
        if !min.is_finite() || !max.is_finite() {
            return Err(ChartError::InvalidData(
                "numeric axis bounds must be finite".to_owned(),
            ));
        }
        if min >= max {
            return Err(ChartError::ZeroLengthAxis { min, max });
        }
        if let Some(step) = options.fixed_step {
            if !step.is_finite() || step <= 0.0 {
                return Err(ChartError::InvalidData(
                    "fixed grid step must be finite and > 0".to_owned(),
                ));
            }
        }

        let (mut lo, mut hi) = (min, max);
        let mut step = match options.fixed_step {
            Some(step) => step,
            None => find_nice_step(length, hi - lo, options.min_space, options.min_unit)?,
        };
        for _ in 0..MAX_FIT_ROUNDS {
            (lo, hi) = widen_to_step(min, max, step);
            if options.fixed_step.is_some() {
                break;
            }
            let refined = find_nice_step(length, hi - lo, options.min_space, options.min_unit)?;
            if (refined - step).abs() <= step * 1e-9 {
                break;
            }
            step = refined;
        }
        (lo, hi) = widen_to_step(min, max, step);
        trace!(min = lo, max = hi, step, length, "numeric axis grid");

        Ok(Self {
            length,
            min: lo,
            max: hi,
            step,
            unit_size: length / (hi - lo),
            options,
        })
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        self.length
    }

    #[must_use]
    pub fn min(&self) -> f64 {
        self.min
    }

    #[must_use]
    pub fn max(&self) -> f64 {
        self.max
    }

    #[must_use]
    pub fn step(&self) -> f64 {
        self.step
    }

    #[must_use]
    pub fn options(&self) -> &NumericAxisOptions {
        &self.options
    }

    /// Pixels per value unit.
    #[must_use]
    pub fn unit(&self) -> f64 {
        self.unit_size
    }

    #[must_use]
    pub fn position(&self, value: f64) -> f64 {
        let offset = (value - self.min) * self.unit_size;
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
        self.min + offset / self.unit_size
    }

    /// Pixel offset of value zero, which may fall outside the axis.
    #[must_use]
    pub fn zero(&self) -> f64 {
        self.position(0.0)
    }

    /// Main ticks from the axis minimum, offset by `start`.
    #[must_use]
    pub fn grid_points(&self, start: f64) -> Vec<GridPoint> {
        self.points_with_step(start, self.step, |value| {
            self.options.format.format(value, self.step)
        })
    }

    /// Unlabelled subdivision ticks that avoid main tick positions.
    #[must_use]
    pub fn subdivision_points(&self, start: f64) -> Vec<GridPoint> {
        let Some(sub_step) = self.subdivision_step() else {
            return Vec::new();
        };
        let buckets = PositionBuckets::from_points(&self.grid_points(start));
        self.points_with_step(start, sub_step, |_| String::new())
            .into_iter()
            .filter(|point| !buckets.collides(point.position))
            .collect()
    }

    /// Subdivision step, if the main step can be split at the minimum spacing.
    #[must_use]
    pub fn subdivision_step(&self) -> Option<f64> {
        if let Some(fixed) = self.options.fixed_subdivision {
            return (fixed.is_finite() && fixed > 0.0 && fixed < self.step).then_some(fixed);
        }
        find_subdivision(
            self.step,
            self.unit_size,
            self.options.min_subdivision_space,
            self.options.min_unit,
        )
    }

    fn points_with_step(
        &self,
        start: f64,
        step: f64,
        label: impl Fn(f64) -> String,
    ) -> Vec<GridPoint> {
        let first = (self.min / step - 1e-9).ceil();
        let mut points = Vec::new();
        for index in 0..MAX_GRID_POINTS {
            let value = (first + index as f64) * step;
            let offset = (value - self.min) * self.unit_size;
            if offset > self.length + GRID_END_TOLERANCE_PX {
                break;
            }
            points.push(GridPoint::new(start + self.position(value), value, label(value)));
        }
        points
    }
}

pub(crate) fn validate_length(length: f64) -> ChartResult<()> {
    if !length.is_finite() || length <= 0.0 {
        return Err(ChartError::InvalidData(format!(
            "axis length must be finite and > 0, got {length}"
        )));
    }
    Ok(())
}

/// Smallest nice step that keeps every tick at least `min_space` apart.
///
/// The tick count is bounded by `floor(length / min_space)`, so a 500px axis
/// with 50px spacing holds at most ten ticks (nine divisions).
fn find_nice_step(length: f64, span: f64, min_space: f64, min_unit: Option<f64>) -> ChartResult<f64> {
    let no_divisions = || ChartError::NoDivisions {
        length,
        duration: span,
    };
    if !span.is_finite() || span <= 0.0 || !min_space.is_finite() || min_space <= 0.0 {
        return Err(no_divisions());
    }

    let max_ticks = (length / min_space).floor();
    let divisions = (max_ticks - 1.0).max(1.0);
    let min_step = span / divisions;
    let min_unit = min_unit.filter(|unit| unit.is_finite() && *unit > 0.0);

    let mut magnitude = 10.0_f64.powf(min_step.log10().floor());
    if !magnitude.is_finite() || magnitude <= 0.0 {
        return Err(no_divisions());
    }
    for _ in 0..8 {
        for multiplier in NICE_MULTIPLIERS {
            let candidate = multiplier * magnitude;
            if candidate < min_step * (1.0 - 1e-9) {
                continue;
            }
            match min_unit {
                Some(unit) if candidate < unit || !is_multiple(candidate, unit) => {}
                _ => return Ok(candidate),
            }
        }
        magnitude *= 10.0;
    }

    match min_unit {
        Some(unit) => Ok((min_step / unit).ceil().max(1.0) * unit),
        None => Err(no_divisions()),
    }
}

fn widen_to_step(min: f64, max: f64, step: f64) -> (f64, f64) {
    let lo = (min / step + 1e-9).floor() * step;
    let hi = (max / step - 1e-9).ceil() * step;
    if hi > lo { (lo, hi) } else { (lo, lo + step) }
}

fn is_multiple(value: f64, unit: f64) -> bool {
    let ratio = value / unit;
    (ratio - ratio.round()).abs() <= 1e-9 * ratio.abs().max(1.0)
}

/// Largest even split of `step` whose pieces keep `min_space` pixels.
///
/// The step is scaled to a three-digit integer (25 -> 250, 0.5 -> 500) and the
/// split count must divide it exactly, so subdivisions land on round values.
fn find_subdivision(
    step: f64,
    unit_size: f64,
    min_space: f64,
    min_unit: Option<f64>,
) -> Option<f64> {
    if !min_space.is_finite() || min_space <= 0.0 {
        return None;
    }
    let step_px = step * unit_size;
    let max_divisions = (step_px / min_space).floor().min(1_000.0) as i64;
    if max_divisions <= 1 {
        return None;
    }

    let scaled = (100.0 * 10.0_f64.powf(-step.log10().floor()) * step).round() as i64;
    (2..=max_divisions)
        .rev()
        .filter(|divisions| scaled % divisions == 0)
        .map(|divisions| step / divisions as f64)
        .find(|sub_step| {
            min_unit.is_none_or(|unit| *sub_step >= unit * (1.0 - 1e-9) && is_multiple(*sub_step, unit))
        })
}
