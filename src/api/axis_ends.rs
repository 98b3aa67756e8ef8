use serde::{Deserialize, Serialize};
use tracing::trace;

use super::{AxisOptions, ScaleKind};
use crate::error::{ChartError, ChartResult};

/// Resolved value range of one axis before grid fitting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisEnds {
    pub min: f64,
    pub max: f64,
}

/// Merges fixed bounds, data extents and guideline values into axis ends.
///
/// Fixed bounds win over data; `prefer_zero` and `allow_negative` only move
/// ends that were not fixed. Equal ends are widened by the minimum unit (or
/// 1) so value axes always span a positive range.
pub fn resolve_axis_ends(
    name: &str,
    options: &AxisOptions,
    data: impl IntoIterator<Item = (f64, f64)>,
    guidelines: impl IntoIterator<Item = f64>,
) -> ChartResult<AxisEnds> {
    if let (Some(min), Some(max)) = (options.min, options.max) {
        if min > max {
            return Err(ChartError::InvertedBounds { min, max });
        }
    }

    let mut data_min = f64::INFINITY;
    let mut data_max = f64::NEG_INFINITY;
    for (low, high) in data {
        for value in [low, high] {
            if value.is_finite() {
                data_min = data_min.min(value);
                data_max = data_max.max(value);
            }
        }
    }
    for value in guidelines.into_iter().filter(|value| value.is_finite()) {
        data_min = data_min.min(value);
        data_max = data_max.max(value);
    }

    let non_numeric = || ChartError::NonNumericBounds {
        axis: name.to_owned(),
    };
    let mut min = options
        .min
        .filter(|value| value.is_finite())
        .or_else(|| data_min.is_finite().then_some(data_min))
        .ok_or_else(non_numeric)?;
    let mut max = options
        .max
        .filter(|value| value.is_finite())
        .or_else(|| data_max.is_finite().then_some(data_max))
        .ok_or_else(non_numeric)?;

    if options.kind == ScaleKind::Linear {
        if options.prefer_zero {
            if options.min.is_none() {
                min = min.min(0.0);
            }
            if options.max.is_none() {
                max = max.max(0.0);
            }
        }
        if !options.allow_negative {
            if options.min.is_none() {
                min = min.max(0.0);
            }
            if options.max.is_none() {
                max = max.max(0.0);
            }
        }
    }

    if min > max {
        return Err(ChartError::InvertedBounds { min, max });
    }
    if min == max && options.kind != ScaleKind::Calendar {
        let unit = options
            .min_unit
            .filter(|unit| unit.is_finite() && *unit > 0.0)
            .unwrap_or(1.0);
        if options.max.is_none() || options.min.is_some() {
            max += unit;
        } else {
            min -= unit;
        }
    }

    trace!(axis = name, min, max, "axis ends");
    Ok(AxisEnds { min, max })
}
