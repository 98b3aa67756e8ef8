use serde::{Deserialize, Serialize};

use crate::core::{
    CalendarAxis, CalendarAxisOptions, CalendarConfig, CalendarLabelFormat, ChartAxis, LogAxis,
    NumericAxis, NumericAxisOptions, NumericLabelFormat,
};
use crate::error::{ChartError, ChartResult};

/// Value scale used by one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ScaleKind {
    #[default]
    Linear,
    Log,
    /// Values are seconds since the Unix epoch.
    Calendar,
}

/// User-facing configuration of one axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisOptions {
    pub kind: ScaleKind,
    /// Fixed lower bound; data decides when absent.
    pub min: Option<f64>,
    /// Fixed upper bound; data decides when absent.
    pub max: Option<f64>,
    /// Fixed grid division: a number for value axes, `"2 hours"` style text
    /// for calendar axes.
    pub division: Option<String>,
    pub min_space: f64,
    pub min_unit: Option<f64>,
    pub subdivision: Option<String>,
    pub min_subdivision_space: f64,
    pub log_base: f64,
    pub calendar: CalendarConfig,
    pub numeric_format: NumericLabelFormat,
    pub calendar_format: CalendarLabelFormat,
    pub reversed: bool,
    pub block_centered: bool,
    /// Extend the range so that it includes zero.
    pub prefer_zero: bool,
    pub allow_negative: bool,
}

impl Default for AxisOptions {
    fn default() -> Self {
        Self {
            kind: ScaleKind::Linear,
            min: None,
            max: None,
            division: None,
            min_space: 15.0,
            min_unit: None,
            subdivision: None,
            min_subdivision_space: 5.0,
            log_base: 10.0,
            calendar: CalendarConfig::default(),
            numeric_format: NumericLabelFormat::default(),
            calendar_format: CalendarLabelFormat::default(),
            reversed: false,
            block_centered: false,
            prefer_zero: false,
            allow_negative: true,
        }
    }
}

impl AxisOptions {
    #[must_use]
    pub fn calendar() -> Self {
        Self {
            kind: ScaleKind::Calendar,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_kind(mut self, kind: ScaleKind) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub fn with_bounds(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    #[must_use]
    pub fn with_division(mut self, division: impl Into<String>) -> Self {
        self.division = Some(division.into());
        self
    }

    #[must_use]
    pub fn with_min_space(mut self, min_space: f64) -> Self {
        self.min_space = min_space;
        self
    }

    #[must_use]
    pub fn with_min_unit(mut self, min_unit: f64) -> Self {
        self.min_unit = Some(min_unit);
        self
    }

    #[must_use]
    pub fn with_prefer_zero(mut self, prefer_zero: bool) -> Self {
        self.prefer_zero = prefer_zero;
        self
    }

    #[must_use]
    pub fn with_allow_negative(mut self, allow_negative: bool) -> Self {
        self.allow_negative = allow_negative;
        self
    }

    #[must_use]
    pub fn with_calendar(mut self, calendar: CalendarConfig) -> Self {
        self.calendar = calendar;
        self
    }

    #[must_use]
    pub fn with_block_centered(mut self, block_centered: bool) -> Self {
        self.block_centered = block_centered;
        self
    }

    pub fn numeric_options(&self) -> ChartResult<NumericAxisOptions> {
        Ok(NumericAxisOptions {
            min_space: self.min_space,
            min_unit: self.min_unit,
            fixed_step: parse_step(self.division.as_deref(), "division")?,
            min_subdivision_space: self.min_subdivision_space,
            fixed_subdivision: parse_step(self.subdivision.as_deref(), "subdivision")?,
            reversed: self.reversed,
            block_centered: self.block_centered,
            format: self.numeric_format.clone(),
        })
    }

    #[must_use]
    pub fn calendar_options(&self) -> CalendarAxisOptions {
        CalendarAxisOptions {
            min_space: self.min_space,
            fixed_division: self.division.clone(),
            fixed_subdivision: self.subdivision.clone(),
            min_subdivision_space: self.min_subdivision_space,
            reversed: self.reversed,
            block_centered: self.block_centered,
            calendar: self.calendar,
            format: self.calendar_format.clone(),
        }
    }

    /// Builds the axis variant selected by `kind` over `[min, max]`.
    pub fn build_axis(&self, length: f64, min: f64, max: f64) -> ChartResult<ChartAxis> {
        let axis = match self.kind {
            ScaleKind::Linear => NumericAxis::new(length, min, max, self.numeric_options()?)?.into(),
            ScaleKind::Log => {
                LogAxis::new(length, min, max, self.log_base, self.numeric_options()?)?.into()
            }
            ScaleKind::Calendar => CalendarAxis::new(length, min, max, self.calendar_options())?.into(),
        };
        Ok(axis)
    }
}

fn parse_step(raw: Option<&str>, field: &str) -> ChartResult<Option<f64>> {
    let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return Ok(None);
    };
    let step: f64 = raw.parse().map_err(|_| {
        ChartError::InvalidData(format!("{field} `{raw}` is not a number"))
    })?;
    if !step.is_finite() || step <= 0.0 {
        return Err(ChartError::InvalidData(format!(
            "{field} must be finite and > 0, got {raw}"
        )));
    }
    Ok(Some(step))
}
