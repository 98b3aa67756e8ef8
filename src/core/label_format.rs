use std::fmt::Write as _;

use chrono::DateTime;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{CalendarConfig, GridLabel, TimeUnit};

/// Locale preset used by axis label formatters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AxisLabelLocale {
    #[default]
    EnUs,
    EsEs,
}

impl AxisLabelLocale {
    #[must_use]
    pub fn decimal_separator(self) -> char {
        match self {
            Self::EnUs => '.',
            Self::EsEs => ',',
        }
    }
}

/// Text settings for numeric and log axes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct NumericLabelFormat {
    pub locale: AxisLabelLocale,
    /// Fixed decimals; derived from the grid step when absent.
    pub decimal_digits: Option<u8>,
    pub units_before: String,
    pub units_after: String,
}

impl NumericLabelFormat {
    #[must_use]
    pub fn format(&self, value: f64, step: f64) -> String {
        if !value.is_finite() {
            return "nan".to_owned();
        }
        let precision = self
            .decimal_digits
            .map_or_else(|| precision_from_step(step), usize::from);
        let text = format_axis_decimal(value, precision, self.locale);
        let text = if text.trim_start_matches('-').chars().all(|ch| {
            ch == '0' || ch == self.locale.decimal_separator()
        }) {
            text.trim_start_matches('-').to_owned()
        } else {
            text
        };
        format!("{}{}{}", self.units_before, text, self.units_after)
    }
}

/// Text settings for calendar axes.
///
/// A format string may hold several label rows separated by `\n`; `levels`
/// caps how many rows are emitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarLabelFormat {
    /// Single format used regardless of the chosen grid unit.
    pub text_format: Option<String>,
    /// Per-unit overrides of the built-in formats.
    pub unit_formats: IndexMap<TimeUnit, String>,
    pub levels: u8,
}

impl Default for CalendarLabelFormat {
    fn default() -> Self {
        Self {
            text_format: None,
            unit_formats: IndexMap::new(),
            levels: 1,
        }
    }
}

impl CalendarLabelFormat {
    /// Built-in strftime rows keyed by the accepted grid unit.
    #[must_use]
    pub fn default_rows(unit: TimeUnit) -> &'static [&'static str] {
        match unit {
            TimeUnit::Second => &["%H:%M:%S", "%Y-%m-%d"],
            TimeUnit::Minute | TimeUnit::Hour => &["%H:%M", "%Y-%m-%d"],
            TimeUnit::Day | TimeUnit::Week => &["%d %b", "%Y"],
            TimeUnit::Month => &["%b", "%Y"],
            TimeUnit::Year => &["%Y"],
        }
    }

    #[must_use]
    pub fn rows_for(&self, unit: TimeUnit) -> Vec<String> {
        let rows: Vec<String> = match self
            .text_format
            .as_ref()
            .or_else(|| self.unit_formats.get(&unit))
        {
            Some(format) => format.split('\n').map(str::to_owned).collect(),
            None => Self::default_rows(unit)
                .iter()
                .map(|row| (*row).to_owned())
                .collect(),
        };
        let levels = usize::from(self.levels.max(1));
        rows.into_iter().take(levels).collect()
    }

    /// Formats `timestamp` with pre-resolved `rows`.
    #[must_use]
    pub fn format_rows(rows: &[String], timestamp: i64, calendar: CalendarConfig) -> GridLabel {
        let Some(utc) = DateTime::from_timestamp(timestamp, 0) else {
            return GridLabel::Single(timestamp.to_string());
        };
        let local = utc.with_timezone(&calendar.timezone.fixed_offset());
        let lines: SmallVec<[String; 2]> = rows
            .iter()
            .map(|row| {
                let mut line = String::new();
                // Invalid strftime items surface as a fmt error; keep the raw row.
                if write!(line, "{}", local.format(row)).is_err() {
                    line.clone_from(row);
                }
                line
            })
            .collect();
        if lines.len() == 1 {
            GridLabel::Single(lines.into_iter().next().unwrap_or_default())
        } else {
            GridLabel::Lines(lines)
        }
    }
}

/// Blanks upper label rows that repeat the previous label's row.
///
/// Only the first row (the finest level) is always kept, so a date row is
/// printed once per day under hourly ticks.
pub fn suppress_repeated_levels(labels: &mut [GridLabel]) {
    let mut previous: Option<SmallVec<[String; 2]>> = None;
    for label in labels.iter_mut() {
        let GridLabel::Lines(lines) = label else {
            previous = None;
            continue;
        };
        let current = lines.clone();
        if let Some(prev) = &previous {
            for (index, line) in lines.iter_mut().enumerate().skip(1) {
                if prev.get(index).is_some_and(|row| *row == *line) {
                    line.clear();
                }
            }
        }
        previous = Some(current);
    }
}

pub(crate) fn precision_from_step(step: f64) -> usize {
    if !step.is_finite() || step <= 0.0 {
        return 2;
    }
    let text = format!("{:.12}", step.abs());
    let Some((_, fraction)) = text.split_once('.') else {
        return 0;
    };
    // Drop float noise such as 0.30000000000000004 before counting digits.
    let trimmed = fraction[..fraction.len().min(9)].trim_end_matches('0');
    trimmed.len()
}

fn format_axis_decimal(value: f64, precision: usize, locale: AxisLabelLocale) -> String {
    let text = format!("{value:.precision$}");
    match locale {
        AxisLabelLocale::EnUs => text,
        AxisLabelLocale::EsEs => text.replace('.', ","),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        AxisLabelLocale, CalendarLabelFormat, NumericLabelFormat, precision_from_step,
        suppress_repeated_levels,
    };
    use crate::core::{CalendarConfig, GridLabel, TimeUnit};

    #[test]
    fn precision_follows_step() {
        assert_eq!(precision_from_step(25.0), 0);
        assert_eq!(precision_from_step(2.5), 1);
        assert_eq!(precision_from_step(0.05), 2);
    }

    #[test]
    fn numeric_format_wraps_units_and_locale() {
        let format = NumericLabelFormat {
            locale: AxisLabelLocale::EsEs,
            decimal_digits: Some(1),
            units_before: "$".to_owned(),
            units_after: "k".to_owned(),
        };
        assert_eq!(format.format(12.5, 1.0), "$12,5k");
    }

    #[test]
    fn numeric_format_never_prints_negative_zero() {
        let format = NumericLabelFormat::default();
        assert_eq!(format.format(-0.000_000_1, 1.0), "0");
    }

    #[test]
    fn calendar_levels_truncate_rows() {
        let format = CalendarLabelFormat {
            levels: 2,
            ..CalendarLabelFormat::default()
        };
        assert_eq!(format.rows_for(TimeUnit::Hour), vec!["%H:%M", "%Y-%m-%d"]);
        assert_eq!(format.rows_for(TimeUnit::Year), vec!["%Y"]);
        assert_eq!(
            CalendarLabelFormat::default().rows_for(TimeUnit::Hour),
            vec!["%H:%M"]
        );
    }

    #[test]
    fn repeated_date_rows_are_blanked() {
        let rows = vec!["%H:%M".to_owned(), "%Y-%m-%d".to_owned()];
        let calendar = CalendarConfig::default();
        let mut labels: Vec<GridLabel> = [1_704_067_200, 1_704_078_000, 1_704_153_600]
            .into_iter()
            .map(|ts| CalendarLabelFormat::format_rows(&rows, ts, calendar))
            .collect();
        suppress_repeated_levels(&mut labels);

        assert_eq!(labels[0].lines(), vec!["00:00", "2024-01-01"]);
        assert_eq!(labels[1].lines(), vec!["03:00", ""]);
        assert_eq!(labels[2].lines(), vec!["00:00", "2024-01-02"]);
    }
}
