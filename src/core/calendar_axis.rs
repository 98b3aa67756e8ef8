use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::core::grid::{GRID_END_TOLERANCE_PX, MAX_GRID_POINTS, PositionBuckets};
use crate::core::label_format::suppress_repeated_levels;
use crate::core::numeric_axis::validate_length;
use crate::core::calendar::calendar_timestamp;
use crate::core::{
    CalendarConfig, CalendarLabelFormat, Division, DivisionId, DivisionTable, FixedDivision,
    GridPoint, TimeUnit,
};
use crate::error::{ChartError, ChartResult};

/// Construction options for calendar axes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarAxisOptions {
    pub min_space: f64,
    /// Fixed division text such as `"2 hours"`.
    pub fixed_division: Option<String>,
    /// Fixed subdivision text; searched from the division whitelist when absent.
    pub fixed_subdivision: Option<String>,
    pub min_subdivision_space: f64,
    pub reversed: bool,
    pub block_centered: bool,
    pub calendar: CalendarConfig,
    pub format: CalendarLabelFormat,
}

impl Default for CalendarAxisOptions {
    fn default() -> Self {
        Self {
            min_space: 15.0,
            fixed_division: None,
            fixed_subdivision: None,
            min_subdivision_space: 5.0,
            reversed: false,
            block_centered: false,
            calendar: CalendarConfig::default(),
            format: CalendarLabelFormat::default(),
        }
    }
}

impl CalendarAxisOptions {
    #[must_use]
    pub fn with_min_space(mut self, min_space: f64) -> Self {
        self.min_space = min_space;
        self
    }

    #[must_use]
    pub fn with_fixed_division(mut self, division: impl Into<String>) -> Self {
        self.fixed_division = Some(division.into());
        self
    }

    #[must_use]
    pub fn with_calendar(mut self, calendar: CalendarConfig) -> Self {
        self.calendar = calendar;
        self
    }
}

/// Result of a successful division search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DivisionChoice {
    pub id: DivisionId,
    pub unit: TimeUnit,
    pub count: u32,
    /// Snapped bucket run covering the searched range.
    pub start: i64,
    pub end: i64,
    /// Average seconds per division the candidate had to cover when accepted.
    pub average: i64,
}

/// Greedy scan of `candidates` (finest first) for the first division that
/// keeps ticks at least `min_space` apart.
///
/// A candidate is first screened against the raw range, then re-checked
/// against its own snapped bucket run; the first one passing both wins even
/// if a coarser candidate would fit the snapped range better.
pub fn search_divisions<'a>(
    candidates: impl IntoIterator<Item = &'a Division>,
    length: f64,
    min: i64,
    max: i64,
    min_space: f64,
    calendar: CalendarConfig,
) -> ChartResult<Option<DivisionChoice>> {
    let max_divisions = if min_space.is_finite() && min_space > 0.0 {
        ((length / min_space).floor() as i64).max(1)
    } else {
        1
    };
    let duration = max
        .checked_sub(min)
        .and_then(|span| span.checked_add(1))
        .ok_or_else(|| {
            ChartError::InvalidData(format!("calendar range {min}..{max} is too wide"))
        })?;
    let average = ceil_div(duration, max_divisions);

    for candidate in candidates {
        let nominal = candidate.nominal_seconds();
        if nominal < average {
            continue;
        }
        let start = calendar.bucket_start(min, candidate.unit, candidate.count)?;
        let end = calendar.bucket_end(start, max, candidate.unit, candidate.count)?;
        let refined = ceil_div(end - start + 1, max_divisions);
        trace!(
            division = %candidate,
            nominal,
            average,
            refined,
            "calendar division candidate"
        );
        if nominal >= refined {
            return Ok(Some(DivisionChoice {
                id: candidate.id,
                unit: candidate.unit,
                count: candidate.count,
                start,
                end,
                average: refined,
            }));
        }
    }
    Ok(None)
}

fn ceil_div(value: i64, divisor: i64) -> i64 {
    value.div_euclid(divisor) + i64::from(value.rem_euclid(divisor) != 0)
}

/// Time axis whose grid follows calendar boundaries.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarAxis {
    length: f64,
    start: i64,
    end: i64,
    duration: i64,
    grid_unit: TimeUnit,
    grid_unit_count: u32,
    division_id: Option<DivisionId>,
    subdivision: Option<(TimeUnit, u32)>,
    options: CalendarAxisOptions,
}

impl CalendarAxis {
    /// Builds an axis over `[min, max]` epoch seconds.
    ///
    /// Fails when `max < min`, when a fixed division names an unknown unit,
    /// or when no catalogue division fits `min_space`.
    pub fn new(length: f64, min: f64, max: f64, options: CalendarAxisOptions) -> ChartResult<Self> {
        validate_length(length)?;
        if !min.is_finite() || !max.is_finite() {
            return Err(ChartError::InvalidData(
                "calendar axis bounds must be finite".to_owned(),
            ));
        }
        if max < min {
            return Err(ChartError::ZeroLengthAxis { min, max });
        }
        let (min, max) = (calendar_timestamp(min.floor())?, calendar_timestamp(max.ceil())?);
        let table = DivisionTable::global();
        let calendar = options.calendar;

        let fixed = options
            .fixed_division
            .as_deref()
            .map(str::parse::<FixedDivision>)
            .transpose()?;

        let (grid_unit, grid_unit_count, division_id, start, end) = match fixed {
            Some(FixedDivision {
                unit: Some(unit),
                count,
            }) => {
                let start = calendar.bucket_start(min, unit, count)?;
                let end = calendar.bucket_end(start, max, unit, count)?;
                let id = table.find(unit, count).map(|division| division.id);
                (unit, count, id, start, end)
            }
            Some(FixedDivision { unit: None, count }) => {
                let searched = Self::search_required(table, length, min, max, &options)?;
                let start = calendar.bucket_start(min, searched.unit, count)?;
                let end = calendar.bucket_end(start, max, searched.unit, count)?;
                let id = table.find(searched.unit, count).map(|division| division.id);
                (searched.unit, count, id, start, end)
            }
            None => {
                let choice = Self::search_required(table, length, min, max, &options)?;
                (choice.unit, choice.count, Some(choice.id), choice.start, choice.end)
            }
        };

        let duration = end - start + 1;
        if duration <= 0 {
            return Err(ChartError::ZeroLengthAxis {
                min: start as f64,
                max: end as f64,
            });
        }

        let mut axis = Self {
            length,
            start,
            end,
            duration,
            grid_unit,
            grid_unit_count: grid_unit_count.max(1),
            division_id,
            subdivision: None,
            options,
        };
        axis.subdivision = axis.resolve_subdivision(table)?;
        debug!(
            unit = %axis.grid_unit,
            count = axis.grid_unit_count,
            start = axis.start,
            end = axis.end,
            subdivision = ?axis.subdivision,
            "calendar axis divisions"
        );
        Ok(axis)
    }

    fn search_required(
        table: &DivisionTable,
        length: f64,
        min: i64,
        max: i64,
        options: &CalendarAxisOptions,
    ) -> ChartResult<DivisionChoice> {
        search_divisions(
            table.iter(),
            length,
            min,
            max,
            options.min_space,
            options.calendar,
        )?
        .ok_or(ChartError::NoDivisions {
            length,
            duration: max as f64 - min as f64 + 1.0,
        })
    }

    fn resolve_subdivision(&self, table: &DivisionTable) -> ChartResult<Option<(TimeUnit, u32)>> {
        let main_nominal = self.grid_unit.nominal_seconds() * i64::from(self.grid_unit_count);

        if let Some(raw) = self.options.fixed_subdivision.as_deref() {
            let (unit, count) = raw.parse::<FixedDivision>()?.resolve(self.grid_unit);
            if unit.nominal_seconds() * i64::from(count) >= main_nominal {
                warn!(
                    subdivision = raw,
                    "fixed subdivision is not finer than the grid division; ignoring it"
                );
                return Ok(None);
            }
            return Ok(Some((unit, count)));
        }

        let Some(id) = self.division_id else {
            return Ok(None);
        };
        let choice = search_divisions(
            table.subdivisions_of(id),
            self.length,
            self.start,
            self.end,
            self.options.min_subdivision_space,
            self.options.calendar,
        )?;
        Ok(choice.map(|choice| (choice.unit, choice.count)))
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        self.length
    }

    /// First second covered by the axis.
    #[must_use]
    pub fn start(&self) -> i64 {
        self.start
    }

    /// Last second covered by the axis.
    #[must_use]
    pub fn end(&self) -> i64 {
        self.end
    }

    #[must_use]
    pub fn duration(&self) -> i64 {
        self.duration
    }

    #[must_use]
    pub fn grid_unit(&self) -> TimeUnit {
        self.grid_unit
    }

    #[must_use]
    pub fn grid_unit_count(&self) -> u32 {
        self.grid_unit_count
    }

    #[must_use]
    pub fn division_id(&self) -> Option<DivisionId> {
        self.division_id
    }

    /// Chosen subdivision, `None` when no finer division fits.
    #[must_use]
    pub fn subdivision(&self) -> Option<(TimeUnit, u32)> {
        self.subdivision
    }

    #[must_use]
    pub fn options(&self) -> &CalendarAxisOptions {
        &self.options
    }

    /// Pixels per nominal grid unit.
    #[must_use]
    pub fn unit(&self) -> f64 {
        self.seconds_to_px() * self.grid_unit.nominal_seconds() as f64
    }

    fn seconds_to_px(&self) -> f64 {
        self.length / self.duration as f64
    }

    #[must_use]
    pub fn position(&self, value: f64) -> f64 {
        let offset = (value - self.start as f64) * self.seconds_to_px();
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
        self.start as f64 + offset / self.seconds_to_px()
    }

    /// Calendar axes measure from their first bucket.
    #[must_use]
    pub fn zero(&self) -> f64 {
        self.position(self.start as f64)
    }

    /// Labelled ticks on every `grid_unit_count` calendar boundary.
    #[must_use]
    pub fn grid_points(&self, start: f64) -> Vec<GridPoint> {
        let rows = self.options.format.rows_for(self.grid_unit);
        let mut points = self.walk(start, self.grid_unit, self.grid_unit_count, |timestamp| {
            CalendarLabelFormat::format_rows(&rows, timestamp, self.options.calendar)
        });

        let mut labels: Vec<_> = points.iter().map(|point| point.text.clone()).collect();
        suppress_repeated_levels(&mut labels);
        for (point, label) in points.iter_mut().zip(labels) {
            point.text = label;
        }
        points
    }

    /// Unlabelled subdivision ticks; empty when no subdivision was found.
    #[must_use]
    pub fn subdivision_points(&self, start: f64) -> Vec<GridPoint> {
        let Some((unit, count)) = self.subdivision else {
            return Vec::new();
        };
        let buckets = PositionBuckets::from_points(&self.grid_points(start));
        self.walk(start, unit, count, |_| String::new().into())
            .into_iter()
            .filter(|point| !buckets.collides(point.position))
            .collect()
    }

    fn walk(
        &self,
        start: f64,
        unit: TimeUnit,
        count: u32,
        label: impl Fn(i64) -> crate::core::GridLabel,
    ) -> Vec<GridPoint> {
        let mut points = Vec::new();
        for index in 0..MAX_GRID_POINTS as i64 {
            let Ok(timestamp) =
                self.options
                    .calendar
                    .add_units(self.start, unit, index * i64::from(count))
            else {
                break;
            };
            let offset = (timestamp - self.start) as f64 * self.seconds_to_px();
            if offset > self.length + GRID_END_TOLERANCE_PX {
                break;
            }
            let value = timestamp as f64;
            points.push(GridPoint::new(
                start + self.position(value),
                value,
                label(timestamp),
            ));
        }
        points
    }
}

#[cfg(test)]
mod tests {
    use super::ceil_div;

    #[test]
    fn ceil_div_rounds_up() {
        assert_eq!(ceil_div(604_801, 14), 43_201);
        assert_eq!(ceil_div(604_800, 14), 43_200);
        assert_eq!(ceil_div(i64::MAX, 1), i64::MAX);
    }
}
