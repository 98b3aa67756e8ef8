//! Calendar bucket arithmetic on epoch seconds.
//!
//! All snapping happens on local wall-clock time for the configured timezone
//! and is converted back to epoch seconds afterwards. Months and years use
//! real calendar lengths.

use chrono::{
    DateTime, Datelike, FixedOffset, Months, NaiveDate, NaiveDateTime, Offset, TimeDelta,
    Timelike, Utc, Weekday,
};
use serde::{Deserialize, Serialize};

use crate::core::TimeUnit;
use crate::error::{ChartError, ChartResult};

/// Timezone used for calendar alignment and label formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CalendarTimeZone {
    #[default]
    Utc,
    FixedOffsetMinutes {
        minutes: i16,
    },
}

impl CalendarTimeZone {
    #[must_use]
    pub fn offset_seconds(self) -> i64 {
        match self {
            Self::Utc => 0,
            Self::FixedOffsetMinutes { minutes } => i64::from(minutes) * 60,
        }
    }

    #[must_use]
    pub fn fixed_offset(self) -> FixedOffset {
        FixedOffset::east_opt(self.offset_seconds() as i32)
            .unwrap_or_else(|| Utc.fix())
    }
}

/// Immutable calendar settings threaded through calendar-axis construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    pub week_start: Weekday,
    pub timezone: CalendarTimeZone,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            week_start: Weekday::Mon,
            timezone: CalendarTimeZone::Utc,
        }
    }
}

impl CalendarConfig {
    #[must_use]
    pub fn with_week_start(mut self, week_start: Weekday) -> Self {
        self.week_start = week_start;
        self
    }

    #[must_use]
    pub fn with_timezone(mut self, timezone: CalendarTimeZone) -> Self {
        self.timezone = timezone;
        self
    }

    pub fn to_local(self, timestamp: i64) -> ChartResult<NaiveDateTime> {
        let utc = DateTime::from_timestamp(timestamp, 0).ok_or_else(|| {
            ChartError::InvalidData(format!("timestamp {timestamp} is out of calendar range"))
        })?;
        utc.naive_utc()
            .checked_add_signed(seconds(self.timezone.offset_seconds())?)
            .ok_or_else(|| out_of_range(timestamp))
    }

    #[must_use]
    pub fn from_local(self, local: NaiveDateTime) -> i64 {
        local.and_utc().timestamp() - self.timezone.offset_seconds()
    }

    /// Start of the `count`-unit bucket containing `timestamp`.
    pub fn bucket_start(self, timestamp: i64, unit: TimeUnit, count: u32) -> ChartResult<i64> {
        let local = self.to_local(timestamp)?;
        let count_i = count.max(1) as i32;
        let date = local.date();

        let start = match unit {
            TimeUnit::Year => {
                let year = local.year() - local.year().rem_euclid(count_i);
                first_instant(NaiveDate::from_ymd_opt(year, 1, 1), timestamp)?
            }
            TimeUnit::Month => first_instant(date.with_day(1), timestamp)?,
            // Day runs are anchored on the week start too, so multi-day
            // buckets line up with week boundaries.
            TimeUnit::Week | TimeUnit::Day => {
                let back = (7 + date.weekday().num_days_from_monday()
                    - self.week_start.num_days_from_monday())
                    % 7;
                let midnight = first_instant(Some(date), timestamp)?;
                midnight
                    .checked_sub_signed(seconds(i64::from(back) * 86_400)?)
                    .ok_or_else(|| out_of_range(timestamp))?
            }
            TimeUnit::Hour => {
                let hour = local.hour() - local.hour() % count.max(1);
                date.and_hms_opt(hour, 0, 0)
                    .ok_or_else(|| out_of_range(timestamp))?
            }
            TimeUnit::Minute => {
                let minute = local.minute() - local.minute() % count.max(1);
                date.and_hms_opt(local.hour(), minute, 0)
                    .ok_or_else(|| out_of_range(timestamp))?
            }
            TimeUnit::Second => {
                let second = local.second() - local.second() % count.max(1);
                date.and_hms_opt(local.hour(), local.minute(), second)
                    .ok_or_else(|| out_of_range(timestamp))?
            }
        };
        Ok(self.from_local(start))
    }

    /// Last second of the bucket run that starts at `start` and reaches `max`.
    ///
    /// The run covers a whole multiple of `count` units and at least one
    /// bucket. A `max` that already sits on a bucket boundary closes the run
    /// there instead of opening another bucket.
    pub fn bucket_end(self, start: i64, max: i64, unit: TimeUnit, count: u32) -> ChartResult<i64> {
        let count = i64::from(count.max(1));
        let elapsed = self.elapsed_units(start, max, unit)?;
        let mut steps = ((elapsed + count - 1) / count).max(1) * count;
        let mut boundary = self.add_units(start, unit, steps)?;
        while boundary < max {
            steps += count;
            boundary = self.add_units(start, unit, steps)?;
        }
        Ok(boundary - 1)
    }

    /// Whole units between `start` and `end`, rounded down.
    pub fn elapsed_units(self, start: i64, end: i64, unit: TimeUnit) -> ChartResult<i64> {
        if end <= start {
            return Ok(0);
        }
        match unit {
            TimeUnit::Month | TimeUnit::Year => {
                let from = self.to_local(start)?;
                let to = self.to_local(end)?;
                let months = i64::from(to.year() - from.year()) * 12
                    + i64::from(to.month()) - i64::from(from.month());
                let mut whole = if unit == TimeUnit::Year {
                    months.div_euclid(12)
                } else {
                    months
                };
                while whole > 0 && self.add_units(start, unit, whole)? > end {
                    whole -= 1;
                }
                Ok(whole)
            }
            _ => Ok((end - start) / unit.nominal_seconds()),
        }
    }

    /// Advances `start` by `amount` units using calendar arithmetic.
    ///
    /// Month and year steps keep the day of month where it exists and clamp
    /// to the month's last day otherwise.
    pub fn add_units(self, start: i64, unit: TimeUnit, amount: i64) -> ChartResult<i64> {
        match unit {
            TimeUnit::Month | TimeUnit::Year => {
                let months = if unit == TimeUnit::Year {
                    amount.checked_mul(12)
                } else {
                    Some(amount)
                }
                .and_then(|months| u32::try_from(months).ok())
                .ok_or_else(|| out_of_range(start))?;
                let local = self.to_local(start)?;
                let moved = local
                    .checked_add_months(Months::new(months))
                    .ok_or_else(|| out_of_range(start))?;
                Ok(self.from_local(moved))
            }
            _ => amount
                .checked_mul(unit.nominal_seconds())
                .and_then(|delta| start.checked_add(delta))
                .ok_or_else(|| out_of_range(start)),
        }
    }
}

/// Converts a whole-second `value` to epoch seconds, rejecting anything
/// outside the range chrono can represent.
pub fn calendar_timestamp(value: f64) -> ChartResult<i64> {
    let min = DateTime::<Utc>::MIN_UTC.timestamp();
    let max = DateTime::<Utc>::MAX_UTC.timestamp();
    if !value.is_finite() || value < min as f64 || value > max as f64 {
        return Err(ChartError::InvalidData(format!(
            "timestamp {value} is out of calendar range"
        )));
    }
    Ok(value as i64)
}

fn first_instant(date: Option<NaiveDate>, timestamp: i64) -> ChartResult<NaiveDateTime> {
    date.and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| out_of_range(timestamp))
}

fn seconds(value: i64) -> ChartResult<TimeDelta> {
    TimeDelta::try_seconds(value).ok_or_else(|| out_of_range(value))
}

fn out_of_range(timestamp: i64) -> ChartError {
    ChartError::InvalidData(format!("timestamp {timestamp} is out of calendar range"))
}
