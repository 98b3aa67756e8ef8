use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

use self::TimeUnit::{Day, Hour, Minute, Month, Second, Week, Year};

/// Calendar unit used for grid divisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl TimeUnit {
    pub const ALL: [Self; 7] = [
        Self::Second,
        Self::Minute,
        Self::Hour,
        Self::Day,
        Self::Week,
        Self::Month,
        Self::Year,
    ];

    /// Approximate length in seconds.
    ///
    /// Months and years are averages; they only rank candidates during the
    /// division search and never drive grid arithmetic.
    #[must_use]
    pub const fn nominal_seconds(self) -> i64 {
        match self {
            Self::Second => 1,
            Self::Minute => 60,
            Self::Hour => 3_600,
            Self::Day => 86_400,
            Self::Week => 604_800,
            Self::Month => 2_629_800,
            Self::Year => 31_557_600,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Second => "second",
            Self::Minute => "minute",
            Self::Hour => "hour",
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TimeUnit {
    type Err = ChartError;

    /// Accepts singular or plural names in any case ("Hours", "day").
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let lowered = raw.trim().to_ascii_lowercase();
        let singular = lowered.strip_suffix('s').unwrap_or(&lowered);
        Self::ALL
            .into_iter()
            .find(|unit| unit.name() == singular)
            .ok_or_else(|| ChartError::UnknownTimeUnit(raw.trim().to_owned()))
    }
}

/// Stable index into the division catalogue. Lower ids are finer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DivisionId(pub u16);

/// A `(unit, count)` grid spacing with the finer divisions allowed inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Division {
    pub id: DivisionId,
    pub unit: TimeUnit,
    pub count: u32,
    pub subdivisions: BTreeSet<DivisionId>,
}

impl Division {
    #[must_use]
    pub fn nominal_seconds(&self) -> i64 {
        self.unit.nominal_seconds() * i64::from(self.count)
    }
}

impl fmt::Display for Division {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.count, self.unit)
    }
}

/// Catalogue rows: `(unit, count, [(unit, count) of allowed subdivisions])`.
const CATALOGUE: &[(TimeUnit, u32, &[(TimeUnit, u32)])] = &[
    (Second, 1, &[]),
    (Second, 2, &[(Second, 1)]),
    (Second, 5, &[(Second, 1)]),
    (Second, 10, &[(Second, 1), (Second, 2), (Second, 5)]),
    (Second, 15, &[(Second, 1), (Second, 5)]),
    (Second, 20, &[(Second, 1), (Second, 2), (Second, 5), (Second, 10)]),
    (Second, 30, &[(Second, 1), (Second, 5), (Second, 10), (Second, 15)]),
    (Minute, 1, &[(Second, 5), (Second, 10), (Second, 15), (Second, 20), (Second, 30)]),
    (Minute, 2, &[(Second, 30), (Minute, 1)]),
    (Minute, 5, &[(Minute, 1)]),
    (Minute, 10, &[(Minute, 1), (Minute, 2), (Minute, 5)]),
    (Minute, 15, &[(Minute, 1), (Minute, 5)]),
    (Minute, 20, &[(Minute, 1), (Minute, 2), (Minute, 5), (Minute, 10)]),
    (Minute, 30, &[(Minute, 1), (Minute, 5), (Minute, 10), (Minute, 15)]),
    (Hour, 1, &[(Minute, 5), (Minute, 10), (Minute, 15), (Minute, 20), (Minute, 30)]),
    (Hour, 2, &[(Minute, 30), (Hour, 1)]),
    (Hour, 3, &[(Hour, 1)]),
    (Hour, 4, &[(Hour, 1), (Hour, 2)]),
    (Hour, 6, &[(Hour, 1), (Hour, 2), (Hour, 3)]),
    (Hour, 12, &[(Hour, 1), (Hour, 2), (Hour, 3), (Hour, 4), (Hour, 6)]),
    (Day, 1, &[(Hour, 1), (Hour, 2), (Hour, 3), (Hour, 4), (Hour, 6), (Hour, 12)]),
    (Day, 2, &[(Hour, 12), (Day, 1)]),
    (Day, 3, &[(Day, 1)]),
    (Week, 1, &[(Day, 1)]),
    (Week, 2, &[(Day, 1), (Week, 1)]),
    (Month, 1, &[(Day, 1)]),
    (Month, 2, &[(Month, 1)]),
    (Month, 3, &[(Month, 1)]),
    (Month, 4, &[(Month, 1), (Month, 2)]),
    (Month, 6, &[(Month, 1), (Month, 2), (Month, 3)]),
    (Year, 1, &[(Month, 1), (Month, 3), (Month, 4), (Month, 6)]),
    (Year, 2, &[(Month, 6), (Year, 1)]),
    (Year, 5, &[(Year, 1)]),
    (Year, 10, &[(Year, 1), (Year, 2), (Year, 5)]),
    (Year, 20, &[(Year, 1), (Year, 2), (Year, 5), (Year, 10)]),
    (Year, 25, &[(Year, 1), (Year, 5)]),
    (Year, 50, &[(Year, 5), (Year, 10), (Year, 25)]),
    (Year, 100, &[(Year, 10), (Year, 20), (Year, 25), (Year, 50)]),
    (Year, 200, &[(Year, 50), (Year, 100)]),
    (Year, 250, &[(Year, 25), (Year, 50)]),
    (Year, 500, &[(Year, 50), (Year, 100), (Year, 250)]),
    (Year, 1000, &[(Year, 100), (Year, 200), (Year, 250), (Year, 500)]),
];

/// Process-wide division catalogue, built once and read-only afterwards.
///
/// Entries are ordered finest first; the adjacency map lists, for each
/// division, the finer divisions that may subdivide it.
#[derive(Debug)]
pub struct DivisionTable {
    divisions: Vec<Division>,
    by_name: IndexMap<(TimeUnit, u32), DivisionId>,
}

impl DivisionTable {
    #[must_use]
    pub fn global() -> &'static Self {
        static TABLE: OnceLock<DivisionTable> = OnceLock::new();
        TABLE.get_or_init(Self::build)
    }

    fn build() -> Self {
        let mut by_name = IndexMap::with_capacity(CATALOGUE.len());
        for (index, (unit, count, _)) in CATALOGUE.iter().enumerate() {
            by_name.insert((*unit, *count), DivisionId(index as u16));
        }

        let divisions = CATALOGUE
            .iter()
            .enumerate()
            .map(|(index, (unit, count, subdivisions))| Division {
                id: DivisionId(index as u16),
                unit: *unit,
                count: *count,
                subdivisions: subdivisions
                    .iter()
                    .filter_map(|key| by_name.get(key).copied())
                    .collect(),
            })
            .collect();

        Self { divisions, by_name }
    }

    /// All divisions, finest first.
    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = &Division> {
        self.divisions.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.divisions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.divisions.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: DivisionId) -> Option<&Division> {
        self.divisions.get(usize::from(id.0))
    }

    #[must_use]
    pub fn find(&self, unit: TimeUnit, count: u32) -> Option<&Division> {
        self.by_name
            .get(&(unit, count))
            .and_then(|id| self.get(*id))
    }

    /// Subdivisions allowed under `id`, finest first.
    pub fn subdivisions_of(&self, id: DivisionId) -> impl Iterator<Item = &Division> {
        self.get(id)
            .into_iter()
            .flat_map(|division| division.subdivisions.iter())
            .filter_map(|sub| self.get(*sub))
    }
}

/// Parsed fixed grid division such as `"2 hours"`, `"3"` or `"month"`.
///
/// A bare count leaves the unit to the caller; a bare unit implies a count
/// of one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedDivision {
    pub unit: Option<TimeUnit>,
    pub count: u32,
}

impl FixedDivision {
    #[must_use]
    pub fn resolve(self, fallback_unit: TimeUnit) -> (TimeUnit, u32) {
        (self.unit.unwrap_or(fallback_unit), self.count)
    }
}

impl FromStr for FixedDivision {
    type Err = ChartError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let mut parts = raw.split_whitespace();
        let (Some(first), second, None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(ChartError::InvalidData(format!(
                "fixed division `{raw}` must be `<count> <unit>`, a count or a unit"
            )));
        };

        let parse_count = |text: &str| -> ChartResult<u32> {
            match text.parse::<u32>() {
                Ok(count) if count >= 1 => Ok(count),
                _ => Err(ChartError::InvalidData(format!(
                    "fixed division count `{text}` must be a positive integer"
                ))),
            }
        };

        match second {
            Some(unit) => Ok(Self {
                unit: Some(unit.parse()?),
                count: parse_count(first)?,
            }),
            None if first.chars().all(|ch| ch.is_ascii_digit()) => Ok(Self {
                unit: None,
                count: parse_count(first)?,
            }),
            None => Ok(Self {
                unit: Some(first.parse()?),
                count: 1,
            }),
        }
    }
}
