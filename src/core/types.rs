use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Canvas size in whole pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Axis-aligned box accumulated through `grow`/`grow_box`.
///
/// A freshly created [`BoundingBox::empty`] has inverted infinite extents so
/// the first growth defines it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl BoundingBox {
    #[must_use]
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            x1: x1.min(x2),
            y1: y1.min(y2),
            x2: x1.max(x2),
            y2: y1.max(y2),
        }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self {
            x1: f64::INFINITY,
            y1: f64::INFINITY,
            x2: f64::NEG_INFINITY,
            y2: f64::NEG_INFINITY,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.x1 > self.x2 || self.y1 > self.y2
    }

    /// Extends the box to contain the given rectangle.
    pub fn grow(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        self.x1 = self.x1.min(x1.min(x2));
        self.y1 = self.y1.min(y1.min(y2));
        self.x2 = self.x2.max(x1.max(x2));
        self.y2 = self.y2.max(y1.max(y2));
    }

    /// Merges another box into this one. Empty boxes are ignored.
    pub fn grow_box(&mut self, other: &Self) {
        if other.is_empty() {
            return;
        }
        self.grow(other.x1, other.y1, other.x2, other.y2);
    }

    pub fn offset(&mut self, dx: f64, dy: f64) {
        if self.is_empty() {
            return;
        }
        self.x1 += dx;
        self.x2 += dx;
        self.y1 += dy;
        self.y2 += dy;
    }

    #[must_use]
    pub fn translated(mut self, dx: f64, dy: f64) -> Self {
        self.offset(dx, dy);
        self
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.x2 - self.x1
        }
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.y2 - self.y1
        }
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::empty()
    }
}

/// Label attached to a grid point.
///
/// `Lines` carries multi-level labels, e.g. a time row above a date row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GridLabel {
    Single(String),
    Lines(SmallVec<[String; 2]>),
}

impl GridLabel {
    #[must_use]
    pub fn lines(&self) -> Vec<&str> {
        match self {
            Self::Single(text) => vec![text.as_str()],
            Self::Lines(lines) => lines.iter().map(String::as_str).collect(),
        }
    }

    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.lines().iter().all(|line| line.is_empty())
    }

    /// Joins levels with `\n`, the form consumed by text measurement.
    #[must_use]
    pub fn joined(&self) -> String {
        match self {
            Self::Single(text) => text.clone(),
            Self::Lines(lines) => lines.join("\n"),
        }
    }
}

impl From<String> for GridLabel {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

impl From<&str> for GridLabel {
    fn from(value: &str) -> Self {
        Self::Single(value.to_owned())
    }
}

/// One tick along an axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridPoint {
    pub position: f64,
    pub value: f64,
    pub text: GridLabel,
}

impl GridPoint {
    #[must_use]
    pub fn new(position: f64, value: f64, text: impl Into<GridLabel>) -> Self {
        Self {
            position,
            value,
            text: text.into(),
        }
    }
}
