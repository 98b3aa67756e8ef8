//! Text measurement collaborator.
//!
//! Layout only needs deterministic extents, so the default measurer estimates
//! widths from per-character ratios. Ratios for a named font can be loaded
//! once from JSON into a process-wide, read-only cache.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, OnceLock, RwLock};

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{ChartError, ChartResult};

/// Measured extents of a (possibly rotated, multi-line) text block.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextSize {
    pub width: f64,
    pub height: f64,
}

pub trait TextMetrics {
    /// Axis-aligned extents of `text` (lines split on `\n`) set in `font`
    /// and rotated by `angle_deg`.
    fn measure(
        &self,
        text: &str,
        font: &str,
        font_size: f64,
        angle_deg: f64,
        line_spacing: f64,
    ) -> TextSize;

    /// Distance from the top of a line to its baseline.
    fn baseline(&self, font: &str, font_size: f64) -> f64;
}

/// Width ratios (relative to the font size) for one font.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontMetrics {
    pub name: String,
    pub digit: f64,
    pub punctuation: f64,
    pub sign: f64,
    pub space: f64,
    pub upper: f64,
    pub other: f64,
    /// Per-character overrides.
    pub glyphs: HashMap<char, f64>,
    pub baseline: f64,
}

impl Default for FontMetrics {
    fn default() -> Self {
        Self {
            name: "sans-serif".to_owned(),
            digit: 0.62,
            punctuation: 0.34,
            sign: 0.42,
            space: 0.33,
            upper: 0.68,
            other: 0.58,
            glyphs: HashMap::new(),
            baseline: 0.8,
        }
    }
}

impl FontMetrics {
    pub fn from_json_str(json: &str) -> ChartResult<Self> {
        let metrics: Self = serde_json::from_str(json)?;
        metrics.validate()?;
        Ok(metrics)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> ChartResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    fn validate(&self) -> ChartResult<()> {
        let ratios = [
            self.digit,
            self.punctuation,
            self.sign,
            self.space,
            self.upper,
            self.other,
            self.baseline,
        ];
        if ratios
            .iter()
            .chain(self.glyphs.values())
            .any(|ratio| !ratio.is_finite() || *ratio < 0.0)
        {
            return Err(ChartError::InvalidData(format!(
                "font metrics for `{}` must be finite and >= 0",
                self.name
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn char_ratio(&self, ch: char) -> f64 {
        if let Some(ratio) = self.glyphs.get(&ch) {
            return *ratio;
        }
        match ch {
            '0'..='9' => self.digit,
            '.' | ',' | ':' | ';' | '\'' => self.punctuation,
            '-' | '+' | '%' => self.sign,
            ' ' => self.space,
            'A'..='Z' => self.upper,
            _ => self.other,
        }
    }

    #[must_use]
    pub fn line_width(&self, line: &str, font_size: f64) -> f64 {
        line.chars().map(|ch| self.char_ratio(ch)).sum::<f64>() * font_size
    }
}

/// Process-wide font metrics registry keyed by font name.
///
/// Entries are inserted once and never replaced, so concurrent readers always
/// observe the first registration.
#[derive(Debug, Default)]
pub struct FontMetricsCache {
    fonts: RwLock<HashMap<String, Arc<FontMetrics>>>,
}

impl FontMetricsCache {
    #[must_use]
    pub fn global() -> &'static Self {
        static CACHE: OnceLock<FontMetricsCache> = OnceLock::new();
        CACHE.get_or_init(Self::default)
    }

    /// Returns the registered metrics for `name`, if any.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<FontMetrics>> {
        self.fonts
            .read()
            .ok()
            .and_then(|fonts| fonts.get(name).cloned())
    }

    /// Registers `metrics` unless the name is already known; returns the
    /// entry that ends up in the cache.
    pub fn get_or_insert(&self, metrics: FontMetrics) -> Arc<FontMetrics> {
        if let Some(existing) = self.get(&metrics.name) {
            return existing;
        }
        let Ok(mut fonts) = self.fonts.write() else {
            return Arc::new(metrics);
        };
        debug!(font = %metrics.name, "registering font metrics");
        fonts
            .entry(metrics.name.clone())
            .or_insert_with(|| Arc::new(metrics))
            .clone()
    }

    /// Loads and registers a JSON metrics file unless its font is known.
    pub fn load_json_file(&self, path: impl AsRef<Path>) -> ChartResult<Arc<FontMetrics>> {
        let metrics = FontMetrics::from_json_file(path)?;
        Ok(self.get_or_insert(metrics))
    }
}

/// Deterministic, backend-independent text measurer.
///
/// Fonts registered on the measurer win over the global cache; unknown names
/// fall back to the built-in sans-serif ratios.
#[derive(Debug, Clone, Default)]
pub struct EstimatedTextMetrics {
    fonts: HashMap<String, Arc<FontMetrics>>,
    fallback: Arc<FontMetrics>,
}

impl EstimatedTextMetrics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `font` on this measurer only, replacing any previous entry
    /// with the same name.
    #[must_use]
    pub fn with_font(mut self, font: FontMetrics) -> Self {
        self.fonts.insert(font.name.clone(), Arc::new(font));
        self
    }

    /// Ratios used for `name`.
    #[must_use]
    pub fn font(&self, name: &str) -> Arc<FontMetrics> {
        if let Some(font) = self.fonts.get(name) {
            return Arc::clone(font);
        }
        FontMetricsCache::global()
            .get(name)
            .unwrap_or_else(|| Arc::clone(&self.fallback))
    }
}

impl TextMetrics for EstimatedTextMetrics {
    fn measure(
        &self,
        text: &str,
        font: &str,
        font_size: f64,
        angle_deg: f64,
        line_spacing: f64,
    ) -> TextSize {
        if text.is_empty() || font_size <= 0.0 {
            return TextSize::default();
        }
        let ratios = self.font(font);
        let lines: Vec<&str> = text.split('\n').collect();
        let width = lines
            .iter()
            .map(|line| ratios.line_width(line, font_size))
            .fold(0.0, f64::max);
        let height = font_size + (lines.len() - 1) as f64 * font_size * line_spacing;
        rotate_extents(width, height, angle_deg)
    }

    fn baseline(&self, font: &str, font_size: f64) -> f64 {
        font_size * self.font(font).baseline
    }
}

/// Axis-aligned extents of a `width` × `height` box rotated by `angle_deg`.
#[must_use]
pub fn rotate_extents(width: f64, height: f64, angle_deg: f64) -> TextSize {
    if angle_deg == 0.0 {
        return TextSize { width, height };
    }
    let (sin, cos) = angle_deg.to_radians().sin_cos();
    TextSize {
        width: (width * cos).abs() + (height * sin).abs(),
        height: (width * sin).abs() + (height * cos).abs(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct MeasureKey {
    text: String,
    font: String,
    font_size: OrderedFloat<f64>,
    angle: OrderedFloat<f64>,
    line_spacing: OrderedFloat<f64>,
}

/// Runtime metrics exposed by [`MeasureCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MeasureCacheStats {
    pub hits: u64,
    pub misses: u64,
    pub size: usize,
}

/// Memoises measurements by `(text, font, size, angle, spacing)`.
#[derive(Debug, Default)]
pub struct MeasureCache {
    entries: HashMap<MeasureKey, TextSize>,
    hits: u64,
    misses: u64,
}

impl MeasureCache {
    const MAX_ENTRIES: usize = 8192;

    pub fn measure(
        &mut self,
        metrics: &dyn TextMetrics,
        text: &str,
        font: &str,
        font_size: f64,
        angle_deg: f64,
        line_spacing: f64,
    ) -> TextSize {
        let key = MeasureKey {
            text: text.to_owned(),
            font: font.to_owned(),
            font_size: OrderedFloat(font_size),
            angle: OrderedFloat(angle_deg),
            line_spacing: OrderedFloat(line_spacing),
        };
        if let Some(size) = self.entries.get(&key) {
            self.hits = self.hits.saturating_add(1);
            return *size;
        }

        self.misses = self.misses.saturating_add(1);
        let size = metrics.measure(text, font, font_size, angle_deg, line_spacing);
        if self.entries.len() >= Self::MAX_ENTRIES {
            trace!(entries = self.entries.len(), "measure cache full, clearing");
            self.entries.clear();
        }
        self.entries.insert(key, size);
        size
    }

    #[must_use]
    pub fn stats(&self) -> MeasureCacheStats {
        MeasureCacheStats {
            hits: self.hits,
            misses: self.misses,
            size: self.entries.len(),
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::{EstimatedTextMetrics, FontMetrics, MeasureCache, TextMetrics, rotate_extents};

    #[test]
    fn multi_line_height_uses_line_spacing() {
        let metrics = EstimatedTextMetrics::default();
        let single = metrics.measure("12:00", "sans-serif", 10.0, 0.0, 1.2);
        let double = metrics.measure("12:00\n2024", "sans-serif", 10.0, 0.0, 1.2);
        assert_eq!(single.height, 10.0);
        assert!((double.height - 22.0).abs() < 1e-9);
        assert_eq!(single.width, double.width);
    }

    #[test]
    fn quarter_turn_swaps_extents() {
        let rotated = rotate_extents(40.0, 10.0, 90.0);
        assert!((rotated.width - 10.0).abs() < 1e-9);
        assert!((rotated.height - 40.0).abs() < 1e-9);
    }

    #[test]
    fn cache_counts_hits_and_misses() {
        let metrics = EstimatedTextMetrics::default();
        let mut cache = MeasureCache::default();
        let first = cache.measure(&metrics, "100", "sans-serif", 12.0, 0.0, 1.0);
        let second = cache.measure(&metrics, "100", "sans-serif", 12.0, 0.0, 1.0);
        assert_eq!(first, second);
        let stats = cache.stats();
        assert_eq!((stats.hits, stats.misses, stats.size), (1, 1, 1));
    }

    #[test]
    fn registered_font_only_applies_to_its_name() {
        let metrics = EstimatedTextMetrics::new().with_font(FontMetrics {
            name: "narrow-local".to_owned(),
            digit: 0.1,
            ..FontMetrics::default()
        });
        let narrow = metrics.measure("100", "narrow-local", 10.0, 0.0, 1.0);
        let regular = metrics.measure("100", "not-registered", 10.0, 0.0, 1.0);
        assert!((narrow.width - 3.0).abs() < 1e-9);
        assert!((regular.width - 18.6).abs() < 1e-9);
    }
}
