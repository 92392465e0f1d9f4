//! Layout inputs read from host styling state.
//!
//! The host exposes style variables as raw strings. They are re-read at
//! well-defined points (construction, `update`, resize settle, `refresh`) and
//! never cached beyond the next of those triggers.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Style variable holding the number of slides per view
pub const STYLE_SLIDES_PER_VIEW: &str = "slides-per-view";
/// Style variable holding the gap between slides
pub const STYLE_GAP: &str = "gap";
/// Style variable holding the slide aspect ratio
pub const STYLE_ASPECT_RATIO: &str = "aspect-ratio";

/// Root font size used to resolve `rem`/`em` gaps
const ROOT_FONT_SIZE_PX: f64 = 16.0;

/// Layout parameters derived from host styling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Positive, possibly fractional
    pub slides_per_view: f64,
    /// Gap between slides in px
    pub gap: f64,
    pub aspect_ratio: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            slides_per_view: 1.0,
            gap: 0.0,
            aspect_ratio: "auto".to_string(),
        }
    }
}

impl LayoutConfig {
    /// Read layout from a style lookup, falling back per field on absent or
    /// malformed values.
    pub fn read<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let slides_per_view = match lookup(STYLE_SLIDES_PER_VIEW) {
            Some(raw) => parse_slides_per_view(&raw).unwrap_or_else(|| {
                warn!(value = %raw, "Ignoring malformed slides-per-view");
                defaults.slides_per_view
            }),
            None => defaults.slides_per_view,
        };

        let gap = match lookup(STYLE_GAP) {
            Some(raw) => parse_length(&raw).unwrap_or_else(|| {
                warn!(value = %raw, "Ignoring malformed gap");
                defaults.gap
            }),
            None => defaults.gap,
        };

        let aspect_ratio = match lookup(STYLE_ASPECT_RATIO) {
            Some(raw) => parse_aspect_ratio(&raw).unwrap_or_else(|| {
                warn!(value = %raw, "Ignoring malformed aspect-ratio");
                defaults.aspect_ratio.clone()
            }),
            None => defaults.aspect_ratio,
        };

        Self {
            slides_per_view,
            gap,
            aspect_ratio,
        }
    }

    /// Whether slides-per-view is not a whole number
    pub fn is_fractional(&self) -> bool {
        is_fractional(self.slides_per_view)
    }
}

/// Whether a slides-per-view value requires centered alignment
pub fn is_fractional(slides_per_view: f64) -> bool {
    (slides_per_view - slides_per_view.round()).abs() > 1e-6
}

fn parse_slides_per_view(raw: &str) -> Option<f64> {
    let value: f64 = raw.trim().parse().ok()?;
    (value.is_finite() && value > 0.0).then_some(value)
}

fn length_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*(-?\d+(?:\.\d+)?|-?\.\d+)\s*(px|rem|em)?\s*$").expect("valid length regex")
    })
}

fn ratio_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*(\d+(?:\.\d+)?)\s*(?:/\s*(\d+(?:\.\d+)?))?\s*$").expect("valid ratio regex")
    })
}

/// Parse a CSS length (`12`, `12px`, `0.5rem`) into px; negatives are rejected
fn parse_length(raw: &str) -> Option<f64> {
    let caps = length_regex().captures(raw)?;
    let value: f64 = caps.get(1)?.as_str().parse().ok()?;
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    let px = match caps.get(2).map(|m| m.as_str()) {
        Some("rem") | Some("em") => value * ROOT_FONT_SIZE_PX,
        _ => value,
    };
    Some(px)
}

/// Accept `auto`, `16 / 9` or a single positive number
fn parse_aspect_ratio(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("auto") {
        return Some("auto".to_string());
    }
    let caps = ratio_regex().captures(trimmed)?;
    let width: f64 = caps.get(1)?.as_str().parse().ok()?;
    let height: f64 = match caps.get(2) {
        Some(m) => m.as_str().parse().ok()?,
        None => 1.0,
    };
    if width <= 0.0 || height <= 0.0 {
        return None;
    }
    Some(match caps.get(2) {
        Some(h) => format!("{} / {}", caps.get(1)?.as_str(), h.as_str()),
        None => caps.get(1)?.as_str().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn read(pairs: &[(&str, &str)]) -> LayoutConfig {
        let styles: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        LayoutConfig::read(|name| styles.get(name).cloned())
    }

    #[test]
    fn test_absent_values_use_defaults() {
        assert_eq!(read(&[]), LayoutConfig::default());
    }

    #[test]
    fn test_parses_values() {
        let layout = read(&[
            (STYLE_SLIDES_PER_VIEW, " 2.5 "),
            (STYLE_GAP, "1.5rem"),
            (STYLE_ASPECT_RATIO, "4/3"),
        ]);
        assert_eq!(layout.slides_per_view, 2.5);
        assert_eq!(layout.gap, 24.0);
        assert_eq!(layout.aspect_ratio, "4 / 3");
        assert!(layout.is_fractional());
    }

    #[test]
    fn test_malformed_values_fall_back() {
        let layout = read(&[
            (STYLE_SLIDES_PER_VIEW, "three"),
            (STYLE_GAP, "-4px"),
            (STYLE_ASPECT_RATIO, "wide"),
        ]);
        assert_eq!(layout, LayoutConfig::default());

        let zero = read(&[(STYLE_SLIDES_PER_VIEW, "0")]);
        assert_eq!(zero.slides_per_view, 1.0);
    }

    #[test]
    fn test_is_fractional() {
        assert!(!is_fractional(1.0));
        assert!(!is_fractional(3.0));
        assert!(is_fractional(1.5));
        assert!(is_fractional(2.25));
    }
}
