use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Scroll axis and reading direction of the track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    /// Horizontal, first slide on the left
    #[default]
    StartToEnd,
    /// Horizontal, first slide on the right (host reports negative offsets)
    EndToStart,
    /// Vertical, first slide on top
    TopToBottom,
}

impl Direction {
    /// Whether the main axis is vertical
    pub fn is_vertical(self) -> bool {
        matches!(self, Direction::TopToBottom)
    }

    /// Convert a raw host scroll coordinate into a non-negative logical offset
    pub fn to_logical(self, raw: f64) -> f64 {
        match self {
            Direction::EndToStart => -raw,
            _ => raw,
        }
    }

    /// Convert a logical offset back into the host's raw coordinate
    pub fn to_raw(self, logical: f64) -> f64 {
        match self {
            Direction::EndToStart => -logical,
            _ => logical,
        }
    }

    /// Pick the pointer coordinate along the main axis, signed so that a
    /// positive value moves content toward the end of the track.
    pub fn pointer_axis(self, x: f64, y: f64) -> f64 {
        match self {
            Direction::StartToEnd => x,
            Direction::EndToStart => -x,
            Direction::TopToBottom => y,
        }
    }
}

/// User-supplied slider options, merged over defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SliderConfig {
    /// Simulate an infinite track over the finite slide set
    #[serde(rename = "loop", default)]
    pub loop_enabled: bool,
    /// Advance automatically on a fixed interval
    #[serde(default)]
    pub autoplay: bool,
    /// Autoplay interval in milliseconds
    #[serde(default = "default_autoplay_interval")]
    pub autoplay_interval_ms: u64,
    /// Allow pointer dragging of the track
    #[serde(default = "default_true")]
    pub draggable: bool,
    /// Maximum number of pagination dots (None = unbounded)
    #[serde(default)]
    pub max_dots: Option<usize>,
    /// Slides advanced by `next`/`prev`
    #[serde(default = "default_per_move")]
    pub per_move: usize,
    /// Track direction
    #[serde(default)]
    pub direction: Direction,
}

impl Default for SliderConfig {
    fn default() -> Self {
        Self {
            loop_enabled: false,
            autoplay: false,
            autoplay_interval_ms: default_autoplay_interval(),
            draggable: default_true(),
            max_dots: None,
            per_move: default_per_move(),
            direction: Direction::default(),
        }
    }
}

impl SliderConfig {
    /// Merge a partial update over this config
    pub fn merge(&mut self, patch: &SliderConfigPatch) {
        if let Some(value) = patch.loop_enabled {
            self.loop_enabled = value;
        }
        if let Some(value) = patch.autoplay {
            self.autoplay = value;
        }
        if let Some(value) = patch.autoplay_interval_ms {
            self.autoplay_interval_ms = value;
        }
        if let Some(value) = patch.draggable {
            self.draggable = value;
        }
        if let Some(value) = patch.max_dots {
            self.max_dots = value;
        }
        if let Some(value) = patch.per_move {
            self.per_move = value;
        }
        if let Some(value) = patch.direction {
            self.direction = value;
        }
        self.normalize();
    }

    /// Clamp values that have a lower bound
    pub fn normalize(&mut self) {
        self.per_move = self.per_move.max(1);
        self.autoplay_interval_ms = self.autoplay_interval_ms.max(1);
        if self.max_dots == Some(0) {
            self.max_dots = Some(1);
        }
    }
}

/// Partial slider config passed to `Slider::update`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SliderConfigPatch {
    #[serde(rename = "loop", default)]
    pub loop_enabled: Option<bool>,
    #[serde(default)]
    pub autoplay: Option<bool>,
    #[serde(default)]
    pub autoplay_interval_ms: Option<u64>,
    #[serde(default)]
    pub draggable: Option<bool>,
    /// `Some(None)` switches pagination back to unbounded
    #[serde(default)]
    pub max_dots: Option<Option<usize>>,
    #[serde(default)]
    pub per_move: Option<usize>,
    #[serde(default)]
    pub direction: Option<Direction>,
}

impl SliderConfigPatch {
    pub fn loop_enabled(mut self, value: bool) -> Self {
        self.loop_enabled = Some(value);
        self
    }

    pub fn autoplay(mut self, value: bool) -> Self {
        self.autoplay = Some(value);
        self
    }

    pub fn draggable(mut self, value: bool) -> Self {
        self.draggable = Some(value);
        self
    }

    pub fn per_move(mut self, value: usize) -> Self {
        self.per_move = Some(value);
        self
    }

    pub fn max_dots(mut self, value: Option<usize>) -> Self {
        self.max_dots = Some(value);
        self
    }
}

/// Easing curve used by host-side smooth scrolling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EasingType {
    None,
    Linear,
    #[default]
    Cubic,
    Quintic,
    EaseOut,
}

/// Smooth scrolling parameters for the terminal host
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrollConfig {
    #[serde(default = "default_true")]
    pub smooth_enabled: bool,
    #[serde(default = "default_animation_duration")]
    pub animation_duration_ms: u64,
    #[serde(default)]
    pub easing: EasingType,
    #[serde(default = "default_animation_fps")]
    pub animation_fps: u32,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            smooth_enabled: default_true(),
            animation_duration_ms: default_animation_duration(),
            easing: EasingType::default(),
            animation_fps: default_animation_fps(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub slider: SliderConfig,
    #[serde(default)]
    pub layout: LayoutStyles,
    #[serde(default)]
    pub thumbnails: ThumbnailConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Data directory path (log files)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

/// Host style variables, kept as raw strings the way a stylesheet holds them.
/// Values that fail to parse fall back to layout defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutStyles {
    #[serde(default = "default_slides_per_view")]
    pub slides_per_view: String,
    #[serde(default = "default_gap")]
    pub gap: String,
    #[serde(default = "default_aspect_ratio")]
    pub aspect_ratio: String,
}

impl Default for LayoutStyles {
    fn default() -> Self {
        Self {
            slides_per_view: default_slides_per_view(),
            gap: default_gap(),
            aspect_ratio: default_aspect_ratio(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThumbnailConfig {
    /// Show a thumbnail rail bound to the primary slider
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_thumbnail_slides_per_view")]
    pub slides_per_view: String,
    #[serde(default = "default_thumbnail_gap")]
    pub gap: String,
    /// Force the rail's loop mode instead of mirroring the primary
    #[serde(default)]
    pub loop_override: Option<bool>,
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            slides_per_view: default_thumbnail_slides_per_view(),
            gap: default_thumbnail_gap(),
            loop_override: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Tick rate in milliseconds
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    /// Number of demo slides
    #[serde(default = "default_slide_count")]
    pub slide_count: usize,
    /// Host smooth scrolling
    #[serde(default)]
    pub scroll: ScrollConfig,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            slide_count: default_slide_count(),
            scroll: ScrollConfig::default(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_autoplay_interval() -> u64 {
    3000
}

fn default_per_move() -> usize {
    1
}

fn default_animation_duration() -> u64 {
    240
}

fn default_animation_fps() -> u32 {
    60
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("glidetrack")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_slides_per_view() -> String {
    "1".to_string()
}

fn default_gap() -> String {
    "2px".to_string()
}

fn default_aspect_ratio() -> String {
    "16 / 9".to_string()
}

fn default_thumbnail_slides_per_view() -> String {
    "4.5".to_string()
}

fn default_thumbnail_gap() -> String {
    "1px".to_string()
}

fn default_tick_rate() -> u64 {
    16
}

fn default_slide_count() -> usize {
    8
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &std::path::Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl AppConfig {
    /// Load configuration from an explicit path, defaults when absent
    pub fn load_from(path: &std::path::Path) -> crate::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_toml(content: &str) -> crate::Result<Self> {
        let mut config: Self =
            toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))?;
        config.slider.normalize();
        Ok(config)
    }

    /// Save configuration to `path`, creating parent directories
    pub fn save_to(&self, path: &std::path::Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    pub fn to_toml(&self) -> crate::Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Always uses ~/.config/glidetrack/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("glidetrack")
            .join("config.toml")
    }

    /// Get the log file path used while the terminal UI owns the screen
    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("glidetrack.log")
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_toml() {
        let config = AppConfig::from_toml("").unwrap();
        assert!(!config.slider.loop_enabled);
        assert!(config.slider.draggable);
        assert_eq!(config.slider.per_move, 1);
        assert_eq!(config.slider.max_dots, None);
        assert_eq!(config.slider.direction, Direction::StartToEnd);
        assert_eq!(config.layout.slides_per_view, "1");
        assert!(config.thumbnails.enabled);
    }

    #[test]
    fn test_slider_section_parses() {
        let config = AppConfig::from_toml(
            r#"
            [slider]
            loop = true
            per_move = 0
            max_dots = 5
            direction = "end-to-start"
            "#,
        )
        .unwrap();
        assert!(config.slider.loop_enabled);
        // per_move is clamped to at least one
        assert_eq!(config.slider.per_move, 1);
        assert_eq!(config.slider.max_dots, Some(5));
        assert_eq!(config.slider.direction, Direction::EndToStart);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = AppConfig::from_toml("[slider]\nloop = \"maybe\"").unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }

    #[test]
    fn test_patch_merge() {
        let mut config = SliderConfig::default();
        config.merge(&SliderConfigPatch::default().loop_enabled(true).per_move(2));
        assert!(config.loop_enabled);
        assert_eq!(config.per_move, 2);
        assert!(config.draggable);

        config.merge(&SliderConfigPatch::default().max_dots(Some(3)));
        assert_eq!(config.max_dots, Some(3));
        config.merge(&SliderConfigPatch::default().max_dots(None));
        assert_eq!(config.max_dots, None);
    }

    #[test]
    fn test_direction_mapping() {
        assert_eq!(Direction::EndToStart.to_logical(-120.0), 120.0);
        assert_eq!(Direction::EndToStart.to_raw(120.0), -120.0);
        assert_eq!(Direction::TopToBottom.pointer_axis(3.0, 7.0), 7.0);
        assert_eq!(Direction::EndToStart.pointer_axis(3.0, 7.0), -3.0);
    }

    #[test]
    fn test_round_trip_toml() {
        let config = AppConfig::default();
        let text = config.to_toml().unwrap();
        let parsed = AppConfig::from_toml(&text).unwrap();
        assert_eq!(parsed.slider, config.slider);
    }
}
