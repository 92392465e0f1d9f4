//! Timing derived from the core scroll configuration.

use std::time::Duration;

pub use glidetrack_core::{EasingType, ScrollConfig};

/// Length of one smooth scroll, `None` when smooth scrolls should jump
pub fn smooth_duration(config: &ScrollConfig) -> Option<Duration> {
    (config.smooth_enabled && config.animation_duration_ms > 0)
        .then(|| Duration::from_millis(config.animation_duration_ms))
}

/// Poll interval while a scroll animates, never slower than `idle`
pub fn frame_interval(config: &ScrollConfig, idle: Duration) -> Duration {
    let frame = match config.animation_fps {
        0 => Duration::from_millis(16),
        fps => Duration::from_millis((1000 / u64::from(fps)).max(1)),
    };
    frame.min(idle.max(Duration::from_millis(1)))
}
