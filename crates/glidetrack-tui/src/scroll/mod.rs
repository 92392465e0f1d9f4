//! Native smooth scrolling for the terminal track.
//!
//! A browser animates `scroll_to(.., smooth)` on its own; the terminal host
//! has to do it itself. The engine only ever sees the resulting positions.
//!
//! - `easing` maps animation progress onto an eased curve
//! - `timing` holds progress and interpolation helpers
//! - `config` derives durations from the core [`ScrollConfig`]
//! - `animation` ties them into [`ScrollAnimator`]
//!
//! ```ignore
//! use glidetrack_tui::scroll::ScrollAnimator;
//!
//! let mut animator = ScrollAnimator::new(config.ui.scroll.clone());
//! animator.scroll_to(1200.0, now);
//! // once per frame
//! let pos = animator.update(now);
//! ```

pub mod config;
pub mod easing;
pub mod timing;

pub mod animation;

pub use animation::ScrollAnimator;
pub use config::{frame_interval, smooth_duration, ScrollConfig};
pub use easing::{EasingType, EasingTypeExt};
