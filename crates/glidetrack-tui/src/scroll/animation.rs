//! Smooth scroll controller for the terminal track.

use std::time::{Duration, Instant};

use super::config::{smooth_duration, ScrollConfig};
use super::easing::{EasingType, EasingTypeExt};
use super::timing::{is_complete, lerp, progress};

#[derive(Debug, Clone)]
struct ActiveAnimation {
    start: Instant,
    from: f64,
    to: f64,
    duration: Duration,
    easing: EasingType,
}

/// Scroll position with an optional animation in flight.
///
/// Call `scroll_to` or `jump_to` to move, then `update` every frame to
/// advance the animation.
#[derive(Debug, Clone)]
pub struct ScrollAnimator {
    animation: Option<ActiveAnimation>,
    config: ScrollConfig,
    current: f64,
}

impl Default for ScrollAnimator {
    fn default() -> Self {
        Self::new(ScrollConfig::default())
    }
}

impl ScrollAnimator {
    pub fn new(config: ScrollConfig) -> Self {
        Self {
            animation: None,
            config,
            current: 0.0,
        }
    }

    pub fn set_config(&mut self, config: ScrollConfig) {
        self.config = config;
    }

    pub fn config(&self) -> &ScrollConfig {
        &self.config
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Where the current animation will end
    pub fn target(&self) -> f64 {
        self.animation.as_ref().map(|a| a.to).unwrap_or(self.current)
    }

    /// Interpolated position as of the last `update`
    #[inline]
    pub fn current(&self) -> f64 {
        self.current
    }

    /// Move immediately, cancelling any animation
    pub fn jump_to(&mut self, pos: f64) {
        self.animation = None;
        self.current = pos;
    }

    /// Animate from the current position to `target`.
    ///
    /// A new target replaces the running animation from wherever it is now.
    /// With smooth scrolling disabled this is a jump.
    pub fn scroll_to(&mut self, target: f64, now: Instant) {
        let Some(duration) = smooth_duration(&self.config) else {
            self.jump_to(target);
            return;
        };
        if (target - self.current).abs() < f64::EPSILON {
            self.animation = None;
            return;
        }
        self.animation = Some(ActiveAnimation {
            start: now,
            from: self.current,
            to: target,
            duration,
            easing: self.config.easing,
        });
    }

    /// Advance the animation to `now` and return the position
    pub fn update(&mut self, now: Instant) -> f64 {
        if let Some(anim) = &self.animation {
            if is_complete(anim.start, now, anim.duration) {
                self.current = anim.to;
                self.animation = None;
            } else {
                let t = anim.easing.apply(progress(anim.start, now, anim.duration));
                self.current = lerp(anim.from, anim.to, t);
            }
        }
        self.current
    }

    /// Stop where the animation currently is
    pub fn cancel(&mut self) {
        self.animation = None;
    }

    /// Pull the position (and any animation target) into `[min, max]`
    pub fn clamp(&mut self, min: f64, max: f64) {
        self.current = self.current.clamp(min, max);
        if let Some(anim) = self.animation.as_mut() {
            anim.to = anim.to.clamp(min, max);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear(ms: u64) -> ScrollAnimator {
        ScrollAnimator::new(ScrollConfig {
            smooth_enabled: true,
            animation_duration_ms: ms,
            easing: EasingType::Linear,
            ..Default::default()
        })
    }

    #[test]
    fn test_jump_when_disabled() {
        let mut animator = ScrollAnimator::new(ScrollConfig {
            smooth_enabled: false,
            ..Default::default()
        });
        animator.scroll_to(320.0, Instant::now());
        assert_eq!(animator.current(), 320.0);
        assert!(!animator.is_animating());
    }

    #[test]
    fn test_animation_interpolates_and_finishes() {
        let start = Instant::now();
        let mut animator = linear(100);
        animator.scroll_to(400.0, start);
        assert!(animator.is_animating());
        assert_eq!(animator.target(), 400.0);

        let mid = animator.update(start + Duration::from_millis(50));
        assert!((mid - 200.0).abs() < 1e-6);
        assert_eq!(animator.update(start + Duration::from_millis(100)), 400.0);
        assert!(!animator.is_animating());
    }

    #[test]
    fn test_retarget_starts_from_current() {
        let start = Instant::now();
        let mut animator = linear(100);
        animator.scroll_to(400.0, start);
        let now = start + Duration::from_millis(50);
        animator.update(now);
        animator.scroll_to(0.0, now);
        assert!((animator.update(now) - 200.0).abs() < 1e-6);
        assert_eq!(animator.update(now + Duration::from_millis(100)), 0.0);
    }

    #[test]
    fn test_clamp_pulls_target_in() {
        let mut animator = linear(100);
        animator.jump_to(50.0);
        animator.scroll_to(900.0, Instant::now());
        animator.clamp(0.0, 300.0);
        assert_eq!(animator.target(), 300.0);
    }
}
