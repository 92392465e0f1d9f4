//! Pointer drag with momentum.
//!
//! While a drag is active the pointer delta is written straight into the
//! scroll offset (once per animation frame). Velocity is an exponentially
//! smoothed estimate; on release it is projected forward to choose the
//! landing slide.

use std::time::{Duration, Instant};

/// Weight of the newest velocity sample
pub const VELOCITY_SMOOTHING: f64 = 0.3;
/// Pixels of projection per unit of velocity (px/ms)
pub const MOMENTUM_FACTOR: f64 = 80.0;
/// A gap between samples longer than this halves the velocity
pub const STALL_THRESHOLD: Duration = Duration::from_millis(100);
/// Release idle time after which velocity starts to decay
pub const RELEASE_DECAY_START: Duration = Duration::from_millis(50);
/// Release idle time at which velocity has fully decayed
pub const RELEASE_DECAY_END: Duration = Duration::from_millis(200);

/// Origin of a pointer event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Pen,
    Touch,
}

/// A pointer-down as reported by the host
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerDown {
    pub kind: PointerKind,
    pub x: f64,
    pub y: f64,
    /// The event landed on a region excluded from dragging
    pub excluded: bool,
}

impl PointerDown {
    pub fn mouse(x: f64, y: f64) -> Self {
        Self {
            kind: PointerKind::Mouse,
            x,
            y,
            excluded: false,
        }
    }

    /// Whether this pointer-down may start a drag
    pub fn can_start_drag(&self) -> bool {
        self.kind != PointerKind::Touch && !self.excluded
    }
}

/// Exponentially smoothed velocity along the main axis, in px/ms
#[derive(Debug, Clone, Copy)]
pub struct VelocityTracker {
    velocity: f64,
    last_pos: f64,
    last_time: Instant,
}

impl VelocityTracker {
    pub fn new(pos: f64, now: Instant) -> Self {
        Self {
            velocity: 0.0,
            last_pos: pos,
            last_time: now,
        }
    }

    /// Feed a new scroll sample
    pub fn sample(&mut self, pos: f64, now: Instant) {
        let dt = now.saturating_duration_since(self.last_time);
        if dt > STALL_THRESHOLD {
            self.velocity *= 0.5;
        } else if !dt.is_zero() {
            let instant = (pos - self.last_pos) / millis(dt);
            self.velocity =
                VELOCITY_SMOOTHING * instant + (1.0 - VELOCITY_SMOOTHING) * self.velocity;
        }
        self.last_pos = pos;
        self.last_time = now;
    }

    /// Current smoothed velocity
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Velocity at release, decayed by the idle time since the last sample
    pub fn release_velocity(&self, now: Instant) -> f64 {
        let idle = now.saturating_duration_since(self.last_time);
        if idle <= RELEASE_DECAY_START {
            return self.velocity;
        }
        let span = millis(RELEASE_DECAY_END - RELEASE_DECAY_START);
        let over = millis(idle - RELEASE_DECAY_START);
        let keep = (1.0 - over / span).clamp(0.0, 1.0);
        self.velocity * keep
    }
}

fn millis(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

/// Projected landing position for a release at `pos` with `velocity`
pub fn project(pos: f64, velocity: f64) -> f64 {
    let projected = pos + velocity * MOMENTUM_FACTOR;
    if projected.is_finite() {
        projected
    } else if velocity > 0.0 {
        f64::MAX / 4.0
    } else {
        -f64::MAX / 4.0
    }
}

/// State of one active drag
#[derive(Debug, Clone)]
pub struct DragSession {
    /// Pointer coordinate along the main axis at drag start (direction-signed)
    start_pointer: f64,
    /// Logical scroll offset at drag start
    start_scroll: f64,
    /// Active index when the drag began
    pub start_index: usize,
    tracker: VelocityTracker,
    /// Latest offset not yet written to the host
    pending_write: Option<f64>,
    current_scroll: f64,
}

impl DragSession {
    pub fn new(pointer: f64, scroll: f64, start_index: usize, now: Instant) -> Self {
        Self {
            start_pointer: pointer,
            start_scroll: scroll,
            start_index,
            tracker: VelocityTracker::new(scroll, now),
            pending_write: None,
            current_scroll: scroll,
        }
    }

    /// Record a pointer move; returns true when a frame must be requested
    pub fn pointer_move(&mut self, pointer: f64, now: Instant) -> bool {
        let delta = pointer - self.start_pointer;
        let scroll = self.start_scroll - delta;
        self.tracker.sample(scroll, now);
        self.current_scroll = scroll;
        let needs_frame = self.pending_write.is_none();
        self.pending_write = Some(scroll);
        needs_frame
    }

    /// Take the coalesced offset to write this frame
    pub fn take_pending_write(&mut self) -> Option<f64> {
        self.pending_write.take()
    }

    /// Offset the drag currently wants
    pub fn current_scroll(&self) -> f64 {
        self.current_scroll
    }

    /// Shift the drag's frame of reference after a loop teleport
    pub fn shift(&mut self, by: f64) {
        self.start_scroll += by;
        self.current_scroll += by;
        if let Some(pending) = self.pending_write.as_mut() {
            *pending += by;
        }
        self.tracker.last_pos += by;
    }

    pub fn velocity(&self) -> f64 {
        self.tracker.velocity()
    }

    /// Projected position at release time
    pub fn projected_release(&self, now: Instant) -> f64 {
        project(self.current_scroll, self.tracker.release_velocity(now))
    }
}
