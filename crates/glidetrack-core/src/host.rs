//! Boundary between the engine and the environment that renders the track.

use std::time::Instant;

use crate::looping::TrackPlan;

/// How the host should move the scroll position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    /// Animated, using the host's native smooth scrolling
    Smooth,
    /// Immediate jump
    Instant,
}

/// The environment a slider lives in.
///
/// A host owns the scroll container and the slide content. The engine reads
/// layout from it and issues scroll commands; the host reports back through
/// the slider's `on_*` entry points.
pub trait SliderHost {
    /// Slide content handed to `add`
    type Slide;

    /// Whether the scrollable track container exists
    fn has_track(&self) -> bool;

    /// Number of real slides currently in the container
    fn slide_count(&self) -> usize;

    /// Viewport extent along the main axis, in px
    fn viewport_size(&self) -> f64;

    /// Current raw scroll coordinate
    fn scroll_position(&self) -> f64;

    /// Move the scroll position to a raw coordinate
    fn scroll_to(&mut self, position: f64, behavior: ScrollBehavior);

    /// Raw value of a host style variable
    fn style_value(&self, name: &str) -> Option<String>;

    /// Insert slides at `at` (already clamped to the slide count)
    fn insert_slides(&mut self, at: usize, slides: Vec<Self::Slide>);

    /// Remove slides at the given indices (sorted, distinct, in range)
    fn remove_slides(&mut self, indices: &[usize]);

    /// Toggle native scroll snapping
    fn set_snap_enabled(&mut self, _enabled: bool) {}

    /// Lay out the track nodes (real slides and loop clones)
    fn render_track(&mut self, _plan: &TrackPlan) {}

    /// Mark a logical slide as highlighted, or clear the highlight
    fn set_highlight(&mut self, _index: Option<usize>) {}

    /// Ask for an `animation_frame` call before the next paint
    fn request_frame(&mut self) {}

    /// Current time; every timer and velocity sample is measured against it
    fn now(&self) -> Instant {
        Instant::now()
    }
}
