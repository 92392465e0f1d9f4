//! Terminal implementation of [`SliderHost`].
//!
//! The track lives in virtual pixels: one terminal column is
//! [`CELL_WIDTH_PX`] wide and one row [`CELL_HEIGHT_PX`] tall. Scroll
//! positions are clamped to the track like a browser scroll container, and
//! smooth scrolls run through the [`ScrollAnimator`].

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::{Duration, Instant};

use glidetrack_core::config::LayoutStyles;
use glidetrack_core::layout::{STYLE_ASPECT_RATIO, STYLE_GAP, STYLE_SLIDES_PER_VIEW};
use glidetrack_core::{
    Direction, Geometry, LayoutConfig, ScrollBehavior, ScrollConfig, Slider, SliderHost,
    TrackNode, TrackPlan,
};

use crate::scroll::ScrollAnimator;

pub const CELL_WIDTH_PX: f64 = 8.0;
pub const CELL_HEIGHT_PX: f64 = 16.0;

/// One slide's content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideCard {
    pub id: usize,
    pub title: String,
}

impl SlideCard {
    pub fn new(id: usize) -> Self {
        Self {
            id,
            title: format!("Slide {}", id + 1),
        }
    }
}

/// Shared clock that only moves when told to, for scripted runs
#[derive(Debug, Clone)]
pub struct ManualClock(Rc<Cell<Instant>>);

impl ManualClock {
    pub fn new() -> Self {
        Self(Rc::new(Cell::new(Instant::now())))
    }

    pub fn now(&self) -> Instant {
        self.0.get()
    }

    pub fn advance(&self, by: Duration) {
        self.0.set(self.0.get() + by);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

/// What the scroll container did since the last [`TerminalTrack::advance`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollReport {
    /// Position changed and scrolling continues
    Moved,
    /// Position changed and scrolling has stopped
    Settled,
}

#[derive(Debug)]
pub struct TerminalTrack {
    slides: Vec<SlideCard>,
    direction: Direction,
    viewport_cells: u16,
    styles: HashMap<String, String>,
    animator: ScrollAnimator,
    plan: TrackPlan,
    snap: bool,
    highlight: Option<usize>,
    frame_requested: bool,
    jumped: bool,
    clock: Option<ManualClock>,
}

impl TerminalTrack {
    pub fn new(
        slides: Vec<SlideCard>,
        direction: Direction,
        styles: &LayoutStyles,
        scroll: ScrollConfig,
    ) -> Self {
        let mut map = HashMap::new();
        map.insert(STYLE_SLIDES_PER_VIEW.to_string(), styles.slides_per_view.clone());
        map.insert(STYLE_GAP.to_string(), styles.gap.clone());
        map.insert(STYLE_ASPECT_RATIO.to_string(), styles.aspect_ratio.clone());
        Self {
            plan: TrackPlan::plain(slides.len()),
            slides,
            direction,
            viewport_cells: 0,
            styles: map,
            animator: ScrollAnimator::new(scroll),
            snap: true,
            highlight: None,
            frame_requested: false,
            jumped: false,
            clock: None,
        }
    }

    pub fn with_clock(mut self, clock: ManualClock) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn with_viewport_cells(mut self, cells: u16) -> Self {
        self.viewport_cells = cells;
        self
    }

    pub fn slides(&self) -> &[SlideCard] {
        &self.slides
    }

    pub fn plan(&self) -> &TrackPlan {
        &self.plan
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.highlight
    }

    pub fn snap_enabled(&self) -> bool {
        self.snap
    }

    pub fn style(&self, name: &str) -> Option<&str> {
        self.styles.get(name).map(String::as_str)
    }

    /// Change a style variable; the slider picks it up on its next update
    pub fn set_style(&mut self, name: &str, value: impl Into<String>) {
        self.styles.insert(name.to_string(), value.into());
    }

    pub fn viewport_cells(&self) -> u16 {
        self.viewport_cells
    }

    /// Returns whether the size actually changed
    pub fn set_viewport_cells(&mut self, cells: u16) -> bool {
        if cells == self.viewport_cells {
            return false;
        }
        self.viewport_cells = cells;
        self.clamp_to_track();
        true
    }

    /// Virtual pixels per cell along the main axis
    pub fn cell_px(&self) -> f64 {
        if self.direction.is_vertical() {
            CELL_HEIGHT_PX
        } else {
            CELL_WIDTH_PX
        }
    }

    /// Layout of every rendered node, clones included
    pub fn geometry(&self) -> Geometry {
        let layout = LayoutConfig::read(|name| self.style_value(name));
        Geometry::measure(self.viewport_size(), self.plan.len(), &layout)
    }

    /// Logical offset of the visible window
    pub fn logical_position(&self) -> f64 {
        self.direction.to_logical(self.animator.current())
    }

    /// Node under a main-axis offset from the viewport start
    pub fn node_at(&self, offset_px: f64) -> Option<TrackNode> {
        let geometry = self.geometry();
        let size = geometry.slide_size();
        if size <= 0.0 {
            return None;
        }
        let along = self.logical_position() + offset_px;
        if along < 0.0 {
            return None;
        }
        let index = (along / size).floor() as usize;
        let within = along - index as f64 * size;
        if within > geometry.slide_visual {
            return None;
        }
        self.plan.nodes.get(index).copied()
    }

    /// User-initiated scroll (wheel or keys), animated like native scrolling
    pub fn scroll_by(&mut self, delta_px: f64) {
        let now = self.now();
        let target = self.direction.to_logical(self.animator.target()) + delta_px;
        let raw = self.direction.to_raw(self.clamp_logical(target));
        self.animator.scroll_to(raw, now);
    }

    /// Advance smooth scrolling and report what changed
    pub fn advance(&mut self) -> Option<ScrollReport> {
        let now = self.now();
        let was_animating = self.animator.is_animating();
        self.animator.update(now);
        if was_animating {
            return Some(if self.animator.is_animating() {
                ScrollReport::Moved
            } else {
                ScrollReport::Settled
            });
        }
        std::mem::take(&mut self.jumped).then_some(ScrollReport::Settled)
    }

    pub fn is_scrolling(&self) -> bool {
        self.animator.is_animating()
    }

    pub fn take_frame_request(&mut self) -> bool {
        std::mem::take(&mut self.frame_requested)
    }

    fn clamp_logical(&self, logical: f64) -> f64 {
        logical.clamp(0.0, self.geometry().max_scroll())
    }

    fn clamp_to_track(&mut self) {
        let max = self.geometry().max_scroll();
        let (low, high) = match self.direction {
            Direction::EndToStart => (-max, 0.0),
            _ => (0.0, max),
        };
        self.animator.clamp(low, high);
    }
}

impl SliderHost for TerminalTrack {
    type Slide = SlideCard;

    fn has_track(&self) -> bool {
        true
    }

    fn slide_count(&self) -> usize {
        self.slides.len()
    }

    fn viewport_size(&self) -> f64 {
        self.viewport_cells as f64 * self.cell_px()
    }

    fn scroll_position(&self) -> f64 {
        self.animator.current()
    }

    fn scroll_to(&mut self, position: f64, behavior: ScrollBehavior) {
        let logical = self.clamp_logical(self.direction.to_logical(position));
        let raw = self.direction.to_raw(logical);
        match behavior {
            ScrollBehavior::Smooth => {
                let now = self.now();
                self.animator.scroll_to(raw, now);
            }
            ScrollBehavior::Instant => {
                self.animator.jump_to(raw);
                self.jumped = true;
            }
        }
    }

    fn style_value(&self, name: &str) -> Option<String> {
        self.styles.get(name).cloned()
    }

    fn insert_slides(&mut self, at: usize, slides: Vec<SlideCard>) {
        let at = at.min(self.slides.len());
        self.slides.splice(at..at, slides);
    }

    fn remove_slides(&mut self, indices: &[usize]) {
        for &index in indices.iter().rev() {
            if index < self.slides.len() {
                self.slides.remove(index);
            }
        }
    }

    fn set_snap_enabled(&mut self, enabled: bool) {
        self.snap = enabled;
    }

    fn render_track(&mut self, plan: &TrackPlan) {
        self.plan = plan.clone();
        self.clamp_to_track();
    }

    fn set_highlight(&mut self, index: Option<usize>) {
        self.highlight = index;
    }

    fn request_frame(&mut self) {
        self.frame_requested = true;
    }

    fn now(&self) -> Instant {
        match &self.clock {
            Some(clock) => clock.now(),
            None => Instant::now(),
        }
    }
}

/// Run one frame for a terminal-hosted slider: flush drag writes, forward
/// scroll progress and fire due timers.
pub fn drive(slider: &mut Slider<TerminalTrack>) {
    if slider.is_destroyed() {
        return;
    }
    if slider.host_mut().take_frame_request() {
        slider.animation_frame();
    }
    match slider.host_mut().advance() {
        Some(ScrollReport::Moved) => slider.on_scroll(),
        Some(ScrollReport::Settled) => {
            slider.on_scroll();
            slider.on_scroll_end();
        }
        None => {}
    }
    slider.tick();
}
