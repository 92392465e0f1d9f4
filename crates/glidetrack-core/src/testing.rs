//! Recording host used by the engine's unit tests.

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::host::{ScrollBehavior, SliderHost};
use crate::layout::{STYLE_GAP, STYLE_SLIDES_PER_VIEW};
use crate::looping::TrackPlan;

/// Manually advanced clock, shareable between hosts
#[derive(Debug, Clone)]
pub(crate) struct TestClock(Rc<Cell<Instant>>);

impl TestClock {
    pub(crate) fn new() -> Self {
        Self(Rc::new(Cell::new(Instant::now())))
    }

    pub(crate) fn now(&self) -> Instant {
        self.0.get()
    }

    pub(crate) fn advance(&self, ms: u64) {
        self.0.set(self.0.get() + Duration::from_millis(ms));
    }
}

/// In-memory host: scrolls land immediately and every command is recorded
#[derive(Debug)]
pub(crate) struct RecordingHost {
    pub(crate) has_track: bool,
    pub(crate) slides: Vec<String>,
    pub(crate) viewport: f64,
    pub(crate) position: f64,
    pub(crate) styles: HashMap<String, String>,
    pub(crate) scrolls: Vec<(f64, ScrollBehavior)>,
    pub(crate) snap: bool,
    pub(crate) plan: TrackPlan,
    pub(crate) highlight: Option<usize>,
    pub(crate) frames_requested: usize,
    pub(crate) clock: TestClock,
}

impl RecordingHost {
    pub(crate) fn new(count: usize, slides_per_view: &str, viewport: f64) -> Self {
        let mut styles = HashMap::new();
        styles.insert(STYLE_SLIDES_PER_VIEW.to_string(), slides_per_view.to_string());
        styles.insert(STYLE_GAP.to_string(), "0".to_string());
        Self {
            has_track: true,
            slides: (0..count).map(|i| format!("slide {i}")).collect(),
            viewport,
            position: 0.0,
            styles,
            scrolls: Vec::new(),
            snap: true,
            plan: TrackPlan::default(),
            highlight: None,
            frames_requested: 0,
            clock: TestClock::new(),
        }
    }

    pub(crate) fn with_clock(mut self, clock: TestClock) -> Self {
        self.clock = clock;
        self
    }

    pub(crate) fn last_scroll(&self) -> Option<(f64, ScrollBehavior)> {
        self.scrolls.last().copied()
    }
}

impl SliderHost for RecordingHost {
    type Slide = String;

    fn has_track(&self) -> bool {
        self.has_track
    }

    fn slide_count(&self) -> usize {
        self.slides.len()
    }

    fn viewport_size(&self) -> f64 {
        self.viewport
    }

    fn scroll_position(&self) -> f64 {
        self.position
    }

    fn scroll_to(&mut self, position: f64, behavior: ScrollBehavior) {
        self.position = position;
        self.scrolls.push((position, behavior));
    }

    fn style_value(&self, name: &str) -> Option<String> {
        self.styles.get(name).cloned()
    }

    fn insert_slides(&mut self, at: usize, slides: Vec<String>) {
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
    }

    fn set_highlight(&mut self, index: Option<usize>) {
        self.highlight = index;
    }

    fn request_frame(&mut self) {
        self.frames_requested += 1;
    }

    fn now(&self) -> Instant {
        self.clock.now()
    }
}
