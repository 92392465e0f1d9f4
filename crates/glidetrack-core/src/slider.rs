//! The slider instance: owns one host, derives the current slide from
//! scroll position and drives navigation, loop teleports, drag and autoplay.
//!
//! Every entry point is a synchronous state transition. Time-based work
//! (teleport, resize settle, autoplay, programmatic-scroll fallback) is armed
//! in a [`Timers`] table and fired from [`Slider::tick`]. Once destroyed, every
//! operation is a silent no-op.

use std::time::Duration;

use tracing::{debug, info};

use crate::autoplay::{Autoplay, Hold};
use crate::config::{SliderConfig, SliderConfigPatch};
use crate::drag::{DragSession, PointerDown};
use crate::error::{Error, Result};
use crate::events::{EventBus, EventKind, ListenerId, SliderEvent};
use crate::host::{ScrollBehavior, SliderHost};
use crate::layout::LayoutConfig;
use crate::looping::{clone_sets, LoopController, TrackPlan};
use crate::pagination::{Navigation, Pagination};
use crate::position::Geometry;
use crate::timers::Timers;
use crate::visibility::{visible_indices, VisibilityTracker};

/// Quiet period after the last scroll event before a loop teleport
pub const TELEPORT_DELAY: Duration = Duration::from_millis(120);
/// Quiet period after the last resize event before re-layout
pub const RESIZE_SETTLE_DELAY: Duration = Duration::from_millis(150);
/// Clears the programmatic-scroll flag if the host never reports scroll end
pub const PROGRAMMATIC_SCROLL_TIMEOUT: Duration = Duration::from_millis(1200);

/// Scroll targets closer than this to the current position are not issued
const SCROLL_EPSILON_PX: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SliderTimer {
    Teleport,
    ResizeSettle,
    ProgrammaticScroll,
    Autoplay,
}

/// Mutable per-instance state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SliderState {
    pub current_index: usize,
    pub is_dragging: bool,
    /// Terminal; every mutating operation is a no-op afterwards
    pub is_destroyed: bool,
    pub loop_mode_active: bool,
    /// Set while an engine-issued scroll is in flight; its echoes do not
    /// recompute the index
    pub is_programmatic_scroll: bool,
    /// Cached slide size, 0 when unmeasured or stale
    pub slide_width_px: f64,
}

pub struct Slider<H: SliderHost> {
    host: H,
    config: SliderConfig,
    layout: LayoutConfig,
    state: SliderState,
    slide_count: usize,
    viewport: f64,
    clone_sets: usize,
    plan: TrackPlan,
    events: EventBus,
    timers: Timers<SliderTimer>,
    drag: Option<DragSession>,
    autoplay: Autoplay,
    visibility: VisibilityTracker,
    highlight: Option<usize>,
    /// Logical target of the in-flight programmatic scroll
    pending_target: Option<f64>,
    mounted: bool,
}

impl<H: SliderHost> std::fmt::Debug for Slider<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Slider")
            .field("config", &self.config)
            .field("layout", &self.layout)
            .field("state", &self.state)
            .field("slide_count", &self.slide_count)
            .field("clone_sets", &self.clone_sets)
            .finish_non_exhaustive()
    }
}

impl<H: SliderHost> Slider<H> {
    /// Bind a slider to a host.
    ///
    /// Fails when the host has no track container or no slides.
    pub fn new(host: H, mut config: SliderConfig) -> Result<Self> {
        if !host.has_track() {
            return Err(Error::MissingTrack);
        }
        let slide_count = host.slide_count();
        if slide_count == 0 {
            return Err(Error::EmptySlides);
        }
        config.normalize();

        let mut slider = Self {
            host,
            config,
            layout: LayoutConfig::default(),
            state: SliderState::default(),
            slide_count,
            viewport: 0.0,
            clone_sets: 0,
            plan: TrackPlan::default(),
            events: EventBus::default(),
            timers: Timers::new(),
            drag: None,
            autoplay: Autoplay::default(),
            visibility: VisibilityTracker::default(),
            highlight: None,
            pending_target: None,
            mounted: false,
        };
        slider.relayout();
        slider.host.set_snap_enabled(true);
        Ok(slider)
    }

    /// Announce readiness and start autoplay when configured.
    ///
    /// Separate from `new` so listeners can be attached first.
    pub fn mount(&mut self) {
        if self.state.is_destroyed || self.mounted {
            return;
        }
        self.mounted = true;
        info!(
            slides = self.slide_count,
            looped = self.state.loop_mode_active,
            "Slider ready"
        );
        self.emit(SliderEvent::Ready {
            index: self.state.current_index,
        });
        self.refresh_visibility();
        if self.config.autoplay {
            self.start_autoplay();
        }
    }

    // ---- read-only accessors ----

    pub fn current_index(&self) -> usize {
        self.state.current_index
    }

    pub fn slide_count(&self) -> usize {
        self.slide_count
    }

    pub fn state(&self) -> &SliderState {
        &self.state
    }

    pub fn config(&self) -> &SliderConfig {
        &self.config
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    pub fn plan(&self) -> &TrackPlan {
        &self.plan
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn is_destroyed(&self) -> bool {
        self.state.is_destroyed
    }

    pub fn is_loop_active(&self) -> bool {
        self.state.loop_mode_active
    }

    pub fn is_autoplaying(&self) -> bool {
        self.autoplay.is_running()
    }

    pub fn highlight(&self) -> Option<usize> {
        self.highlight
    }

    /// Current geometry snapshot
    pub fn geometry(&self) -> Geometry {
        let geometry = Geometry::measure(self.viewport, self.slide_count, &self.layout);
        if self.state.loop_mode_active {
            geometry.with_loop(self.clone_sets)
        } else {
            geometry
        }
    }

    /// Highest index navigation can reach
    pub fn max_index(&self) -> usize {
        self.geometry().max_index()
    }

    /// Current logical scroll offset
    pub fn position(&self) -> f64 {
        self.config.direction.to_logical(self.host.scroll_position())
    }

    /// Windowed pagination dots for the current index
    pub fn pagination(&self) -> Pagination {
        let page_count = if self.slide_count == 0 {
            0
        } else if self.state.loop_mode_active {
            self.slide_count
        } else {
            self.max_index() + 1
        };
        Pagination::windowed(self.state.current_index, page_count, self.config.max_dots)
    }

    pub fn navigation(&self) -> Navigation {
        Navigation::new(
            self.state.current_index,
            self.max_index(),
            self.state.loop_mode_active,
        )
    }

    /// Logical indices currently on screen
    pub fn visible_slides(&self) -> Vec<usize> {
        self.visibility.visible().iter().copied().collect()
    }

    /// Earliest pending timer, so hosts know when to call `tick` next
    pub fn next_deadline(&self) -> Option<std::time::Instant> {
        if self.state.is_destroyed {
            return None;
        }
        self.timers.next_deadline()
    }

    // ---- events ----

    pub fn on<F>(&mut self, kind: EventKind, callback: F) -> ListenerId
    where
        F: FnMut(&SliderEvent) + 'static,
    {
        self.events.on(kind, callback)
    }

    pub fn off(&mut self, id: ListenerId) -> bool {
        self.events.off(id)
    }

    fn emit(&mut self, event: SliderEvent) {
        self.events.emit(event);
    }

    // ---- navigation ----

    /// Advance by `per_move` slides
    pub fn next(&mut self) {
        self.step(self.config.per_move as i64);
    }

    /// Go back by `per_move` slides
    pub fn prev(&mut self) {
        self.step(-(self.config.per_move as i64));
    }

    /// Navigate to `index`, clamped (plain track) or wrapped (loop)
    pub fn go_to(&mut self, index: isize) {
        if self.state.is_destroyed || self.slide_count == 0 {
            return;
        }
        self.ensure_measured();
        let geometry = self.geometry();

        let (target_index, target_pos) = if geometry.looped {
            let controller = LoopController::new(geometry);
            let target = index.rem_euclid(self.slide_count as isize) as usize;
            (target, controller.navigate_to(self.position(), target))
        } else {
            let target = geometry.clamp_index(index);
            (target, geometry.scroll_for_index(target))
        };

        self.scroll_programmatically(target_pos);
        self.set_index(target_index);
    }

    fn step(&mut self, steps: i64) {
        if self.state.is_destroyed || self.slide_count == 0 || steps == 0 {
            return;
        }
        self.ensure_measured();
        let geometry = self.geometry();

        if geometry.looped {
            let controller = LoopController::new(geometry);
            // chain from the in-flight target so rapid steps accumulate
            let base = self.pending_target.unwrap_or_else(|| self.position());
            let target_pos = controller.step_from(base, steps);
            let target_index = controller.logical_index(target_pos);
            self.scroll_programmatically(target_pos);
            self.set_index(target_index);
        } else {
            let target = self.state.current_index as i64 + steps;
            self.go_to(target.clamp(isize::MIN as i64, isize::MAX as i64) as isize);
        }
    }

    /// Centre the rail on logical `index`, picking the nearest loop copy.
    ///
    /// Used by thumbnail rails; the active index follows the scroll.
    pub fn reveal(&mut self, index: usize) {
        if self.state.is_destroyed || self.slide_count == 0 {
            return;
        }
        self.ensure_measured();
        let geometry = self.geometry();
        let index = index.min(self.slide_count - 1);
        let current = self.position();

        let target = if geometry.looped {
            match LoopController::new(geometry).nearest_candidate(index, current) {
                Some(pos) => pos,
                None => return,
            }
        } else {
            geometry.centering_scroll(index)
        };
        self.scroll_programmatically(target);
    }

    /// Mark a logical slide as highlighted on the host
    pub fn set_highlight(&mut self, index: Option<usize>) {
        if self.state.is_destroyed {
            return;
        }
        self.highlight = index;
        self.host.set_highlight(index);
    }

    fn set_index(&mut self, index: usize) {
        if index == self.state.current_index {
            return;
        }
        let previous = std::mem::replace(&mut self.state.current_index, index);
        self.emit(SliderEvent::SlideChange { index, previous });
    }

    fn scroll_host(&mut self, logical: f64, behavior: ScrollBehavior) {
        let raw = self.config.direction.to_raw(logical);
        self.host.scroll_to(raw, behavior);
    }

    fn scroll_programmatically(&mut self, target: f64) {
        if (target - self.position()).abs() < SCROLL_EPSILON_PX {
            return;
        }
        let now = self.host.now();
        self.state.is_programmatic_scroll = true;
        self.pending_target = Some(target);
        self.timers.cancel(SliderTimer::Teleport);
        self.timers
            .schedule(SliderTimer::ProgrammaticScroll, now, PROGRAMMATIC_SCROLL_TIMEOUT);
        self.scroll_host(target, ScrollBehavior::Smooth);
    }

    fn finish_programmatic_scroll(&mut self) {
        self.state.is_programmatic_scroll = false;
        self.pending_target = None;
        self.timers.cancel(SliderTimer::ProgrammaticScroll);
    }

    fn index_at(&self, pos: f64) -> usize {
        let geometry = self.geometry();
        if geometry.looped {
            LoopController::new(geometry).logical_index(pos)
        } else {
            geometry.index_for_scroll(pos)
        }
    }

    fn schedule_teleport(&mut self) {
        if self.state.loop_mode_active {
            let now = self.host.now();
            self.timers.schedule(SliderTimer::Teleport, now, TELEPORT_DELAY);
        }
    }

    // ---- host scroll / resize events ----

    /// The host's scroll position changed
    pub fn on_scroll(&mut self) {
        if self.state.is_destroyed || self.slide_count == 0 {
            return;
        }
        self.ensure_measured();
        if !self.state.is_programmatic_scroll {
            let index = self.index_at(self.position());
            self.set_index(index);
        }
        if self.drag.is_none() {
            self.schedule_teleport();
        }
        self.refresh_visibility();
    }

    /// The host's scrolling (native or programmatic) has settled
    pub fn on_scroll_end(&mut self) {
        if self.state.is_destroyed || self.drag.is_some() || self.slide_count == 0 {
            return;
        }
        self.ensure_measured();
        self.finish_programmatic_scroll();
        let index = self.index_at(self.position());
        self.set_index(index);
        self.schedule_teleport();
        self.refresh_visibility();
    }

    /// The viewport changed size; re-layout happens once resizing settles
    pub fn on_resize(&mut self) {
        if self.state.is_destroyed {
            return;
        }
        self.state.slide_width_px = 0.0;
        if !self.timers.is_pending(SliderTimer::ResizeSettle) {
            self.emit(SliderEvent::Resize);
        }
        let now = self.host.now();
        self.timers
            .schedule(SliderTimer::ResizeSettle, now, RESIZE_SETTLE_DELAY);
    }

    /// Fire every timer due at the host's current time
    pub fn tick(&mut self) {
        if self.state.is_destroyed {
            return;
        }
        let now = self.host.now();
        for timer in self.timers.take_due(now) {
            match timer {
                SliderTimer::Teleport => self.run_teleport(),
                SliderTimer::ResizeSettle => {
                    self.relayout();
                    self.emit(SliderEvent::Resized);
                }
                SliderTimer::ProgrammaticScroll => {
                    debug!("Programmatic scroll never settled, releasing index tracking");
                    self.finish_programmatic_scroll();
                    let index = self.index_at(self.position());
                    self.set_index(index);
                    self.schedule_teleport();
                }
                SliderTimer::Autoplay => self.run_autoplay(),
            }
        }
    }

    fn run_teleport(&mut self) {
        if !self.state.loop_mode_active || self.slide_count == 0 {
            return;
        }
        if self.drag.is_some() || self.state.is_programmatic_scroll {
            // never fight an in-flight scroll
            self.schedule_teleport();
            return;
        }
        let controller = LoopController::new(self.geometry());
        let pos = self.position();
        if let Some(target) = controller.teleport_target(pos) {
            debug!(from = pos, to = target, "Loop teleport");
            self.scroll_host(target, ScrollBehavior::Instant);
        }
    }

    // ---- drag ----

    /// Begin a drag; returns whether the pointer was captured
    pub fn pointer_down(&mut self, down: PointerDown) -> bool {
        if self.state.is_destroyed
            || !self.config.draggable
            || self.drag.is_some()
            || self.slide_count == 0
            || !down.can_start_drag()
        {
            return false;
        }
        self.ensure_measured();
        self.finish_programmatic_scroll();

        if self.state.loop_mode_active {
            self.timers.cancel(SliderTimer::Teleport);
            let controller = LoopController::new(self.geometry());
            if let Some(target) = controller.teleport_target(self.position()) {
                debug!(to = target, "Loop teleport before drag");
                self.scroll_host(target, ScrollBehavior::Instant);
            }
        }

        let now = self.host.now();
        let pointer = self.config.direction.pointer_axis(down.x, down.y);
        let start_index = self.state.current_index;
        self.drag = Some(DragSession::new(pointer, self.position(), start_index, now));
        self.state.is_dragging = true;
        self.host.set_snap_enabled(false);
        self.autoplay.hold(Hold::Drag, true);
        self.timers.cancel(SliderTimer::Autoplay);

        self.emit(SliderEvent::DragStart { index: start_index });
        true
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) {
        if self.state.is_destroyed {
            return;
        }
        let now = self.host.now();
        let pointer = self.config.direction.pointer_axis(x, y);
        let Some(drag) = self.drag.as_mut() else {
            return;
        };
        if drag.pointer_move(pointer, now) {
            self.host.request_frame();
        }
    }

    /// Flush the coalesced drag write
    pub fn animation_frame(&mut self) {
        if self.state.is_destroyed {
            return;
        }
        let pending = self.drag.as_mut().and_then(|d| d.take_pending_write());
        if let Some(pos) = pending {
            self.scroll_host(pos, ScrollBehavior::Instant);
        }
    }

    /// Release the drag and settle on the momentum-projected slide
    pub fn pointer_up(&mut self) {
        if self.state.is_destroyed {
            return;
        }
        let Some(mut drag) = self.drag.take() else {
            return;
        };
        if let Some(pos) = drag.take_pending_write() {
            self.scroll_host(pos, ScrollBehavior::Instant);
        }
        self.state.is_dragging = false;
        self.host.set_snap_enabled(true);

        let now = self.host.now();
        let geometry = self.geometry();
        let (target_index, target_pos) = if geometry.looped {
            let controller = LoopController::new(geometry);
            if let Some(target) = controller.teleport_target(drag.current_scroll()) {
                let shift = target - drag.current_scroll();
                drag.shift(shift);
                self.scroll_host(target, ScrollBehavior::Instant);
            }
            // keep the landing inside the clone buffer
            let limit = controller.section_size() * (self.clone_sets.max(2) - 1) as f64;
            let current = drag.current_scroll();
            let projected = drag
                .projected_release(now)
                .clamp(current - limit, current + limit);
            let landing = controller.scroll_for_virtual(controller.virtual_index(projected));
            (controller.logical_index(projected), landing)
        } else {
            let projected = drag.projected_release(now);
            let index = geometry.index_for_scroll(projected);
            (index, geometry.scroll_for_index(index))
        };

        debug!(
            velocity = drag.velocity(),
            from = drag.start_index,
            to = target_index,
            "Drag released"
        );

        self.scroll_programmatically(target_pos);
        self.set_index(target_index);
        self.schedule_teleport();

        self.autoplay.hold(Hold::Drag, false);
        self.schedule_autoplay();

        self.emit(SliderEvent::DragEnd {
            start_index: drag.start_index,
            index: target_index,
        });
    }

    /// Pointer entered the viewport; holds autoplay
    pub fn pointer_enter(&mut self) {
        if self.state.is_destroyed {
            return;
        }
        self.autoplay.hold(Hold::Hover, true);
        self.timers.cancel(SliderTimer::Autoplay);
    }

    pub fn pointer_leave(&mut self) {
        if self.state.is_destroyed {
            return;
        }
        self.autoplay.hold(Hold::Hover, false);
        self.schedule_autoplay();
    }

    // ---- autoplay ----

    pub fn start_autoplay(&mut self) {
        if self.state.is_destroyed {
            return;
        }
        if self.autoplay.start() {
            self.emit(SliderEvent::AutoplayStart);
        }
        self.schedule_autoplay();
    }

    pub fn stop_autoplay(&mut self) {
        if self.state.is_destroyed {
            return;
        }
        self.timers.cancel(SliderTimer::Autoplay);
        if self.autoplay.stop() {
            self.emit(SliderEvent::AutoplayStop);
        }
    }

    fn schedule_autoplay(&mut self) {
        if self.autoplay.is_active() {
            let now = self.host.now();
            let interval = Duration::from_millis(self.config.autoplay_interval_ms);
            self.timers.schedule(SliderTimer::Autoplay, now, interval);
        }
    }

    fn run_autoplay(&mut self) {
        if !self.autoplay.is_active() {
            return;
        }
        if !self.state.loop_mode_active && self.state.current_index >= self.max_index() {
            self.go_to(0);
        } else {
            self.next();
        }
        self.schedule_autoplay();
    }

    // ---- structure ----

    /// Merge a partial config and reconcile layout, loop and autoplay
    pub fn update(&mut self, patch: &SliderConfigPatch) {
        if self.state.is_destroyed {
            return;
        }
        let previous_interval = self.config.autoplay_interval_ms;
        self.config.merge(patch);

        if !self.config.draggable && self.drag.is_some() {
            self.drag = None;
            self.state.is_dragging = false;
            self.host.set_snap_enabled(true);
            self.autoplay.hold(Hold::Drag, false);
        }

        self.relayout();

        match (self.config.autoplay, self.autoplay.is_running()) {
            (true, false) => self.start_autoplay(),
            (false, true) => self.stop_autoplay(),
            (true, true) if previous_interval != self.config.autoplay_interval_ms => {
                self.schedule_autoplay()
            }
            _ => {}
        }
    }

    /// Re-scan the host's slides after external changes
    pub fn refresh(&mut self) {
        if self.state.is_destroyed {
            return;
        }
        self.slide_count = self.host.slide_count();
        if self.slide_count == 0 {
            self.drag = None;
            self.state.is_dragging = false;
            self.timers.cancel(SliderTimer::Teleport);
            self.finish_programmatic_scroll();
        }
        self.relayout();
    }

    /// Insert slides at `at` (append when `None`) and refresh
    pub fn add(&mut self, slides: Vec<H::Slide>, at: Option<usize>) {
        if self.state.is_destroyed || slides.is_empty() {
            return;
        }
        let at = at.unwrap_or(self.slide_count).min(self.slide_count);
        self.host.insert_slides(at, slides);
        self.refresh();
    }

    /// Remove the in-range indices and refresh
    pub fn remove(&mut self, indices: &[usize]) {
        if self.state.is_destroyed {
            return;
        }
        let mut valid: Vec<usize> = indices
            .iter()
            .copied()
            .filter(|&i| i < self.slide_count)
            .collect();
        valid.sort_unstable();
        valid.dedup();
        if valid.is_empty() {
            return;
        }
        self.host.remove_slides(&valid);
        self.refresh();
    }

    /// Release every timer and listener. Later calls are no-ops.
    pub fn destroy(&mut self) {
        if self.state.is_destroyed {
            return;
        }
        self.stop_autoplay();
        if self.drag.take().is_some() {
            self.state.is_dragging = false;
            self.host.set_snap_enabled(true);
        }
        self.timers.clear();
        self.pending_target = None;
        self.state.is_programmatic_scroll = false;
        self.emit(SliderEvent::Destroy);
        self.events.clear();
        self.state.is_destroyed = true;
        info!("Slider destroyed");
    }

    // ---- layout ----

    fn ensure_measured(&mut self) {
        if self.state.slide_width_px <= 0.0 {
            self.remeasure();
        }
    }

    fn remeasure(&mut self) {
        self.viewport = self.host.viewport_size();
        self.state.slide_width_px = self.geometry().slide_visual;
    }

    /// Re-read layout, rebuild the track plan and pin the current index
    fn relayout(&mut self) {
        self.layout = LayoutConfig::read(|name| self.host.style_value(name));
        self.remeasure();
        self.rebuild_track();
        self.reposition();
        self.refresh_visibility();
    }

    fn rebuild_track(&mut self) {
        let active = self.config.loop_enabled && self.slide_count > 1;
        let sets = if active {
            clone_sets(self.layout.slides_per_view, self.slide_count)
        } else {
            0
        };

        if active != self.state.loop_mode_active {
            debug!(active, clone_sets = sets, "Loop mode changed");
        }
        self.state.loop_mode_active = active;
        self.clone_sets = sets;
        if !active {
            self.timers.cancel(SliderTimer::Teleport);
        }

        let plan = if active {
            TrackPlan::looped(self.slide_count, sets)
        } else {
            TrackPlan::plain(self.slide_count)
        };
        if plan != self.plan {
            self.plan = plan;
            self.host.render_track(&self.plan);
        }
    }

    /// Jump to the canonical position of the (normalised) current index
    fn reposition(&mut self) {
        if self.slide_count == 0 {
            self.set_index(0);
            return;
        }
        let geometry = self.geometry();
        let index = if geometry.looped {
            self.state.current_index.min(self.slide_count - 1)
        } else {
            geometry.clamp_index(self.state.current_index as isize)
        };
        self.set_index(index);

        let target = if geometry.looped {
            LoopController::new(geometry).scroll_for_index(index)
        } else {
            geometry.scroll_for_index(index)
        };
        self.finish_programmatic_scroll();
        if (target - self.position()).abs() >= SCROLL_EPSILON_PX {
            self.scroll_host(target, ScrollBehavior::Instant);
        }
    }

    fn refresh_visibility(&mut self) {
        if !self.mounted {
            return;
        }
        let visible = if self.slide_count == 0 {
            Default::default()
        } else {
            visible_indices(&self.geometry(), self.position())
        };
        let change = self.visibility.update(visible);
        for index in change.hidden {
            self.emit(SliderEvent::Hidden { index });
        }
        for index in change.shown {
            self.emit(SliderEvent::Visible { index });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Direction;
    use crate::drag::PointerKind;
    use crate::testing::RecordingHost;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn slider(count: usize, spv: &str, looped: bool) -> Slider<RecordingHost> {
        let host = RecordingHost::new(count, spv, 500.0);
        let config = SliderConfig {
            loop_enabled: looped,
            ..Default::default()
        };
        Slider::new(host, config).unwrap()
    }

    fn record(slider: &mut Slider<RecordingHost>) -> Rc<RefCell<Vec<SliderEvent>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        slider.on(EventKind::Any, move |e| sink.borrow_mut().push(*e));
        events
    }

    fn settle(slider: &mut Slider<RecordingHost>) {
        slider.on_scroll();
        slider.on_scroll_end();
    }

    #[test]
    fn test_construction_fails_fast() {
        let mut host = RecordingHost::new(3, "1", 500.0);
        host.has_track = false;
        assert!(matches!(
            Slider::new(host, SliderConfig::default()),
            Err(Error::MissingTrack)
        ));

        let host = RecordingHost::new(0, "1", 500.0);
        assert!(matches!(
            Slider::new(host, SliderConfig::default()),
            Err(Error::EmptySlides)
        ));
    }

    #[test]
    fn test_next_clamps_without_loop() {
        let mut s = slider(5, "1", false);
        s.go_to(4);
        settle(&mut s);
        s.next();
        assert_eq!(s.current_index(), 4);
        s.go_to(99);
        assert_eq!(s.current_index(), 4);
        s.go_to(-3);
        assert_eq!(s.current_index(), 0);
    }

    #[test]
    fn test_next_wraps_with_loop() {
        let mut s = slider(5, "1", true);
        assert!(s.is_loop_active());
        s.go_to(4);
        s.next();
        assert_eq!(s.current_index(), 0);
        settle(&mut s);
        assert_eq!(s.current_index(), 0);
    }

    #[test]
    fn test_loop_goto_wraps_negative() {
        let mut s = slider(5, "1", true);
        s.go_to(-1);
        assert_eq!(s.current_index(), 4);
        s.go_to(12);
        assert_eq!(s.current_index(), 2);
    }

    #[test]
    fn test_loop_goto_takes_shortest_path() {
        let mut s = slider(8, "1", true);
        let size = s.geometry().slide_size();
        for target in 0..8isize {
            for start in 0..8isize {
                s.go_to(start);
                settle(&mut s);
                let before = s.position();
                s.go_to(target);
                let travelled = ((s.position() - before) / size).abs();
                assert!(travelled <= 4.0 + 1e-9, "{start} -> {target}: {travelled}");
                settle(&mut s);
                assert_eq!(s.current_index(), target as usize);
            }
        }
    }

    #[test]
    fn test_fractional_last_slide_flush_end() {
        let mut s = slider(10, "2.5", false);
        s.go_to(9);
        let (pos, behavior) = s.host().last_scroll().unwrap();
        assert_eq!(behavior, ScrollBehavior::Smooth);
        assert_eq!(pos, s.geometry().track_scroll_size() - 500.0);
        settle(&mut s);
        assert_eq!(s.current_index(), 9);
    }

    #[test]
    fn test_fractional_track_shorter_than_viewport() {
        // two 200px slides in a 500px viewport: nothing to scroll
        let mut s = slider(2, "2.5", false);
        let events = record(&mut s);
        assert_eq!(s.max_index(), 0);

        s.go_to(1);
        settle(&mut s);
        assert_eq!(s.current_index(), 0);
        assert!(!events
            .borrow()
            .iter()
            .any(|e| matches!(e, SliderEvent::SlideChange { .. })));
    }

    #[test]
    fn test_destroy_makes_everything_inert() {
        let mut s = slider(5, "1", false);
        let events = record(&mut s);
        s.go_to(2);
        s.destroy();
        let state = s.state().clone();
        let scrolls = s.host().scrolls.len();
        events.borrow_mut().clear();

        s.next();
        s.prev();
        s.go_to(4);
        s.update(&SliderConfigPatch::default().loop_enabled(true));
        s.refresh();
        s.remove(&[0]);
        s.add(vec!["late".to_string()], None);
        s.on_scroll();
        s.on_resize();
        s.tick();
        assert!(!s.pointer_down(PointerDown::mouse(0.0, 0.0)));
        s.destroy();

        assert_eq!(*s.state(), state);
        assert!(state.is_destroyed);
        assert_eq!(s.host().scrolls.len(), scrolls);
        assert!(events.borrow().is_empty());
        assert_eq!(s.next_deadline(), None);
    }

    #[test]
    fn test_destroy_emits_once() {
        let mut s = slider(3, "1", false);
        let events = record(&mut s);
        s.destroy();
        s.destroy();
        assert_eq!(*events.borrow(), vec![SliderEvent::Destroy]);
    }

    #[test]
    fn test_programmatic_echo_does_not_change_index() {
        let mut s = slider(5, "1", false);
        let events = record(&mut s);
        s.go_to(3);
        // simulate an intermediate echo of the smooth scroll
        s.host_mut().position = 600.0;
        s.on_scroll();
        assert_eq!(s.current_index(), 3);
        s.host_mut().position = 1500.0;
        s.on_scroll_end();
        assert_eq!(s.current_index(), 3);
        assert!(!s.state().is_programmatic_scroll);
        let changes: Vec<_> = events
            .borrow()
            .iter()
            .filter(|e| e.kind() == EventKind::SlideChange)
            .copied()
            .collect();
        assert_eq!(
            changes,
            vec![SliderEvent::SlideChange {
                index: 3,
                previous: 0
            }]
        );
    }

    #[test]
    fn test_programmatic_fallback_timer() {
        let mut s = slider(5, "1", false);
        s.go_to(2);
        assert!(s.state().is_programmatic_scroll);
        s.host().clock.advance(1300);
        s.tick();
        assert!(!s.state().is_programmatic_scroll);
    }

    #[test]
    fn test_user_scroll_updates_index() {
        let mut s = slider(5, "1", false);
        s.host_mut().position = 1010.0;
        s.on_scroll();
        assert_eq!(s.current_index(), 2);
    }

    #[test]
    fn test_teleport_after_delay() {
        let mut s = slider(5, "1", true);
        let controller = LoopController::new(s.geometry());
        // user scrolled natively into the trailing clones
        s.host_mut().position = controller.scroll_for_index(1) + controller.section_size();
        s.on_scroll();
        assert_eq!(s.current_index(), 1);
        s.host().clock.advance(50);
        s.tick();
        assert_eq!(s.host().position, controller.scroll_for_index(1) + controller.section_size());

        s.host().clock.advance(100);
        s.tick();
        let (pos, behavior) = s.host().last_scroll().unwrap();
        assert_eq!(behavior, ScrollBehavior::Instant);
        assert!((pos - controller.scroll_for_index(1)).abs() < 1e-6);
        assert_eq!(s.current_index(), 1);
    }

    #[test]
    fn test_teleport_waits_for_programmatic_scroll() {
        let mut s = slider(5, "1", true);
        let controller = LoopController::new(s.geometry());
        // shortest path to slide 4 goes backwards into the leading clones
        s.go_to(4);
        let in_flight = s.host().position;
        assert!(controller.teleport_target(in_flight).is_some());
        s.on_scroll();
        s.host().clock.advance(200);
        s.tick();
        assert!(s.state().is_programmatic_scroll);
        assert_eq!(s.host().position, in_flight);

        s.on_scroll_end();
        s.host().clock.advance(200);
        s.tick();
        assert!((s.host().position - controller.scroll_for_index(4)).abs() < 1e-6);
        assert_eq!(s.current_index(), 4);
    }

    #[test]
    fn test_loop_track_plan_rendered() {
        let s = slider(4, "1", true);
        assert_eq!(s.host().plan.len(), 4 * 7);
        assert_eq!(s.host().plan.real_count(), 4);
        let plain = slider(4, "1", false);
        assert_eq!(plain.host().plan.len(), 4);
    }

    #[test]
    fn test_single_slide_never_loops() {
        let s = slider(1, "1", true);
        assert!(!s.is_loop_active());
    }

    #[test]
    fn test_update_toggles_loop_preserving_index() {
        let mut s = slider(6, "1", false);
        s.go_to(3);
        settle(&mut s);
        s.update(&SliderConfigPatch::default().loop_enabled(true));
        assert!(s.is_loop_active());
        assert_eq!(s.current_index(), 3);
        let controller = LoopController::new(s.geometry());
        assert!((s.position() - controller.scroll_for_index(3)).abs() < 1e-6);

        s.update(&SliderConfigPatch::default().loop_enabled(false));
        assert!(!s.is_loop_active());
        assert_eq!(s.current_index(), 3);
        assert_eq!(s.position(), 1500.0);
    }

    #[test]
    fn test_update_rereads_layout() {
        let mut s = slider(6, "1", false);
        s.host_mut()
            .styles
            .insert("slides-per-view".to_string(), "2".to_string());
        s.update(&SliderConfigPatch::default());
        assert_eq!(s.layout().slides_per_view, 2.0);
        assert_eq!(s.max_index(), 4);
    }

    #[test]
    fn test_malformed_layout_falls_back() {
        let mut host = RecordingHost::new(4, "lots", 500.0);
        host.styles.insert("gap".to_string(), "wide".to_string());
        let s = Slider::new(host, SliderConfig::default()).unwrap();
        assert_eq!(*s.layout(), LayoutConfig::default());
    }

    #[test]
    fn test_resize_settles_once() {
        let mut s = slider(4, "1", false);
        let events = record(&mut s);
        s.go_to(2);
        settle(&mut s);
        events.borrow_mut().clear();

        s.host_mut().viewport = 400.0;
        s.on_resize();
        s.host().clock.advance(100);
        s.on_resize();
        s.host().clock.advance(100);
        s.tick();
        assert_eq!(*events.borrow(), vec![SliderEvent::Resize]);

        s.host().clock.advance(100);
        s.tick();
        assert_eq!(s.state().slide_width_px, 400.0);
        assert_eq!(s.position(), 800.0);
        assert_eq!(events.borrow().last(), Some(&SliderEvent::Resized));
    }

    #[test]
    fn test_remove_clamps_index() {
        let mut s = slider(5, "1", false);
        s.go_to(4);
        settle(&mut s);
        s.remove(&[4, 3, 3, 42]);
        assert_eq!(s.slide_count(), 3);
        assert_eq!(s.current_index(), 2);
        assert_eq!(s.host().slides, vec!["slide 0", "slide 1", "slide 2"]);
    }

    #[test]
    fn test_add_inserts_and_refreshes() {
        let mut s = slider(2, "1", false);
        s.add(vec!["new".to_string()], Some(1));
        assert_eq!(s.slide_count(), 3);
        assert_eq!(s.host().slides[1], "new");
        s.add(vec!["tail".to_string()], Some(99));
        assert_eq!(s.host().slides.last().map(String::as_str), Some("tail"));
    }

    #[test]
    fn test_remove_all_keeps_instance_alive() {
        let mut s = slider(2, "1", false);
        s.remove(&[0, 1]);
        assert_eq!(s.slide_count(), 0);
        s.next();
        s.go_to(3);
        assert_eq!(s.current_index(), 0);
        s.add(vec!["back".to_string()], None);
        assert_eq!(s.slide_count(), 1);
    }

    #[test]
    fn test_drag_lands_on_projected_slide() {
        let mut s = slider(5, "1", false);
        let events = record(&mut s);
        let clock = s.host().clock.clone();

        assert!(s.pointer_down(PointerDown::mouse(400.0, 0.0)));
        assert!(s.state().is_dragging);
        assert!(!s.host().snap);
        for step in 1..=5 {
            clock.advance(10);
            s.pointer_move(400.0 - step as f64 * 40.0, 0.0);
        }
        // coalesced: a single frame request until flushed
        assert_eq!(s.host().frames_requested, 1);
        s.animation_frame();
        assert_eq!(s.host().position, 200.0);
        s.on_scroll();

        s.pointer_up();
        assert!(!s.state().is_dragging);
        assert!(s.host().snap);
        // 4 px/ms sustained, projected well past slide 1
        assert!(s.current_index() >= 1);
        let (pos, behavior) = s.host().last_scroll().unwrap();
        assert_eq!(behavior, ScrollBehavior::Smooth);
        assert_eq!(pos, s.current_index() as f64 * 500.0);

        let evs = events.borrow();
        assert_eq!(evs.first(), Some(&SliderEvent::DragStart { index: 0 }));
        assert_eq!(
            evs.last(),
            Some(&SliderEvent::DragEnd {
                start_index: 0,
                index: s.current_index()
            })
        );
    }

    #[test]
    fn test_drag_end_emitted_without_change() {
        let mut s = slider(5, "1", false);
        let events = record(&mut s);
        assert!(s.pointer_down(PointerDown::mouse(100.0, 0.0)));
        s.pointer_up();
        assert_eq!(
            *events.borrow(),
            vec![
                SliderEvent::DragStart { index: 0 },
                SliderEvent::DragEnd {
                    start_index: 0,
                    index: 0
                }
            ]
        );
    }

    #[test]
    fn test_drag_landing_always_in_range() {
        for looped in [false, true] {
            for spv in ["1", "2", "2.5"] {
                for velocity_px in [-1e12, -5000.0, -40.0, 0.0, 40.0, 5000.0, 1e12] {
                    let mut s = slider(6, spv, looped);
                    let clock = s.host().clock.clone();
                    s.go_to(2);
                    settle(&mut s);
                    assert!(s.pointer_down(PointerDown::mouse(0.0, 0.0)));
                    clock.advance(1);
                    s.pointer_move(-velocity_px, 0.0);
                    s.animation_frame();
                    s.pointer_up();
                    let index = s.current_index();
                    if looped {
                        assert!(index < 6);
                    } else {
                        assert!(index <= s.max_index());
                    }
                    assert!(s.host().position.is_finite());
                }
            }
        }
    }

    #[test]
    fn test_stale_release_does_not_flick() {
        let mut s = slider(5, "1", false);
        let clock = s.host().clock.clone();
        assert!(s.pointer_down(PointerDown::mouse(0.0, 0.0)));
        clock.advance(10);
        s.pointer_move(-100.0, 0.0);
        s.animation_frame();
        // pointer held still for a long time before release
        clock.advance(500);
        s.pointer_up();
        assert_eq!(s.current_index(), 0);
    }

    #[test]
    fn test_drag_suppressed() {
        let mut s = slider(5, "1", false);
        let touch = PointerDown {
            kind: PointerKind::Touch,
            ..PointerDown::mouse(0.0, 0.0)
        };
        assert!(!s.pointer_down(touch));
        let excluded = PointerDown {
            excluded: true,
            ..PointerDown::mouse(0.0, 0.0)
        };
        assert!(!s.pointer_down(excluded));

        s.update(&SliderConfigPatch::default().draggable(false));
        assert!(!s.pointer_down(PointerDown::mouse(0.0, 0.0)));
    }

    #[test]
    fn test_loop_drag_wraps_backwards() {
        let mut s = slider(5, "1", true);
        let clock = s.host().clock.clone();
        assert!(s.pointer_down(PointerDown::mouse(0.0, 0.0)));
        clock.advance(16);
        // drag content to the right, revealing the clone before slide 0
        s.pointer_move(500.0, 0.0);
        s.animation_frame();
        clock.advance(300);
        s.pointer_up();
        assert_eq!(s.current_index(), 4);
    }

    #[test]
    fn test_end_to_start_direction() {
        let host = RecordingHost::new(5, "1", 500.0);
        let config = SliderConfig {
            direction: Direction::EndToStart,
            ..Default::default()
        };
        let mut s = Slider::new(host, config).unwrap();
        s.go_to(2);
        assert_eq!(s.host().position, -1000.0);
        settle(&mut s);
        assert_eq!(s.current_index(), 2);
    }

    #[test]
    fn test_autoplay_advances_and_rewinds() {
        let host = RecordingHost::new(3, "1", 500.0);
        let config = SliderConfig {
            autoplay: true,
            autoplay_interval_ms: 1000,
            ..Default::default()
        };
        let mut s = Slider::new(host, config).unwrap();
        let events = record(&mut s);
        s.mount();
        assert!(s.is_autoplaying());

        for expected in [1, 2, 0] {
            s.host().clock.advance(1000);
            s.tick();
            settle(&mut s);
            assert_eq!(s.current_index(), expected);
        }
        s.stop_autoplay();
        s.host().clock.advance(5000);
        s.tick();
        assert_eq!(s.current_index(), 0);

        let evs = events.borrow();
        assert!(evs.contains(&SliderEvent::AutoplayStart));
        assert!(evs.contains(&SliderEvent::AutoplayStop));
    }

    #[test]
    fn test_autoplay_holds_on_hover() {
        let mut s = slider(4, "1", false);
        s.start_autoplay();
        s.pointer_enter();
        s.host().clock.advance(10_000);
        s.tick();
        assert_eq!(s.current_index(), 0);
        s.pointer_leave();
        s.host().clock.advance(3000);
        s.tick();
        assert_eq!(s.current_index(), 1);
    }

    #[test]
    fn test_mount_emits_ready_and_visibility() {
        let mut s = slider(4, "2", false);
        let events = record(&mut s);
        s.mount();
        s.mount();
        assert_eq!(
            *events.borrow(),
            vec![
                SliderEvent::Ready { index: 0 },
                SliderEvent::Visible { index: 0 },
                SliderEvent::Visible { index: 1 },
            ]
        );
        events.borrow_mut().clear();
        s.host_mut().position = 500.0;
        s.on_scroll();
        assert!(events.borrow().contains(&SliderEvent::Hidden { index: 0 }));
        assert!(events.borrow().contains(&SliderEvent::Visible { index: 2 }));
    }

    #[test]
    fn test_pagination_and_navigation() {
        let host = RecordingHost::new(10, "1", 500.0);
        let config = SliderConfig {
            max_dots: Some(5),
            ..Default::default()
        };
        let mut s = Slider::new(host, config).unwrap();
        s.go_to(9);
        let pagination = s.pagination();
        assert_eq!(pagination.page_count, 10);
        assert_eq!(pagination.dots.len(), 5);
        assert_eq!(pagination.active_page(), Some(9));
        assert!(s.navigation().next_disabled);
        assert!(!s.navigation().prev_disabled);
    }

    #[test]
    fn test_off_detaches_listener() {
        let mut s = slider(4, "1", false);
        let count = Rc::new(RefCell::new(0));
        let sink = count.clone();
        let id = s.on(EventKind::SlideChange, move |_| *sink.borrow_mut() += 1);
        s.go_to(1);
        assert!(s.off(id));
        s.go_to(2);
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn test_reveal_picks_nearest_loop_copy() {
        let mut s = slider(4, "1", true);
        let controller = LoopController::new(s.geometry());
        // sit on slide 3
        s.go_to(3);
        settle(&mut s);
        let before = s.position();
        s.reveal(0);
        // one slide forward beats three back
        assert!((s.position() - before - controller.geometry().slide_size()).abs() < 1e-6);
    }
}
