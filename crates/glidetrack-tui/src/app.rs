use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::Arc;

use anyhow::Result;
use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Constraint, Direction as Axis, Layout, Position, Rect};
use ratatui::widgets::{Block, Borders};
use tracing::{debug, info};

use glidetrack_core::config::LayoutStyles;
use glidetrack_core::layout::STYLE_SLIDES_PER_VIEW;
use glidetrack_core::{
    AppConfig, EventKind, PointerDown, Slider, SliderConfig, SliderConfigPatch, ThumbnailSync,
};

use crate::host::{drive, SlideCard, TerminalTrack, CELL_HEIGHT_PX, CELL_WIDTH_PX};
use crate::input::Action;
use crate::theme::Theme;
use crate::widgets::{PaginationHit, PaginationWidget};

/// Slides-per-view values cycled through from the keyboard
const SLIDES_PER_VIEW_CHOICES: [&str; 4] = ["1", "2", "2.5", "3"];

const EVENT_LOG_CAPACITY: usize = 64;

/// Most recent slider events, newest last
#[derive(Debug, Default)]
pub struct EventLog {
    lines: VecDeque<String>,
}

impl EventLog {
    pub fn push(&mut self, line: String) {
        if self.lines.len() == EVENT_LOG_CAPACITY {
            self.lines.pop_front();
        }
        self.lines.push_back(line);
    }

    pub fn lines(&self) -> impl DoubleEndedIterator<Item = &String> {
        self.lines.iter()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

/// Screen regions from the last layout pass
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutAreas {
    pub track: Rect,
    pub track_inner: Rect,
    pub thumbs: Option<Rect>,
    pub thumbs_inner: Option<Rect>,
    pub pagination: Rect,
    pub events: Rect,
    pub status: Rect,
}

impl LayoutAreas {
    pub fn split(area: Rect, with_thumbs: bool) -> Self {
        let thumbs_height = if with_thumbs { 5 } else { 0 };
        let rows = Layout::default()
            .direction(Axis::Vertical)
            .constraints([
                Constraint::Min(6),
                Constraint::Length(thumbs_height),
                Constraint::Length(1),
                Constraint::Length(7),
                Constraint::Length(1),
            ])
            .split(area);

        let bordered = Block::default().borders(Borders::ALL);
        let thumbs = with_thumbs.then_some(rows[1]);
        Self {
            track: rows[0],
            track_inner: bordered.inner(rows[0]),
            thumbs,
            thumbs_inner: thumbs.map(|r| bordered.inner(r)),
            pagination: rows[2],
            events: rows[3],
            status: rows[4],
        }
    }
}

/// Main-axis length of `area` in cells
fn axis_cells(area: Rect, vertical: bool) -> u16 {
    if vertical {
        area.height
    } else {
        area.width
    }
}

fn contains(area: Rect, column: u16, row: u16) -> bool {
    area.contains(Position::new(column, row))
}

pub struct App {
    pub config: Arc<AppConfig>,
    pub theme: Theme,
    pub primary: Slider<TerminalTrack>,
    pub thumbs: Option<Slider<TerminalTrack>>,
    pub sync: Option<ThumbnailSync>,
    pub event_log: Rc<RefCell<EventLog>>,
    pub areas: LayoutAreas,
    pub should_quit: bool,
    pub status_message: Option<String>,
    pointer_captured: bool,
    hovering: bool,
    next_slide_id: usize,
    slides_per_view_choice: usize,
}

impl App {
    /// Build the primary slider and, when enabled, its thumbnail rail
    pub fn new(config: Arc<AppConfig>, area: Rect, theme: Theme) -> Result<Self> {
        let areas = LayoutAreas::split(area, config.thumbnails.enabled);
        let vertical = config.slider.direction.is_vertical();
        let slides: Vec<SlideCard> = (0..config.ui.slide_count).map(SlideCard::new).collect();

        let host = TerminalTrack::new(
            slides.clone(),
            config.slider.direction,
            &config.layout,
            config.ui.scroll.clone(),
        )
        .with_viewport_cells(axis_cells(areas.track_inner, vertical));
        let mut primary = Slider::new(host, config.slider.clone())?;

        let event_log = Rc::new(RefCell::new(EventLog::default()));
        let sink = event_log.clone();
        primary.on(EventKind::Any, move |event| {
            sink.borrow_mut().push(format!("{event:?}"));
        });

        let mut thumbs = match areas.thumbs_inner {
            Some(inner) => {
                let styles = LayoutStyles {
                    slides_per_view: config.thumbnails.slides_per_view.clone(),
                    gap: config.thumbnails.gap.clone(),
                    ..Default::default()
                };
                let host = TerminalTrack::new(
                    slides,
                    config.slider.direction,
                    &styles,
                    config.ui.scroll.clone(),
                )
                .with_viewport_cells(axis_cells(inner, vertical));
                let rail = SliderConfig {
                    direction: config.slider.direction,
                    ..Default::default()
                };
                Some(Slider::new(host, rail)?)
            }
            None => None,
        };

        primary.mount();
        let sync = thumbs.as_mut().map(|rail| {
            rail.mount();
            ThumbnailSync::bind(&mut primary, rail, config.thumbnails.loop_override)
        });

        let slides_per_view_choice = SLIDES_PER_VIEW_CHOICES
            .iter()
            .position(|v| *v == config.layout.slides_per_view.trim())
            .unwrap_or(0);

        info!(slides = primary.slide_count(), "Carousel started");
        Ok(Self {
            next_slide_id: config.ui.slide_count,
            config,
            theme,
            primary,
            thumbs,
            sync,
            event_log,
            areas,
            should_quit: false,
            status_message: None,
            pointer_captured: false,
            hovering: false,
            slides_per_view_choice,
        })
    }

    /// Recompute screen regions; viewport changes reach the sliders as resizes
    pub fn resize(&mut self, area: Rect) {
        self.areas = LayoutAreas::split(area, self.thumbs.is_some());
        let vertical = self.primary.config().direction.is_vertical();

        let cells = axis_cells(self.areas.track_inner, vertical);
        if self.primary.host_mut().set_viewport_cells(cells) {
            self.primary.on_resize();
        }
        if let (Some(rail), Some(inner)) = (self.thumbs.as_mut(), self.areas.thumbs_inner) {
            if rail.host_mut().set_viewport_cells(axis_cells(inner, vertical)) {
                rail.on_resize();
            }
        }
    }

    /// One frame of host scrolling, engine timers and thumbnail sync
    pub fn tick(&mut self) {
        drive(&mut self.primary);
        if let Some(rail) = self.thumbs.as_mut() {
            drive(rail);
            if let Some(sync) = self.sync.as_mut() {
                sync.tick(&self.primary, rail);
            }
        }
    }

    /// Whether the next frame should come at animation rate
    pub fn needs_fast_update(&self) -> bool {
        let busy = |s: &Slider<TerminalTrack>| {
            s.host().is_scrolling() || s.state().is_dragging || s.state().is_programmatic_scroll
        };
        busy(&self.primary)
            || self.thumbs.as_ref().is_some_and(busy)
            || self.sync.as_ref().is_some_and(|s| s.next_deadline().is_some())
    }

    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::Next => self.primary.next(),
            Action::Prev => self.primary.prev(),
            Action::First => self.primary.go_to(0),
            Action::Last => {
                let last = self.primary.slide_count() as isize - 1;
                self.primary.go_to(last);
            }
            Action::GoTo(index) => self.primary.go_to(index as isize),
            Action::ToggleLoop => {
                let enabled = !self.primary.config().loop_enabled;
                self.primary
                    .update(&SliderConfigPatch::default().loop_enabled(enabled));
                self.rebind_thumbnails();
                self.set_status(format!("Loop {}", on_off(enabled)));
            }
            Action::ToggleAutoplay => {
                if self.primary.is_autoplaying() {
                    self.primary.stop_autoplay();
                } else {
                    self.primary.start_autoplay();
                }
            }
            Action::ToggleDraggable => {
                let enabled = !self.primary.config().draggable;
                self.primary
                    .update(&SliderConfigPatch::default().draggable(enabled));
                self.set_status(format!("Drag {}", on_off(enabled)));
            }
            Action::CycleSlidesPerView => {
                self.slides_per_view_choice =
                    (self.slides_per_view_choice + 1) % SLIDES_PER_VIEW_CHOICES.len();
                let value = SLIDES_PER_VIEW_CHOICES[self.slides_per_view_choice];
                self.primary
                    .host_mut()
                    .set_style(STYLE_SLIDES_PER_VIEW, value);
                self.primary.update(&SliderConfigPatch::default());
                self.set_status(format!("Slides per view: {value}"));
            }
            Action::AddSlide => self.add_slide(),
            Action::RemoveSlide => self.remove_current_slide(),
            Action::Refresh => {
                self.primary.refresh();
                if let Some(rail) = self.thumbs.as_mut() {
                    rail.refresh();
                }
            }
            Action::Destroy => self.destroy(),
            Action::ClearLog => self.event_log.borrow_mut().clear(),
            Action::None => {}
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        let (column, row) = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => self.mouse_down(column, row),
            MouseEventKind::Drag(MouseButton::Left) if self.pointer_captured => {
                let (x, y) = self.track_point(column, row);
                self.primary.pointer_move(x, y);
            }
            MouseEventKind::Up(MouseButton::Left) if self.pointer_captured => {
                self.pointer_captured = false;
                self.primary.pointer_up();
            }
            MouseEventKind::Moved => {
                let inside = contains(self.areas.track_inner, column, row);
                if inside != self.hovering {
                    self.hovering = inside;
                    if inside {
                        self.primary.pointer_enter();
                    } else {
                        self.primary.pointer_leave();
                    }
                }
            }
            MouseEventKind::ScrollDown | MouseEventKind::ScrollUp
                if contains(self.areas.track_inner, column, row) =>
            {
                let step = 3.0 * self.primary.host().cell_px();
                let delta = if mouse.kind == MouseEventKind::ScrollDown {
                    step
                } else {
                    -step
                };
                self.primary.host_mut().scroll_by(delta);
            }
            _ => {}
        }
    }

    fn mouse_down(&mut self, column: u16, row: u16) {
        let pagination = self.primary.pagination();
        let navigation = self.primary.navigation();
        if let Some(hit) =
            PaginationWidget::hit_test(self.areas.pagination, &pagination, column, row)
        {
            match hit {
                PaginationHit::Prev if !navigation.prev_disabled => self.primary.prev(),
                PaginationHit::Next if !navigation.next_disabled => self.primary.next(),
                PaginationHit::Page(page) => self.primary.go_to(page as isize),
                _ => {}
            }
            return;
        }

        if let Some(inner) = self.areas.thumbs_inner {
            if contains(inner, column, row) {
                self.click_thumbnail(inner, column, row);
                return;
            }
        }

        if contains(self.areas.track_inner, column, row) {
            let (x, y) = self.track_point(column, row);
            self.pointer_captured = self.primary.pointer_down(PointerDown::mouse(x, y));
        }
    }

    fn click_thumbnail(&mut self, inner: Rect, column: u16, row: u16) {
        let (Some(rail), Some(sync)) = (self.thumbs.as_mut(), self.sync.as_mut()) else {
            return;
        };
        let offset = if rail.config().direction.is_vertical() {
            (row - inner.y) as f64 * CELL_HEIGHT_PX
        } else {
            (column - inner.x) as f64 * CELL_WIDTH_PX
        };
        if let Some(node) = rail.host().node_at(offset) {
            sync.on_thumbnail_click(node.source, &mut self.primary, rail);
        }
    }

    /// Track-relative pointer coordinates in virtual pixels
    fn track_point(&self, column: u16, row: u16) -> (f64, f64) {
        let inner = self.areas.track_inner;
        (
            column.saturating_sub(inner.x) as f64 * CELL_WIDTH_PX,
            row.saturating_sub(inner.y) as f64 * CELL_HEIGHT_PX,
        )
    }

    fn rebind_thumbnails(&mut self) {
        let (Some(rail), Some(sync)) = (self.thumbs.as_mut(), self.sync.take()) else {
            return;
        };
        sync.unbind(&mut self.primary, rail);
        self.sync = Some(ThumbnailSync::bind(
            &mut self.primary,
            rail,
            self.config.thumbnails.loop_override,
        ));
    }

    fn add_slide(&mut self) {
        let card = SlideCard::new(self.next_slide_id);
        self.next_slide_id += 1;
        let at = if self.primary.slide_count() == 0 {
            0
        } else {
            self.primary.current_index() + 1
        };
        debug!(id = card.id, at, "Adding slide");
        if let Some(rail) = self.thumbs.as_mut() {
            rail.add(vec![card.clone()], Some(at));
        }
        self.primary.add(vec![card], Some(at));
        if self.sync.as_ref().is_some_and(|s| !s.is_bound()) {
            self.rebind_thumbnails_fresh();
        }
    }

    fn remove_current_slide(&mut self) {
        if self.primary.slide_count() == 0 {
            self.set_status("No slides left".to_string());
            return;
        }
        let index = self.primary.current_index();
        if let Some(rail) = self.thumbs.as_mut() {
            rail.remove(&[index]);
        }
        self.primary.remove(&[index]);
    }

    /// Bind a rail that was empty when first bound
    fn rebind_thumbnails_fresh(&mut self) {
        if let Some(rail) = self.thumbs.as_mut() {
            self.sync = Some(ThumbnailSync::bind(
                &mut self.primary,
                rail,
                self.config.thumbnails.loop_override,
            ));
        }
    }

    fn destroy(&mut self) {
        if let (Some(rail), Some(sync)) = (self.thumbs.as_mut(), self.sync.take()) {
            sync.unbind(&mut self.primary, rail);
        }
        self.primary.destroy();
        if let Some(rail) = self.thumbs.as_mut() {
            rail.destroy();
        }
        self.pointer_captured = false;
        self.set_status("Slider destroyed; press q to quit".to_string());
    }

    pub fn set_status(&mut self, message: String) {
        self.status_message = Some(message);
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "on"
    } else {
        "off"
    }
}
