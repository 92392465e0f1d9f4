use std::cell::RefCell;
use std::io::{self, Write};
use std::path::Path;
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use glidetrack_core::config::{LayoutStyles, ThumbnailConfig};
use glidetrack_core::{
    EventKind, PointerDown, ScrollConfig, Slider, SliderConfig, SliderConfigPatch, SliderEvent,
    ThumbnailSync,
};
use glidetrack_tui::{drive, ManualClock, SlideCard, TerminalTrack};

const FRAME_MS: u64 = 16;
/// Frames run after the last step so pending scrolls and timers finish
const SETTLE_MS: u64 = 1500;

const DEMO_SCRIPT: &str = r#"
slides = 5
viewport_cells = 80
thumbnails = true

[slider]
loop = true

[[step]]
op = "next"

[[step]]
op = "wait"
ms = 400

[[step]]
op = "prev"

[[step]]
op = "prev"

[[step]]
op = "wait"
ms = 400

[[step]]
op = "drag"
distance = 900.0
duration_ms = 120

[[step]]
op = "wait"
ms = 600

[[step]]
op = "click_thumbnail"
index = 2

[[step]]
op = "wait"
ms = 600

[[step]]
op = "resize"
cells = 60

[[step]]
op = "wait"
ms = 300

[[step]]
op = "update"
patch = { per_move = 2 }

[[step]]
op = "next"

[[step]]
op = "wait"
ms = 400

[[step]]
op = "autoplay"
enabled = true

[[step]]
op = "wait"
ms = 3200

[[step]]
op = "autoplay"
enabled = false

[[step]]
op = "remove"
indices = [0]

[[step]]
op = "add"
count = 2

[[step]]
op = "wait"
ms = 400

[[step]]
op = "destroy"
"#;

/// A scripted scenario
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Script {
    #[serde(default = "default_slides")]
    pub slides: usize,
    /// Track length along the main axis, in terminal cells
    #[serde(default = "default_viewport_cells")]
    pub viewport_cells: u16,
    /// Bind a thumbnail rail to the primary slider
    #[serde(default)]
    pub thumbnails: bool,
    #[serde(default)]
    pub slider: SliderConfig,
    #[serde(default)]
    pub layout: LayoutStyles,
    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

impl Script {
    pub fn demo() -> Result<Self> {
        Self::parse(DEMO_SCRIPT)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let mut script: Self = toml::from_str(content).context("Invalid simulation script")?;
        script.slider.normalize();
        Ok(script)
    }
}

fn default_slides() -> usize {
    5
}

fn default_viewport_cells() -> u16 {
    80
}

fn default_drag_ms() -> u64 {
    120
}

fn default_add_count() -> usize {
    1
}

/// One scripted action, tagged by `op`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Next,
    Prev,
    GoTo {
        index: isize,
    },
    /// Let frames run for `ms` milliseconds
    Wait {
        ms: u64,
    },
    /// Swipe toward later slides by `distance` pixels (negative swipes back)
    Drag {
        distance: f64,
        #[serde(default = "default_drag_ms")]
        duration_ms: u64,
    },
    Resize {
        cells: u16,
    },
    Update {
        patch: SliderConfigPatch,
    },
    /// Change a host style variable and refresh
    Style {
        name: String,
        value: String,
    },
    Add {
        #[serde(default = "default_add_count")]
        count: usize,
        #[serde(default)]
        at: Option<usize>,
    },
    Remove {
        indices: Vec<usize>,
    },
    Refresh,
    Autoplay {
        enabled: bool,
    },
    Hover {
        inside: bool,
    },
    ClickThumbnail {
        index: usize,
    },
    Destroy,
}

/// One emitted event, stamped with simulated time
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventRecord {
    pub t_ms: u64,
    pub slider: &'static str,
    #[serde(flatten)]
    pub event: SliderEvent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub final_index: usize,
    pub slide_count: usize,
    pub events: usize,
    pub elapsed_ms: u64,
}

pub async fn run(script_path: Option<&Path>, slides: Option<usize>, loop_enabled: bool) -> Result<()> {
    let mut script = match script_path {
        Some(path) => {
            let content = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            Script::parse(&content)?
        }
        None => Script::demo()?,
    };
    if let Some(count) = slides {
        script.slides = count;
    }
    script.slider.loop_enabled |= loop_enabled;

    let stdout = io::stdout();
    let summary = run_script(&script, &mut stdout.lock())?;
    info!(
        final_index = summary.final_index,
        slides = summary.slide_count,
        events = summary.events,
        elapsed_ms = summary.elapsed_ms,
        "Simulation finished"
    );
    Ok(())
}

/// Play `script` against terminal-hosted sliders on a manual clock,
/// writing each event to `out` as a JSON line.
pub fn run_script(script: &Script, out: &mut impl Write) -> Result<Summary> {
    let mut sim = Simulator::new(script)?;
    let mut written = 0;
    written += sim.flush(out)?;

    for step in &script.steps {
        debug!(?step, "Applying step");
        sim.apply(step);
        written += sim.flush(out)?;
    }
    sim.wait(SETTLE_MS);
    written += sim.flush(out)?;

    Ok(Summary {
        final_index: sim.primary.current_index(),
        slide_count: sim.primary.slide_count(),
        events: written,
        elapsed_ms: sim.elapsed_ms(),
    })
}

struct Simulator {
    clock: ManualClock,
    start: Instant,
    primary: Slider<TerminalTrack>,
    thumbs: Option<Slider<TerminalTrack>>,
    sync: Option<ThumbnailSync>,
    records: Rc<RefCell<Vec<EventRecord>>>,
    next_slide_id: usize,
}

impl Simulator {
    fn new(script: &Script) -> Result<Self> {
        let clock = ManualClock::new();
        let start = clock.now();
        let records = Rc::new(RefCell::new(Vec::new()));
        let direction = script.slider.direction;
        let cards: Vec<SlideCard> = (0..script.slides).map(SlideCard::new).collect();

        let host = TerminalTrack::new(
            cards.clone(),
            direction,
            &script.layout,
            ScrollConfig::default(),
        )
        .with_clock(clock.clone())
        .with_viewport_cells(script.viewport_cells);
        let mut primary = Slider::new(host, script.slider.clone())?;
        record_events(&mut primary, "primary", &clock, start, &records);

        let mut thumbs = if script.thumbnails {
            let defaults = ThumbnailConfig::default();
            let styles = LayoutStyles {
                slides_per_view: defaults.slides_per_view,
                gap: defaults.gap,
                ..Default::default()
            };
            let host = TerminalTrack::new(cards, direction, &styles, ScrollConfig::default())
                .with_clock(clock.clone())
                .with_viewport_cells(script.viewport_cells);
            let rail = SliderConfig {
                direction,
                ..Default::default()
            };
            let mut rail = Slider::new(host, rail)?;
            record_events(&mut rail, "thumbs", &clock, start, &records);
            Some(rail)
        } else {
            None
        };

        primary.mount();
        let sync = thumbs.as_mut().map(|rail| {
            rail.mount();
            ThumbnailSync::bind(&mut primary, rail, None)
        });

        Ok(Self {
            clock,
            start,
            primary,
            thumbs,
            sync,
            records,
            next_slide_id: script.slides,
        })
    }

    fn elapsed_ms(&self) -> u64 {
        self.clock.now().duration_since(self.start).as_millis() as u64
    }

    fn frame(&mut self) {
        self.clock.advance(Duration::from_millis(FRAME_MS));
        drive(&mut self.primary);
        if let Some(rail) = self.thumbs.as_mut() {
            drive(rail);
            if let Some(sync) = self.sync.as_mut() {
                sync.tick(&self.primary, rail);
            }
        }
    }

    fn wait(&mut self, ms: u64) {
        for _ in 0..ms.div_ceil(FRAME_MS) {
            self.frame();
        }
    }

    fn apply(&mut self, step: &Step) {
        match step {
            Step::Next => self.primary.next(),
            Step::Prev => self.primary.prev(),
            Step::GoTo { index } => self.primary.go_to(*index),
            Step::Wait { ms } => self.wait(*ms),
            Step::Drag {
                distance,
                duration_ms,
            } => self.drag(*distance, *duration_ms),
            Step::Resize { cells } => {
                if self.primary.host_mut().set_viewport_cells(*cells) {
                    self.primary.on_resize();
                }
                if let Some(rail) = self.thumbs.as_mut() {
                    if rail.host_mut().set_viewport_cells(*cells) {
                        rail.on_resize();
                    }
                }
            }
            Step::Update { patch } => {
                self.primary.update(patch);
                if patch.loop_enabled.is_some() {
                    self.rebind_thumbnails();
                }
            }
            Step::Style { name, value } => {
                self.primary.host_mut().set_style(name, value.clone());
                self.primary.refresh();
            }
            Step::Add { count, at } => self.add(*count, *at),
            Step::Remove { indices } => {
                if let Some(rail) = self.thumbs.as_mut() {
                    rail.remove(indices);
                }
                self.primary.remove(indices);
            }
            Step::Refresh => {
                self.primary.refresh();
                if let Some(rail) = self.thumbs.as_mut() {
                    rail.refresh();
                }
            }
            Step::Autoplay { enabled: true } => self.primary.start_autoplay(),
            Step::Autoplay { enabled: false } => self.primary.stop_autoplay(),
            Step::Hover { inside: true } => self.primary.pointer_enter(),
            Step::Hover { inside: false } => self.primary.pointer_leave(),
            Step::ClickThumbnail { index } => {
                match (self.thumbs.as_mut(), self.sync.as_mut()) {
                    (Some(rail), Some(sync)) => {
                        sync.on_thumbnail_click(*index, &mut self.primary, rail)
                    }
                    _ => warn!("click_thumbnail needs `thumbnails = true`"),
                }
            }
            Step::Destroy => {
                if let (Some(rail), Some(sync)) = (self.thumbs.as_mut(), self.sync.take()) {
                    sync.unbind(&mut self.primary, rail);
                }
                self.primary.destroy();
                if let Some(rail) = self.thumbs.as_mut() {
                    rail.destroy();
                }
            }
        }
    }

    /// Press, move once per frame over `duration_ms`, release
    fn drag(&mut self, distance: f64, duration_ms: u64) {
        if !self.primary.pointer_down(PointerDown::mouse(0.0, 0.0)) {
            warn!("Drag refused by the slider");
            return;
        }
        let direction = self.primary.config().direction;
        let frames = duration_ms.div_ceil(FRAME_MS).max(1);
        for frame in 1..=frames {
            let travel = distance * frame as f64 / frames as f64;
            let axis = direction.to_raw(-travel);
            let (x, y) = if direction.is_vertical() {
                (0.0, axis)
            } else {
                (axis, 0.0)
            };
            self.primary.pointer_move(x, y);
            self.frame();
        }
        self.primary.pointer_up();
    }

    fn add(&mut self, count: usize, at: Option<usize>) {
        let cards: Vec<SlideCard> = (0..count)
            .map(|i| SlideCard::new(self.next_slide_id + i))
            .collect();
        self.next_slide_id += count;
        if let Some(rail) = self.thumbs.as_mut() {
            rail.add(cards.clone(), at);
        }
        self.primary.add(cards, at);
        // a rail emptied by removals binds again once it has slides
        if self.sync.as_ref().is_some_and(|s| !s.is_bound()) {
            self.sync = None;
        }
        if self.sync.is_none() {
            if let Some(rail) = self.thumbs.as_mut() {
                self.sync = Some(ThumbnailSync::bind(&mut self.primary, rail, None));
            }
        }
    }

    fn rebind_thumbnails(&mut self) {
        let (Some(rail), Some(sync)) = (self.thumbs.as_mut(), self.sync.take()) else {
            return;
        };
        sync.unbind(&mut self.primary, rail);
        self.sync = Some(ThumbnailSync::bind(&mut self.primary, rail, None));
    }

    /// Write out everything recorded since the last flush
    fn flush(&mut self, out: &mut impl Write) -> Result<usize> {
        let records: Vec<EventRecord> = self.records.borrow_mut().drain(..).collect();
        for record in &records {
            writeln!(out, "{}", serde_json::to_string(record)?)?;
        }
        Ok(records.len())
    }
}

fn record_events(
    slider: &mut Slider<TerminalTrack>,
    name: &'static str,
    clock: &ManualClock,
    start: Instant,
    records: &Rc<RefCell<Vec<EventRecord>>>,
) {
    let clock = clock.clone();
    let sink = records.clone();
    slider.on(EventKind::Any, move |event| {
        let t_ms = clock.now().duration_since(start).as_millis() as u64;
        sink.borrow_mut().push(EventRecord {
            t_ms,
            slider: name,
            event: *event,
        });
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(content: &str) -> (Summary, Vec<serde_json::Value>) {
        let script = Script::parse(content).unwrap();
        let mut out = Vec::new();
        let summary = run_script(&script, &mut out).unwrap();
        let lines = String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        (summary, lines)
    }

    fn events_named<'a>(lines: &'a [serde_json::Value], name: &str) -> Vec<&'a serde_json::Value> {
        lines.iter().filter(|l| l["event"] == name).collect()
    }

    #[test]
    fn test_demo_script_parses() {
        let script = Script::demo().unwrap();
        assert_eq!(script.slides, 5);
        assert!(script.thumbnails);
        assert!(script.slider.loop_enabled);
        assert_eq!(script.steps.first(), Some(&Step::Next));
        assert_eq!(script.steps.last(), Some(&Step::Destroy));
        assert!(script.steps.contains(&Step::ClickThumbnail { index: 2 }));
    }

    #[test]
    fn test_demo_script_runs_to_destroy() {
        let script = Script::demo().unwrap();
        let mut out = Vec::new();
        let summary = run_script(&script, &mut out).unwrap();
        assert!(summary.events > 0);
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), summary.events);
        assert!(text.lines().any(|l| l.contains(r#""event":"destroy""#)));
    }

    #[test]
    fn test_unknown_op_rejected() {
        let err = Script::parse(
            r#"
            [[step]]
            op = "explode"
            "#,
        );
        assert!(err.is_err());
    }

    #[test]
    fn test_events_are_json_lines() {
        let (summary, lines) = play(
            r#"
            slides = 5

            [[step]]
            op = "next"

            [[step]]
            op = "wait"
            ms = 600

            [[step]]
            op = "next"
            "#,
        );
        assert_eq!(summary.final_index, 2);
        assert_eq!(summary.slide_count, 5);

        assert_eq!(lines[0]["event"], "ready");
        assert_eq!(lines[0]["slider"], "primary");
        assert_eq!(lines[0]["t_ms"], 0);

        let changes = events_named(&lines, "slide-change");
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0]["index"], 1);
        assert_eq!(changes[0]["previous"], 0);
        assert_eq!(changes[1]["index"], 2);
        assert!(changes[1]["t_ms"].as_u64().unwrap() >= 600);
    }

    #[test]
    fn test_prev_wraps_in_loop_mode() {
        let (summary, lines) = play(
            r#"
            slides = 4

            [slider]
            loop = true

            [[step]]
            op = "prev"
            "#,
        );
        assert_eq!(summary.final_index, 3);
        let changes = events_named(&lines, "slide-change");
        assert_eq!(changes.last().unwrap()["index"], 3);
    }

    #[test]
    fn test_drag_moves_forward() {
        let (summary, lines) = play(
            r#"
            slides = 5

            [[step]]
            op = "drag"
            distance = 800.0
            duration_ms = 160
            "#,
        );
        assert!(summary.final_index >= 1);
        assert_eq!(events_named(&lines, "drag-start").len(), 1);
        let end = events_named(&lines, "drag-end");
        assert_eq!(end.len(), 1);
        assert_eq!(end[0]["start_index"], 0);
    }

    #[test]
    fn test_thumbnail_click_drives_primary() {
        let script = Script::parse(
            r#"
            slides = 6
            thumbnails = true

            [[step]]
            op = "click_thumbnail"
            index = 3
            "#,
        )
        .unwrap();
        let mut sim = Simulator::new(&script).unwrap();
        for step in &script.steps {
            sim.apply(step);
        }
        sim.wait(SETTLE_MS);

        assert_eq!(sim.primary.current_index(), 3);
        let rail = sim.thumbs.as_ref().unwrap();
        assert_eq!(rail.highlight(), Some(3));
        assert!(!rail.config().draggable);
        assert_eq!(sim.sync.as_ref().unwrap().pending_target(), None);
    }

    #[test]
    fn test_click_without_rail_is_ignored() {
        let (summary, _) = play(
            r#"
            [[step]]
            op = "click_thumbnail"
            index = 3
            "#,
        );
        assert_eq!(summary.final_index, 0);
    }

    #[test]
    fn test_destroy_makes_later_steps_inert() {
        let (summary, lines) = play(
            r#"
            slides = 3

            [[step]]
            op = "destroy"

            [[step]]
            op = "next"
            "#,
        );
        assert_eq!(summary.final_index, 0);
        assert_eq!(events_named(&lines, "destroy").len(), 1);
        assert!(events_named(&lines, "slide-change").is_empty());
    }

    #[test]
    fn test_add_and_remove_update_count() {
        let (summary, _) = play(
            r#"
            slides = 3
            thumbnails = true

            [[step]]
            op = "add"
            count = 2

            [[step]]
            op = "remove"
            indices = [0, 0, 9]
            "#,
        );
        assert_eq!(summary.slide_count, 4);
    }
}
