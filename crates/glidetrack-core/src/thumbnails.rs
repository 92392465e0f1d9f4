//! Keeps a thumbnail rail in step with a primary slider.
//!
//! The two sliders never see each other. The primary's slide changes arrive
//! through a channel fed by an event listener; clicks on the rail command the
//! primary through its public operations. A click moves the coordinator from
//! `Idle` to `PendingTarget`, and once the primary reports the target it
//! enters `Confirming` until the index has held for [`STABILITY_WINDOW`].
//! Outside a click, updates are coalesced over [`DEBOUNCE_DELAY`].

use std::time::{Duration, Instant};

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};
use tracing::{debug, info, trace};

use crate::config::SliderConfigPatch;
use crate::events::{EventKind, ListenerId, SliderEvent};
use crate::host::SliderHost;
use crate::slider::Slider;
use crate::timers::Timers;

/// Coalescing window for scroll-driven highlight updates
pub const DEBOUNCE_DELAY: Duration = Duration::from_millis(50);
/// How long the primary must hold a clicked index before the click is done
pub const STABILITY_WINDOW: Duration = Duration::from_millis(200);

/// Where the coordinator is in the click protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    Idle,
    /// A thumbnail was clicked; waiting for the primary to report it
    PendingTarget { target: usize },
    /// The primary reported the target; waiting for it to hold
    Confirming { target: usize },
}

impl SyncPhase {
    pub fn target(self) -> Option<usize> {
        match self {
            SyncPhase::Idle => None,
            SyncPhase::PendingTarget { target } | SyncPhase::Confirming { target } => Some(target),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SyncTimer {
    Debounce,
    Stability,
}

/// Settings the rail had before binding, put back on unbind
#[derive(Debug, Clone, Copy)]
struct RailRestore {
    draggable: bool,
    loop_enabled: bool,
}

/// A live binding between a primary slider and a thumbnail rail.
///
/// Drive it with [`ThumbnailSync::tick`] alongside the sliders' own ticks and
/// release it with [`ThumbnailSync::unbind`].
#[derive(Debug)]
pub struct ThumbnailSync {
    phase: SyncPhase,
    timers: Timers<SyncTimer>,
    inbox: Option<UnboundedReceiver<usize>>,
    listener: Option<ListenerId>,
    latest: Option<usize>,
    restore: Option<RailRestore>,
}

impl ThumbnailSync {
    /// Bind `thumbs` to follow `primary`.
    ///
    /// The rail is switched to click-only navigation and its loop mode set to
    /// `loop_override`, or the primary's when absent. Binding a rail without
    /// slides yields an inert coordinator.
    pub fn bind<P, T>(
        primary: &mut Slider<P>,
        thumbs: &mut Slider<T>,
        loop_override: Option<bool>,
    ) -> Self
    where
        P: SliderHost,
        T: SliderHost,
    {
        let mut sync = Self {
            phase: SyncPhase::Idle,
            timers: Timers::new(),
            inbox: None,
            listener: None,
            latest: None,
            restore: None,
        };
        if thumbs.slide_count() == 0 || thumbs.is_destroyed() || primary.is_destroyed() {
            debug!("Thumbnail rail has no slides, skipping sync");
            return sync;
        }

        sync.restore = Some(RailRestore {
            draggable: thumbs.config().draggable,
            loop_enabled: thumbs.config().loop_enabled,
        });
        let loop_enabled = loop_override.unwrap_or(primary.config().loop_enabled);
        thumbs.update(
            &SliderConfigPatch::default()
                .draggable(false)
                .loop_enabled(loop_enabled),
        );

        let (tx, rx) = unbounded_channel();
        let mut orphaned = false;
        let id = primary.on(EventKind::SlideChange, move |event| {
            let SliderEvent::SlideChange { index, .. } = event else {
                return;
            };
            if tx.send(*index).is_err() && !orphaned {
                trace!(index, "Thumbnail sync dropped without unbind, ignoring slide changes");
                orphaned = true;
            }
        });
        sync.inbox = Some(rx);
        sync.listener = Some(id);

        let current = primary.current_index();
        thumbs.set_highlight(Some(current));
        thumbs.reveal(current);

        info!(loop_enabled, "Thumbnail rail bound");
        sync
    }

    pub fn is_bound(&self) -> bool {
        self.listener.is_some()
    }

    pub fn phase(&self) -> SyncPhase {
        self.phase
    }

    /// Pending click target, if any
    pub fn pending_target(&self) -> Option<usize> {
        self.phase.target()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    /// A thumbnail was clicked: highlight it and send the primary there
    pub fn on_thumbnail_click<P, T>(
        &mut self,
        index: usize,
        primary: &mut Slider<P>,
        thumbs: &mut Slider<T>,
    ) where
        P: SliderHost,
        T: SliderHost,
    {
        if !self.is_bound() || primary.is_destroyed() || primary.slide_count() == 0 {
            return;
        }
        let clicked = index.min(primary.slide_count() - 1);
        self.timers.clear();
        self.latest = None;
        thumbs.set_highlight(Some(clicked));

        // paged tracks stop short of the last slides, so wait for where the primary lands
        primary.go_to(clicked as isize);
        let target = primary.current_index();
        debug!(clicked, target, "Thumbnail clicked");
        self.phase = SyncPhase::PendingTarget { target };
        self.drain(primary.host().now());

        // already there: no change event will announce it
        if self.phase == (SyncPhase::PendingTarget { target })
            && primary.current_index() == target
        {
            self.confirm(target, primary.host().now());
        }
    }

    /// Process queued slide changes and fire due timers
    pub fn tick<P, T>(&mut self, primary: &Slider<P>, thumbs: &mut Slider<T>)
    where
        P: SliderHost,
        T: SliderHost,
    {
        if !self.is_bound() {
            return;
        }
        let now = primary.host().now();
        self.drain(now);

        for timer in self.timers.take_due(now) {
            match timer {
                SyncTimer::Debounce => {
                    if let Some(index) = self.latest.take() {
                        thumbs.set_highlight(Some(index));
                        thumbs.reveal(index);
                    }
                }
                SyncTimer::Stability => {
                    debug!(target = ?self.phase.target(), "Thumbnail target settled");
                    self.phase = SyncPhase::Idle;
                    self.latest = Some(primary.current_index());
                    self.timers.schedule(SyncTimer::Debounce, now, DEBOUNCE_DELAY);
                }
            }
        }
    }

    /// Detach from the primary and restore the rail's own settings
    pub fn unbind<P, T>(mut self, primary: &mut Slider<P>, thumbs: &mut Slider<T>)
    where
        P: SliderHost,
        T: SliderHost,
    {
        if let Some(id) = self.listener.take() {
            primary.off(id);
        }
        self.timers.clear();
        self.inbox = None;
        if let Some(restore) = self.restore.take() {
            thumbs.update(
                &SliderConfigPatch::default()
                    .draggable(restore.draggable)
                    .loop_enabled(restore.loop_enabled),
            );
            thumbs.set_highlight(None);
            info!("Thumbnail rail unbound");
        }
    }

    fn drain(&mut self, now: Instant) {
        let mut received = Vec::new();
        if let Some(inbox) = self.inbox.as_mut() {
            while let Ok(index) = inbox.try_recv() {
                received.push(index);
            }
        }
        for index in received {
            self.on_primary_change(index, now);
        }
    }

    fn on_primary_change(&mut self, index: usize, now: Instant) {
        match self.phase {
            SyncPhase::Idle => {
                self.latest = Some(index);
                self.timers.schedule(SyncTimer::Debounce, now, DEBOUNCE_DELAY);
            }
            SyncPhase::PendingTarget { target } => {
                if index == target {
                    self.confirm(target, now);
                } else {
                    // the primary settled elsewhere; let the stability window release the click
                    self.timers.schedule(SyncTimer::Stability, now, STABILITY_WINDOW);
                }
            }
            SyncPhase::Confirming { target } => {
                if index != target {
                    debug!(target, index, "Primary oscillating, restarting stability window");
                }
                self.timers.schedule(SyncTimer::Stability, now, STABILITY_WINDOW);
            }
        }
    }

    fn confirm(&mut self, target: usize, now: Instant) {
        self.phase = SyncPhase::Confirming { target };
        self.timers.schedule(SyncTimer::Stability, now, STABILITY_WINDOW);
    }
}

impl Drop for ThumbnailSync {
    fn drop(&mut self) {
        if self.listener.is_some() {
            debug!("Thumbnail sync dropped while bound, primary keeps an inert listener");
        }
    }
}
