//! Index ↔ scroll-position translation.
//!
//! Pure functions over a [`Geometry`] snapshot. All positions are logical
//! offsets along the main axis (direction already normalised).
//!
//! Integer slides-per-view pages by whole slides. Fractional slides-per-view
//! centres the active slide in the viewport, except at the true ends of a
//! non-looping track where the first and last slides sit flush.

use crate::layout::{is_fractional, LayoutConfig};

/// Scroll positions this close to either end snap to the end index
pub const EDGE_SNAP_TOLERANCE_PX: f64 = 1.0;

/// Measured layout of one slider at one point in time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    pub slide_count: usize,
    pub slides_per_view: f64,
    /// Viewport extent along the main axis
    pub viewport: f64,
    /// Visible size of one slide
    pub slide_visual: f64,
    pub gap: f64,
    /// Whether the track is virtually infinite
    pub looped: bool,
    /// Number of clone copies on each side of the real slides (loop only)
    pub clone_sets: usize,
}

impl Geometry {
    /// Measure geometry from viewport size and layout
    pub fn measure(viewport: f64, slide_count: usize, layout: &LayoutConfig) -> Self {
        let viewport = if viewport.is_finite() { viewport.max(0.0) } else { 0.0 };
        let spv = layout.slides_per_view;
        let slide_visual = ((viewport - layout.gap * (spv - 1.0)) / spv).max(0.0);
        Self {
            slide_count,
            slides_per_view: spv,
            viewport,
            slide_visual,
            gap: layout.gap,
            looped: false,
            clone_sets: 0,
        }
    }

    /// Mark the geometry as looping with the given clone buffer
    pub fn with_loop(mut self, clone_sets: usize) -> Self {
        self.looped = true;
        self.clone_sets = clone_sets;
        self
    }

    /// Distance between the starts of two adjacent slides
    #[inline]
    pub fn slide_size(&self) -> f64 {
        self.slide_visual + self.gap
    }

    #[inline]
    pub fn is_fractional(&self) -> bool {
        is_fractional(self.slides_per_view)
    }

    /// Whether the geometry can resolve positions at all
    #[inline]
    pub fn is_measurable(&self) -> bool {
        self.slide_count > 0 && self.slide_size() > 0.0
    }

    /// Number of nodes on the track, clones included
    pub fn node_count(&self) -> usize {
        if self.looped {
            self.slide_count * (2 * self.clone_sets + 1)
        } else {
            self.slide_count
        }
    }

    /// Full scrollable length of the track content
    pub fn track_scroll_size(&self) -> f64 {
        let nodes = self.node_count();
        if nodes == 0 {
            return 0.0;
        }
        nodes as f64 * self.slide_size() - self.gap
    }

    /// Largest reachable scroll offset
    pub fn max_scroll(&self) -> f64 {
        (self.track_scroll_size() - self.viewport).max(0.0)
    }

    /// Offset that moves a slide's start so its centre meets the viewport centre
    #[inline]
    pub fn center_offset(&self) -> f64 {
        self.viewport / 2.0 - self.slide_visual / 2.0
    }

    /// Offset applied when aligning: centred for fractional views, flush otherwise
    #[inline]
    pub fn align_offset(&self) -> f64 {
        if self.is_fractional() {
            self.center_offset()
        } else {
            0.0
        }
    }

    /// Highest index that can become active
    pub fn max_index(&self) -> usize {
        if self.slide_count == 0 {
            return 0;
        }
        if self.looped {
            self.slide_count - 1
        } else if self.is_fractional() {
            // a track that fits the viewport has nowhere to scroll
            if self.max_scroll() <= EDGE_SNAP_TOLERANCE_PX {
                0
            } else {
                self.slide_count - 1
            }
        } else {
            let per_view = self.slides_per_view.round().max(1.0) as usize;
            self.slide_count.saturating_sub(per_view)
        }
    }

    /// Clamp an arbitrary index into `[0, max_index]`
    pub fn clamp_index(&self, index: isize) -> usize {
        index.clamp(0, self.max_index() as isize) as usize
    }

    /// Resolve the active index for a scroll offset on a non-looping track.
    ///
    /// Looping tracks resolve through [`crate::looping::LoopController`]; this
    /// method ignores the loop flag so the controller can reuse it for
    /// its real-window arithmetic.
    pub fn index_for_scroll(&self, pos: f64) -> usize {
        if !self.is_measurable() {
            return 0;
        }
        let size = self.slide_size();
        let max_index = self.max_index();

        if !self.is_fractional() {
            let raw = (pos / size).round();
            return clamp_rounded(raw, max_index);
        }

        if pos <= EDGE_SNAP_TOLERANCE_PX {
            return 0;
        }
        if pos >= self.max_scroll() - EDGE_SNAP_TOLERANCE_PX {
            return max_index;
        }

        let viewport_center = pos + self.viewport / 2.0;
        let raw = ((viewport_center - self.slide_visual / 2.0) / size).round();
        clamp_rounded(raw, max_index)
    }

    /// Canonical scroll offset for an index on a non-looping track
    pub fn scroll_for_index(&self, index: usize) -> f64 {
        if !self.is_measurable() {
            return 0.0;
        }
        let index = index.min(self.max_index());
        let size = self.slide_size();

        if !self.is_fractional() {
            return index as f64 * size;
        }

        if index == 0 {
            return 0.0;
        }
        if index == self.max_index() {
            return self.max_scroll();
        }
        index as f64 * size + self.slide_visual / 2.0 - self.viewport / 2.0
    }

    /// Scroll offset that centres an index, clamped to the scrollable range
    pub fn centering_scroll(&self, index: usize) -> f64 {
        let pos = index as f64 * self.slide_size() - self.center_offset();
        pos.clamp(0.0, self.max_scroll())
    }
}

fn clamp_rounded(raw: f64, max_index: usize) -> usize {
    if raw.is_nan() || raw <= 0.0 {
        0
    } else {
        (raw as usize).min(max_index)
    }
}
