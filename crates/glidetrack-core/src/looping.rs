//! Loop virtualization.
//!
//! The real slides are surrounded by `clone_sets` virtual copies on each
//! side. Positions are tracked in a virtual index space: virtual index `v`
//! maps to logical slide `v mod slide_count`, and the real window starts at
//! virtual index `clone_sets * slide_count`. When a settled position drifts
//! out of the real window it is shifted by whole sections (one full copy of
//! the slide set) so the user never runs out of clones.

use crate::position::Geometry;

/// Minimum number of clone copies on each side of the real slides
pub const MIN_CLONE_SETS: usize = 3;

/// Distance past the real window edge before a teleport is considered
pub const TELEPORT_TOLERANCE_PX: f64 = 2.0;

/// Number of clone copies needed on each side for a view of `slides_per_view`
pub fn clone_sets(slides_per_view: f64, slide_count: usize) -> usize {
    if slide_count == 0 {
        return MIN_CLONE_SETS;
    }
    let needed = slides_per_view.max(1.0).ceil() as usize + 2;
    MIN_CLONE_SETS.max(needed.div_ceil(slide_count))
}

/// Whether a node is a real slide or a virtual copy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Real,
    /// Copy in band `band` (negative before the real slides, positive after)
    Clone { band: i32 },
}

/// One node on the rendered track
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackNode {
    /// Logical slide this node shows
    pub source: usize,
    pub kind: NodeKind,
}

impl TrackNode {
    /// Logical index for consumers; clones never carry one
    pub fn logical_index(&self) -> Option<usize> {
        match self.kind {
            NodeKind::Real => Some(self.source),
            NodeKind::Clone { .. } => None,
        }
    }

    pub fn is_clone(&self) -> bool {
        matches!(self.kind, NodeKind::Clone { .. })
    }
}

/// Ordered description of every node the host should place on the track
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackPlan {
    pub nodes: Vec<TrackNode>,
}

impl TrackPlan {
    /// Plan for a plain track: one node per slide
    pub fn plain(slide_count: usize) -> Self {
        Self {
            nodes: (0..slide_count)
                .map(|source| TrackNode {
                    source,
                    kind: NodeKind::Real,
                })
                .collect(),
        }
    }

    /// Plan for a looping track with `clone_sets` copies on both sides
    pub fn looped(slide_count: usize, clone_sets: usize) -> Self {
        let sets = clone_sets as i32;
        let mut nodes = Vec::with_capacity(slide_count * (2 * clone_sets + 1));
        for band in -sets..=sets {
            for source in 0..slide_count {
                let kind = if band == 0 {
                    NodeKind::Real
                } else {
                    NodeKind::Clone { band }
                };
                nodes.push(TrackNode { source, kind });
            }
        }
        Self { nodes }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of real (non-clone) nodes
    #[cfg(test)]
    pub fn real_count(&self) -> usize {
        self.nodes.iter().filter(|n| !n.is_clone()).count()
    }
}

/// Loop arithmetic over a looping [`Geometry`]
#[derive(Debug, Clone, Copy)]
pub struct LoopController {
    geometry: Geometry,
}

impl LoopController {
    pub fn new(geometry: Geometry) -> Self {
        debug_assert!(geometry.looped, "loop controller needs a looping geometry");
        Self { geometry }
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Width of one full copy of the slide set
    pub fn section_size(&self) -> f64 {
        self.geometry.slide_count as f64 * self.geometry.slide_size()
    }

    /// Scroll coordinate where the real slides begin
    pub fn real_start(&self) -> f64 {
        self.geometry.clone_sets as f64 * self.section_size()
    }

    /// Offset of the active slide's start from the real window start
    fn anchor_offset(&self, pos: f64) -> f64 {
        pos + self.geometry.align_offset() - self.real_start()
    }

    /// Nearest virtual index (relative to the real window) for a position
    pub fn virtual_index(&self, pos: f64) -> i64 {
        let size = self.geometry.slide_size();
        if size <= 0.0 {
            return 0;
        }
        (self.anchor_offset(pos) / size).round() as i64
    }

    /// Logical index in `[0, slide_count)` for any position, in any band
    pub fn logical_index(&self, pos: f64) -> usize {
        let count = self.geometry.slide_count as i64;
        if count == 0 {
            return 0;
        }
        ((self.virtual_index(pos) % count) + count) as usize % count as usize
    }

    /// Canonical scroll position of a virtual index
    pub fn scroll_for_virtual(&self, virtual_index: i64) -> f64 {
        self.real_start() + virtual_index as f64 * self.geometry.slide_size()
            - self.geometry.align_offset()
    }

    /// Canonical position of a logical index inside the real window
    pub fn scroll_for_index(&self, index: usize) -> f64 {
        self.scroll_for_virtual(index as i64)
    }

    /// Signed shortest cyclic step count from `from` to `to`.
    ///
    /// Never exceeds half the slide count in magnitude; an exact half-way
    /// tie goes forward.
    pub fn shortest_delta(&self, from: usize, to: usize) -> i64 {
        let count = self.geometry.slide_count as i64;
        if count == 0 {
            return 0;
        }
        let forward = (to as i64 - from as i64).rem_euclid(count);
        if forward * 2 <= count {
            forward
        } else {
            forward - count
        }
    }

    /// Target scroll position for reaching logical `target` along the
    /// shortest path from the *current position* (not a cached index).
    pub fn navigate_to(&self, current_pos: f64, target: usize) -> f64 {
        let current_virtual = self.virtual_index(current_pos);
        let current_logical = self.logical_index(current_pos);
        let delta = self.shortest_delta(current_logical, target);
        self.scroll_for_virtual(current_virtual + delta)
    }

    /// Target scroll position for moving `steps` slides (signed) from the
    /// current position, in the requested direction.
    pub fn step_from(&self, current_pos: f64, steps: i64) -> f64 {
        let count = self.geometry.slide_count as i64;
        if count == 0 {
            return current_pos;
        }
        // a full lap lands on the same slide, so only the remainder moves
        let steps = steps.signum() * (steps.abs() % count);
        self.scroll_for_virtual(self.virtual_index(current_pos) + steps)
    }

    /// Position after teleporting back into the real window, if needed.
    ///
    /// Returns `None` when the position is already inside the window.
    pub fn teleport_target(&self, pos: f64) -> Option<f64> {
        let section = self.section_size();
        if section <= 0.0 || !pos.is_finite() {
            return None;
        }
        let anchor = self.anchor_offset(pos);
        if anchor >= -TELEPORT_TOLERANCE_PX && anchor < section - TELEPORT_TOLERANCE_PX {
            return None;
        }

        let shifted = (anchor + TELEPORT_TOLERANCE_PX).rem_euclid(section) - TELEPORT_TOLERANCE_PX;
        Some(pos + (shifted - anchor))
    }

    /// Centring scroll position of every on-track copy of logical `index`,
    /// one per band
    pub fn candidate_positions(&self, index: usize) -> Vec<f64> {
        let count = self.geometry.slide_count as i64;
        let sets = self.geometry.clone_sets as i64;
        let size = self.geometry.slide_size();
        (-sets..=sets)
            .map(|band| {
                let virtual_index = band * count + index as i64;
                self.real_start() + virtual_index as f64 * size - self.geometry.center_offset()
            })
            .collect()
    }

    /// The candidate for `index` closest to `current_pos`
    pub fn nearest_candidate(&self, index: usize, current_pos: f64) -> Option<f64> {
        self.candidate_positions(index)
            .into_iter()
            .min_by(|a, b| (a - current_pos).abs().total_cmp(&(b - current_pos).abs()))
    }

    /// Logical indices of the virtual slides overlapping `[start, end)`
    pub fn logical_range(&self, start: f64, end: f64) -> Vec<usize> {
        let size = self.geometry.slide_size();
        let count = self.geometry.slide_count as i64;
        if size <= 0.0 || count == 0 || end <= start {
            return Vec::new();
        }
        let first = ((start - self.real_start()) / size).floor() as i64;
        let last = ((end - self.real_start()) / size).ceil() as i64;
        let mut seen = Vec::new();
        for v in first..last {
            let slide_start = self.real_start() + v as f64 * size;
            let slide_end = slide_start + self.geometry.slide_visual;
            if slide_end > start && slide_start < end {
                let logical = v.rem_euclid(count) as usize;
                if !seen.contains(&logical) {
                    seen.push(logical);
                }
            }
        }
        seen.sort_unstable();
        seen
    }
}
