//! Tracks which logical slides are on screen.

use std::collections::BTreeSet;

use crate::looping::LoopController;
use crate::position::Geometry;

/// Overlap below this many px does not count as visible
const VISIBILITY_TOLERANCE_PX: f64 = 1.0;

/// Logical indices whose slide box intersects the viewport at `pos`
pub fn visible_indices(geometry: &Geometry, pos: f64) -> BTreeSet<usize> {
    if !geometry.is_measurable() {
        return BTreeSet::new();
    }
    let start = pos + VISIBILITY_TOLERANCE_PX;
    let end = pos + geometry.viewport - VISIBILITY_TOLERANCE_PX;

    if geometry.looped {
        return LoopController::new(*geometry)
            .logical_range(start, end)
            .into_iter()
            .collect();
    }

    let size = geometry.slide_size();
    (0..geometry.slide_count)
        .filter(|&i| {
            let slide_start = i as f64 * size;
            let slide_end = slide_start + geometry.slide_visual;
            slide_end > start && slide_start < end
        })
        .collect()
}

/// Previously visible set plus the diff logic
#[derive(Debug, Clone, Default)]
pub struct VisibilityTracker {
    visible: BTreeSet<usize>,
}

/// Indices that changed visibility in one update
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibilityChange {
    pub shown: Vec<usize>,
    pub hidden: Vec<usize>,
}

impl VisibilityTracker {
    pub fn update(&mut self, now_visible: BTreeSet<usize>) -> VisibilityChange {
        let shown = now_visible.difference(&self.visible).copied().collect();
        let hidden = self.visible.difference(&now_visible).copied().collect();
        self.visible = now_visible;
        VisibilityChange { shown, hidden }
    }

    pub fn visible(&self) -> &BTreeSet<usize> {
        &self.visible
    }

    pub fn reset(&mut self) {
        self.visible.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutConfig;
    use crate::looping::clone_sets;

    fn geometry(count: usize, spv: f64) -> Geometry {
        let layout = LayoutConfig {
            slides_per_view: spv,
            gap: 0.0,
            ..Default::default()
        };
        Geometry::measure(spv * 100.0, count, &layout)
    }

    #[test]
    fn test_visible_non_loop() {
        let g = geometry(6, 2.0);
        let visible: Vec<_> = visible_indices(&g, 100.0).into_iter().collect();
        assert_eq!(visible, vec![1, 2]);
        let partial: Vec<_> = visible_indices(&g, 150.0).into_iter().collect();
        assert_eq!(partial, vec![1, 2, 3]);
    }

    #[test]
    fn test_visible_loop_wraps() {
        let g = geometry(4, 2.0).with_loop(clone_sets(2.0, 4));
        let lc = LoopController::new(g);
        let visible: Vec<_> = visible_indices(&g, lc.scroll_for_index(3))
            .into_iter()
            .collect();
        assert_eq!(visible, vec![0, 3]);
    }

    #[test]
    fn test_tracker_diff() {
        let mut tracker = VisibilityTracker::default();
        let first = tracker.update([0, 1].into_iter().collect());
        assert_eq!(first.shown, vec![0, 1]);
        let second = tracker.update([1, 2].into_iter().collect());
        assert_eq!(second.shown, vec![2]);
        assert_eq!(second.hidden, vec![0]);
    }
}
