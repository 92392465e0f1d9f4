//! Windowed pagination dots and navigation button state.

use serde::Serialize;

/// One rendered pagination dot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Dot {
    pub page: usize,
    pub active: bool,
    /// Sits on a window edge with hidden pages beyond it
    pub edge: bool,
}

/// Dots to render for the current page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page_count: usize,
    pub dots: Vec<Dot>,
}

impl Pagination {
    /// Build the visible dot window.
    ///
    /// With `max_dots` unbounded every page gets a dot. Otherwise a window of
    /// `max_dots` pages keeps `current` centred where possible and clamps at
    /// both ends.
    pub fn windowed(current: usize, page_count: usize, max_dots: Option<usize>) -> Self {
        if page_count == 0 {
            return Self::default();
        }
        let current = current.min(page_count - 1);
        let visible = max_dots.unwrap_or(page_count).clamp(1, page_count);

        let half = visible / 2;
        let start = current
            .saturating_sub(half)
            .min(page_count - visible);
        let end = start + visible;

        let dots = (start..end)
            .map(|page| Dot {
                page,
                active: page == current,
                edge: (page == start && start > 0) || (page + 1 == end && end < page_count),
            })
            .collect();

        Self { page_count, dots }
    }

    pub fn active_page(&self) -> Option<usize> {
        self.dots.iter().find(|d| d.active).map(|d| d.page)
    }
}

/// Enabled state of the previous/next buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Navigation {
    pub prev_disabled: bool,
    pub next_disabled: bool,
}

impl Navigation {
    pub fn new(current: usize, max_index: usize, looped: bool) -> Self {
        if looped {
            return Self {
                prev_disabled: false,
                next_disabled: false,
            };
        }
        Self {
            prev_disabled: current == 0,
            next_disabled: current >= max_index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages(p: &Pagination) -> Vec<usize> {
        p.dots.iter().map(|d| d.page).collect()
    }

    #[test]
    fn test_unbounded_shows_all() {
        let p = Pagination::windowed(3, 6, None);
        assert_eq!(pages(&p), vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(p.active_page(), Some(3));
        assert!(p.dots.iter().all(|d| !d.edge));
    }

    #[test]
    fn test_window_centres_active() {
        let p = Pagination::windowed(5, 10, Some(5));
        assert_eq!(pages(&p), vec![3, 4, 5, 6, 7]);
        assert!(p.dots[0].edge);
        assert!(p.dots[4].edge);
        assert!(!p.dots[2].edge);
    }

    #[test]
    fn test_window_clamps_at_ends() {
        let start = Pagination::windowed(0, 10, Some(4));
        assert_eq!(pages(&start), vec![0, 1, 2, 3]);
        assert!(!start.dots[0].edge);
        assert!(start.dots[3].edge);

        let end = Pagination::windowed(9, 10, Some(4));
        assert_eq!(pages(&end), vec![6, 7, 8, 9]);
        assert!(end.dots[0].edge);
        assert!(!end.dots[3].edge);
    }

    #[test]
    fn test_window_larger_than_pages() {
        let p = Pagination::windowed(1, 3, Some(8));
        assert_eq!(pages(&p), vec![0, 1, 2]);
    }

    #[test]
    fn test_navigation_state() {
        assert_eq!(
            Navigation::new(0, 4, false),
            Navigation {
                prev_disabled: true,
                next_disabled: false
            }
        );
        assert!(Navigation::new(4, 4, false).next_disabled);
        let looped = Navigation::new(0, 4, true);
        assert!(!looped.prev_disabled && !looped.next_disabled);
    }
}
