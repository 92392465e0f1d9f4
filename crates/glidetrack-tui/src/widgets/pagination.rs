use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use glidetrack_core::{Navigation, Pagination};

use crate::theme::Theme;

/// What a click on the pagination row landed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationHit {
    Prev,
    Next,
    Page(usize),
}

pub struct PaginationWidget;

impl PaginationWidget {
    /// Draw `◀ • ● • ▶`, centred in `area`
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        pagination: &Pagination,
        navigation: &Navigation,
        theme: &Theme,
    ) {
        let cells = Self::cells(area, pagination);
        let Some(&(start, _)) = cells.first() else {
            return;
        };

        let button = |disabled: bool| {
            Style::default().fg(if disabled { theme.disabled } else { theme.fg1 })
        };
        let mut spans = vec![Span::raw(" ".repeat((start - area.x) as usize))];
        for (_, hit) in &cells {
            let span = match hit {
                PaginationHit::Prev => Span::styled("◀ ", button(navigation.prev_disabled)),
                PaginationHit::Next => Span::styled("▶", button(navigation.next_disabled)),
                PaginationHit::Page(page) => {
                    let dot = pagination.dots.iter().find(|d| d.page == *page);
                    match dot {
                        Some(d) if d.active => Span::styled("● ", Style::default().fg(theme.accent)),
                        Some(d) if d.edge => Span::styled("· ", Style::default().fg(theme.grey0)),
                        _ => Span::styled("• ", Style::default().fg(theme.grey2)),
                    }
                }
            };
            spans.push(span);
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    /// Map a click to a button or dot
    pub fn hit_test(
        area: Rect,
        pagination: &Pagination,
        column: u16,
        row: u16,
    ) -> Option<PaginationHit> {
        if row < area.y || row >= area.y + area.height {
            return None;
        }
        Self::cells(area, pagination)
            .into_iter()
            .find(|&(x, _)| column == x || column == x + 1)
            .map(|(_, hit)| hit)
    }

    /// Starting column of every button and dot, two cells each
    fn cells(area: Rect, pagination: &Pagination) -> Vec<(u16, PaginationHit)> {
        let mut items = Vec::with_capacity(pagination.dots.len() + 2);
        items.push(PaginationHit::Prev);
        items.extend(pagination.dots.iter().map(|d| PaginationHit::Page(d.page)));
        items.push(PaginationHit::Next);

        let width = (items.len() * 2) as u16;
        if area.width < width || area.height == 0 {
            return Vec::new();
        }
        let start = area.x + (area.width - width) / 2;
        items
            .into_iter()
            .enumerate()
            .map(|(i, hit)| (start + 2 * i as u16, hit))
            .collect()
    }
}
