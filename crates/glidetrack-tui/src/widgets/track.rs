use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use glidetrack_core::{NodeKind, Slider};

use crate::host::TerminalTrack;
use crate::theme::Theme;

pub struct TrackWidget;

impl TrackWidget {
    /// Draw the visible part of a slider's track inside a titled frame
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        slider: &Slider<TerminalTrack>,
        title: &str,
        theme: &Theme,
    ) {
        let host = slider.host();
        let outer = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.grey0))
            .title(Span::styled(
                format!(" {title} "),
                Style::default().fg(theme.fg1).add_modifier(Modifier::BOLD),
            ));
        let inner = outer.inner(area);
        frame.render_widget(outer, area);

        if slider.is_destroyed() || inner.width == 0 || inner.height == 0 {
            return;
        }

        let geometry = host.geometry();
        let size = geometry.slide_size();
        if size <= 0.0 {
            return;
        }
        let cell = host.cell_px();
        let vertical = host.direction().is_vertical();
        let extent = f64::from(if vertical { inner.height } else { inner.width });
        let pos = host.logical_position();
        let first = (pos / size).floor().max(0.0) as usize;

        for (index, node) in host.plan().nodes.iter().enumerate().skip(first) {
            let start = (index as f64 * size - pos) / cell;
            if start >= extent {
                break;
            }
            let end = start + geometry.slide_visual / cell;
            let from = start.max(0.0).round() as u16;
            let to = end.min(extent).round() as u16;
            if to <= from {
                continue;
            }

            let rect = if vertical {
                Rect::new(inner.x, inner.y + from, inner.width, to - from)
            } else {
                Rect::new(inner.x + from, inner.y, to - from, inner.height)
            };

            let card = host.slides().get(node.source);
            let active = node.source == slider.current_index();
            let highlighted = host.highlighted() == Some(node.source);
            let color = match node.kind {
                NodeKind::Clone { .. } => theme.clone,
                NodeKind::Real => card.map(|c| theme.slide_color(c.id)).unwrap_or(theme.fg0),
            };
            let border = if highlighted {
                theme.yellow
            } else if active {
                theme.accent
            } else {
                color
            };

            let label = card.map(|c| c.title.as_str()).unwrap_or("?");
            let mut lines = vec![Line::from(Span::styled(
                fit(label, rect.width.saturating_sub(2)),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ))];
            if let NodeKind::Clone { band } = node.kind {
                lines.push(Line::from(Span::styled(
                    fit(&format!("clone {band:+}"), rect.width.saturating_sub(2)),
                    Style::default().fg(theme.grey1),
                )));
            }

            let block = Block::default()
                .borders(Borders::ALL)
                .border_type(if active {
                    BorderType::Thick
                } else {
                    BorderType::Rounded
                })
                .border_style(Style::default().fg(border));
            let paragraph = Paragraph::new(lines)
                .block(block)
                .alignment(Alignment::Center);
            frame.render_widget(paragraph, rect);
        }
    }
}

/// Truncate `text` to `width` display cells
fn fit(text: &str, width: u16) -> String {
    let width = width as usize;
    if text.width() <= width {
        return text.to_string();
    }
    let mut out = String::new();
    for ch in text.chars() {
        let next = format!("{out}{ch}");
        if next.width() > width {
            break;
        }
        out = next;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_truncates_by_display_width() {
        assert_eq!(fit("Slide 12", 20), "Slide 12");
        assert_eq!(fit("Slide 12", 5), "Slide");
        assert_eq!(fit("幻灯片", 4), "幻灯");
        assert_eq!(fit("abc", 0), "");
    }
}
