use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::EventLog;
use crate::theme::Theme;

pub struct EventLogWidget;

impl EventLogWidget {
    /// Newest events at the bottom
    pub fn render(frame: &mut Frame, area: Rect, log: &EventLog, theme: &Theme) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.grey0))
            .title(Span::styled(" Events ", Style::default().fg(theme.fg1)));
        let rows = block.inner(area).height as usize;

        let mut lines: Vec<Line> = log
            .lines()
            .rev()
            .take(rows)
            .map(|l| Line::from(Span::styled(l.as_str(), Style::default().fg(theme.grey2))))
            .collect();
        lines.reverse();

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}
