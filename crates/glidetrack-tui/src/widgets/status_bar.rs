use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use glidetrack_core::SyncPhase;

use crate::app::App;

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let slider = &app.primary;

        let status_text = match &app.status_message {
            Some(msg) => format!(" {msg}"),
            None if slider.is_destroyed() => " DESTROYED".to_string(),
            None => {
                let mut flags = Vec::new();
                if slider.is_loop_active() {
                    flags.push("LOOP");
                }
                if slider.is_autoplaying() {
                    flags.push("AUTO");
                }
                if slider.state().is_dragging {
                    flags.push("DRAG");
                }
                if let Some(sync) = &app.sync {
                    match sync.phase() {
                        SyncPhase::Idle => {}
                        SyncPhase::PendingTarget { .. } => flags.push("THUMB…"),
                        SyncPhase::Confirming { .. } => flags.push("THUMB✓"),
                    }
                }
                format!(
                    " {}/{} | spv {} | {}",
                    slider.current_index() + 1,
                    slider.slide_count(),
                    slider.layout().slides_per_view,
                    if flags.is_empty() {
                        "-".to_string()
                    } else {
                        flags.join(" ")
                    }
                )
            }
        };

        let help_hint = " q:quit h/l:move o:loop a:auto v:spv +/-:slides ";
        let padding_len = (area.width as usize)
            .saturating_sub(status_text.width() + help_hint.width());

        let line = Line::from(vec![
            Span::styled(status_text, Style::default().fg(theme.fg0).bg(theme.bg2)),
            Span::styled(" ".repeat(padding_len), Style::default().bg(theme.bg2)),
            Span::styled(help_hint, Style::default().fg(theme.grey2).bg(theme.bg2)),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }
}
