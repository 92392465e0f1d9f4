pub mod app;
pub mod event;
pub mod host;
pub mod input;
pub mod scroll;
pub mod theme;
pub mod widgets;

pub use app::App;
pub use host::{drive, ManualClock, SlideCard, TerminalTrack};
pub use theme::Theme;

use ratatui::Frame;

use widgets::{EventLogWidget, PaginationWidget, StatusBarWidget, TrackWidget};

/// Draw the whole screen from the app's last layout pass
pub fn draw(frame: &mut Frame, app: &App) {
    let areas = &app.areas;
    TrackWidget::render(frame, areas.track, &app.primary, "glidetrack", &app.theme);
    if let (Some(area), Some(rail)) = (areas.thumbs, app.thumbs.as_ref()) {
        TrackWidget::render(frame, area, rail, "thumbnails", &app.theme);
    }
    if !app.primary.is_destroyed() {
        PaginationWidget::render(
            frame,
            areas.pagination,
            &app.primary.pagination(),
            &app.primary.navigation(),
            &app.theme,
        );
    }
    EventLogWidget::render(frame, areas.events, &app.event_log.borrow(), &app.theme);
    StatusBarWidget::render(frame, areas.status, app);
}
