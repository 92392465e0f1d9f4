use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::App;

/// Input action that can be performed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Next,
    Prev,
    First,
    Last,
    /// Digit keys jump straight to a slide
    GoTo(usize),
    ToggleLoop,
    ToggleAutoplay,
    ToggleDraggable,
    CycleSlidesPerView,
    AddSlide,
    RemoveSlide,
    Refresh,
    Destroy,
    ClearLog,
    None,
}

/// Handle a key event and return the corresponding action
pub fn handle_key_event(key: KeyEvent, app: &App) -> Action {
    if app.primary.is_destroyed() {
        return match (key.code, key.modifiers) {
            (KeyCode::Char('q'), _) | (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,
            _ => Action::None,
        };
    }

    let vertical = app.primary.config().direction.is_vertical();
    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), KeyModifiers::NONE) => Action::Quit,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,

        (KeyCode::Char('l'), KeyModifiers::NONE) => Action::Next,
        (KeyCode::Char('h'), KeyModifiers::NONE) => Action::Prev,
        (KeyCode::Right, _) if !vertical => Action::Next,
        (KeyCode::Left, _) if !vertical => Action::Prev,
        (KeyCode::Down, _) if vertical => Action::Next,
        (KeyCode::Up, _) if vertical => Action::Prev,

        (KeyCode::Char('g'), KeyModifiers::NONE) | (KeyCode::Home, _) => Action::First,
        (KeyCode::Char('G'), _) | (KeyCode::End, _) => Action::Last,
        (KeyCode::Char(c @ '1'..='9'), KeyModifiers::NONE) => {
            Action::GoTo(c as usize - '1' as usize)
        }

        (KeyCode::Char('o'), KeyModifiers::NONE) => Action::ToggleLoop,
        (KeyCode::Char('a'), KeyModifiers::NONE) => Action::ToggleAutoplay,
        (KeyCode::Char('d'), KeyModifiers::NONE) => Action::ToggleDraggable,
        (KeyCode::Char('v'), KeyModifiers::NONE) => Action::CycleSlidesPerView,
        (KeyCode::Char('+'), _) | (KeyCode::Char('='), KeyModifiers::NONE) => Action::AddSlide,
        (KeyCode::Char('-'), KeyModifiers::NONE) => Action::RemoveSlide,
        (KeyCode::Char('r'), KeyModifiers::NONE) => Action::Refresh,
        (KeyCode::Char('x'), KeyModifiers::NONE) => Action::Destroy,
        (KeyCode::Char('L'), _) => Action::ClearLog,

        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use glidetrack_core::AppConfig;
    use ratatui::layout::Rect;

    use super::*;
    use crate::theme::Theme;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app() -> App {
        App::new(
            Arc::new(AppConfig::default()),
            Rect::new(0, 0, 80, 24),
            Theme::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_navigation_keys() {
        let app = app();
        assert_eq!(handle_key_event(key(KeyCode::Right), &app), Action::Next);
        assert_eq!(handle_key_event(key(KeyCode::Char('h')), &app), Action::Prev);
        assert_eq!(handle_key_event(key(KeyCode::Up), &app), Action::None);
        assert_eq!(handle_key_event(key(KeyCode::Char('3')), &app), Action::GoTo(2));
        assert_eq!(
            handle_key_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL), &app),
            Action::Quit
        );
    }

    #[test]
    fn test_only_quit_after_destroy() {
        let mut app = app();
        app.handle_action(Action::Destroy);
        assert_eq!(handle_key_event(key(KeyCode::Char('l')), &app), Action::None);
        assert_eq!(handle_key_event(key(KeyCode::Char('q')), &app), Action::Quit);
    }
}
