use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

/// Pixels scrolled by one wheel notch or one j/k press
pub const WHEEL_STEP_PX: f64 = 100.0;

/// Input action that can be performed
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Quit,
    /// Wheel delta in pixels, positive scrolls down
    Wheel(f64),
    PageDown,
    PageUp,
    JumpToTop,
    JumpToBottom,
    /// Left button pressed on a terminal row
    TouchStart(u16),
    /// Left button dragged to a terminal row
    TouchMove(u16),
    TouchEnd,
    None,
}

/// Handle a key event and return the corresponding action
pub fn handle_key_event(key: KeyEvent) -> Action {
    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), KeyModifiers::NONE) => Action::Quit,
        (KeyCode::Esc, _) => Action::Quit,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,

        (KeyCode::Char('j'), KeyModifiers::NONE) | (KeyCode::Down, _) => {
            Action::Wheel(WHEEL_STEP_PX)
        }
        (KeyCode::Char('k'), KeyModifiers::NONE) | (KeyCode::Up, _) => {
            Action::Wheel(-WHEEL_STEP_PX)
        }

        (KeyCode::Char('d'), KeyModifiers::CONTROL)
        | (KeyCode::PageDown, _)
        | (KeyCode::Char(' '), KeyModifiers::NONE) => Action::PageDown,
        (KeyCode::Char('u'), KeyModifiers::CONTROL) | (KeyCode::PageUp, _) => Action::PageUp,

        (KeyCode::Char('g'), KeyModifiers::NONE) | (KeyCode::Home, _) => Action::JumpToTop,
        (KeyCode::Char('G'), _) | (KeyCode::End, _) => Action::JumpToBottom,

        _ => Action::None,
    }
}

/// Map mouse input onto wheel and touch gestures. A left-button drag stands
/// in for a touch drag.
pub fn handle_mouse_event(mouse: MouseEvent) -> Action {
    match mouse.kind {
        MouseEventKind::ScrollDown => Action::Wheel(WHEEL_STEP_PX),
        MouseEventKind::ScrollUp => Action::Wheel(-WHEEL_STEP_PX),
        MouseEventKind::Down(MouseButton::Left) => Action::TouchStart(mouse.row),
        MouseEventKind::Drag(MouseButton::Left) => Action::TouchMove(mouse.row),
        MouseEventKind::Up(MouseButton::Left) => Action::TouchEnd,
        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn mouse(kind: MouseEventKind, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column: 0,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_scroll_keys() {
        assert_eq!(handle_key_event(key(KeyCode::Char('j'))), Action::Wheel(WHEEL_STEP_PX));
        assert_eq!(handle_key_event(key(KeyCode::Up)), Action::Wheel(-WHEEL_STEP_PX));
        assert_eq!(handle_key_event(key(KeyCode::Char('g'))), Action::JumpToTop);
        assert_eq!(
            handle_key_event(KeyEvent::new(KeyCode::Char('G'), KeyModifiers::SHIFT)),
            Action::JumpToBottom
        );
        assert_eq!(handle_key_event(key(KeyCode::Char('q'))), Action::Quit);
        assert_eq!(handle_key_event(key(KeyCode::Char('x'))), Action::None);
    }

    #[test]
    fn test_mouse_maps_to_wheel_and_touch() {
        assert_eq!(
            handle_mouse_event(mouse(MouseEventKind::ScrollDown, 3)),
            Action::Wheel(WHEEL_STEP_PX)
        );
        assert_eq!(
            handle_mouse_event(mouse(MouseEventKind::Down(MouseButton::Left), 7)),
            Action::TouchStart(7)
        );
        assert_eq!(
            handle_mouse_event(mouse(MouseEventKind::Drag(MouseButton::Left), 5)),
            Action::TouchMove(5)
        );
        assert_eq!(
            handle_mouse_event(mouse(MouseEventKind::Drag(MouseButton::Right), 5)),
            Action::None
        );
    }
}
