use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::game::CellId;
use crate::render::Renderer;

/// Keyboard shortcuts for the first sixteen cells, in cell order.
///
/// On the default four-column board they form the same 4x4 block as the
/// left-hand side of a QWERTY keyboard.
pub const CELL_KEYS: [char; 16] = [
    '1', '2', '3', '4', 'q', 'w', 'e', 'r', 'a', 's', 'd', 'f', 'z', 'x', 'c', 'v',
];

/// Shortcut key for `cell_id`, if it has one
pub fn key_for_cell(cell_id: CellId) -> Option<char> {
    CELL_KEYS.get(cell_id).copied()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Activate(CellId),
    Start,
    Quit,
    None,
}

pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        match key.code {
            KeyCode::Esc => KeyAction::Quit,
            KeyCode::Enter | KeyCode::Char(' ') => KeyAction::Start,
            KeyCode::Char(c) => {
                let c = c.to_ascii_lowercase();
                CELL_KEYS
                    .iter()
                    .position(|&key| key == c)
                    .map_or(KeyAction::None, KeyAction::Activate)
            }
            _ => KeyAction::None,
        }
    }

    /// Left clicks activate the cell under the pointer, as last drawn
    pub fn handle_mouse_event(&self, mouse: MouseEvent, renderer: &Renderer) -> KeyAction {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => renderer
                .cell_at(mouse.column, mouse.row)
                .map_or(KeyAction::None, KeyAction::Activate),
            _ => KeyAction::None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::layout::Rect;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn click(column: u16, row: u16, kind: MouseEventKind) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_cell_keys() {
        let handler = InputHandler::new();

        assert_eq!(
            handler.handle_key_event(key(KeyCode::Char('1'))),
            KeyAction::Activate(0)
        );
        assert_eq!(
            handler.handle_key_event(key(KeyCode::Char('q'))),
            KeyAction::Activate(4)
        );
        assert_eq!(
            handler.handle_key_event(key(KeyCode::Char('f'))),
            KeyAction::Activate(11)
        );
        assert_eq!(
            handler.handle_key_event(key(KeyCode::Char('v'))),
            KeyAction::Activate(15)
        );
    }

    #[test]
    fn test_cell_keys_uppercase() {
        let handler = InputHandler::new();

        let w_upper = KeyEvent::new(KeyCode::Char('W'), KeyModifiers::SHIFT);
        assert_eq!(handler.handle_key_event(w_upper), KeyAction::Activate(5));
    }

    #[test]
    fn test_start_keys() {
        let handler = InputHandler::new();

        assert_eq!(handler.handle_key_event(key(KeyCode::Enter)), KeyAction::Start);
        assert_eq!(
            handler.handle_key_event(key(KeyCode::Char(' '))),
            KeyAction::Start
        );
    }

    #[test]
    fn test_quit_keys() {
        let handler = InputHandler::new();

        assert_eq!(handler.handle_key_event(key(KeyCode::Esc)), KeyAction::Quit);

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handler.handle_key_event(ctrl_c), KeyAction::Quit);
    }

    #[test]
    fn test_unknown_key() {
        let handler = InputHandler::new();

        assert_eq!(
            handler.handle_key_event(key(KeyCode::Char('p'))),
            KeyAction::None
        );
        assert_eq!(handler.handle_key_event(key(KeyCode::Tab)), KeyAction::None);
    }

    #[test]
    fn test_key_for_cell() {
        assert_eq!(key_for_cell(0), Some('1'));
        assert_eq!(key_for_cell(6), Some('e'));
        assert_eq!(key_for_cell(16), None);
    }

    #[test]
    fn test_mouse_click_maps_through_renderer() {
        let handler = InputHandler::new();
        let mut renderer = Renderer::new();
        renderer.layout_board(Rect::new(0, 0, 80, 24), 12);
        let target = renderer.cell_rect(6).unwrap();

        let down = click(target.x + 1, target.y + 1, MouseEventKind::Down(MouseButton::Left));
        assert_eq!(handler.handle_mouse_event(down, &renderer), KeyAction::Activate(6));

        let right = click(target.x + 1, target.y + 1, MouseEventKind::Down(MouseButton::Right));
        assert_eq!(handler.handle_mouse_event(right, &renderer), KeyAction::None);

        let outside = click(0, 0, MouseEventKind::Down(MouseButton::Left));
        assert_eq!(handler.handle_mouse_event(outside, &renderer), KeyAction::None);
    }
}
