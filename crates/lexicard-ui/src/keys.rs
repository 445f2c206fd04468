use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

/// Terminal input reduced to what the pages and prompts react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Ctrl(char),
    Alt(char),
    Enter,
    Esc,
    Tab,
    BackTab,
    Backspace,
    Delete,
    Insert,
    Left,
    Right,
    Up,
    Down,
    CtrlLeft,
    CtrlRight,
    Home,
    End,
    PageUp,
    PageDown,
    F(u8),
    Click { x: u16, y: u16 },
    MiddleClick,
    WheelUp,
    WheelDown,
    Resize(u16, u16),
}

impl Key {
    pub fn from_key_event(key: KeyEvent) -> Option<Key> {
        if key.kind == KeyEventKind::Release {
            return None;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);

        let key = match key.code {
            KeyCode::Char(c) if ctrl => Key::Ctrl(c.to_ascii_lowercase()),
            KeyCode::Char(c) if alt => Key::Alt(c),
            KeyCode::Char(c) => Key::Char(c),
            KeyCode::Enter => Key::Enter,
            KeyCode::Esc => Key::Esc,
            KeyCode::Tab => Key::Tab,
            KeyCode::BackTab => Key::BackTab,
            KeyCode::Backspace if ctrl || alt => Key::Ctrl('w'),
            KeyCode::Backspace => Key::Backspace,
            KeyCode::Delete => Key::Delete,
            KeyCode::Insert => Key::Insert,
            KeyCode::Left if ctrl => Key::CtrlLeft,
            KeyCode::Right if ctrl => Key::CtrlRight,
            KeyCode::Left => Key::Left,
            KeyCode::Right => Key::Right,
            KeyCode::Up => Key::Up,
            KeyCode::Down => Key::Down,
            KeyCode::Home => Key::Home,
            KeyCode::End => Key::End,
            KeyCode::PageUp => Key::PageUp,
            KeyCode::PageDown => Key::PageDown,
            KeyCode::F(n) => Key::F(n),
            _ => return None,
        };
        Some(key)
    }

    pub fn from_mouse_event(mouse: MouseEvent) -> Option<Key> {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => Some(Key::Click {
                x: mouse.column,
                y: mouse.row,
            }),
            MouseEventKind::Down(MouseButton::Middle) => Some(Key::MiddleClick),
            MouseEventKind::ScrollUp => Some(Key::WheelUp),
            MouseEventKind::ScrollDown => Some(Key::WheelDown),
            _ => None,
        }
    }

    pub fn from_event(event: Event) -> Option<Key> {
        match event {
            Event::Key(key) => Key::from_key_event(key),
            Event::Mouse(mouse) => Key::from_mouse_event(mouse),
            Event::Resize(width, height) => Some(Key::Resize(width, height)),
            _ => None,
        }
    }

    /// Keys that abort a prompt or a running search.
    pub fn is_interrupt(&self) -> bool {
        matches!(self, Key::Ctrl('c') | Key::Esc)
    }
}

/// The 20 select keys, in the order of the entries they pick.
pub const SELECT_KEYS: &str = "1234567890!@#$%^&*()";

/// 1-based position of `c` among the select keys.
pub fn select_index(c: char) -> Option<usize> {
    SELECT_KEYS.chars().position(|k| k == c).map(|i| i + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> Option<Key> {
        Key::from_event(Event::Key(KeyEvent::new(code, modifiers)))
    }

    #[test]
    fn translates_key_presses() {
        assert_eq!(press(KeyCode::Char('j'), KeyModifiers::NONE), Some(Key::Char('j')));
        assert_eq!(press(KeyCode::Char('G'), KeyModifiers::SHIFT), Some(Key::Char('G')));
        assert_eq!(press(KeyCode::Char('t'), KeyModifiers::CONTROL), Some(Key::Ctrl('t')));
        assert_eq!(press(KeyCode::Char('b'), KeyModifiers::ALT), Some(Key::Alt('b')));
        assert_eq!(press(KeyCode::Left, KeyModifiers::CONTROL), Some(Key::CtrlLeft));
        assert_eq!(press(KeyCode::F(1), KeyModifiers::NONE), Some(Key::F(1)));
        assert_eq!(press(KeyCode::CapsLock, KeyModifiers::NONE), None);
    }

    #[test]
    fn translates_mouse_and_resize() {
        let click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 7,
            row: 3,
            modifiers: KeyModifiers::NONE,
        };
        assert_eq!(Key::from_event(Event::Mouse(click)), Some(Key::Click { x: 7, y: 3 }));
        assert_eq!(Key::from_event(Event::Resize(80, 24)), Some(Key::Resize(80, 24)));
    }

    #[test]
    fn select_keys_map_to_positions() {
        assert_eq!(select_index('1'), Some(1));
        assert_eq!(select_index('0'), Some(10));
        assert_eq!(select_index('!'), Some(11));
        assert_eq!(select_index(')'), Some(20));
        assert_eq!(select_index('a'), None);
    }
}
