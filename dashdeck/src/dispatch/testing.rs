//! Helpers for component and render tests
//!
//! ```ignore
//! let mut screen = RenderHarness::new(80, 12);
//! let text = screen.render_to_string_plain(|frame| panel.render(frame, frame.area(), props));
//! assert!(text.contains("36-Hour Forecast"));
//! ```

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{Frame, Terminal, backend::TestBackend};

use super::terminal::EventKind;

const NAMED_KEYS: [(&str, KeyCode); 14] = [
    ("esc", KeyCode::Esc),
    ("enter", KeyCode::Enter),
    ("tab", KeyCode::Tab),
    ("backtab", KeyCode::BackTab),
    ("backspace", KeyCode::Backspace),
    ("delete", KeyCode::Delete),
    ("left", KeyCode::Left),
    ("right", KeyCode::Right),
    ("up", KeyCode::Up),
    ("down", KeyCode::Down),
    ("home", KeyCode::Home),
    ("end", KeyCode::End),
    ("pageup", KeyCode::PageUp),
    ("pagedown", KeyCode::PageDown),
];

/// Build a key press from `"n"`, `"enter"`, `"f3"`, `"ctrl+r"` or
/// `"alt+1"`. Panics on anything else.
pub fn key(spec: &str) -> KeyEvent {
    let mut modifiers = KeyModifiers::NONE;
    let mut rest = spec;
    loop {
        if let Some(tail) = rest.strip_prefix("ctrl+") {
            modifiers |= KeyModifiers::CONTROL;
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix("alt+") {
            modifiers |= KeyModifiers::ALT;
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix("shift+") {
            modifiers |= KeyModifiers::SHIFT;
            rest = tail;
        } else {
            break;
        }
    }

    let mut chars = rest.chars();
    let code = match (chars.next(), chars.next()) {
        (Some(c), None) => KeyCode::Char(c),
        _ => match NAMED_KEYS.iter().find(|(name, _)| *name == rest) {
            Some((_, code)) => *code,
            None => match rest.strip_prefix('f').and_then(|n| n.parse().ok()) {
                Some(n) => KeyCode::F(n),
                None => panic!("unknown key {spec:?}"),
            },
        },
    };
    // Terminals report Shift+Tab as its own key
    if code == KeyCode::Tab && modifiers.contains(KeyModifiers::SHIFT) {
        return KeyEvent::new(KeyCode::BackTab, modifiers);
    }
    KeyEvent::new(code, modifiers)
}

pub fn key_event(spec: &str) -> EventKind {
    EventKind::Key(key(spec))
}

/// An in-memory terminal for render tests.
pub struct RenderHarness {
    terminal: Terminal<TestBackend>,
}

impl RenderHarness {
    pub fn new(width: u16, height: u16) -> Self {
        match Terminal::new(TestBackend::new(width, height)) {
            Ok(terminal) => Self { terminal },
            Err(e) => panic!("test terminal: {e}"),
        }
    }

    /// Draw once and return the screen as text: one line per row, trailing
    /// blanks trimmed, styles dropped. A wide character's second cell reads
    /// as a space.
    pub fn render_to_string_plain(&mut self, draw: impl FnOnce(&mut Frame)) -> String {
        if let Err(e) = self.terminal.draw(draw) {
            panic!("test draw: {e}");
        }
        let buffer = self.terminal.backend().buffer();
        let width = usize::from(buffer.area.width.max(1));
        buffer
            .content()
            .chunks(width)
            .map(|row| {
                let line: String = row.iter().map(|cell| cell.symbol()).collect();
                format!("{}\n", line.trim_end())
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::widgets::Paragraph;

    #[test]
    fn test_key_specs() {
        assert_eq!(key("n"), KeyEvent::new(KeyCode::Char('n'), KeyModifiers::NONE));
        assert_eq!(key("enter").code, KeyCode::Enter);
        assert_eq!(key("f5").code, KeyCode::F(5));
        assert_eq!(key("f").code, KeyCode::Char('f'));
        assert_eq!(key("shift+tab").code, KeyCode::BackTab);

        let chord = key("ctrl+alt+r");
        assert_eq!(chord.code, KeyCode::Char('r'));
        assert_eq!(chord.modifiers, KeyModifiers::CONTROL | KeyModifiers::ALT);
    }

    #[test]
    #[should_panic(expected = "unknown key")]
    fn test_unknown_key_panics() {
        key("hyper");
    }

    #[test]
    fn test_plain_render_trims_rows() {
        let mut screen = RenderHarness::new(8, 2);
        let text = screen.render_to_string_plain(|frame| {
            frame.render_widget(Paragraph::new("dash"), frame.area());
        });
        assert_eq!(text, "dash\n\n");
    }
}
