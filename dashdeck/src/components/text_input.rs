//! Single-line text input

use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::Component;
use crate::dispatch::EventKind;
use crate::theme;

const MASK: char = '•';

pub struct TextInputProps<'a, A> {
    pub value: &'a str,
    /// Shown dimmed while the value is empty
    pub placeholder: &'a str,
    /// Block title
    pub label: &'a str,
    pub is_focused: bool,
    /// Render every character as a bullet
    pub masked: bool,
    pub on_change: fn(String) -> A,
    pub on_submit: fn(String) -> A,
}

/// Typing, backspace, delete and cursor movement over a value owned by the
/// store. Emits `on_change` per edit and `on_submit` on Enter.
#[derive(Default)]
pub struct TextInput {
    /// Cursor position in chars
    cursor: usize,
    /// Value as of the last event; a different incoming value (cleared by a
    /// send, loaded from the key store) moves the cursor to the end
    seen: String,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    fn sync(&mut self, value: &str) {
        if self.seen != value {
            self.cursor = value.chars().count();
            self.seen = value.to_string();
        }
        self.cursor = self.cursor.min(value.chars().count());
    }

    fn byte_at(value: &str, char_index: usize) -> usize {
        value
            .char_indices()
            .nth(char_index)
            .map_or(value.len(), |(i, _)| i)
    }

    fn edited(&mut self, value: String) -> String {
        self.seen = value.clone();
        value
    }

    fn insert_char(&mut self, value: &str, c: char) -> String {
        let at = Self::byte_at(value, self.cursor);
        let mut new_value = String::with_capacity(value.len() + c.len_utf8());
        new_value.push_str(&value[..at]);
        new_value.push(c);
        new_value.push_str(&value[at..]);
        self.cursor += 1;
        self.edited(new_value)
    }

    fn delete_char_before(&mut self, value: &str) -> Option<String> {
        if self.cursor == 0 {
            return None;
        }
        let start = Self::byte_at(value, self.cursor - 1);
        let end = Self::byte_at(value, self.cursor);
        self.cursor -= 1;
        Some(self.edited(format!("{}{}", &value[..start], &value[end..])))
    }

    fn delete_char_at(&mut self, value: &str) -> Option<String> {
        if self.cursor >= value.chars().count() {
            return None;
        }
        let start = Self::byte_at(value, self.cursor);
        let end = Self::byte_at(value, self.cursor + 1);
        Some(self.edited(format!("{}{}", &value[..start], &value[end..])))
    }
}

impl<A> Component<A> for TextInput {
    type Props<'a> = TextInputProps<'a, A>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = A> {
        if !props.is_focused {
            return None;
        }
        self.sync(props.value);

        let EventKind::Key(key) = event else {
            return None;
        };

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('a') => {
                    self.cursor = 0;
                    None
                }
                KeyCode::Char('e') => {
                    self.cursor = props.value.chars().count();
                    None
                }
                KeyCode::Char('u') => {
                    self.cursor = 0;
                    Some((props.on_change)(self.edited(String::new())))
                }
                _ => None,
            };
        }
        if key.modifiers.contains(KeyModifiers::ALT) {
            return None;
        }

        match key.code {
            KeyCode::Char(c) => {
                let new_value = self.insert_char(props.value, c);
                Some((props.on_change)(new_value))
            }
            KeyCode::Backspace => self
                .delete_char_before(props.value)
                .map(|v| (props.on_change)(v)),
            KeyCode::Delete => self.delete_char_at(props.value).map(|v| (props.on_change)(v)),
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                None
            }
            KeyCode::Right => {
                self.cursor = (self.cursor + 1).min(props.value.chars().count());
                None
            }
            KeyCode::Home => {
                self.cursor = 0;
                None
            }
            KeyCode::End => {
                self.cursor = props.value.chars().count();
                None
            }
            KeyCode::Enter => Some((props.on_submit)(props.value.to_string())),
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let theme = theme::current();
        self.sync(props.value);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border_style(props.is_focused))
            .title(Span::styled(format!(" {} ", props.label), theme.muted_style()));
        let inner = block.inner(area);
        frame.render_widget(block, area);
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        if props.value.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled(props.placeholder, theme.muted_style())),
                inner,
            );
            if props.is_focused {
                frame.set_cursor_position((inner.x, inner.y));
            }
            return;
        }

        let shown: Vec<char> = if props.masked {
            vec![MASK; props.value.chars().count()]
        } else {
            props.value.chars().collect()
        };

        // Scroll horizontally so the cursor stays visible
        let width = |chars: &[char]| Span::raw(chars.iter().collect::<String>()).width();
        let mut start = 0;
        while start < self.cursor && width(&shown[start..self.cursor]) >= inner.width as usize {
            start += 1;
        }
        let visible: String = shown[start..].iter().collect();
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(visible, Style::default().fg(theme.text)))),
            inner,
        );

        if props.is_focused {
            let cursor_x = inner.x + width(&shown[start..self.cursor]) as u16;
            if cursor_x < inner.x + inner.width {
                frame.set_cursor_position((cursor_x, inner.y));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::testing::{RenderHarness, key};

    #[derive(Debug, Clone, PartialEq)]
    enum TestAction {
        Change(String),
        Submit(String),
    }

    fn props(value: &str) -> TextInputProps<'_, TestAction> {
        TextInputProps {
            value,
            placeholder: "type here",
            label: "City",
            is_focused: true,
            masked: false,
            on_change: TestAction::Change,
            on_submit: TestAction::Submit,
        }
    }

    fn press(input: &mut TextInput, spec: &str, value: &str) -> Vec<TestAction> {
        input
            .handle_event(&EventKind::Key(key(spec)), props(value))
            .into_iter()
            .collect()
    }

    #[test]
    fn test_typing_appends_at_end_of_existing_value() {
        let mut input = TextInput::new();
        assert_eq!(press(&mut input, "!", "hello"), vec![TestAction::Change("hello!".into())]);
    }

    #[test]
    fn test_multibyte_editing() {
        let mut input = TextInput::new();
        assert_eq!(press(&mut input, "backspace", "臺北市"), vec![TestAction::Change("臺北".into())]);

        assert!(press(&mut input, "left", "臺北").is_empty());
        assert_eq!(press(&mut input, "x", "臺北"), vec![TestAction::Change("臺x北".into())]);
        assert_eq!(press(&mut input, "delete", "臺x北"), vec![TestAction::Change("臺x".into())]);
    }

    #[test]
    fn test_home_then_backspace_is_noop() {
        let mut input = TextInput::new();
        assert!(press(&mut input, "home", "abc").is_empty());
        assert!(press(&mut input, "backspace", "abc").is_empty());
    }

    #[test]
    fn test_ctrl_u_clears_and_enter_submits() {
        let mut input = TextInput::new();
        assert_eq!(press(&mut input, "ctrl+u", "2330"), vec![TestAction::Change(String::new())]);
        assert_eq!(press(&mut input, "enter", "0050"), vec![TestAction::Submit("0050".into())]);
    }

    #[test]
    fn test_unfocused_ignores_keys() {
        let mut input = TextInput::new();
        let mut p = props("abc");
        p.is_focused = false;
        let actions: Vec<_> = input
            .handle_event(&EventKind::Key(key("x")), p)
            .into_iter()
            .collect();
        assert!(actions.is_empty());
    }

    #[test]
    fn test_render_masked_and_placeholder() {
        let mut render = RenderHarness::new(20, 3);
        let mut input = TextInput::new();
        let output = render.render_to_string_plain(|frame| {
            let mut p = props("secret");
            p.masked = true;
            input.render(frame, frame.area(), p);
        });
        assert!(output.contains("••••••"));
        assert!(!output.contains("secret"));
        assert!(output.contains("City"));

        let output = render.render_to_string_plain(|frame| {
            input.render(frame, frame.area(), props(""));
        });
        assert!(output.contains("type here"));
    }
}
