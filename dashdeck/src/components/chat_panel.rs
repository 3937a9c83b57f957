//! Conversational chat: model + key form, markdown history, composer

use crossterm::event::{KeyCode, KeyModifiers};
use dashdeck_core::KeySlot;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::status::{error_line, loading_line};
use super::{Component, KeyField, KeyFieldProps, TextInput, TextInputProps};
use crate::action::Action;
use crate::dispatch::EventKind;
use crate::markdown;
use crate::state::{CHAT_SUGGESTIONS, ChatField, ChatState};
use crate::theme;

pub const MESSAGE_PLACEHOLDER: &str = "Enter your message and press Enter ";
pub const MODEL_HINT: &str = "Please enter the model name regrading the latest official list";
pub const THINKING: &str = "Thinking…";

pub struct ChatPanelProps<'a> {
    pub chat: &'a ChatState,
    pub spinner: &'static str,
}

#[derive(Default)]
pub struct ChatPanel {
    key: KeyField,
    model: TextInput,
    message: TextInput,
    /// Rows scrolled up from the bottom of the history
    scroll_back: usize,
    seen_messages: usize,
}

impl ChatPanel {
    fn model_props<'a>(chat: &'a ChatState) -> TextInputProps<'a, Action> {
        TextInputProps {
            value: &chat.model,
            placeholder: "gemini-2.5-flash",
            label: "Model",
            is_focused: chat.focus == ChatField::Model,
            masked: false,
            on_change: Action::ChatModelChange,
            on_submit: |_| Action::FocusNext,
        }
    }

    fn message_props<'a>(chat: &'a ChatState) -> TextInputProps<'a, Action> {
        TextInputProps {
            value: &chat.input,
            placeholder: MESSAGE_PLACEHOLDER,
            label: "Message",
            is_focused: chat.focus == ChatField::Message,
            masked: false,
            on_change: Action::ChatInputChange,
            on_submit: |_| Action::ChatSend,
        }
    }

    fn history_lines(props: &ChatPanelProps<'_>) -> Vec<Line<'static>> {
        let theme = theme::current();
        let mut lines = Vec::new();
        for message in &props.chat.history {
            let (label, color) = if message.is_user() {
                ("You", theme.user)
            } else {
                ("Gemini", theme.assistant)
            };
            lines.push(Line::from(Span::styled(
                label,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )));
            lines.extend(markdown::render(&message.text));
            lines.push(Line::default());
        }
        if props.chat.is_loading() {
            lines.push(loading_line(props.spinner, THINKING));
        }
        lines
    }

    /// Rows `lines` occupy once wrapped to `width`.
    fn wrapped_rows(lines: &[Line<'_>], width: u16) -> usize {
        let width = usize::from(width.max(1));
        lines
            .iter()
            .map(|line| line.width().div_ceil(width).max(1))
            .sum()
    }
}

impl Component<Action> for ChatPanel {
    type Props<'a> = ChatPanelProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        let chat = props.chat;
        let EventKind::Key(key) = event else {
            return Vec::new();
        };

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('r') {
            return vec![Action::KeyRememberToggle(KeySlot::Chat)];
        }
        if key.modifiers.contains(KeyModifiers::ALT) {
            return match key.code {
                KeyCode::Char('1') => vec![Action::ChatSuggest(0)],
                KeyCode::Char('2') => vec![Action::ChatSuggest(1)],
                _ => Vec::new(),
            };
        }
        match key.code {
            KeyCode::Tab => return vec![Action::FocusNext],
            KeyCode::BackTab => return vec![Action::FocusPrev],
            KeyCode::PageUp => {
                self.scroll_back += 5;
                return Vec::new();
            }
            KeyCode::PageDown => {
                self.scroll_back = self.scroll_back.saturating_sub(5);
                return Vec::new();
            }
            _ => {}
        }

        match chat.focus {
            ChatField::ApiKey => self
                .key
                .handle_event(
                    event,
                    KeyFieldProps {
                        form: &chat.key,
                        is_focused: true,
                    },
                )
                .into_iter()
                .collect::<Vec<_>>(),
            ChatField::Model => self
                .model
                .handle_event(event, Self::model_props(chat))
                .into_iter()
                .collect::<Vec<_>>(),
            ChatField::Message => self
                .message
                .handle_event(event, Self::message_props(chat))
                .into_iter()
                .collect::<Vec<_>>(),
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let theme = theme::current();
        let chat = props.chat;

        let error_height = u16::from(chat.error.is_some());
        let [form_area, history_area, error_area, input_area, suggest_area] = Layout::vertical([
            Constraint::Length(KeyField::HEIGHT),
            Constraint::Min(3),
            Constraint::Length(error_height),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .areas(area);

        // ===== Model + key form =====
        let [model_col, key_col] =
            Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)])
                .areas(form_area);
        let [model_area, hint_area] =
            Layout::vertical([Constraint::Length(3), Constraint::Length(1)]).areas(model_col);
        self.model.render(frame, model_area, Self::model_props(chat));
        frame.render_widget(
            Paragraph::new(Span::styled(MODEL_HINT, theme.muted_style())),
            hint_area,
        );
        self.key.render(
            frame,
            key_col,
            KeyFieldProps {
                form: &chat.key,
                is_focused: chat.focus == ChatField::ApiKey,
            },
        );

        // ===== History =====
        if chat.history.len() != self.seen_messages {
            self.seen_messages = chat.history.len();
            self.scroll_back = 0;
        }
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border_style(false))
            .title(Span::styled(" Gemini Chat ", theme.title_style()));
        let inner = block.inner(history_area);
        let lines = Self::history_lines(&props);
        let max_scroll = Self::wrapped_rows(&lines, inner.width).saturating_sub(usize::from(inner.height));
        self.scroll_back = self.scroll_back.min(max_scroll);
        let offset = u16::try_from(max_scroll - self.scroll_back).unwrap_or(u16::MAX);
        frame.render_widget(
            Paragraph::new(lines)
                .block(block)
                .wrap(Wrap { trim: false })
                .scroll((offset, 0)),
            history_area,
        );

        if let Some(error) = &chat.error {
            frame.render_widget(Paragraph::new(error_line(error)), error_area);
        }

        // ===== Composer =====
        self.message.render(frame, input_area, Self::message_props(chat));

        let mut spans = Vec::new();
        for (i, suggestion) in CHAT_SUGGESTIONS.iter().enumerate() {
            spans.push(Span::styled(
                format!(" Alt+{} ", i + 1),
                Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled(suggestion.trim_end().to_string(), theme.muted_style()));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), suggest_area);
    }
}
