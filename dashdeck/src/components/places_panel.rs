//! Search-grounded places lookup

use crossterm::event::{KeyCode, KeyModifiers};
use dashdeck_core::KeySlot;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::status::{error_line, heading, loading_line};
use super::{Component, KeyField, KeyFieldProps, TextInput, TextInputProps};
use crate::action::Action;
use crate::dispatch::EventKind;
use crate::markdown;
use crate::state::{Load, PlacesField, PlacesState};
use crate::theme;

pub const HEADER: &str = "✨ Location Information Search";
pub const INTRO_MARKDOWN: &str = "Enter any **location** or **point of interest keywords** you'd like to know about \n \n Gemini will help you organize a clear list of places.";
pub const SEARCHING: &str = "AI is analyzing Google search results, please wait...";

pub struct PlacesPanelProps<'a> {
    pub places: &'a PlacesState,
    pub spinner: &'static str,
}

#[derive(Default)]
pub struct PlacesPanel {
    key: KeyField,
    query: TextInput,
    scroll: u16,
}

impl PlacesPanel {
    fn query_props<'a>(places: &'a PlacesState) -> TextInputProps<'a, Action> {
        TextInputProps {
            value: &places.query,
            placeholder: "e.g. Taipei Xinyi District cafe",
            label: "Search",
            is_focused: places.focus == PlacesField::Query,
            masked: false,
            on_change: Action::PlacesQueryChange,
            on_submit: |_| Action::PlacesSearch,
        }
    }
}

impl Component<Action> for PlacesPanel {
    type Props<'a> = PlacesPanelProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        let places = props.places;
        let EventKind::Key(key) = event else {
            return Vec::new();
        };

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('r') {
            return vec![Action::KeyRememberToggle(KeySlot::Places)];
        }
        match key.code {
            KeyCode::Tab => return vec![Action::FocusNext],
            KeyCode::BackTab => return vec![Action::FocusPrev],
            KeyCode::PageUp => {
                self.scroll = self.scroll.saturating_sub(5);
                return Vec::new();
            }
            KeyCode::PageDown => {
                self.scroll = self.scroll.saturating_add(5);
                return Vec::new();
            }
            _ => {}
        }

        if places.key_focused() {
            self.key
                .handle_event(
                    event,
                    KeyFieldProps {
                        form: &places.key,
                        is_focused: true,
                    },
                )
                .into_iter()
                .collect::<Vec<_>>()
        } else {
            self.query
                .handle_event(event, Self::query_props(places))
                .into_iter()
                .collect::<Vec<_>>()
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let theme = theme::current();
        let places = props.places;

        let intro = markdown::render(INTRO_MARKDOWN);
        let intro_height = u16::try_from(intro.len()).unwrap_or(u16::MAX);
        let [header_area, intro_area, key_area, query_area, result_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(intro_height),
            Constraint::Length(KeyField::HEIGHT),
            Constraint::Length(3),
            Constraint::Min(3),
        ])
        .areas(area);

        frame.render_widget(Paragraph::new(heading(HEADER)), header_area);
        frame.render_widget(Paragraph::new(intro).wrap(Wrap { trim: true }), intro_area);
        self.key.render(
            frame,
            key_area,
            KeyFieldProps {
                form: &places.key,
                is_focused: places.key_focused(),
            },
        );
        self.query.render(frame, query_area, Self::query_props(places));

        let lines: Vec<Line<'static>> = match &places.result {
            Load::Idle => vec![Line::from(Span::styled(
                "Press Enter to search.",
                theme.muted_style(),
            ))],
            Load::Loading => {
                self.scroll = 0;
                vec![loading_line(props.spinner, SEARCHING)]
            }
            Load::Failed(message) => vec![error_line(message)],
            Load::Ready(text) => markdown::render(text),
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border_style(false))
            .title(Span::styled(" Results ", theme.title_style()));
        frame.render_widget(
            Paragraph::new(lines)
                .block(block)
                .wrap(Wrap { trim: false })
                .scroll((self.scroll, 0)),
            result_area,
        );
    }
}
