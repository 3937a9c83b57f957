use dashdeck_core::KeySlot;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use super::{Component, TextInput, TextInputProps};
use crate::action::Action;
use crate::dispatch::EventKind;
use crate::state::KeyForm;
use crate::theme;

pub struct KeyFieldProps<'a> {
    pub form: &'a KeyForm,
    pub is_focused: bool,
}

/// Masked API key input with its remember toggle.
///
/// Ctrl+R is routed by the owning panel so it works whichever field has
/// focus.
#[derive(Default)]
pub struct KeyField {
    input: TextInput,
}

impl KeyField {
    /// Rows needed: bordered input plus the remember line
    pub const HEIGHT: u16 = 4;

    fn on_change(slot: KeySlot) -> fn(String) -> Action {
        match slot {
            KeySlot::Chat => |v| Action::KeyChange(KeySlot::Chat, v),
            KeySlot::Places => |v| Action::KeyChange(KeySlot::Places, v),
        }
    }

    fn input_props<'a>(props: &KeyFieldProps<'a>) -> TextInputProps<'a, Action> {
        TextInputProps {
            value: &props.form.value,
            placeholder: "Paste your Gemini API Key",
            label: "Gemini API Key",
            is_focused: props.is_focused,
            masked: true,
            on_change: Self::on_change(props.form.slot),
            on_submit: |_| Action::FocusNext,
        }
    }
}

impl Component<Action> for KeyField {
    type Props<'a> = KeyFieldProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        let input_props = Self::input_props(&props);
        self.input.handle_event(event, input_props).into_iter().collect::<Vec<_>>()
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let theme = theme::current();
        let [input_area, toggle_area] =
            Layout::vertical([Constraint::Length(3), Constraint::Length(1)]).areas(area);

        let input_props = Self::input_props(&props);
        self.input.render(frame, input_area, input_props);

        let mark = if props.form.remember { "[x]" } else { "[ ]" };
        let toggle = Line::from(vec![
            Span::styled(
                format!(" {mark} "),
                Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
            ),
            Span::raw("Remember key on this machine "),
            Span::styled("(Ctrl+R)", theme.muted_style()),
        ]);
        frame.render_widget(Paragraph::new(toggle), toggle_area);
    }
}
