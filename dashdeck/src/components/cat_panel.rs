use crossterm::event::{KeyCode, KeyModifiers};
use dashdeck_core::CatRecord;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::Component;
use super::status::{error_line, heading, loading_line};
use crate::action::Action;
use crate::dispatch::EventKind;
use crate::state::{CatState, Load};
use crate::theme;

pub const HEADER: &str = "Daily Cat Dose";
pub const LOOKING: &str = "Looking for a cute cat...";

pub struct CatPanelProps<'a> {
    pub cats: &'a CatState,
    pub spinner: &'static str,
}

/// One random cat with its breed card. The image itself is linked, not drawn.
#[derive(Default)]
pub struct CatPanel;

impl CatPanel {
    fn field(label: &str, value: String) -> Line<'static> {
        let theme = theme::current();
        Line::from(vec![
            Span::styled(format!("{label}: "), theme.muted_style()),
            Span::styled(value, Style::default().fg(theme.text)),
        ])
    }

    fn card(cat: &CatRecord) -> Vec<Line<'static>> {
        let theme = theme::current();
        let mut lines = vec![
            Line::from(Span::styled(
                cat.breed_name().to_string(),
                Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
            )),
            Line::default(),
            Self::field("Image", cat.url.clone()),
        ];
        if let (Some(width), Some(height)) = (cat.width, cat.height) {
            lines.push(Self::field("Size", format!("{width} x {height}")));
        }
        if let Some(breed) = cat.breed() {
            if let Some(origin) = &breed.origin {
                lines.push(Self::field("Origin", origin.clone()));
            }
            if let Some(life_span) = &breed.life_span {
                lines.push(Self::field("Life span", format!("{life_span} yrs")));
            }
        }
        lines.push(Line::default());
        lines.push(Line::from(Span::raw(cat.description().to_string())));
        if let Some(temperament) = cat.breed().and_then(|b| b.temperament.as_ref()) {
            lines.push(Line::default());
            lines.push(Line::from(Span::styled(
                temperament.clone(),
                Style::default().fg(theme.link).add_modifier(Modifier::ITALIC),
            )));
        }
        lines
    }
}

impl Component<Action> for CatPanel {
    type Props<'a> = CatPanelProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        _props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        let EventKind::Key(key) = event else {
            return None;
        };
        if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
            return None;
        }
        match key.code {
            KeyCode::Char('n') | KeyCode::Char('r') | KeyCode::Enter => Some(Action::CatFetch),
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let theme = theme::current();
        let [header_area, body_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Min(3)]).areas(area);
        frame.render_widget(Paragraph::new(heading(HEADER)), header_area);

        let lines = match &props.cats.cat {
            Load::Idle => vec![Line::from(Span::styled(
                "Press n for a cat.",
                theme.muted_style(),
            ))],
            Load::Loading => vec![loading_line(props.spinner, LOOKING)],
            Load::Failed(message) => vec![error_line(message)],
            Load::Ready(cat) => Self::card(cat),
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border_style(false))
            .title(Span::styled(" n / r / Enter: next cat ", theme.muted_style()));
        frame.render_widget(
            Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
            body_area,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::testing::key_event;

    #[test]
    fn test_next_cat_keys() {
        let cats = CatState { cat: Load::Idle };
        let mut panel = CatPanel;
        for spec in ["n", "r", "enter"] {
            let actions: Vec<_> = panel
                .handle_event(
                    &key_event(spec),
                    CatPanelProps {
                        cats: &cats,
                        spinner: "◐",
                    },
                )
                .into_iter()
                .collect();
            assert_eq!(actions, vec![Action::CatFetch], "{spec}");
        }
        let none: Vec<_> = panel
            .handle_event(
                &key_event("ctrl+n"),
                CatPanelProps {
                    cats: &cats,
                    spinner: "◐",
                },
            )
            .into_iter()
            .collect();
        assert!(none.is_empty());
    }
}
