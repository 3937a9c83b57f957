use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Tabs,
};

use super::Component;
use crate::action::Action;
use crate::dispatch::EventKind;
use crate::state::PanelId;
use crate::theme;

pub struct TabBarProps {
    pub active: PanelId,
    /// Spinner frame shown next to the active tab while it loads
    pub spinner: Option<&'static str>,
}

/// Panel switcher: F1-F5 select, Ctrl+Left/Right cycle.
#[derive(Default)]
pub struct TabBar;

impl Component<Action> for TabBar {
    type Props<'a> = TabBarProps;

    fn handle_event(
        &mut self,
        event: &EventKind,
        _props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        let EventKind::Key(key) = event else {
            return None;
        };
        match key.code {
            KeyCode::F(n @ 1..=5) => PanelId::from_index(usize::from(n) - 1).map(Action::PanelSelect),
            KeyCode::Left if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Action::PanelPrev),
            KeyCode::Right if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Action::PanelNext),
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let theme = theme::current();
        let titles = PanelId::ALL.iter().map(|id| {
            let mut spans = vec![
                Span::styled(format!("F{} ", id.index() + 1), theme.muted_style()),
                Span::raw(id.title()),
            ];
            if *id == props.active {
                if let Some(glyph) = props.spinner {
                    spans.push(Span::styled(format!(" {glyph}"), Style::default().fg(theme.accent)));
                }
            }
            Line::from(spans)
        });

        let tabs = Tabs::new(titles)
            .select(props.active.index())
            .style(Style::default().fg(theme.text))
            .highlight_style(
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED),
            )
            .divider(Span::styled("│", theme.muted_style()));
        frame.render_widget(tabs, area);
    }
}
