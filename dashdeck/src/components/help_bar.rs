use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use super::Component;
use crate::action::Action;
use crate::theme;

pub struct HelpBarProps<'a> {
    /// `(key, description)` pairs
    pub hints: &'a [(&'a str, &'a str)],
}

#[derive(Default)]
pub struct HelpBar;

impl Component<Action> for HelpBar {
    type Props<'a> = HelpBarProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let theme = theme::current();
        let key_style = Style::default().fg(theme.accent).add_modifier(Modifier::BOLD);

        let mut spans = Vec::with_capacity(props.hints.len() * 2);
        for (key, description) in props.hints {
            spans.push(Span::styled(format!(" {key}"), key_style));
            spans.push(Span::styled(format!(" {description} "), theme.muted_style()));
        }
        frame.render_widget(Paragraph::new(Line::from(spans).centered()), area);
    }
}
