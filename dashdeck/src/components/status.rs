//! Loading and error lines shared by the panels

use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

use crate::theme;

pub const ERROR_ICON: &str = "⚠";

pub fn loading_line(spinner: &str, text: &str) -> Line<'static> {
    let theme = theme::current();
    Line::from(vec![
        Span::styled(format!("{spinner} "), Style::default().fg(theme.accent)),
        Span::styled(text.to_string(), theme.muted_style()),
    ])
}

pub fn error_line(message: &str) -> Line<'static> {
    let theme = theme::current();
    Line::from(Span::styled(format!("{ERROR_ICON} Error: {message}"), theme.error_style()))
}

pub fn heading(text: impl Into<String>) -> Line<'static> {
    let theme = theme::current();
    Line::from(Span::styled(
        text.into(),
        Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
    ))
}
