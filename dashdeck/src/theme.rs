//! Colors shared by every component
//!
//! `main` installs a theme once before the first render; components read it
//! with [`current`]. Without an install (tests) the default theme applies.

use std::sync::OnceLock;

use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub accent: Color,
    pub muted: Color,
    pub text: Color,
    pub user: Color,
    pub assistant: Color,
    pub link: Color,
    pub code: Color,
    pub error: Color,
    /// Price rose (exchange convention: red)
    pub up: Color,
    /// Price fell (exchange convention: green)
    pub down: Color,
    pub border: Color,
    pub border_focused: Color,
}

impl Theme {
    pub const DEFAULT: Theme = Theme {
        accent: Color::Cyan,
        muted: Color::DarkGray,
        text: Color::White,
        user: Color::LightBlue,
        assistant: Color::LightMagenta,
        link: Color::Blue,
        code: Color::Rgb(220, 180, 100),
        error: Color::LightRed,
        up: Color::Red,
        down: Color::Green,
        border: Color::DarkGray,
        border_focused: Color::Cyan,
    };

    /// No color at all, for terminals that honor `NO_COLOR`.
    pub const MONOCHROME: Theme = Theme {
        accent: Color::Reset,
        muted: Color::Reset,
        text: Color::Reset,
        user: Color::Reset,
        assistant: Color::Reset,
        link: Color::Reset,
        code: Color::Reset,
        error: Color::Reset,
        up: Color::Reset,
        down: Color::Reset,
        border: Color::Reset,
        border_focused: Color::Reset,
    };

    pub fn border_style(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.border_focused)
        } else {
            Style::default().fg(self.border)
        }
    }

    pub fn title_style(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error).add_modifier(Modifier::BOLD)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::DEFAULT
    }
}

static THEME: OnceLock<Theme> = OnceLock::new();

/// Install the process-wide theme. Later calls are ignored and return false.
pub fn install(theme: Theme) -> bool {
    THEME.set(theme).is_ok()
}

pub fn current() -> &'static Theme {
    THEME.get().unwrap_or(&Theme::DEFAULT)
}
