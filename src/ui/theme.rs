use ratatui::style::{Color, Modifier, Style};

/// Colour theme for the TUI.
pub struct Theme {
    pub text: Color,
    pub dim: Color,
    pub accent: Color,
    pub border: Color,
    pub error: Color,
    pub button_fg: Color,
    pub button_bg: Color,
    pub tab_active_fg: Color,
    pub tab_active_bg: Color,
}

impl Theme {
    /// Greys with a sky-blue accent.
    pub fn crux() -> Self {
        Self {
            text: Color::Gray,
            dim: Color::DarkGray,
            accent: Color::Rgb(14, 165, 233),
            border: Color::DarkGray,
            error: Color::Rgb(239, 68, 68),
            button_fg: Color::White,
            button_bg: Color::Black,
            tab_active_fg: Color::Black,
            tab_active_bg: Color::White,
        }
    }

    /// Terminal default colours only.
    pub fn mono() -> Self {
        Self {
            text: Color::Reset,
            dim: Color::DarkGray,
            accent: Color::Reset,
            border: Color::Reset,
            error: Color::Reset,
            button_fg: Color::Reset,
            button_bg: Color::Reset,
            tab_active_fg: Color::Reset,
            tab_active_bg: Color::Reset,
        }
    }

    pub fn named(name: &str) -> Self {
        match name {
            "mono" => Self::mono(),
            _ => Self::crux(),
        }
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error).add_modifier(Modifier::BOLD)
    }

    pub fn button_style(&self, enabled: bool) -> Style {
        if enabled {
            Style::default()
                .fg(self.button_fg)
                .bg(self.button_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.dim)
        }
    }
}
