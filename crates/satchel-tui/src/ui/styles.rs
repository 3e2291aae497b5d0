use ratatui::style::{Color, Modifier, Style};

/// Color palette for one theme. The account's dark_mode setting picks
/// which variant a frame is drawn with.
pub struct Palette {
    pub primary: Color,
    pub accent: Color,
    pub success: Color,
    pub error: Color,
    pub muted: Color,
    pub highlight: Color,
    pub text: Color,
}

pub fn palette(dark: bool) -> Palette {
    if dark {
        Palette {
            primary: Color::Rgb(129, 140, 248),
            accent: Color::Rgb(192, 160, 64),
            success: Color::Rgb(96, 160, 96),
            error: Color::Rgb(224, 96, 96),
            muted: Color::Rgb(128, 128, 128),
            highlight: Color::Rgb(48, 48, 72),
            text: Color::White,
        }
    } else {
        Palette {
            primary: Color::Rgb(79, 70, 229),
            accent: Color::Rgb(146, 110, 12),
            success: Color::Rgb(22, 120, 60),
            error: Color::Rgb(185, 28, 28),
            muted: Color::Rgb(107, 114, 128),
            highlight: Color::Rgb(209, 213, 219),
            text: Color::Black,
        }
    }
}

impl Palette {
    pub fn title_style(&self) -> Style {
        Style::default().fg(self.primary).add_modifier(Modifier::BOLD)
    }

    pub fn selected_style(&self) -> Style {
        Style::default().bg(self.highlight).add_modifier(Modifier::BOLD)
    }

    pub fn item_style(&self) -> Style {
        Style::default().fg(self.text)
    }

    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn accent_style(&self) -> Style {
        Style::default().fg(self.accent)
    }

    pub fn success_style(&self) -> Style {
        Style::default().fg(self.success)
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error)
    }

    pub fn tab_style(&self, selected: bool) -> Style {
        if selected {
            Style::default()
                .fg(self.primary)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(self.text)
        }
    }

    pub fn border_style(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.primary)
        } else {
            Style::default().fg(self.muted)
        }
    }

    /// Style for a text input field, highlighted when it has focus
    pub fn input_style(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.text).bg(self.highlight)
        } else {
            Style::default().fg(self.text)
        }
    }
}
