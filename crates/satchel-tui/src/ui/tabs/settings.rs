use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, SettingsField};
use crate::ui::styles;

/// Render the Settings tab: dark mode toggle, username, save, and the
/// delete-account action.
pub fn render_settings(frame: &mut Frame, app: &App, area: Rect) {
    let palette = styles::palette(app.settings.dark_mode);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // dark mode
            Constraint::Length(3), // username
            Constraint::Length(3), // save
            Constraint::Length(3), // delete account
            Constraint::Min(0),
        ])
        .split(area);

    let dark_focus = app.settings_focus == SettingsField::DarkMode;
    let dark_value = if app.settings.dark_mode { "[x] on" } else { "[ ] off" };
    let dark_line = Line::from(vec![
        Span::styled("Dark Mode  ", palette.item_style()),
        Span::styled(dark_value, palette.accent_style()),
        Span::styled("  (Space to toggle)", palette.muted_style()),
    ]);
    frame.render_widget(
        Paragraph::new(dark_line).block(field_block(&palette, dark_focus)),
        chunks[0],
    );

    let name_focus = app.settings_focus == SettingsField::Username;
    let username = if name_focus {
        format!("{}_", app.settings.username)
    } else if app.settings.username.is_empty() {
        "(not set)".to_string()
    } else {
        app.settings.username.clone()
    };
    let name_line = Line::from(vec![
        Span::styled("Username   ", palette.item_style()),
        Span::styled(username, palette.input_style(name_focus)),
    ]);
    frame.render_widget(
        Paragraph::new(name_line).block(field_block(&palette, name_focus)),
        chunks[1],
    );

    let save_focus = app.settings_focus == SettingsField::Save;
    let save_line = Line::from(Span::styled(
        "Save Settings",
        if save_focus {
            palette.title_style()
        } else {
            palette.item_style()
        },
    ));
    frame.render_widget(
        Paragraph::new(save_line).block(field_block(&palette, save_focus)),
        chunks[2],
    );

    let delete_focus = app.settings_focus == SettingsField::DeleteAccount;
    let delete_line = Line::from(Span::styled("Delete Account", palette.error_style()));
    frame.render_widget(
        Paragraph::new(delete_line).block(field_block(&palette, delete_focus)),
        chunks[3],
    );

    let hint = Line::from(Span::styled(
        "Up/Down: move   Enter: activate",
        palette.muted_style(),
    ));
    frame.render_widget(Paragraph::new(hint), chunks[4]);
}

fn field_block(palette: &styles::Palette, focused: bool) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(palette.border_style(focused))
}
