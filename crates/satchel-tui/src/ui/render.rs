use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, AppState, ContactField, LoginFocus, LoginMode, Tab, FILTER_GROUPS};
use crate::gate::GateDecision;

use super::styles::{self, Palette};
use super::tabs::{contacts, favourites, search, settings};

pub fn render(frame: &mut Frame, app: &App) {
    match app.gate {
        GateDecision::Loading => render_loading(frame, app),
        GateDecision::Login => render_login(frame, app),
        GateDecision::Dashboard => render_dashboard(frame, app),
    }

    // Overlays on top of whichever screen the gate allowed
    match app.state {
        AppState::EditingContact => render_contact_form(frame, app),
        AppState::ShowingFilters => render_filter_panel(frame, app),
        AppState::ShowingHelp => render_help_overlay(frame, app),
        AppState::ConfirmingDeleteContact => render_confirm(
            frame,
            app,
            "Delete Contact",
            "Are you sure you want to delete this contact?",
        ),
        AppState::ConfirmingDeleteAccount => render_confirm(
            frame,
            app,
            "Delete Account",
            "This permanently deletes your account and all of its data.",
        ),
        AppState::ConfirmingQuit => render_confirm(frame, app, "Quit", "Quit satchel?"),
        AppState::Normal | AppState::Quitting => {}
    }
}

// ============================================================================
// Screens
// ============================================================================

fn render_loading(frame: &mut Frame, app: &App) {
    let palette = styles::palette(app.settings.dark_mode);
    let area = centered_rect(40, 20, frame.area());
    let lines = vec![
        Line::default(),
        Line::from(Span::styled("satchel", palette.title_style())).centered(),
        Line::from(Span::styled("Resolving session...", palette.muted_style())).centered(),
    ];
    frame.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL)),
        area,
    );
}

fn render_login(frame: &mut Frame, app: &App) {
    let palette = styles::palette(app.settings.dark_mode);
    let area = centered_rect(50, 60, frame.area());
    frame.render_widget(Clear, area);

    let title = match app.login_mode {
        LoginMode::SignIn => " LOG IN ",
        LoginMode::Register => " REGISTER ",
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(1), // spacer
            Constraint::Length(3), // email
            Constraint::Length(3), // password
            Constraint::Length(3), // submit
            Constraint::Length(1), // error
            Constraint::Min(1),    // hints
        ])
        .split(area);

    frame.render_widget(
        Block::default()
            .borders(Borders::ALL)
            .border_style(palette.border_style(true))
            .title(title),
        area,
    );

    render_login_field(
        frame,
        &palette,
        chunks[1],
        "Email",
        &app.login_email,
        app.login_focus == LoginFocus::Email,
        false,
    );
    render_login_field(
        frame,
        &palette,
        chunks[2],
        "Password",
        &app.login_password,
        app.login_focus == LoginFocus::Password,
        true,
    );

    let submit_label = match app.login_mode {
        LoginMode::SignIn => "[ Login ]",
        LoginMode::Register => "[ Create account ]",
    };
    let submit_style = if app.login_focus == LoginFocus::Submit {
        palette.title_style()
    } else {
        palette.item_style()
    };
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(submit_label, submit_style))).centered(),
        chunks[3],
    );

    if let Some(error) = &app.login_error {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(error.clone(), palette.error_style())))
                .centered(),
            chunks[4],
        );
    }

    let toggle_hint = match app.login_mode {
        LoginMode::SignIn => "Ctrl+R: create an account instead",
        LoginMode::Register => "Ctrl+R: back to login",
    };
    let hints = vec![
        Line::from(Span::styled(
            "Tab: next field   Enter: submit",
            palette.muted_style(),
        ))
        .centered(),
        Line::from(Span::styled(toggle_hint, palette.muted_style())).centered(),
    ];
    frame.render_widget(Paragraph::new(hints), chunks[5]);
}

fn render_login_field(
    frame: &mut Frame,
    palette: &Palette,
    area: Rect,
    label: &str,
    value: &str,
    focused: bool,
    mask: bool,
) {
    let shown = if mask {
        "*".repeat(value.chars().count())
    } else {
        value.to_string()
    };
    let text = if focused {
        format!("{shown}_")
    } else {
        shown
    };
    let paragraph = Paragraph::new(Line::from(Span::styled(
        text,
        palette.input_style(focused),
    )))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(palette.border_style(focused))
            .title(format!(" {label} ")),
    );
    frame.render_widget(paragraph, area);
}

fn render_dashboard(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Length(3), // Tabs
            Constraint::Min(10),   // Main content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_tabs(frame, app, chunks[1]);
    render_main_content(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let palette = styles::palette(app.settings.dark_mode);

    let title = "  satchel";
    let welcome = match app.display_name() {
        Some(name) => format!("Welcome, {name}!  "),
        None => String::new(),
    };
    let hint = "[?] Help  [Ctrl+L] Logout  ";

    let pad = area
        .width
        .saturating_sub((title.len() + welcome.len() + hint.len()) as u16)
        as usize;
    let line = Line::from(vec![
        Span::styled(title, palette.title_style()),
        Span::raw(" ".repeat(pad)),
        Span::styled(welcome, palette.item_style()),
        Span::styled(hint, palette.muted_style()),
    ]);

    let block = Block::default().borders(Borders::BOTTOM);
    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let palette = styles::palette(app.settings.dark_mode);

    let mut spans = vec![Span::raw("  ")];
    for tab in Tab::all() {
        spans.push(Span::styled(
            tab.title(),
            palette.tab_style(tab == app.current_tab),
        ));
        spans.push(Span::raw("   "));
    }

    let block = Block::default().borders(Borders::BOTTOM);
    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    match app.current_tab {
        Tab::Contacts => contacts::render_contacts(frame, app, area),
        Tab::Search => search::render_search(frame, app, area),
        Tab::Favourites => favourites::render_favourites(frame, app, area),
        Tab::Settings => settings::render_settings(frame, app, area),
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let palette = styles::palette(app.settings.dark_mode);

    let line = match &app.status_message {
        Some(message) => Line::from(Span::styled(
            format!("  {message}"),
            palette.accent_style(),
        )),
        None => Line::from(Span::styled(
            "  Tab: switch tabs   q: quit   ?: help",
            palette.muted_style(),
        )),
    };

    let block = Block::default().borders(Borders::TOP);
    frame.render_widget(Paragraph::new(line).block(block), area);
}

// ============================================================================
// Overlays
// ============================================================================

fn render_contact_form(frame: &mut Frame, app: &App) {
    let palette = styles::palette(app.settings.dark_mode);
    let area = centered_rect(50, 50, frame.area());
    frame.render_widget(Clear, area);

    let title = if app.contact_form.is_editing() {
        " Update Contact "
    } else {
        " New Contact "
    };
    frame.render_widget(
        Block::default()
            .borders(Borders::ALL)
            .border_style(palette.border_style(true))
            .title(title),
        area,
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
        ])
        .split(area);

    let fields = [
        ("First Name", &app.contact_form.first_name, ContactField::First),
        ("Last Name", &app.contact_form.last_name, ContactField::Last),
        ("Email", &app.contact_form.email, ContactField::Email),
    ];
    for (i, (label, value, field)) in fields.into_iter().enumerate() {
        let focused = app.contact_form.focus == Some(field);
        let text = if focused {
            format!("{value}_")
        } else {
            value.to_string()
        };
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(text, palette.input_style(focused)))).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(palette.border_style(focused))
                    .title(format!(" {label} ")),
            ),
            chunks[i],
        );
    }

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            "Tab: next field   Enter: save   Esc: cancel",
            palette.muted_style(),
        )))
        .centered(),
        chunks[3],
    );
}

fn render_filter_panel(frame: &mut Frame, app: &App) {
    let palette = styles::palette(app.settings.dark_mode);
    let area = centered_rect(80, 70, frame.area());
    frame.render_widget(Clear, area);

    frame.render_widget(
        Block::default()
            .borders(Borders::ALL)
            .border_style(palette.border_style(true))
            .title(" Search Filters (Space: toggle, c: clear all, Esc: close) "),
        area,
    );

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .margin(1)
        .constraints([Constraint::Percentage(20); 5])
        .split(area);

    for (group, (name, options)) in FILTER_GROUPS.iter().enumerate() {
        let mut lines = vec![
            Line::from(Span::styled(
                *name,
                if group == app.filters.group {
                    palette.title_style()
                } else {
                    palette.muted_style()
                },
            )),
            Line::default(),
        ];
        for (index, option) in options.iter().enumerate() {
            let mark = if app.filters.is_selected(group, index) {
                "[x] "
            } else {
                "[ ] "
            };
            let style = if group == app.filters.group && index == app.filters.index {
                palette.selected_style()
            } else {
                palette.item_style()
            };
            lines.push(Line::from(Span::styled(format!("{mark}{option}"), style)));
        }
        frame.render_widget(Paragraph::new(lines), columns[group]);
    }
}

fn render_help_overlay(frame: &mut Frame, app: &App) {
    let palette = styles::palette(app.settings.dark_mode);
    let area = centered_rect(60, 70, frame.area());
    frame.render_widget(Clear, area);

    let help = vec![
        ("Tab / Shift+Tab", "switch tabs"),
        ("Up / Down", "move selection"),
        ("/", "filter contacts"),
        ("n", "new contact"),
        ("e / Enter", "edit selected contact"),
        ("d", "delete (contact or favourite)"),
        ("i", "edit search query"),
        ("F", "search filters"),
        ("h", "search history"),
        ("f", "toggle favourite"),
        ("n / p", "next / previous results page"),
        ("r", "refresh current tab"),
        ("Ctrl+L", "log out"),
        ("q", "quit"),
    ];

    let mut lines = vec![Line::default()];
    for (key, action) in help {
        lines.push(Line::from(vec![
            Span::styled(format!("  {key:<16}"), palette.accent_style()),
            Span::styled(action, palette.item_style()),
        ]));
    }
    lines.push(Line::default());
    lines.push(Line::from(Span::styled("  Press any key to close", palette.muted_style())));

    frame.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(palette.border_style(true))
                .title(" Help "),
        ),
        area,
    );
}

fn render_confirm(frame: &mut Frame, app: &App, title: &str, message: &str) {
    let palette = styles::palette(app.settings.dark_mode);
    let area = centered_rect(50, 25, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::default(),
        Line::from(Span::styled(message.to_string(), palette.item_style())).centered(),
        Line::default(),
        Line::from(vec![
            Span::styled("y", palette.error_style()),
            Span::styled(": confirm   ", palette.muted_style()),
            Span::styled("n", palette.success_style()),
            Span::styled(": cancel", palette.muted_style()),
        ])
        .centered(),
    ];

    frame.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(palette.error_style())
                .title(format!(" {title} ")),
        ),
        area,
    );
}

/// Helper to create a centered rect using a percentage of the available area
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
