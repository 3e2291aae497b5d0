use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::App;
use crate::ui::styles;

/// Render the Contacts tab: filter line plus the contact table
pub fn render_contacts(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(area);

    render_filter_line(frame, app, chunks[0]);
    render_contact_table(frame, app, chunks[1]);
}

fn render_filter_line(frame: &mut Frame, app: &App, area: Rect) {
    let palette = styles::palette(app.settings.dark_mode);

    let content = if app.filtering_contacts {
        Line::from(vec![
            Span::styled("Filter: ", palette.muted_style()),
            Span::styled(
                format!("{}_", app.contact_filter),
                palette.input_style(true),
            ),
        ])
    } else if app.contact_filter.is_empty() {
        Line::from(Span::styled(
            "Press / to filter contacts",
            palette.muted_style(),
        ))
    } else {
        Line::from(vec![
            Span::styled("Filter: ", palette.muted_style()),
            Span::styled(app.contact_filter.clone(), palette.accent_style()),
            Span::styled("  (/ to edit, Esc to clear)", palette.muted_style()),
        ])
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(palette.border_style(app.filtering_contacts));
    frame.render_widget(Paragraph::new(content).block(block), area);
}

fn render_contact_table(frame: &mut Frame, app: &App, area: Rect) {
    let palette = styles::palette(app.settings.dark_mode);
    let contacts = app.filtered_contacts();

    let header = Row::new([
        Cell::from("First Name"),
        Cell::from("Last Name"),
        Cell::from("Email"),
    ])
    .style(palette.title_style())
    .height(1);

    let rows: Vec<Row> = contacts
        .iter()
        .enumerate()
        .map(|(i, contact)| {
            let style = if i == app.contact_selection {
                palette.selected_style()
            } else {
                palette.item_style()
            };
            Row::new([
                Cell::from(contact.first_name.clone()),
                Cell::from(contact.last_name.clone()),
                Cell::from(contact.email.clone()),
            ])
            .style(style)
        })
        .collect();

    let title = if app.contact_filter.is_empty() {
        format!(" Contacts ({}) ", contacts.len())
    } else {
        format!(" Contacts ({} of {}) ", contacts.len(), app.contacts.len())
    };

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(50),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(palette.border_style(!app.filtering_contacts))
            .title(title),
    );

    let mut state = TableState::default();
    state.select(Some(app.contact_selection));
    frame.render_stateful_widget(table, area, &mut state);

    if contacts.is_empty() {
        let message = if app.contacts.is_empty() {
            "No contacts yet - press n to add one"
        } else {
            "No contacts match the filter"
        };
        let inner = Rect {
            x: area.x + 2,
            y: area.y + 2,
            width: area.width.saturating_sub(4),
            height: 1,
        };
        frame.render_widget(
            Paragraph::new(Span::styled(message, palette.muted_style())),
            inner,
        );
    }
}
