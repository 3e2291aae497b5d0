use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::app::App;
use crate::ui::styles;

/// Render the Favourites tab: hydrated favourites list plus a detail pane
pub fn render_favourites(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    render_list(frame, app, chunks[0]);
    render_detail(frame, app, chunks[1]);
}

fn render_list(frame: &mut Frame, app: &App, area: Rect) {
    let palette = styles::palette(app.settings.dark_mode);

    let items: Vec<ListItem> = app
        .favourites
        .iter()
        .enumerate()
        .map(|(i, image)| {
            let style = if i == app.favourites_selection {
                palette.selected_style()
            } else {
                palette.item_style()
            };
            ListItem::new(Line::from(vec![
                Span::styled("♥ ", palette.error_style()),
                Span::styled(image.display_title().to_string(), style),
            ]))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(palette.border_style(true))
            .title(format!(" Favourites ({}) ", app.favourites.len())),
    );

    let mut state = ListState::default();
    state.select(Some(app.favourites_selection));
    frame.render_stateful_widget(list, area, &mut state);

    if app.favourites.is_empty() {
        let inner = Rect {
            x: area.x + 2,
            y: area.y + 2,
            width: area.width.saturating_sub(4),
            height: 1,
        };
        frame.render_widget(
            Paragraph::new(Span::styled("No favourites found", palette.muted_style())),
            inner,
        );
    }
}

fn render_detail(frame: &mut Frame, app: &App, area: Rect) {
    let palette = styles::palette(app.settings.dark_mode);

    let mut lines = Vec::new();
    if let Some(image) = app.selected_favourite() {
        lines.push(Line::from(Span::styled(
            image.display_title().to_string(),
            palette.title_style(),
        )));
        lines.push(Line::default());
        if let Some(creator) = &image.creator {
            lines.push(Line::from(vec![
                Span::styled("Creator: ", palette.muted_style()),
                Span::styled(creator.clone(), palette.item_style()),
            ]));
        }
        if let Some(license) = &image.license {
            lines.push(Line::from(vec![
                Span::styled("License: ", palette.muted_style()),
                Span::styled(license.clone(), palette.item_style()),
            ]));
        }
        if let Some(url) = &image.url {
            lines.push(Line::default());
            lines.push(Line::from(Span::styled(url.clone(), palette.accent_style())));
        }
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            "d: remove from favourites",
            palette.muted_style(),
        )));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(palette.border_style(false))
        .title(" Image ");
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
