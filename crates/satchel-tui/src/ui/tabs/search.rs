use chrono::{Duration, Utc};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, List, ListItem, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::{App, SearchFocus};
use crate::ui::styles;

/// Render the Search tab: query input (with history dropdown), results
/// table with a detail pane, and the pagination line.
pub fn render_search(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // query input
            Constraint::Min(5),    // results + detail
            Constraint::Length(1), // pagination
        ])
        .split(area);

    render_query_input(frame, app, chunks[0]);
    render_results(frame, app, chunks[1]);
    render_pagination(frame, app, chunks[2]);

    // The history dropdown overlays the top of the results area
    if app.search_focus == SearchFocus::History {
        render_history_dropdown(frame, app, chunks[1]);
    }
}

fn render_query_input(frame: &mut Frame, app: &App, area: Rect) {
    let palette = styles::palette(app.settings.dark_mode);
    let focused = app.search_focus == SearchFocus::Input;

    let mut spans = vec![Span::styled("Search Openverse: ", palette.muted_style())];
    if focused {
        spans.push(Span::styled(
            format!("{}_", app.search_input),
            palette.input_style(true),
        ));
    } else {
        spans.push(Span::styled(
            app.search_input.clone(),
            palette.item_style(),
        ));
    }
    let active = app.filters.active_count();
    if active > 0 {
        spans.push(Span::styled(
            format!("  [{active} filters]"),
            palette.accent_style(),
        ));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(palette.border_style(focused));
    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_results(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    render_results_table(frame, app, chunks[0]);
    render_detail(frame, app, chunks[1]);
}

fn render_results_table(frame: &mut Frame, app: &App, area: Rect) {
    let palette = styles::palette(app.settings.dark_mode);
    let focused = app.search_focus == SearchFocus::Results;

    let header = Row::new([Cell::from(""), Cell::from("Title"), Cell::from("License")])
        .style(palette.title_style())
        .height(1);

    let rows: Vec<Row> = app
        .search_page
        .results
        .iter()
        .enumerate()
        .map(|(i, image)| {
            let style = if i == app.search_selection && focused {
                palette.selected_style()
            } else {
                palette.item_style()
            };
            let heart = if app.is_favourited(&image.id) { "♥" } else { "" };
            Row::new([
                Cell::from(heart),
                Cell::from(image.display_title().to_string()),
                Cell::from(image.license.clone().unwrap_or_default()),
            ])
            .style(style)
        })
        .collect();

    let title = match &app.search_query {
        Some(query) => format!(" Results for \"{query}\" "),
        None => " Results ".to_string(),
    };

    let table = Table::new(
        rows,
        [
            Constraint::Length(2),
            Constraint::Percentage(75),
            Constraint::Percentage(20),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(palette.border_style(focused))
            .title(title),
    );

    let mut state = TableState::default();
    state.select(Some(app.search_selection));
    frame.render_stateful_widget(table, area, &mut state);

    if app.search_page.results.is_empty() {
        let message = if app.search_in_flight {
            "Searching..."
        } else if app.search_query.is_some() {
            "No search results found"
        } else {
            "Type a query and press Enter"
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

fn render_detail(frame: &mut Frame, app: &App, area: Rect) {
    let palette = styles::palette(app.settings.dark_mode);

    let mut lines = Vec::new();
    if let Some(image) = app.selected_search_result() {
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
        if let Some(source) = &image.source {
            lines.push(Line::from(vec![
                Span::styled("Source:  ", palette.muted_style()),
                Span::styled(source.clone(), palette.item_style()),
            ]));
        }
        if let Some(url) = &image.url {
            lines.push(Line::default());
            lines.push(Line::from(Span::styled(url.clone(), palette.accent_style())));
        }
        lines.push(Line::default());
        let verb = if app.is_favourited(&image.id) {
            "f: unfavourite"
        } else {
            "f: favourite"
        };
        lines.push(Line::from(Span::styled(verb, palette.muted_style())));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(palette.border_style(false))
        .title(" Image ");
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_pagination(frame: &mut Frame, app: &App, area: Rect) {
    let palette = styles::palette(app.settings.dark_mode);
    if app.search_page.results.is_empty() {
        return;
    }
    let line = Line::from(vec![
        Span::styled("<< p ", palette.muted_style()),
        Span::styled(
            format!("Page {} of {}", app.page, app.search_page.page_count.max(1)),
            palette.item_style(),
        ),
        Span::styled(" n >>", palette.muted_style()),
    ]);
    frame.render_widget(Paragraph::new(line).centered(), area);
}

fn render_history_dropdown(frame: &mut Frame, app: &App, area: Rect) {
    let palette = styles::palette(app.settings.dark_mode);
    let history = &app.config.recent_searches;
    if history.is_empty() {
        return;
    }

    let height = (history.len() as u16 + 2).min(area.height);
    let dropdown = Rect {
        x: area.x,
        y: area.y,
        width: area.width.min(60),
        height,
    };
    frame.render_widget(ratatui::widgets::Clear, dropdown);

    let now = Utc::now();
    let items: Vec<ListItem> = history
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let style = if i == app.history_selection {
                palette.selected_style()
            } else {
                palette.item_style()
            };
            let line = Line::from(vec![
                Span::styled(entry.query.clone(), style),
                Span::styled(
                    format!("  ({})", age_display(now - entry.searched_at)),
                    palette.muted_style(),
                ),
            ]);
            ListItem::new(line)
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(palette.border_style(true))
            .title(" Recent searches (Enter: search, x: remove) "),
    );
    frame.render_widget(list, dropdown);
}

/// Compact age for the history dropdown
fn age_display(age: Duration) -> String {
    let minutes = age.num_minutes();
    if minutes < 1 {
        "just now".to_string()
    } else if minutes < 60 {
        format!("{}m ago", minutes)
    } else if minutes < 1440 {
        format!("{}h ago", minutes / 60)
    } else {
        format!("{}d ago", minutes / 1440)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn age_display_picks_sensible_units() {
        assert_eq!(age_display(Duration::seconds(30)), "just now");
        assert_eq!(age_display(Duration::minutes(5)), "5m ago");
        assert_eq!(age_display(Duration::hours(3)), "3h ago");
        assert_eq!(age_display(Duration::days(2)), "2d ago");
    }
}
