//! Keyboard input handling for the TUI.
//!
//! Overlays are handled first, then the keys for whichever screen the
//! access gate currently allows. Returns `true` when the app should quit.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{
    App, AppState, ContactField, LoginFocus, LoginMode, SearchFocus, SettingsField, Tab,
    MAX_INPUT_LENGTH,
};
use crate::gate::GateDecision;

pub async fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match app.state {
        AppState::ShowingHelp => {
            app.state = AppState::Normal;
            return Ok(false);
        }
        AppState::ConfirmingQuit => {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => app.state = AppState::Quitting,
                _ => app.state = AppState::Normal,
            }
            return Ok(false);
        }
        AppState::ConfirmingDeleteContact => {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => {
                    app.state = AppState::Normal;
                    app.delete_contact_confirmed().await;
                }
                _ => {
                    app.pending_delete = None;
                    app.state = AppState::Normal;
                }
            }
            return Ok(false);
        }
        AppState::ConfirmingDeleteAccount => {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => {
                    app.state = AppState::Normal;
                    app.delete_account_confirmed().await;
                }
                _ => app.state = AppState::Normal,
            }
            return Ok(false);
        }
        AppState::EditingContact => {
            handle_contact_form(app, key).await;
            return Ok(false);
        }
        AppState::ShowingFilters => {
            handle_filter_panel(app, key);
            return Ok(false);
        }
        AppState::Normal | AppState::Quitting => {}
    }

    match app.gate {
        GateDecision::Loading => {
            if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
                return Ok(true);
            }
            Ok(false)
        }
        GateDecision::Login => {
            handle_login(app, key).await;
            Ok(false)
        }
        GateDecision::Dashboard => handle_dashboard(app, key).await,
    }
}

/// Printable character, ignoring control-modified keys
fn plain_char(key: KeyEvent) -> Option<char> {
    if let KeyCode::Char(c) = key.code {
        if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT {
            return Some(c);
        }
    }
    None
}

fn is_ctrl(key: KeyEvent, c: char) -> bool {
    key.code == KeyCode::Char(c) && key.modifiers.contains(KeyModifiers::CONTROL)
}

fn push_char(field: &mut String, c: char) {
    if field.chars().count() < MAX_INPUT_LENGTH {
        field.push(c);
    }
}

// ============================================================================
// Login screen
// ============================================================================

async fn handle_login(app: &mut App, key: KeyEvent) {
    if is_ctrl(key, 'r') {
        app.login_mode = match app.login_mode {
            LoginMode::SignIn => LoginMode::Register,
            LoginMode::Register => LoginMode::SignIn,
        };
        app.login_error = None;
        return;
    }

    match key.code {
        KeyCode::Tab | KeyCode::Down => {
            app.login_focus = match app.login_focus {
                LoginFocus::Email => LoginFocus::Password,
                LoginFocus::Password => LoginFocus::Submit,
                LoginFocus::Submit => LoginFocus::Email,
            };
        }
        KeyCode::BackTab | KeyCode::Up => {
            app.login_focus = match app.login_focus {
                LoginFocus::Email => LoginFocus::Submit,
                LoginFocus::Password => LoginFocus::Email,
                LoginFocus::Submit => LoginFocus::Password,
            };
        }
        KeyCode::Enter => app.submit_login().await,
        KeyCode::Esc => app.state = AppState::ConfirmingQuit,
        KeyCode::Backspace => {
            match app.login_focus {
                LoginFocus::Email => app.login_email.pop(),
                LoginFocus::Password => app.login_password.pop(),
                LoginFocus::Submit => None,
            };
        }
        _ => {
            if let Some(c) = plain_char(key) {
                match app.login_focus {
                    LoginFocus::Email => push_char(&mut app.login_email, c),
                    LoginFocus::Password => push_char(&mut app.login_password, c),
                    LoginFocus::Submit => {}
                }
            }
        }
    }
}

// ============================================================================
// Dashboard
// ============================================================================

async fn handle_dashboard(app: &mut App, key: KeyEvent) -> Result<bool> {
    if is_ctrl(key, 'l') {
        app.sign_out().await;
        return Ok(false);
    }

    // Text-entry contexts capture printable keys before global bindings
    if app.current_tab == Tab::Contacts && app.filtering_contacts {
        handle_contact_filter_entry(app, key);
        return Ok(false);
    }
    if app.current_tab == Tab::Search && app.search_focus == SearchFocus::Input {
        handle_search_entry(app, key);
        return Ok(false);
    }
    if app.current_tab == Tab::Search && app.search_focus == SearchFocus::History {
        handle_search_history(app, key);
        return Ok(false);
    }
    if app.current_tab == Tab::Settings && app.settings_focus == SettingsField::Username {
        handle_username_entry(app, key);
        return Ok(false);
    }

    match key.code {
        KeyCode::Tab => {
            app.current_tab = app.current_tab.next();
            app.status_message = None;
        }
        KeyCode::BackTab => {
            app.current_tab = app.current_tab.prev();
            app.status_message = None;
        }
        KeyCode::Char('?') => app.state = AppState::ShowingHelp,
        KeyCode::Char('q') => app.state = AppState::ConfirmingQuit,
        _ => match app.current_tab {
            Tab::Contacts => handle_contacts_tab(app, key),
            Tab::Search => handle_search_tab(app, key).await,
            Tab::Favourites => handle_favourites_tab(app, key).await,
            Tab::Settings => handle_settings_tab(app, key).await,
        },
    }
    Ok(false)
}

// ===== Contacts tab =====

fn handle_contacts_tab(app: &mut App, key: KeyEvent) {
    let visible = app.filtered_contacts().len();
    match key.code {
        KeyCode::Char('/') => app.filtering_contacts = true,
        KeyCode::Esc => {
            app.contact_filter.clear();
            app.contact_selection = 0;
        }
        KeyCode::Up => app.contact_selection = app.contact_selection.saturating_sub(1),
        KeyCode::Down => {
            if visible > 0 && app.contact_selection + 1 < visible {
                app.contact_selection += 1;
            }
        }
        KeyCode::Char('n') => app.open_contact_form(None),
        KeyCode::Char('e') | KeyCode::Enter => {
            if let Some(contact) = app.selected_contact().cloned() {
                app.open_contact_form(Some(&contact));
            }
        }
        KeyCode::Char('d') => {
            if let Some(contact) = app.selected_contact() {
                app.pending_delete = Some(contact.id);
                app.state = AppState::ConfirmingDeleteContact;
            }
        }
        KeyCode::Char('r') => {
            app.spawn_contacts_refresh();
            app.status_message = Some("Refreshing contacts...".to_string());
        }
        _ => {}
    }
}

fn handle_contact_filter_entry(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter | KeyCode::Esc => app.filtering_contacts = false,
        KeyCode::Backspace => {
            app.contact_filter.pop();
            app.contact_selection = 0;
        }
        _ => {
            if let Some(c) = plain_char(key) {
                push_char(&mut app.contact_filter, c);
                app.contact_selection = 0;
            }
        }
    }
}

// ===== Search tab =====

async fn handle_search_tab(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('i') | KeyCode::Char('/') => app.search_focus = SearchFocus::Input,
        KeyCode::Char('h') => {
            if !app.config.recent_searches.is_empty() {
                app.history_selection = 0;
                app.search_focus = SearchFocus::History;
            }
        }
        KeyCode::Char('F') => app.state = AppState::ShowingFilters,
        KeyCode::Up => {
            if app.search_selection == 0 {
                app.search_focus = SearchFocus::Input;
            } else {
                app.search_selection -= 1;
            }
        }
        KeyCode::Down => {
            let len = app.search_page.results.len();
            if len > 0 && app.search_selection + 1 < len {
                app.search_selection += 1;
            }
        }
        KeyCode::Char('f') | KeyCode::Enter => {
            if let Some(image) = app.selected_search_result() {
                let id = image.id.clone();
                app.toggle_favourite(id).await;
            }
        }
        KeyCode::Char('n') => app.next_page(),
        KeyCode::Char('p') => app.prev_page(),
        KeyCode::Char('r') => {
            if let Some(query) = app.search_query.clone() {
                let page = app.page;
                app.run_search(query, page);
            }
        }
        _ => {}
    }
}

fn handle_search_entry(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => {
            let query = app.search_input.clone();
            app.run_search(query, 1);
        }
        KeyCode::Down => {
            if !app.config.recent_searches.is_empty() {
                app.history_selection = 0;
                app.search_focus = SearchFocus::History;
            } else if !app.search_page.results.is_empty() {
                app.search_focus = SearchFocus::Results;
            }
        }
        KeyCode::Esc => {
            if !app.search_page.results.is_empty() {
                app.search_focus = SearchFocus::Results;
            }
        }
        KeyCode::Backspace => {
            app.search_input.pop();
        }
        _ => {
            if let Some(c) = plain_char(key) {
                push_char(&mut app.search_input, c);
            }
        }
    }
}

fn handle_search_history(app: &mut App, key: KeyEvent) {
    let len = app.config.recent_searches.len();
    match key.code {
        KeyCode::Up => {
            if app.history_selection == 0 {
                app.search_focus = SearchFocus::Input;
            } else {
                app.history_selection -= 1;
            }
        }
        KeyCode::Down => {
            if len > 0 && app.history_selection + 1 < len {
                app.history_selection += 1;
            }
        }
        KeyCode::Enter => {
            if let Some(entry) = app.config.recent_searches.get(app.history_selection) {
                let query = entry.query.clone();
                app.search_input = query.clone();
                app.search_focus = SearchFocus::Input;
                app.run_search(query, 1);
            }
        }
        KeyCode::Char('x') | KeyCode::Delete => {
            if let Some(entry) = app.config.recent_searches.get(app.history_selection) {
                let query = entry.query.clone();
                app.config.forget_search(&query);
                if let Err(e) = app.config.save() {
                    tracing::warn!(error = %e, "Failed to save search history");
                }
                if app.config.recent_searches.is_empty() {
                    app.search_focus = SearchFocus::Input;
                } else if app.history_selection >= app.config.recent_searches.len() {
                    app.history_selection = app.config.recent_searches.len() - 1;
                }
            }
        }
        KeyCode::Esc => app.search_focus = SearchFocus::Input,
        _ => {}
    }
}

fn handle_filter_panel(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Enter | KeyCode::Char('F') => app.state = AppState::Normal,
        KeyCode::Left => app.filters.prev_group(),
        KeyCode::Right => app.filters.next_group(),
        KeyCode::Up => app.filters.prev_option(),
        KeyCode::Down => app.filters.next_option(),
        KeyCode::Char(' ') => app.filters.toggle_current(),
        KeyCode::Char('c') => app.filters.clear(),
        _ => {}
    }
}

// ===== Favourites tab =====

async fn handle_favourites_tab(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Up => app.favourites_selection = app.favourites_selection.saturating_sub(1),
        KeyCode::Down => {
            let len = app.favourites.len();
            if len > 0 && app.favourites_selection + 1 < len {
                app.favourites_selection += 1;
            }
        }
        KeyCode::Char('d') | KeyCode::Char('f') => {
            if let Some(image) = app.selected_favourite() {
                let id = image.id.clone();
                app.toggle_favourite(id).await;
            }
        }
        KeyCode::Char('r') => {
            app.spawn_favourites_refresh();
            app.status_message = Some("Refreshing favourites...".to_string());
        }
        _ => {}
    }
}

// ===== Settings tab =====

async fn handle_settings_tab(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Up => app.settings_focus = app.settings_focus.prev(),
        KeyCode::Down => app.settings_focus = app.settings_focus.next(),
        KeyCode::Char(' ') => {
            if app.settings_focus == SettingsField::DarkMode {
                app.settings.dark_mode = !app.settings.dark_mode;
            }
        }
        KeyCode::Enter => match app.settings_focus {
            SettingsField::DarkMode => app.settings.dark_mode = !app.settings.dark_mode,
            SettingsField::Username => {}
            SettingsField::Save => app.save_settings().await,
            SettingsField::DeleteAccount => app.state = AppState::ConfirmingDeleteAccount,
        },
        _ => {}
    }
}

fn handle_username_entry(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Up => app.settings_focus = app.settings_focus.prev(),
        KeyCode::Down | KeyCode::Enter | KeyCode::Esc => {
            app.settings_focus = app.settings_focus.next();
        }
        KeyCode::Backspace => {
            app.settings.username.pop();
        }
        _ => {
            if let Some(c) = plain_char(key) {
                push_char(&mut app.settings.username, c);
            }
        }
    }
}

// ============================================================================
// Contact form overlay
// ============================================================================

async fn handle_contact_form(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.state = AppState::Normal,
        KeyCode::Enter => app.submit_contact_form().await,
        KeyCode::Tab | KeyCode::Down => {
            app.contact_form.focus = Some(match app.contact_form.focus {
                Some(ContactField::First) => ContactField::Last,
                Some(ContactField::Last) => ContactField::Email,
                Some(ContactField::Email) | None => ContactField::First,
            });
        }
        KeyCode::BackTab | KeyCode::Up => {
            app.contact_form.focus = Some(match app.contact_form.focus {
                Some(ContactField::First) | None => ContactField::Email,
                Some(ContactField::Last) => ContactField::First,
                Some(ContactField::Email) => ContactField::Last,
            });
        }
        KeyCode::Backspace => {
            if let Some(field) = app.contact_form.field_mut() {
                field.pop();
            }
        }
        _ => {
            if let Some(c) = plain_char(key) {
                if let Some(field) = app.contact_form.field_mut() {
                    push_char(field, c);
                }
            }
        }
    }
}
