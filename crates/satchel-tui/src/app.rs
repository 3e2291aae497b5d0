//! Application state management for satchel.
//!
//! This module contains the core `App` struct that manages all application
//! state: the session subscription, per-tab UI state, fetched data, and
//! background task coordination.

use std::sync::Arc;

use anyhow::Result;
use futures::stream::{self, StreamExt};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use satchel_core::api::{ApiClient, ApiError, OpenverseClient};
use satchel_core::auth::{
    CredentialStore, KeyringStore, MemoryStore, SessionManager, SessionState,
};
use satchel_core::config::Config;
use satchel_core::models::{
    Contact, ContactDraft, ImageRecord, SearchPage, SearchQuery, UserSettings,
    ASPECT_RATIO_OPTIONS, CATEGORY_OPTIONS, EXTENSION_OPTIONS, LICENSE_OPTIONS, SIZE_OPTIONS,
};

use crate::gate::{self, GateDecision};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background task message channel.
const CHANNEL_BUFFER_SIZE: usize = 32;

/// Maximum concurrent Openverse detail requests when hydrating favourites.
const MAX_CONCURRENT_HYDRATIONS: usize = 5;

/// Maximum length for text input fields (emails, passwords, names).
pub const MAX_INPUT_LENGTH: usize = 128;

/// The session manager runs against the real account backend.
pub type Session = SessionManager<ApiClient>;

// ============================================================================
// UI State Types
// ============================================================================

/// Main navigation tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Contacts,
    Search,
    Favourites,
    Settings,
}

impl Tab {
    pub fn title(&self) -> &'static str {
        match self {
            Tab::Contacts => "Contacts",
            Tab::Search => "Search",
            Tab::Favourites => "Favourites",
            Tab::Settings => "Settings",
        }
    }

    /// Get the next tab (wrapping around)
    pub fn next(&self) -> Self {
        match self {
            Tab::Contacts => Tab::Search,
            Tab::Search => Tab::Favourites,
            Tab::Favourites => Tab::Settings,
            Tab::Settings => Tab::Contacts,
        }
    }

    /// Get the previous tab (wrapping around)
    pub fn prev(&self) -> Self {
        match self {
            Tab::Contacts => Tab::Settings,
            Tab::Search => Tab::Contacts,
            Tab::Favourites => Tab::Search,
            Tab::Settings => Tab::Favourites,
        }
    }

    pub fn all() -> [Tab; 4] {
        [Tab::Contacts, Tab::Search, Tab::Favourites, Tab::Settings]
    }
}

/// Overall application state (modal overlays on top of the gated screen)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    EditingContact,
    ConfirmingDeleteContact,
    ConfirmingDeleteAccount,
    ShowingFilters,
    ShowingHelp,
    ConfirmingQuit,
    Quitting,
}

/// Login form field focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginFocus {
    Email,
    Password,
    Submit,
}

/// Login screen mode: sign in to an existing account or create one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginMode {
    SignIn,
    Register,
}

/// Contact form field focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactField {
    First,
    Last,
    Email,
}

/// State of the contact create/edit overlay
#[derive(Debug, Clone, Default)]
pub struct ContactForm {
    /// Set when editing an existing contact
    pub id: Option<i64>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub focus: Option<ContactField>,
}

impl ContactForm {
    pub fn for_new() -> Self {
        Self {
            focus: Some(ContactField::First),
            ..Self::default()
        }
    }

    pub fn for_edit(contact: &Contact) -> Self {
        Self {
            id: Some(contact.id),
            first_name: contact.first_name.clone(),
            last_name: contact.last_name.clone(),
            email: contact.email.clone(),
            focus: Some(ContactField::First),
        }
    }

    pub fn is_editing(&self) -> bool {
        self.id.is_some()
    }

    pub fn field_mut(&mut self) -> Option<&mut String> {
        match self.focus? {
            ContactField::First => Some(&mut self.first_name),
            ContactField::Last => Some(&mut self.last_name),
            ContactField::Email => Some(&mut self.email),
        }
    }
}

/// Focus zones within the Search tab
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchFocus {
    Input,
    History,
    Results,
}

/// Settings tab field focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsField {
    DarkMode,
    Username,
    Save,
    DeleteAccount,
}

impl SettingsField {
    pub fn next(&self) -> Self {
        match self {
            SettingsField::DarkMode => SettingsField::Username,
            SettingsField::Username => SettingsField::Save,
            SettingsField::Save => SettingsField::DeleteAccount,
            SettingsField::DeleteAccount => SettingsField::DarkMode,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            SettingsField::DarkMode => SettingsField::DeleteAccount,
            SettingsField::Username => SettingsField::DarkMode,
            SettingsField::Save => SettingsField::Username,
            SettingsField::DeleteAccount => SettingsField::Save,
        }
    }
}

// ============================================================================
// Search Filters
// ============================================================================

/// Filter groups shown in the filter panel, in display order.
pub const FILTER_GROUPS: &[(&str, &[&str])] = &[
    ("License", LICENSE_OPTIONS),
    ("File Type", EXTENSION_OPTIONS),
    ("Category", CATEGORY_OPTIONS),
    ("Size", SIZE_OPTIONS),
    ("Aspect Ratio", ASPECT_RATIO_OPTIONS),
];

/// Selected search filters plus the filter panel cursor.
#[derive(Debug, Clone, Default)]
pub struct FilterState {
    pub group: usize,
    pub index: usize,
    pub licenses: Vec<String>,
    pub extensions: Vec<String>,
    pub categories: Vec<String>,
    pub sizes: Vec<String>,
    pub aspect_ratios: Vec<String>,
}

impl FilterState {
    pub fn selected(&self, group: usize) -> &[String] {
        match group {
            0 => &self.licenses,
            1 => &self.extensions,
            2 => &self.categories,
            3 => &self.sizes,
            _ => &self.aspect_ratios,
        }
    }

    fn selected_mut(&mut self, group: usize) -> &mut Vec<String> {
        match group {
            0 => &mut self.licenses,
            1 => &mut self.extensions,
            2 => &mut self.categories,
            3 => &mut self.sizes,
            _ => &mut self.aspect_ratios,
        }
    }

    pub fn is_selected(&self, group: usize, index: usize) -> bool {
        let option = FILTER_GROUPS[group].1[index];
        self.selected(group).iter().any(|s| s == option)
    }

    /// Toggle the option under the cursor
    pub fn toggle_current(&mut self) {
        let option = FILTER_GROUPS[self.group].1[self.index].to_string();
        let selected = self.selected_mut(self.group);
        if let Some(pos) = selected.iter().position(|s| s == &option) {
            selected.remove(pos);
        } else {
            selected.push(option);
        }
    }

    pub fn next_group(&mut self) {
        self.group = (self.group + 1) % FILTER_GROUPS.len();
        self.clamp_index();
    }

    pub fn prev_group(&mut self) {
        self.group = (self.group + FILTER_GROUPS.len() - 1) % FILTER_GROUPS.len();
        self.clamp_index();
    }

    pub fn next_option(&mut self) {
        let len = FILTER_GROUPS[self.group].1.len();
        self.index = (self.index + 1) % len;
    }

    pub fn prev_option(&mut self) {
        let len = FILTER_GROUPS[self.group].1.len();
        self.index = (self.index + len - 1) % len;
    }

    fn clamp_index(&mut self) {
        let len = FILTER_GROUPS[self.group].1.len();
        self.index = self.index.min(len.saturating_sub(1));
    }

    /// Total number of active filter selections, for the status line
    pub fn active_count(&self) -> usize {
        self.licenses.len()
            + self.extensions.len()
            + self.categories.len()
            + self.sizes.len()
            + self.aspect_ratios.len()
    }

    pub fn clear(&mut self) {
        self.licenses.clear();
        self.extensions.clear();
        self.categories.clear();
        self.sizes.clear();
        self.aspect_ratios.clear();
    }
}

// ============================================================================
// Background Task Results
// ============================================================================

/// Results from background fetch tasks, sent through an MPSC channel back
/// to the main loop.
enum TaskResult {
    Contacts(Result<Vec<Contact>, String>),
    /// Favourited ids plus the hydrated records (missing images skipped)
    Favourites(Result<(Vec<String>, Vec<ImageRecord>), String>),
    Settings(Result<UserSettings, String>),
    Search(Result<SearchPage, String>),
}

// ============================================================================
// Main Application Struct
// ============================================================================

/// Main application state container
pub struct App {
    // Core services
    pub config: Config,
    pub session: Session,
    pub api: ApiClient,
    pub openverse: OpenverseClient,

    // Session view
    session_rx: watch::Receiver<SessionState>,
    pub session_state: SessionState,
    pub gate: GateDecision,

    // UI state
    pub state: AppState,
    pub current_tab: Tab,
    pub status_message: Option<String>,

    // Login form state
    pub login_mode: LoginMode,
    pub login_email: String,
    pub login_password: String,
    pub login_focus: LoginFocus,
    pub login_error: Option<String>,

    // Contacts tab
    pub contacts: Vec<Contact>,
    pub contact_filter: String,
    pub filtering_contacts: bool,
    pub contact_selection: usize,
    pub contact_form: ContactForm,
    pub pending_delete: Option<i64>,

    // Search tab
    pub search_input: String,
    pub search_focus: SearchFocus,
    pub search_page: SearchPage,
    pub search_query: Option<String>,
    pub page: u32,
    pub search_selection: usize,
    pub search_in_flight: bool,
    pub history_selection: usize,
    pub filters: FilterState,

    // Favourites tab
    pub favourite_ids: Vec<String>,
    pub favourites: Vec<ImageRecord>,
    pub favourites_selection: usize,

    // Settings tab
    pub settings: UserSettings,
    pub settings_focus: SettingsField,

    // Background task channel
    tasks_rx: mpsc::Receiver<TaskResult>,
    tasks_tx: mpsc::Sender<TaskResult>,
}

impl App {
    /// Create a new application instance.
    ///
    /// With `SATCHEL_EPHEMERAL` set, the credential lives in memory only
    /// and the session will not survive a restart.
    pub fn new(config: Config) -> Result<Self> {
        let api = ApiClient::new(&config)?;
        let openverse = OpenverseClient::new()?;

        let store: Arc<dyn CredentialStore> = if std::env::var("SATCHEL_EPHEMERAL").is_ok() {
            debug!("Using in-memory credential store");
            Arc::new(MemoryStore::new())
        } else {
            Arc::new(KeyringStore::new())
        };
        let session = SessionManager::new(api.clone(), store);
        let session_rx = session.subscribe();
        let session_state = session.current();

        let (tasks_tx, tasks_rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        let login_email = config.last_email.clone().unwrap_or_default();

        Ok(Self {
            config,
            session,
            api,
            openverse,

            session_rx,
            session_state,
            gate: GateDecision::Loading,

            state: AppState::Normal,
            current_tab: Tab::Contacts,
            status_message: None,

            login_mode: LoginMode::SignIn,
            login_email,
            login_password: String::new(),
            login_focus: LoginFocus::Email,
            login_error: None,

            contacts: Vec::new(),
            contact_filter: String::new(),
            filtering_contacts: false,
            contact_selection: 0,
            contact_form: ContactForm::default(),
            pending_delete: None,

            search_input: String::new(),
            search_focus: SearchFocus::Input,
            search_page: SearchPage::default(),
            search_query: None,
            page: 1,
            search_selection: 0,
            search_in_flight: false,
            history_selection: 0,
            filters: FilterState::default(),

            favourite_ids: Vec::new(),
            favourites: Vec::new(),
            favourites_selection: 0,

            settings: UserSettings::default(),
            settings_focus: SettingsField::DarkMode,

            tasks_rx,
            tasks_tx,
        })
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// Kick off the startup resolution in the background; the gate keeps
    /// the loading screen up until it lands.
    pub fn start_session_resolve(&self) {
        let session = self.session.clone();
        tokio::spawn(async move {
            session.resolve().await;
        });
    }

    /// Fold the latest session state into the UI: gate decision, bearer
    /// token on the data client, and data loads/evictions on transitions.
    /// Called once per frame, before rendering.
    pub fn sync_session(&mut self) {
        let state = self.session_rx.borrow().clone();
        if state == self.session_state && gate::decide(&state) == self.gate {
            return;
        }

        let decision = gate::decide(&state);
        if decision != self.gate {
            match decision {
                GateDecision::Dashboard => {
                    self.api.set_token(state.credential.clone());
                    self.load_dashboard_data();
                }
                GateDecision::Login => {
                    // Evicted: drop the token and anything user-specific
                    self.api.set_token(None);
                    self.contacts.clear();
                    self.favourite_ids.clear();
                    self.favourites.clear();
                    self.search_page = SearchPage::default();
                    self.search_query = None;
                    self.settings = UserSettings::default();
                    self.state = AppState::Normal;
                    self.current_tab = Tab::Contacts;
                }
                GateDecision::Loading => {}
            }
            self.gate = decision;
        }
        self.session_state = state;
    }

    /// Submit the login form: sign in, or register then sign in.
    pub async fn submit_login(&mut self) {
        let email = self.login_email.trim().to_string();
        let password = self.login_password.clone();

        if email.is_empty() || password.is_empty() {
            self.login_error = Some("Email and password required".to_string());
            return;
        }
        self.login_error = None;

        if self.login_mode == LoginMode::Register {
            if let Err(e) = self.api.register(&email, &password).await {
                warn!(error = %e, "Registration failed");
                self.login_error = Some(e.to_string());
                return;
            }
            info!("Account registered");
        }

        match self.session.sign_in(&email, &password).await {
            Ok(_) => {
                self.login_password.clear();
                self.login_mode = LoginMode::SignIn;
                self.config.last_email = Some(email);
                if let Err(e) = self.config.save() {
                    warn!(error = %e, "Failed to save config");
                }
            }
            Err(e) => {
                self.login_error = Some(e.to_string());
            }
        }
    }

    /// Sign out and apply the eviction immediately, without waiting for
    /// the next frame.
    pub async fn sign_out(&mut self) {
        self.session.sign_out().await;
        self.sync_session();
        self.status_message = Some("Logged out".to_string());
    }

    // =========================================================================
    // Background Data Loading
    // =========================================================================

    fn load_dashboard_data(&self) {
        self.spawn_contacts_refresh();
        self.spawn_favourites_refresh();
        self.spawn_settings_fetch();
    }

    pub fn spawn_contacts_refresh(&self) {
        let api = self.api.clone();
        let tx = self.tasks_tx.clone();
        tokio::spawn(async move {
            let result = api.fetch_contacts().await.map_err(|e| e.to_string());
            let _ = tx.send(TaskResult::Contacts(result)).await;
        });
    }

    pub fn spawn_favourites_refresh(&self) {
        let api = self.api.clone();
        let openverse = self.openverse.clone();
        let tx = self.tasks_tx.clone();
        tokio::spawn(async move {
            let result = Self::hydrate_favourites(&api, &openverse)
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(TaskResult::Favourites(result)).await;
        });
    }

    pub fn spawn_settings_fetch(&self) {
        let api = self.api.clone();
        let tx = self.tasks_tx.clone();
        tokio::spawn(async move {
            let result = api.fetch_settings().await.map_err(|e| e.to_string());
            let _ = tx.send(TaskResult::Settings(result)).await;
        });
    }

    /// Fetch the favourite ids, then hydrate each against Openverse with
    /// bounded concurrency. Favourites that no longer resolve are skipped.
    async fn hydrate_favourites(
        api: &ApiClient,
        openverse: &OpenverseClient,
    ) -> Result<(Vec<String>, Vec<ImageRecord>), ApiError> {
        let refs = api.fetch_favourites().await?;
        let ids: Vec<String> = refs.iter().map(|f| f.image_id.clone()).collect();

        let records: Vec<ImageRecord> = stream::iter(ids.clone())
            .map(|id| {
                let openverse = openverse.clone();
                async move {
                    match openverse.image(&id).await {
                        Ok(record) => Some(record),
                        Err(e) => {
                            debug!(image_id = %id, error = %e, "Favourite no longer resolves");
                            None
                        }
                    }
                }
            })
            .buffered(MAX_CONCURRENT_HYDRATIONS)
            .filter_map(|record| async move { record })
            .collect()
            .await;

        Ok((ids, records))
    }

    /// Check for completed background tasks and process results
    pub fn check_background_tasks(&mut self) {
        while let Ok(result) = self.tasks_rx.try_recv() {
            self.process_task_result(result);
        }
    }

    fn process_task_result(&mut self, result: TaskResult) {
        match result {
            TaskResult::Contacts(Ok(contacts)) => {
                self.contacts = contacts;
                self.contact_selection = clamp_selection(
                    self.contact_selection,
                    self.filtered_contacts().len(),
                );
            }
            TaskResult::Contacts(Err(e)) => {
                warn!(error = %e, "Contacts fetch failed");
                self.status_message = Some(format!("Failed to load contacts: {e}"));
            }
            TaskResult::Favourites(Ok((ids, records))) => {
                self.favourite_ids = ids;
                self.favourites = records;
                self.favourites_selection =
                    clamp_selection(self.favourites_selection, self.favourites.len());
            }
            TaskResult::Favourites(Err(e)) => {
                warn!(error = %e, "Favourites fetch failed");
                self.status_message = Some(format!("Failed to load favourites: {e}"));
            }
            TaskResult::Settings(Ok(settings)) => {
                self.settings = settings;
            }
            TaskResult::Settings(Err(e)) => {
                // A fresh account has no settings row yet; keep the defaults
                debug!(error = %e, "Settings fetch failed, using defaults");
            }
            TaskResult::Search(Ok(page)) => {
                self.search_in_flight = false;
                self.search_selection = 0;
                self.search_focus = SearchFocus::Results;
                self.status_message = Some(format!("{} results", page.result_count));
                self.search_page = page;
            }
            TaskResult::Search(Err(e)) => {
                self.search_in_flight = false;
                warn!(error = %e, "Search failed");
                self.status_message = Some(format!("Search failed: {e}"));
            }
        }
    }

    // =========================================================================
    // Search
    // =========================================================================

    /// Run an Openverse search for `query` at `page`, with the current
    /// filters applied.
    pub fn run_search(&mut self, query: String, page: u32) {
        let query = query.trim().to_string();
        if query.is_empty() || self.search_in_flight {
            return;
        }

        self.config.remember_search(&query);
        if let Err(e) = self.config.save() {
            warn!(error = %e, "Failed to save search history");
        }

        let mut request = SearchQuery::new(query.clone());
        request.page = page;
        request.licenses = self.filters.licenses.clone();
        request.extensions = self.filters.extensions.clone();
        request.categories = self.filters.categories.clone();
        request.sizes = self.filters.sizes.clone();
        request.aspect_ratios = self.filters.aspect_ratios.clone();

        self.search_query = Some(query);
        self.page = page;
        self.search_in_flight = true;
        self.status_message = Some("Searching...".to_string());

        let openverse = self.openverse.clone();
        let tx = self.tasks_tx.clone();
        tokio::spawn(async move {
            let result = openverse.search(&request).await.map_err(|e| e.to_string());
            let _ = tx.send(TaskResult::Search(result)).await;
        });
    }

    pub fn next_page(&mut self) {
        if let Some(query) = self.search_query.clone() {
            if self.page < self.search_page.page_count {
                self.run_search(query, self.page + 1);
            }
        }
    }

    pub fn prev_page(&mut self) {
        if let Some(query) = self.search_query.clone() {
            if self.page > 1 {
                self.run_search(query, self.page - 1);
            }
        }
    }

    pub fn selected_search_result(&self) -> Option<&ImageRecord> {
        self.search_page.results.get(self.search_selection)
    }

    pub fn selected_favourite(&self) -> Option<&ImageRecord> {
        self.favourites.get(self.favourites_selection)
    }

    pub fn is_favourited(&self, image_id: &str) -> bool {
        self.favourite_ids.iter().any(|id| id == image_id)
    }

    /// Toggle the favourite state of an image, then refresh the hydrated
    /// favourites list.
    pub async fn toggle_favourite(&mut self, image_id: String) {
        let was_favourited = self.is_favourited(&image_id);
        let result = if was_favourited {
            self.api.remove_favourite(&image_id).await
        } else {
            self.api.add_favourite(&image_id).await
        };

        match result {
            Ok(()) => {
                self.status_message = Some(
                    if was_favourited {
                        "Removed from favourites"
                    } else {
                        "Added to favourites"
                    }
                    .to_string(),
                );
                self.spawn_favourites_refresh();
            }
            Err(e) => {
                warn!(error = %e, "Favourite update failed");
                self.status_message = Some(format!("Failed to update favourites: {e}"));
            }
        }
    }

    // =========================================================================
    // Contacts
    // =========================================================================

    pub fn filtered_contacts(&self) -> Vec<&Contact> {
        self.contacts
            .iter()
            .filter(|c| c.matches(&self.contact_filter))
            .collect()
    }

    pub fn selected_contact(&self) -> Option<&Contact> {
        self.filtered_contacts()
            .get(self.contact_selection)
            .copied()
    }

    pub fn open_contact_form(&mut self, existing: Option<&Contact>) {
        self.contact_form = match existing {
            Some(contact) => ContactForm::for_edit(contact),
            None => ContactForm::for_new(),
        };
        self.state = AppState::EditingContact;
    }

    /// Create or update the contact currently in the form
    pub async fn submit_contact_form(&mut self) {
        let draft = ContactDraft {
            first_name: self.contact_form.first_name.trim().to_string(),
            last_name: self.contact_form.last_name.trim().to_string(),
            email: self.contact_form.email.trim().to_string(),
        };

        let result = match self.contact_form.id {
            Some(id) => self.api.update_contact(id, &draft).await,
            None => self.api.create_contact(&draft).await,
        };

        match result {
            Ok(()) => {
                self.status_message = Some(
                    if self.contact_form.is_editing() {
                        "Contact updated"
                    } else {
                        "Contact added"
                    }
                    .to_string(),
                );
                self.state = AppState::Normal;
                self.spawn_contacts_refresh();
            }
            Err(e) => {
                warn!(error = %e, "Contact save failed");
                self.status_message = Some(format!("Failed to save contact: {e}"));
            }
        }
    }

    /// Delete the contact confirmed via the overlay
    pub async fn delete_contact_confirmed(&mut self) {
        let Some(id) = self.pending_delete.take() else {
            return;
        };
        match self.api.delete_contact(id).await {
            Ok(()) => {
                self.status_message = Some("Contact deleted".to_string());
                self.spawn_contacts_refresh();
            }
            Err(e) => {
                warn!(error = %e, contact_id = id, "Contact delete failed");
                self.status_message = Some(format!("Failed to delete contact: {e}"));
            }
        }
    }

    // =========================================================================
    // Settings
    // =========================================================================

    pub async fn save_settings(&mut self) {
        match self.api.update_settings(&self.settings).await {
            Ok(()) => {
                self.status_message = Some("Settings saved".to_string());
            }
            Err(e) => {
                warn!(error = %e, "Settings save failed");
                self.status_message = Some(format!("Failed to save settings: {e}"));
            }
        }
    }

    /// Delete the account server-side, then end the session locally.
    pub async fn delete_account_confirmed(&mut self) {
        match self.api.delete_account().await {
            Ok(()) => {
                info!("Account deleted");
                self.sign_out().await;
                self.status_message = Some("Account deleted".to_string());
            }
            Err(e) => {
                warn!(error = %e, "Account delete failed");
                self.status_message = Some(format!("Failed to delete account: {e}"));
            }
        }
    }

    // =========================================================================
    // Display helpers
    // =========================================================================

    /// Name shown in the title bar: the chosen username, or the account email
    pub fn display_name(&self) -> Option<String> {
        if !self.settings.username.is_empty() {
            return Some(self.settings.username.clone());
        }
        self.session_state
            .identity
            .as_ref()
            .map(|identity| identity.email.clone())
    }
}

/// Keep a selection index valid for a list of the given length
pub fn clamp_selection(selection: usize, len: usize) -> usize {
    if len == 0 {
        0
    } else {
        selection.min(len - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tabs_cycle_in_both_directions() {
        let mut tab = Tab::Contacts;
        for _ in 0..Tab::all().len() {
            tab = tab.next();
        }
        assert_eq!(tab, Tab::Contacts);

        assert_eq!(Tab::Contacts.prev(), Tab::Settings);
        assert_eq!(Tab::Settings.next(), Tab::Contacts);
    }

    #[test]
    fn filter_toggle_is_symmetric() {
        let mut filters = FilterState::default();
        filters.group = 0;
        filters.index = 0;

        filters.toggle_current();
        assert!(filters.is_selected(0, 0));
        assert_eq!(filters.active_count(), 1);

        filters.toggle_current();
        assert!(!filters.is_selected(0, 0));
        assert_eq!(filters.active_count(), 0);
    }

    #[test]
    fn filter_cursor_stays_in_bounds_across_groups() {
        let mut filters = FilterState::default();
        // Deepest option of the license list (10 entries), then hop to the
        // category list (3 entries)
        filters.group = 0;
        filters.index = FILTER_GROUPS[0].1.len() - 1;
        filters.next_group();
        filters.next_group();
        assert_eq!(filters.group, 2);
        assert!(filters.index < FILTER_GROUPS[2].1.len());
    }

    #[test]
    fn selection_clamp_handles_shrinking_lists() {
        assert_eq!(clamp_selection(4, 10), 4);
        assert_eq!(clamp_selection(4, 3), 2);
        assert_eq!(clamp_selection(0, 0), 0);
    }

    #[test]
    fn contact_form_prefills_for_edit() {
        let contact = Contact {
            id: 7,
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.org".to_string(),
        };
        let form = ContactForm::for_edit(&contact);
        assert_eq!(form.id, Some(7));
        assert!(form.is_editing());
        assert_eq!(form.first_name, "Ada");

        let form = ContactForm::for_new();
        assert!(!form.is_editing());
        assert_eq!(form.focus, Some(ContactField::First));
    }
}
