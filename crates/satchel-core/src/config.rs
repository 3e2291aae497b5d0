//! Application configuration management.
//!
//! This module handles loading and saving the application configuration:
//! backend base URLs, the last-used email, and the recent search history.
//!
//! Configuration is stored at `~/.config/satchel/config.json`. The base
//! URLs can be overridden per run with the `SATCHEL_API_URL` and
//! `SATCHEL_CONTACTS_URL` environment variables (a `.env` file works too).

use std::path::PathBuf;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Application name used for config/cache directory paths
const APP_NAME: &str = "satchel";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Default base URL for the account backend
const DEFAULT_API_BASE: &str = "http://127.0.0.1:5050";

/// Default base URL for the contacts service
const DEFAULT_CONTACTS_BASE: &str = "http://127.0.0.1:5000";

/// Most recent searches kept for the history dropdown
const MAX_RECENT_SEARCHES: usize = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentSearch {
    pub query: String,
    pub searched_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub api_base_url: Option<String>,
    pub contacts_base_url: Option<String>,
    pub last_email: Option<String>,
    #[serde(default)]
    pub recent_searches: Vec<RecentSearch>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir =
            dirs::config_dir().ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory for the log file and other disposable data
    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir =
            dirs::cache_dir().ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    /// Account backend base URL: env override, then config, then default.
    /// Trailing slashes are trimmed so paths can be appended directly.
    pub fn api_base(&self) -> String {
        let base = std::env::var("SATCHEL_API_URL")
            .ok()
            .or_else(|| self.api_base_url.clone())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        base.trim_end_matches('/').to_string()
    }

    /// Contacts service base URL: env override, then config, then default
    pub fn contacts_base(&self) -> String {
        let base = std::env::var("SATCHEL_CONTACTS_URL")
            .ok()
            .or_else(|| self.contacts_base_url.clone())
            .unwrap_or_else(|| DEFAULT_CONTACTS_BASE.to_string());
        base.trim_end_matches('/').to_string()
    }

    /// Record a search: most recent first, deduplicated, capped
    pub fn remember_search(&mut self, query: &str) {
        self.recent_searches.retain(|s| s.query != query);
        self.recent_searches.insert(
            0,
            RecentSearch {
                query: query.to_string(),
                searched_at: Utc::now(),
            },
        );
        self.recent_searches.truncate(MAX_RECENT_SEARCHES);
    }

    /// Drop one entry from the search history
    pub fn forget_search(&mut self, query: &str) {
        self.recent_searches.retain(|s| s.query != query);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remember_search_dedupes_and_caps() {
        let mut config = Config::default();
        for query in ["a", "b", "c", "d", "e", "f"] {
            config.remember_search(query);
        }
        assert_eq!(config.recent_searches.len(), MAX_RECENT_SEARCHES);
        assert_eq!(config.recent_searches[0].query, "f");

        // Repeating a query moves it to the front instead of duplicating it
        config.remember_search("d");
        assert_eq!(config.recent_searches.len(), MAX_RECENT_SEARCHES);
        assert_eq!(config.recent_searches[0].query, "d");
        let d_count = config
            .recent_searches
            .iter()
            .filter(|s| s.query == "d")
            .count();
        assert_eq!(d_count, 1);
    }

    #[test]
    fn forget_search_removes_entry() {
        let mut config = Config::default();
        config.remember_search("keep");
        config.remember_search("drop");
        config.forget_search("drop");

        assert_eq!(config.recent_searches.len(), 1);
        assert_eq!(config.recent_searches[0].query, "keep");
    }

    #[test]
    fn config_round_trips_through_json() {
        let mut config = Config {
            api_base_url: Some("http://api.example.test".to_string()),
            contacts_base_url: None,
            last_email: Some("a@b.com".to_string()),
            recent_searches: Vec::new(),
        };
        config.remember_search("sunset");

        let json = serde_json::to_string_pretty(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.api_base_url.as_deref(), Some("http://api.example.test"));
        assert_eq!(parsed.last_email.as_deref(), Some("a@b.com"));
        assert_eq!(parsed.recent_searches.len(), 1);
        assert_eq!(parsed.recent_searches[0].query, "sunset");
    }

    #[test]
    fn missing_base_urls_fall_back_to_defaults() {
        let config = Config::default();
        // Guard: only meaningful when the env overrides are not set
        if std::env::var("SATCHEL_API_URL").is_err() {
            assert_eq!(config.api_base(), DEFAULT_API_BASE);
        }
        if std::env::var("SATCHEL_CONTACTS_URL").is_err() {
            assert_eq!(config.contacts_base(), DEFAULT_CONTACTS_BASE);
        }
    }
}
