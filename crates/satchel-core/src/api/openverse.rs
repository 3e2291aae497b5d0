//! Client for the public Openverse image API.
//!
//! Anonymous access: search with optional filters, and per-image detail
//! used to hydrate favourites (the backend only stores image ids).

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use crate::models::{ImageRecord, SearchPage, SearchQuery};

use super::ApiError;

const OPENVERSE_BASE_URL: &str = "https://api.openverse.org/v1";

/// Openverse search is slower than the local backends; allow more headroom.
const REQUEST_TIMEOUT_SECS: u64 = 20;

/// Results per page, sized for the results table.
const PAGE_SIZE: u32 = 10;

#[derive(Clone)]
pub struct OpenverseClient {
    client: Client,
    base: Arc<str>,
}

impl OpenverseClient {
    pub fn new() -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            base: OPENVERSE_BASE_URL.into(),
        })
    }

    /// Search images. Empty filter lists are omitted from the request;
    /// multi-valued filters are comma-joined as the API expects.
    pub async fn search(&self, query: &SearchQuery) -> Result<SearchPage, ApiError> {
        let params = Self::search_params(query);
        debug!(q = %query.q, page = query.page, "Searching Openverse");

        let response = self
            .client
            .get(format!("{}/images/", self.base))
            .query(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status, &body));
        }

        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| ApiError::InvalidResponse(format!("search payload: {e}")))
    }

    /// Fetch detail for a single image by its Openverse id
    pub async fn image(&self, id: &str) -> Result<ImageRecord, ApiError> {
        let response = self
            .client
            .get(format!("{}/images/{}", self.base, id))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status, &body));
        }

        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| ApiError::InvalidResponse(format!("image payload: {e}")))
    }

    fn search_params(query: &SearchQuery) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("q", query.q.clone()),
            ("page_size", PAGE_SIZE.to_string()),
            ("page", query.page.to_string()),
        ];

        let mut push_joined = |key: &'static str, values: &[String]| {
            if !values.is_empty() {
                params.push((key, values.join(",")));
            }
        };
        push_joined("license", &query.licenses);
        push_joined("extension", &query.extensions);
        push_joined("category", &query.categories);
        push_joined("size", &query.sizes);
        push_joined("aspect_ratio", &query.aspect_ratios);

        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_params_omit_empty_filters() {
        let query = SearchQuery::new("sunset");
        let params = OpenverseClient::search_params(&query);

        assert_eq!(
            params,
            vec![
                ("q", "sunset".to_string()),
                ("page_size", "10".to_string()),
                ("page", "1".to_string()),
            ]
        );
    }

    #[test]
    fn search_params_join_filters_with_commas() {
        let mut query = SearchQuery::new("cat");
        query.page = 3;
        query.licenses = vec!["by".to_string(), "cc0".to_string()];
        query.categories = vec!["photograph".to_string()];

        let params = OpenverseClient::search_params(&query);

        assert!(params.contains(&("page", "3".to_string())));
        assert!(params.contains(&("license", "by,cc0".to_string())));
        assert!(params.contains(&("category", "photograph".to_string())));
        assert!(!params.iter().any(|(key, _)| *key == "extension"));
    }

    #[test]
    fn search_page_parses_openverse_shape() {
        let json = r#"{
            "result_count": 124,
            "page_count": 13,
            "results": [
                {
                    "id": "0b211a05-c472-40ea-bbec-2ba6efd39e1b",
                    "title": "Sunset over water",
                    "url": "https://example.org/sunset.jpg",
                    "thumbnail": "https://example.org/sunset_small.jpg",
                    "license": "by",
                    "creator": "A. Photographer"
                }
            ]
        }"#;

        let page: SearchPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.result_count, 124);
        assert_eq!(page.page_count, 13);
        assert_eq!(page.results.len(), 1);
        assert_eq!(page.results[0].display_title(), "Sunset over water");
        assert_eq!(page.results[0].license.as_deref(), Some("by"));
    }
}
