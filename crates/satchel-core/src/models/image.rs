use serde::{Deserialize, Serialize};

// Filter options from the Openverse API documentation

pub const LICENSE_OPTIONS: &[&str] = &[
    "by",
    "by-nc",
    "by-nc-nd",
    "by-nc-sa",
    "by-nd",
    "by-sa",
    "cc0",
    "nc-sampling+",
    "pdm",
    "sampling+",
];

pub const EXTENSION_OPTIONS: &[&str] = &["jpg", "png", "svg", "gif", "mp4", "webm", "tiff", "mov"];

pub const CATEGORY_OPTIONS: &[&str] = &["digitized_artwork", "illustration", "photograph"];

pub const SIZE_OPTIONS: &[&str] = &["large", "medium", "small"];

pub const ASPECT_RATIO_OPTIONS: &[&str] = &["square", "tall", "wide"];

/// An Openverse image, from either a search result or the detail endpoint.
/// Openverse fields are frequently null; everything but the id is optional.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageRecord {
    pub id: String,
    pub title: Option<String>,
    pub url: Option<String>,
    pub thumbnail: Option<String>,
    pub license: Option<String>,
    pub creator: Option<String>,
    pub source: Option<String>,
}

impl ImageRecord {
    pub fn display_title(&self) -> &str {
        match self.title.as_deref() {
            Some(title) if !title.is_empty() => title,
            _ => "(untitled)",
        }
    }
}

/// One page of Openverse search results.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchPage {
    #[serde(default)]
    pub result_count: u64,
    #[serde(default)]
    pub page_count: u32,
    #[serde(default)]
    pub results: Vec<ImageRecord>,
}

/// An image search request: query text, page, and the selected filters.
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    pub q: String,
    pub page: u32,
    pub licenses: Vec<String>,
    pub extensions: Vec<String>,
    pub categories: Vec<String>,
    pub sizes: Vec<String>,
    pub aspect_ratios: Vec<String>,
}

impl SearchQuery {
    pub fn new(q: impl Into<String>) -> Self {
        Self {
            q: q.into(),
            page: 1,
            ..Self::default()
        }
    }
}

/// A favourited image id as stored by the account backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FavouriteRef {
    pub image_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_favourite_refs() {
        let json = r#"[{"image_id": "abc-123"}, {"image_id": "def-456"}]"#;
        let favourites: Vec<FavouriteRef> = serde_json::from_str(json).unwrap();
        assert_eq!(favourites.len(), 2);
        assert_eq!(favourites[0].image_id, "abc-123");
    }

    #[test]
    fn untitled_images_get_a_placeholder() {
        let image = ImageRecord {
            id: "abc".to_string(),
            title: None,
            url: None,
            thumbnail: None,
            license: None,
            creator: None,
            source: None,
        };
        assert_eq!(image.display_title(), "(untitled)");

        let empty_title = ImageRecord {
            title: Some(String::new()),
            ..image
        };
        assert_eq!(empty_title.display_title(), "(untitled)");
    }

    #[test]
    fn detail_payload_with_extra_fields_still_parses() {
        // The detail endpoint returns far more fields than the record keeps
        let json = r#"{
            "id": "0b211a05-c472-40ea-bbec-2ba6efd39e1b",
            "title": "Sunset",
            "url": "https://example.org/sunset.jpg",
            "thumbnail": null,
            "license": "cc0",
            "license_version": "1.0",
            "creator": null,
            "source": "flickr",
            "tags": [{"name": "sky"}]
        }"#;

        let image: ImageRecord = serde_json::from_str(json).unwrap();
        assert_eq!(image.display_title(), "Sunset");
        assert_eq!(image.thumbnail, None);
        assert_eq!(image.source.as_deref(), Some("flickr"));
    }
}
