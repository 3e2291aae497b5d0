//! Data models for satchel entities.
//!
//! - `Contact`: contacts-service records (camelCase on the wire)
//! - `ImageRecord`, `SearchPage`, `SearchQuery`: Openverse search types,
//!   plus the filter option lists from the Openverse API docs
//! - `FavouriteRef`: favourite image ids stored by the account backend
//! - `UserSettings`: per-account settings

pub mod contact;
pub mod image;
pub mod settings;

pub use contact::{Contact, ContactDraft, ContactsResponse};
pub use image::{
    FavouriteRef, ImageRecord, SearchPage, SearchQuery, ASPECT_RATIO_OPTIONS, CATEGORY_OPTIONS,
    EXTENSION_OPTIONS, LICENSE_OPTIONS, SIZE_OPTIONS,
};
pub use settings::UserSettings;
