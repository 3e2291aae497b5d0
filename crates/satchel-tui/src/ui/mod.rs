//! Terminal UI module using ratatui.
//!
//! - `render`: main frame rendering, screens, and overlays
//! - `input`: keyboard event handling
//! - `styles`: the dark/light palette driven by the dark_mode setting
//! - `tabs`: per-tab content rendering (contacts, search, favourites,
//!   settings)

pub mod input;
pub mod render;
pub mod styles;
pub mod tabs;
