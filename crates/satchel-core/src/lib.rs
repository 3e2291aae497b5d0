//! Core library for satchel.
//!
//! Everything the terminal UI builds on lives here:
//!
//! - `auth`: session management and durable credential storage
//! - `api`: HTTP clients for the account backend, the contacts service,
//!   and the public Openverse image API
//! - `models`: data structures for contacts, images, and user settings
//! - `config`: persisted application configuration

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
