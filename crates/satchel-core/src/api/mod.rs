//! HTTP clients for the services satchel talks to.
//!
//! - `ApiClient`: the self-hosted account backend (auth, settings,
//!   favourites) and the contacts service
//! - `OpenverseClient`: the public Openverse image API
//!
//! The account backend authenticates with a JWT bearer token obtained
//! from its login endpoint; the other two services are unauthenticated.

pub mod client;
pub mod error;
pub mod openverse;

pub use client::ApiClient;
pub use error::ApiError;
pub use openverse::OpenverseClient;
