//! Authentication module for managing the user session and its credential.
//!
//! This module provides:
//! - `SessionManager`: the single source of truth for "who is logged in",
//!   resolved against the account backend and published to subscribers
//! - `CredentialStore`: durable single-slot token storage, with a keyring
//!   implementation and an in-memory one for tests and ephemeral runs
//!
//! The session credential is a bearer token issued by the login endpoint.

pub mod credentials;
pub mod session;

pub use credentials::{CredentialStore, KeyringStore, MemoryStore};
pub use session::{
    AuthBackend, AuthError, Identity, LoginGrant, SessionManager, SessionState, SessionStatus,
};
