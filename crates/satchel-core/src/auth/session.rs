//! Session management: the single source of truth for "who is logged in".
//!
//! The session starts `Unresolved`, moves through `Resolving` while the
//! stored credential is checked against the backend, and settles on
//! `Authenticated` or `Unauthenticated`. Explicit sign-in and sign-out
//! re-enter the machine; every transition is published on a watch channel
//! so views can re-check on each render.
//!
//! Resolution failures never escape to callers - they land in a well-defined
//! `Unauthenticated` state. Sign-in and sign-out failures are returned as
//! `AuthError` for the UI to display.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

use crate::api::ApiError;

use super::credentials::CredentialStore;

/// Authenticated user identity as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Identity {
    pub email: String,
}

/// Where the session currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// Process start, before the first resolution attempt.
    Unresolved,
    /// A resolution is in flight.
    Resolving,
    Authenticated,
    Unauthenticated,
}

/// Snapshot of the session published to subscribers.
///
/// Invariant: `identity` is present exactly when `status` is
/// `Authenticated`. `credential` is the bearer token in active use, when
/// one is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub status: SessionStatus,
    pub identity: Option<Identity>,
    pub credential: Option<String>,
}

impl SessionState {
    fn unresolved() -> Self {
        Self {
            status: SessionStatus::Unresolved,
            identity: None,
            credential: None,
        }
    }

    fn signed_out() -> Self {
        Self {
            status: SessionStatus::Unauthenticated,
            identity: None,
            credential: None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.status == SessionStatus::Authenticated
    }
}

/// Token grant returned by a successful login.
#[derive(Debug, Clone)]
pub struct LoginGrant {
    pub token: String,
    pub email: Option<String>,
}

/// Errors surfaced to callers of `sign_in`.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The backend rejected the credentials; the message is backend-supplied.
    #[error("{message}")]
    Credentials { message: String },

    /// The request could not be sent or received.
    #[error("network error: {0}")]
    Network(#[source] ApiError),

    /// The backend answered with something unexpected.
    #[error("unexpected response: {0}")]
    Backend(#[source] ApiError),
}

/// Backend operations the session manager depends on.
///
/// `ApiClient` implements this against the account backend; tests use a
/// scripted stub.
pub trait AuthBackend: Send + Sync + 'static {
    /// `GET /api/user` - resolve the identity behind a token.
    fn current_user(
        &self,
        token: Option<&str>,
    ) -> impl Future<Output = Result<Identity, ApiError>> + Send;

    /// `POST /api/login` - exchange credentials for a token.
    fn login(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<LoginGrant, ApiError>> + Send;

    /// `POST /api/logout` - end the server-side session.
    fn logout(&self, token: Option<&str>) -> impl Future<Output = Result<(), ApiError>> + Send;
}

struct Inner<B> {
    backend: B,
    store: Arc<dyn CredentialStore>,
    state: watch::Sender<SessionState>,
    /// Serializes resolutions; the holder owns the in-flight whoami request.
    resolve_lock: Mutex<()>,
    /// Completed-resolution counter, used to collapse concurrent `resolve`
    /// calls onto a single request.
    resolutions: AtomicU64,
}

/// Owns the in-memory session state and keeps it synchronized with the
/// backend and the credential store. Cheap to clone; clones share state.
pub struct SessionManager<B> {
    inner: Arc<Inner<B>>,
}

impl<B> Clone for SessionManager<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<B: AuthBackend> SessionManager<B> {
    pub fn new(backend: B, store: Arc<dyn CredentialStore>) -> Self {
        let (state, _) = watch::channel(SessionState::unresolved());
        Self {
            inner: Arc::new(Inner {
                backend,
                store,
                state,
                resolve_lock: Mutex::new(()),
                resolutions: AtomicU64::new(0),
            }),
        }
    }

    /// Latest published state.
    pub fn current(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    /// Subscribe to state transitions. The receiver always yields the most
    /// recent state; readers re-check it on every render.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    /// Resolve the session against the backend.
    ///
    /// Calls made while a resolution is already in flight do not issue a
    /// second request; they wait for the in-flight one and observe its
    /// result.
    pub async fn resolve(&self) -> SessionState {
        let seen = self.inner.resolutions.load(Ordering::Acquire);
        let _guard = self.inner.resolve_lock.lock().await;
        if self.inner.resolutions.load(Ordering::Acquire) != seen {
            // A resolution completed while we waited for the lock.
            return self.current();
        }
        let state = self.resolve_locked().await;
        self.inner.resolutions.fetch_add(1, Ordering::Release);
        state
    }

    /// Authenticate with the backend and resolve the resulting session.
    ///
    /// On success the returned token is persisted to the credential store
    /// and `resolve` semantics populate the identity. On failure the
    /// session stays `Unauthenticated` and the store is left untouched.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let grant = match self.inner.backend.login(email, password).await {
            Ok(grant) => grant,
            Err(ApiError::Unauthorized { message }) => {
                debug!("Login rejected by backend");
                return Err(AuthError::Credentials { message });
            }
            Err(e @ ApiError::Network(_)) => return Err(AuthError::Network(e)),
            Err(e) => return Err(AuthError::Backend(e)),
        };

        if let Err(e) = self.inner.store.set(&grant.token) {
            // The session still works for this run; it just won't survive
            // a restart.
            warn!(error = %e, "Failed to persist credential");
        }
        // Make the fresh token visible to the resolution below even if
        // persisting it failed.
        self.inner.state.send_modify(|state| {
            state.credential = Some(grant.token.clone());
        });

        let _guard = self.inner.resolve_lock.lock().await;
        let state = self.resolve_locked().await;
        self.inner.resolutions.fetch_add(1, Ordering::Release);

        match state.identity {
            Some(identity) => {
                info!(email = %identity.email, "Signed in");
                Ok(identity)
            }
            None => Err(AuthError::Backend(ApiError::InvalidResponse(
                "login succeeded but the session did not resolve".to_string(),
            ))),
        }
    }

    /// End the session. The logout request is best-effort; local state and
    /// the credential store are cleared regardless, before this returns.
    pub async fn sign_out(&self) {
        let token = self.known_credential();
        if let Err(e) = self.inner.backend.logout(token.as_deref()).await {
            debug!(error = %e, "Logout request failed");
        }
        if let Err(e) = self.inner.store.clear() {
            warn!(error = %e, "Failed to clear credential store");
        }
        self.inner.state.send_replace(SessionState::signed_out());
        info!("Signed out");
    }

    /// Issue the whoami request and publish the outcome. Caller must hold
    /// `resolve_lock`.
    async fn resolve_locked(&self) -> SessionState {
        let was_authenticated = self.current().is_authenticated();
        let token = self.known_credential();

        self.inner.state.send_replace(SessionState {
            status: SessionStatus::Resolving,
            identity: None,
            credential: token.clone(),
        });

        let state = match self.inner.backend.current_user(token.as_deref()).await {
            Ok(identity) => {
                debug!(email = %identity.email, "Session resolved");
                SessionState {
                    status: SessionStatus::Authenticated,
                    identity: Some(identity),
                    credential: token,
                }
            }
            Err(ApiError::Unauthorized { .. }) => {
                // The stored credential is no longer valid; purge it. When
                // this demotes a live session it stays silent - the gate
                // handles the redirect.
                if was_authenticated {
                    info!("Session expired, signing out locally");
                }
                if let Err(e) = self.inner.store.clear() {
                    warn!(error = %e, "Failed to clear rejected credential");
                }
                SessionState::signed_out()
            }
            Err(e) => {
                // Transient failure: unauthenticated for now, but the stored
                // credential stays for the next attempt.
                warn!(error = %e, "Session resolution failed");
                SessionState {
                    status: SessionStatus::Unauthenticated,
                    identity: None,
                    credential: None,
                }
            }
        };

        self.inner.state.send_replace(state.clone());
        state
    }

    /// The credential to present: the one in active use if any, otherwise
    /// whatever the store holds.
    fn known_credential(&self) -> Option<String> {
        if let Some(token) = self.inner.state.borrow().credential.clone() {
            return Some(token);
        }
        match self.inner.store.get() {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "Failed to read credential store");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;
    use crate::auth::credentials::MemoryStore;

    const EMAIL: &str = "a@b.com";
    const PASSWORD: &str = "pw";
    const TOKEN: &str = "jwt-token";

    /// Scripted account backend. Accepts one email/password pair, issues
    /// one token, and counts requests.
    struct StubBackend {
        whoami_calls: AtomicUsize,
        logout_calls: AtomicUsize,
        revoked: AtomicBool,
        offline: AtomicBool,
        whoami_delay: Duration,
    }

    impl StubBackend {
        fn new() -> Arc<Self> {
            Self::with_whoami_delay(Duration::ZERO)
        }

        fn with_whoami_delay(delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                whoami_calls: AtomicUsize::new(0),
                logout_calls: AtomicUsize::new(0),
                revoked: AtomicBool::new(false),
                offline: AtomicBool::new(false),
                whoami_delay: delay,
            })
        }
    }

    impl AuthBackend for Arc<StubBackend> {
        async fn current_user(&self, token: Option<&str>) -> Result<Identity, ApiError> {
            self.whoami_calls.fetch_add(1, Ordering::SeqCst);
            if !self.whoami_delay.is_zero() {
                tokio::time::sleep(self.whoami_delay).await;
            }
            if self.offline.load(Ordering::SeqCst) {
                return Err(ApiError::ServerError("connection refused".to_string()));
            }
            match token {
                Some(t) if t == TOKEN && !self.revoked.load(Ordering::SeqCst) => Ok(Identity {
                    email: EMAIL.to_string(),
                }),
                _ => Err(ApiError::Unauthorized {
                    message: "Invalid or expired token".to_string(),
                }),
            }
        }

        async fn login(&self, email: &str, password: &str) -> Result<LoginGrant, ApiError> {
            if self.offline.load(Ordering::SeqCst) {
                return Err(ApiError::ServerError("connection refused".to_string()));
            }
            if email == EMAIL && password == PASSWORD {
                Ok(LoginGrant {
                    token: TOKEN.to_string(),
                    email: Some(email.to_string()),
                })
            } else {
                Err(ApiError::Unauthorized {
                    message: "Invalid credentials".to_string(),
                })
            }
        }

        async fn logout(&self, _token: Option<&str>) -> Result<(), ApiError> {
            self.logout_calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn manager(
        backend: &Arc<StubBackend>,
        store: &Arc<MemoryStore>,
    ) -> SessionManager<Arc<StubBackend>> {
        let store: Arc<dyn CredentialStore> = store.clone();
        SessionManager::new(Arc::clone(backend), store)
    }

    #[tokio::test]
    async fn concurrent_resolves_share_one_request() {
        let backend = StubBackend::with_whoami_delay(Duration::from_millis(20));
        let store = Arc::new(MemoryStore::new());
        store.set(TOKEN).unwrap();
        let session = manager(&backend, &store);

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let session = session.clone();
                tokio::spawn(async move { session.resolve().await })
            })
            .collect();
        let mut states = Vec::new();
        for task in tasks {
            states.push(task.await.unwrap());
        }

        assert_eq!(backend.whoami_calls.load(Ordering::SeqCst), 1);
        for state in &states {
            assert_eq!(state, &states[0]);
            assert_eq!(state.status, SessionStatus::Authenticated);
            assert_eq!(state.identity.as_ref().unwrap().email, EMAIL);
        }
    }

    #[tokio::test]
    async fn resolve_with_empty_store_is_unauthenticated() {
        let backend = StubBackend::new();
        let store = Arc::new(MemoryStore::new());
        let session = manager(&backend, &store);

        assert_eq!(session.current().status, SessionStatus::Unresolved);
        let state = session.resolve().await;

        assert_eq!(state.status, SessionStatus::Unauthenticated);
        assert_eq!(state.identity, None);
        assert_eq!(backend.whoami_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn sign_in_persists_token_and_resolves_identity() {
        let backend = StubBackend::new();
        let store = Arc::new(MemoryStore::new());
        let session = manager(&backend, &store);
        session.resolve().await;

        let identity = session.sign_in(EMAIL, PASSWORD).await.unwrap();

        assert_eq!(identity.email, EMAIL);
        let state = session.current();
        assert_eq!(state.status, SessionStatus::Authenticated);
        assert_eq!(state.identity.as_ref().unwrap().email, EMAIL);
        assert_eq!(store.get().unwrap().as_deref(), Some(TOKEN));
    }

    #[tokio::test]
    async fn sign_in_failure_keeps_state_and_store() {
        let backend = StubBackend::new();
        let store = Arc::new(MemoryStore::new());
        let session = manager(&backend, &store);
        session.resolve().await;
        let whoami_before = backend.whoami_calls.load(Ordering::SeqCst);

        let err = session.sign_in(EMAIL, "wrong").await.unwrap_err();

        match err {
            AuthError::Credentials { message } => assert_eq!(message, "Invalid credentials"),
            other => panic!("expected credentials error, got {other:?}"),
        }
        assert_eq!(session.current().status, SessionStatus::Unauthenticated);
        assert_eq!(store.get().unwrap(), None);
        // A failed login must not trigger a resolution
        assert_eq!(backend.whoami_calls.load(Ordering::SeqCst), whoami_before);
    }

    #[tokio::test]
    async fn sign_out_clears_everything() {
        let backend = StubBackend::new();
        let store = Arc::new(MemoryStore::new());
        let session = manager(&backend, &store);
        session.sign_in(EMAIL, PASSWORD).await.unwrap();

        session.sign_out().await;

        let state = session.current();
        assert_eq!(state.status, SessionStatus::Unauthenticated);
        assert_eq!(state.identity, None);
        assert_eq!(state.credential, None);
        assert_eq!(store.get().unwrap(), None);
        assert_eq!(backend.logout_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn rejected_credential_demotes_and_purges() {
        let backend = StubBackend::new();
        let store = Arc::new(MemoryStore::new());
        store.set(TOKEN).unwrap();
        let session = manager(&backend, &store);

        let state = session.resolve().await;
        assert_eq!(state.status, SessionStatus::Authenticated);

        backend.revoked.store(true, Ordering::SeqCst);
        let state = session.resolve().await;

        assert_eq!(state.status, SessionStatus::Unauthenticated);
        assert_eq!(state.identity, None);
        assert_eq!(store.get().unwrap(), None);
    }

    #[tokio::test]
    async fn network_failure_keeps_stored_credential() {
        let backend = StubBackend::new();
        let store = Arc::new(MemoryStore::new());
        store.set(TOKEN).unwrap();
        backend.offline.store(true, Ordering::SeqCst);
        let session = manager(&backend, &store);

        let state = session.resolve().await;

        assert_eq!(state.status, SessionStatus::Unauthenticated);
        // Token survives for the next launch; the backend never rejected it
        assert_eq!(store.get().unwrap().as_deref(), Some(TOKEN));
    }

    #[tokio::test]
    async fn subscribers_observe_transitions() {
        let backend = StubBackend::new();
        let store = Arc::new(MemoryStore::new());
        let session = manager(&backend, &store);
        let rx = session.subscribe();

        session.resolve().await;
        assert_eq!(rx.borrow().status, SessionStatus::Unauthenticated);

        session.sign_in(EMAIL, PASSWORD).await.unwrap();
        assert!(rx.borrow().is_authenticated());

        session.sign_out().await;
        assert_eq!(rx.borrow().status, SessionStatus::Unauthenticated);
        assert_eq!(rx.borrow().identity, None);
    }
}
