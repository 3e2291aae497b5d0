//! Access gate: decides what may be on screen for the current session state.
//!
//! The decision is re-derived from the latest session snapshot on every
//! frame, so a sign-out or an expired session anywhere in the app evicts
//! the user from protected screens on the next render.

use satchel_core::auth::{SessionState, SessionStatus};

/// What the gate allows on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Session not resolved yet: neutral loading screen, no redirect.
    Loading,
    /// No authenticated user: only the login screen.
    Login,
    /// Authenticated: protected content may render.
    Dashboard,
}

pub fn decide(state: &SessionState) -> GateDecision {
    match state.status {
        SessionStatus::Unresolved | SessionStatus::Resolving => GateDecision::Loading,
        SessionStatus::Unauthenticated => GateDecision::Login,
        SessionStatus::Authenticated => GateDecision::Dashboard,
    }
}

#[cfg(test)]
mod tests {
    use satchel_core::auth::Identity;

    use super::*;

    fn state(status: SessionStatus) -> SessionState {
        let identity = match status {
            SessionStatus::Authenticated => Some(Identity {
                email: "a@b.com".to_string(),
            }),
            _ => None,
        };
        SessionState {
            status,
            identity,
            credential: None,
        }
    }

    #[test]
    fn unresolved_and_resolving_hold_at_loading() {
        assert_eq!(decide(&state(SessionStatus::Unresolved)), GateDecision::Loading);
        assert_eq!(decide(&state(SessionStatus::Resolving)), GateDecision::Loading);
    }

    #[test]
    fn unauthenticated_redirects_to_login() {
        assert_eq!(decide(&state(SessionStatus::Unauthenticated)), GateDecision::Login);
    }

    #[test]
    fn authenticated_allows_the_dashboard() {
        assert_eq!(decide(&state(SessionStatus::Authenticated)), GateDecision::Dashboard);
    }

    #[test]
    fn losing_the_session_mid_view_redirects_on_next_evaluation() {
        // The app re-derives the decision from a watch channel every frame;
        // model one frame before and one frame after a sign-out elsewhere.
        let (tx, rx) = tokio::sync::watch::channel(state(SessionStatus::Authenticated));
        assert_eq!(decide(&rx.borrow()), GateDecision::Dashboard);

        tx.send_replace(state(SessionStatus::Unauthenticated));
        assert_eq!(decide(&rx.borrow()), GateDecision::Login);
    }
}
