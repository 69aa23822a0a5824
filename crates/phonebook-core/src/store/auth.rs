// ── Auth slice ──

use phonebook_api::BearerToken;

use super::Store;
use crate::error::ErrorInfo;
use crate::model::User;

/// Request status of the most recent auth operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum AuthStatus {
    #[default]
    Idle,
    Pending,
    Failed,
}

/// Session state. The token is the only credential; `is_logged_in` is
/// derived from it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    pub user: Option<User>,
    pub token: Option<BearerToken>,
    pub is_refreshing: bool,
    pub status: AuthStatus,
    pub error: Option<ErrorInfo>,
}

impl AuthState {
    pub fn is_logged_in(&self) -> bool {
        self.token.is_some()
    }
}

impl Store {
    pub fn token(&self) -> Option<BearerToken> {
        self.auth.borrow().token.clone()
    }

    pub fn is_logged_in(&self) -> bool {
        self.auth.borrow().is_logged_in()
    }

    pub fn user(&self) -> Option<User> {
        self.auth.borrow().user.clone()
    }

    pub fn is_refreshing(&self) -> bool {
        self.auth.borrow().is_refreshing
    }

    // ── Transitions ──────────────────────────────────────────────

    pub(crate) fn auth_pending(&self) {
        self.auth.send_modify(|state| {
            state.status = AuthStatus::Pending;
            state.error = None;
        });
    }

    /// Register/login succeeded.
    pub(crate) fn auth_fulfilled(&self, user: User, token: BearerToken) {
        self.auth.send_modify(|state| {
            state.user = Some(user);
            state.token = Some(token);
            state.is_refreshing = false;
            state.status = AuthStatus::Idle;
            state.error = None;
        });
    }

    pub(crate) fn auth_rejected(&self, error: ErrorInfo) {
        self.auth.send_modify(|state| {
            state.status = AuthStatus::Failed;
            state.error = Some(error);
        });
    }

    pub(crate) fn refresh_pending(&self) {
        self.auth.send_modify(|state| {
            state.is_refreshing = true;
            state.status = AuthStatus::Pending;
            state.error = None;
        });
    }

    pub(crate) fn refresh_fulfilled(&self, user: User) {
        self.auth.send_modify(|state| {
            state.user = Some(user);
            state.is_refreshing = false;
            state.status = AuthStatus::Idle;
        });
    }

    /// Refresh failed. With `clear_session` the user and token are dropped.
    pub(crate) fn refresh_rejected(&self, error: ErrorInfo, clear_session: bool) {
        self.auth.send_modify(|state| {
            if clear_session {
                state.user = None;
                state.token = None;
            }
            state.is_refreshing = false;
            state.status = AuthStatus::Failed;
            state.error = Some(error);
        });
    }

    /// Install a persisted token. The user stays unknown until a refresh.
    pub(crate) fn token_restored(&self, token: BearerToken) {
        self.auth.send_modify(|state| {
            *state = AuthState {
                token: Some(token),
                ..AuthState::default()
            };
        });
    }

    pub(crate) fn session_cleared(&self) {
        self.auth.send_modify(|state| *state = AuthState::default());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn user() -> User {
        User {
            name: "A".into(),
            email: "a@b.com".into(),
        }
    }

    #[test]
    fn login_flag_follows_token() {
        let store = Store::new();
        assert!(!store.is_logged_in());

        store.auth_pending();
        assert_eq!(store.auth().status, AuthStatus::Pending);
        assert!(!store.is_logged_in());

        store.auth_fulfilled(user(), BearerToken::new("T1"));
        let state = store.auth();
        assert!(state.is_logged_in());
        assert_eq!(state.token, Some(BearerToken::new("T1")));
        assert_eq!(state.status, AuthStatus::Idle);

        store.session_cleared();
        assert!(!store.is_logged_in());
        assert_eq!(store.auth(), AuthState::default());
    }

    #[test]
    fn rejected_auth_keeps_anonymous_state() {
        let store = Store::new();
        store.auth_pending();
        store.auth_rejected(ErrorInfo::new(ErrorKind::Validation, "Login failed", 400));

        let state = store.auth();
        assert!(!state.is_logged_in());
        assert_eq!(state.status, AuthStatus::Failed);
        assert_eq!(state.error.map(|e| e.status), Some(400));
    }

    #[test]
    fn refresh_rejection_respects_clear_flag() {
        let store = Store::new();
        store.auth_fulfilled(user(), BearerToken::new("T1"));

        store.refresh_pending();
        assert!(store.is_refreshing());
        store.refresh_rejected(ErrorInfo::no_token(), false);
        assert!(!store.is_refreshing());
        assert!(store.is_logged_in());

        store.refresh_pending();
        store.refresh_rejected(ErrorInfo::no_token(), true);
        assert!(!store.is_logged_in());
        assert_eq!(store.user(), None);
    }

    #[test]
    fn restored_token_has_no_user() {
        let store = Store::new();
        store.token_restored(BearerToken::new("persisted"));
        assert!(store.is_logged_in());
        assert_eq!(store.user(), None);
    }
}
