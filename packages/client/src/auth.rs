//! Session store: who is logged in, and the last user-visible error.

use std::sync::Arc;

use api::{Backend, Session};
use parking_lot::RwLock;
use store::models::normalize_email;
use store::validate::{validate_login, validate_profile_update, validate_registration};
use store::{ProfileUpdate, Registration, StoreError, UserInfo};

pub const SESSION_EXPIRED: &str = "Your session has expired. Please log in again.";

/// Authentication state for the application.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthState {
    pub user: Option<UserInfo>,
    pub logged_in: bool,
    /// True until [`SessionStore::initialize`] finishes and while a login or
    /// registration is in flight.
    pub loading: bool,
    pub error: Option<String>,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            user: None,
            logged_in: false,
            loading: true,
            error: None,
        }
    }
}

#[derive(Default)]
struct Inner {
    state: AuthState,
    session: Option<Session>,
}

/// Owns the current session. Cloning yields another handle to the same state.
pub struct SessionStore<B> {
    backend: Arc<B>,
    inner: Arc<RwLock<Inner>>,
}

impl<B> Clone for SessionStore<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<B: Backend> SessionStore<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            inner: Arc::new(RwLock::new(Inner::default())),
        }
    }

    /// Rebuild the session from whatever the backend persisted.
    ///
    /// Never fails: stale tokens and unreadable records are removed and the
    /// store ends up logged out without an error message.
    pub async fn initialize(&self) {
        self.set_loading(true);
        match self.backend.restore_session().await {
            Ok(Some(session)) => {
                tracing::debug!(user_id = %session.user.id, "Session restored");
                self.establish(session);
            }
            Ok(None) => self.reset(None),
            Err(e) => {
                tracing::warn!("Token verification failed: {e}");
                if let Err(e) = self.backend.clear_session().await {
                    tracing::warn!("Failed to remove stale session: {e}");
                }
                self.reset(None);
            }
        }
    }

    pub async fn register(&self, form: &Registration) -> Result<UserInfo, StoreError> {
        let form = form.normalized();
        if let Err(e) = validate_registration(&form) {
            return self.fail(e);
        }

        self.set_loading(true);
        match self.backend.register(&form).await {
            Ok(session) => {
                tracing::info!(user_id = %session.user.id, "Registered new account");
                Ok(self.establish(session))
            }
            Err(e) => {
                self.set_loading(false);
                self.fail(e)
            }
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<UserInfo, StoreError> {
        if let Err(e) = validate_login(email, password) {
            return self.fail(e);
        }

        self.set_loading(true);
        match self.backend.login(&normalize_email(email), password).await {
            Ok(session) => {
                tracing::info!(user_id = %session.user.id, "Logged in");
                Ok(self.establish(session))
            }
            Err(e) => {
                self.set_loading(false);
                self.fail(e)
            }
        }
    }

    /// Log out. Safe to call while already logged out.
    ///
    /// The in-memory session is dropped even if the persisted one could not be
    /// removed; that failure is still reported.
    pub async fn logout(&self) -> Result<(), StoreError> {
        let removed = self.backend.clear_session().await;
        self.reset(None);
        removed.or_else(|e| {
            tracing::error!("Failed to remove persisted session: {e}");
            self.fail(StoreError::Transport(format!("Failed to logout: {e}")))
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.read().state.logged_in
    }

    pub fn current_user(&self) -> Option<UserInfo> {
        self.inner.read().state.user.clone()
    }

    pub fn state(&self) -> AuthState {
        self.inner.read().state.clone()
    }

    /// Message of the last failed operation.
    pub fn error(&self) -> Option<String> {
        self.inner.read().state.error.clone()
    }

    pub fn clear_error(&self) {
        self.inner.write().state.error = None;
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<UserInfo, StoreError> {
        let Some(session) = self.session() else {
            return self.fail(StoreError::Auth(
                "You must be logged in to update your profile".to_string(),
            ));
        };
        if let Err(e) = validate_profile_update(update) {
            return self.fail(e);
        }

        match self.backend.update_profile(&session, update).await {
            Ok(user) => {
                let mut inner = self.inner.write();
                inner.state.user = Some(user.clone());
                inner.state.error = None;
                if let Some(session) = inner.session.as_mut() {
                    session.user = user.clone();
                }
                Ok(user)
            }
            Err(e) if e.is_auth() => {
                self.expire().await;
                Err(e)
            }
            Err(e) => self.fail(e),
        }
    }

    /// Whether an account exists for `email`. Lookup failures count as "no".
    pub async fn check_email_exists(&self, email: &str) -> bool {
        match self.backend.email_exists(email).await {
            Ok(exists) => exists,
            Err(e) => {
                tracing::warn!("Email check failed: {e}");
                false
            }
        }
    }

    pub(crate) fn session(&self) -> Option<Session> {
        self.inner.read().session.clone()
    }

    /// Drop a session the backend no longer accepts.
    pub(crate) async fn expire(&self) {
        tracing::warn!("Session expired");
        if let Err(e) = self.backend.clear_session().await {
            tracing::warn!("Failed to remove expired session: {e}");
        }
        self.reset(Some(SESSION_EXPIRED.to_string()));
    }

    /// Record `err` as the visible error and return it.
    pub(crate) fn fail<T>(&self, err: StoreError) -> Result<T, StoreError> {
        self.report(err.to_string());
        Err(err)
    }

    pub(crate) fn report(&self, message: String) {
        self.inner.write().state.error = Some(message);
    }

    fn establish(&self, session: Session) -> UserInfo {
        let user = session.user.clone();
        let mut inner = self.inner.write();
        inner.state = AuthState {
            user: Some(user.clone()),
            logged_in: true,
            loading: false,
            error: None,
        };
        inner.session = Some(session);
        user
    }

    fn reset(&self, error: Option<String>) {
        let mut inner = self.inner.write();
        inner.state = AuthState {
            user: None,
            logged_in: false,
            loading: false,
            error,
        };
        inner.session = None;
    }

    fn set_loading(&self, loading: bool) {
        self.inner.write().state.loading = loading;
    }
}
