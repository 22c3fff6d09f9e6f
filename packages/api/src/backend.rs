//! The persistence seam between the stores and their storage.
//!
//! A client is built with exactly one [`Backend`]. The stores own the in-memory
//! state and call into the backend for every state change; they only update
//! that state once the returned future resolves successfully.

use std::future::Future;

use store::{Post, PostDraft, PostPatch, ProfileUpdate, Registration, StoreError, UserInfo};

use crate::auth::Session;

/// Async interface implemented by [`RemoteBackend`](crate::RemoteBackend) and
/// [`LocalBackend`](crate::LocalBackend).
pub trait Backend {
    /// Rebuild the session from persisted data.
    ///
    /// `Ok(None)` means nothing was persisted. An error means something was
    /// persisted but is no longer valid; callers are expected to
    /// [`clear_session`](Backend::clear_session).
    fn restore_session(&self) -> impl Future<Output = Result<Option<Session>, StoreError>>;

    /// Remove the persisted token or current-user record. Idempotent.
    fn clear_session(&self) -> impl Future<Output = Result<(), StoreError>>;

    /// Create an account from a normalized, validated form and persist the new session.
    fn register(&self, form: &Registration)
        -> impl Future<Output = Result<Session, StoreError>>;

    /// Check credentials and persist the new session.
    fn login(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<Session, StoreError>>;

    fn email_exists(&self, email: &str) -> impl Future<Output = Result<bool, StoreError>>;

    fn update_profile(
        &self,
        session: &Session,
        update: &ProfileUpdate,
    ) -> impl Future<Output = Result<UserInfo, StoreError>>;

    /// All posts, most recent first.
    fn list_posts(
        &self,
        session: Option<&Session>,
    ) -> impl Future<Output = Result<Vec<Post>, StoreError>>;

    /// Create a post owned by the session's user. The backend assigns the id
    /// and creation time.
    fn create_post(
        &self,
        session: &Session,
        draft: &PostDraft,
    ) -> impl Future<Output = Result<Post, StoreError>>;

    fn update_post(
        &self,
        session: &Session,
        post_id: &str,
        patch: &PostPatch,
    ) -> impl Future<Output = Result<Post, StoreError>>;

    fn delete_post(
        &self,
        session: &Session,
        post_id: &str,
    ) -> impl Future<Output = Result<(), StoreError>>;
}
