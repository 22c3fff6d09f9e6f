//! The application context: one session store and one post store sharing a
//! backend, constructed once at startup.

use std::sync::Arc;

use api::Backend;
use store::{ClientConfig, ProfileUpdate, Registration, StoreError, UserInfo};

use crate::auth::{AuthState, SessionStore};
use crate::backend::{make_backend, ClientBackend};
use crate::posts::PostStore;

pub struct AppContext<B> {
    session: SessionStore<B>,
    posts: PostStore<B>,
}

impl<B> Clone for AppContext<B> {
    fn clone(&self) -> Self {
        Self {
            session: self.session.clone(),
            posts: self.posts.clone(),
        }
    }
}

impl AppContext<ClientBackend> {
    /// Build a context over the backend selected by `config`.
    pub fn open(config: &ClientConfig) -> Result<Self, StoreError> {
        Ok(Self::new(make_backend(config)?))
    }
}

impl<B: Backend> AppContext<B> {
    pub fn new(backend: B) -> Self {
        let backend = Arc::new(backend);
        let session = SessionStore::new(Arc::clone(&backend));
        let posts = PostStore::new(backend, session.clone());
        Self { session, posts }
    }

    /// Restore the persisted session, then load posts.
    pub async fn initialize(&self) {
        self.session.initialize().await;
        // A failed load is already recorded as the visible error
        let _ = self.posts.refresh().await;
    }

    pub fn session(&self) -> &SessionStore<B> {
        &self.session
    }

    pub fn posts(&self) -> &PostStore<B> {
        &self.posts
    }

    pub fn state(&self) -> AuthState {
        self.session.state()
    }

    pub fn error(&self) -> Option<String> {
        self.session.error()
    }

    pub fn clear_error(&self) {
        self.session.clear_error();
    }

    /// Register and reload posts for the new session.
    pub async fn register(&self, form: &Registration) -> Result<UserInfo, StoreError> {
        let user = self.session.register(form).await?;
        let _ = self.posts.refresh().await;
        Ok(user)
    }

    /// Log in and reload posts for the new session.
    pub async fn login(&self, email: &str, password: &str) -> Result<UserInfo, StoreError> {
        let user = self.session.login(email, password).await?;
        let _ = self.posts.refresh().await;
        Ok(user)
    }

    pub async fn logout(&self) -> Result<(), StoreError> {
        self.session.logout().await
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<UserInfo, StoreError> {
        self.session.update_profile(update).await
    }
}
