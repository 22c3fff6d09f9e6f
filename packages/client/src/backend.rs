//! Backend constructor for the configured persistence mode.
//!
//! Returns a [`ClientBackend`] backed by the backend selected in
//! [`ClientConfig::backend`]:
//! - **remote**: the HTTP API, with the token kept in a [`FileStore`]
//! - **local**: users, current user and posts as JSON files in a [`FileStore`]
//!
//! Both use the same data directory: `local.data_dir` when set, otherwise
//! `<platform data dir>/postboard`.

use std::path::PathBuf;

use api::{Backend, LocalBackend, RemoteBackend, Session};
use store::{
    BackendKind, ClientConfig, FileStore, Post, PostDraft, PostPatch, ProfileUpdate,
    Registration, StoreError, UserInfo,
};

/// The backend a client was built with.
#[derive(Clone, Debug)]
pub enum ClientBackend {
    Remote(RemoteBackend<FileStore>),
    Local(LocalBackend<FileStore>),
}

/// Directory holding the persisted records.
pub fn data_dir(config: &ClientConfig) -> PathBuf {
    let configured = config.local.data_dir.trim();
    if !configured.is_empty() {
        return PathBuf::from(configured);
    }
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("postboard")
}

/// Build the backend named by `config`.
pub fn make_backend(config: &ClientConfig) -> Result<ClientBackend, StoreError> {
    let records = FileStore::new(data_dir(config));
    tracing::debug!(kind = ?config.backend.kind, dir = %records.base().display(), "Opening backend");
    match config.backend.kind {
        BackendKind::Remote => Ok(ClientBackend::Remote(RemoteBackend::new(
            &config.remote,
            records,
        )?)),
        BackendKind::Local => Ok(ClientBackend::Local(LocalBackend::new(records))),
    }
}

impl ClientBackend {
    pub fn kind(&self) -> BackendKind {
        match self {
            Self::Remote(_) => BackendKind::Remote,
            Self::Local(_) => BackendKind::Local,
        }
    }
}

macro_rules! dispatch {
    ($self:ident, $b:ident => $call:expr) => {
        match $self {
            ClientBackend::Remote($b) => $call.await,
            ClientBackend::Local($b) => $call.await,
        }
    };
}

impl Backend for ClientBackend {
    async fn restore_session(&self) -> Result<Option<Session>, StoreError> {
        dispatch!(self, b => b.restore_session())
    }

    async fn clear_session(&self) -> Result<(), StoreError> {
        dispatch!(self, b => b.clear_session())
    }

    async fn register(&self, form: &Registration) -> Result<Session, StoreError> {
        dispatch!(self, b => b.register(form))
    }

    async fn login(&self, email: &str, password: &str) -> Result<Session, StoreError> {
        dispatch!(self, b => b.login(email, password))
    }

    async fn email_exists(&self, email: &str) -> Result<bool, StoreError> {
        dispatch!(self, b => b.email_exists(email))
    }

    async fn update_profile(
        &self,
        session: &Session,
        update: &ProfileUpdate,
    ) -> Result<UserInfo, StoreError> {
        dispatch!(self, b => b.update_profile(session, update))
    }

    async fn list_posts(&self, session: Option<&Session>) -> Result<Vec<Post>, StoreError> {
        dispatch!(self, b => b.list_posts(session))
    }

    async fn create_post(&self, session: &Session, draft: &PostDraft) -> Result<Post, StoreError> {
        dispatch!(self, b => b.create_post(session, draft))
    }

    async fn update_post(
        &self,
        session: &Session,
        post_id: &str,
        patch: &PostPatch,
    ) -> Result<Post, StoreError> {
        dispatch!(self, b => b.update_post(session, post_id, patch))
    }

    async fn delete_post(&self, session: &Session, post_id: &str) -> Result<(), StoreError> {
        dispatch!(self, b => b.delete_post(session, post_id))
    }
}
