//! Post store: the in-memory post collection, most recent first.
//!
//! The collection only changes after the backend confirms an operation, so a
//! failed call leaves [`PostStore::list`] exactly as it was. List order is
//! insertion order: created posts are prepended and updated posts keep their
//! position.

use std::sync::Arc;

use api::{Backend, Session};
use parking_lot::RwLock;
use store::{Post, PostDraft, PostPatch, StoreError};

use crate::auth::SessionStore;

/// Handle to the post collection. Clones share the same collection.
pub struct PostStore<B> {
    backend: Arc<B>,
    sessions: SessionStore<B>,
    posts: Arc<RwLock<Vec<Post>>>,
}

impl<B> Clone for PostStore<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            sessions: self.sessions.clone(),
            posts: Arc::clone(&self.posts),
        }
    }
}

impl<B: Backend> PostStore<B> {
    pub fn new(backend: Arc<B>, sessions: SessionStore<B>) -> Self {
        Self {
            backend,
            sessions,
            posts: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Snapshot of every post, most recent first.
    pub fn list(&self) -> Vec<Post> {
        self.posts.read().clone()
    }

    pub fn get(&self, post_id: &str) -> Option<Post> {
        self.posts.read().iter().find(|p| p.id == post_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.posts.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.read().is_empty()
    }

    /// Replace the collection with the backend's.
    pub async fn refresh(&self) -> Result<(), StoreError> {
        let session = self.sessions.session();
        match self.backend.list_posts(session.as_ref()).await {
            Ok(posts) => {
                tracing::debug!(count = posts.len(), "Loaded posts");
                *self.posts.write() = posts;
                Ok(())
            }
            Err(e) => {
                tracing::error!("Failed to load posts: {e}");
                self.sessions.report("Failed to load posts".to_string());
                Err(e)
            }
        }
    }

    pub async fn create(&self, draft: &PostDraft) -> Result<Post, StoreError> {
        let session = self.require_session("You must be logged in to create a post")?;

        match self.backend.create_post(&session, draft).await {
            Ok(post) => {
                tracing::info!(post_id = %post.id, "Post created");
                self.posts.write().insert(0, post.clone());
                Ok(post)
            }
            Err(e) => self.failed(e).await,
        }
    }

    pub async fn update(&self, post_id: &str, patch: &PostPatch) -> Result<Post, StoreError> {
        let session = self.require_session("You must be logged in to edit a post")?;
        if self.get(post_id).is_none() {
            return self
                .sessions
                .fail(StoreError::NotFound("Post not found".to_string()));
        }

        match self.backend.update_post(&session, post_id, patch).await {
            Ok(post) => {
                let mut posts = self.posts.write();
                if let Some(slot) = posts.iter_mut().find(|p| p.id == post_id) {
                    *slot = post.clone();
                }
                Ok(post)
            }
            // Deleted elsewhere; drop the stale copy
            Err(e @ StoreError::NotFound(_)) => {
                self.posts.write().retain(|p| p.id != post_id);
                self.sessions.fail(e)
            }
            Err(e) => self.failed(e).await,
        }
    }

    /// Delete a post. Deleting an id that is not in the collection is a no-op.
    pub async fn delete(&self, post_id: &str) -> Result<(), StoreError> {
        let session = self.require_session("You must be logged in to delete a post")?;
        if self.get(post_id).is_none() {
            tracing::debug!(post_id, "Delete of unknown post ignored");
            return Ok(());
        }

        match self.backend.delete_post(&session, post_id).await {
            // Already gone on the backend's side
            Ok(()) | Err(StoreError::NotFound(_)) => {
                self.posts.write().retain(|p| p.id != post_id);
                tracing::info!(post_id, "Post deleted");
                Ok(())
            }
            Err(e) => self.failed(e).await,
        }
    }

    fn require_session(&self, message: &str) -> Result<Session, StoreError> {
        match self.sessions.session() {
            Some(session) => Ok(session),
            None => self.sessions.fail(StoreError::Auth(message.to_string())),
        }
    }

    async fn failed<T>(&self, err: StoreError) -> Result<T, StoreError> {
        tracing::error!("Post operation failed: {err}");
        if err.is_auth() {
            self.sessions.expire().await;
            return Err(err);
        }
        self.sessions.fail(err)
    }
}
