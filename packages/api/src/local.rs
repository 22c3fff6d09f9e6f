//! # Local backend: the whole dataset in three JSON records
//!
//! [`LocalBackend`] keeps users, the current user, and posts in a
//! [`RecordStore`], with no server involved. Each operation reads the records
//! it needs wholesale, modifies them in memory, and writes them back wholesale.
//!
//! | Record | Contents |
//! |--------|----------|
//! | [`USERS`] | every registered [`UserRecord`], with its Argon2 password hash |
//! | [`CURRENT_USER`] | the logged-in [`UserInfo`]; absent when logged out |
//! | [`POSTS`] | every [`Post`], most recent first |
//!
//! Post ids are `p1`, `p2`, and so on, drawn from the [`POST_SEQ`] counter. The
//! counter never goes down, so the id of a deleted post is never handed out
//! again. User ids are random UUIDs.

use chrono::Utc;
use store::models::normalize_email;
use store::records::{read_json, write_json, CURRENT_USER, POSTS, POST_SEQ, USERS};
use store::{
    Post, PostDraft, PostPatch, ProfileUpdate, RecordStore, Registration, StoreError, UserInfo,
    UserRecord,
};

use crate::auth::{hash_password, verify_password, Session};
use crate::backend::Backend;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Backend persisting everything to a record store.
#[derive(Clone, Debug)]
pub struct LocalBackend<S: RecordStore> {
    records: S,
}

impl<S: RecordStore> LocalBackend<S> {
    pub fn new(records: S) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &S {
        &self.records
    }

    async fn load_users(&self) -> Result<Vec<UserRecord>, StoreError> {
        Ok(read_json(&self.records, USERS).await?.unwrap_or_default())
    }

    async fn load_posts(&self) -> Result<Vec<Post>, StoreError> {
        Ok(read_json(&self.records, POSTS).await?.unwrap_or_default())
    }

    async fn set_current_user(&self, user: &UserInfo) -> Result<(), StoreError> {
        write_json(&self.records, CURRENT_USER, user).await
    }

    /// Advance the post counter and return the new id.
    async fn next_post_id(&self, posts: &[Post]) -> Result<String, StoreError> {
        let last: u64 = read_json(&self.records, POST_SEQ).await?.unwrap_or(0);
        let next = last.max(highest_post_number(posts)) + 1;
        write_json(&self.records, POST_SEQ, &next).await?;
        Ok(format!("p{next}"))
    }
}

/// Highest `p<n>` number present, for collections written before the counter existed.
fn highest_post_number(posts: &[Post]) -> u64 {
    posts
        .iter()
        .filter_map(|p| p.id.strip_prefix('p')?.parse::<u64>().ok())
        .max()
        .unwrap_or(0)
}

impl<S: RecordStore> Backend for LocalBackend<S> {
    async fn restore_session(&self) -> Result<Option<Session>, StoreError> {
        let Some(current) = read_json::<UserInfo, _>(&self.records, CURRENT_USER).await? else {
            return Ok(None);
        };

        // Refresh from the users collection so profile edits are picked up
        let users = self.load_users().await?;
        let Some(record) = users.iter().find(|u| u.id == current.id) else {
            return Err(StoreError::Auth(
                "Stored session refers to an unknown user".to_string(),
            ));
        };
        Ok(Some(Session::new(record.to_info(), None)))
    }

    async fn clear_session(&self) -> Result<(), StoreError> {
        self.records.remove(CURRENT_USER).await
    }

    async fn register(&self, form: &Registration) -> Result<Session, StoreError> {
        let form = form.normalized();
        let mut users = self.load_users().await?;

        if users.iter().any(|u| u.email == form.email) {
            return Err(StoreError::Conflict(
                "An account with this email already exists".to_string(),
            ));
        }

        let password_hash = hash_password(&form.password)?;
        let record = UserRecord {
            id: uuid::Uuid::new_v4().to_string(),
            email: form.email,
            full_name: form.full_name,
            profile_image: form.profile_image,
            bio: form.bio,
            password_hash,
            created_at: Utc::now(),
        };
        let info = record.to_info();

        // The account exists once `users` is written; that write goes last
        self.set_current_user(&info).await?;
        users.push(record);
        if let Err(e) = write_json(&self.records, USERS, &users).await {
            if let Err(cleanup) = self.records.remove(CURRENT_USER).await {
                tracing::warn!("Failed to roll back current user: {cleanup}");
            }
            return Err(e);
        }

        tracing::debug!(user_id = %info.id, "Registered local user");
        Ok(Session::new(info, None))
    }

    async fn login(&self, email: &str, password: &str) -> Result<Session, StoreError> {
        let email = normalize_email(email);
        let users = self.load_users().await?;

        let Some(record) = users.iter().find(|u| u.email == email) else {
            return Err(StoreError::Auth(INVALID_CREDENTIALS.to_string()));
        };
        let valid = verify_password(password, &record.password_hash).inspect_err(|e| {
            tracing::error!(user_id = %record.id, "{e}");
        })?;
        if !valid {
            return Err(StoreError::Auth(INVALID_CREDENTIALS.to_string()));
        }

        let info = record.to_info();
        self.set_current_user(&info).await?;
        Ok(Session::new(info, None))
    }

    async fn email_exists(&self, email: &str) -> Result<bool, StoreError> {
        let email = normalize_email(email);
        Ok(self.load_users().await?.iter().any(|u| u.email == email))
    }

    async fn update_profile(
        &self,
        session: &Session,
        update: &ProfileUpdate,
    ) -> Result<UserInfo, StoreError> {
        let mut users = self.load_users().await?;
        let Some(record) = users.iter_mut().find(|u| u.id == session.user.id) else {
            return Err(StoreError::Auth(
                "Your session has expired. Please log in again.".to_string(),
            ));
        };
        record.apply(update);
        let info = record.to_info();

        write_json(&self.records, USERS, &users).await?;
        self.set_current_user(&info).await?;
        Ok(info)
    }

    async fn list_posts(&self, _session: Option<&Session>) -> Result<Vec<Post>, StoreError> {
        self.load_posts().await
    }

    async fn create_post(&self, session: &Session, draft: &PostDraft) -> Result<Post, StoreError> {
        let mut posts = self.load_posts().await?;
        let id = self.next_post_id(&posts).await?;
        let post = Post::new(id, &session.user, draft, Utc::now());

        posts.insert(0, post.clone());
        write_json(&self.records, POSTS, &posts).await?;
        Ok(post)
    }

    async fn update_post(
        &self,
        _session: &Session,
        post_id: &str,
        patch: &PostPatch,
    ) -> Result<Post, StoreError> {
        let mut posts = self.load_posts().await?;
        let Some(post) = posts.iter_mut().find(|p| p.id == post_id) else {
            return Err(StoreError::NotFound("Post not found".to_string()));
        };
        post.apply(patch, Utc::now());
        let updated = post.clone();

        write_json(&self.records, POSTS, &posts).await?;
        Ok(updated)
    }

    async fn delete_post(&self, _session: &Session, post_id: &str) -> Result<(), StoreError> {
        let mut posts = self.load_posts().await?;
        let before = posts.len();
        posts.retain(|p| p.id != post_id);
        if posts.len() == before {
            return Ok(());
        }
        write_json(&self.records, POSTS, &posts).await
    }
}
