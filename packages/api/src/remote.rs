//! # Remote backend for the posts HTTP API
//!
//! [`RemoteBackend`] talks JSON to the API rooted at
//! [`RemoteConfig::base_url`](store::config::RemoteConfig). The server assigns
//! ids and timestamps and owns all data; the only thing kept locally is the bearer
//! token, in the [`AUTH_TOKEN`] record.
//!
//! ## Endpoints
//!
//! | Method | Path | Body | Response |
//! |--------|------|------|----------|
//! | `POST` | `/auth/register` | [`Registration`] | `{token, user}` |
//! | `POST` | `/auth/login` | `{email, password}` | `{token, user}` |
//! | `GET` | `/auth/verify-token` | | `{user}` |
//! | `POST` | `/auth/check-email` | `{email}` | `{exists}` |
//! | `PUT` | `/users/profile` | [`ProfileUpdate`] | `{user}` |
//! | `GET` | `/posts` | | `{posts}` |
//! | `POST` | `/posts` | [`PostDraft`] | `{post}` |
//! | `PUT` | `/posts/{id}` | [`PostPatch`] | `{post}` |
//! | `DELETE` | `/posts/{id}` | | ignored |
//!
//! Every request carries `Authorization: Bearer <token>` when a session exists.
//!
//! ## Errors
//!
//! Non-2xx responses are expected to carry `{"message": "..."}`; without one the
//! message is `HTTP error! status: <code>`. Status codes map onto [`StoreError`]:
//!
//! | Status | Error |
//! |--------|-------|
//! | 400, 422 | `Validation` (field `"request"`) |
//! | 401, 403 | `Auth` |
//! | 404 | `NotFound` |
//! | 409 | `Conflict` |
//! | anything else | `Transport` |
//!
//! Connection failures, timeouts, and undecodable bodies are `Transport` too.

use std::time::Duration;

use reqwest::{Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use store::config::RemoteConfig;
use store::records::AUTH_TOKEN;
use store::{
    Post, PostDraft, PostPatch, ProfileUpdate, RecordStore, Registration, StoreError, UserInfo,
};

use crate::auth::Session;
use crate::backend::Backend;
use crate::dto::*;

/// Backend that forwards every operation to the HTTP API.
#[derive(Clone, Debug)]
pub struct RemoteBackend<S: RecordStore> {
    http: reqwest::Client,
    base_url: Url,
    records: S,
}

impl<S: RecordStore> RemoteBackend<S> {
    /// Build a client for `config`, keeping the token in `records`.
    pub fn new(config: &RemoteConfig, records: S) -> Result<Self, StoreError> {
        let base_url = Url::parse(config.base_url.trim()).map_err(|e| {
            StoreError::transport(&format!("invalid API base URL '{}'", config.base_url), e)
        })?;
        if base_url.cannot_be_a_base() {
            return Err(StoreError::Transport(format!(
                "invalid API base URL '{}'",
                config.base_url
            )));
        }

        let mut builder = reqwest::Client::builder();
        if config.timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(config.timeout_secs));
        }
        let http = builder
            .build()
            .map_err(|e| StoreError::transport("build HTTP client", e))?;

        Ok(Self {
            http,
            base_url,
            records,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append path segments to the base URL, percent-encoding each one.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, segments: &[&str], token: Option<&str>) -> RequestBuilder {
        let request = self.http.request(method, self.url(segments));
        match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Send a request and return the raw body of a successful response.
    async fn send_raw(&self, request: RequestBuilder, endpoint: &str) -> Result<Vec<u8>, StoreError> {
        let response = request.send().await.map_err(|e| {
            tracing::error!("API request failed for {endpoint}: {e}");
            StoreError::transport("Could not reach the server", e)
        })?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| StoreError::transport("Could not read the server response", e))?;

        if status.is_success() {
            return Ok(body.to_vec());
        }

        let message = serde_json::from_slice::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.message)
            .unwrap_or_else(|| format!("HTTP error! status: {}", status.as_u16()));
        tracing::error!(status = status.as_u16(), "API request failed for {endpoint}: {message}");
        Err(error_for_status(status, message))
    }

    /// Send a request and decode the JSON body of a successful response.
    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        endpoint: &str,
    ) -> Result<T, StoreError> {
        let body = self.send_raw(request, endpoint).await?;
        serde_json::from_slice(&body).map_err(|e| {
            tracing::error!("Unexpected response from {endpoint}: {e}");
            StoreError::transport("Unexpected response from the server", e)
        })
    }

    /// Persist the token of a fresh login or registration.
    async fn establish(&self, response: AuthResponse) -> Result<Session, StoreError> {
        let Some(token) = response.token.filter(|t| !t.is_empty()) else {
            return Err(StoreError::Transport(
                "Server response did not include a session token".to_string(),
            ));
        };
        tracing::debug!("Setting session token");
        self.records.write(AUTH_TOKEN, token.clone()).await?;
        Ok(Session::new(response.user, Some(token)))
    }
}

/// Translate an unsuccessful status into the error taxonomy.
pub fn error_for_status(status: StatusCode, message: String) -> StoreError {
    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            StoreError::validation("request", message)
        }
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => StoreError::Auth(message),
        StatusCode::NOT_FOUND => StoreError::NotFound(message),
        StatusCode::CONFLICT => StoreError::Conflict(message),
        _ => StoreError::Transport(message),
    }
}

impl<S: RecordStore> Backend for RemoteBackend<S> {
    async fn restore_session(&self) -> Result<Option<Session>, StoreError> {
        let Some(token) = self.records.read(AUTH_TOKEN).await? else {
            tracing::debug!("No token found, user not logged in");
            return Ok(None);
        };
        let token = token.trim().to_string();
        if token.is_empty() {
            return Ok(None);
        }

        let request = self.request(Method::GET, &["auth", "verify-token"], Some(&token));
        let response: UserResponse = self.send(request, "/auth/verify-token").await?;
        tracing::debug!(user_id = %response.user.id, "Token verification successful");
        Ok(Some(Session::new(response.user, Some(token))))
    }

    async fn clear_session(&self) -> Result<(), StoreError> {
        tracing::debug!("Removing session token");
        self.records.remove(AUTH_TOKEN).await
    }

    async fn register(&self, form: &Registration) -> Result<Session, StoreError> {
        let request = self
            .request(Method::POST, &["auth", "register"], None)
            .json(form);
        let response: AuthResponse = self.send(request, "/auth/register").await?;
        self.establish(response).await
    }

    async fn login(&self, email: &str, password: &str) -> Result<Session, StoreError> {
        let request = self
            .request(Method::POST, &["auth", "login"], None)
            .json(&LoginRequest { email, password });
        let response: AuthResponse = self.send(request, "/auth/login").await?;
        self.establish(response).await
    }

    async fn email_exists(&self, email: &str) -> Result<bool, StoreError> {
        let request = self
            .request(Method::POST, &["auth", "check-email"], None)
            .json(&EmailRequest { email });
        let response: EmailExistsResponse = self.send(request, "/auth/check-email").await?;
        Ok(response.exists)
    }

    async fn update_profile(
        &self,
        session: &Session,
        update: &ProfileUpdate,
    ) -> Result<UserInfo, StoreError> {
        let request = self
            .request(Method::PUT, &["users", "profile"], session.token())
            .json(update);
        let response: UserResponse = self.send(request, "/users/profile").await?;
        Ok(response.user)
    }

    async fn list_posts(&self, session: Option<&Session>) -> Result<Vec<Post>, StoreError> {
        let token = session.and_then(Session::token);
        let request = self.request(Method::GET, &["posts"], token);
        let response: PostsResponse = self.send(request, "/posts").await?;
        Ok(response.posts)
    }

    async fn create_post(&self, session: &Session, draft: &PostDraft) -> Result<Post, StoreError> {
        let request = self
            .request(Method::POST, &["posts"], session.token())
            .json(draft);
        let response: PostResponse = self.send(request, "/posts").await?;
        tracing::debug!(post_id = %response.post.id, "Post created successfully");
        Ok(response.post)
    }

    async fn update_post(
        &self,
        session: &Session,
        post_id: &str,
        patch: &PostPatch,
    ) -> Result<Post, StoreError> {
        let request = self
            .request(Method::PUT, &["posts", post_id], session.token())
            .json(patch);
        let response: PostResponse = self.send(request, &format!("/posts/{post_id}")).await?;
        Ok(response.post)
    }

    async fn delete_post(&self, session: &Session, post_id: &str) -> Result<(), StoreError> {
        let request = self.request(Method::DELETE, &["posts", post_id], session.token());
        self.send_raw(request, &format!("/posts/{post_id}")).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use store::MemoryStore;

    fn backend(base_url: &str) -> RemoteBackend<MemoryStore> {
        let config = RemoteConfig {
            base_url: base_url.to_string(),
            timeout_secs: 5,
        };
        RemoteBackend::new(&config, MemoryStore::new()).unwrap()
    }

    #[test]
    fn test_url_joins_segments() {
        let remote = backend("http://localhost:5000/api");
        assert_eq!(
            remote.url(&["posts", "p1"]).as_str(),
            "http://localhost:5000/api/posts/p1"
        );

        // Trailing slash on the base does not produce an empty segment
        let remote = backend("http://localhost:5000/api/");
        assert_eq!(
            remote.url(&["auth", "verify-token"]).as_str(),
            "http://localhost:5000/api/auth/verify-token"
        );

        // Ids are encoded as a single segment
        assert_eq!(
            remote.url(&["posts", "a/b c"]).as_str(),
            "http://localhost:5000/api/posts/a%2Fb%20c"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let config = RemoteConfig {
            base_url: "not a url".to_string(),
            timeout_secs: 0,
        };
        let err = RemoteBackend::new(&config, MemoryStore::new()).unwrap_err();
        assert!(matches!(err, StoreError::Transport(_)));
    }

    #[test]
    fn test_error_for_status() {
        let msg = || "boom".to_string();
        assert_eq!(
            error_for_status(StatusCode::BAD_REQUEST, msg()).field(),
            Some("request")
        );
        assert!(error_for_status(StatusCode::UNAUTHORIZED, msg()).is_auth());
        assert!(error_for_status(StatusCode::FORBIDDEN, msg()).is_auth());
        assert_eq!(
            error_for_status(StatusCode::NOT_FOUND, msg()),
            StoreError::NotFound("boom".into())
        );
        assert_eq!(
            error_for_status(StatusCode::CONFLICT, msg()),
            StoreError::Conflict("boom".into())
        );
        assert_eq!(
            error_for_status(StatusCode::INTERNAL_SERVER_ERROR, msg()),
            StoreError::Transport("boom".into())
        );
    }
}
