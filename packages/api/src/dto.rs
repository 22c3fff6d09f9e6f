//! JSON bodies of the remote API.

use serde::{Deserialize, Serialize};
use store::{Post, UserInfo};

/// `POST /auth/login` request.
#[derive(Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// `POST /auth/check-email` request.
#[derive(Serialize)]
pub struct EmailRequest<'a> {
    pub email: &'a str,
}

/// Response of `/auth/login` and `/auth/register`.
#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub token: Option<String>,
    pub user: UserInfo,
}

/// Response of `/auth/verify-token` and `/users/profile`.
#[derive(Debug, Deserialize)]
pub struct UserResponse {
    pub user: UserInfo,
}

#[derive(Debug, Deserialize)]
pub struct EmailExistsResponse {
    #[serde(default)]
    pub exists: bool,
}

#[derive(Debug, Deserialize)]
pub struct PostsResponse {
    #[serde(default)]
    pub posts: Vec<Post>,
}

#[derive(Debug, Deserialize)]
pub struct PostResponse {
    pub post: Post,
}

/// Body of any non-2xx response.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}
