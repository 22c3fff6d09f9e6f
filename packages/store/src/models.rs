//! # Domain models for users and posts
//!
//! These types travel in three directions: over the wire to the remote API, into
//! the local JSON records, and out to front-end code through the stores. The
//! serde field names follow the API's JSON format, so one set of types serves
//! both backends.
//!
//! ## Types
//!
//! | Struct | Represents |
//! |--------|-----------|
//! | [`UserInfo`] | The client-safe view of a user: id, email, display name, profile image, bio. Never carries a password. |
//! | [`UserRecord`] | A user as stored by the local backend, including the Argon2 password hash. Projects to [`UserInfo`] via [`UserRecord::to_info`]. |
//! | [`Post`] | A post with its owner id, denormalized author name/avatar, title, description, image reference, and timestamps. |
//! | [`PostDraft`] | The fields a user supplies when creating a post. |
//! | [`PostPatch`] | A partial update; `None` fields are left untouched by [`Post::apply`]. |
//! | [`Registration`] | The registration form. |
//! | [`ProfileUpdate`] | A partial update of the current user's profile. |

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User information safe to hand to front-end code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    #[serde(alias = "userId", alias = "_id")]
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub profile_image: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl UserInfo {
    /// Get display name, falling back to email if name is not set.
    pub fn display_name(&self) -> &str {
        if self.full_name.is_empty() {
            &self.email
        } else {
            &self.full_name
        }
    }
}

/// Full user record kept in the local `users` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: String,
    /// Trimmed and lower-cased; unique across the collection.
    pub email: String,
    pub full_name: String,
    #[serde(default)]
    pub profile_image: String,
    #[serde(default)]
    pub bio: String,
    /// PHC-format Argon2 hash.
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    /// Convert to UserInfo for client consumption.
    pub fn to_info(&self) -> UserInfo {
        UserInfo {
            id: self.id.clone(),
            email: self.email.clone(),
            full_name: self.full_name.clone(),
            profile_image: self.profile_image.clone(),
            bio: self.bio.clone(),
            created_at: Some(self.created_at),
        }
    }

    /// Apply a profile update in place. Supplied fields are trimmed.
    pub fn apply(&mut self, update: &ProfileUpdate) {
        if let Some(name) = &update.full_name {
            self.full_name = name.trim().to_string();
        }
        if let Some(image) = &update.profile_image {
            self.profile_image = image.trim().to_string();
        }
        if let Some(bio) = &update.bio {
            self.bio = bio.trim().to_string();
        }
    }
}

/// A post as listed by the post store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Unique and immutable once assigned.
    #[serde(rename = "postId")]
    pub id: String,
    /// Owning user. A back-reference only; the user is owned by the session side.
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "userName", default)]
    pub author_name: String,
    #[serde(rename = "userImageUrl", default)]
    pub author_image_url: String,
    #[serde(rename = "postTitle")]
    pub title: String,
    #[serde(rename = "postDescription", default)]
    pub description: String,
    #[serde(rename = "postImageUrl", default)]
    pub image_url: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Post {
    /// Build a new post owned by `author`.
    pub fn new(id: String, author: &UserInfo, draft: &PostDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            user_id: author.id.clone(),
            author_name: author.display_name().to_string(),
            author_image_url: author.profile_image.clone(),
            title: draft.title.clone(),
            description: draft.description.clone(),
            image_url: draft.image_url.clone(),
            created_at: now,
            updated_at: None,
        }
    }

    /// Merge the supplied fields of `patch` and stamp the update time.
    pub fn apply(&mut self, patch: &PostPatch, now: DateTime<Utc>) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(image_url) = &patch.image_url {
            self.image_url = image_url.clone();
        }
        self.updated_at = Some(now);
    }
}

/// Fields supplied when creating a post.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDraft {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub image_url: String,
}

impl PostDraft {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            image_url: String::new(),
        }
    }

    pub fn with_image(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = image_url.into();
        self
    }
}

/// Partial post update. Absent fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl PostPatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.image_url.is_none()
    }
}

/// Registration form fields.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub full_name: String,
    #[serde(default)]
    pub profile_image: String,
    #[serde(default)]
    pub bio: String,
}

impl Registration {
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        full_name: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            full_name: full_name.into(),
            ..Self::default()
        }
    }

    /// Trimmed copy with the email lower-cased. The password is left as typed.
    pub fn normalized(&self) -> Self {
        Self {
            email: normalize_email(&self.email),
            password: self.password.clone(),
            full_name: self.full_name.trim().to_string(),
            profile_image: self.profile_image.trim().to_string(),
            bio: self.bio.trim().to_string(),
        }
    }
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("full_name", &self.full_name)
            .field("profile_image", &self.profile_image)
            .field("bio", &self.bio)
            .finish()
    }
}

/// Partial profile update for the current user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

/// Canonical form of an email address: trimmed, lower-case.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ann() -> UserInfo {
        UserInfo {
            id: "u1".into(),
            email: "a@x.com".into(),
            full_name: "Ann".into(),
            profile_image: "https://img/ann.png".into(),
            bio: String::new(),
            created_at: None,
        }
    }

    #[test]
    fn test_post_wire_names() {
        let post = Post::new("p1".into(), &ann(), &PostDraft::new("Hi", "First"), Utc::now());
        let json = serde_json::to_value(&post).unwrap();
        assert_eq!(json["postId"], "p1");
        assert_eq!(json["userId"], "u1");
        assert_eq!(json["userName"], "Ann");
        assert_eq!(json["userImageUrl"], "https://img/ann.png");
        assert_eq!(json["postTitle"], "Hi");
        assert_eq!(json["postDescription"], "First");
        assert!(json.get("updatedAt").is_none());
    }

    #[test]
    fn test_apply_patch_merges_supplied_fields() {
        let created = Utc::now();
        let mut post = Post::new(
            "p1".into(),
            &ann(),
            &PostDraft::new("Hi", "First").with_image("https://img/1.png"),
            created,
        );
        post.apply(&PostPatch::title("Hi there"), created);

        assert_eq!(post.title, "Hi there");
        assert_eq!(post.description, "First");
        assert_eq!(post.image_url, "https://img/1.png");
        assert_eq!(post.updated_at, Some(created));
        assert_eq!(post.id, "p1");
    }

    #[test]
    fn test_user_info_accepts_user_id_alias() {
        let user: UserInfo =
            serde_json::from_str(r#"{"userId":"42","email":"b@y.org","fullName":"Bo"}"#).unwrap();
        assert_eq!(user.id, "42");
        assert_eq!(user.display_name(), "Bo");
        assert!(user.profile_image.is_empty());
    }

    #[test]
    fn test_display_name_falls_back_to_email() {
        let mut user = ann();
        user.full_name.clear();
        assert_eq!(user.display_name(), "a@x.com");
    }

    #[test]
    fn test_registration_normalized() {
        let mut form = Registration::new("  Ann@X.com ", " secret1 ", "  Ann ");
        form.bio = " hello ".into();
        let norm = form.normalized();
        assert_eq!(norm.email, "ann@x.com");
        assert_eq!(norm.password, " secret1 ");
        assert_eq!(norm.full_name, "Ann");
        assert_eq!(norm.bio, "hello");
        assert!(!format!("{form:?}").contains("secret1"));
    }
}
