//! Input validation for the auth forms and the post editor.
//!
//! The store-level checks ([`validate_registration`], [`validate_login`],
//! [`validate_profile_update`]) run before any backend call. [`validate_post_draft`]
//! holds the editor's form rules; the post store itself accepts any draft.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::StoreError;
use crate::models::{PostDraft, ProfileUpdate, Registration};

/// Minimum password length, in characters.
pub const MIN_PASSWORD_CHARS: usize = 6;
/// Minimum trimmed display-name length, in characters.
pub const MIN_NAME_CHARS: usize = 2;
/// Maximum post description length accepted by the editor.
pub const MAX_DESCRIPTION_CHARS: usize = 500;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn is_valid_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_CHARS
}

pub fn is_valid_name(name: &str) -> bool {
    name.trim().chars().count() >= MIN_NAME_CHARS
}

/// Check a (normalized) registration form. Reports the first offending field.
pub fn validate_registration(form: &Registration) -> Result<(), StoreError> {
    if !is_valid_email(&form.email) {
        return Err(StoreError::validation(
            "email",
            "Please enter a valid email address",
        ));
    }
    if !is_valid_password(&form.password) {
        return Err(StoreError::validation(
            "password",
            "Password must be at least 6 characters long",
        ));
    }
    if !is_valid_name(&form.full_name) {
        return Err(StoreError::validation(
            "fullName",
            "Full name must be at least 2 characters long",
        ));
    }
    Ok(())
}

pub fn validate_login(email: &str, password: &str) -> Result<(), StoreError> {
    // Passwords are taken as typed; only the email is trimmed
    if email.trim().is_empty() || password.is_empty() {
        let field = if email.trim().is_empty() { "email" } else { "password" };
        return Err(StoreError::validation(
            field,
            "Please enter both email and password",
        ));
    }
    if !is_valid_email(email.trim()) {
        return Err(StoreError::validation(
            "email",
            "Please enter a valid email address",
        ));
    }
    Ok(())
}

pub fn validate_profile_update(update: &ProfileUpdate) -> Result<(), StoreError> {
    match &update.full_name {
        Some(name) if !is_valid_name(name) => Err(StoreError::validation(
            "fullName",
            "Full name must be at least 2 characters long",
        )),
        _ => Ok(()),
    }
}

/// Editor rules: title and description are required, the description is capped.
pub fn validate_post_draft(draft: &PostDraft) -> Result<(), StoreError> {
    if draft.title.trim().is_empty() {
        return Err(StoreError::validation("title", "Please fill in all required fields"));
    }
    if draft.description.trim().is_empty() {
        return Err(StoreError::validation(
            "description",
            "Please fill in all required fields",
        ));
    }
    if draft.description.chars().count() > MAX_DESCRIPTION_CHARS {
        return Err(StoreError::validation(
            "description",
            format!("Description must be at most {MAX_DESCRIPTION_CHARS} characters"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_pattern() {
        assert!(is_valid_email("a@x.com"));
        assert!(is_valid_email("first.last@sub.example.org"));
        assert!(!is_valid_email("a@x"));
        assert!(!is_valid_email("a x@y.com"));
        assert!(!is_valid_email("@x.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_registration_reports_first_bad_field() {
        let err = validate_registration(&Registration::new("bad", "1", "A")).unwrap_err();
        assert_eq!(err.field(), Some("email"));

        let err = validate_registration(&Registration::new("a@x.com", "12345", "A")).unwrap_err();
        assert_eq!(err.field(), Some("password"));

        let err =
            validate_registration(&Registration::new("a@x.com", "secret1", " A ")).unwrap_err();
        assert_eq!(err.field(), Some("fullName"));

        assert!(validate_registration(&Registration::new("a@x.com", "secret1", "Ann")).is_ok());
    }

    #[test]
    fn test_login_requires_both_fields() {
        assert_eq!(validate_login("", "pw").unwrap_err().field(), Some("email"));
        assert_eq!(
            validate_login("a@x.com", "").unwrap_err().field(),
            Some("password")
        );
        assert_eq!(
            validate_login("nope", "secret1").unwrap_err().field(),
            Some("email")
        );
        assert!(validate_login(" a@x.com ", "secret1").is_ok());
    }

    #[test]
    fn test_whitespace_password_accepted_by_both_forms() {
        let form = Registration::new("a@x.com", "      ", "Ann");
        assert!(validate_registration(&form).is_ok());
        assert!(validate_login("a@x.com", "      ").is_ok());
    }

    #[test]
    fn test_profile_update_name_rule() {
        assert!(validate_profile_update(&ProfileUpdate::default()).is_ok());
        let update = ProfileUpdate {
            full_name: Some("B".into()),
            ..ProfileUpdate::default()
        };
        assert!(validate_profile_update(&update).is_err());
    }

    #[test]
    fn test_post_draft_rules() {
        assert!(validate_post_draft(&PostDraft::new("Hi", "First")).is_ok());
        assert_eq!(
            validate_post_draft(&PostDraft::new("  ", "First")).unwrap_err().field(),
            Some("title")
        );
        let long = "x".repeat(MAX_DESCRIPTION_CHARS + 1);
        assert_eq!(
            validate_post_draft(&PostDraft::new("Hi", long)).unwrap_err().field(),
            Some("description")
        );
    }
}
