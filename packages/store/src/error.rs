//! Error taxonomy shared by every layer of the client.
//!
//! The `Display` text of each variant is the message shown to the user, so the
//! stores can record `err.to_string()` verbatim as their current error.

use thiserror::Error;

/// Failure outcome of a store or backend operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Malformed input; the user can fix it by re-entering data.
    #[error("{message}")]
    Validation { field: String, message: String },

    /// The email is already registered.
    #[error("{0}")]
    Conflict(String),

    /// Bad credentials, or a missing or expired session.
    #[error("{0}")]
    Auth(String),

    /// The referenced post does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The persistence backend could not be reached or returned garbage.
    #[error("{0}")]
    Transport(String),
}

impl StoreError {
    /// Creates a validation error for a single field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates a transport error, prefixing the failing action.
    pub fn transport(action: &str, source: impl std::fmt::Display) -> Self {
        Self::Transport(format!("{action}: {source}"))
    }

    /// Whether this failure means the session can no longer be trusted.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }

    /// The offending field of a validation error.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Validation { field, .. } => Some(field),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_user_message() {
        let err = StoreError::validation("email", "Please enter a valid email address");
        assert_eq!(err.to_string(), "Please enter a valid email address");
        assert_eq!(err.field(), Some("email"));

        let err = StoreError::transport("read users", "permission denied");
        assert_eq!(err.to_string(), "read users: permission denied");
        assert!(err.field().is_none());
    }

    #[test]
    fn test_is_auth() {
        assert!(StoreError::Auth("Unauthorized".into()).is_auth());
        assert!(!StoreError::NotFound("Post not found".into()).is_auth());
    }
}
