//! Session data types.

use store::UserInfo;

/// An authenticated session as established by a backend.
#[derive(Clone, PartialEq)]
pub struct Session {
    pub user: UserInfo,
    /// Bearer token for the remote API. The local backend has none.
    pub token: Option<String>,
}

impl Session {
    pub fn new(user: UserInfo, token: Option<String>) -> Self {
        Self { user, token }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("user", &self.user)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
