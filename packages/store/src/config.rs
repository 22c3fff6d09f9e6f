//! # Client configuration (`postboard.toml`)
//!
//! Selects the persistence backend and holds its settings. The client crate
//! layers environment variables on top of this file; this module only defines
//! the shape and its defaults.
//!
//! ## Structure
//!
//! ```toml
//! [backend]
//! kind = "remote"            # "remote" or "local"
//!
//! [remote]
//! base_url = "http://localhost:5000/api"
//! timeout_secs = 30
//!
//! [local]
//! data_dir = ""              # empty = platform data directory
//! ```
//!
//! ## Types
//!
//! | Struct | Purpose |
//! |--------|---------|
//! | [`ClientConfig`] | Top-level config. Builder helpers (`local`, `with_base_url`), TOML (de)serialisation, and the canonical filename. |
//! | [`BackendConfig`] | Which backend a client is built with. Exactly one is active per client. |
//! | [`RemoteConfig`] | API base URL and request timeout (default **30 seconds**). |
//! | [`LocalConfig`] | Directory holding the local JSON records. |
//!
//! All structs derive or implement `Default`, so a missing or empty config
//! file is equivalent to the default configuration.

use serde::{Deserialize, Serialize};

/// Top-level configuration stored in `postboard.toml`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default)]
    pub local: LocalConfig,
}

/// Persistence backend selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Remote,
    Local,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default)]
    pub kind: BackendKind,
}

/// Remote API settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RemoteConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds. 0 disables the timeout.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:5000/api".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Local persistence settings.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LocalConfig {
    /// Directory for the JSON records. Empty means the platform data directory.
    #[serde(default)]
    pub data_dir: String,
}

impl ClientConfig {
    /// A config using the local backend rooted at `data_dir`.
    pub fn local(data_dir: impl Into<String>) -> Self {
        Self {
            backend: BackendConfig {
                kind: BackendKind::Local,
            },
            local: LocalConfig {
                data_dir: data_dir.into(),
            },
            ..Self::default()
        }
    }

    /// Builder method to point the remote backend at another API.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.remote.base_url = base_url.into();
        self
    }

    /// The well-known filename for the config file.
    pub fn filename() -> &'static str {
        "postboard.toml"
    }

    /// Parse from TOML string.
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Serialize to TOML string.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_is_default() {
        let config = ClientConfig::from_toml("").unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.backend.kind, BackendKind::Remote);
        assert_eq!(config.remote.base_url, "http://localhost:5000/api");
        assert_eq!(config.remote.timeout_secs, 30);
    }

    #[test]
    fn test_partial_file() {
        let config = ClientConfig::from_toml(
            r#"
            [backend]
            kind = "local"

            [local]
            data_dir = "/tmp/pb"
            "#,
        )
        .unwrap();
        assert_eq!(config, ClientConfig::local("/tmp/pb"));
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = ClientConfig::default().with_base_url("https://api.example.com");
        let text = config.to_toml().unwrap();
        assert!(text.contains("kind = \"remote\""));
        assert_eq!(ClientConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn test_unknown_backend_rejected() {
        assert!(ClientConfig::from_toml("[backend]\nkind = \"cloud\"").is_err());
    }
}
