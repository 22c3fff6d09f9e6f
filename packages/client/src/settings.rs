use std::path::Path;

use config::{Config, ConfigError, Environment, File, FileFormat};
use store::ClientConfig;

/// Prefix of environment overrides, e.g. `POSTBOARD__BACKEND__KIND=local`.
pub const ENV_PREFIX: &str = "POSTBOARD";

/// Shorthand for `POSTBOARD__REMOTE__BASE_URL`.
pub const API_URL_VAR: &str = "POSTBOARD_API_URL";

/// Layered client settings: defaults, then `postboard.toml` (or `path`), then
/// the environment. A `.env` file in the working directory is loaded first.
pub fn load(path: Option<&Path>) -> Result<ClientConfig, ConfigError> {
    dotenvy::dotenv().ok();

    let defaults = ClientConfig::default();
    let file = match path {
        Some(path) => File::from(path).format(FileFormat::Toml).required(true),
        None => File::with_name(ClientConfig::filename())
            .format(FileFormat::Toml)
            .required(false),
    };

    let config = Config::builder()
        .set_default("backend.kind", "remote")?
        .set_default("remote.base_url", defaults.remote.base_url)?
        .set_default("remote.timeout_secs", defaults.remote.timeout_secs)?
        .set_default("local.data_dir", defaults.local.data_dir)?
        .add_source(file)
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .set_override_option("remote.base_url", std::env::var(API_URL_VAR).ok())?
        .build()?;

    config.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env::{remove_var, set_var};
    use store::BackendKind;

    fn write_config(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("postboard-{name}-{}.toml", std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_file_settings() {
        let path = write_config(
            "file",
            r#"
            [backend]
            kind = "local"

            [local]
            data_dir = "/tmp/postboard-data"
            "#,
        );
        let config = load(Some(&path)).unwrap();
        assert_eq!(config.backend.kind, BackendKind::Local);
        assert_eq!(config.local.data_dir, "/tmp/postboard-data");
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let path = std::env::temp_dir().join("postboard-does-not-exist.toml");
        assert!(load(Some(&path)).is_err());
    }

    #[test]
    fn test_env_overrides() {
        let path = write_config("env", "[remote]\nbase_url = \"http://file.example/api\"\n");

        set_var("POSTBOARD__REMOTE__TIMEOUT_SECS", "5");
        let config = load(Some(&path)).unwrap();
        assert_eq!(config.remote.timeout_secs, 5);
        assert_eq!(config.remote.base_url, "http://file.example/api");

        set_var(API_URL_VAR, "https://api.example.com");
        let config = load(Some(&path)).unwrap();
        assert_eq!(config.remote.base_url, "https://api.example.com");

        remove_var(API_URL_VAR);
        remove_var("POSTBOARD__REMOTE__TIMEOUT_SECS");
        let _ = std::fs::remove_file(&path);
    }
}
