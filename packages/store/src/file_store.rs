//! # Filesystem-backed record store
//!
//! [`FileStore`] is a [`RecordStore`] implementation that keeps each record in
//! its own file. It retains the session token and, for the local backend, the
//! whole dataset across restarts.
//!
//! ## Layout
//!
//! ```text
//! <base_dir>/
//! ├── auth_token.json
//! ├── currentUser.json
//! ├── posts.json
//! └── users.json
//! ```
//!
//! Writes go to a sibling `.tmp` file first and are renamed into place, so a
//! crash mid-write leaves the previous version of the record intact.
//!
//! ## Platform data directories
//!
//! The client crate resolves an empty configured directory to
//! `dirs::data_dir()/postboard`:
//!
//! | Platform | Path |
//! |----------|------|
//! | macOS | `~/Library/Application Support/postboard/` |
//! | Linux | `~/.local/share/postboard/` |
//! | Windows | `C:\Users\<user>\AppData\Roaming\postboard\` |

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::StoreError;
use crate::records::RecordStore;

/// Filesystem-backed RecordStore.
#[derive(Clone, Debug)]
pub struct FileStore {
    base: PathBuf,
}

impl FileStore {
    pub fn new(base: PathBuf) -> Self {
        Self { base }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    fn record_path(&self, name: &str) -> PathBuf {
        self.base.join(format!("{name}.json"))
    }
}

impl RecordStore for FileStore {
    async fn read(&self, name: &str) -> Result<Option<String>, StoreError> {
        let path = self.record_path(name);
        match std::fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::transport(
                &format!("read {}", path.display()),
                e,
            )),
        }
    }

    async fn write(&self, name: &str, contents: String) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.base).map_err(|e| {
            StoreError::transport(&format!("create {}", self.base.display()), e)
        })?;

        let path = self.record_path(name);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, contents)
            .map_err(|e| StoreError::transport(&format!("write {}", tmp.display()), e))?;
        std::fs::rename(&tmp, &path)
            .map_err(|e| StoreError::transport(&format!("write {}", path.display()), e))
    }

    async fn remove(&self, name: &str) -> Result<(), StoreError> {
        let path = self.record_path(name);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::transport(
                &format!("remove {}", path.display()),
                e,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "postboard_store_{tag}_{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[tokio::test]
    async fn test_file_store_roundtrip() {
        let dir = temp_dir("roundtrip");

        let store = FileStore::new(dir.clone());
        store.write("posts", "[]".into()).await.unwrap();
        assert!(dir.join("posts.json").exists());
        assert!(!dir.join("posts.json.tmp").exists());

        // Re-open from same directory
        let store2 = FileStore::new(dir.clone());
        assert_eq!(store2.read("posts").await.unwrap().as_deref(), Some("[]"));

        // Overwrite replaces the whole record
        store2.write("posts", "[1]".into()).await.unwrap();
        assert_eq!(store.read("posts").await.unwrap().as_deref(), Some("[1]"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_missing_records() {
        let dir = temp_dir("missing");
        let store = FileStore::new(dir.clone());

        // Nothing on disk yet, not even the directory
        assert!(store.read("users").await.unwrap().is_none());
        store.remove("users").await.unwrap();

        store.write("auth_token", "t".into()).await.unwrap();
        store.remove("auth_token").await.unwrap();
        assert!(store.read("auth_token").await.unwrap().is_none());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
