use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::StoreError;
use crate::records::RecordStore;

/// In-memory RecordStore for testing. Clones share the same records.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    records: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of the records currently held, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.records.lock().keys().cloned().collect();
        names.sort();
        names
    }
}

impl RecordStore for MemoryStore {
    async fn read(&self, name: &str) -> Result<Option<String>, StoreError> {
        Ok(self.records.lock().get(name).cloned())
    }

    async fn write(&self, name: &str, contents: String) -> Result<(), StoreError> {
        self.records.lock().insert(name.to_string(), contents);
        Ok(())
    }

    async fn remove(&self, name: &str) -> Result<(), StoreError> {
        self.records.lock().remove(name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Post, PostDraft, UserInfo};
    use crate::records::{read_json, write_json, POSTS};

    #[tokio::test]
    async fn test_write_read_remove() {
        let store = MemoryStore::new();

        assert!(store.read("auth_token").await.unwrap().is_none());

        store.write("auth_token", "abc".into()).await.unwrap();
        assert_eq!(store.read("auth_token").await.unwrap().as_deref(), Some("abc"));

        // Clones see the same data
        let other = store.clone();
        assert_eq!(other.names(), vec!["auth_token".to_string()]);

        store.remove("auth_token").await.unwrap();
        assert!(other.read("auth_token").await.unwrap().is_none());

        // Removing twice is fine
        store.remove("auth_token").await.unwrap();
    }

    #[tokio::test]
    async fn test_json_records() {
        let store = MemoryStore::new();
        let author = UserInfo {
            id: "u1".into(),
            email: "a@x.com".into(),
            full_name: "Ann".into(),
            profile_image: String::new(),
            bio: String::new(),
            created_at: None,
        };
        let posts = vec![Post::new(
            "p1".into(),
            &author,
            &PostDraft::new("Hi", "First"),
            chrono::Utc::now(),
        )];

        write_json(&store, POSTS, &posts).await.unwrap();
        let loaded: Vec<Post> = read_json(&store, POSTS).await.unwrap().unwrap();
        assert_eq!(loaded, posts);

        let missing: Option<Vec<Post>> = read_json(&store, "nothing").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_corrupt_record_is_transport_error() {
        let store = MemoryStore::new();
        store.write(POSTS, "not json".into()).await.unwrap();

        let err = read_json::<Vec<Post>, _>(&store, POSTS).await.unwrap_err();
        assert!(matches!(err, StoreError::Transport(_)));
    }
}
