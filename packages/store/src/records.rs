//! # Named text records, the persistence primitive under both backends
//!
//! A [`RecordStore`] maps a record name to a whole text document. Records are
//! always read and written wholesale; there is no partial update. The remote
//! backend keeps only the bearer token here, while the local backend keeps its
//! entire dataset in three JSON records.
//!
//! | Record | Used by | Contents |
//! |--------|---------|----------|
//! | [`AUTH_TOKEN`] | remote | the opaque bearer token, as plain text |
//! | [`USERS`] | local | JSON array of [`UserRecord`](crate::UserRecord) |
//! | [`CURRENT_USER`] | local | JSON [`UserInfo`](crate::UserInfo) of the logged-in user |
//! | [`POSTS`] | local | JSON array of [`Post`](crate::Post), most recent first |
//! | [`POST_SEQ`] | local | number of the last post id handed out |
//!
//! Implementations: [`MemoryStore`](crate::MemoryStore) for tests and
//! [`FileStore`](crate::FileStore) on disk.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StoreError;

pub const AUTH_TOKEN: &str = "auth_token";
pub const USERS: &str = "users";
pub const CURRENT_USER: &str = "currentUser";
pub const POSTS: &str = "posts";
pub const POST_SEQ: &str = "postSeq";

/// Async key/value storage of whole text records.
pub trait RecordStore {
    fn read(
        &self,
        name: &str,
    ) -> impl std::future::Future<Output = Result<Option<String>, StoreError>>;
    fn write(
        &self,
        name: &str,
        contents: String,
    ) -> impl std::future::Future<Output = Result<(), StoreError>>;
    /// Removing a missing record is not an error.
    fn remove(&self, name: &str) -> impl std::future::Future<Output = Result<(), StoreError>>;
}

/// Read and decode a JSON record. A missing record yields `None`.
pub async fn read_json<T, S>(store: &S, name: &str) -> Result<Option<T>, StoreError>
where
    T: DeserializeOwned,
    S: RecordStore,
{
    let Some(text) = store.read(name).await? else {
        return Ok(None);
    };
    serde_json::from_str(&text)
        .map(Some)
        .map_err(|e| StoreError::transport(&format!("corrupt record '{name}'"), e))
}

/// Encode `value` as pretty JSON and replace the record.
pub async fn write_json<T, S>(store: &S, name: &str, value: &T) -> Result<(), StoreError>
where
    T: Serialize + ?Sized,
    S: RecordStore,
{
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| StoreError::transport(&format!("encode record '{name}'"), e))?;
    store.write(name, text).await
}
