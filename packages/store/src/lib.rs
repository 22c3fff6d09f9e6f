pub mod config;
pub mod error;
pub mod models;
pub mod records;
pub mod validate;

mod file_store;
mod memory;
pub use file_store::FileStore;
pub use memory::MemoryStore;

pub use config::{BackendKind, ClientConfig};
pub use error::StoreError;
pub use models::{Post, PostDraft, PostPatch, ProfileUpdate, Registration, UserInfo, UserRecord};
pub use records::RecordStore;
