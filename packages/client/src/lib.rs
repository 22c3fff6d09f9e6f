//! Client-side state for Postboard: the session store, the post store, and
//! the context that ties them to one backend.

mod auth;
mod backend;
mod context;
mod posts;
pub mod settings;

pub use auth::{AuthState, SessionStore, SESSION_EXPIRED};
pub use backend::{data_dir, make_backend, ClientBackend};
pub use context::AppContext;
pub use posts::PostStore;

pub use store::{ClientConfig, Post, PostDraft, PostPatch, ProfileUpdate, Registration, StoreError, UserInfo};
