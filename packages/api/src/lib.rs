//! # API crate: persistence backends for the Postboard client
//!
//! The stores in the `client` crate never talk to storage directly; they go
//! through the [`Backend`] trait defined here. Two implementations exist, and a
//! client is built with exactly one of them:
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`backend`] | The [`Backend`] trait: session restore/clear, register, login, profile, and post CRUD |
//! | [`remote`] | [`RemoteBackend`]: JSON over HTTP to the posts API with bearer-token auth |
//! | [`local`] | [`LocalBackend`]: users, current user, and posts as JSON records in a [`store::RecordStore`] |
//! | [`auth`] | Argon2 password hashing for the local backend and the [`Session`] type |
//! | [`dto`] | Request and response bodies of the HTTP API |

pub mod auth;
pub mod backend;
pub mod dto;
pub mod local;
pub mod remote;

pub use auth::Session;
pub use backend::Backend;
pub use local::LocalBackend;
pub use remote::RemoteBackend;

pub use store::{StoreError, UserInfo};
