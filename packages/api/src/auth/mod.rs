//! Authentication primitives shared by the backends.

mod password;
mod session;

pub use password::{hash_password, verify_password};
pub use session::Session;
