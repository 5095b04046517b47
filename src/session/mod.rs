//! Session management module.
//!
//! This module holds the client-side session (token, role, username), its
//! durable mirror, and the [`SessionManager`] that is the only writer of
//! both.

mod manager;
mod model;
mod role;
mod store;

pub use manager::SessionManager;
pub use model::{Credentials, Session};
pub use role::Role;
pub use store::{
    FileStorage, MemoryStorage, SessionStore, StorageBackend, StoredFields, ROLE_KEY,
    SESSION_KEYS, TOKEN_KEY, USERNAME_KEY,
};
