//! User store, roles and password hashing.

pub mod password;
pub mod role;
pub mod store;

pub use role::{Capability, Role};
pub use store::User;
