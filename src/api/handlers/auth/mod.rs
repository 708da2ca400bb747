//! Auth handlers and supporting modules.
//!
//! `login` checks a username/password pair against the user store and opens a
//! session; `session` gates the dashboard on that session and clears it on
//! logout. Sessions live in memory for the lifetime of the process.

pub(crate) mod login;
pub(crate) mod session;
mod state;
mod storage;
pub(crate) mod types;
mod utils;

pub use login::{INVALID_CREDENTIALS, login, login_form};
pub use session::{dashboard, logout, session};
pub use state::AuthConfig;
pub use storage::SessionStore;
pub use utils::SESSION_COOKIE_NAME;
pub(crate) use utils::generate_session_secret;
