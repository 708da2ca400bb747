//! # scoutauth (scouting dashboard login gateway)
//!
//! `scoutauth` keeps a small table of scouting team accounts, authenticates
//! login form submissions and gates the dashboard behind a server-side session.
//!
//! ## Accounts
//!
//! Users have a unique username, an Argon2id password hash and one of a closed
//! set of roles. The store is seeded with five fixed accounts the first time the
//! service starts against an empty database; there are no update or delete paths.
//!
//! ## Sessions
//!
//! A successful login issues a random token in an `HttpOnly` cookie. Only a
//! keyed digest of the token is kept server-side, in memory, so sessions do not
//! survive a restart. Unknown usernames and wrong passwords produce the same
//! `Invalid credentials` response.

pub mod api;
pub mod cli;
pub mod users;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};
