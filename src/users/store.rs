//! SQLite-backed user store.
//!
//! Users are written once, by [`seed`], when the table is empty. There are no
//! update or delete paths; the only read is a lookup by username.

use super::{Role, password};
use anyhow::{Context, Result};
use sqlx::{
    Row,
    sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow},
};
use std::{fmt, str::FromStr, time::Duration};
use tracing::{debug, info};

const SCHEMA_SQL: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/sql/schema.sql"));

const SELECT_USER_BY_USERNAME: &str =
    "SELECT id, username, password_hash, role FROM users WHERE username = ?";
const COUNT_USERS: &str = "SELECT COUNT(*) FROM users";
const INSERT_USER: &str = "INSERT INTO users (username, password_hash, role) VALUES (?, ?, ?)";

pub struct SeedAccount {
    pub username: &'static str,
    pub password: &'static str,
    pub role: Role,
}

/// Accounts inserted the first time the service starts against an empty store.
pub const SEED_ACCOUNTS: [SeedAccount; 5] = [
    SeedAccount {
        username: "admin",
        password: "adminpass",
        role: Role::Admin,
    },
    SeedAccount {
        username: "scout_leader",
        password: "leaderpass",
        role: Role::SemiAdmin,
    },
    SeedAccount {
        username: "scouter1",
        password: "scouterpass1",
        role: Role::NormalScouter,
    },
    SeedAccount {
        username: "scouter2",
        password: "scouterpass2",
        role: Role::SuperScouter,
    },
    SeedAccount {
        username: "scouter3",
        password: "scouterpass3",
        role: Role::PitScouter,
    },
];

#[derive(Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub role: Role,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password_hash", &"***")
            .field("role", &self.role)
            .finish()
    }
}

/// Open the SQLite pool and apply the schema.
///
/// File databases are created if missing. In-memory databases live as long as
/// their connection, so they get a single connection that is never recycled.
///
/// # Errors
/// Returns an error if the DSN is invalid, the database cannot be opened or the
/// schema cannot be applied.
pub async fn connect(dsn: &str) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(dsn)
        .with_context(|| format!("Invalid database DSN: {dsn}"))?
        .create_if_missing(true);

    let pool_options = if dsn.contains(":memory:") || dsn.contains("mode=memory") {
        SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
    } else {
        SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(5)
            .max_lifetime(Duration::from_secs(60 * 2))
            .test_before_acquire(true)
    };

    let pool = pool_options
        .connect_with(options)
        .await
        .context("Failed to connect to database")?;

    sqlx::raw_sql(SCHEMA_SQL)
        .execute(&pool)
        .await
        .context("Failed to apply database schema")?;

    debug!("database schema applied");

    Ok(pool)
}

/// Insert the seed accounts if the store has no users yet.
///
/// Returns the number of inserted users. A uniqueness violation is not
/// recovered from; it fails the whole seed.
///
/// # Errors
/// Returns an error if hashing or any statement fails.
pub async fn seed(pool: &SqlitePool) -> Result<u64> {
    let mut tx = pool
        .begin()
        .await
        .context("Failed to begin seed transaction")?;

    let existing: i64 = sqlx::query_scalar(COUNT_USERS)
        .fetch_one(&mut *tx)
        .await
        .context("Failed to count users")?;

    if existing > 0 {
        debug!(existing, "user store already populated, skipping seed");
        tx.rollback().await.context("Failed to end seed transaction")?;
        return Ok(0);
    }

    let mut inserted = 0;
    for account in &SEED_ACCOUNTS {
        let password_hash = password::hash_password(account.password).await?;
        sqlx::query(INSERT_USER)
            .bind(account.username)
            .bind(&password_hash)
            .bind(account.role.as_str())
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to insert seed user {}", account.username))?;
        inserted += 1;
    }

    tx.commit()
        .await
        .context("Failed to commit seed transaction")?;

    info!(inserted, "seeded user store");

    Ok(inserted)
}

/// Look up a user by exact username.
///
/// # Errors
/// Returns an error if the query fails or the stored role is not recognised.
pub async fn find_by_username(pool: &SqlitePool, username: &str) -> Result<Option<User>> {
    let row = sqlx::query(SELECT_USER_BY_USERNAME)
        .bind(username)
        .fetch_optional(pool)
        .await
        .context("Failed to query user")?;

    row.as_ref().map(user_from_row).transpose()
}

/// # Errors
/// Returns an error if the query fails.
pub async fn count(pool: &SqlitePool) -> Result<i64> {
    sqlx::query_scalar(COUNT_USERS)
        .fetch_one(pool)
        .await
        .context("Failed to count users")
}

fn user_from_row(row: &SqliteRow) -> Result<User> {
    let role: String = row.try_get("role")?;
    Ok(User {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        password_hash: row.try_get("password_hash")?,
        role: role.parse().context("Invalid role in user store")?,
    })
}
