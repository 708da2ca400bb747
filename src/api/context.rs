//! Application context shared by every handler.
//!
//! Built once at startup, handed to the router as an `Extension`, and torn
//! down after the server stops accepting requests.

use anyhow::{Context, Result};
use secrecy::SecretString;
use sqlx::SqlitePool;
use std::time::Duration;
use tracing::info;

use super::handlers::auth::{AuthConfig, SessionStore};
use crate::users::store;

pub struct AppContext {
    pool: SqlitePool,
    sessions: SessionStore,
    config: AuthConfig,
}

impl AppContext {
    #[must_use]
    pub fn new(pool: SqlitePool, sessions: SessionStore, config: AuthConfig) -> Self {
        Self {
            pool,
            sessions,
            config,
        }
    }

    /// Open the user store, seed it if empty and set up an empty session store.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or seeding fails.
    pub async fn init(dsn: &str, session_secret: SecretString, config: AuthConfig) -> Result<Self> {
        let pool = store::connect(dsn).await?;

        let seeded = store::seed(&pool)
            .await
            .context("Failed to seed user store")?;
        if seeded == 0 {
            info!("user store already initialized");
        }

        let sessions = SessionStore::new(
            session_secret,
            Duration::from_secs(config.session_ttl_seconds()),
        );

        Ok(Self::new(pool, sessions, config))
    }

    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    #[must_use]
    pub const fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    #[must_use]
    pub const fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Drop all sessions and close the pool.
    pub async fn shutdown(&self) {
        self.sessions.clear().await;
        self.pool.close().await;
        info!("application context closed");
    }
}
