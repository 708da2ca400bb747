use axum::{
    body::Body,
    extract::Extension,
    http::{HeaderName, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use sqlx::{Connection, SqlitePool};
use std::sync::Arc;
use tracing::{Instrument, error, info_span};
use utoipa::ToSchema;

use crate::{GIT_COMMIT_HASH, api::AppContext};

const X_APP: HeaderName = HeaderName::from_static("x-app");

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct Health {
    commit: String,
    name: String,
    version: String,
    database: String,
}

impl Health {
    fn new(database_ok: bool) -> Self {
        Self {
            commit: GIT_COMMIT_HASH.to_string(),
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            database: if database_ok { "ok" } else { "error" }.to_string(),
        }
    }

    /// `name:version:short-commit`, the commit part empty outside git builds.
    fn x_app(&self) -> Option<HeaderValue> {
        let short_commit = self.commit.get(..7).filter(|_| self.commit.len() > 7);
        let value = format!(
            "{}:{}:{}",
            self.name,
            self.version,
            short_commit.unwrap_or_default()
        );
        match HeaderValue::from_str(&value) {
            Ok(header) => Some(header),
            Err(err) => {
                error!("Invalid X-App header {value:?}: {err}");
                None
            }
        }
    }
}

async fn database_ok(pool: &SqlitePool) -> bool {
    let acquire_span = info_span!("db.acquire", db.system = "sqlite", db.operation = "ACQUIRE");
    let mut conn = match pool.acquire().instrument(acquire_span).await {
        Ok(conn) => conn,
        Err(err) => {
            error!("Failed to acquire database connection: {err}");
            return false;
        }
    };

    let ping_span = info_span!("db.ping", db.system = "sqlite", db.operation = "PING");
    if let Err(err) = conn.ping().instrument(ping_span).await {
        error!("Failed to ping database: {err}");
        return false;
    }

    true
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Database is reachable", body = Health),
        (status = 503, description = "Database is unreachable", body = Health)
    ),
    tag = "health"
)]
pub async fn health(method: Method, ctx: Extension<Arc<AppContext>>) -> Response {
    let health = Health::new(database_ok(ctx.pool()).await);

    let status = if health.database == "ok" {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let mut response = if method == Method::GET {
        (status, Json(&health)).into_response()
    } else {
        (status, Body::empty()).into_response()
    };

    if let Some(x_app) = health.x_app() {
        response.headers_mut().insert(X_APP, x_app);
    }

    response
}
