//! Session gate: the protected dashboard, session introspection and logout.

use axum::{
    Json,
    extract::Extension,
    http::{HeaderMap, StatusCode, header::SET_COOKIE},
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;
use tracing::{debug, error};

use super::{
    storage::SessionRecord,
    types::SessionResponse,
    utils::{clear_session_cookie, extract_session_token},
};
use crate::api::AppContext;

/// Resolve the session cookie, or the redirect to send instead.
///
/// A missing, unknown or expired session is not an error, just a trip back to
/// the login page.
pub(crate) async fn require_session(
    headers: &HeaderMap,
    ctx: &AppContext,
) -> Result<SessionRecord, Redirect> {
    let Some(token) = extract_session_token(headers) else {
        return Err(Redirect::to("/login"));
    };
    ctx.sessions()
        .lookup(&token)
        .await
        .ok_or_else(|| Redirect::to("/login"))
}

#[utoipa::path(
    get,
    path = "/dashboard",
    responses(
        (status = 200, description = "Greeting for the session's role", body = String, content_type = "text/plain"),
        (status = 303, description = "No active session, redirect to /login")
    ),
    tag = "auth"
)]
pub async fn dashboard(headers: HeaderMap, ctx: Extension<Arc<AppContext>>) -> Response {
    match require_session(&headers, &ctx).await {
        Ok(session) => format!("Welcome {}", session.role).into_response(),
        Err(redirect) => redirect.into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/session",
    responses(
        (status = 200, description = "Session is active", body = SessionResponse),
        (status = 204, description = "No active session")
    ),
    tag = "auth"
)]
pub async fn session(headers: HeaderMap, ctx: Extension<Arc<AppContext>>) -> Response {
    match require_session(&headers, &ctx).await {
        Ok(SessionRecord {
            user_id,
            username,
            role,
            created_at: _,
        }) => Json(SessionResponse {
            user_id,
            username,
            role,
            capabilities: role.capabilities().to_vec(),
        })
        .into_response(),
        Err(_) => StatusCode::NO_CONTENT.into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/logout",
    responses(
        (status = 303, description = "Session cleared, redirect to /login")
    ),
    tag = "auth"
)]
pub async fn logout(headers: HeaderMap, ctx: Extension<Arc<AppContext>>) -> Response {
    if let Some(token) = extract_session_token(&headers) {
        if !ctx.sessions().remove(&token).await {
            debug!("logout without a live session");
        }
    }

    // Always clear the cookie, even if the session was already gone.
    let mut response_headers = HeaderMap::new();
    match clear_session_cookie(ctx.config()) {
        Ok(cookie) => {
            response_headers.insert(SET_COOKIE, cookie);
        }
        Err(err) => error!("Failed to build clearing cookie: {err}"),
    }

    (response_headers, Redirect::to("/login")).into_response()
}
