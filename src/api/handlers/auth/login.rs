//! Login form and credential check.
//!
//! Unknown usernames and wrong passwords get the same plain text body. The
//! unknown-user path still runs one Argon2 verification.

use axum::{
    Form,
    extract::Extension,
    http::{HeaderMap, StatusCode, header::SET_COOKIE},
    response::{Html, IntoResponse, Redirect, Response},
};
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

use super::{types::LoginForm, utils::session_cookie};
use crate::api::AppContext;
use crate::users::{password, store};

pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

const LOGIN_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Scouting login</title>
</head>
<body>
  <h1>Scouting login</h1>
  <form method="post" action="/login">
    <label for="username">Username</label>
    <input id="username" name="username" type="text" autocomplete="username" required>
    <label for="password">Password</label>
    <input id="password" name="password" type="password" autocomplete="current-password" required>
    <button type="submit">Log in</button>
  </form>
</body>
</html>
"#;

#[utoipa::path(
    get,
    path = "/login",
    responses(
        (status = 200, description = "Login form", body = String, content_type = "text/html")
    ),
    tag = "auth"
)]
pub async fn login_form() -> Html<&'static str> {
    Html(LOGIN_PAGE)
}

#[utoipa::path(
    post,
    path = "/login",
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Logged in, redirect to /dashboard with the session cookie"),
        (status = 200, description = "Invalid credentials", body = String, content_type = "text/plain"),
        (status = 500, description = "User store failure")
    ),
    tag = "auth"
)]
#[instrument(skip_all, fields(username = %form.username))]
pub async fn login(ctx: Extension<Arc<AppContext>>, form: Form<LoginForm>) -> Response {
    let user = match store::find_by_username(ctx.pool(), &form.username).await {
        Ok(user) => user,
        Err(err) => {
            error!("Failed to look up user: {err:#}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let verified = match &user {
        Some(user) => password::verify_password(&form.password, &user.password_hash).await,
        None => password::verify_unknown_user(&form.password).await,
    };

    let user = match (user, verified) {
        (Some(user), Ok(true)) => user,
        (_, Ok(_)) => {
            debug!("invalid credentials");
            return (StatusCode::OK, INVALID_CREDENTIALS).into_response();
        }
        (_, Err(err)) => {
            error!("Failed to verify password: {err:#}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let token = match ctx.sessions().create(&user).await {
        Ok(token) => token,
        Err(err) => {
            error!("Failed to create session: {err:#}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let mut headers = HeaderMap::new();
    match session_cookie(ctx.config(), &token) {
        Ok(cookie) => {
            headers.insert(SET_COOKIE, cookie);
        }
        Err(err) => {
            error!("Failed to build session cookie: {err}");
            ctx.sessions().remove(&token).await;
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    }

    info!(user_id = user.id, role = %user.role, "login succeeded");

    (headers, Redirect::to("/dashboard")).into_response()
}
