pub mod auth;
pub mod health;

use axum::response::Redirect;

// The dashboard is the only page; anything landing on `/` starts at the login form.
pub async fn root() -> Redirect {
    Redirect::to("/login")
}
