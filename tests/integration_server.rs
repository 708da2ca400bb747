//! Drives a real listener over HTTP, the way a browser would, minus redirects.

use anyhow::{Context, Result};
use reqwest::{StatusCode, header, redirect};
use scoutauth::api::{self, AppContext, AuthConfig};
use secrecy::SecretString;
use std::sync::Arc;
use tokio::{net::TcpListener, task::JoinHandle};

struct Server {
    base: String,
    handle: JoinHandle<Result<()>>,
}

impl Drop for Server {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn spawn_server() -> Result<Server> {
    let ctx = AppContext::init(
        "sqlite::memory:",
        SecretString::from("integration-secret"),
        AuthConfig::default(),
    )
    .await?;

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let handle = tokio::spawn(api::serve(listener, Arc::new(ctx)));

    Ok(Server {
        base: format!("http://{addr}"),
        handle,
    })
}

fn client() -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .redirect(redirect::Policy::none())
        .build()?)
}

fn cookie_pair(response: &reqwest::Response) -> Option<String> {
    let raw = response.headers().get(header::SET_COOKIE)?.to_str().ok()?;
    raw.split(';').next().map(str::to_string)
}

fn location(response: &reqwest::Response) -> Option<String> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

#[tokio::test]
async fn login_dashboard_logout_round_trip() -> Result<()> {
    let server = spawn_server().await?;
    let client = client()?;

    let health = client.get(format!("{}/health", server.base)).send().await?;
    assert_eq!(health.status(), StatusCode::OK);
    assert!(health.headers().get("x-app").is_some());

    let login = client
        .post(format!("{}/login", server.base))
        .form(&[("username", "scouter2"), ("password", "scouterpass2")])
        .send()
        .await?;
    assert_eq!(login.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&login).as_deref(), Some("/dashboard"));
    let raw_cookie = login
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .context("missing Set-Cookie")?;
    assert!(raw_cookie.contains("HttpOnly"));
    assert!(raw_cookie.contains("SameSite=Lax"));
    let cookie = cookie_pair(&login).context("missing session cookie")?;

    let dashboard = client
        .get(format!("{}/dashboard", server.base))
        .header(header::COOKIE, &cookie)
        .send()
        .await?;
    assert_eq!(dashboard.status(), StatusCode::OK);
    assert_eq!(dashboard.text().await?, "Welcome Super Scouter");

    let logout = client
        .get(format!("{}/logout", server.base))
        .header(header::COOKIE, &cookie)
        .send()
        .await?;
    assert_eq!(logout.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&logout).as_deref(), Some("/login"));

    let after = client
        .get(format!("{}/dashboard", server.base))
        .header(header::COOKIE, &cookie)
        .send()
        .await?;
    assert_eq!(after.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&after).as_deref(), Some("/login"));
    Ok(())
}

#[tokio::test]
async fn invalid_credentials_over_http() -> Result<()> {
    let server = spawn_server().await?;
    let client = client()?;

    let response = client
        .post(format!("{}/login", server.base))
        .form(&[("username", "admin"), ("password", "leaderpass")])
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(header::SET_COOKIE).is_none());
    assert_eq!(response.text().await?, "Invalid credentials");

    let dashboard = client
        .get(format!("{}/dashboard", server.base))
        .send()
        .await?;
    assert_eq!(dashboard.status(), StatusCode::SEE_OTHER);
    Ok(())
}
