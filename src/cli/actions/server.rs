use crate::api::{self, AppContext, AuthConfig, handlers::auth::generate_session_secret};
use anyhow::Result;
use secrecy::SecretString;
use tracing::{info, warn};

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub dsn: String,
    pub session_secret: Option<SecretString>,
    pub session_ttl_seconds: u64,
    pub session_cookie_secure: bool,
}

/// Execute the server action.
///
/// # Errors
/// Returns an error if the user store cannot be opened or seeded, or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    let session_secret = if let Some(secret) = args.session_secret {
        secret
    } else {
        warn!("no session secret configured, sessions will not survive a restart");
        generate_session_secret()?
    };

    let config = AuthConfig::new()
        .with_session_ttl_seconds(args.session_ttl_seconds)
        .with_session_cookie_secure(args.session_cookie_secure);

    let ctx = AppContext::init(&args.dsn, session_secret, config).await?;

    info!(dsn = %args.dsn, "user store ready");

    api::new(args.port, ctx).await
}
