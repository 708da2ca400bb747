pub mod auth;
pub mod logging;

use clap::{
    Arg, ColorChoice, Command,
    builder::styling::{AnsiColor, Effects, Styles},
};

pub const ARG_PORT: &str = "port";
pub const ARG_DSN: &str = "dsn";

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("scoutauth")
        .about("Scouting dashboard login gateway")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new(ARG_PORT)
                .short('p')
                .long("port")
                .help("Port to listen on")
                .default_value("8080")
                .env("SCOUTAUTH_PORT")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new(ARG_DSN)
                .short('d')
                .long("dsn")
                .help("SQLite connection string for the user store")
                .long_help(
                    "SQLite connection string for the user store. The file is created if missing; use sqlite::memory: for a throwaway store.",
                )
                .default_value("sqlite://users.db")
                .env("SCOUTAUTH_DSN"),
        );

    let command = auth::with_args(command);
    logging::with_args(command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    // Keep ambient SCOUTAUTH_* variables from leaking into parsing tests.
    fn with_cleared_env<F, R>(f: F) -> R
    where
        F: FnOnce() -> R,
    {
        temp_env::with_vars(
            [
                ("SCOUTAUTH_PORT", None::<&str>),
                ("SCOUTAUTH_DSN", None::<&str>),
                ("SCOUTAUTH_SESSION_SECRET", None::<&str>),
                ("SCOUTAUTH_SESSION_TTL_SECONDS", None::<&str>),
                ("SCOUTAUTH_SESSION_COOKIE_SECURE", None::<&str>),
                ("SCOUTAUTH_LOG_LEVEL", None::<&str>),
            ],
            f,
        )
    }

    #[test]
    fn test_new() {
        let command = new();

        assert_eq!(command.get_name(), "scoutauth");
        assert_eq!(
            command.get_about().map(ToString::to_string),
            Some("Scouting dashboard login gateway".to_string())
        );
        assert_eq!(
            command.get_version().map(ToString::to_string),
            Some(env!("CARGO_PKG_VERSION").to_string())
        );
    }

    #[test]
    fn test_defaults() {
        with_cleared_env(|| {
            let matches = new().get_matches_from(vec!["scoutauth"]);
            assert_eq!(matches.get_one::<u16>(ARG_PORT).copied(), Some(8080));
            assert_eq!(
                matches.get_one::<String>(ARG_DSN).cloned(),
                Some("sqlite://users.db".to_string())
            );
            assert_eq!(
                matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                Some(0)
            );

            let options = auth::Options::parse(&matches);
            assert!(options.is_ok());
            if let Ok(options) = options {
                assert!(options.session_secret.is_none());
                assert_eq!(options.session_ttl_seconds, 43_200);
                assert!(!options.session_cookie_secure);
            }
        });
    }

    #[test]
    fn test_check_port_and_dsn() {
        with_cleared_env(|| {
            let matches = new().get_matches_from(vec![
                "scoutauth",
                "--port",
                "9090",
                "--dsn",
                "sqlite:///var/lib/scoutauth/users.db",
            ]);

            assert_eq!(matches.get_one::<u16>(ARG_PORT).copied(), Some(9090));
            assert_eq!(
                matches.get_one::<String>(ARG_DSN).cloned(),
                Some("sqlite:///var/lib/scoutauth/users.db".to_string())
            );
        });
    }

    #[test]
    fn test_check_env() {
        temp_env::with_vars(
            [
                ("SCOUTAUTH_PORT", Some("443")),
                ("SCOUTAUTH_DSN", Some("sqlite::memory:")),
                ("SCOUTAUTH_SESSION_SECRET", Some("hunter2")),
                ("SCOUTAUTH_SESSION_TTL_SECONDS", Some("600")),
                ("SCOUTAUTH_SESSION_COOKIE_SECURE", Some("true")),
                ("SCOUTAUTH_LOG_LEVEL", Some("info")),
            ],
            || {
                let matches = new().get_matches_from(vec!["scoutauth"]);
                assert_eq!(matches.get_one::<u16>(ARG_PORT).copied(), Some(443));
                assert_eq!(
                    matches.get_one::<String>(ARG_DSN).cloned(),
                    Some("sqlite::memory:".to_string())
                );
                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    Some(2)
                );

                let options = auth::Options::parse(&matches);
                assert!(options.is_ok());
                if let Ok(options) = options {
                    assert_eq!(
                        options
                            .session_secret
                            .as_ref()
                            .map(|secret| secret.expose_secret().to_string()),
                        Some("hunter2".to_string())
                    );
                    assert_eq!(options.session_ttl_seconds, 600);
                    assert!(options.session_cookie_secure);
                    assert!(!format!("{options:?}").contains("hunter2"));
                }
            },
        );
    }

    #[test]
    fn test_verbosity_from_flags_and_env() {
        let cases: [(&[&str], Option<&str>, u8); 6] = [
            (&[], None, 0),
            (&["-v"], None, 1),
            (&["-vvv"], None, 3),
            (&["--verbose", "--verbose"], None, 2),
            (&[], Some("debug"), 3),
            (&[], Some("trace"), 4),
        ];

        for (flags, env_level, expected) in cases {
            temp_env::with_var("SCOUTAUTH_LOG_LEVEL", env_level, || {
                let args = std::iter::once("scoutauth").chain(flags.iter().copied());
                let matches = new().get_matches_from(args);
                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    Some(expected),
                    "{flags:?} {env_level:?}"
                );
            });
        }
    }

    #[test]
    fn test_invalid_port_fails() {
        with_cleared_env(|| {
            let result = new().try_get_matches_from(vec!["scoutauth", "--port", "http"]);
            assert_eq!(
                result.map_err(|e| e.kind()).err(),
                Some(clap::error::ErrorKind::ValueValidation)
            );
        });
    }

    #[test]
    fn test_unknown_args_fail() {
        let result = new().try_get_matches_from(vec!["scoutauth", "--admin-password", "adminpass"]);
        assert_eq!(
            result.map_err(|e| e.kind()).err(),
            Some(clap::error::ErrorKind::UnknownArgument)
        );
    }
}
