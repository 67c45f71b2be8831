use crate::{
    cli::actions::{server::Args, Action},
    config::{GateConfig, ReadFailurePolicy, TokenKey},
    web::cookie::is_cookie_name,
};
use anyhow::{bail, Context, Result};

/// # Errors
/// Returns an error if required arguments are missing or fail validation.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>("port").copied().unwrap_or(8080);

    let token_key = matches
        .get_one::<String>("token-key")
        .cloned()
        .context("missing required argument: --token-key")?;
    let token_key = TokenKey::new(token_key).context("invalid --token-key")?;
    // The site stores the token in a cookie named after the key.
    if !is_cookie_name(token_key.as_str()) {
        bail!("invalid --token-key for cookie storage: '{token_key}' is not a valid cookie name");
    }

    let mut config = GateConfig::new(token_key);
    if let Some(login_path) = matches.get_one::<String>("login-path") {
        config = config
            .with_login_path(login_path)
            .context("invalid --login-path")?;
    }
    let policy = matches
        .get_one::<ReadFailurePolicy>("on-read-failure")
        .copied()
        .unwrap_or_default();
    let config = config.with_read_failure_policy(policy);

    Ok(Action::Server(Args {
        port,
        config,
        cookie_secure: matches.get_flag("cookie-secure"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands;

    fn dispatch(args: &[&str]) -> Result<Action> {
        let matches = commands::new().try_get_matches_from(args)?;
        handler(&matches)
    }

    #[test]
    fn builds_server_action() -> Result<()> {
        let action = dispatch(&[
            "session-gate",
            "--token-key",
            "ACCESS_TOKEN",
            "--login-path",
            "/signin",
            "--on-read-failure",
            "fail",
            "-p",
            "9000",
        ])?;

        let Action::Server(args) = action;
        assert_eq!(args.port, 9000);
        assert_eq!(args.config.token_key().as_str(), "ACCESS_TOKEN");
        assert_eq!(args.config.login_path(), "/signin");
        assert_eq!(args.config.on_read_failure(), ReadFailurePolicy::Fail);
        Ok(())
    }

    #[test]
    fn rejects_blank_token_key() {
        assert!(dispatch(&["session-gate", "--token-key", "  "]).is_err());
    }

    #[test]
    fn rejects_token_key_unusable_as_cookie_name() {
        for key in ["ACCESS TOKEN", "A=B", "ACCESS;TOKEN"] {
            let err = match dispatch(&["session-gate", "--token-key", key]) {
                Ok(_) => panic!("accepted token key {key:?}"),
                Err(err) => err,
            };
            assert!(err.to_string().contains("cookie storage"));
        }
    }

    #[test]
    fn rejects_off_origin_login_path() {
        assert!(dispatch(&[
            "session-gate",
            "--token-key",
            "ACCESS_TOKEN",
            "--login-path",
            "https://example.com/login",
        ])
        .is_err());
    }
}
