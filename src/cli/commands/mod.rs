use crate::config::{
    ReadFailurePolicy, ACCESS_TOKEN_KEY_ENV, DEFAULT_LOGIN_PATH, LOGIN_PATH_ENV,
    ON_READ_FAILURE_ENV,
};
use clap::{
    builder::{
        styling::{AnsiColor, Effects, Styles},
        ValueParser,
    },
    Arg, ArgAction, ColorChoice, Command,
};

pub fn validator_log_level() -> ValueParser {
    ValueParser::from(move |level: &str| -> std::result::Result<u8, String> {
        if let Ok(parsed) = level.parse::<u8>() {
            // Successfully parsed as a number
            if parsed <= 5 {
                return Ok(parsed);
            }
        }

        match level.to_lowercase().as_str() {
            "error" => Ok(0),
            "warn" => Ok(1),
            "info" => Ok(2),
            "debug" => Ok(3),
            "trace" => Ok(4),
            _ => Err("invalid log level".to_string()),
        }
    })
}

pub fn validator_read_failure_policy() -> ValueParser {
    ValueParser::from(
        move |policy: &str| -> std::result::Result<ReadFailurePolicy, String> {
            policy.parse().map_err(|err: crate::ConfigError| err.to_string())
        },
    )
}

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

    Command::new("session-gate")
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .help("Port to listen on")
                .default_value("8080")
                .env("SESSION_GATE_PORT")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new("token-key")
                .short('k')
                .long("token-key")
                .help("Name the session token is stored under")
                .long_help(
                    "Name the session token is stored under. The server-side gate reads the cookie with this name; the browser component reads the localStorage entry with this name.",
                )
                .env(ACCESS_TOKEN_KEY_ENV)
                .required(true),
        )
        .arg(
            Arg::new("login-path")
                .long("login-path")
                .help("Same-origin path unauthenticated visitors are redirected to")
                .default_value(DEFAULT_LOGIN_PATH)
                .env(LOGIN_PATH_ENV),
        )
        .arg(
            Arg::new("on-read-failure")
                .long("on-read-failure")
                .help("What to do when the session store cannot be read: absent, fail")
                .default_value("absent")
                .env(ON_READ_FAILURE_ENV)
                .value_parser(validator_read_failure_policy()),
        )
        .arg(
            Arg::new("cookie-secure")
                .long("cookie-secure")
                .help("Mark session cookies Secure (serve over HTTPS)")
                .env("SESSION_GATE_COOKIE_SECURE")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbosity")
                .short('v')
                .long("verbose")
                .help("Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
                .env("SESSION_GATE_LOG_LEVEL")
                .global(true)
                .action(ArgAction::Count)
                .value_parser(validator_log_level()),
        )
}
