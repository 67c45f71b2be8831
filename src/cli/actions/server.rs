use crate::{
    config::{self, GateConfig},
    web::{self, SiteState},
};
use anyhow::{Context, Result};
use tracing::info;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub config: GateConfig,
    pub cookie_secure: bool,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the configuration was already installed or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    log_startup_args(&args);

    // Resolved exactly once; every gate built after this shares it.
    let config = config::install(args.config).context("Could not install gate configuration")?;

    web::new(args.port, SiteState::new(config.clone(), args.cookie_secure)).await
}

fn log_startup_args(args: &Args) {
    let entries = [
        ("listen", format!("tcp:{}", args.port)),
        ("token_key", args.config.token_key().to_string()),
        ("login_path", args.config.login_path().to_string()),
        ("on_read_failure", args.config.on_read_failure().to_string()),
        ("cookie_secure", args.cookie_secure.to_string()),
    ];
    log_entries("Startup configuration", &entries);
}

fn log_entries(title: &str, entries: &[(&str, String)]) {
    let max_key_len = entries.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    let mut message = format!("{}\n\n{title}:", banner());
    for (key, value) in entries {
        let padding = " ".repeat(max_key_len.saturating_sub(key.len()));
        let _ =
            std::fmt::Write::write_fmt(&mut message, format_args!("\n  {key}:{padding} {value}"));
    }
    info!("{message}");
}

fn banner() -> String {
    let short_hash = short_commit(crate::GIT_COMMIT_HASH);
    BANNER.replace(
        "{VERSION}",
        &format!(" - {} - {}", env!("CARGO_PKG_VERSION"), short_hash),
    )
}

fn short_commit(hash: &str) -> String {
    let trimmed = hash.trim();
    if trimmed.len() > 7 {
        trimmed[..7].to_string()
    } else {
        trimmed.to_string()
    }
}

const BANNER: &str = r"
   ______
  |  __  |
  | |  | |
  | |__| |   S E S S I O N   G A T E {VERSION}
  |______|";
