//! Gate configuration resolved once at start-up.
//!
//! The storage key is the only required setting. It is read from
//! `SESSION_GATE_ACCESS_TOKEN_KEY`, either from the process environment
//! ([`GateConfig::from_env`]) or baked in at compile time for browser builds
//! ([`GateConfig::from_build_env`]). A missing or empty key is a fatal
//! configuration error: nothing downstream can work without it, so callers
//! must abort before any gate is constructed.
//!
//! Configuration values are public; do not store secrets here.

use crate::error::ConfigError;
use once_cell::sync::OnceCell;
use std::{env, fmt, str::FromStr};

pub const ACCESS_TOKEN_KEY_ENV: &str = "SESSION_GATE_ACCESS_TOKEN_KEY";
pub const LOGIN_PATH_ENV: &str = "SESSION_GATE_LOGIN_PATH";
pub const ON_READ_FAILURE_ENV: &str = "SESSION_GATE_ON_READ_FAILURE";
pub const DEFAULT_LOGIN_PATH: &str = "/login";

static INSTALLED: OnceCell<GateConfig> = OnceCell::new();

/// Name under which the session token is stored. Never empty.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TokenKey(String);

impl TokenKey {
    /// Validates a configured key. The value is kept verbatim; only blank keys
    /// are rejected.
    ///
    /// # Errors
    /// Returns [`ConfigError::EmptyKey`] if the value is empty or whitespace.
    pub fn new(value: impl Into<String>) -> Result<Self, ConfigError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ConfigError::EmptyKey(ACCESS_TOKEN_KEY_ENV.to_string()));
        }
        Ok(Self(value))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TokenKey {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

impl AsRef<str> for TokenKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// What the gate does when the store itself cannot be read.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReadFailurePolicy {
    /// Treat the token as missing and redirect.
    #[default]
    TreatAsAbsent,
    /// Surface the failure to the host as a [`crate::GateError`].
    Fail,
}

impl FromStr for ReadFailurePolicy {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "absent" | "treat-as-absent" => Ok(Self::TreatAsAbsent),
            "fail" | "error" => Ok(Self::Fail),
            other => Err(ConfigError::InvalidPolicy(other.to_string())),
        }
    }
}

impl fmt::Display for ReadFailurePolicy {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TreatAsAbsent => formatter.write_str("absent"),
            Self::Fail => formatter.write_str("fail"),
        }
    }
}

/// Immutable gate settings, built once and injected into every [`crate::Gate`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GateConfig {
    token_key: TokenKey,
    login_path: String,
    on_read_failure: ReadFailurePolicy,
}

impl GateConfig {
    #[must_use]
    pub fn new(token_key: TokenKey) -> Self {
        Self {
            token_key,
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            on_read_failure: ReadFailurePolicy::default(),
        }
    }

    /// Overrides the redirect destination.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidLoginPath`] unless the path is same-origin
    /// (starts with a single `/`).
    pub fn with_login_path(mut self, path: &str) -> Result<Self, ConfigError> {
        self.login_path = validate_login_path(path)?;
        Ok(self)
    }

    #[must_use]
    pub fn with_read_failure_policy(mut self, policy: ReadFailurePolicy) -> Self {
        self.on_read_failure = policy;
        self
    }

    /// Loads the configuration from the process environment.
    ///
    /// # Errors
    /// Returns an error if the key is missing or empty, or an optional setting
    /// is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Loads the configuration from values captured at compile time.
    ///
    /// # Errors
    /// Returns an error if the key was not set when the crate was built.
    pub fn from_build_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| {
            let value = match name {
                ACCESS_TOKEN_KEY_ENV => option_env!("SESSION_GATE_ACCESS_TOKEN_KEY"),
                LOGIN_PATH_ENV => option_env!("SESSION_GATE_LOGIN_PATH"),
                ON_READ_FAILURE_ENV => option_env!("SESSION_GATE_ON_READ_FAILURE"),
                _ => None,
            };
            value.map(str::to_string)
        })
    }

    /// Loads the configuration through an arbitrary lookup.
    ///
    /// # Errors
    /// Returns an error if the key is missing or empty, or an optional setting
    /// is malformed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token_key = resolve_key_from(&lookup)?;
        let mut config = Self::new(token_key);

        if let Some(path) = lookup(LOGIN_PATH_ENV).as_deref().and_then(normalize_value) {
            config = config.with_login_path(&path)?;
        }
        if let Some(policy) = lookup(ON_READ_FAILURE_ENV)
            .as_deref()
            .and_then(normalize_value)
        {
            config = config.with_read_failure_policy(policy.parse()?);
        }

        Ok(config)
    }

    #[must_use]
    pub fn token_key(&self) -> &TokenKey {
        &self.token_key
    }

    #[must_use]
    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    #[must_use]
    pub fn on_read_failure(&self) -> ReadFailurePolicy {
        self.on_read_failure
    }
}

/// Reads the storage key from the process environment.
///
/// # Errors
/// Returns [`ConfigError::MissingKey`] when unset and [`ConfigError::EmptyKey`]
/// when blank.
pub fn resolve_key() -> Result<TokenKey, ConfigError> {
    resolve_key_from(|name| env::var(name).ok())
}

/// Reads the storage key through `lookup`.
///
/// # Errors
/// Returns [`ConfigError::MissingKey`] when unset and [`ConfigError::EmptyKey`]
/// when blank.
pub fn resolve_key_from<F>(lookup: F) -> Result<TokenKey, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = lookup(ACCESS_TOKEN_KEY_ENV)
        .ok_or_else(|| ConfigError::MissingKey(ACCESS_TOKEN_KEY_ENV.to_string()))?;
    TokenKey::new(value)
}

/// Stores `config` as the process-wide gate configuration.
///
/// # Errors
/// Returns [`ConfigError::AlreadyInstalled`] on every call after the first.
pub fn install(config: GateConfig) -> Result<&'static GateConfig, ConfigError> {
    let mut fresh = false;
    let installed = INSTALLED.get_or_init(|| {
        fresh = true;
        config
    });
    if fresh {
        Ok(installed)
    } else {
        Err(ConfigError::AlreadyInstalled)
    }
}

/// Returns the process-wide configuration, if [`install`] has run.
#[must_use]
pub fn installed() -> Option<&'static GateConfig> {
    INSTALLED.get()
}

fn validate_login_path(path: &str) -> Result<String, ConfigError> {
    let trimmed = path.trim();
    // `//host` is protocol-relative and would leave the origin.
    if !trimmed.starts_with('/') || trimmed.starts_with("//") {
        return Err(ConfigError::InvalidLoginPath(path.to_string()));
    }
    Ok(trimmed.to_string())
}

fn normalize_value(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn resolve_key_returns_exact_value() {
        for value in ["ACCESS_TOKEN", "access-token", "  padded  ", "k"] {
            let key = resolve_key_from(lookup_from(&[(ACCESS_TOKEN_KEY_ENV, value)]));
            assert_eq!(key.map(|k| k.as_str().to_string()), Ok(value.to_string()));
        }
    }

    #[test]
    fn resolve_key_rejects_missing() {
        let result = resolve_key_from(lookup_from(&[]));
        assert_eq!(
            result,
            Err(ConfigError::MissingKey(ACCESS_TOKEN_KEY_ENV.to_string()))
        );
    }

    #[test]
    fn resolve_key_rejects_blank() {
        for value in ["", "   ", "\t"] {
            let result = resolve_key_from(lookup_from(&[(ACCESS_TOKEN_KEY_ENV, value)]));
            assert_eq!(
                result,
                Err(ConfigError::EmptyKey(ACCESS_TOKEN_KEY_ENV.to_string()))
            );
        }
    }

    #[test]
    fn resolve_key_reads_process_env() {
        temp_env::with_var(ACCESS_TOKEN_KEY_ENV, Some("ACCESS_TOKEN"), || {
            assert_eq!(
                resolve_key().map(|k| k.to_string()),
                Ok("ACCESS_TOKEN".to_string())
            );
        });
        temp_env::with_var_unset(ACCESS_TOKEN_KEY_ENV, || {
            assert!(resolve_key().is_err());
        });
    }

    #[test]
    fn from_lookup_applies_defaults() {
        let config = GateConfig::from_lookup(lookup_from(&[(ACCESS_TOKEN_KEY_ENV, "ACCESS_TOKEN")]));
        let Ok(config) = config else {
            panic!("expected a valid config");
        };
        assert_eq!(config.token_key().as_str(), "ACCESS_TOKEN");
        assert_eq!(config.login_path(), DEFAULT_LOGIN_PATH);
        assert_eq!(config.on_read_failure(), ReadFailurePolicy::TreatAsAbsent);
    }

    #[test]
    fn from_lookup_applies_overrides_and_ignores_blank() {
        let config = GateConfig::from_lookup(lookup_from(&[
            (ACCESS_TOKEN_KEY_ENV, "ACCESS_TOKEN"),
            (LOGIN_PATH_ENV, " /auth/sign-in "),
            (ON_READ_FAILURE_ENV, "FAIL"),
        ]));
        assert_eq!(
            config.as_ref().map(GateConfig::login_path),
            Ok("/auth/sign-in")
        );
        assert_eq!(
            config.as_ref().map(GateConfig::on_read_failure),
            Ok(ReadFailurePolicy::Fail)
        );

        let config = GateConfig::from_lookup(lookup_from(&[
            (ACCESS_TOKEN_KEY_ENV, "ACCESS_TOKEN"),
            (LOGIN_PATH_ENV, "  "),
            (ON_READ_FAILURE_ENV, ""),
        ]));
        assert_eq!(
            config.as_ref().map(GateConfig::login_path),
            Ok(DEFAULT_LOGIN_PATH)
        );
    }

    #[test]
    fn login_path_must_stay_on_origin() {
        let Ok(key) = TokenKey::new("ACCESS_TOKEN") else {
            panic!("expected a valid key");
        };
        for path in ["login", "https://evil.example/login", "//evil.example", ""] {
            let result = GateConfig::new(key.clone()).with_login_path(path);
            assert_eq!(result, Err(ConfigError::InvalidLoginPath(path.to_string())));
        }
        assert!(GateConfig::new(key).with_login_path("/login?next=/").is_ok());
    }

    #[test]
    fn read_failure_policy_parses_names() {
        assert_eq!("absent".parse::<ReadFailurePolicy>(), Ok(ReadFailurePolicy::TreatAsAbsent));
        assert_eq!(" Fail ".parse::<ReadFailurePolicy>(), Ok(ReadFailurePolicy::Fail));
        assert_eq!(
            "retry".parse::<ReadFailurePolicy>(),
            Err(ConfigError::InvalidPolicy("retry".to_string()))
        );
        assert_eq!(ReadFailurePolicy::Fail.to_string(), "fail");
    }
}
