use thiserror::Error;

/// Start-up configuration failures. All of them are fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} is not defined")]
    MissingKey(String),
    #[error("{0} is empty")]
    EmptyKey(String),
    #[error("invalid login path: {0}")]
    InvalidLoginPath(String),
    #[error("invalid read failure policy: {0} (expected `absent` or `fail`)")]
    InvalidPolicy(String),
    #[error("gate configuration is already installed")]
    AlreadyInstalled,
}

/// Failures of the persistence collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("session store unavailable: {0}")]
    Unavailable(String),
    #[error("stored session value is unreadable")]
    Unreadable,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GateError {
    #[error(transparent)]
    Store(#[from] StoreError),
}
