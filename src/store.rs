//! Persistence seam for session tokens.
//!
//! The gate only ever reads. Writes belong to the login and logout flows of
//! the host, which is why [`MemoryStore`] exposes `insert`/`remove` but
//! [`SessionStore`] does not.

use crate::{config::TokenKey, error::StoreError};
use secrecy::SecretString;
use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

/// Read primitive of the persistence collaborator.
pub trait SessionStore {
    /// Returns the stored token, `Ok(None)` when nothing is stored under `key`.
    ///
    /// # Errors
    /// Returns a [`StoreError`] when the backing medium cannot be read.
    fn get(&self, key: &TokenKey) -> Result<Option<SecretString>, StoreError>;
}

impl<S: SessionStore + ?Sized> SessionStore for &S {
    fn get(&self, key: &TokenKey) -> Result<Option<SecretString>, StoreError> {
        (**self).get(key)
    }
}

impl<S: SessionStore + ?Sized> SessionStore for Arc<S> {
    fn get(&self, key: &TokenKey) -> Result<Option<SecretString>, StoreError> {
        (**self).get(key)
    }
}

/// Process-local store, shared between the gate and whoever writes tokens.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, SecretString>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` under `key`, replacing any previous token.
    ///
    /// # Errors
    /// Returns [`StoreError::Unavailable`] if the lock is poisoned.
    pub fn insert(&self, key: &TokenKey, value: SecretString) -> Result<(), StoreError> {
        self.entries
            .write()
            .map_err(|err| StoreError::Unavailable(err.to_string()))?
            .insert(key.as_str().to_string(), value);
        Ok(())
    }

    /// Removes the token under `key`, returning whether one was stored.
    ///
    /// # Errors
    /// Returns [`StoreError::Unavailable`] if the lock is poisoned.
    pub fn remove(&self, key: &TokenKey) -> Result<bool, StoreError> {
        let removed = self
            .entries
            .write()
            .map_err(|err| StoreError::Unavailable(err.to_string()))?
            .remove(key.as_str());
        Ok(removed.is_some())
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &TokenKey) -> Result<Option<SecretString>, StoreError> {
        let entries = self
            .entries
            .read()
            .map_err(|err| StoreError::Unavailable(err.to_string()))?;
        Ok(entries.get(key.as_str()).cloned())
    }
}
