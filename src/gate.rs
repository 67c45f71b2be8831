//! The guarded render gate.
//!
//! [`Gate::render`] is evaluated on every render pass. It looks up the session
//! token under the configured key and returns exactly one of:
//!
//! - [`GateDecision::RenderChildren`] with the caller's content, untouched;
//! - [`GateDecision::RedirectTo`] with the login path, dropping the content.
//!
//! Nothing is remembered between renders. The host realizes the redirect,
//! either by matching on the decision or through [`Gate::guard`].

use crate::{
    config::{GateConfig, ReadFailurePolicy},
    error::GateError,
    navigation::Navigator,
    store::SessionStore,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// The two states a render can observe.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Authenticated,
    Unauthenticated,
}

/// Outcome of one render pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GateDecision<C> {
    RenderChildren(C),
    RedirectTo(String),
}

impl<C> GateDecision<C> {
    #[must_use]
    pub fn is_render(&self) -> bool {
        matches!(self, Self::RenderChildren(_))
    }

    #[must_use]
    pub fn redirect_path(&self) -> Option<&str> {
        match self {
            Self::RenderChildren(_) => None,
            Self::RedirectTo(path) => Some(path),
        }
    }

    /// Returns the children, discarding a redirect.
    #[must_use]
    pub fn into_children(self) -> Option<C> {
        match self {
            Self::RenderChildren(children) => Some(children),
            Self::RedirectTo(_) => None,
        }
    }

    pub fn map<T, F>(self, f: F) -> GateDecision<T>
    where
        F: FnOnce(C) -> T,
    {
        match self {
            Self::RenderChildren(children) => GateDecision::RenderChildren(f(children)),
            Self::RedirectTo(path) => GateDecision::RedirectTo(path),
        }
    }

    /// Applies the decision: calls `navigator` once on redirect, otherwise
    /// hands back the children without touching the navigator.
    pub fn realize<N>(self, navigator: &N) -> Option<C>
    where
        N: Navigator + ?Sized,
    {
        match self {
            Self::RenderChildren(children) => Some(children),
            Self::RedirectTo(path) => {
                navigator.redirect(&path);
                None
            }
        }
    }
}

/// Presence-only gate over a [`SessionStore`].
#[derive(Debug)]
pub struct Gate<S> {
    config: Arc<GateConfig>,
    store: S,
}

impl<S: Clone> Clone for Gate<S> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            store: self.store.clone(),
        }
    }
}

impl<S: SessionStore> Gate<S> {
    pub fn new(config: impl Into<Arc<GateConfig>>, store: S) -> Self {
        Self {
            config: config.into(),
            store,
        }
    }

    #[must_use]
    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Reads the store and classifies the current session.
    ///
    /// # Errors
    /// Returns [`GateError::Store`] only when the read fails and the policy is
    /// [`ReadFailurePolicy::Fail`].
    pub fn session_state(&self) -> Result<SessionState, GateError> {
        let key = self.config.token_key();
        match self.store.get(key) {
            // An empty stored value still counts; only existence matters.
            Ok(Some(_)) => {
                debug!(key = %key, "session token present");
                Ok(SessionState::Authenticated)
            }
            Ok(None) => {
                debug!(key = %key, "session token absent");
                Ok(SessionState::Unauthenticated)
            }
            Err(err) => match self.config.on_read_failure() {
                ReadFailurePolicy::TreatAsAbsent => {
                    warn!(key = %key, error = %err, "session store read failed, treating as absent");
                    Ok(SessionState::Unauthenticated)
                }
                ReadFailurePolicy::Fail => Err(GateError::Store(err)),
            },
        }
    }

    /// Decides whether `children` may render.
    ///
    /// # Errors
    /// See [`Gate::session_state`].
    pub fn render<C>(&self, children: C) -> Result<GateDecision<C>, GateError> {
        match self.session_state()? {
            SessionState::Authenticated => Ok(GateDecision::RenderChildren(children)),
            SessionState::Unauthenticated => Ok(GateDecision::RedirectTo(
                self.config.login_path().to_string(),
            )),
        }
    }

    /// Renders or redirects through `navigator` in one step.
    ///
    /// # Errors
    /// See [`Gate::session_state`]. The navigator is not called on error.
    pub fn guard<C, N>(&self, children: C, navigator: &N) -> Result<Option<C>, GateError>
    where
        N: Navigator + ?Sized,
    {
        Ok(self.render(children)?.realize(navigator))
    }
}
