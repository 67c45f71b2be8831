//! # Session Gate
//!
//! `session-gate` wraps protected content and decides, on every render, whether
//! to expose it or send the visitor to the login page. The decision is
//! presence-only: if a session token is stored under the configured key the
//! content renders, otherwise the gate redirects.
//!
//! The gate does not authenticate anyone. It never validates a token's
//! signature or expiry and never talks to an identity provider. Real access
//! control must live on the API that serves the protected data.
//!
//! ## Pieces
//!
//! - [`config`]: resolves the storage key once at start-up and fails fast when
//!   it is missing.
//! - [`gate`]: the render gate itself, returning a tagged [`GateDecision`].
//! - [`store`] and [`navigation`]: the persistence and routing seams the host
//!   plugs into.
//! - [`web`]: axum middleware that gates server-rendered routes on a cookie.
//! - `component` (wasm32 only): a Leptos component backed by `localStorage`.
//!
//! ## Flow
//!
//! 1. **Resolve:** [`GateConfig::from_env`] (or the build-time variant in the
//!    browser) reads `SESSION_GATE_ACCESS_TOKEN_KEY` and aborts start-up when
//!    it is unset or empty.
//! 2. **Check:** [`Gate::render`] looks the key up in the [`SessionStore`].
//! 3. **Realize:** the host turns `RedirectTo(path)` into a navigation; in
//!    axum that is a `303 See Other`, in Leptos a router navigation.

#[cfg(not(target_arch = "wasm32"))]
pub mod cli;
pub mod config;
pub mod error;
pub mod gate;
pub mod navigation;
pub mod store;
#[cfg(not(target_arch = "wasm32"))]
pub mod web;

#[cfg(target_arch = "wasm32")]
pub mod component;

pub use config::{GateConfig, ReadFailurePolicy, TokenKey};
pub use error::{ConfigError, GateError, StoreError};
pub use gate::{Gate, GateDecision, SessionState};
pub use navigation::Navigator;
pub use store::{MemoryStore, SessionStore};

pub const GIT_COMMIT_HASH: &str = env!("SESSION_GATE_GIT_SHA");
