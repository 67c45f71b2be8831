//! Leptos host for the gate, backed by `window.localStorage`.
//!
//! Resolve the configuration once when the app starts, before mounting:
//!
//! ```ignore
//! let config = GateConfig::from_build_env().expect("SESSION_GATE_ACCESS_TOKEN_KEY is not defined");
//! mount_to_body(move || view! {
//!     <Router>
//!         <RequireToken config=config.clone()><Dashboard /></RequireToken>
//!     </Router>
//! });
//! ```
//!
//! UX-only guard; real access control must live on the API.

use crate::{
    config::{GateConfig, TokenKey},
    error::StoreError,
    gate::{Gate, GateDecision, SessionState},
    store::SessionStore,
};
use leptos::prelude::*;
use leptos_router::hooks::{use_location, use_navigate};
use secrecy::SecretString;
use tracing::error;

/// `window.localStorage` as a [`SessionStore`].
pub struct LocalStorageStore {
    storage: web_sys::Storage,
}

impl LocalStorageStore {
    /// Opens the storage of the current window.
    ///
    /// # Errors
    /// Returns [`StoreError::Unavailable`] when there is no window or storage
    /// is disabled (private mode, blocked third-party context).
    pub fn open() -> Result<Self, StoreError> {
        let window =
            web_sys::window().ok_or_else(|| StoreError::Unavailable("no window".to_string()))?;
        let storage = window
            .local_storage()
            .map_err(|_| StoreError::Unavailable("localStorage access denied".to_string()))?
            .ok_or_else(|| StoreError::Unavailable("localStorage disabled".to_string()))?;
        Ok(Self { storage })
    }
}

impl SessionStore for LocalStorageStore {
    fn get(&self, key: &TokenKey) -> Result<Option<SecretString>, StoreError> {
        self.storage
            .get_item(key.as_str())
            .map(|value| value.map(SecretString::from))
            .map_err(|_| StoreError::Unreadable)
    }
}

// Opens storage on every read so an unavailable medium goes through the
// gate's read failure policy instead of failing at construction.
struct BrowserStore;

impl SessionStore for BrowserStore {
    fn get(&self, key: &TokenKey) -> Result<Option<SecretString>, StoreError> {
        LocalStorageStore::open()?.get(key)
    }
}

/// Renders `children` when a token is stored under the configured key,
/// otherwise navigates to the login path and renders nothing.
///
/// The store is checked again every time the route changes, so a token
/// removed by another tab is noticed on the next navigation. A failed read
/// under [`ReadFailurePolicy::Fail`](crate::config::ReadFailurePolicy::Fail) renders
/// nothing and is only logged; wrap the component if a fallback is wanted.
#[component]
pub fn RequireToken(config: GateConfig, children: Children) -> impl IntoView {
    let navigate = use_navigate();
    let location = use_location();
    let gate = Gate::new(config, BrowserStore);

    let view = match gate.render(children) {
        Ok(GateDecision::RenderChildren(children)) => children().into_any(),
        Ok(GateDecision::RedirectTo(_)) | Err(_) => ().into_any(),
    };

    Effect::new(move |_| {
        location.pathname.track();
        match gate.session_state() {
            Ok(SessionState::Authenticated) => {}
            Ok(SessionState::Unauthenticated) => {
                navigate(gate.config().login_path(), Default::default());
            }
            Err(err) => error!(error = %err, "session gate failed"),
        }
    });

    view
}
