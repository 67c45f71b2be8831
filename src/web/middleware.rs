//! axum middleware that runs the gate before protected handlers.

use crate::{
    config::GateConfig,
    gate::{Gate, GateDecision},
    web::cookie::CookieStore,
};
use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;
use tracing::{debug, error};

/// Passes the request through when the token cookie is present, otherwise
/// answers with `303 See Other` to the login path.
///
/// Attach with `axum::middleware::from_fn_with_state(config, require_token)`.
/// This is a UX guard; handlers serving real data must still authorize.
pub async fn require_token(
    State(config): State<Arc<GateConfig>>,
    request: Request,
    next: Next,
) -> Response {
    let decision = Gate::new(config, CookieStore::new(request.headers())).render(());

    match decision {
        Ok(GateDecision::RenderChildren(())) => next.run(request).await,
        Ok(GateDecision::RedirectTo(path)) => {
            debug!(path = %request.uri().path(), to = %path, "redirecting unauthenticated request");
            Redirect::to(&path).into_response()
        }
        Err(err) => {
            error!(error = %err, "session gate failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
