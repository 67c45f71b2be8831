//! Server-side host for the gate.
//!
//! Flow Overview: every request gets an `x-request-id` and a tracing span.
//! `/health`, `/login` and `/session` are public; `/` and `/app/*path` run
//! through [`middleware::require_token`], which reads the token cookie named
//! after the configured key and either forwards the request or answers with a
//! redirect to the login path.

pub mod cookie;
pub mod handlers;
pub mod middleware;

use crate::config::GateConfig;
use anyhow::Result;
use axum::{
    body::Body,
    extract::Extension,
    http::{HeaderName, HeaderValue, Request},
    middleware::from_fn_with_state,
    routing::{get, put},
    Router,
};
use handlers::{health, pages, session};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::PropagateRequestIdLayer, set_header::SetRequestHeaderLayer, trace::TraceLayer,
};
use tracing::{debug_span, info, Span};
use ulid::Ulid;

/// Settings shared by the site handlers.
#[derive(Debug, Clone)]
pub struct SiteState {
    pub config: Arc<GateConfig>,
    pub cookie_secure: bool,
}

impl SiteState {
    #[must_use]
    pub fn new(config: impl Into<Arc<GateConfig>>, cookie_secure: bool) -> Self {
        Self {
            config: config.into(),
            cookie_secure,
        }
    }
}

/// Build the site router with the gate applied to protected routes.
#[must_use]
pub fn router(state: SiteState) -> Router {
    let state = Arc::new(state);

    let protected = Router::new()
        .route("/", get(pages::dashboard))
        .route("/app/*path", get(pages::app))
        .route_layer(from_fn_with_state(
            Arc::clone(&state.config),
            middleware::require_token,
        ));

    Router::new()
        .route("/health", get(health::health))
        .route("/login", get(pages::login))
        .route(
            "/session",
            put(session::put_session).delete(session::delete_session),
        )
        .merge(protected)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static("x-request-id"),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    "x-request-id",
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(Extension(state)),
        )
}

/// Serve the site until Ctrl-C or SIGTERM.
/// # Errors
/// Returns an error if the listener cannot bind or the server fails.
pub async fn new(port: u16, state: SiteState) -> Result<()> {
    let app = router(state);

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to listen for SIGTERM: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Gracefully shutdown");
}

// span
fn make_span(request: &Request<Body>) -> Span {
    let path = request.uri().path();
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");

    // Headers are left out: the cookie carries the session token.
    debug_span!("http-request", path, request_id)
}
