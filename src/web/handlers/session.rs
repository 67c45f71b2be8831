//! Token write and clear endpoints.
//!
//! These stand in for the host's login and logout flows: they only place or
//! remove the cookie the gate looks for. No credential is checked here.

use crate::web::{
    cookie::{clear_session_cookie, session_cookie},
    SiteState,
};
use axum::{
    extract::Extension,
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Deserialize, Debug)]
pub struct SessionRequest {
    pub token: String,
}

/// Store the token cookie under the configured key.
pub async fn put_session(
    site: Extension<Arc<SiteState>>,
    Json(request): Json<SessionRequest>,
) -> impl IntoResponse {
    let token = request.token.trim();
    if token.is_empty() {
        return StatusCode::UNPROCESSABLE_ENTITY.into_response();
    }

    let key = site.config.token_key();
    let Some(cookie) = session_cookie(key, token, site.cookie_secure) else {
        // A bad key is a deployment problem, a bad token is the caller's.
        if clear_session_cookie(key, false).is_none() {
            error!(key = %key, "token key is not a valid cookie name");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
        return StatusCode::UNPROCESSABLE_ENTITY.into_response();
    };

    info!(key = %key, "session token stored");
    let mut headers = HeaderMap::new();
    headers.insert(SET_COOKIE, cookie);
    (StatusCode::NO_CONTENT, headers).into_response()
}

/// Remove the token cookie. Always succeeds for a valid key.
pub async fn delete_session(site: Extension<Arc<SiteState>>) -> impl IntoResponse {
    let key = site.config.token_key();
    let Some(cookie) = clear_session_cookie(key, site.cookie_secure) else {
        error!(key = %key, "token key is not a valid cookie name");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    };

    info!(key = %key, "session token cleared");
    let mut headers = HeaderMap::new();
    headers.insert(SET_COOKIE, cookie);
    (StatusCode::NO_CONTENT, headers).into_response()
}
