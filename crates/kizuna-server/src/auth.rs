//! Admin API Key Authentication (Bearer Token)
//!
//! Protects operator endpoints (call initiation, history). The key
//! lives in application state so tests can construct it directly.
//! In-call tool requests use capability tokens instead (routes::tools).

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};

use crate::AppState;

/// Authentication middleware for operator endpoints.
/// Validates the Bearer token against the configured admin API key.
pub async fn admin_auth(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(api_key) = state.admin_api_key.as_deref().filter(|k| !k.is_empty()) else {
        // No API key configured = auth disabled (for development)
        tracing::warn!("No admin API key configured, authentication disabled");
        return Ok(next.run(request).await);
    };

    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    match auth_header {
        Some(value) if value.starts_with("Bearer ") => {
            if &value[7..] == api_key {
                Ok(next.run(request).await)
            } else {
                tracing::warn!("Invalid admin API key attempted");
                Err(StatusCode::UNAUTHORIZED)
            }
        }
        Some(_) => {
            tracing::warn!("Invalid Authorization header format");
            Err(StatusCode::UNAUTHORIZED)
        }
        None => {
            tracing::warn!("Missing Authorization header");
            Err(StatusCode::UNAUTHORIZED)
        }
    }
}
