//! Webhook Routes - Signed Post-Call Events
//!
//! The sole entry point for asynchronous platform events. The MAC is
//! computed over the raw body, so the handler reads bytes before any
//! JSON parsing.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};

use crate::models::{PostCallEvent, WebhookAck};
use crate::AppState;

/// Signature header set by the calling platform
pub const SIGNATURE_HEADER: &str = "x-kizuna-signature";

/// Receive a signed post-call event
#[utoipa::path(
    post,
    path = "/kizuna/webhooks/post-call",
    request_body = PostCallEvent,
    responses(
        (status = 200, description = "Event processed"),
        (status = 401, description = "Missing, stale, or invalid signature"),
        (status = 400, description = "Unparseable payload"),
    ),
    tag = "Webhook"
)]
pub async fn post_call(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, (StatusCode, String)> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|h| h.to_str().ok())
        .ok_or((
            StatusCode::UNAUTHORIZED,
            "Missing signature header".to_string(),
        ))?;

    state
        .webhook_verifier
        .verify(&body, signature)
        .map_err(|e| (StatusCode::UNAUTHORIZED, e.to_string()))?;

    let event: PostCallEvent = serde_json::from_slice(&body)
        .map_err(|e| (StatusCode::BAD_REQUEST, format!("Invalid payload: {e}")))?;

    match event.event_type.as_str() {
        "post_call_transcription" => {
            let outcome = state
                .call_service
                .end_call(
                    event.user_id,
                    &event.session_id,
                    &event.transcript,
                    event.duration_seconds,
                )
                .await;
            Ok(Json(outcome).into_response())
        }
        "call_disconnected" => {
            state.sessions.handle_disconnect(&event.session_id).await;
            Ok(Json(WebhookAck {
                received: true,
                session_id: event.session_id,
            })
            .into_response())
        }
        "call_failed" => {
            state.sessions.finalize_session(&event.session_id).await;
            Ok(Json(WebhookAck {
                received: true,
                session_id: event.session_id,
            })
            .into_response())
        }
        other => {
            tracing::warn!("Ignoring webhook event type: {}", other);
            Ok(Json(WebhookAck {
                received: true,
                session_id: event.session_id,
            })
            .into_response())
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new().route("/kizuna/webhooks/post-call", post(post_call))
}
