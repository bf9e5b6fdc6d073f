//! Inbound Routes - Pre-Call Decision
//!
//! The platform calls this hook before connecting an inbound call.
//! The response always carries `dynamic_variables` and
//! `conversation_config_override`, even for rejections.

use axum::{extract::State, routing::post, Json, Router};

use crate::models::{InboundCallRequest, InboundCallResponse};
use crate::AppState;

/// Decide whether to accept an inbound call
#[utoipa::path(
    post,
    path = "/kizuna/calls/inbound",
    request_body = InboundCallRequest,
    responses(
        (status = 200, description = "Admission decision with initiation data", body = InboundCallResponse),
    ),
    tag = "Call"
)]
pub async fn inbound_call(
    State(state): State<AppState>,
    Json(payload): Json<InboundCallRequest>,
) -> Json<InboundCallResponse> {
    let decision = state
        .inbound_service
        .handle_incoming_call(&payload.caller_id)
        .await;

    Json(decision.into())
}

pub fn router() -> Router<AppState> {
    Router::new().route("/kizuna/calls/inbound", post(inbound_call))
}
