//! Call Routes - Outbound Call Lifecycle

use axum::{extract::State, routing::post, Json, Router};

use crate::models::{
    ConnectionBundle, InitiateCallRequest, OutboundCallRequest, OutboundCallResult,
};
use crate::routes::map_domain_error;
use crate::AppState;

/// Prepare a call and return the platform connection bundle
#[utoipa::path(
    post,
    path = "/kizuna/calls",
    request_body = InitiateCallRequest,
    responses(
        (status = 200, description = "Connection bundle", body = ConnectionBundle),
        (status = 404, description = "User not found"),
        (status = 403, description = "User not callable"),
    ),
    tag = "Call"
)]
pub async fn initiate_call(
    State(state): State<AppState>,
    Json(payload): Json<InitiateCallRequest>,
) -> Result<Json<ConnectionBundle>, (axum::http::StatusCode, String)> {
    let bundle = state
        .call_service
        .initiate_call(payload.user_id)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(bundle))
}

/// Place an outbound phone call through the calling platform
#[utoipa::path(
    post,
    path = "/kizuna/calls/outbound",
    request_body = OutboundCallRequest,
    responses(
        (status = 200, description = "Dial result (success:false carries the failure)", body = OutboundCallResult),
    ),
    tag = "Call"
)]
pub async fn outbound_call(
    State(state): State<AppState>,
    Json(payload): Json<OutboundCallRequest>,
) -> Json<OutboundCallResult> {
    let result = state
        .call_service
        .make_outbound_call(payload.user_id, &payload.phone_number)
        .await;

    Json(result)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/kizuna/calls", post(initiate_call))
        .route("/kizuna/calls/outbound", post(outbound_call))
}
