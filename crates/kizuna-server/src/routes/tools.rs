//! Tool Routes - In-Call Tool Dispatch
//!
//! Tool requests are authenticated with the capability token minted at
//! call admission, not the admin API key. Business failures ride in the
//! response body with HTTP 200 so the conversation never sees a
//! transport error mid-call.

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};

use crate::models::{ToolRequest, ToolResponse};
use crate::AppState;

/// Invoke an in-call tool
#[utoipa::path(
    post,
    path = "/kizuna/calls/tools",
    request_body = ToolRequest,
    responses(
        (status = 200, description = "Tool response (success:false carries business failures)", body = ToolResponse),
        (status = 401, description = "Missing, invalid, or mismatched call token"),
    ),
    tag = "Tools"
)]
pub async fn invoke_tool(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<ToolRequest>,
) -> Result<Json<ToolResponse>, (StatusCode, String)> {
    let token = bearer_token(&headers)
        .ok_or((StatusCode::UNAUTHORIZED, "Missing call token".to_string()))?;

    let (token_user, token_session) = state
        .token_authority
        .validate(token)
        .map_err(|e| (StatusCode::UNAUTHORIZED, e.to_string()))?;

    if token_user != request.user_id.to_string() || token_session != request.session_id {
        return Err((
            StatusCode::UNAUTHORIZED,
            "Token is not bound to this session".to_string(),
        ));
    }

    // Tool traffic proves the call is alive; give a briefly dropped
    // session its chance to return to active.
    state.sessions.attempt_recovery(&request.session_id).await;

    Ok(Json(state.tool_service.handle(request).await))
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

pub fn router() -> Router<AppState> {
    Router::new().route("/kizuna/calls/tools", post(invoke_tool))
}
