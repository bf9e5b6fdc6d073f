//! User Routes - Score Audit Trail

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use crate::models::ScoreHistoryResponse;
use crate::routes::map_domain_error;
use crate::AppState;

/// Recent score history events for a user, newest first
#[utoipa::path(
    get,
    path = "/kizuna/users/{user_id}/history",
    params(
        ("user_id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Score history", body = Vec<ScoreHistoryResponse>),
        (status = 500, description = "Internal server error"),
    ),
    tag = "User"
)]
pub async fn score_history(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<ScoreHistoryResponse>>, (axum::http::StatusCode, String)> {
    let events = state
        .history
        .recent(user_id, 100)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(
        events
            .into_iter()
            .map(ScoreHistoryResponse::from_domain)
            .collect(),
    ))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/kizuna/users/:user_id/history", get(score_history))
}
