//! Notification inbox endpoints

use axum::extract::{Path, State};
use axum::routing::{get, patch};
use axum::{Json, Router};
use std::sync::Arc;

use crate::middleware::auth::Caller;
use crate::models::*;
use crate::ApiState;

pub fn router() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/", get(list_notifications))
        .route("/read-all", patch(mark_all_read))
        .route("/:id/read", patch(mark_read))
}

/// Caller's inbox, newest first
#[utoipa::path(
    get,
    path = "/api/v1/notifications",
    responses((status = 200, description = "Unread count and inbox entries")),
    tag = "notifications"
)]
pub async fn list_notifications(
    State(state): State<Arc<ApiState>>,
    Caller(actor): Caller,
) -> ApiResult<InboxResponse> {
    Ok(Json(ApiResponse::success(InboxResponse {
        unread: state.notifications.unread_count(&actor.user_id),
        notifications: state.notifications.inbox(&actor.user_id),
    })))
}

/// Mark one notification read
#[utoipa::path(
    patch,
    path = "/api/v1/notifications/{id}/read",
    params(("id" = u64, Path, description = "Notification ID")),
    responses(
        (status = 200, description = "Marked read"),
        (status = 404, description = "No such notification for the caller", body = ErrorResponse)
    ),
    tag = "notifications"
)]
pub async fn mark_read(
    State(state): State<Arc<ApiState>>,
    Caller(actor): Caller,
    Path(id): Path<u64>,
) -> ApiResult<()> {
    if state.notifications.mark_read(id, &actor.user_id) {
        Ok(Json(ApiResponse::success(())))
    } else {
        Err(ApiError::NotFound(format!("Notification {} not found", id)))
    }
}

/// Mark every notification of the caller read
#[utoipa::path(
    patch,
    path = "/api/v1/notifications/read-all",
    responses((status = 200, description = "Number of entries marked", body = MarkAllReadResponse)),
    tag = "notifications"
)]
pub async fn mark_all_read(
    State(state): State<Arc<ApiState>>,
    Caller(actor): Caller,
) -> ApiResult<MarkAllReadResponse> {
    let marked = state.notifications.mark_all_read(&actor.user_id);
    Ok(Json(ApiResponse::success(MarkAllReadResponse { marked })))
}
