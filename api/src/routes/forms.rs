//! Form management endpoints

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use formbuilder_core::application::{
    AssignFormCommand, CreateFormCommand, FormSummary, FormView, SaveStatus,
};
use formbuilder_core::interchange::{export_document, suggested_filename};
use formbuilder_core::{FormDocument, FormId, ValidationReport};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

use crate::middleware::auth::Caller;
use crate::models::*;
use crate::ApiState;

pub fn router() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/", get(list_forms).post(create_form))
        .route("/validate", post(validate_definition))
        .route("/import", post(import_form))
        .route("/menu/:menu_id", get(get_form_by_menu_id))
        .route("/:id", get(get_form).put(save_form).delete(delete_form))
        .route("/:id/assign", patch(assign_form))
        .route("/:id/status", patch(update_status))
        .route("/:id/validate", post(validate_form))
        .route("/:id/export", get(export_form))
        .route("/:id/draft", get(draft_status).put(save_draft))
}

/// List forms visible to the caller
#[utoipa::path(
    get,
    path = "/api/v1/forms",
    responses(
        (status = 200, description = "Forms, most recently updated first"),
        (status = 401, description = "Missing caller identity", body = ErrorResponse)
    ),
    tag = "forms"
)]
pub async fn list_forms(
    State(state): State<Arc<ApiState>>,
    Caller(actor): Caller,
) -> ApiResult<Vec<FormSummary>> {
    let forms = state.forms.list_forms(&actor).await?;
    Ok(Json(ApiResponse::success(forms.iter().map(FormSummary::from).collect())))
}

/// Create a form owned by the caller
#[utoipa::path(
    post,
    path = "/api/v1/forms",
    responses(
        (status = 201, description = "Form created"),
        (status = 400, description = "Invalid form definition", body = ErrorResponse),
        (status = 409, description = "Menu ID already in use", body = ErrorResponse)
    ),
    tag = "forms"
)]
pub async fn create_form(
    State(state): State<Arc<ApiState>>,
    Caller(actor): Caller,
    Json(command): Json<CreateFormCommand>,
) -> Result<(StatusCode, Json<ApiResponse<FormView>>), ApiError> {
    let record = state.forms.create_form(&actor, command).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(FormView::from(&record)))))
}

/// Get form by ID
#[utoipa::path(
    get,
    path = "/api/v1/forms/{id}",
    params(("id" = u64, Path, description = "Form ID")),
    responses(
        (status = 200, description = "Form with its field tree"),
        (status = 403, description = "Not visible to the caller", body = ErrorResponse),
        (status = 404, description = "Form not found", body = ErrorResponse)
    ),
    tag = "forms"
)]
pub async fn get_form(
    State(state): State<Arc<ApiState>>,
    Caller(actor): Caller,
    Path(id): Path<u64>,
) -> ApiResult<FormView> {
    let record = state.forms.get_form(&actor, FormId::new(id)).await?;
    Ok(Json(ApiResponse::success(FormView::from(&record))))
}

/// Get form by menu ID
#[utoipa::path(
    get,
    path = "/api/v1/forms/menu/{menu_id}",
    params(("menu_id" = String, Path, description = "Menu ID")),
    responses(
        (status = 200, description = "Form with its field tree"),
        (status = 404, description = "Form not found", body = ErrorResponse)
    ),
    tag = "forms"
)]
pub async fn get_form_by_menu_id(
    State(state): State<Arc<ApiState>>,
    Caller(actor): Caller,
    Path(menu_id): Path<String>,
) -> ApiResult<FormView> {
    let record = state.forms.get_form_by_menu_id(&actor, &menu_id).await?;
    Ok(Json(ApiResponse::success(FormView::from(&record))))
}

/// Replace a form's document
#[utoipa::path(
    put,
    path = "/api/v1/forms/{id}",
    params(("id" = u64, Path, description = "Form ID")),
    responses(
        (status = 200, description = "Form saved"),
        (status = 400, description = "Invalid form definition", body = ErrorResponse),
        (status = 409, description = "Menu ID already in use", body = ErrorResponse)
    ),
    tag = "forms"
)]
pub async fn save_form(
    State(state): State<Arc<ApiState>>,
    Caller(actor): Caller,
    Path(id): Path<u64>,
    Json(document): Json<FormDocument>,
) -> ApiResult<FormView> {
    let record = state.forms.save_document(&actor, FormId::new(id), document).await?;
    Ok(Json(ApiResponse::success(FormView::from(&record))))
}

/// Delete a form (admin or creator)
#[utoipa::path(
    delete,
    path = "/api/v1/forms/{id}",
    params(("id" = u64, Path, description = "Form ID")),
    responses(
        (status = 200, description = "Form deleted"),
        (status = 403, description = "Caller may not delete this form", body = ErrorResponse),
        (status = 404, description = "Form not found", body = ErrorResponse)
    ),
    tag = "forms"
)]
pub async fn delete_form(
    State(state): State<Arc<ApiState>>,
    Caller(actor): Caller,
    Path(id): Path<u64>,
) -> ApiResult<()> {
    let form_id = FormId::new(id);
    state.forms.delete_form(&actor, form_id).await?;
    state.drafts.discard(form_id);
    Ok(Json(ApiResponse::success(())))
}

/// Assign a form to a user (admin only)
#[utoipa::path(
    patch,
    path = "/api/v1/forms/{id}/assign",
    params(("id" = u64, Path, description = "Form ID")),
    request_body = AssignRequest,
    responses(
        (status = 200, description = "Form assigned"),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse)
    ),
    tag = "forms"
)]
pub async fn assign_form(
    State(state): State<Arc<ApiState>>,
    Caller(actor): Caller,
    Path(id): Path<u64>,
    Json(request): Json<AssignRequest>,
) -> ApiResult<FormView> {
    let command = AssignFormCommand { user_id: request.user_id };
    let record = state.forms.assign_form(&actor, FormId::new(id), command).await?;
    Ok(Json(ApiResponse::success(FormView::from(&record))))
}

/// Change task status and/or priority
#[utoipa::path(
    patch,
    path = "/api/v1/forms/{id}/status",
    params(("id" = u64, Path, description = "Form ID")),
    request_body = StatusRequest,
    responses(
        (status = 200, description = "Status updated"),
        (status = 400, description = "Unknown status or priority", body = ErrorResponse)
    ),
    tag = "forms"
)]
pub async fn update_status(
    State(state): State<Arc<ApiState>>,
    Caller(actor): Caller,
    Path(id): Path<u64>,
    Json(request): Json<StatusRequest>,
) -> ApiResult<FormView> {
    let command = request.into_command()?;
    let record = state.forms.update_status(&actor, FormId::new(id), command).await?;
    Ok(Json(ApiResponse::success(FormView::from(&record))))
}

/// Validate a stored form
#[utoipa::path(
    post,
    path = "/api/v1/forms/{id}/validate",
    params(("id" = u64, Path, description = "Form ID")),
    responses((status = 200, description = "Validation report")),
    tag = "forms"
)]
pub async fn validate_form(
    State(state): State<Arc<ApiState>>,
    Caller(actor): Caller,
    Path(id): Path<u64>,
) -> ApiResult<ValidationReport> {
    let report = state.forms.validate_form(&actor, FormId::new(id)).await?;
    Ok(Json(ApiResponse::success(report)))
}

/// Validate a raw form definition
#[utoipa::path(
    post,
    path = "/api/v1/forms/validate",
    responses((status = 200, description = "Validation report")),
    tag = "forms"
)]
pub async fn validate_definition(
    State(state): State<Arc<ApiState>>,
    Json(definition): Json<Value>,
) -> ApiResult<ValidationReport> {
    Ok(Json(ApiResponse::success(state.forms.validate_definition(&definition))))
}

/// Create a form from an interchange file
#[utoipa::path(
    post,
    path = "/api/v1/forms/import",
    request_body(content = String, description = "Form JSON, canonical or legacy casing", content_type = "application/json"),
    responses(
        (status = 201, description = "Form imported"),
        (status = 400, description = "Unreadable or invalid file", body = ErrorResponse)
    ),
    tag = "forms"
)]
pub async fn import_form(
    State(state): State<Arc<ApiState>>,
    Caller(actor): Caller,
    body: String,
) -> Result<(StatusCode, Json<ApiResponse<FormView>>), ApiError> {
    let record = state.forms.import_form(&actor, &body).await?;
    info!(form_id = %record.id(), "Form imported");
    Ok((StatusCode::CREATED, Json(ApiResponse::success(FormView::from(&record)))))
}

/// Download a form as an interchange file
#[utoipa::path(
    get,
    path = "/api/v1/forms/{id}/export",
    params(("id" = u64, Path, description = "Form ID")),
    responses((status = 200, description = "Interchange JSON attachment", content_type = "application/json")),
    tag = "forms"
)]
pub async fn export_form(
    State(state): State<Arc<ApiState>>,
    Caller(actor): Caller,
    Path(id): Path<u64>,
) -> Result<impl IntoResponse, ApiError> {
    let record = state.forms.get_form(&actor, FormId::new(id)).await?;
    let document = record.document();
    let body = export_document(document, chrono::Utc::now()).map_err(|e| ApiError::Internal(e.to_string()))?;
    let disposition = format!("attachment; filename=\"{}\"", suggested_filename(&document.label));
    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    ))
}

/// Queue a draft for auto-save
#[utoipa::path(
    put,
    path = "/api/v1/forms/{id}/draft",
    params(("id" = u64, Path, description = "Form ID")),
    responses(
        (status = 202, description = "Draft queued", body = DraftAccepted),
        (status = 404, description = "Form not found", body = ErrorResponse)
    ),
    tag = "forms"
)]
pub async fn save_draft(
    State(state): State<Arc<ApiState>>,
    Caller(actor): Caller,
    Path(id): Path<u64>,
    Json(document): Json<FormDocument>,
) -> Result<(StatusCode, Json<ApiResponse<DraftAccepted>>), ApiError> {
    let form_id = FormId::new(id);
    state.forms.get_form(&actor, form_id).await?;
    if !state.drafts.schedule(&actor, form_id, document) {
        return Err(ApiError::Internal("Auto-save session closed".into()));
    }
    let accepted = DraftAccepted { form_id: id, debounce_ms: state.drafts.debounce_ms() };
    Ok((StatusCode::ACCEPTED, Json(ApiResponse::success(accepted))))
}

/// Auto-save state of the caller's draft session
#[utoipa::path(
    get,
    path = "/api/v1/forms/{id}/draft",
    params(("id" = u64, Path, description = "Form ID")),
    responses(
        (status = 200, description = "Auto-save state"),
        (status = 404, description = "No draft session", body = ErrorResponse)
    ),
    tag = "forms"
)]
pub async fn draft_status(
    State(state): State<Arc<ApiState>>,
    Caller(actor): Caller,
    Path(id): Path<u64>,
) -> ApiResult<SaveStatus> {
    state
        .drafts
        .status(&actor, FormId::new(id))
        .map(|status| Json(ApiResponse::success(status)))
        .ok_or_else(|| ApiError::NotFound(format!("No draft session for form {}", id)))
}
