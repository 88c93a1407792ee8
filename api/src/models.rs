//! API Models

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use formbuilder_core::application::UpdateStatusCommand;
use formbuilder_core::infrastructure::Notification;
use formbuilder_core::UseCaseError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;
use utoipa::ToSchema;

/// Standard API response
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ErrorResponse>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self { success: true, data: Some(data), error: None }
    }

    pub fn error(code: &str, message: &str) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ErrorResponse {
                code: code.to_string(),
                message: message.to_string(),
            }),
        }
    }
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

// ============ Errors ============

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing x-user-id header")]
    Unauthorized,
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Internal(String),
    #[error(transparent)]
    UseCase(#[from] UseCaseError),
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            Self::UseCase(e) => match e {
                UseCaseError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
                UseCaseError::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
                UseCaseError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
                UseCaseError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_FAILED"),
                UseCaseError::Import(_) => (StatusCode::BAD_REQUEST, "IMPORT_FAILED"),
                UseCaseError::Repository(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        }
        (status, Json(ApiResponse::<()>::error(code, &self.to_string()))).into_response()
    }
}

// ============ Forms ============

/// Assignment request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignRequest {
    pub user_id: String,
}

/// Status / priority change
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct StatusRequest {
    /// draft, todo, in_progress, review or completed
    pub status: Option<String>,
    /// low, medium or high
    pub priority: Option<String>,
}

impl StatusRequest {
    pub fn into_command(self) -> Result<UpdateStatusCommand, ApiError> {
        let status = self.status.map(|s| s.parse()).transpose().map_err(ApiError::BadRequest)?;
        let priority = self.priority.map(|p| p.parse()).transpose().map_err(ApiError::BadRequest)?;
        Ok(UpdateStatusCommand { status, priority })
    }
}

/// Draft accepted for auto-save
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DraftAccepted {
    pub form_id: u64,
    pub debounce_ms: u64,
}

// ============ Notifications ============

#[derive(Debug, Clone, Serialize)]
pub struct InboxResponse {
    pub unread: usize,
    pub notifications: Vec<Notification>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MarkAllReadResponse {
    pub marked: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use formbuilder_core::{FormStatus, Priority};

    #[test]
    fn test_status_request_parsing() {
        let command = StatusRequest { status: Some("review".into()), priority: None }
            .into_command()
            .unwrap();
        assert_eq!(command.status, Some(FormStatus::Review));
        assert_eq!(command.priority, None);

        let command = StatusRequest { status: None, priority: Some("high".into()) }
            .into_command()
            .unwrap();
        assert_eq!(command.priority, Some(Priority::High));

        assert!(matches!(
            StatusRequest { status: Some("shipped".into()), priority: None }.into_command(),
            Err(ApiError::BadRequest(_))
        ));
    }

    #[test]
    fn test_error_status_mapping() {
        let cases = [
            (ApiError::Unauthorized, StatusCode::UNAUTHORIZED),
            (UseCaseError::NotFound("x".into()).into(), StatusCode::NOT_FOUND),
            (UseCaseError::Forbidden("x".into()).into(), StatusCode::FORBIDDEN),
            (UseCaseError::Conflict("x".into()).into(), StatusCode::CONFLICT),
            (UseCaseError::invalid("x").into(), StatusCode::BAD_REQUEST),
        ];
        for (error, expected) in cases {
            assert_eq!(error.status_and_code().0, expected);
        }
    }
}
