//! Form Builder API
//!
//! REST surface over the form use cases: form storage, assignment workflow,
//! validation, interchange and draft auto-save.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                        REST API (axum)                        │
//! │   OpenAPI 3 | Swagger UI | Header identity | ApiResponse      │
//! └───────────────────────────────┬───────────────────────────────┘
//!                                 │
//!        ┌────────────────────────┼────────────────────────┐
//!        ▼                        ▼                        ▼
//! ┌──────────────┐        ┌──────────────┐        ┌──────────────┐
//! │ FormService  │───────▶│ Notification │        │    Draft     │
//! │ (use cases)  │ events │    Center    │        │   Sessions   │
//! └──────┬───────┘        └──────────────┘        └──────────────┘
//!        ▼
//! ┌──────────────┐
//! │  Repository  │
//! └──────────────┘
//! ```

pub mod config;
pub mod drafts;
pub mod middleware;
pub mod models;
pub mod routes;

use axum::routing::get;
use axum::Router;
use formbuilder_core::infrastructure::{InMemoryFormRepository, NotificationCenter};
use formbuilder_core::{FormService, FormUseCases};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use config::ApiConfig;
pub use drafts::DraftSessions;
pub use models::*;

/// API state
#[derive(Clone)]
pub struct ApiState {
    pub forms: Arc<dyn FormUseCases>,
    pub notifications: Arc<NotificationCenter>,
    pub drafts: Arc<DraftSessions>,
    pub version: String,
}

impl ApiState {
    /// Service wired to in-memory storage and the in-process notification center
    pub fn in_memory(config: &ApiConfig) -> Self {
        let notifications = Arc::new(NotificationCenter::new());
        let forms: Arc<dyn FormUseCases> = Arc::new(FormService::new(
            Arc::new(InMemoryFormRepository::new()),
            notifications.clone(),
        ));
        Self {
            drafts: Arc::new(DraftSessions::new(forms.clone(), config.autosave.clone(), config.draft_idle)),
            forms,
            notifications,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Form Builder API",
        version = "1.0.0",
        description = "Form definitions, assignment workflow and interchange",
        license(name = "Apache-2.0")
    ),
    paths(
        routes::health::health_check,
        routes::forms::list_forms,
        routes::forms::create_form,
        routes::forms::get_form,
        routes::forms::get_form_by_menu_id,
        routes::forms::save_form,
        routes::forms::delete_form,
        routes::forms::assign_form,
        routes::forms::update_status,
        routes::forms::validate_form,
        routes::forms::validate_definition,
        routes::forms::import_form,
        routes::forms::export_form,
        routes::forms::save_draft,
        routes::forms::draft_status,
        routes::notifications::list_notifications,
        routes::notifications::mark_read,
        routes::notifications::mark_all_read,
    ),
    components(
        schemas(
            ErrorResponse, AssignRequest, StatusRequest, DraftAccepted, MarkAllReadResponse,
            routes::health::HealthResponse
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "forms", description = "Form definitions and workflow"),
        (name = "notifications", description = "Per-user notification inbox")
    )
)]
pub struct ApiDoc;

/// Build the API router
pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(routes::health::health_check))
        .nest("/api/v1", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(Arc::new(state))
}

fn api_routes() -> Router<Arc<ApiState>> {
    Router::new()
        .nest("/forms", routes::forms::router())
        .nest("/notifications", routes::notifications::router())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderName, HeaderValue, StatusCode};
    use axum_test::TestServer;
    use serde_json::{json, Value};
    use std::time::Duration;

    fn server() -> TestServer {
        let config = ApiConfig::from_lookup(|key| (key == config::AUTOSAVE_VAR).then(|| "50".to_string()));
        TestServer::new(build_router(ApiState::in_memory(&config))).unwrap()
    }

    fn user(id: &str) -> (HeaderName, HeaderValue) {
        (HeaderName::from_static("x-user-id"), HeaderValue::from_str(id).unwrap())
    }

    fn admin_role() -> (HeaderName, HeaderValue) {
        (HeaderName::from_static("x-user-role"), HeaderValue::from_static("admin"))
    }

    fn minimal_form() -> Value {
        json!({
            "menuId": "FORM_1",
            "label": "Payroll",
            "fields": [{"id": "f1", "type": "TEXT", "label": "Name", "dataField": "name"}]
        })
    }

    async fn create(server: &TestServer, owner: &str) -> u64 {
        let (name, value) = user(owner);
        let response = server.post("/api/v1/forms").add_header(name, value).json(&minimal_form()).await;
        response.assert_status(StatusCode::CREATED);
        response.json::<Value>()["data"]["id"].as_u64().unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = server().get("/health").await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["status"], "healthy");
    }

    #[tokio::test]
    async fn test_identity_is_required() {
        let response = server().get("/api/v1/forms").await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        let body = response.json::<Value>();
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_create_get_and_conflict() {
        let server = server();
        let id = create(&server, "alice").await;

        let (name, value) = user("alice");
        let response = server.get(&format!("/api/v1/forms/{}", id)).add_header(name, value).await;
        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["data"]["menuId"], "FORM_1");
        assert_eq!(body["data"]["fields"][0]["dataField"], "name");
        assert_eq!(body["data"]["status"], "draft");

        let (name, value) = user("bob");
        server
            .get(&format!("/api/v1/forms/{}", id))
            .add_header(name, value)
            .await
            .assert_status(StatusCode::FORBIDDEN);

        let (name, value) = user("bob");
        let response = server.post("/api/v1/forms").add_header(name, value).json(&minimal_form()).await;
        response.assert_status(StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_invalid_definition_is_rejected() {
        let server = server();
        let (name, value) = user("alice");
        let response = server
            .post("/api/v1/forms")
            .add_header(name, value)
            .json(&json!({"menuId": "bad id", "label": "X", "fields": []}))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["error"]["code"], "VALIDATION_FAILED");
    }

    #[tokio::test]
    async fn test_validate_raw_definition() {
        let response = server()
            .post("/api/v1/forms/validate")
            .json(&json!({
                "menuId": "FORM_1",
                "label": "X",
                "formWidth": "700px",
                "fields": [{"id": "s1", "type": "SELECT", "label": "Pick", "dataField": "pick", "value": ""}]
            }))
            .await;
        response.assert_status_ok();
        let report = &response.json::<Value>()["data"];
        assert_eq!(report["errors"].as_array().unwrap().len(), 0);
        assert!(report["warnings"][0].as_str().unwrap().contains("without defined options"));
    }

    #[tokio::test]
    async fn test_assignment_workflow_notifies() {
        let server = server();
        let id = create(&server, "root").await;

        let (name, value) = user("root");
        let (role, admin) = admin_role();
        let response = server
            .patch(&format!("/api/v1/forms/{}/assign", id))
            .add_header(name, value)
            .add_header(role, admin)
            .json(&json!({"userId": "bob"}))
            .await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["data"]["status"], "todo");

        let (name, value) = user("bob");
        server
            .patch(&format!("/api/v1/forms/{}/status", id))
            .add_header(name, value)
            .json(&json!({"status": "review"}))
            .await
            .assert_status_ok();

        let (name, value) = user("bob");
        let inbox = server.get("/api/v1/notifications").add_header(name, value).await.json::<Value>();
        assert_eq!(inbox["data"]["unread"], 1);
        assert_eq!(inbox["data"]["notifications"][0]["title"], "New Form Assigned");

        let (name, value) = user("root");
        let inbox = server.get("/api/v1/notifications").add_header(name, value).await.json::<Value>();
        assert_eq!(
            inbox["data"]["notifications"][0]["message"],
            "bob has submitted for review \"Payroll\""
        );
        let notification_id = inbox["data"]["notifications"][0]["id"].as_u64().unwrap();

        let (name, value) = user("root");
        server
            .patch(&format!("/api/v1/notifications/{}/read", notification_id))
            .add_header(name, value)
            .await
            .assert_status_ok();
        let (name, value) = user("bob");
        server
            .patch(&format!("/api/v1/notifications/{}/read", notification_id))
            .add_header(name, value)
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_non_admin_cannot_assign() {
        let server = server();
        let id = create(&server, "alice").await;
        let (name, value) = user("alice");
        server
            .patch(&format!("/api/v1/forms/{}/assign", id))
            .add_header(name, value)
            .json(&json!({"userId": "bob"}))
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_import_and_export() {
        let server = server();
        let legacy = json!({
            "MenuID": "LEGACY_1",
            "Label": "Legacy",
            "Fields": [{"Id": "x", "Type": "TEXT", "Label": "Name"}]
        });
        let (name, value) = user("alice");
        let response = server
            .post("/api/v1/forms/import")
            .add_header(name, value)
            .text(legacy.to_string())
            .await;
        response.assert_status(StatusCode::CREATED);
        let body = response.json::<Value>();
        assert_eq!(body["data"]["menuId"], "LEGACY_1");
        assert_eq!(body["data"]["fields"][0]["dataField"], "Name");
        let id = body["data"]["id"].as_u64().unwrap();

        let (name, value) = user("alice");
        let response = server.get(&format!("/api/v1/forms/{}/export", id)).add_header(name, value).await;
        response.assert_status_ok();
        let disposition = response.header("content-disposition");
        assert!(disposition.to_str().unwrap().contains("Legacy_form_definition.json"));
        let exported = response.json::<Value>();
        assert_eq!(exported["formMetadata"]["menuId"], "LEGACY_1");
        assert_eq!(exported["fields"][0]["id"], "x");

        let (name, value) = user("alice");
        server
            .post("/api/v1/forms/import")
            .add_header(name, value)
            .text("{not json")
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_draft_is_saved_after_quiet_window() {
        let server = server();
        let id = create(&server, "alice").await;

        let mut draft = minimal_form();
        draft["label"] = json!("Payroll v2");
        let (name, value) = user("alice");
        let response = server
            .put(&format!("/api/v1/forms/{}/draft", id))
            .add_header(name, value)
            .json(&draft)
            .await;
        response.assert_status(StatusCode::ACCEPTED);
        assert_eq!(response.json::<Value>()["data"]["debounceMs"], 50);

        tokio::time::sleep(Duration::from_millis(300)).await;

        let (name, value) = user("alice");
        let status = server.get(&format!("/api/v1/forms/{}/draft", id)).add_header(name, value).await;
        assert_eq!(status.json::<Value>()["data"]["state"], "saved");

        let (name, value) = user("alice");
        let form = server.get(&format!("/api/v1/forms/{}", id)).add_header(name, value).await;
        assert_eq!(form.json::<Value>()["data"]["label"], "Payroll v2");
    }

    #[tokio::test]
    async fn test_delete_closes_draft_session() {
        let server = server();
        let id = create(&server, "alice").await;

        let (name, value) = user("alice");
        server
            .put(&format!("/api/v1/forms/{}/draft", id))
            .add_header(name, value)
            .json(&minimal_form())
            .await
            .assert_status(StatusCode::ACCEPTED);

        let (name, value) = user("alice");
        server.delete(&format!("/api/v1/forms/{}", id)).add_header(name, value).await.assert_status_ok();

        let (name, value) = user("alice");
        server
            .get(&format!("/api/v1/forms/{}/draft", id))
            .add_header(name, value)
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_by_creator_only() {
        let server = server();
        let id = create(&server, "alice").await;

        let (name, value) = user("bob");
        server
            .delete(&format!("/api/v1/forms/{}", id))
            .add_header(name, value)
            .await
            .assert_status(StatusCode::FORBIDDEN);

        let (name, value) = user("alice");
        server.delete(&format!("/api/v1/forms/{}", id)).add_header(name, value).await.assert_status_ok();

        let (name, value) = user("alice");
        server
            .get(&format!("/api/v1/forms/{}", id))
            .add_header(name, value)
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}
