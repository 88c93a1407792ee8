//! Command handlers
//!
//! Application service that orchestrates the form use cases.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

use crate::application::dto::*;
use crate::domain::aggregates::{CustomComponent, FormDocument, FormRecord};
use crate::domain::services::{Clock, SystemClock, ValidationReport, Validator};
use crate::domain::value_objects::{FormId, Identity};
use crate::interchange::Importer;
use crate::ports::inbound::{FormUseCases, UseCaseError};
use crate::ports::outbound::{EventPublisher, FormRepository};

const DEFAULT_LABEL: &str = "New Form";

/// Form application service
pub struct FormService {
    form_repo: Arc<dyn FormRepository>,
    event_publisher: Arc<dyn EventPublisher>,
    clock: Arc<dyn Clock>,
    validator: Validator,
    importer: Importer,
}

impl FormService {
    pub fn new(form_repo: Arc<dyn FormRepository>, event_publisher: Arc<dyn EventPublisher>) -> Self {
        Self::with_clock(form_repo, event_publisher, Arc::new(SystemClock))
    }

    pub fn with_clock(
        form_repo: Arc<dyn FormRepository>,
        event_publisher: Arc<dyn EventPublisher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            form_repo,
            event_publisher,
            importer: Importer::new(clock.clone()),
            clock,
            validator: Validator::new(),
        }
    }

    async fn load(&self, id: FormId) -> Result<FormRecord, UseCaseError> {
        self.form_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| UseCaseError::NotFound(format!("Form {} not found", id)))
    }

    async fn load_visible(&self, actor: &Identity, id: FormId) -> Result<FormRecord, UseCaseError> {
        let record = self.load(id).await?;
        if !record.is_visible_to(actor) {
            return Err(UseCaseError::Forbidden(format!("Form {} is not accessible", id)));
        }
        Ok(record)
    }

    async fn ensure_menu_id_free(&self, menu_id: &str, owner: Option<FormId>) -> Result<(), UseCaseError> {
        match self.form_repo.find_by_menu_id(menu_id).await? {
            Some(existing) if Some(existing.id()) != owner => {
                Err(UseCaseError::Conflict(format!("Menu ID {} is already in use", menu_id)))
            }
            _ => Ok(()),
        }
    }

    fn check(&self, document: &FormDocument) -> Result<(), UseCaseError> {
        let report = self.validator.validate(document, &document.custom_components);
        if report.is_valid() {
            Ok(())
        } else {
            Err(UseCaseError::Validation(report))
        }
    }

    async fn persist(&self, record: &mut FormRecord) -> Result<(), UseCaseError> {
        self.form_repo.save(record).await?;

        let events = record.take_events();
        self.event_publisher.publish(events).await?;
        Ok(())
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[async_trait]
impl FormUseCases for FormService {
    async fn create_form(&self, actor: &Identity, command: CreateFormCommand) -> Result<FormRecord, UseCaseError> {
        let menu_id = non_empty(command.menu_id)
            .unwrap_or_else(|| format!("FORM_{}", self.clock.now_millis()));
        let label = non_empty(command.label).unwrap_or_else(|| DEFAULT_LABEL.to_string());

        let mut document = FormDocument::new(menu_id, label);
        if let Some(width) = non_empty(command.form_width) {
            document.form_width = width;
        }
        if let Some(layout) = non_empty(command.layout) {
            document.layout = layout;
        }
        document.fields = command.fields.unwrap_or_default();
        document.custom_components = command.custom_components.unwrap_or_default();

        self.check(&document)?;
        self.ensure_menu_id_free(&document.menu_id, None).await?;

        let id = self.form_repo.next_id().await?;
        let mut record = FormRecord::create(id, document, actor, self.clock.now());
        self.persist(&mut record).await?;

        info!(form_id = %id, menu_id = %record.menu_id(), created_by = %actor.user_id, "Form created");
        Ok(record)
    }

    async fn get_form(&self, actor: &Identity, id: FormId) -> Result<FormRecord, UseCaseError> {
        self.load_visible(actor, id).await
    }

    async fn get_form_by_menu_id(&self, actor: &Identity, menu_id: &str) -> Result<FormRecord, UseCaseError> {
        let record = self
            .form_repo
            .find_by_menu_id(menu_id)
            .await?
            .ok_or_else(|| UseCaseError::NotFound(format!("Form {} not found", menu_id)))?;
        if !record.is_visible_to(actor) {
            return Err(UseCaseError::Forbidden(format!("Form {} is not accessible", menu_id)));
        }
        Ok(record)
    }

    async fn list_forms(&self, actor: &Identity) -> Result<Vec<FormRecord>, UseCaseError> {
        let mut forms = self.form_repo.find_visible_to(actor).await?;
        forms.sort_by(|a, b| b.updated_at().cmp(&a.updated_at()).then(b.id().cmp(&a.id())));
        debug!(user = %actor.user_id, count = forms.len(), "Listed forms");
        Ok(forms)
    }

    async fn save_document(&self, actor: &Identity, id: FormId, document: FormDocument) -> Result<FormRecord, UseCaseError> {
        let mut record = self.load_visible(actor, id).await?;

        self.check(&document)?;
        self.ensure_menu_id_free(&document.menu_id, Some(id)).await?;

        record.save_document(document, actor, self.clock.now());
        self.persist(&mut record).await?;

        debug!(form_id = %id, fields = record.document().field_count(), "Form saved");
        Ok(record)
    }

    async fn delete_form(&self, actor: &Identity, id: FormId) -> Result<(), UseCaseError> {
        let mut record = self.load(id).await?;
        if !record.can_delete(actor) {
            return Err(UseCaseError::Forbidden("Only the creator or an administrator can delete a form".into()));
        }

        record.mark_deleted(actor);
        self.form_repo.delete(id).await?;
        self.event_publisher.publish(record.take_events()).await?;

        info!(form_id = %id, deleted_by = %actor.user_id, "Form deleted");
        Ok(())
    }

    async fn assign_form(&self, actor: &Identity, id: FormId, command: AssignFormCommand) -> Result<FormRecord, UseCaseError> {
        if !actor.is_admin() {
            return Err(UseCaseError::Forbidden("Only administrators can assign forms".into()));
        }
        let assignee = command.user_id.trim();
        if assignee.is_empty() {
            return Err(UseCaseError::invalid("Assignee user id is required"));
        }

        let mut record = self.load(id).await?;
        record.assign(assignee, actor, self.clock.now());
        self.persist(&mut record).await?;

        info!(form_id = %id, assignee = %assignee, "Form assigned");
        Ok(record)
    }

    async fn update_status(&self, actor: &Identity, id: FormId, command: UpdateStatusCommand) -> Result<FormRecord, UseCaseError> {
        let mut record = self.load_visible(actor, id).await?;

        if !record.update_status(command.status, command.priority, actor, self.clock.now()) {
            return Err(UseCaseError::invalid("Status or priority is required"));
        }
        self.persist(&mut record).await?;

        info!(form_id = %id, status = %record.status(), priority = %record.priority(), "Form status updated");
        Ok(record)
    }

    async fn import_form(&self, actor: &Identity, text: &str) -> Result<FormRecord, UseCaseError> {
        let imported = self.importer.import(text)?;
        let metadata = imported.metadata;

        self.create_form(
            actor,
            CreateFormCommand {
                menu_id: metadata.menu_id,
                label: metadata.label,
                form_width: metadata.form_width,
                layout: metadata.layout,
                fields: Some(imported.fields),
                custom_components: imported.custom_components,
            },
        )
        .await
    }

    async fn validate_form(&self, actor: &Identity, id: FormId) -> Result<ValidationReport, UseCaseError> {
        let record = self.load_visible(actor, id).await?;
        let document = record.document();
        Ok(self.validator.validate(document, &document.custom_components))
    }

    fn validate_definition(&self, definition: &Value) -> ValidationReport {
        let custom: Vec<CustomComponent> = definition
            .get("customComponents")
            .and_then(Value::as_array)
            .map(|list| list.iter().cloned().filter_map(CustomComponent::from_value).collect())
            .unwrap_or_default();
        self.validator.validate_json(definition, &custom)
    }
}
