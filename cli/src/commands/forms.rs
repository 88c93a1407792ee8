//! Remote form commands

use anyhow::Result;
use colored::Colorize;
use formbuilder_core::application::{FormSummary, FormView};
use formbuilder_core::FieldNode;
use serde_json::json;
use tabled::Tabled;

use super::ApiClient;
use crate::output::OutputFormat;
use crate::FormCommands;

#[derive(Tabled)]
pub struct FormRow {
    #[tabled(rename = "ID")]
    pub id: u64,
    #[tabled(rename = "Menu ID")]
    pub menu_id: String,
    #[tabled(rename = "Label")]
    pub label: String,
    #[tabled(rename = "Fields")]
    pub fields: usize,
    #[tabled(rename = "Status")]
    pub status: String,
    #[tabled(rename = "Priority")]
    pub priority: String,
    #[tabled(rename = "Assigned To")]
    pub assigned_to: String,
}

impl From<&FormSummary> for FormRow {
    fn from(form: &FormSummary) -> Self {
        Self {
            id: form.id,
            menu_id: form.menu_id.clone(),
            label: form.label.clone(),
            fields: form.field_count,
            status: form.status.to_string(),
            priority: form.priority.to_string(),
            assigned_to: form.assigned_to.clone().unwrap_or_else(|| "-".into()),
        }
    }
}

#[derive(Tabled)]
pub struct FieldRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Type")]
    pub field_type: String,
    #[tabled(rename = "Label")]
    pub label: String,
    #[tabled(rename = "Data Field")]
    pub data_field: String,
    #[tabled(rename = "Required")]
    pub required: bool,
}

/// Rows for the whole tree; children are indented under their group
pub fn field_rows(fields: &[FieldNode]) -> Vec<FieldRow> {
    let mut rows = Vec::new();
    for field in fields {
        rows.push(FieldRow::new(field, ""));
        for child in &field.child_fields {
            rows.push(FieldRow::new(child, "  └ "));
        }
    }
    rows
}

impl FieldRow {
    fn new(field: &FieldNode, prefix: &str) -> Self {
        Self {
            id: format!("{}{}", prefix, field.id),
            field_type: field.field_type.tag().to_string(),
            label: field.label.clone(),
            data_field: field.data_field.clone(),
            required: field.required,
        }
    }
}

pub async fn handle(action: FormCommands, client: &ApiClient, format: OutputFormat) -> Result<()> {
    match action {
        FormCommands::List => {
            let forms: Vec<FormSummary> = client.get("/forms").await?;
            format.print(&forms, forms.iter().map(FormRow::from))?;
        }
        FormCommands::Get { id } => {
            let form: FormView = client.get(&format!("/forms/{}", id)).await?;
            if let OutputFormat::Table = format {
                println!("{} {} ({})", form.menu_id.bold(), form.label, form.status);
            }
            format.print(&form, field_rows(&form.fields))?;
        }
        FormCommands::Assign { id, user } => {
            let form: FormView = client.patch(&format!("/forms/{}/assign", id), &json!({ "userId": user })).await?;
            println!("{} form {} assigned to {}", "✓".green(), form.id, user);
        }
        FormCommands::Status { id, status, priority } => {
            let body = json!({ "status": status, "priority": priority });
            let form: FormView = client.patch(&format!("/forms/{}/status", id), &body).await?;
            println!("{} form {} is {} ({} priority)", "✓".green(), form.id, form.status, form.priority);
        }
    }
    Ok(())
}
