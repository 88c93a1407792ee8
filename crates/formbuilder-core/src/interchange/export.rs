//! Form definition exporter

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::domain::aggregates::{CustomComponent, FieldNode, FormDocument};

const FILENAME_SUFFIX: &str = "_form_definition.json";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportedMetadata<'a> {
    menu_id: &'a str,
    label: &'a str,
    form_width: &'a str,
    layout: &'a str,
    exported_at: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportedForm<'a> {
    form_metadata: ExportedMetadata<'a>,
    fields: &'a [FieldNode],
    custom_components: &'a [CustomComponent],
}

/// Canonical interchange JSON of `document`, pretty-printed
pub fn export_document(document: &FormDocument, exported_at: DateTime<Utc>) -> Result<String, serde_json::Error> {
    let exported = ExportedForm {
        form_metadata: ExportedMetadata {
            menu_id: &document.menu_id,
            label: &document.label,
            form_width: &document.form_width,
            layout: &document.layout,
            exported_at: exported_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        },
        fields: &document.fields,
        custom_components: &document.custom_components,
    };
    serde_json::to_string_pretty(&exported)
}

/// `{label with non-alphanumerics replaced by "_"}_form_definition.json`
pub fn suggested_filename(label: &str) -> String {
    let stem: String = label
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("{}{}", stem, FILENAME_SUFFIX)
}
