//! Form definition importer
//!
//! Translates external JSON (canonical camelCase or legacy PascalCase) into
//! domain fields through the alias rules.

use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

use super::aliases::{
    AliasRule, Missing, Shape, COMPONENTS_SOURCES, FIELDS_SOURCES, FIELD_RULES, LABEL_SOURCES,
    METADATA_RULES, METADATA_SOURCES,
};
use crate::domain::aggregates::{CustomComponent, FieldNode};
use crate::domain::services::{Clock, SystemClock};
use crate::domain::value_objects::is_truthy;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportError {
    #[error("Invalid JSON: {0}")]
    Parse(String),
    #[error("Invalid format: {0}")]
    Format(String),
}

/// Form-level metadata carried by an interchange file
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormMetadata {
    pub menu_id: Option<String>,
    pub label: Option<String>,
    pub form_width: Option<String>,
    pub layout: Option<String>,
}

/// Result of a successful import
#[derive(Clone, Debug, PartialEq)]
pub struct ImportedDefinition {
    pub fields: Vec<FieldNode>,
    /// `None` when the file carries no registry
    pub custom_components: Option<Vec<CustomComponent>>,
    pub metadata: FormMetadata,
    /// Non-fatal problems, such as skipped component entries
    pub warnings: Vec<String>,
}

/// External form JSON importer
#[derive(Clone)]
pub struct Importer {
    clock: Arc<dyn Clock>,
}

impl Default for Importer {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl Importer {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Parse and normalize an interchange file
    pub fn import(&self, text: &str) -> Result<ImportedDefinition, ImportError> {
        let root: Value = serde_json::from_str(text).map_err(|e| ImportError::Parse(e.to_string()))?;
        self.import_value(&root)
    }

    pub fn import_value(&self, root: &Value) -> Result<ImportedDefinition, ImportError> {
        let format_error = || ImportError::Format("must contain fields array".to_string());
        let object = root.as_object().ok_or_else(format_error)?;
        let raw_fields = first_present(object, FIELDS_SOURCES)
            .and_then(Value::as_array)
            .ok_or_else(format_error)?;

        let fields = self.normalize_fields(raw_fields)?;

        let mut warnings = Vec::new();
        let custom_components = first_present(object, COMPONENTS_SOURCES).map(|raw| {
            let entries = raw.as_array().cloned().unwrap_or_default();
            entries
                .into_iter()
                .enumerate()
                .filter_map(|(index, entry)| {
                    let component = CustomComponent::from_value(entry);
                    if component.is_none() {
                        warn!(index, "Skipping unreadable custom component");
                        warnings.push(format!("Custom component {} could not be read", index + 1));
                    }
                    component
                })
                .collect()
        });

        let metadata_source = first_present(object, METADATA_SOURCES)
            .and_then(Value::as_object)
            .unwrap_or(object);
        let metadata = serde_json::from_value(Value::Object(self.normalize(metadata_source, METADATA_RULES)))
            .unwrap_or_default();

        Ok(ImportedDefinition {
            fields,
            custom_components,
            metadata,
            warnings,
        })
    }

    /// Normalize a raw field list into domain fields
    pub fn normalize_fields(&self, raw: &[Value]) -> Result<Vec<FieldNode>, ImportError> {
        let normalized = self.normalize_list(raw);
        serde_json::from_value(Value::Array(normalized)).map_err(|e| ImportError::Format(e.to_string()))
    }

    fn normalize_list(&self, raw: &[Value]) -> Vec<Value> {
        let empty = Map::new();
        raw.iter()
            .map(|entry| Value::Object(self.normalize(entry.as_object().unwrap_or(&empty), FIELD_RULES)))
            .collect()
    }

    /// Apply `rules` to one object. Keys no rule consumes are kept.
    fn normalize(&self, raw: &Map<String, Value>, rules: &[AliasRule]) -> Map<String, Value> {
        let mut out = Map::new();

        for rule in rules {
            let resolved = first_present(raw, rule.sources).and_then(|v| self.coerce(v, rule.shape));
            let value = match resolved {
                Some(value) => Some(value),
                None => self.fallback(raw, rule.missing),
            };
            if let Some(value) = value {
                out.insert(rule.target.to_string(), value);
            }
        }

        for (key, value) in raw {
            let consumed = rules.iter().any(|r| r.sources.contains(&key.as_str()));
            if !consumed && !out.contains_key(key) {
                out.insert(key.clone(), value.clone());
            }
        }

        out
    }

    fn coerce(&self, value: &Value, shape: Shape) -> Option<Value> {
        match shape {
            Shape::Text => Some(Value::String(text_of(value))),
            Shape::Flag => Some(Value::Bool(is_truthy(value))),
            Shape::Any => Some(value.clone()),
            Shape::List => value.as_array().map(|list| Value::Array(list.clone())),
            Shape::StringMap => value.as_object().map(|map| {
                Value::Object(
                    map.iter()
                        .map(|(k, v)| (k.clone(), Value::String(text_of(v))))
                        .collect(),
                )
            }),
            Shape::Fields => value.as_array().map(|list| Value::Array(self.normalize_list(list))),
            Shape::Object(rules) => value.as_object().map(|map| Value::Object(self.normalize(map, rules))),
            Shape::ObjectList(rules) => value.as_array().map(|list| {
                Value::Array(
                    list.iter()
                        .filter_map(Value::as_object)
                        .map(|map| Value::Object(self.normalize(map, rules)))
                        .collect(),
                )
            }),
        }
    }

    fn fallback(&self, raw: &Map<String, Value>, missing: Missing) -> Option<Value> {
        match missing {
            Missing::Omit => None,
            Missing::Literal(text) => Some(Value::String(text.to_string())),
            Missing::GeneratedId => Some(Value::String(self.generated_id())),
            Missing::RawLabelOr(text) => {
                let label = first_present(raw, LABEL_SOURCES)
                    .and_then(Value::as_str)
                    .filter(|l| !l.is_empty())
                    .unwrap_or(text);
                Some(Value::String(label.to_string()))
            }
        }
    }

    fn generated_id(&self) -> String {
        let suffix: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(6)
            .map(|c| char::from(c).to_ascii_lowercase())
            .collect();
        format!("field_{}_{}", self.clock.now_millis(), suffix)
    }
}

/// First source key holding a non-null value
fn first_present<'a>(object: &'a Map<String, Value>, sources: &[&str]) -> Option<&'a Value> {
    sources
        .iter()
        .filter_map(|key| object.get(*key))
        .find(|value| !value.is_null())
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
