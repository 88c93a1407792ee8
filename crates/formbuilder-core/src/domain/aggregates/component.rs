//! Custom Component Registry
//!
//! User-defined field types registered on a document at runtime.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

const DEFAULT_ICON: &str = "Box";
const DEFAULT_COLOR: &str = "bg-gray-500";

/// A registered custom field type
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomComponent {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(default = "default_icon")]
    pub icon: String,
    #[serde(default = "default_color")]
    pub color: String,
    /// Default property values copied into new fields of this type
    #[serde(default)]
    pub properties: Map<String, Value>,
    #[serde(default = "default_true")]
    pub is_custom: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_icon() -> String {
    DEFAULT_ICON.to_string()
}

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

fn default_true() -> bool {
    true
}

impl CustomComponent {
    /// Read an entry of a persisted or imported `customComponents` list.
    /// Entries written by the guided creator carry their id as `type`.
    pub fn from_value(value: Value) -> Option<Self> {
        let mut component: Self = serde_json::from_value(value).ok()?;
        if component.id.is_empty() {
            component.id = match component.extra.get("type").and_then(Value::as_str) {
                Some(tag) => tag.to_string(),
                None => component.name.to_uppercase(),
            };
        }
        Some(component)
    }

    /// JSON text stored as the `value` of a new field of this type
    pub fn default_value_text(&self) -> String {
        serde_json::to_string(&self.properties).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Raw-JSON registration input: `{name, label, icon?, color?, properties?}`
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ComponentDraft {
    pub name: Option<String>,
    pub label: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub properties: Option<Map<String, Value>>,
}

impl ComponentDraft {
    pub fn from_json(text: &str) -> Result<Self, RegistryError> {
        serde_json::from_str(text).map_err(|e| RegistryError::InvalidJson(e.to_string()))
    }
}

/// Guided registration input, with the richer property defaults
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GuidedComponent {
    pub name: String,
    pub label: String,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub data_field: String,
    pub entity: String,
    pub width: String,
    pub spacing: String,
    pub value: String,
    pub required: bool,
    pub inline: bool,
    pub outlined: bool,
    pub placeholder: String,
    pub min_length: Option<u32>,
    pub max_length: Option<u32>,
    pub options: Vec<String>,
}

impl From<GuidedComponent> for ComponentDraft {
    fn from(guided: GuidedComponent) -> Self {
        let mut properties = Map::new();
        properties.insert("dataField".into(), Value::String(guided.data_field));
        properties.insert("entity".into(), Value::String(guided.entity));
        properties.insert("width".into(), Value::String(guided.width));
        properties.insert("spacing".into(), Value::String(guided.spacing));
        properties.insert("value".into(), Value::String(guided.value));
        properties.insert("required".into(), Value::Bool(guided.required));
        properties.insert("inline".into(), Value::Bool(guided.inline));
        properties.insert("outlined".into(), Value::Bool(guided.outlined));
        if !guided.placeholder.is_empty() {
            properties.insert("placeholder".into(), Value::String(guided.placeholder));
        }
        if let Some(min) = guided.min_length {
            properties.insert("minLength".into(), Value::from(min));
        }
        if let Some(max) = guided.max_length {
            properties.insert("maxLength".into(), Value::from(max));
        }
        if !guided.options.is_empty() {
            properties.insert(
                "options".into(),
                Value::Array(guided.options.into_iter().map(Value::String).collect()),
            );
        }
        Self {
            name: Some(guided.name),
            label: Some(guided.label),
            icon: guided.icon,
            color: guided.color,
            properties: Some(properties),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Component name is required")]
    MissingName,
    #[error("Component label is required")]
    MissingLabel,
    #[error("A component with id {0} already exists")]
    Duplicate(String),
    #[error("Invalid component JSON: {0}")]
    InvalidJson(String),
}

/// Register `draft` into `registry`. Nothing is added on error.
pub fn register(
    registry: &mut Vec<CustomComponent>,
    draft: ComponentDraft,
) -> Result<CustomComponent, RegistryError> {
    let name = draft
        .name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .ok_or(RegistryError::MissingName)?;
    let label = draft
        .label
        .filter(|l| !l.trim().is_empty())
        .ok_or(RegistryError::MissingLabel)?;

    let id = name.to_uppercase();
    if registry.iter().any(|c| c.id == id) {
        return Err(RegistryError::Duplicate(id));
    }

    let component = CustomComponent {
        id,
        name,
        label,
        icon: draft.icon.filter(|i| !i.is_empty()).unwrap_or_else(default_icon),
        color: draft.color.filter(|c| !c.is_empty()).unwrap_or_else(default_color),
        properties: draft.properties.unwrap_or_default(),
        is_custom: true,
        extra: Map::new(),
    };
    registry.push(component.clone());
    Ok(component)
}

/// Remove by id. Fields already using the type are left alone.
pub fn unregister(registry: &mut Vec<CustomComponent>, id: &str) -> Option<CustomComponent> {
    let index = registry.iter().position(|c| c.id == id)?;
    Some(registry.remove(index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_register_from_json() {
        let mut registry = vec![];
        let draft = ComponentDraft::from_json(r#"{"name": "rating", "label": "Rating"}"#).unwrap();
        let component = register(&mut registry, draft).unwrap();
        assert_eq!(component.id, "RATING");
        assert_eq!(component.icon, DEFAULT_ICON);
        assert_eq!(component.color, DEFAULT_COLOR);
        assert!(component.is_custom);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_register_rejects_duplicates_and_missing() {
        let mut registry = vec![];
        let draft = || ComponentDraft {
            name: Some("Rating".into()),
            label: Some("Rating".into()),
            ..ComponentDraft::default()
        };
        register(&mut registry, draft()).unwrap();
        assert_eq!(
            register(&mut registry, draft()),
            Err(RegistryError::Duplicate("RATING".into()))
        );
        assert_eq!(
            register(&mut registry, ComponentDraft { label: Some("X".into()), ..ComponentDraft::default() }),
            Err(RegistryError::MissingName)
        );
        assert_eq!(
            register(&mut registry, ComponentDraft { name: Some("x".into()), ..ComponentDraft::default() }),
            Err(RegistryError::MissingLabel)
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(ComponentDraft::from_json("{nope"), Err(RegistryError::InvalidJson(_))));
    }

    #[test]
    fn test_guided_properties() {
        let guided = GuidedComponent {
            name: "Score".into(),
            label: "Score".into(),
            placeholder: "0-10".into(),
            max_length: Some(2),
            options: vec!["low".into(), "high".into()],
            ..GuidedComponent::default()
        };
        let mut registry = vec![];
        let component = register(&mut registry, guided.into()).unwrap();
        assert_eq!(component.properties["placeholder"], "0-10");
        assert_eq!(component.properties["maxLength"], 2);
        assert_eq!(component.properties["options"], json!(["low", "high"]));
        assert!(component.properties.get("minLength").is_none());
    }

    #[test]
    fn test_legacy_entry_uses_type_as_id() {
        let component = CustomComponent::from_value(json!({"type": "STAR_RATING", "label": "Stars"})).unwrap();
        assert_eq!(component.id, "STAR_RATING");
        assert!(CustomComponent::from_value(json!("nope")).is_none());
    }

    #[test]
    fn test_unregister() {
        let mut registry = vec![];
        register(&mut registry, ComponentDraft::from_json(r#"{"name":"a","label":"A"}"#).unwrap()).unwrap();
        assert!(unregister(&mut registry, "A").is_some());
        assert!(unregister(&mut registry, "A").is_none());
    }
}
