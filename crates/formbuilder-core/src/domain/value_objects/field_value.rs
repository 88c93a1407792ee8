//! Field Value Value Object
//!
//! The per-field `value` slot. Its shape depends on the field type, so it is
//! decoded against the type instead of being carried as untyped JSON.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::FieldType;

/// Typed content of a field's `value` slot
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    /// Plain string: TEXT defaults, SELECT option sources, serialized
    /// custom component defaults
    Text(String),
    /// DATEPICKER configuration object
    Date(DateConfig),
    /// Any other structured sub-object
    Object(Map<String, Value>),
    /// Numbers, booleans, arrays: kept verbatim
    Other(Value),
}

impl FieldValue {
    pub fn empty() -> Self {
        Self::Text(String::new())
    }

    /// Decode a raw JSON value for a field of the given type.
    ///
    /// Decoding is lossless: `decode(t, v).encode() == v` for every `v`
    /// except `null`, which reads as the empty string.
    pub fn decode(field_type: &FieldType, raw: Value) -> Self {
        match raw {
            Value::Null => Self::empty(),
            Value::String(text) => Self::Text(text),
            Value::Object(map) => match field_type {
                FieldType::DatePicker => DateConfig::from_map(&map)
                    .map(Self::Date)
                    .unwrap_or(Self::Object(map)),
                _ => Self::Object(map),
            },
            other => Self::Other(other),
        }
    }

    /// Wire representation
    pub fn encode(&self) -> Value {
        match self {
            Self::Text(text) => Value::String(text.clone()),
            Self::Date(config) => config.to_value(),
            Self::Object(map) => Value::Object(map.clone()),
            Self::Other(value) => value.clone(),
        }
    }

    /// Re-read the current content under a (possibly different) type
    pub fn retyped(&self, field_type: &FieldType) -> Self {
        Self::decode(field_type, self.encode())
    }

    /// True when the slot holds nothing a user would call a value
    pub fn is_blank(&self) -> bool {
        !is_truthy(&self.encode())
    }
}

impl Default for FieldValue {
    fn default() -> Self { Self::empty() }
}

impl From<&str> for FieldValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

/// DATEPICKER configuration
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_time: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validate_business_day: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validate_future_date: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DateConfig {
    /// Typed view of an object, only when it re-encodes identically
    fn from_map(map: &Map<String, Value>) -> Option<Self> {
        let original = Value::Object(map.clone());
        let config: Self = serde_json::from_value(original.clone()).ok()?;
        (config.to_value() == original).then_some(config)
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| Value::Object(Map::new()))
    }
}

/// JavaScript truthiness of a JSON value, as the legacy producers used it
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_datepicker_object_decodes_to_date() {
        let raw = json!({"format": "dd/MM/yyyy", "showTime": true});
        let value = FieldValue::decode(&FieldType::DatePicker, raw.clone());
        match &value {
            FieldValue::Date(config) => {
                assert_eq!(config.format.as_deref(), Some("dd/MM/yyyy"));
                assert_eq!(config.show_time, Some(true));
            }
            other => panic!("expected date config, got {:?}", other),
        }
        assert_eq!(value.encode(), raw);
    }

    #[test]
    fn test_lossy_date_object_stays_generic() {
        // explicit null would be dropped by the typed view
        let raw = json!({"format": null});
        let value = FieldValue::decode(&FieldType::DatePicker, raw.clone());
        assert!(matches!(value, FieldValue::Object(_)));
        assert_eq!(value.encode(), raw);
    }

    #[test]
    fn test_object_for_other_types() {
        let raw = json!({"minDate": "2024-01-01"});
        let value = FieldValue::decode(&FieldType::Text, raw);
        assert!(matches!(value, FieldValue::Object(_)));
    }

    #[test]
    fn test_null_reads_as_empty() {
        let value = FieldValue::decode(&FieldType::Select, Value::Null);
        assert_eq!(value, FieldValue::empty());
        assert!(value.is_blank());
    }

    #[test]
    fn test_retyped_promotes_object() {
        let value = FieldValue::decode(&FieldType::Text, json!({"format": "yyyy"}));
        let retyped = value.retyped(&FieldType::DatePicker);
        assert!(matches!(retyped, FieldValue::Date(_)));
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(false)));
        assert!(is_truthy(&json!("false")));
        assert!(is_truthy(&json!({})));
        assert!(is_truthy(&json!([])));
    }
}
