//! Field Node
//!
//! A single form field. GROUP fields own an ordered list of child fields.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::domain::value_objects::{FieldType, FieldValue};

/// Default layout width of a new field
pub const DEFAULT_WIDTH: &str = "100%";
/// Default spacing token of a field created in the designer
pub const DEFAULT_SPACING: &str = "md";

/// One field of a form
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "FieldWire", into = "FieldWire")]
pub struct FieldNode {
    pub id: String,
    pub field_type: FieldType,
    pub label: String,
    pub data_field: String,
    pub entity: String,
    pub width: String,
    pub spacing: String,
    pub required: bool,
    pub inline: bool,
    pub outlined: bool,
    pub value: FieldValue,
    /// Children; only GROUP fields are expected to have any
    pub child_fields: Vec<FieldNode>,
    pub load_data_info: Option<LoadDataInfo>,
    pub item_info: Option<ItemInfo>,
    pub option_values: Option<BTreeMap<String, String>>,
    pub enabled_when: Option<Value>,
    pub validations: Vec<Value>,
    /// Attributes this model does not know about, written back verbatim
    pub extra: Map<String, Value>,
}

impl FieldNode {
    pub fn new(id: impl Into<String>, field_type: FieldType, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            field_type,
            label: label.into(),
            data_field: String::new(),
            entity: String::new(),
            width: DEFAULT_WIDTH.to_string(),
            spacing: DEFAULT_SPACING.to_string(),
            required: false,
            inline: false,
            outlined: false,
            value: FieldValue::empty(),
            child_fields: vec![],
            load_data_info: None,
            item_info: None,
            option_values: None,
            enabled_when: None,
            validations: vec![],
            extra: Map::new(),
        }
    }

    pub fn with_data_field(mut self, data_field: impl Into<String>) -> Self {
        self.data_field = data_field.into();
        self
    }

    pub fn with_value(mut self, value: impl Into<FieldValue>) -> Self {
        self.value = value.into();
        self
    }

    pub fn with_children(mut self, children: Vec<FieldNode>) -> Self {
        self.child_fields = children;
        self
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn is_group(&self) -> bool {
        self.field_type.is_group()
    }

    /// Shallow merge of a partial update. Nested attributes are replaced
    /// wholesale; callers that want to keep sibling sub-attributes must
    /// merge them first.
    pub fn apply(&mut self, update: FieldUpdate) {
        if let Some(id) = update.id {
            self.id = id;
        }
        if let Some(field_type) = update.field_type {
            self.field_type = field_type;
            self.value = self.value.retyped(&self.field_type);
        }
        if let Some(label) = update.label {
            self.label = label;
        }
        if let Some(data_field) = update.data_field {
            self.data_field = data_field;
        }
        if let Some(entity) = update.entity {
            self.entity = entity;
        }
        if let Some(width) = update.width {
            self.width = width;
        }
        if let Some(spacing) = update.spacing {
            self.spacing = spacing;
        }
        if let Some(required) = update.required {
            self.required = required;
        }
        if let Some(inline) = update.inline {
            self.inline = inline;
        }
        if let Some(outlined) = update.outlined {
            self.outlined = outlined;
        }
        if let Some(value) = update.value {
            self.value = FieldValue::decode(&self.field_type, value);
        }
        if let Some(children) = update.child_fields {
            self.child_fields = children;
        }
        if update.load_data_info.is_some() {
            self.load_data_info = update.load_data_info;
        }
        if update.item_info.is_some() {
            self.item_info = update.item_info;
        }
        if update.option_values.is_some() {
            self.option_values = update.option_values;
        }
        if update.enabled_when.is_some() {
            self.enabled_when = update.enabled_when;
        }
        if let Some(validations) = update.validations {
            self.validations = validations;
        }
    }
}

/// Partial update for [`FieldNode::apply`]; `None` leaves an attribute alone
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldUpdate {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub field_type: Option<FieldType>,
    pub label: Option<String>,
    pub data_field: Option<String>,
    pub entity: Option<String>,
    pub width: Option<String>,
    pub spacing: Option<String>,
    pub required: Option<bool>,
    pub inline: Option<bool>,
    pub outlined: Option<bool>,
    pub value: Option<Value>,
    pub child_fields: Option<Vec<FieldNode>>,
    pub load_data_info: Option<LoadDataInfo>,
    pub item_info: Option<ItemInfo>,
    pub option_values: Option<BTreeMap<String, String>>,
    pub enabled_when: Option<Value>,
    pub validations: Option<Vec<Value>>,
}

impl FieldUpdate {
    pub fn label(label: impl Into<String>) -> Self {
        Self { label: Some(label.into()), ..Self::default() }
    }

    pub fn value(value: Value) -> Self {
        Self { value: Some(value), ..Self::default() }
    }
}

/// Data source binding of lookup fields
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoadDataInfo {
    pub data_model: String,
    pub data_source: String,
    pub columns_definition: Vec<ColumnDefinition>,
    pub real_time: bool,
}

/// Column shown by a lookup grid
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColumnDefinition {
    pub data_field: String,
    pub caption: String,
    pub data_type: String,
    pub visible: bool,
}

impl Default for ColumnDefinition {
    fn default() -> Self {
        Self {
            data_field: String::new(),
            caption: String::new(),
            data_type: "STRING".to_string(),
            visible: true,
        }
    }
}

/// Display properties of a looked-up item
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ItemInfo {
    pub main_property: String,
    pub desc_property: String,
    pub show_description: bool,
}

/// Canonical JSON shape of a field
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FieldWire {
    #[serde(default)]
    id: String,
    #[serde(rename = "type", default)]
    field_type: FieldType,
    #[serde(default)]
    label: String,
    #[serde(default)]
    data_field: String,
    #[serde(default)]
    entity: String,
    #[serde(default)]
    width: String,
    #[serde(default)]
    spacing: String,
    #[serde(default)]
    required: bool,
    #[serde(default)]
    inline: bool,
    #[serde(default)]
    outlined: bool,
    #[serde(default)]
    value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    child_fields: Option<Vec<FieldNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    load_data_info: Option<LoadDataInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    item_info: Option<ItemInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    option_values: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    enabled_when: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    validations: Option<Vec<Value>>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl From<FieldWire> for FieldNode {
    fn from(wire: FieldWire) -> Self {
        let value = FieldValue::decode(&wire.field_type, wire.value);
        Self {
            id: wire.id,
            field_type: wire.field_type,
            label: wire.label,
            data_field: wire.data_field,
            entity: wire.entity,
            width: wire.width,
            spacing: wire.spacing,
            required: wire.required,
            inline: wire.inline,
            outlined: wire.outlined,
            value,
            child_fields: wire.child_fields.unwrap_or_default(),
            load_data_info: wire.load_data_info,
            item_info: wire.item_info,
            option_values: wire.option_values,
            enabled_when: wire.enabled_when,
            validations: wire.validations.unwrap_or_default(),
            extra: wire.extra,
        }
    }
}

impl From<FieldNode> for FieldWire {
    fn from(node: FieldNode) -> Self {
        // GROUP always carries its list; other types only when non-empty
        let child_fields = if node.is_group() || !node.child_fields.is_empty() {
            Some(node.child_fields)
        } else {
            None
        };
        Self {
            id: node.id,
            value: node.value.encode(),
            field_type: node.field_type,
            label: node.label,
            data_field: node.data_field,
            entity: node.entity,
            width: node.width,
            spacing: node.spacing,
            required: node.required,
            inline: node.inline,
            outlined: node.outlined,
            child_fields,
            load_data_info: node.load_data_info,
            item_info: node.item_info,
            option_values: node.option_values,
            enabled_when: node.enabled_when,
            validations: if node.validations.is_empty() { None } else { Some(node.validations) },
            extra: node.extra,
        }
    }
}
