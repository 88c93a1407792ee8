//! Form Document Aggregate
//!
//! Form metadata, the field tree and the custom component registry.
//! Every edit is infallible: unknown ids and out-of-range indexes are no-ops.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::component::{self, ComponentDraft, CustomComponent, RegistryError};
use super::field::{FieldNode, FieldUpdate};
use super::tree::{self, Direction};

pub const DEFAULT_FORM_WIDTH: &str = "700px";
pub const DEFAULT_LAYOUT: &str = "PROCESS";
pub const STANDARD_LAYOUTS: [&str; 4] = ["PROCESS", "INQUIRY", "MAINTENANCE", "REPORT"];

/// The full form definition being edited
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormDocument {
    pub menu_id: String,
    pub label: String,
    pub form_width: String,
    pub layout: String,
    pub fields: Vec<FieldNode>,
    pub custom_components: Vec<CustomComponent>,
}

impl Default for FormDocument {
    fn default() -> Self {
        Self {
            menu_id: String::new(),
            label: String::new(),
            form_width: DEFAULT_FORM_WIDTH.to_string(),
            layout: DEFAULT_LAYOUT.to_string(),
            fields: vec![],
            custom_components: vec![],
        }
    }
}

impl FormDocument {
    pub fn new(menu_id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            menu_id: menu_id.into(),
            label: label.into(),
            ..Self::default()
        }
    }

    pub fn find(&self, id: &str) -> Option<&FieldNode> {
        tree::find(&self.fields, id)
    }

    pub fn contains(&self, id: &str) -> bool {
        tree::contains(&self.fields, id)
    }

    pub fn field_count(&self) -> usize {
        tree::flatten(&self.fields).len()
    }

    pub fn push_field(&mut self, field: FieldNode) {
        self.fields.push(field);
    }

    /// Append `field` to the root GROUP `group_id`, then de-duplicate.
    /// Returns false (tree untouched) when no such root group exists.
    pub fn insert_into_group(&mut self, group_id: &str, field: FieldNode) -> bool {
        match tree::root_group_mut(&mut self.fields, group_id) {
            Some(group) => group.child_fields.push(field),
            None => return false,
        }
        self.dedupe();
        true
    }

    pub fn remove_field(&mut self, id: &str) -> usize {
        tree::remove_all(&mut self.fields, id)
    }

    /// Remove `child_id` from the direct children of root field `group_id`
    pub fn remove_child_field(&mut self, group_id: &str, child_id: &str) -> bool {
        let Some(group) = self.fields.iter_mut().find(|f| f.id == group_id) else {
            return false;
        };
        let before = group.child_fields.len();
        group.child_fields.retain(|c| c.id != child_id);
        group.child_fields.len() != before
    }

    pub fn update_field(&mut self, id: &str, update: &FieldUpdate) -> usize {
        tree::update_all(&mut self.fields, id, update)
    }

    /// Root-level reorder
    pub fn move_field(&mut self, from: usize, to: usize) -> bool {
        tree::move_index(&mut self.fields, from, to)
    }

    pub fn move_field_up(&mut self, id: &str) -> bool {
        tree::move_sibling(&mut self.fields, id, Direction::Up)
    }

    pub fn move_field_down(&mut self, id: &str) -> bool {
        tree::move_sibling(&mut self.fields, id, Direction::Down)
    }

    pub fn dedupe(&mut self) {
        let fields = std::mem::take(&mut self.fields);
        self.fields = tree::dedupe(fields);
    }

    pub fn custom_component(&self, id: &str) -> Option<&CustomComponent> {
        self.custom_components.iter().find(|c| c.id == id)
    }

    pub fn register_component(&mut self, draft: ComponentDraft) -> Result<CustomComponent, RegistryError> {
        component::register(&mut self.custom_components, draft)
    }

    pub fn remove_component(&mut self, id: &str) -> Option<CustomComponent> {
        component::unregister(&mut self.custom_components, id)
    }

    /// The persisted `formDefinition` blob: `{fields, customComponents}`
    pub fn definition(&self) -> Value {
        json!({
            "fields": self.fields,
            "customComponents": self.custom_components,
        })
    }

    /// Rebuild the tree and registry from a stored `formDefinition` blob.
    /// Unreadable parts read as empty.
    pub fn load_definition(&mut self, definition: &Value) {
        self.fields = definition
            .get("fields")
            .and_then(|f| serde_json::from_value(f.clone()).ok())
            .unwrap_or_default();
        self.custom_components = definition
            .get("customComponents")
            .and_then(Value::as_array)
            .map(|list| list.iter().cloned().filter_map(CustomComponent::from_value).collect())
            .unwrap_or_default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::FieldType;

    fn text(id: &str) -> FieldNode {
        FieldNode::new(id, FieldType::Text, id)
    }

    fn ids(fields: &[FieldNode]) -> Vec<&str> {
        fields.iter().map(|f| f.id.as_str()).collect()
    }

    #[test]
    fn test_defaults() {
        let doc = FormDocument::default();
        assert_eq!(doc.form_width, "700px");
        assert_eq!(doc.layout, "PROCESS");
    }

    #[test]
    fn test_insert_into_group_removes_root_copy() {
        let mut doc = FormDocument::new("FORM_1", "Test");
        doc.push_field(text("f1"));
        doc.push_field(FieldNode::new("g1", FieldType::Group, "Group"));

        assert!(doc.insert_into_group("g1", text("f1")));
        assert_eq!(ids(&doc.fields), vec!["g1"]);
        assert_eq!(ids(&doc.fields[0].child_fields), vec!["f1"]);
    }

    #[test]
    fn test_insert_into_unknown_group_is_noop() {
        let mut doc = FormDocument::new("FORM_1", "Test");
        doc.push_field(text("f1"));
        let before = doc.clone();
        assert!(!doc.insert_into_group("missing", text("f2")));
        assert!(!doc.insert_into_group("f1", text("f2")));
        assert_eq!(doc, before);
    }

    #[test]
    fn test_remove_child_field_is_narrow() {
        let mut doc = FormDocument::new("FORM_1", "Test");
        doc.push_field(text("c1"));
        doc.push_field(FieldNode::new("g1", FieldType::Group, "Group").with_children(vec![text("c1")]));

        assert!(doc.remove_child_field("g1", "c1"));
        assert_eq!(ids(&doc.fields), vec!["c1", "g1"]);
        assert!(doc.fields[1].child_fields.is_empty());
        assert!(!doc.remove_child_field("g1", "c1"));
    }

    #[test]
    fn test_move_field_out_of_range() {
        let mut doc = FormDocument::new("FORM_1", "Test");
        doc.push_field(text("a"));
        doc.push_field(text("b"));
        assert!(!doc.move_field(0, 5));
        assert!(doc.move_field(1, 0));
        assert_eq!(ids(&doc.fields), vec!["b", "a"]);
    }

    #[test]
    fn test_definition_round_trip() {
        let mut doc = FormDocument::new("FORM_1", "Test");
        doc.push_field(FieldNode::new("g1", FieldType::Group, "Group").with_children(vec![text("c1")]));
        doc.register_component(ComponentDraft {
            name: Some("rating".into()),
            label: Some("Rating".into()),
            ..ComponentDraft::default()
        })
        .unwrap();

        let mut loaded = FormDocument::new("FORM_1", "Test");
        loaded.load_definition(&doc.definition());
        assert_eq!(loaded, doc);
    }

    #[test]
    fn test_remove_component_keeps_fields() {
        let mut doc = FormDocument::new("FORM_1", "Test");
        doc.register_component(ComponentDraft::from_json(r#"{"name":"rating","label":"Rating"}"#).unwrap())
            .unwrap();
        doc.push_field(FieldNode::new("r1", FieldType::Custom("RATING".into()), "Rating"));
        assert!(doc.remove_component("RATING").is_some());
        assert!(doc.contains("r1"));
        assert!(doc.custom_component("RATING").is_none());
    }
}
