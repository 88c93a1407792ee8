//! Form Editor
//!
//! Single-owner editing session over one [`FormDocument`]. Every command is
//! synchronous and I/O free; commands against ids that no longer exist are
//! silently ignored.

use std::sync::Arc;

use crate::domain::aggregates::{
    ComponentDraft, CustomComponent, FieldNode, FieldUpdate, FormDocument, RegistryError,
};
use crate::domain::services::{Clock, IdGenerator, SystemClock, ValidationReport, Validator};
use crate::domain::value_objects::{FieldType, FieldValue, FormId};
use crate::interchange::{export_document, suggested_filename, ImportError, Importer};

/// Editing session
pub struct FormEditor {
    document: FormDocument,
    form_id: Option<FormId>,
    selected: Option<String>,
    ids: IdGenerator,
    clock: Arc<dyn Clock>,
    validator: Validator,
    importer: Importer,
}

impl Default for FormEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl FormEditor {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            document: FormDocument::default(),
            form_id: None,
            selected: None,
            ids: IdGenerator::new(),
            importer: Importer::new(clock.clone()),
            clock,
            validator: Validator::new(),
        }
    }

    /// Open an existing document
    pub fn open(mut self, document: FormDocument, form_id: Option<FormId>) -> Self {
        self.document = document;
        self.form_id = form_id;
        self.selected = None;
        self
    }

    pub fn document(&self) -> &FormDocument {
        &self.document
    }

    pub fn into_document(self) -> FormDocument {
        self.document
    }

    /// Persisted id, once the document has been saved
    pub fn form_id(&self) -> Option<FormId> {
        self.form_id
    }

    pub fn set_form_id(&mut self, form_id: FormId) {
        self.form_id = Some(form_id);
    }

    // =========================================================================
    // Metadata
    // =========================================================================

    pub fn set_menu_id(&mut self, menu_id: impl Into<String>) {
        self.document.menu_id = menu_id.into();
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.document.label = label.into();
    }

    pub fn set_form_width(&mut self, form_width: impl Into<String>) {
        self.document.form_width = form_width.into();
    }

    pub fn set_layout(&mut self, layout: impl Into<String>) {
        self.document.layout = layout.into();
    }

    // =========================================================================
    // Selection
    // =========================================================================

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn selected_field(&self) -> Option<&FieldNode> {
        self.selected.as_deref().and_then(|id| self.document.find(id))
    }

    /// Select an existing field. Unknown ids leave the selection alone.
    pub fn select_field(&mut self, id: &str) -> bool {
        if self.document.contains(id) {
            self.selected = Some(id.to_string());
            true
        } else {
            false
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    fn drop_stale_selection(&mut self) {
        if let Some(id) = &self.selected {
            if !self.document.contains(id) {
                self.selected = None;
            }
        }
    }

    // =========================================================================
    // Field commands
    // =========================================================================

    /// Create a field of `field_type` and append it to the root, or to the
    /// root GROUP `target_group`. An unknown group leaves the tree unchanged.
    pub fn add_field(&mut self, field_type: FieldType, target_group: Option<&str>) -> FieldNode {
        let millis = self.ids.next_millis(self.clock.as_ref());
        let custom = self.document.custom_component(field_type.tag()).cloned();

        let label = match &custom {
            Some(component) => component.label.clone(),
            None => field_type
                .display_label()
                .map(String::from)
                .unwrap_or_else(|| field_type.tag().to_string()),
        };

        let mut node = FieldNode::new(format!("{}_{}", field_type.tag(), millis), field_type, label)
            .with_data_field(format!("field_{}", millis));
        if let Some(component) = custom {
            node.value = FieldValue::Text(component.default_value_text());
        }

        match target_group {
            Some(group_id) => {
                self.document.insert_into_group(group_id, node.clone());
            }
            None => self.document.push_field(node.clone()),
        }
        node
    }

    /// Drop an existing node into a root GROUP (drag-into-group)
    pub fn insert_into_group(&mut self, group_id: &str, node: FieldNode) -> bool {
        self.document.insert_into_group(group_id, node)
    }

    /// Remove every node with `id`, at any depth
    pub fn remove_field(&mut self, id: &str) {
        self.document.remove_field(id);
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }
    }

    pub fn remove_child_field(&mut self, group_id: &str, child_id: &str) {
        if self.document.remove_child_field(group_id, child_id) {
            self.drop_stale_selection();
        }
    }

    pub fn update_field(&mut self, id: &str, update: FieldUpdate) -> usize {
        let matched = self.document.update_field(id, &update);
        if update.id.is_some() {
            self.drop_stale_selection();
        }
        matched
    }

    pub fn move_field(&mut self, from: usize, to: usize) -> bool {
        self.document.move_field(from, to)
    }

    pub fn move_field_up(&mut self, id: &str) -> bool {
        self.document.move_field_up(id)
    }

    pub fn move_field_down(&mut self, id: &str) -> bool {
        self.document.move_field_down(id)
    }

    /// Run the de-duplication pass over the whole tree
    pub fn dedupe(&mut self) {
        self.document.dedupe();
    }

    // =========================================================================
    // Custom components
    // =========================================================================

    pub fn register_component(&mut self, draft: ComponentDraft) -> Result<CustomComponent, RegistryError> {
        self.document.register_component(draft)
    }

    pub fn register_component_json(&mut self, text: &str) -> Result<CustomComponent, RegistryError> {
        let draft = ComponentDraft::from_json(text)?;
        self.document.register_component(draft)
    }

    pub fn remove_component(&mut self, id: &str) -> Option<CustomComponent> {
        self.document.remove_component(id)
    }

    // =========================================================================
    // Interchange & validation
    // =========================================================================

    /// Replace the field tree from interchange JSON. The registry is replaced
    /// only when the file carries one. Returns non-fatal warnings.
    pub fn import_json(&mut self, text: &str) -> Result<Vec<String>, ImportError> {
        let imported = self.importer.import(text)?;
        self.document.fields = imported.fields;
        if let Some(components) = imported.custom_components {
            self.document.custom_components = components;
        }
        self.drop_stale_selection();
        Ok(imported.warnings)
    }

    pub fn export_json(&self) -> Result<String, serde_json::Error> {
        export_document(&self.document, self.clock.now())
    }

    pub fn suggested_filename(&self) -> String {
        suggested_filename(&self.document.label)
    }

    pub fn validate(&self) -> ValidationReport {
        self.validator.validate(&self.document, &self.document.custom_components)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::tree;
    use crate::domain::services::ManualClock;
    use proptest::prelude::*;
    use serde_json::json;

    const T0: i64 = 1_700_000_000_000;

    fn editor() -> FormEditor {
        FormEditor::with_clock(Arc::new(ManualClock::new(T0))).open(FormDocument::new("FORM_1", "Test"), None)
    }

    fn root_ids(editor: &FormEditor) -> Vec<String> {
        editor.document().fields.iter().map(|f| f.id.clone()).collect()
    }

    #[test]
    fn test_add_field_defaults() {
        let mut editor = editor();
        let node = editor.add_field(FieldType::Text, None);
        assert_eq!(node.id, format!("TEXT_{}", T0));
        assert_eq!(node.label, "Text Input");
        assert_eq!(node.data_field, format!("field_{}", T0));
        assert_eq!(node.width, "100%");
        assert_eq!(node.spacing, "md");
        assert!(!node.required && !node.inline && !node.outlined);
        assert_eq!(node.value, FieldValue::empty());
        assert_eq!(editor.document().fields.len(), 1);
    }

    #[test]
    fn test_same_millisecond_adds_get_distinct_ids() {
        let mut editor = editor();
        let a = editor.add_field(FieldType::Text, None);
        let b = editor.add_field(FieldType::Text, None);
        assert_ne!(a.id, b.id);
        assert_ne!(a.data_field, b.data_field);
    }

    #[test]
    fn test_add_custom_field_uses_component_defaults() {
        let mut editor = editor();
        editor
            .register_component_json(r#"{"name": "rating", "label": "Star Rating", "properties": {"max": 5}}"#)
            .unwrap();
        let node = editor.add_field(FieldType::parse("RATING"), None);
        assert_eq!(node.label, "Star Rating");
        assert_eq!(node.value, FieldValue::Text(r#"{"max":5}"#.into()));

        let unknown = editor.add_field(FieldType::parse("MYSTERY"), None);
        assert_eq!(unknown.label, "MYSTERY");
    }

    #[test]
    fn test_add_into_group() {
        let mut editor = editor();
        let group = editor.add_field(FieldType::Group, None);
        assert!(group.child_fields.is_empty());

        let child = editor.add_field(FieldType::Select, Some(&group.id));
        assert_eq!(root_ids(&editor), vec![group.id.clone()]);
        assert_eq!(editor.document().fields[0].child_fields[0].id, child.id);

        let before = editor.document().clone();
        editor.add_field(FieldType::Text, Some("missing"));
        assert_eq!(editor.document(), &before);
    }

    #[test]
    fn test_drag_into_group_removes_root_copy() {
        let mut editor = editor();
        let field = editor.add_field(FieldType::Text, None);
        let group = editor.add_field(FieldType::Group, None);

        assert!(editor.insert_into_group(&group.id, field.clone()));
        assert_eq!(root_ids(&editor), vec![group.id]);
    }

    #[test]
    fn test_remove_clears_selection() {
        let mut editor = editor();
        let node = editor.add_field(FieldType::Text, None);
        assert!(editor.select_field(&node.id));
        assert!(!editor.select_field("missing"));
        assert_eq!(editor.selected(), Some(node.id.as_str()));

        editor.remove_field(&node.id);
        assert!(editor.selected().is_none());
        editor.remove_field(&node.id);
        assert!(editor.document().fields.is_empty());
    }

    #[test]
    fn test_selection_and_saved_identity() {
        let mut editor = editor();
        let node = editor.add_field(FieldType::Select, None);
        assert!(editor.selected_field().is_none());

        editor.select_field(&node.id);
        assert_eq!(editor.selected_field().map(|f| f.label.as_str()), Some("Select"));
        editor.clear_selection();
        assert!(editor.selected().is_none());

        assert_eq!(editor.form_id(), None);
        editor.set_form_id(FormId::new(7));
        assert_eq!(editor.form_id(), Some(FormId::new(7)));

        let document = editor.into_document();
        assert_eq!(document.fields[0].id, node.id);
    }

    #[test]
    fn test_remove_child_field_drops_selection() {
        let mut editor = editor();
        let group = editor.add_field(FieldType::Group, None);
        let child = editor.add_field(FieldType::Text, Some(&group.id));
        editor.select_field(&child.id);

        editor.remove_child_field(&group.id, &child.id);
        assert!(editor.selected().is_none());
        assert!(editor.document().fields[0].child_fields.is_empty());
    }

    #[test]
    fn test_update_and_moves() {
        let mut editor = editor();
        let a = editor.add_field(FieldType::Text, None);
        let b = editor.add_field(FieldType::Text, None);

        assert_eq!(editor.update_field(&a.id, FieldUpdate::label("First")), 1);
        assert_eq!(editor.update_field("missing", FieldUpdate::label("x")), 0);
        assert_eq!(editor.document().fields[0].label, "First");

        assert!(!editor.move_field_up(&a.id));
        assert!(!editor.move_field_down(&b.id));
        assert!(editor.move_field_down(&a.id));
        assert_eq!(root_ids(&editor), vec![b.id.clone(), a.id.clone()]);
        assert!(!editor.move_field(0, 9));
        assert!(editor.move_field(1, 0));
        assert_eq!(root_ids(&editor), vec![a.id, b.id]);
    }

    #[test]
    fn test_import_replaces_fields_and_keeps_registry() {
        let mut editor = editor();
        editor.register_component_json(r#"{"name": "rating", "label": "Rating"}"#).unwrap();
        editor.add_field(FieldType::Text, None);

        let warnings = editor
            .import_json(&json!({"fields": [{"Id": "x", "Type": "RATING", "Label": "Stars"}]}).to_string())
            .unwrap();
        assert!(warnings.is_empty());
        assert_eq!(root_ids(&editor), vec!["x".to_string()]);
        assert_eq!(editor.document().custom_components.len(), 1);
        assert!(editor.validate().is_valid());

        let before = editor.document().clone();
        assert!(editor.import_json("not json").is_err());
        assert_eq!(editor.document(), &before);
    }

    #[test]
    fn test_orphaned_custom_field_is_a_validation_error() {
        let mut editor = editor();
        editor.register_component_json(r#"{"name": "rating", "label": "Rating"}"#).unwrap();
        editor.add_field(FieldType::parse("RATING"), None);
        assert!(editor.validate().is_valid());

        editor.remove_component("RATING");
        let report = editor.validate();
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("unknown type \"RATING\""));
    }

    #[test]
    fn test_export_round_trip() {
        let mut editor = editor();
        let group = editor.add_field(FieldType::Group, None);
        editor.add_field(FieldType::DatePicker, Some(&group.id));
        editor.add_field(FieldType::Select, None);

        let exported = editor.export_json().unwrap();
        let mut other = FormEditor::with_clock(Arc::new(ManualClock::new(T0)));
        other.import_json(&exported).unwrap();
        assert_eq!(other.document().fields, editor.document().fields);
        assert_eq!(editor.suggested_filename(), "Test_form_definition.json");
    }

    #[derive(Clone, Debug)]
    enum Op {
        Add(FieldType),
        AddToGroup(FieldType, usize),
        Drag(usize, usize),
        Remove(usize),
    }

    fn arb_op() -> impl Strategy<Value = Op> {
        let types = prop::sample::select(vec![FieldType::Text, FieldType::Group, FieldType::Select]);
        prop_oneof![
            types.clone().prop_map(Op::Add),
            (types, 0usize..8).prop_map(|(t, g)| Op::AddToGroup(t, g)),
            (0usize..8, 0usize..8).prop_map(|(f, g)| Op::Drag(f, g)),
            (0usize..8).prop_map(Op::Remove),
        ]
    }

    proptest! {
        #[test]
        fn prop_no_root_copy_of_grouped_field(ops in prop::collection::vec(arb_op(), 0..30)) {
            let mut editor = editor();
            for op in ops {
                let roots = editor.document().fields.clone();
                let groups: Vec<&FieldNode> = roots.iter().filter(|f| f.is_group()).collect();
                match op {
                    Op::Add(t) => {
                        editor.add_field(t, None);
                    }
                    Op::AddToGroup(t, g) => {
                        let target = groups.get(g).map(|f| f.id.clone());
                        editor.add_field(t, target.as_deref());
                    }
                    Op::Drag(f, g) => {
                        if let (Some(field), Some(group)) = (roots.get(f), groups.get(g)) {
                            if !field.is_group() {
                                editor.insert_into_group(&group.id, field.clone());
                            }
                        }
                    }
                    Op::Remove(f) => {
                        if let Some(field) = roots.get(f) {
                            editor.remove_field(&field.id);
                        }
                    }
                }

                let grouped = tree::grouped_ids(&editor.document().fields);
                for field in editor.document().fields.iter().filter(|f| !f.is_group()) {
                    prop_assert!(!grouped.contains(&field.id));
                }
                prop_assert!(tree::nesting_depth(&editor.document().fields) <= 1);
            }
        }
    }
}
