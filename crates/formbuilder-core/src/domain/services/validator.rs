//! Form Validator
//!
//! Pure rule engine over the JSON shape of a form definition. Errors block a
//! save, warnings are advisory. The same rules serve live documents and raw
//! pasted JSON.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};

use crate::domain::aggregates::{CustomComponent, FormDocument, STANDARD_LAYOUTS};
use crate::domain::value_objects::{is_truthy, FieldType};

const MENU_ID_PATTERN: &str = r"^[A-Z0-9_]+$";
const CSS_LENGTH_PATTERN: &str = r"^\d+(px|%|em|rem)$";

/// Errors and warnings of one validation run
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }

    fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    fn warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }
}

/// A field entry with its position in the tree
struct Located<'a> {
    path: String,
    depth: usize,
    value: &'a Value,
}

/// Form definition validator
pub struct Validator {
    menu_id: Option<Regex>,
    css_length: Option<Regex>,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator {
    pub fn new() -> Self {
        Self {
            menu_id: Regex::new(MENU_ID_PATTERN).ok(),
            css_length: Regex::new(CSS_LENGTH_PATTERN).ok(),
        }
    }

    /// Validate a live document against a component registry
    pub fn validate(&self, document: &FormDocument, custom: &[CustomComponent]) -> ValidationReport {
        match serde_json::to_value(document) {
            Ok(value) => self.validate_json(&value, custom),
            Err(e) => ValidationReport {
                errors: vec![format!("Form could not be serialized: {}", e)],
                warnings: vec![],
            },
        }
    }

    /// Validate a raw form definition
    pub fn validate_json(&self, definition: &Value, custom: &[CustomComponent]) -> ValidationReport {
        let mut report = ValidationReport::default();

        let Some(form) = definition.as_object() else {
            report.error("Form definition must be a JSON object");
            return report;
        };

        self.check_metadata(form, &mut report);

        let Some(fields) = form.get("fields").and_then(Value::as_array) else {
            report.error("Form must contain a fields array");
            return report;
        };

        if fields.is_empty() {
            report.warning("Form must contain at least one field");
        }

        let mut located = Vec::new();
        locate(fields, "", 0, &mut located, &mut report);

        let custom_ids: HashSet<&str> = custom.iter().map(|c| c.id.as_str()).collect();
        let id_counts = count_attr(&located, "id");
        let data_field_counts = count_attr(&located, "dataField");

        for entry in &located {
            let Some(field) = entry.value.as_object() else {
                continue;
            };
            self.check_field(entry, field, &custom_ids, &mut report);

            if let Some(id) = non_empty_str(field, "id") {
                if id_counts.get(id).copied().unwrap_or(0) > 1 {
                    report.error(format!("{}: duplicate field id \"{}\"", entry.path, id));
                }
            }
            if let Some(data_field) = non_empty_str(field, "dataField") {
                if data_field_counts.get(data_field).copied().unwrap_or(0) > 1 {
                    report.warning(format!("{}: duplicate dataField \"{}\"", entry.path, data_field));
                }
            }
        }

        report
    }

    fn check_metadata(&self, form: &Map<String, Value>, report: &mut ValidationReport) {
        match non_empty_str(form, "menuId") {
            None => report.error("Menu ID is required"),
            Some(menu_id) if !matches(&self.menu_id, menu_id) => report.error(format!(
                "Menu ID \"{}\" must contain only uppercase letters, digits and underscores",
                menu_id
            )),
            Some(_) => {}
        }

        if non_empty_str(form, "label").is_none() {
            report.error("Form label is required");
        }

        match form.get("formWidth") {
            None | Some(Value::Null) => report.error("Form width is required"),
            Some(width) => {
                let ok = width.as_str().map(|w| matches(&self.css_length, w.trim())).unwrap_or(false);
                if !ok {
                    report.error(format!("Form width {} must be a CSS length (px, %, em, rem)", width));
                }
            }
        }

        if let Some(layout) = non_empty_str(form, "layout") {
            if !STANDARD_LAYOUTS.contains(&layout) {
                report.warning(format!(
                    "Layout \"{}\" is not a standard layout ({})",
                    layout,
                    STANDARD_LAYOUTS.join(", ")
                ));
            }
        }
    }

    fn check_field(
        &self,
        entry: &Located<'_>,
        field: &Map<String, Value>,
        custom_ids: &HashSet<&str>,
        report: &mut ValidationReport,
    ) {
        let path = &entry.path;

        if non_empty_str(field, "id").is_none() {
            report.error(format!("{}: missing id", path));
        }
        if non_empty_str(field, "label").is_none() {
            report.error(format!("{}: missing label", path));
        }
        if non_empty_str(field, "dataField").is_none() {
            report.error(format!("{}: missing dataField", path));
        }

        let field_type = match non_empty_str(field, "type") {
            None => {
                report.error(format!("{}: missing type", path));
                None
            }
            Some(tag) => {
                let field_type = FieldType::parse(tag);
                if !field_type.is_built_in() && !custom_ids.contains(tag) {
                    report.error(format!("{}: unknown type \"{}\"", path, tag));
                }
                Some(field_type)
            }
        };

        if let Some(required) = field.get("required") {
            if !required.is_boolean() {
                report.error(format!("{}: required must be a boolean", path));
            }
        }

        if let Some(width) = field.get("width").filter(|w| is_truthy(w)) {
            let ok = width.as_str().map(|w| matches(&self.css_length, w)).unwrap_or(false);
            if !ok {
                report.error(format!("{}: width {} must be a CSS length (px, %, em, rem)", path, width));
            }
        }

        let children = field.get("childFields");
        if let Some(children) = children {
            if !children.is_array() && !children.is_null() {
                report.error(format!("{}: childFields must be an array", path));
            }
        }

        let label = non_empty_str(field, "label").unwrap_or("");
        match field_type {
            Some(FieldType::Group) => {
                if entry.depth > 0 {
                    report.error(format!("{}: GROUP \"{}\" cannot be nested inside another GROUP", path, label));
                }
                let empty = children.and_then(Value::as_array).map(|c| c.is_empty()).unwrap_or(true);
                if empty {
                    report.warning(format!("{}: GROUP \"{}\" has no child fields", path, label));
                }
            }
            Some(FieldType::Select) => {
                let has_value = field
                    .get("value")
                    .map(|v| v.as_str().map(|s| !s.trim().is_empty()).unwrap_or_else(|| is_truthy(v)))
                    .unwrap_or(false);
                let has_options = field
                    .get("optionValues")
                    .and_then(Value::as_object)
                    .map(|o| !o.is_empty())
                    .unwrap_or(false);
                if !has_value && !has_options {
                    report.warning(format!("{}: SELECT \"{}\" without defined options", path, label));
                }
            }
            Some(ref lookup) if lookup.is_lookup() => {
                let has_model = field
                    .get("loadDataInfo")
                    .and_then(|info| info.get("dataModel"))
                    .map(is_truthy)
                    .unwrap_or(false);
                if !has_model {
                    report.warning(format!("{}: {} \"{}\" has no loadDataInfo.dataModel", path, lookup, label));
                }
            }
            _ => {}
        }
    }
}

fn matches(pattern: &Option<Regex>, text: &str) -> bool {
    pattern.as_ref().map(|re| re.is_match(text)).unwrap_or(true)
}

fn non_empty_str<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    object.get(key).and_then(Value::as_str).filter(|s| !s.trim().is_empty())
}

/// Flatten the tree in pre-order, numbering entries "Field 1", "Field 1.2", ...
fn locate<'a>(
    fields: &'a [Value],
    prefix: &str,
    depth: usize,
    out: &mut Vec<Located<'a>>,
    report: &mut ValidationReport,
) {
    for (index, value) in fields.iter().enumerate() {
        let number = if prefix.is_empty() {
            format!("{}", index + 1)
        } else {
            format!("{}.{}", prefix, index + 1)
        };
        let path = format!("Field {}", number);

        if !value.is_object() {
            report.error(format!("{}: field entry must be an object", path));
            continue;
        }
        out.push(Located { path, depth, value });

        if let Some(children) = value.get("childFields").and_then(Value::as_array) {
            locate(children, &number, depth + 1, out, report);
        }
    }
}

fn count_attr<'a>(located: &[Located<'a>], key: &str) -> HashMap<&'a str, usize> {
    let mut counts = HashMap::new();
    for entry in located {
        if let Some(value) = entry.value.as_object().and_then(|f| non_empty_str(f, key)) {
            *counts.entry(value).or_insert(0) += 1;
        }
    }
    counts
}
