//! Local file commands: validate, normalize, export

use anyhow::{anyhow, Context, Result};
use colored::Colorize;
use formbuilder_core::interchange::{export_document, suggested_filename, Importer};
use formbuilder_core::{CustomComponent, FormDocument, ValidationReport, Validator};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

fn read(file: &Path) -> Result<String> {
    fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))
}

/// Validate a form definition as written
pub fn validate(file: &Path) -> Result<()> {
    let text = read(file)?;
    let report = validate_text(&text)?;
    print_report(&report);
    if report.is_valid() {
        Ok(())
    } else {
        Err(anyhow!("{} failed validation with {} error(s)", file.display(), report.errors.len()))
    }
}

pub fn validate_text(text: &str) -> Result<ValidationReport> {
    let definition: Value = serde_json::from_str(text).context("Invalid JSON")?;
    let custom: Vec<CustomComponent> = definition
        .get("customComponents")
        .and_then(Value::as_array)
        .map(|entries| entries.iter().cloned().filter_map(CustomComponent::from_value).collect())
        .unwrap_or_default();
    Ok(Validator::new().validate_json(&definition, &custom))
}

fn print_report(report: &ValidationReport) {
    for error in &report.errors {
        println!("{} {}", "error:".red().bold(), error);
    }
    for warning in &report.warnings {
        println!("{} {}", "warning:".yellow().bold(), warning);
    }
    if report.is_clean() {
        println!("{} no problems found", "✓".green());
    }
}

/// Import with alias rules into a document carrying the file's metadata
pub fn normalize_text(text: &str) -> Result<(FormDocument, Vec<String>)> {
    let imported = Importer::default().import(text)?;
    let metadata = imported.metadata;
    let mut document = FormDocument::default();
    if let Some(menu_id) = metadata.menu_id {
        document.menu_id = menu_id;
    }
    if let Some(label) = metadata.label {
        document.label = label;
    }
    if let Some(form_width) = metadata.form_width {
        document.form_width = form_width;
    }
    if let Some(layout) = metadata.layout {
        document.layout = layout;
    }
    document.fields = imported.fields;
    document.custom_components = imported.custom_components.unwrap_or_default();
    Ok((document, imported.warnings))
}

fn load_normalized(file: &Path) -> Result<FormDocument> {
    let (document, warnings) = normalize_text(&read(file)?)?;
    for warning in warnings {
        eprintln!("{} {}", "warning:".yellow().bold(), warning);
    }
    Ok(document)
}

/// Print the canonical form of a file, or write it to `output`
pub fn normalize(file: &Path, output: Option<&Path>) -> Result<()> {
    let document = load_normalized(file)?;
    let json = export_document(&document, chrono::Utc::now())?;
    match output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
            println!("{} wrote {}", "✓".green(), path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

/// Write the canonical form under its suggested file name in `dir`
pub fn export(file: &Path, dir: &Path) -> Result<PathBuf> {
    let document = load_normalized(file)?;
    let target = dir.join(suggested_filename(&document.label));
    fs::write(&target, export_document(&document, chrono::Utc::now())?)
        .with_context(|| format!("writing {}", target.display()))?;
    println!("{} exported {} field(s) to {}", "✓".green(), document.field_count(), target.display());
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validate_text_reports_errors() {
        let report = validate_text(&json!({"menuId": "bad id", "label": "", "formWidth": "700px", "fields": []}).to_string()).unwrap();
        assert_eq!(report.errors.len(), 2);
        assert!(validate_text("{").is_err());
    }

    #[test]
    fn test_validate_text_accepts_custom_components() {
        let text = json!({
            "menuId": "FORM_1",
            "label": "Survey",
            "formWidth": "100%",
            "fields": [{"id": "r1", "type": "RATING", "label": "Stars", "dataField": "stars"}],
            "customComponents": [{"id": "RATING", "name": "rating", "label": "Rating"}]
        });
        assert!(validate_text(&text.to_string()).unwrap().is_clean());
    }

    #[test]
    fn test_normalize_legacy_file() {
        let text = json!({
            "MenuID": "LEGACY_1",
            "Label": "Legacy",
            "Fields": [{"Id": "x", "Type": "TEXT", "Label": "Name", "Width": "50%"}]
        })
        .to_string();
        let (document, warnings) = normalize_text(&text).unwrap();
        assert!(warnings.is_empty());
        assert_eq!(document.menu_id, "LEGACY_1");
        assert_eq!(document.fields[0].data_field, "Name");
        assert_eq!(document.fields[0].width, "50%");
        assert!(normalize_text(r#"{"foo": 1}"#).is_err());
    }
}
