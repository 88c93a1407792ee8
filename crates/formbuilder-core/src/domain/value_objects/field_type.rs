//! Field Type Value Object
//!
//! The tag that selects rendering and configuration behaviour of a field.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Component type of a field: one of the built-in tags, or the id of a
/// custom component registered at runtime.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum FieldType {
    Text,
    TextArea,
    Select,
    Checkbox,
    RadioGroup,
    DatePicker,
    GridLookup,
    ListLookup,
    Grid,
    Dialog,
    Action,
    Group,
    FileUpload,
    DataModel,
    Custom(String),
}

impl FieldType {
    /// Every built-in type, in palette order.
    pub fn built_in() -> [FieldType; 14] {
        use FieldType::*;
        [
            Text, TextArea, Select, Checkbox, RadioGroup, DatePicker,
            GridLookup, ListLookup, Grid, Dialog, Action, Group,
            FileUpload, DataModel,
        ]
    }

    /// Parse a wire tag. Unknown tags become `Custom`.
    pub fn parse(tag: &str) -> Self {
        match tag {
            "TEXT" => Self::Text,
            "TEXTAREA" => Self::TextArea,
            "SELECT" => Self::Select,
            "CHECKBOX" => Self::Checkbox,
            "RADIOGRP" => Self::RadioGroup,
            "DATEPICKER" => Self::DatePicker,
            "GRIDLKP" => Self::GridLookup,
            "LSTLKP" => Self::ListLookup,
            "GRID" => Self::Grid,
            "DIALOG" => Self::Dialog,
            "ACTION" => Self::Action,
            "GROUP" => Self::Group,
            "FILEUPLOAD" => Self::FileUpload,
            "DATAMODEL" => Self::DataModel,
            other => Self::Custom(other.to_string()),
        }
    }

    /// Wire tag
    pub fn tag(&self) -> &str {
        match self {
            Self::Text => "TEXT",
            Self::TextArea => "TEXTAREA",
            Self::Select => "SELECT",
            Self::Checkbox => "CHECKBOX",
            Self::RadioGroup => "RADIOGRP",
            Self::DatePicker => "DATEPICKER",
            Self::GridLookup => "GRIDLKP",
            Self::ListLookup => "LSTLKP",
            Self::Grid => "GRID",
            Self::Dialog => "DIALOG",
            Self::Action => "ACTION",
            Self::Group => "GROUP",
            Self::FileUpload => "FILEUPLOAD",
            Self::DataModel => "DATAMODEL",
            Self::Custom(tag) => tag,
        }
    }

    /// Palette label for built-in types
    pub fn display_label(&self) -> Option<&'static str> {
        match self {
            Self::Text => Some("Text Input"),
            Self::TextArea => Some("Text Area"),
            Self::Select => Some("Select"),
            Self::Checkbox => Some("Checkbox"),
            Self::RadioGroup => Some("Radio Group"),
            Self::DatePicker => Some("Date Picker"),
            Self::GridLookup => Some("Grid Lookup"),
            Self::ListLookup => Some("List Lookup"),
            Self::Grid => Some("Grid"),
            Self::Dialog => Some("Dialog"),
            Self::Action => Some("Action"),
            Self::Group => Some("Group"),
            Self::FileUpload => Some("File Upload"),
            Self::DataModel => Some("Data Model"),
            Self::Custom(_) => None,
        }
    }

    pub fn is_built_in(&self) -> bool {
        !matches!(self, Self::Custom(_))
    }

    pub fn is_group(&self) -> bool {
        matches!(self, Self::Group)
    }

    /// Lookup fields bind to an external entity (GRIDLKP / LSTLKP)
    pub fn is_lookup(&self) -> bool {
        matches!(self, Self::GridLookup | Self::ListLookup)
    }
}

impl Default for FieldType {
    fn default() -> Self { Self::Text }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl From<&str> for FieldType {
    fn from(tag: &str) -> Self {
        Self::parse(tag)
    }
}

impl Serialize for FieldType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.tag())
    }
}

impl<'de> Deserialize<'de> for FieldType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(Self::parse(&tag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_built_in_tags_round_trip() {
        for field_type in FieldType::built_in() {
            assert_eq!(FieldType::parse(field_type.tag()), field_type);
            assert!(field_type.is_built_in());
            assert!(field_type.display_label().is_some());
        }
    }

    #[test]
    fn test_unknown_tag_is_custom() {
        let field_type = FieldType::parse("RATING");
        assert_eq!(field_type, FieldType::Custom("RATING".into()));
        assert_eq!(field_type.tag(), "RATING");
        assert!(!field_type.is_built_in());
        assert!(field_type.display_label().is_none());
    }

    #[test]
    fn test_serde_uses_tag() {
        let json = serde_json::to_string(&FieldType::GridLookup).unwrap();
        assert_eq!(json, "\"GRIDLKP\"");
        let back: FieldType = serde_json::from_str("\"GROUP\"").unwrap();
        assert!(back.is_group());
    }
}
