//! Alias rules
//!
//! Ordered key-resolution rules for external form JSON. The first non-null
//! source of a rule wins; adding an alias means adding a source.

/// How a resolved value is coerced into the canonical shape
#[derive(Clone, Copy, Debug)]
pub enum Shape {
    /// String; numbers and booleans are stringified
    Text,
    /// Boolean by JavaScript truthiness
    Flag,
    /// Any JSON, verbatim
    Any,
    /// Array of JSON values; anything else is dropped
    List,
    /// Object whose values are coerced to strings
    StringMap,
    /// Nested field list, normalized recursively
    Fields,
    /// Nested object normalized by its own rules
    Object(&'static [AliasRule]),
    /// Array of objects normalized by the given rules
    ObjectList(&'static [AliasRule]),
}

/// What a rule produces when every source is null or absent
#[derive(Clone, Copy, Debug)]
pub enum Missing {
    Omit,
    Literal(&'static str),
    /// `field_{millis}_{random6}`
    GeneratedId,
    /// The raw label when it is a non-empty string, else the literal
    RawLabelOr(&'static str),
}

#[derive(Clone, Copy, Debug)]
pub struct AliasRule {
    pub target: &'static str,
    pub sources: &'static [&'static str],
    pub shape: Shape,
    pub missing: Missing,
}

const fn rule(target: &'static str, sources: &'static [&'static str], shape: Shape, missing: Missing) -> AliasRule {
    AliasRule { target, sources, shape, missing }
}

/// Label sources, shared with the dataField fallback
pub const LABEL_SOURCES: &[&str] = &["Label", "label"];

pub const COLUMN_RULES: &[AliasRule] = &[
    rule("dataField", &["DataField", "dataField"], Shape::Text, Missing::Omit),
    rule("caption", &["Caption", "caption"], Shape::Text, Missing::Omit),
    rule("dataType", &["DataType", "dataType"], Shape::Text, Missing::Omit),
    rule("visible", &["Visible", "visible"], Shape::Flag, Missing::Omit),
];

pub const LOAD_DATA_INFO_RULES: &[AliasRule] = &[
    rule("dataModel", &["DataModel", "dataModel"], Shape::Text, Missing::Omit),
    rule("dataSource", &["DataSource", "dataSource"], Shape::Text, Missing::Omit),
    rule("columnsDefinition", &["ColumnsDefinition", "columnsDefinition"], Shape::ObjectList(COLUMN_RULES), Missing::Omit),
    rule("realTime", &["RealTime", "realTime"], Shape::Flag, Missing::Omit),
];

pub const ITEM_INFO_RULES: &[AliasRule] = &[
    rule("mainProperty", &["MainProperty", "mainProperty"], Shape::Text, Missing::Omit),
    rule("descProperty", &["DescProperty", "descProperty"], Shape::Text, Missing::Omit),
    rule("showDescription", &["ShowDescription", "showDescription"], Shape::Flag, Missing::Omit),
];

pub const FIELD_RULES: &[AliasRule] = &[
    rule("id", &["Id", "id"], Shape::Text, Missing::GeneratedId),
    rule("type", &["Type", "type"], Shape::Text, Missing::Literal("TEXT")),
    rule("label", LABEL_SOURCES, Shape::Text, Missing::Literal("Imported Field")),
    rule("dataField", &["DataField", "dataField"], Shape::Text, Missing::RawLabelOr("field")),
    rule("entity", &["Entity", "entity"], Shape::Text, Missing::Literal("")),
    rule("width", &["Width", "width"], Shape::Text, Missing::Literal("100%")),
    rule("spacing", &["Spacing", "spacing"], Shape::Text, Missing::Literal("4")),
    rule("required", &["Required", "required"], Shape::Flag, Missing::Omit),
    rule("inline", &["Inline", "inline"], Shape::Flag, Missing::Omit),
    rule("outlined", &["Outlined", "outlined"], Shape::Flag, Missing::Omit),
    rule("value", &["Value", "value"], Shape::Any, Missing::Literal("")),
    rule("childFields", &["ChildFields", "childFields"], Shape::Fields, Missing::Omit),
    rule("loadDataInfo", &["LoadDataInfo", "loadDataInfo"], Shape::Object(LOAD_DATA_INFO_RULES), Missing::Omit),
    rule("itemInfo", &["ItemInfo", "itemInfo"], Shape::Object(ITEM_INFO_RULES), Missing::Omit),
    rule("optionValues", &["OptionValues", "optionValues"], Shape::StringMap, Missing::Omit),
    rule("enabledWhen", &["EnabledWhen", "enabledWhen"], Shape::Any, Missing::Omit),
    rule("validations", &["Validations", "validations"], Shape::List, Missing::Omit),
];

/// Form-level metadata, read from `formMetadata` or the legacy top level
pub const METADATA_RULES: &[AliasRule] = &[
    rule("menuId", &["MenuID", "MenuId", "menuId"], Shape::Text, Missing::Omit),
    rule("label", LABEL_SOURCES, Shape::Text, Missing::Omit),
    rule("formWidth", &["FormWidth", "formWidth"], Shape::Text, Missing::Omit),
    rule("layout", &["Layout", "layout"], Shape::Text, Missing::Omit),
];

pub const FIELDS_SOURCES: &[&str] = &["fields", "Fields"];
pub const COMPONENTS_SOURCES: &[&str] = &["customComponents", "CustomComponents"];
pub const METADATA_SOURCES: &[&str] = &["formMetadata", "FormMetadata"];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_targets_are_unique_and_canonical() {
        for rules in [FIELD_RULES, LOAD_DATA_INFO_RULES, ITEM_INFO_RULES, COLUMN_RULES, METADATA_RULES] {
            let targets: HashSet<_> = rules.iter().map(|r| r.target).collect();
            assert_eq!(targets.len(), rules.len());
            for rule in rules {
                assert!(rule.sources.contains(&rule.target), "{} is not its own source", rule.target);
            }
        }
    }
}
