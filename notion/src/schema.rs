// SPDX-FileCopyrightText: 2026 notisync contributors
//
// SPDX-License-Identifier: Apache-2.0

//! Database schema construction and payload validation.
//!
//! Everything here runs locally, before any network request: a payload that
//! fails these checks is rejected with the specific rule violated, and the
//! request is never sent.

use serde_json::{Map, Value, json};

use notisync_model::ItemKind;

/// A schema or payload rule violation.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// A database schema must contain exactly one title property.
    #[error("exactly one title property is required; found {0}")]
    TitleCount(usize),

    /// Select option names must be unique case-insensitively.
    #[error("option names must be unique (case-insensitive); duplicate: {0:?}")]
    DuplicateOption(String),

    /// The API rejects commas inside option names.
    #[error("commas are not allowed in option names: {0:?}")]
    CommaInOption(String),

    /// Select and multi-select properties need at least one option.
    #[error("property {0:?} requires a non-empty option list")]
    EmptyOptions(String),

    /// The create-database API forbids status properties.
    #[error(
        "property {0:?}: status properties cannot be included in a database \
         create payload; add them via a subsequent update"
    )]
    StatusOnCreate(String),

    /// A page payload without a parent database reference.
    #[error("payload missing 'parent' with 'database_id'")]
    MissingParent,

    /// A required page property is absent.
    #[error("missing required property {0:?}")]
    MissingProperty(String),

    /// A page property does not have the wrapper shape its type demands.
    #[error("property {name:?} is not a valid {expected} object")]
    InvalidProperty {
        /// Property name.
        name: String,
        /// The wrapper type that was expected.
        expected: &'static str,
    },
}

/// A select/status option with an optional color.
#[derive(Debug, Clone)]
pub struct SelectOption {
    /// Option name, unique case-insensitively within a property.
    pub name: String,

    /// Notion color keyword, e.g. "blue".
    pub color: Option<String>,
}

impl SelectOption {
    /// Creates a colored option.
    pub fn new(name: &str, color: &str) -> Self {
        Self {
            name: name.to_string(),
            color: Some(color.to_string()),
        }
    }
}

/// Declarative property specification for a database schema.
#[derive(Debug, Clone)]
pub enum PropertySpec {
    /// The page title. Exactly one per database.
    Title,

    /// Free rich text.
    RichText,

    /// A date with `start`/optional `end`.
    Date,

    /// Single-choice select.
    Select {
        /// The selectable options.
        options: Vec<SelectOption>,
    },

    /// Multi-choice select.
    MultiSelect {
        /// The selectable options.
        options: Vec<SelectOption>,
    },

    /// A status property. Only valid in update payloads.
    Status {
        /// The status options.
        options: Vec<SelectOption>,
    },
}

/// The canonical calendar (events) database schema.
pub fn calendar_schema() -> Vec<(&'static str, PropertySpec)> {
    vec![
        ("Name", PropertySpec::Title),
        ("When", PropertySpec::Date),
        (
            "Event Type",
            PropertySpec::Select {
                options: vec![
                    SelectOption::new("Orientation", "blue"),
                    SelectOption::new("Meeting", "green"),
                    SelectOption::new("Study Session", "purple"),
                    SelectOption::new("General", "gray"),
                ],
            },
        ),
        ("Location", PropertySpec::RichText),
        ("Room", PropertySpec::RichText),
        ("UID", PropertySpec::RichText),
    ]
}

/// The canonical tasks database schema.
///
/// The `Status` property is intentionally absent: the create-database API
/// forbids status properties, so it is added afterwards with
/// [`status_property_update`].
pub fn tasks_schema() -> Vec<(&'static str, PropertySpec)> {
    vec![
        ("Name", PropertySpec::Title),
        ("Due", PropertySpec::Date),
        (
            "Priority",
            PropertySpec::Select {
                options: vec![
                    SelectOption::new("High", "red"),
                    SelectOption::new("Medium", "yellow"),
                    SelectOption::new("Low", "blue"),
                ],
            },
        ),
        ("Notes", PropertySpec::RichText),
        ("UID", PropertySpec::RichText),
    ]
}

/// The follow-up update payload that adds `Status` to the tasks database.
pub fn status_property_update() -> Value {
    // Infallible by construction, but built through the same validated path.
    build_update_database_payload(&[(
        "Status",
        PropertySpec::Status {
            options: vec![
                SelectOption::new("To Do", "default"),
                SelectOption::new("In Progress", "blue"),
                SelectOption::new("Done", "green"),
            ],
        },
    )])
    .unwrap_or_else(|_| json!({ "properties": {} }))
}

/// Builds a create-database payload from a declarative schema.
///
/// # Errors
///
/// Rejects schemas without exactly one title property, option lists that are
/// empty, duplicated case-insensitively or contain commas, and any status
/// property (forbidden on create).
pub fn build_create_database_payload(
    parent_page_id: &str,
    title: &str,
    properties: &[(&str, PropertySpec)],
    icon_emoji: Option<&str>,
) -> Result<Value, SchemaError> {
    let props = build_property_schemas(properties, true)?;

    let title_count = properties
        .iter()
        .filter(|(_, spec)| matches!(spec, PropertySpec::Title))
        .count();
    if title_count != 1 {
        return Err(SchemaError::TitleCount(title_count));
    }

    let mut payload = json!({
        "parent": { "type": "page_id", "page_id": parent_page_id },
        "title": [{ "type": "text", "text": { "content": title, "link": null } }],
        "properties": props,
    });
    if let Some(emoji) = icon_emoji {
        payload["icon"] = json!({ "type": "emoji", "emoji": emoji });
    }
    Ok(payload)
}

/// Builds an update-database payload. Status properties are allowed here.
pub fn build_update_database_payload(
    properties: &[(&str, PropertySpec)],
) -> Result<Value, SchemaError> {
    let props = build_property_schemas(properties, false)?;
    Ok(json!({ "properties": props }))
}

fn build_property_schemas(
    properties: &[(&str, PropertySpec)],
    for_create: bool,
) -> Result<Map<String, Value>, SchemaError> {
    let mut props = Map::new();
    for (name, spec) in properties {
        let schema = match spec {
            PropertySpec::Title => json!({ "title": {} }),
            PropertySpec::RichText => json!({ "rich_text": {} }),
            PropertySpec::Date => json!({ "date": {} }),
            PropertySpec::Select { options } => {
                json!({ "select": { "options": normalize_options(name, options)? } })
            }
            PropertySpec::MultiSelect { options } => {
                json!({ "multi_select": { "options": normalize_options(name, options)? } })
            }
            PropertySpec::Status { options } => {
                if for_create {
                    return Err(SchemaError::StatusOnCreate((*name).to_string()));
                }
                json!({ "status": { "options": normalize_options(name, options)? } })
            }
        };
        props.insert((*name).to_string(), schema);
    }
    Ok(props)
}

fn normalize_options(
    property: &str,
    options: &[SelectOption],
) -> Result<Vec<Value>, SchemaError> {
    if options.is_empty() {
        return Err(SchemaError::EmptyOptions(property.to_string()));
    }

    let mut seen = Vec::with_capacity(options.len());
    let mut normalized = Vec::with_capacity(options.len());
    for option in options {
        if option.name.contains(',') {
            return Err(SchemaError::CommaInOption(option.name.clone()));
        }
        let lowered = option.name.to_lowercase();
        if seen.contains(&lowered) {
            return Err(SchemaError::DuplicateOption(option.name.clone()));
        }
        seen.push(lowered);

        let mut entry = json!({ "name": option.name });
        if let Some(color) = &option.color {
            entry["color"] = json!(color);
        }
        normalized.push(entry);
    }
    Ok(normalized)
}

/// Validates a constructed page payload against the target variant's schema.
///
/// Run before every page create/update; a failure aborts the call locally
/// with no network request.
pub fn validate_page_payload(payload: &Value, kind: ItemKind) -> Result<(), SchemaError> {
    if payload
        .pointer("/parent/database_id")
        .and_then(Value::as_str)
        .is_none()
    {
        return Err(SchemaError::MissingParent);
    }

    let props = payload
        .get("properties")
        .filter(|p| p.is_object())
        .ok_or_else(|| SchemaError::MissingProperty("properties".to_string()))?;

    check_spans(props, "Name", "title", true)?;
    check_spans(props, "UID", "rich_text", true)?;
    match kind {
        ItemKind::Event => {
            check_date(props, "When", true)?;
            check_select(props, "Event Type")?;
            check_spans(props, "Location", "rich_text", false)?;
        }
        ItemKind::Task => {
            check_date(props, "Due", true)?;
            check_select(props, "Priority")?;
            check_status(props, "Status")?;
        }
    }
    Ok(())
}

/// Checks a title/rich_text property: a list of `text` spans with content.
fn check_spans(
    props: &Value,
    name: &str,
    kind: &'static str,
    required: bool,
) -> Result<(), SchemaError> {
    let Some(prop) = props.get(name) else {
        return if required {
            Err(SchemaError::MissingProperty(name.to_string()))
        } else {
            Ok(())
        };
    };

    let spans = prop
        .get(kind)
        .and_then(Value::as_array)
        .ok_or(SchemaError::InvalidProperty {
            name: name.to_string(),
            expected: kind,
        })?;
    if kind == "title" && spans.is_empty() {
        return Err(SchemaError::InvalidProperty {
            name: name.to_string(),
            expected: kind,
        });
    }

    let well_formed = spans.iter().all(|span| {
        span.get("type").and_then(Value::as_str) == Some("text")
            && span.pointer("/text/content").is_some()
    });
    if !well_formed {
        return Err(SchemaError::InvalidProperty {
            name: name.to_string(),
            expected: kind,
        });
    }
    Ok(())
}

fn check_date(props: &Value, name: &str, required: bool) -> Result<(), SchemaError> {
    let Some(prop) = props.get(name) else {
        return if required {
            Err(SchemaError::MissingProperty(name.to_string()))
        } else {
            Ok(())
        };
    };

    if prop.pointer("/date/start").and_then(Value::as_str).is_none() {
        return Err(SchemaError::InvalidProperty {
            name: name.to_string(),
            expected: "date",
        });
    }
    Ok(())
}

fn check_select(props: &Value, name: &str) -> Result<(), SchemaError> {
    let Some(prop) = props.get(name) else {
        return Ok(());
    };

    let select = prop.get("select").ok_or(SchemaError::InvalidProperty {
        name: name.to_string(),
        expected: "select",
    })?;
    // A null select clears the value; otherwise it must carry a name.
    if !select.is_null() && select.get("name").is_none() {
        return Err(SchemaError::InvalidProperty {
            name: name.to_string(),
            expected: "select",
        });
    }
    Ok(())
}

fn check_status(props: &Value, name: &str) -> Result<(), SchemaError> {
    let Some(prop) = props.get(name) else {
        return Ok(());
    };

    if prop.pointer("/status/name").is_none() {
        return Err(SchemaError::InvalidProperty {
            name: name.to_string(),
            expected: "status",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_calendar_payload_builds() {
        let payload =
            build_create_database_payload("parent-1", "Sync - Calendar", &calendar_schema(), Some("📅"))
                .unwrap();
        assert_eq!(payload["parent"]["page_id"], "parent-1");
        assert_eq!(payload["icon"]["emoji"], "📅");
        assert!(payload["properties"]["Name"]["title"].is_object());
        assert!(payload["properties"]["When"]["date"].is_object());
        let options = payload["properties"]["Event Type"]["select"]["options"]
            .as_array()
            .unwrap();
        assert_eq!(options.len(), 4);
        assert_eq!(options[0]["name"], "Orientation");
        assert_eq!(options[0]["color"], "blue");
    }

    #[test]
    fn tasks_schema_omits_status() {
        assert!(!tasks_schema().iter().any(|(name, _)| *name == "Status"));
        let update = status_property_update();
        assert!(update["properties"]["Status"]["status"]["options"].is_array());
    }

    #[test]
    fn status_rejected_on_create() {
        let schema = [
            ("Name", PropertySpec::Title),
            (
                "Status",
                PropertySpec::Status {
                    options: vec![SelectOption::new("To Do", "default")],
                },
            ),
        ];
        let err = build_create_database_payload("parent", "T", &schema, None).unwrap_err();
        assert!(matches!(err, SchemaError::StatusOnCreate(name) if name == "Status"));
    }

    #[test]
    fn exactly_one_title_enforced() {
        let none = [("When", PropertySpec::Date)];
        assert!(matches!(
            build_create_database_payload("p", "T", &none, None),
            Err(SchemaError::TitleCount(0))
        ));

        let two = [("Name", PropertySpec::Title), ("Alias", PropertySpec::Title)];
        assert!(matches!(
            build_create_database_payload("p", "T", &two, None),
            Err(SchemaError::TitleCount(2))
        ));
    }

    #[test]
    fn option_name_rules() {
        let comma = [
            ("Name", PropertySpec::Title),
            (
                "Kind",
                PropertySpec::Select {
                    options: vec![SelectOption::new("a,b", "blue")],
                },
            ),
        ];
        assert!(matches!(
            build_create_database_payload("p", "T", &comma, None),
            Err(SchemaError::CommaInOption(_))
        ));

        let dup = [
            ("Name", PropertySpec::Title),
            (
                "Kind",
                PropertySpec::MultiSelect {
                    options: vec![
                        SelectOption::new("High", "red"),
                        SelectOption::new("high", "blue"),
                    ],
                },
            ),
        ];
        assert!(matches!(
            build_create_database_payload("p", "T", &dup, None),
            Err(SchemaError::DuplicateOption(_))
        ));

        let empty = [
            ("Name", PropertySpec::Title),
            ("Kind", PropertySpec::Select { options: vec![] }),
        ];
        assert!(matches!(
            build_create_database_payload("p", "T", &empty, None),
            Err(SchemaError::EmptyOptions(_))
        ));
    }

    #[test]
    fn page_payload_requires_parent_and_core_properties() {
        let payload = serde_json::json!({ "properties": {} });
        assert!(matches!(
            validate_page_payload(&payload, ItemKind::Task),
            Err(SchemaError::MissingParent)
        ));

        let payload = serde_json::json!({
            "parent": { "database_id": "db-1" },
            "properties": {
                "Name": { "title": [{ "type": "text", "text": { "content": "t" } }] },
                "UID": { "rich_text": [{ "type": "text", "text": { "content": "u" } }] },
            },
        });
        assert!(matches!(
            validate_page_payload(&payload, ItemKind::Task),
            Err(SchemaError::MissingProperty(name)) if name == "Due"
        ));
    }

    #[test]
    fn page_payload_rejects_malformed_date() {
        let payload = serde_json::json!({
            "parent": { "database_id": "db-1" },
            "properties": {
                "Name": { "title": [{ "type": "text", "text": { "content": "t" } }] },
                "UID": { "rich_text": [{ "type": "text", "text": { "content": "u" } }] },
                "Due": { "date": { "end": "2025-09-05" } },
            },
        });
        assert!(matches!(
            validate_page_payload(&payload, ItemKind::Task),
            Err(SchemaError::InvalidProperty { expected: "date", .. })
        ));
    }
}
