// SPDX-FileCopyrightText: 2026 notisync contributors
//
// SPDX-License-Identifier: Apache-2.0

//! Typed Notion property payload builders and extraction helpers.
//!
//! Notion wraps every value in a typed object: a title property wraps
//! rich-text spans, a date property has `start`/optional `end`, a select
//! wraps a `name`. Builders enforce the API's content limits; extractors
//! tolerate absent or differently typed properties by returning `None`.

use serde_json::{Value, json};

/// Notion caps text content at 2000 characters per span.
const TEXT_LIMIT: usize = 2000;

/// Notion caps select option names at 100 characters.
const SELECT_LIMIT: usize = 100;

/// Builds a title property from plain text.
pub(crate) fn title(text: &str) -> Value {
    json!({ "title": [{ "type": "text", "text": { "content": truncate(text, TEXT_LIMIT) } }] })
}

/// Builds a rich-text property. `None` becomes an empty span list.
pub(crate) fn rich_text(text: Option<&str>) -> Value {
    match text {
        Some(text) => json!({
            "rich_text": [{ "type": "text", "text": { "content": truncate(text, TEXT_LIMIT) } }]
        }),
        None => json!({ "rich_text": [] }),
    }
}

/// Builds a select property wrapping an option name.
pub(crate) fn select(name: &str) -> Value {
    json!({ "select": { "name": truncate(name, SELECT_LIMIT) } })
}

/// Builds a status property wrapping an option name.
pub(crate) fn status(name: &str) -> Value {
    json!({ "status": { "name": truncate(name, SELECT_LIMIT) } })
}

/// Builds a date property with a start and optional end.
pub(crate) fn date(start: &str, end: Option<&str>) -> Value {
    json!({ "date": { "start": start, "end": end } })
}

/// Extracts the plain text of the first span of a title or rich-text
/// property, or `None` when the property is absent, differently typed, or
/// empty.
pub(crate) fn plain_text(props: &Value, name: &str, kind: &str) -> Option<String> {
    let spans = props.get(name)?.get(kind)?.as_array()?;
    let first = spans.first()?;
    // Pages echo back a resolved `plain_text`; payloads we built ourselves
    // only carry `text.content`.
    let text = first
        .get("plain_text")
        .or_else(|| first.get("text").and_then(|t| t.get("content")))?;
    text.as_str().map(str::to_string)
}

/// Extracts the option name of a select property.
pub(crate) fn select_name(props: &Value, name: &str) -> Option<String> {
    props
        .get(name)?
        .get("select")?
        .get("name")?
        .as_str()
        .map(str::to_string)
}

/// Extracts the option name of a status property.
pub(crate) fn status_name(props: &Value, name: &str) -> Option<String> {
    props
        .get(name)?
        .get("status")?
        .get("name")?
        .as_str()
        .map(str::to_string)
}

/// Extracts the raw date object (`start`/`end`) of a date property.
pub(crate) fn date_object<'a>(props: &'a Value, name: &str) -> Option<&'a Value> {
    let date = props.get(name)?.get("date")?;
    date.is_object().then_some(date)
}

/// Truncates on a character boundary.
fn truncate(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_wraps_rich_text_span() {
        let value = title("Exam");
        assert_eq!(value["title"][0]["type"], "text");
        assert_eq!(value["title"][0]["text"]["content"], "Exam");
    }

    #[test]
    fn rich_text_none_is_empty_list() {
        let value = rich_text(None);
        assert_eq!(value["rich_text"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn title_respects_content_limit() {
        let long = "x".repeat(3000);
        let value = title(&long);
        let content = value["title"][0]["text"]["content"].as_str().unwrap();
        assert_eq!(content.chars().count(), TEXT_LIMIT);
    }

    #[test]
    fn truncate_is_char_boundary_safe() {
        let s = "é".repeat(5);
        assert_eq!(truncate(&s, 3).chars().count(), 3);
    }

    #[test]
    fn date_object_borrows_from_the_property_map() {
        let props = json!({ "Due": { "date": { "start": "2025-09-05", "end": null } } });
        let due = date_object(&props, "Due").unwrap();
        assert_eq!(due["start"], "2025-09-05");
        assert_eq!(due["end"], Value::Null);
    }

    #[test]
    fn extraction_tolerates_missing_and_mistyped() {
        let props = json!({ "Name": { "title": [] }, "Due": { "date": null } });
        assert_eq!(plain_text(&props, "Name", "title"), None);
        assert_eq!(plain_text(&props, "Missing", "rich_text"), None);
        assert_eq!(select_name(&props, "Name"), None);
        assert!(date_object(&props, "Due").is_none());
    }

    #[test]
    fn extraction_prefers_plain_text_from_pages() {
        let props = json!({
            "UID": { "rich_text": [{ "plain_text": "abc", "text": { "content": "ignored" } }] }
        });
        assert_eq!(plain_text(&props, "UID", "rich_text"), Some("abc".into()));
    }
}
