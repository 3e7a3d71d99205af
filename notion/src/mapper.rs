// SPDX-FileCopyrightText: 2026 notisync contributors
//
// SPDX-License-Identifier: Apache-2.0

//! Translation between unified items and Notion page properties.

use jiff::Timestamp;
use jiff::civil::{Date, DateTime};
use serde_json::{Map, Value};

use notisync_model::{Event, Priority, Task, UnifiedItem};

use crate::property;

/// Converts an item into the property map of a page payload. Deterministic.
pub fn to_properties(item: &UnifiedItem) -> Map<String, Value> {
    match item {
        UnifiedItem::Event(event) => event_properties(event),
        UnifiedItem::Task(task) => task_properties(task),
    }
}

fn event_properties(event: &Event) -> Map<String, Value> {
    // Time-of-day only appears in the payload when the event has one; a bare
    // date keeps the page all-day on the Notion side.
    let start = match event.start_time {
        Some(time) => event.event_date.to_datetime(time).to_string(),
        None => event.event_date.to_string(),
    };
    let end = event
        .end_time
        .map(|time| event.event_date.to_datetime(time).to_string());

    let mut props = Map::new();
    props.insert("Name".to_string(), property::title(&event.title));
    props.insert("When".to_string(), property::date(&start, end.as_deref()));
    props.insert("Event Type".to_string(), property::select(&event.event_type));
    props.insert(
        "Location".to_string(),
        property::rich_text(event.location.as_deref()),
    );
    props.insert("Room".to_string(), property::rich_text(event.room.as_deref()));
    props.insert("UID".to_string(), property::rich_text(Some(&event.uid)));
    props
}

fn task_properties(task: &Task) -> Map<String, Value> {
    let mut props = Map::new();
    props.insert("Name".to_string(), property::title(&task.title));
    props.insert(
        "Due".to_string(),
        property::date(&task.due_date.to_string(), None),
    );
    props.insert(
        "Priority".to_string(),
        property::select(task.priority.select_name()),
    );
    props.insert("Status".to_string(), property::status(&task.status));
    props.insert(
        "Notes".to_string(),
        property::rich_text(task.notes.as_deref()),
    );
    props.insert("UID".to_string(), property::rich_text(Some(&task.uid)));
    props
}

/// Converts a Notion page object into a unified item.
///
/// Returns `None` for pages the engine cannot represent: no `UID` property,
/// no recognizable variant marker (`Due` implies Task, `When` implies Event),
/// or a missing/malformed required sub-field such as a task without a due
/// date. Callers silently skip such pages.
pub fn from_page(page: &Value) -> Option<UnifiedItem> {
    let props = page.get("properties")?;

    let uid = property::plain_text(props, "UID", "rich_text").filter(|uid| !uid.is_empty())?;
    let remote_id = page.get("id").and_then(Value::as_str).map(str::to_string);
    let last_edited_time = page
        .get("last_edited_time")
        .and_then(Value::as_str)
        .and_then(|raw| raw.parse::<Timestamp>().ok());

    if props.get("Due").is_some() {
        task_from_page(props, uid, remote_id, last_edited_time).map(UnifiedItem::Task)
    } else if props.get("When").is_some() {
        event_from_page(props, uid, remote_id, last_edited_time).map(UnifiedItem::Event)
    } else {
        None
    }
}

fn task_from_page(
    props: &Value,
    uid: String,
    remote_id: Option<String>,
    last_edited_time: Option<Timestamp>,
) -> Option<Task> {
    let due = property::date_object(props, "Due")?;
    let due_date = parse_date_part(due.get("start")?.as_str()?)?;

    let priority = match property::select_name(props, "Priority") {
        Some(name) => Priority::parse(Some(&name)).ok()?,
        None => Priority::default(),
    };

    Some(Task {
        uid,
        title: property::plain_text(props, "Name", "title")
            .unwrap_or_else(|| "Untitled Task".to_string()),
        due_date,
        priority,
        status: property::status_name(props, "Status").unwrap_or_else(|| "To Do".to_string()),
        notes: property::plain_text(props, "Notes", "rich_text"),
        last_edited_time,
        remote_id,
    })
}

fn event_from_page(
    props: &Value,
    uid: String,
    remote_id: Option<String>,
    last_edited_time: Option<Timestamp>,
) -> Option<Event> {
    let when = property::date_object(props, "When")?;
    let start_raw = when.get("start")?.as_str()?;

    let (event_date, start_time) = if start_raw.contains('T') {
        let dt: DateTime = start_raw.parse().ok()?;
        (dt.date(), Some(dt.time()))
    } else {
        (start_raw.parse().ok()?, None)
    };

    let end_time = when
        .get("end")
        .and_then(Value::as_str)
        .filter(|raw| raw.contains('T'))
        .and_then(|raw| raw.parse::<DateTime>().ok())
        .map(|dt| dt.time());

    Some(Event {
        uid,
        title: property::plain_text(props, "Name", "title")
            .unwrap_or_else(|| "Untitled Event".to_string()),
        event_type: property::select_name(props, "Event Type")
            .unwrap_or_else(|| "General".to_string()),
        location: property::plain_text(props, "Location", "rich_text"),
        room: property::plain_text(props, "Room", "rich_text"),
        event_date,
        start_time,
        end_time,
        last_edited_time,
        remote_id,
    })
}

/// Parses the date part of a Notion date `start`/`end` value, which may be a
/// bare date or a full datetime with an offset.
fn parse_date_part(raw: &str) -> Option<Date> {
    if raw.contains('T') {
        raw.parse::<DateTime>().ok().map(|dt| dt.date())
    } else {
        raw.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notisync_model::{EventRecord, Record, TaskRecord};
    use serde_json::json;

    fn local_event() -> UnifiedItem {
        let record = Record::Event(EventRecord {
            event: Some("Test Event".to_string()),
            eventtype: Some("Class".to_string()),
            location: Some("HHS".to_string()),
            room: Some("204".to_string()),
            date: "2025-09-01".to_string(),
            start: Some("10:00".to_string()),
            end: Some("11:00".to_string()),
        });
        UnifiedItem::from_record(&record).unwrap()
    }

    fn local_task() -> UnifiedItem {
        let record = Record::Task(TaskRecord {
            task: Some("Test Task".to_string()),
            due_date: "2025-09-05".to_string(),
            priority: Some("high".to_string()),
            status: None,
            notes: Some("bring notes".to_string()),
        });
        UnifiedItem::from_record(&record).unwrap()
    }

    /// Wraps a property map the way a query result does.
    fn page_from(props: Map<String, Value>) -> Value {
        json!({
            "id": "page-1",
            "last_edited_time": "2025-09-01T12:00:00.000Z",
            "properties": Value::Object(props),
        })
    }

    #[test]
    fn event_properties_carry_time_components() {
        let props = to_properties(&local_event());
        assert_eq!(props["When"]["date"]["start"], "2025-09-01T10:00:00");
        assert_eq!(props["When"]["date"]["end"], "2025-09-01T11:00:00");
        assert_eq!(props["Event Type"]["select"]["name"], "Class");
    }

    #[test]
    fn all_day_event_maps_to_bare_date() {
        let record = Record::Event(EventRecord {
            event: Some("Orientation".to_string()),
            eventtype: None,
            location: None,
            room: None,
            date: "2025-09-02".to_string(),
            start: None,
            end: None,
        });
        let item = UnifiedItem::from_record(&record).unwrap();
        let props = to_properties(&item);
        assert_eq!(props["When"]["date"]["start"], "2025-09-02");
        assert_eq!(props["When"]["date"]["end"], Value::Null);
    }

    #[test]
    fn task_properties_capitalize_priority() {
        let props = to_properties(&local_task());
        assert_eq!(props["Priority"]["select"]["name"], "High");
        assert_eq!(props["Status"]["status"]["name"], "To Do");
        assert_eq!(props["Due"]["date"]["start"], "2025-09-05");
    }

    #[test]
    fn round_trip_is_substantively_equal() {
        for item in [local_event(), local_task()] {
            let page = page_from(to_properties(&item));
            let mapped = from_page(&page).expect("page should map back");
            assert!(item.substantive_eq(&mapped), "round trip changed {item:?}");
            assert_eq!(mapped.remote_id(), Some("page-1"));
        }
    }

    #[test]
    fn page_without_uid_is_unrepresentable() {
        let mut props = to_properties(&local_event());
        props.remove("UID");
        assert!(from_page(&page_from(props)).is_none());

        let mut props = to_properties(&local_event());
        props.insert("UID".to_string(), json!({ "rich_text": [] }));
        assert!(from_page(&page_from(props)).is_none());
    }

    #[test]
    fn task_without_due_date_is_dropped() {
        let mut props = to_properties(&local_task());
        props.insert("Due".to_string(), json!({ "date": null }));
        assert!(from_page(&page_from(props)).is_none());
    }

    #[test]
    fn bare_start_date_means_all_day() {
        let mut props = to_properties(&local_event());
        props.insert(
            "When".to_string(),
            json!({ "date": { "start": "2025-09-01", "end": null } }),
        );
        let item = from_page(&page_from(props)).unwrap();
        match item {
            UnifiedItem::Event(event) => {
                assert!(event.start_time.is_none());
                assert!(event.end_time.is_none());
                assert_eq!(event.event_date.to_string(), "2025-09-01");
            }
            UnifiedItem::Task(_) => panic!("expected an event"),
        }
    }

    #[test]
    fn offset_datetimes_from_notion_parse() {
        let mut props = to_properties(&local_event());
        props.insert(
            "When".to_string(),
            json!({ "date": { "start": "2025-09-01T10:00:00.000-04:00", "end": null } }),
        );
        let item = from_page(&page_from(props)).unwrap();
        match item {
            UnifiedItem::Event(event) => {
                assert_eq!(event.event_date.to_string(), "2025-09-01");
                assert!(event.start_time.is_some());
            }
            UnifiedItem::Task(_) => panic!("expected an event"),
        }
    }
}
