// SPDX-FileCopyrightText: 2026 notisync contributors
//
// SPDX-License-Identifier: Apache-2.0

use jiff::Timestamp;
use jiff::civil::{Date, Time};
use serde::{Deserialize, Serialize};

use crate::datetime::parse_time_flexible;
use crate::uid::generate_uid;

/// Errors produced while constructing items from raw records.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// A required calendar date was missing or unparsable.
    #[error("invalid date {value:?}: {reason}")]
    InvalidDate {
        /// The raw value as found in the record.
        value: String,
        /// Why parsing failed.
        reason: String,
    },

    /// A priority value outside of high/medium/low.
    #[error("invalid priority {0:?} (expected high, medium or low)")]
    InvalidPriority(String),
}

/// Task priority. Defaults to medium when the record does not carry one.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    /// Needs attention first.
    High,

    /// The default.
    #[default]
    Medium,

    /// Can wait.
    Low,
}

impl Priority {
    /// Parses a priority case-insensitively. `None` yields the default.
    pub fn parse(value: Option<&str>) -> Result<Self, ModelError> {
        match value {
            None => Ok(Self::default()),
            Some(raw) => match raw.trim().to_lowercase().as_str() {
                "" => Ok(Self::default()),
                "high" => Ok(Self::High),
                "medium" => Ok(Self::Medium),
                "low" => Ok(Self::Low),
                _ => Err(ModelError::InvalidPriority(raw.to_string())),
            },
        }
    }

    /// Lowercase form, used in the identity hash and the local store.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    /// Capitalized form, used as the Notion select option name.
    pub fn select_name(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

/// A raw event record as it appears in the local JSON store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    /// Event title.
    #[serde(default)]
    pub event: Option<String>,

    /// Free-form category, e.g. "Class" or "Meeting".
    #[serde(default)]
    pub eventtype: Option<String>,

    /// Where the event takes place.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// Room within the location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,

    /// Calendar date, `YYYY-MM-DD`. Required.
    pub date: String,

    /// Start time; absent for all-day events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,

    /// End time; absent for all-day events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
}

/// A raw task record as it appears in the local JSON store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskRecord {
    /// Task title.
    #[serde(default)]
    pub task: Option<String>,

    /// Due date, `YYYY-MM-DD`. Required.
    pub due_date: String,

    /// high / medium / low, case-insensitive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,

    /// Free-form status; defaults to "To Do".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// Free-form notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A local store record: a `type`-tagged event or task.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Record {
    /// A calendar event record.
    Event(EventRecord),

    /// A task record.
    Task(TaskRecord),
}

/// A calendar event.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// Content-derived identity; see [`Event::compute_uid`].
    pub uid: String,

    /// Event title.
    pub title: String,

    /// Free-form category.
    pub event_type: String,

    /// Where the event takes place.
    pub location: Option<String>,

    /// Room within the location.
    pub room: Option<String>,

    /// The calendar date of the event.
    pub event_date: Date,

    /// Start time; `None` together with `end_time` means all-day.
    pub start_time: Option<Time>,

    /// End time.
    pub end_time: Option<Time>,

    /// When the backing page was last edited in Notion, once observed.
    pub last_edited_time: Option<Timestamp>,

    /// The Notion page id; absent until the item has been created remotely.
    pub remote_id: Option<String>,
}

impl Event {
    /// Builds an event from a raw local store record.
    pub fn from_record(record: &EventRecord) -> Result<Self, ModelError> {
        let event_date: Date =
            record
                .date
                .parse()
                .map_err(|e: jiff::Error| ModelError::InvalidDate {
                    value: record.date.clone(),
                    reason: e.to_string(),
                })?;

        let title = record
            .event
            .clone()
            .unwrap_or_else(|| "Untitled Event".to_string());
        let event_type = record
            .eventtype
            .clone()
            .unwrap_or_else(|| "General".to_string());
        let start_time = parse_time_flexible(record.start.as_deref());
        let end_time = parse_time_flexible(record.end.as_deref());

        let mut event = Self {
            uid: String::new(),
            title,
            event_type,
            location: record.location.clone(),
            room: record.room.clone(),
            event_date,
            start_time,
            end_time,
            last_edited_time: None,
            remote_id: None,
        };
        event.uid = event.compute_uid();
        Ok(event)
    }

    /// Converts back to a raw record, e.g. when appending imported events.
    pub fn to_record(&self) -> EventRecord {
        EventRecord {
            event: Some(self.title.clone()),
            eventtype: Some(self.event_type.clone()),
            location: self.location.clone(),
            room: self.room.clone(),
            date: self.event_date.to_string(),
            start: self.start_time.map(format_time),
            end: self.end_time.map(format_time),
        }
    }

    /// The identity hash over the defining fields.
    ///
    /// Excludes `remote_id` and `last_edited_time`: those legitimately differ
    /// between the local and remote copies of the same logical event.
    pub fn compute_uid(&self) -> String {
        let date = self.event_date.to_string();
        let start = self.start_time.map(format_time).unwrap_or_default();
        let end = self.end_time.map(format_time).unwrap_or_default();
        generate_uid(&[
            "event",
            &self.title,
            &self.event_type,
            self.location.as_deref().unwrap_or(""),
            self.room.as_deref().unwrap_or(""),
            &date,
            &start,
            &end,
        ])
    }
}

/// A task or assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    /// Content-derived identity; see [`Task::compute_uid`].
    pub uid: String,

    /// Task title.
    pub title: String,

    /// The due date of the task.
    pub due_date: Date,

    /// Task priority.
    pub priority: Priority,

    /// Free-form status, e.g. "To Do" or "Done".
    pub status: String,

    /// Free-form notes.
    pub notes: Option<String>,

    /// When the backing page was last edited in Notion, once observed.
    pub last_edited_time: Option<Timestamp>,

    /// The Notion page id; absent until the item has been created remotely.
    pub remote_id: Option<String>,
}

impl Task {
    /// Builds a task from a raw local store record.
    pub fn from_record(record: &TaskRecord) -> Result<Self, ModelError> {
        let due_date: Date =
            record
                .due_date
                .parse()
                .map_err(|e: jiff::Error| ModelError::InvalidDate {
                    value: record.due_date.clone(),
                    reason: e.to_string(),
                })?;

        let title = record
            .task
            .clone()
            .unwrap_or_else(|| "Untitled Task".to_string());
        let priority = Priority::parse(record.priority.as_deref())?;
        let status = record.status.clone().unwrap_or_else(|| "To Do".to_string());

        let mut task = Self {
            uid: String::new(),
            title,
            due_date,
            priority,
            status,
            notes: record.notes.clone(),
            last_edited_time: None,
            remote_id: None,
        };
        task.uid = task.compute_uid();
        Ok(task)
    }

    /// The identity hash over the defining fields.
    ///
    /// `status` is deliberately excluded: it is the field most likely to be
    /// edited on the Notion side, and identity must survive that.
    pub fn compute_uid(&self) -> String {
        let due = self.due_date.to_string();
        generate_uid(&[
            "task",
            &self.title,
            &due,
            self.priority.as_str(),
            self.notes.as_deref().unwrap_or(""),
        ])
    }
}

/// Which variant an item is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    /// A calendar event.
    Event,

    /// A task.
    Task,
}

impl ItemKind {
    /// Lowercase tag, matching the local store discriminator.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Event => "event",
            Self::Task => "task",
        }
    }
}

/// The unified item: the common currency between the local store and Notion.
#[derive(Debug, Clone, PartialEq)]
pub enum UnifiedItem {
    /// A calendar event.
    Event(Event),

    /// A task.
    Task(Task),
}

impl UnifiedItem {
    /// Builds an item from a raw local store record.
    pub fn from_record(record: &Record) -> Result<Self, ModelError> {
        match record {
            Record::Event(rec) => Event::from_record(rec).map(Self::Event),
            Record::Task(rec) => Task::from_record(rec).map(Self::Task),
        }
    }

    /// The variant of this item.
    pub fn kind(&self) -> ItemKind {
        match self {
            Self::Event(_) => ItemKind::Event,
            Self::Task(_) => ItemKind::Task,
        }
    }

    /// The cross-store join key.
    pub fn uid(&self) -> &str {
        match self {
            Self::Event(e) => &e.uid,
            Self::Task(t) => &t.uid,
        }
    }

    /// The human-readable title, used in logs and reports.
    pub fn title(&self) -> &str {
        match self {
            Self::Event(e) => &e.title,
            Self::Task(t) => &t.title,
        }
    }

    /// The Notion page id backing this item, if it has one.
    pub fn remote_id(&self) -> Option<&str> {
        match self {
            Self::Event(e) => e.remote_id.as_deref(),
            Self::Task(t) => t.remote_id.as_deref(),
        }
    }

    /// Assigns the backing Notion page id.
    ///
    /// Once assigned by a successful create, the id is carried forward so
    /// updates always target the same page.
    pub fn set_remote_id(&mut self, id: String) {
        match self {
            Self::Event(e) => e.remote_id = Some(id),
            Self::Task(t) => t.remote_id = Some(id),
        }
    }

    /// Compares two items for substantive difference.
    ///
    /// Ignores `remote_id` and `last_edited_time`, which are expected to
    /// legitimately differ between the local and remote copies and must never
    /// trigger a spurious update. Every other field counts. Items of
    /// different variants are never substantively equal.
    pub fn substantive_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Event(a), Self::Event(b)) => {
                a.uid == b.uid
                    && a.title == b.title
                    && a.event_type == b.event_type
                    && a.location == b.location
                    && a.room == b.room
                    && a.event_date == b.event_date
                    && a.start_time == b.start_time
                    && a.end_time == b.end_time
            }
            (Self::Task(a), Self::Task(b)) => {
                a.uid == b.uid
                    && a.title == b.title
                    && a.due_date == b.due_date
                    && a.priority == b.priority
                    && a.status == b.status
                    && a.notes == b.notes
            }
            _ => false,
        }
    }
}

/// Formats a time as `HH:MM:SS` for identity hashing and record round-trips.
/// Seconds are kept so two events differing only in seconds never collide.
fn format_time(time: Time) -> String {
    format!(
        "{:02}:{:02}:{:02}",
        time.hour(),
        time.minute(),
        time.second()
    )
}
