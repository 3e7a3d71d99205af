// SPDX-FileCopyrightText: 2026 notisync contributors
//
// SPDX-License-Identifier: Apache-2.0

//! First-run provisioning of the two Notion databases.

use serde_json::Value;

use notisync_notion::{
    NotionClient, NotionError, build_create_database_payload, calendar_schema,
    status_property_update, tasks_schema,
};

const EVENTS_DB_TITLE: &str = "Sync - Calendar";
const TASKS_DB_TITLE: &str = "Sync - Tasks";

/// Database ids after provisioning, with creation flags for reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupOutcome {
    /// The events database id.
    pub events_db_id: String,

    /// Whether the events database was created by this call.
    pub events_created: bool,

    /// The tasks database id.
    pub tasks_db_id: String,

    /// Whether the tasks database was created by this call.
    pub tasks_created: bool,
}

/// Makes sure both databases exist, creating whichever is missing.
///
/// A configured id that still resolves remotely is kept as-is; a missing or
/// stale id gets a fresh database under `parent_page_id`. The Status property
/// cannot be part of a database create, so a newly created tasks database
/// gets it added with a follow-up update.
///
/// # Errors
///
/// Returns an error when a create or update is rejected, or when a created
/// database comes back without an id.
pub async fn ensure_databases(
    client: &NotionClient,
    parent_page_id: &str,
    events_db_id: Option<&str>,
    tasks_db_id: Option<&str>,
) -> Result<SetupOutcome, NotionError> {
    let (events_db_id, events_created) = ensure_database(
        client,
        parent_page_id,
        events_db_id,
        EVENTS_DB_TITLE,
        &calendar_schema(),
        "📅",
    )
    .await?;

    let (tasks_db_id, tasks_created) = ensure_database(
        client,
        parent_page_id,
        tasks_db_id,
        TASKS_DB_TITLE,
        &tasks_schema(),
        "✅",
    )
    .await?;

    if tasks_created {
        tracing::info!(database_id = %tasks_db_id, "adding status property to tasks database");
        client
            .update_database(&tasks_db_id, &status_property_update())
            .await?;
    }

    Ok(SetupOutcome {
        events_db_id,
        events_created,
        tasks_db_id,
        tasks_created,
    })
}

async fn ensure_database(
    client: &NotionClient,
    parent_page_id: &str,
    configured_id: Option<&str>,
    title: &str,
    schema: &[(&str, notisync_notion::PropertySpec)],
    icon: &str,
) -> Result<(String, bool), NotionError> {
    if let Some(id) = configured_id.filter(|id| !id.trim().is_empty()) {
        match client.get_database(id).await? {
            Some(_) => {
                tracing::info!(database_id = id, title, "database already exists");
                return Ok((id.to_string(), false));
            }
            None => {
                tracing::warn!(database_id = id, title, "configured database not found, recreating");
            }
        }
    }

    let payload = build_create_database_payload(parent_page_id, title, schema, Some(icon))?;
    let database = client.create_database(&payload).await?;
    let id = database
        .get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| {
            NotionError::InvalidResponse("created database carries no id".to_string())
        })?
        .to_string();

    tracing::info!(database_id = %id, title, "created database");
    Ok((id, true))
}
