// SPDX-FileCopyrightText: 2026 notisync contributors
//
// SPDX-License-Identifier: Apache-2.0

//! The sync engine: one full local-to-Notion reconciliation run.

use notisync_model::ItemKind;
use notisync_notion::{NotionClient, NotionError};

use crate::plan::{SyncPlan, build_plan};
use crate::store::{LocalStore, StoreError};

/// Sync run errors.
///
/// Per-item apply failures are not errors: they are counted in the
/// [`SyncReport`] and the run carries on.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A required database id was not configured.
    #[error("missing {0} database id")]
    MissingDatabaseId(&'static str),

    /// The local store could not be read.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A whole-run Notion failure, e.g. querying a database.
    #[error(transparent)]
    Notion(#[from] NotionError),

    /// The blocking store task was cancelled or panicked.
    #[error("local store task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// What a sync run should touch and whether it may mutate anything.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// The events database id.
    pub events_db_id: String,

    /// The tasks database id.
    pub tasks_db_id: String,

    /// When set, compute and log the plan but send no create or update.
    pub dry_run: bool,
}

/// Outcome counters for one sync run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SyncReport {
    /// Pages created.
    pub created: u32,

    /// Pages updated.
    pub updated: u32,

    /// Planned actions skipped, e.g. an update whose page id was missing.
    pub skipped: u32,

    /// Planned actions that Notion rejected.
    pub failed: u32,
}

/// Runs local-to-Notion sync passes.
///
/// Each run is stateless and idempotent: it rereads the local store, requeries
/// both databases, and applies only the difference, so a rerun after a clean
/// run is a no-op.
#[derive(Debug)]
pub struct SyncEngine {
    client: NotionClient,
    options: SyncOptions,
}

impl SyncEngine {
    /// Creates an engine for the given client and options.
    ///
    /// # Errors
    ///
    /// Returns an error when either database id is empty.
    pub fn new(client: NotionClient, options: SyncOptions) -> Result<Self, EngineError> {
        if options.events_db_id.trim().is_empty() {
            return Err(EngineError::MissingDatabaseId("events"));
        }
        if options.tasks_db_id.trim().is_empty() {
            return Err(EngineError::MissingDatabaseId("tasks"));
        }
        Ok(Self { client, options })
    }

    /// The options this engine was built with.
    pub fn options(&self) -> &SyncOptions {
        &self.options
    }

    /// Performs one full sync pass and reports what happened.
    ///
    /// Local items are read from the store, remote items from both databases,
    /// and the resulting plan is applied sequentially. A single failed create
    /// or update is logged and counted, never fatal.
    ///
    /// # Errors
    ///
    /// Returns an error only for whole-run failures: an unreadable local
    /// store or a database query that fails after retries.
    pub async fn run(&self, store: &LocalStore) -> Result<SyncReport, EngineError> {
        tracing::info!(dry_run = self.options.dry_run, "starting sync run");

        let local_items = {
            let store = store.clone();
            tokio::task::spawn_blocking(move || store.read_items()).await??
        };

        let mut remote_items = self
            .client
            .query_as_items(&self.options.events_db_id)
            .await?;
        remote_items.extend(
            self.client
                .query_as_items(&self.options.tasks_db_id)
                .await?,
        );

        tracing::info!(
            local = local_items.len(),
            remote = remote_items.len(),
            "collected items"
        );

        let plan = build_plan(&remote_items, &local_items);
        if self.options.dry_run {
            tracing::info!(
                would_create = plan.to_create.len(),
                would_update = plan.to_update.len(),
                "dry run, not applying plan"
            );
            return Ok(SyncReport::default());
        }

        let report = self.apply(&plan).await;
        tracing::info!(
            created = report.created,
            updated = report.updated,
            skipped = report.skipped,
            failed = report.failed,
            "sync run finished"
        );
        Ok(report)
    }

    /// Applies a plan, routing each create to the database matching the
    /// item's kind and each update to its recorded page.
    async fn apply(&self, plan: &SyncPlan) -> SyncReport {
        let mut report = SyncReport::default();

        for item in &plan.to_create {
            let database_id = self.database_for(item.kind());
            match self.client.create_page(database_id, item).await {
                Ok(Some(_)) => report.created += 1,
                // A soft miss here means the target database itself is gone
                // or the id is stale; no page was created.
                Ok(None) => {
                    tracing::error!(
                        title = item.title(),
                        database_id,
                        "create failed: database not found"
                    );
                    report.failed += 1;
                }
                Err(e) => {
                    tracing::error!(title = item.title(), error = %e, "create failed");
                    report.failed += 1;
                }
            }
        }

        for item in &plan.to_update {
            let Some(page_id) = item.remote_id() else {
                // Updates come from plan matches and always carry the page
                // id; a missing one means the plan was built elsewhere.
                tracing::warn!(title = item.title(), "update without a page id, skipping");
                report.skipped += 1;
                continue;
            };
            match self.client.update_page(page_id, item).await {
                Ok(Some(_)) => report.updated += 1,
                // The page was deleted remotely between query and apply.
                Ok(None) => {
                    tracing::error!(
                        title = item.title(),
                        page_id,
                        "update failed: page not found"
                    );
                    report.failed += 1;
                }
                Err(e) => {
                    tracing::error!(title = item.title(), error = %e, "update failed");
                    report.failed += 1;
                }
            }
        }

        report
    }

    fn database_for(&self, kind: ItemKind) -> &str {
        match kind {
            ItemKind::Event => &self.options.events_db_id,
            ItemKind::Task => &self.options.tasks_db_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notisync_notion::NotionConfig;

    fn client() -> NotionClient {
        NotionClient::new(NotionConfig {
            token: "t".to_string(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn empty_events_db_id_is_rejected() {
        let options = SyncOptions {
            events_db_id: " ".to_string(),
            tasks_db_id: "tasks".to_string(),
            dry_run: false,
        };
        assert!(matches!(
            SyncEngine::new(client(), options),
            Err(EngineError::MissingDatabaseId("events"))
        ));
    }

    #[test]
    fn empty_tasks_db_id_is_rejected() {
        let options = SyncOptions {
            events_db_id: "events".to_string(),
            tasks_db_id: String::new(),
            dry_run: false,
        };
        assert!(matches!(
            SyncEngine::new(client(), options),
            Err(EngineError::MissingDatabaseId("tasks"))
        ));
    }
}
