// SPDX-FileCopyrightText: 2026 notisync contributors
//
// SPDX-License-Identifier: Apache-2.0

//! Periodic sync driver for watch mode.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{RwLock, watch};
use tokio::task::JoinHandle;

use crate::engine::{SyncEngine, SyncReport};
use crate::store::LocalStore;

/// Whether the scheduler's background task is alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerStatus {
    /// Not started, or stopped.
    Idle,

    /// The background loop is running.
    Running,
}

/// Drives sync runs on a fixed interval until asked to stop.
///
/// Runs are strictly serialized: the loop awaits each run before sleeping
/// again, so a slow run delays the next tick instead of overlapping it. A
/// failed run is logged and the loop keeps going.
#[derive(Debug)]
pub struct SyncScheduler {
    engine: Arc<SyncEngine>,
    store: LocalStore,
    interval: Duration,
    handle: Option<JoinHandle<()>>,
    shutdown: Option<watch::Sender<bool>>,
    last_report: Arc<RwLock<Option<SyncReport>>>,
}

impl SyncScheduler {
    /// Creates a scheduler; nothing runs until [`SyncScheduler::start`].
    pub fn new(engine: Arc<SyncEngine>, store: LocalStore, interval: Duration) -> Self {
        Self {
            engine,
            store,
            interval,
            handle: None,
            shutdown: None,
            last_report: Arc::new(RwLock::new(None)),
        }
    }

    /// Spawns the background loop. A no-op when already running.
    ///
    /// The first run happens one full interval after start.
    pub fn start(&mut self) {
        if matches!(self.status(), SchedulerStatus::Running) {
            return;
        }

        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let engine = Arc::clone(&self.engine);
        let store = self.store.clone();
        let last_report = Arc::clone(&self.last_report);
        let period = self.interval;

        tracing::info!(interval_secs = period.as_secs_f64(), "starting sync scheduler");
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            // The first interval tick fires immediately; swallow it so the
            // initial run is a full period after start.
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        match engine.run(&store).await {
                            Ok(report) => {
                                *last_report.write().await = Some(report);
                            }
                            Err(e) => {
                                tracing::error!(error = %e, "scheduled sync run failed");
                            }
                        }
                    }
                    _ = shutdown_rx.changed() => {
                        tracing::info!("sync scheduler stopping");
                        return;
                    }
                }
            }
        });

        self.shutdown = Some(shutdown_tx);
        self.handle = Some(handle);
    }

    /// Signals the loop to stop and waits for it to exit.
    ///
    /// An in-flight run finishes first. A no-op when not running.
    pub async fn stop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(true);
        }
        if let Some(handle) = self.handle.take()
            && let Err(e) = handle.await
            && !e.is_cancelled()
        {
            tracing::error!(error = %e, "sync scheduler task panicked");
        }
    }

    /// Current lifecycle state.
    pub fn status(&self) -> SchedulerStatus {
        match &self.handle {
            Some(handle) if !handle.is_finished() => SchedulerStatus::Running,
            _ => SchedulerStatus::Idle,
        }
    }

    /// The report from the most recent completed run, if any.
    pub async fn last_report(&self) -> Option<SyncReport> {
        *self.last_report.read().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::SyncOptions;
    use notisync_notion::{NotionClient, NotionConfig, RetryPolicy};
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn empty_query_server() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [],
                "has_more": false,
            })))
            .mount(&server)
            .await;
        server
    }

    fn engine_for(server: &MockServer) -> Arc<SyncEngine> {
        let client = NotionClient::with_retry(
            NotionConfig {
                token: "t".to_string(),
                base_url: server.uri(),
                ..Default::default()
            },
            RetryPolicy::immediate(),
        )
        .unwrap();
        let options = SyncOptions {
            events_db_id: "events".to_string(),
            tasks_db_id: "tasks".to_string(),
            dry_run: false,
        };
        Arc::new(SyncEngine::new(client, options).unwrap())
    }

    #[tokio::test]
    async fn scheduler_runs_and_records_a_report() {
        let server = empty_query_server().await;
        let dir = tempfile::TempDir::new().unwrap();
        let store = LocalStore::new(dir.path().join("calendar.json"));

        let mut scheduler =
            SyncScheduler::new(engine_for(&server), store, Duration::from_millis(20));
        assert_eq!(scheduler.status(), SchedulerStatus::Idle);

        scheduler.start();
        assert_eq!(scheduler.status(), SchedulerStatus::Running);

        // Wait for at least one tick to complete.
        for _ in 0..50 {
            if scheduler.last_report().await.is_some() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(scheduler.last_report().await, Some(SyncReport::default()));

        scheduler.stop().await;
        assert_eq!(scheduler.status(), SchedulerStatus::Idle);
    }

    #[tokio::test]
    async fn stop_before_start_is_a_no_op() {
        let server = empty_query_server().await;
        let dir = tempfile::TempDir::new().unwrap();
        let store = LocalStore::new(dir.path().join("calendar.json"));

        let mut scheduler =
            SyncScheduler::new(engine_for(&server), store, Duration::from_secs(60));
        scheduler.stop().await;
        assert_eq!(scheduler.status(), SchedulerStatus::Idle);
    }
}
