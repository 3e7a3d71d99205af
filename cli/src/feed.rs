// SPDX-FileCopyrightText: 2026 notisync contributors
//
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;

use notisync_core::CalendarSource;
use notisync_model::{Event, EventRecord};

/// A calendar source backed by a JSON file holding an array of event records.
///
/// Best-effort like every source: an unreadable or malformed file yields an
/// empty list with a logged error, and individual bad records are skipped.
#[derive(Debug)]
pub struct FileFeed {
    path: PathBuf,
}

impl FileFeed {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl CalendarSource for FileFeed {
    fn name(&self) -> &str {
        "file"
    }

    async fn events(&self) -> Vec<Event> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) => {
                tracing::error!(path = %self.path.display(), error = %e, "could not read feed file");
                return Vec::new();
            }
        };

        let records: Vec<EventRecord> = match serde_json::from_str(&content) {
            Ok(records) => records,
            Err(e) => {
                tracing::error!(path = %self.path.display(), error = %e, "could not parse feed file");
                return Vec::new();
            }
        };

        records
            .iter()
            .filter_map(|record| match Event::from_record(record) {
                Ok(event) => Some(event),
                Err(e) => {
                    tracing::warn!(error = %e, "skipping feed record");
                    None
                }
            })
            .collect()
    }
}
