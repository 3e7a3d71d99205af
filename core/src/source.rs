// SPDX-FileCopyrightText: 2026 notisync contributors
//
// SPDX-License-Identifier: Apache-2.0

//! Pulling events from an external calendar into the local store.

use async_trait::async_trait;

use notisync_model::{Event, Record};

use crate::store::{LocalStore, StoreError};

/// A producer of calendar events, e.g. an institutional timetable feed.
///
/// Fetching is best-effort: a source that cannot reach its backend returns
/// an empty list rather than an error, so an import never fails a sync
/// pipeline that chains after it.
#[async_trait]
pub trait CalendarSource: Send + Sync {
    /// A short human-readable name for logs.
    fn name(&self) -> &str;

    /// Fetches the currently known events.
    async fn events(&self) -> Vec<Event>;
}

/// Imports events from a source into the local store, deduplicating against
/// what the store already holds.
///
/// Identity is the content-derived uid, so re-running an import after the
/// feed has not changed appends nothing. Returns how many events were added.
///
/// # Errors
///
/// Returns an error when the store cannot be read or written.
pub async fn import_events(
    source: &dyn CalendarSource,
    store: &LocalStore,
) -> Result<usize, StoreError> {
    let fetched = source.events().await;
    tracing::info!(source = source.name(), fetched = fetched.len(), "fetched events");

    let store_path = store.path().to_path_buf();
    let existing = {
        let store = store.clone();
        tokio::task::spawn_blocking(move || store.read_items())
            .await
            .map_err(|e| StoreError::Io {
                path: store_path.clone(),
                source: std::io::Error::other(e),
            })??
    };
    let known: std::collections::HashSet<&str> =
        existing.iter().map(|item| item.uid()).collect();

    let new_records: Vec<Record> = fetched
        .iter()
        .filter(|event| !known.contains(event.uid.as_str()))
        .map(|event| Record::Event(event.to_record()))
        .collect();

    let added = new_records.len();
    if added > 0 {
        let store = store.clone();
        tokio::task::spawn_blocking(move || store.append(&new_records))
            .await
            .map_err(|e| StoreError::Io {
                path: store_path,
                source: std::io::Error::other(e),
            })??;
    }

    tracing::info!(
        source = source.name(),
        added,
        duplicates = fetched.len() - added,
        "import finished"
    );
    Ok(added)
}

#[cfg(test)]
mod tests {
    use super::*;
    use notisync_model::EventRecord;
    use tempfile::TempDir;

    struct FixedSource(Vec<Event>);

    #[async_trait]
    impl CalendarSource for FixedSource {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn events(&self) -> Vec<Event> {
            self.0.clone()
        }
    }

    fn event(title: &str, date: &str) -> Event {
        Event::from_record(&EventRecord {
            event: Some(title.to_string()),
            eventtype: Some("Class".to_string()),
            location: None,
            room: None,
            date: date.to_string(),
            start: Some("09:00".to_string()),
            end: Some("10:00".to_string()),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn import_appends_new_events() {
        let dir = TempDir::new().unwrap();
        let store = LocalStore::new(dir.path().join("calendar.json"));
        let source = FixedSource(vec![
            event("Lecture", "2025-09-01"),
            event("Lab", "2025-09-02"),
        ]);

        let added = import_events(&source, &store).await.unwrap();

        assert_eq!(added, 2);
        let items = store.read_items().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title(), "Lecture");
    }

    #[tokio::test]
    async fn import_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = LocalStore::new(dir.path().join("calendar.json"));
        let source = FixedSource(vec![event("Lecture", "2025-09-01")]);

        assert_eq!(import_events(&source, &store).await.unwrap(), 1);
        assert_eq!(import_events(&source, &store).await.unwrap(), 0);
        assert_eq!(store.read_items().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn import_only_adds_unseen_events() {
        let dir = TempDir::new().unwrap();
        let store = LocalStore::new(dir.path().join("calendar.json"));

        let first = FixedSource(vec![event("Lecture", "2025-09-01")]);
        import_events(&first, &store).await.unwrap();

        let second = FixedSource(vec![
            event("Lecture", "2025-09-01"),
            event("Seminar", "2025-09-03"),
        ]);
        let added = import_events(&second, &store).await.unwrap();

        assert_eq!(added, 1);
        assert_eq!(store.read_items().unwrap().len(), 2);
    }
}
