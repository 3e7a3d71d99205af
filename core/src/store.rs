// SPDX-FileCopyrightText: 2026 notisync contributors
//
// SPDX-License-Identifier: Apache-2.0

//! The local JSON-array store, shared with whatever else edits the file.
//!
//! Readers and writers both take an exclusive lock on a sibling `.lock` file
//! so neither side observes a partial write; writes go to a temporary file
//! and land with an atomic rename.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use fs2::FileExt;
use serde_json::Value;

use notisync_model::{Record, UnifiedItem};

/// How long a reader or writer waits for the file lock before giving up.
const LOCK_TIMEOUT: Duration = Duration::from_secs(10);

/// How often lock acquisition is re-attempted while waiting.
const LOCK_POLL: Duration = Duration::from_millis(100);

/// Local store errors.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The file lock could not be acquired within the bounded wait.
    #[error("timed out waiting for lock on {path}")]
    LockTimeout {
        /// The store file the lock guards.
        path: PathBuf,
    },

    /// The file exists but does not hold a JSON array.
    #[error("{path} does not contain a JSON array")]
    NotAnArray {
        /// The store file.
        path: PathBuf,
    },

    /// The file contents are not valid JSON.
    #[error("could not decode JSON from {path}: {source}")]
    Json {
        /// The store file.
        path: PathBuf,
        /// The decode failure.
        source: serde_json::Error,
    },

    /// Filesystem failure.
    #[error("io error on {path}: {source}")]
    Io {
        /// The affected path.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },
}

/// Handle to the local calendar/tasks JSON file.
///
/// Operations are synchronous; async callers run them through
/// `tokio::task::spawn_blocking` so lock waits stay off the runtime threads.
#[derive(Debug, Clone)]
pub struct LocalStore {
    path: PathBuf,
    lock_timeout: Duration,
}

impl LocalStore {
    /// Creates a store handle for the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock_timeout: LOCK_TIMEOUT,
        }
    }

    /// The store file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the raw JSON array. A missing or empty file reads as empty.
    ///
    /// # Errors
    ///
    /// Returns an error on lock timeout, unreadable file, invalid JSON, or
    /// non-array content.
    pub fn read_values(&self) -> Result<Vec<Value>, StoreError> {
        let _lock = self.acquire_lock()?;
        self.read_values_locked()
    }

    /// Reads the store and converts each record into a unified item.
    ///
    /// A single malformed record never aborts the read: it is skipped with a
    /// logged error and the remaining records are returned.
    ///
    /// # Errors
    ///
    /// Returns an error only for file-level failures (lock timeout, invalid
    /// JSON, non-array content), not per-record ones.
    pub fn read_items(&self) -> Result<Vec<UnifiedItem>, StoreError> {
        let values = self.read_values()?;

        let mut items = Vec::with_capacity(values.len());
        for value in values {
            match parse_item(&value) {
                Ok(item) => items.push(item),
                Err(reason) => {
                    tracing::error!(record = %value, reason, "could not parse local record, skipping");
                }
            }
        }
        Ok(items)
    }

    /// Appends records to the JSON array, crash-safely.
    ///
    /// The whole array is rewritten to `<path>.tmp` and atomically renamed
    /// over the original, all under the file lock.
    ///
    /// # Errors
    ///
    /// Returns an error on lock timeout or any filesystem/JSON failure; on
    /// failure the original file is left untouched.
    pub fn append(&self, new_records: &[Record]) -> Result<(), StoreError> {
        let _lock = self.acquire_lock()?;

        let mut values = self.read_values_locked()?;
        for record in new_records {
            let value = serde_json::to_value(record).map_err(|source| StoreError::Json {
                path: self.path.clone(),
                source,
            })?;
            values.push(value);
        }

        let tmp_path = self.path.with_extension("json.tmp");
        let serialized =
            serde_json::to_string_pretty(&values).map_err(|source| StoreError::Json {
                path: self.path.clone(),
                source,
            })?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let write_result = fs::write(&tmp_path, serialized)
            .and_then(|()| fs::rename(&tmp_path, &self.path));
        if let Err(source) = write_result {
            let _ = fs::remove_file(&tmp_path);
            return Err(StoreError::Io {
                path: self.path.clone(),
                source,
            });
        }

        tracing::info!(
            path = %self.path.display(),
            total = values.len(),
            appended = new_records.len(),
            "wrote local store"
        );
        Ok(())
    }

    /// Read path shared by locked callers.
    fn read_values_locked(&self) -> Result<Vec<Value>, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(path = %self.path.display(), "local store not found, treating as empty");
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let data: Value = serde_json::from_str(&content).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;
        match data {
            Value::Array(values) => Ok(values),
            _ => Err(StoreError::NotAnArray {
                path: self.path.clone(),
            }),
        }
    }

    /// Acquires the exclusive lock, waiting up to the bounded timeout.
    ///
    /// The lock is released when the returned file handle drops, on every
    /// exit path.
    fn acquire_lock(&self) -> Result<File, StoreError> {
        let lock_path = self.path.with_extension("json.lock");
        if let Some(parent) = lock_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|source| StoreError::Io {
                path: lock_path.clone(),
                source,
            })?;

        let deadline = Instant::now() + self.lock_timeout;
        loop {
            match file.try_lock_exclusive() {
                Ok(()) => return Ok(file),
                Err(_) if Instant::now() < deadline => std::thread::sleep(LOCK_POLL),
                Err(_) => {
                    return Err(StoreError::LockTimeout {
                        path: self.path.clone(),
                    });
                }
            }
        }
    }

    #[cfg(test)]
    fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }
}

fn parse_item(value: &Value) -> Result<UnifiedItem, String> {
    let record: Record =
        serde_json::from_value(value.clone()).map_err(|e| format!("invalid record: {e}"))?;
    UnifiedItem::from_record(&record).map_err(|e| e.to_string())
}
