// SPDX-FileCopyrightText: 2026 notisync contributors
//
// SPDX-License-Identifier: Apache-2.0

use crate::schema::SchemaError;

/// Notion client errors.
///
/// "Not found" is deliberately absent: a 4xx response whose body carries the
/// `object_not_found` code is a soft miss and surfaces as `Ok(None)` from the
/// request layer, never as an error.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum NotionError {
    /// Network-level failure (connect, timeout, body read). Retryable.
    #[error("transport error: {0}")]
    Transport(String),

    /// A non-retryable 4xx response: malformed request, auth failure,
    /// permission denied.
    #[error("notion api rejected the request ({status}, code {code:?}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Notion error code from the response body, when present.
        code: String,
        /// Notion error message from the response body.
        message: String,
    },

    /// A 5xx or rate-limit response. Retried before surfacing.
    #[error("notion server error ({status}): {message}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Response body text.
        message: String,
    },

    /// All retry attempts were spent on transient failures.
    #[error("giving up after {attempts} attempts: {source}")]
    RetriesExhausted {
        /// How many attempts were made.
        attempts: u32,
        /// The last transient failure observed.
        #[source]
        source: Box<NotionError>,
    },

    /// A locally constructed payload failed schema validation. No network
    /// request was made.
    #[error(transparent)]
    Validation(#[from] SchemaError),

    /// The server answered with a body the client cannot make sense of.
    #[error("invalid response from notion: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for NotionError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e.to_string())
    }
}
