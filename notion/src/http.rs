// SPDX-FileCopyrightText: 2026 notisync contributors
//
// SPDX-License-Identifier: Apache-2.0

//! HTTP request layer: authentication headers, retry, and error
//! classification.

use reqwest::{Client, Method, StatusCode};
use serde_json::Value;

use crate::config::NotionConfig;
use crate::error::NotionError;
use crate::retry::RetryPolicy;

/// Error body shape returned by the Notion API.
#[derive(Debug, serde::Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

/// HTTP client for Notion API operations.
///
/// Every request is retried up to the policy's attempt budget on transient
/// failures (network errors, 5xx, 429). Other 4xx responses fail immediately,
/// except those whose body carries the `object_not_found` code, which are a
/// soft miss and come back as `Ok(None)`.
#[derive(Debug)]
pub(crate) struct HttpClient {
    client: Client,
    config: NotionConfig,
    retry: RetryPolicy,
}

impl HttpClient {
    /// Creates a new HTTP client.
    pub(crate) fn new(config: NotionConfig, retry: RetryPolicy) -> Result<Self, NotionError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .user_agent(&config.user_agent)
            .build()?;
        Ok(Self {
            client,
            config,
            retry,
        })
    }

    /// Issues a request against an API path, retrying transient failures.
    ///
    /// Returns `Ok(None)` on an `object_not_found` soft miss so callers can
    /// treat "does not exist" as a normal outcome.
    pub(crate) async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Option<Value>, NotionError> {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), path);

        let mut last_err = NotionError::Transport("no attempts made".to_string());
        for attempt in 1..=self.retry.max_attempts {
            match self.send_once(method.clone(), &url, body).await {
                Ok(outcome) => return Ok(outcome),
                Err(err) if is_transient(&err) => {
                    if attempt < self.retry.max_attempts {
                        let delay = self.retry.delay_for(attempt);
                        tracing::warn!(
                            %url,
                            attempt,
                            delay_secs = delay.as_secs(),
                            error = %err,
                            "transient notion failure, backing off"
                        );
                        last_err = err;
                        tokio::time::sleep(delay).await;
                    } else {
                        tracing::warn!(
                            %url,
                            attempt,
                            error = %err,
                            "transient notion failure, giving up"
                        );
                        last_err = err;
                    }
                }
                Err(err) => return Err(err),
            }
        }

        Err(NotionError::RetriesExhausted {
            attempts: self.retry.max_attempts,
            source: Box::new(last_err),
        })
    }

    /// Sends a single request and classifies the response.
    async fn send_once(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
    ) -> Result<Option<Value>, NotionError> {
        let mut req = self
            .client
            .request(method, url)
            .bearer_auth(&self.config.token)
            .header("Notion-Version", &self.config.notion_version);
        if let Some(body) = body {
            req = req.json(body);
        }

        let resp = req.send().await?;
        let status = resp.status();

        if status.is_success() {
            let value = resp
                .json::<Value>()
                .await
                .map_err(|e| NotionError::InvalidResponse(e.to_string()))?;
            return Ok(Some(value));
        }

        let text = resp
            .text()
            .await
            .unwrap_or_else(|_| "unable to read response body".to_string());

        if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
            return Err(NotionError::Server {
                status: status.as_u16(),
                message: text,
            });
        }

        // Remaining 4xx: not retryable. A body coded object_not_found is a
        // soft miss, every other code aborts the call chain.
        let parsed: ApiErrorBody = serde_json::from_str(&text).unwrap_or(ApiErrorBody {
            code: String::new(),
            message: text.clone(),
        });
        if parsed.code == "object_not_found" {
            tracing::debug!(%url, "object not found, treating as soft miss");
            return Ok(None);
        }

        Err(NotionError::Api {
            status: status.as_u16(),
            code: parsed.code,
            message: parsed.message,
        })
    }
}

/// Whether an error is worth retrying.
fn is_transient(err: &NotionError) -> bool {
    matches!(
        err,
        NotionError::Transport(_) | NotionError::Server { .. }
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_classification() {
        assert!(is_transient(&NotionError::Transport("reset".into())));
        assert!(is_transient(&NotionError::Server {
            status: 503,
            message: String::new(),
        }));
        assert!(is_transient(&NotionError::Server {
            status: 429,
            message: String::new(),
        }));
        assert!(!is_transient(&NotionError::Api {
            status: 400,
            code: "validation_error".into(),
            message: String::new(),
        }));
        assert!(!is_transient(&NotionError::InvalidResponse("bad".into())));
    }
}
