// SPDX-FileCopyrightText: 2026 notisync contributors
//
// SPDX-License-Identifier: Apache-2.0

//! High-level Notion API operations used by the sync engine.

use reqwest::Method;
use serde_json::{Value, json};

use notisync_model::{ItemKind, UnifiedItem};

use crate::config::NotionConfig;
use crate::error::NotionError;
use crate::http::HttpClient;
use crate::mapper;
use crate::retry::RetryPolicy;
use crate::schema::validate_page_payload;

/// Results under this page size come back in one response; the API caps a
/// single page of results at 100.
const PAGE_SIZE: u32 = 100;

/// Client for the Notion API.
///
/// All list/query operations auto-paginate: the cursor loop lives here and
/// callers always receive the full result set.
///
/// # Example
///
/// ```ignore
/// use notisync_notion::{NotionClient, NotionConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = NotionConfig {
///     token: "secret_...".to_string(),
///     ..Default::default()
/// };
/// let client = NotionClient::new(config)?;
/// let items = client.query_as_items("db-id").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct NotionClient {
    http: HttpClient,
}

impl NotionClient {
    /// Creates a client with the default retry policy.
    ///
    /// # Errors
    ///
    /// Returns an error if HTTP client initialization fails.
    pub fn new(config: NotionConfig) -> Result<Self, NotionError> {
        Self::with_retry(config, RetryPolicy::default())
    }

    /// Creates a client with an explicit retry policy (tests inject a
    /// zero-delay policy here).
    ///
    /// # Errors
    ///
    /// Returns an error if HTTP client initialization fails.
    pub fn with_retry(config: NotionConfig, retry: RetryPolicy) -> Result<Self, NotionError> {
        let http = HttpClient::new(config, retry)?;
        Ok(Self { http })
    }

    /// Retrieves a database object, or `None` when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error on any rejection other than "not found".
    pub async fn get_database(&self, database_id: &str) -> Result<Option<Value>, NotionError> {
        tracing::info!(database_id, "retrieving database");
        self.http
            .request(Method::GET, &format!("/databases/{database_id}"), None)
            .await
    }

    /// Creates a new database from a prebuilt payload.
    ///
    /// # Errors
    ///
    /// Returns an error if the request is rejected.
    pub async fn create_database(&self, payload: &Value) -> Result<Value, NotionError> {
        tracing::info!("creating new database");
        self.http
            .request(Method::POST, "/databases", Some(payload))
            .await?
            .ok_or_else(|| {
                NotionError::InvalidResponse("database create returned not-found".to_string())
            })
    }

    /// Updates an existing database's properties.
    ///
    /// # Errors
    ///
    /// Returns an error if the database does not exist or the request is
    /// rejected.
    pub async fn update_database(
        &self,
        database_id: &str,
        payload: &Value,
    ) -> Result<Value, NotionError> {
        tracing::info!(database_id, "updating database");
        self.http
            .request(
                Method::PATCH,
                &format!("/databases/{database_id}"),
                Some(payload),
            )
            .await?
            .ok_or_else(|| {
                NotionError::InvalidResponse("database update returned not-found".to_string())
            })
    }

    /// Lists all databases the integration can access, via the paginated
    /// search endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if any page of the search fails.
    pub async fn list_databases(&self) -> Result<Vec<Value>, NotionError> {
        let payload = json!({
            "filter": { "value": "database", "property": "object" },
            "page_size": PAGE_SIZE,
        });
        let results = self.paginate("/search", payload).await?;
        tracing::info!(count = results.len(), "found accessible databases");
        Ok(results)
    }

    /// Queries a database, following the continuation cursor until all pages
    /// are collected.
    ///
    /// # Errors
    ///
    /// Returns an error if any page of the query fails.
    pub async fn query_database(
        &self,
        database_id: &str,
        filter: Option<&Value>,
    ) -> Result<Vec<Value>, NotionError> {
        let mut payload = json!({ "page_size": PAGE_SIZE });
        if let Some(filter) = filter {
            payload["filter"] = filter.clone();
        }

        let results = self
            .paginate(&format!("/databases/{database_id}/query"), payload)
            .await?;
        tracing::info!(database_id, pages = results.len(), "queried database");
        Ok(results)
    }

    /// Queries a database and maps every page to a unified item.
    ///
    /// Pages that cannot be mapped (no UID property, malformed required
    /// fields) are dropped; they are unrepresentable on the local side.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying query fails.
    pub async fn query_as_items(&self, database_id: &str) -> Result<Vec<UnifiedItem>, NotionError> {
        let pages = self.query_database(database_id, None).await?;
        let total = pages.len();

        let items: Vec<UnifiedItem> = pages.iter().filter_map(mapper::from_page).collect();
        if items.len() < total {
            tracing::warn!(
                database_id,
                dropped = total - items.len(),
                "skipped pages that could not be mapped to items"
            );
        }
        Ok(items)
    }

    /// Creates a page for an item in the given database.
    ///
    /// The payload is validated locally first; a validation failure aborts
    /// with no network request.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a malformed payload, or an API error if
    /// the create is rejected.
    pub async fn create_page(
        &self,
        parent_db_id: &str,
        item: &UnifiedItem,
    ) -> Result<Option<Value>, NotionError> {
        let icon = match item.kind() {
            ItemKind::Event => "📅",
            ItemKind::Task => "✅",
        };
        let payload = json!({
            "parent": { "database_id": parent_db_id },
            "properties": mapper::to_properties(item),
            "icon": { "type": "emoji", "emoji": icon },
        });

        tracing::info!(title = item.title(), parent_db_id, "creating page");
        self.create_page_raw(&payload, item.kind()).await
    }

    /// Creates a page from a prebuilt payload.
    ///
    /// The payload is validated against the variant's schema before anything
    /// is sent; a validation failure aborts with no network request.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a malformed payload, or an API error if
    /// the create is rejected.
    pub async fn create_page_raw(
        &self,
        payload: &Value,
        kind: ItemKind,
    ) -> Result<Option<Value>, NotionError> {
        validate_page_payload(payload, kind)?;
        self.http.request(Method::POST, "/pages", Some(payload)).await
    }

    /// Updates an existing page's properties from an item.
    ///
    /// The payload is validated locally first; a validation failure aborts
    /// with no network request.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a malformed payload, or an API error if
    /// the update is rejected.
    pub async fn update_page(
        &self,
        page_id: &str,
        item: &UnifiedItem,
    ) -> Result<Option<Value>, NotionError> {
        let properties = Value::Object(mapper::to_properties(item));

        // The validator expects a full page payload; updates do not carry a
        // parent, so check against a synthetic one.
        let for_validation = json!({
            "parent": { "database_id": "validation-only" },
            "properties": properties,
        });
        validate_page_payload(&for_validation, item.kind())?;

        let payload = json!({ "properties": properties });
        tracing::info!(title = item.title(), page_id, "updating page");
        self.http
            .request(Method::PATCH, &format!("/pages/{page_id}"), Some(&payload))
            .await
    }

    /// Repeats a list request with the continuation cursor until `has_more`
    /// is false, concatenating every page of results.
    async fn paginate(&self, path: &str, mut payload: Value) -> Result<Vec<Value>, NotionError> {
        let mut results = Vec::new();
        loop {
            let response = self
                .http
                .request(Method::POST, path, Some(&payload))
                .await?
                .ok_or_else(|| {
                    NotionError::InvalidResponse(format!("list endpoint {path} returned not-found"))
                })?;

            if let Some(page) = response.get("results").and_then(Value::as_array) {
                results.extend(page.iter().cloned());
            }

            let has_more = response
                .get("has_more")
                .and_then(Value::as_bool)
                .unwrap_or(false);
            if !has_more {
                return Ok(results);
            }

            let cursor = response
                .get("next_cursor")
                .and_then(Value::as_str)
                .ok_or_else(|| {
                    NotionError::InvalidResponse(
                        "has_more set without a next_cursor".to_string(),
                    )
                })?;
            payload["start_cursor"] = json!(cursor);
        }
    }
}
