// SPDX-FileCopyrightText: 2026 notisync contributors
//
// SPDX-License-Identifier: Apache-2.0

//! Notion API client for the sync engine.
//!
//! Wraps the versioned JSON API with bearer authentication, automatic
//! pagination, retry with exponential backoff, and 4xx/5xx/rate-limit error
//! classification, plus the property mapper that translates between
//! [`notisync_model::UnifiedItem`] and Notion page properties.

#![warn(
    trivial_casts,
    trivial_numeric_casts,
    missing_debug_implementations,
    missing_docs,
    unsafe_code,
    unused_import_braces,
    unused_qualifications
)]

mod client;
mod config;
mod error;
mod http;
mod mapper;
mod property;
mod retry;
mod schema;

pub use crate::client::NotionClient;
pub use crate::config::NotionConfig;
pub use crate::error::NotionError;
pub use crate::mapper::{from_page, to_properties};
pub use crate::retry::RetryPolicy;
pub use crate::schema::{
    PropertySpec, SchemaError, SelectOption, build_create_database_payload,
    build_update_database_payload, calendar_schema, status_property_update, tasks_schema,
    validate_page_payload,
};
