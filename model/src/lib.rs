// SPDX-FileCopyrightText: 2026 notisync contributors
//
// SPDX-License-Identifier: Apache-2.0

//! Unified item model shared by the local store and the Notion client.
//!
//! An item is either a calendar [`Event`] or a [`Task`]. Both carry a
//! content-derived `uid` that serves as the join key between the local JSON
//! store and the backing Notion page, surviving round-trips and edits to
//! volatile fields.

#![warn(
    trivial_casts,
    trivial_numeric_casts,
    missing_debug_implementations,
    missing_docs,
    unsafe_code,
    unused_import_braces,
    unused_qualifications
)]

mod datetime;
mod item;
mod uid;

pub use crate::datetime::parse_time_flexible;
pub use crate::item::{
    Event, EventRecord, ItemKind, ModelError, Priority, Record, Task, TaskRecord, UnifiedItem,
};
pub use crate::uid::generate_uid;
