// SPDX-FileCopyrightText: 2026 notisync contributors
//
// SPDX-License-Identifier: Apache-2.0

//! Sync engine core: local store, diff/plan computation, and orchestration.
//!
//! One sync run reads the local JSON store, queries the events and tasks
//! databases, computes a [`SyncPlan`] of create/update actions, and applies
//! it sequentially. The run is stateless: nothing is cached between runs, so
//! every invocation recomputes the plan from scratch and stays idempotent.

#![warn(
    trivial_casts,
    trivial_numeric_casts,
    missing_debug_implementations,
    missing_docs,
    unsafe_code,
    unused_import_braces,
    unused_qualifications
)]

mod engine;
mod plan;
mod scheduler;
mod setup;
mod source;
mod store;

pub use crate::engine::{EngineError, SyncEngine, SyncOptions, SyncReport};
pub use crate::plan::{SyncPlan, build_plan};
pub use crate::scheduler::{SchedulerStatus, SyncScheduler};
pub use crate::setup::{SetupOutcome, ensure_databases};
pub use crate::source::{CalendarSource, import_events};
pub use crate::store::{LocalStore, StoreError};
