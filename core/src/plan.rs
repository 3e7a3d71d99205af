// SPDX-FileCopyrightText: 2026 notisync contributors
//
// SPDX-License-Identifier: Apache-2.0

//! Diffing local items against remote items into a plan of actions.

use std::collections::HashMap;

use notisync_model::UnifiedItem;

/// The set of remote mutations needed to bring Notion into agreement with
/// the local store.
///
/// There is deliberately no delete list: items present remotely but absent
/// locally produce no action.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncPlan {
    /// Items to create, in local source order.
    pub to_create: Vec<UnifiedItem>,

    /// Items to update, in local source order, each carrying the
    /// `remote_id` of the page to mutate.
    pub to_update: Vec<UnifiedItem>,
}

impl SyncPlan {
    /// Whether the plan contains no actions.
    pub fn is_empty(&self) -> bool {
        self.to_create.is_empty() && self.to_update.is_empty()
    }
}

/// Compares remote and local item collections and produces a plan.
///
/// Pure function, no I/O; given the same inputs the plan is always
/// identical, which is what lets a dry-run preview truthfully predict what
/// an apply would do.
///
/// Local items drive the iteration (input order is preserved in the output):
/// an item with no remote counterpart by uid becomes a create; a matched
/// item gets the remote page id copied onto it and becomes an update only
/// when it differs substantively (ignoring `remote_id` and
/// `last_edited_time`).
pub fn build_plan(remote_items: &[UnifiedItem], local_items: &[UnifiedItem]) -> SyncPlan {
    // Last one wins on duplicate uid, which should not occur under correct
    // identity derivation.
    let remote_by_uid: HashMap<&str, &UnifiedItem> = remote_items
        .iter()
        .map(|item| (item.uid(), item))
        .collect();

    let mut plan = SyncPlan::default();
    for local_item in local_items {
        match remote_by_uid.get(local_item.uid()) {
            None => {
                tracing::debug!(
                    title = local_item.title(),
                    uid = local_item.uid(),
                    "plan: create in notion"
                );
                plan.to_create.push(local_item.clone());
            }
            Some(remote_item) => {
                // Copy the page id over so the update knows its target.
                let mut local_item = local_item.clone();
                if let Some(remote_id) = remote_item.remote_id() {
                    local_item.set_remote_id(remote_id.to_string());
                }

                if !local_item.substantive_eq(remote_item) {
                    tracing::debug!(
                        title = local_item.title(),
                        uid = local_item.uid(),
                        "plan: update in notion"
                    );
                    plan.to_update.push(local_item);
                }
            }
        }
    }

    tracing::info!(
        to_create = plan.to_create.len(),
        to_update = plan.to_update.len(),
        "sync plan created"
    );
    plan
}
