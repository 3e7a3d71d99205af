// SPDX-FileCopyrightText: 2026 notisync contributors
//
// SPDX-License-Identifier: Apache-2.0

use sha2::{Digest, Sha256};

/// Generates a stable identifier from an ordered list of defining fields.
///
/// The parts are joined with `|` and hashed, so two items with identical
/// defining content always produce the same uid. Volatile fields (the Notion
/// page id, last-edited timestamps) must never be passed in here.
pub fn generate_uid(parts: &[&str]) -> String {
    let key = parts.join("|");
    let digest = Sha256::digest(key.as_bytes());
    let mut out = String::with_capacity(digest.len() * 2);
    for byte in digest {
        use std::fmt::Write;
        // Writing to a String cannot fail.
        let _ = write!(out, "{byte:02x}");
    }
    out
}
