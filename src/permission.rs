// This file is part of the product RoomGate.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use std::collections::HashMap;

/// Tags assigned to subjects with no explicit entry in the tag directory.
pub const DEFAULT_TAGS: [&str; 2] = ["everyone", "default"];

/// Static subject → tag assignment from configuration. The default sentinel
/// substitution happens here, at the lookup boundary, never inside policy
/// evaluation.
pub struct TagDirectory {
    assignments: HashMap<String, Vec<String>>,
}

impl TagDirectory {
    pub fn new(assignments: HashMap<String, Vec<String>>) -> Self {
        Self { assignments }
    }

    pub fn tags_for(&self, sub: &str) -> Vec<String> {
        match self.assignments.get(sub) {
            Some(tags) => tags.clone(),
            None => DEFAULT_TAGS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

/// A room's two independent tag lists. Empty allow-list means open to
/// everyone; empty edit-list means everyone may edit.
pub struct TagPolicy<'a> {
    pub allowed: &'a [String],
    pub editor: &'a [String],
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PermissionGrant {
    pub access: bool,
    pub edit: bool,
}

/// Pure policy evaluation over in-memory data; no I/O, no error cases.
///
/// An edit-list match grants access as well, even when the allow-list would
/// deny: editors bypass the allow-list. This is deliberate policy, covered
/// by its own test.
pub fn evaluate(policy: &TagPolicy<'_>, tags: &[String]) -> PermissionGrant {
    let mut access = false;
    let mut edit = false;

    if policy.editor.is_empty() {
        edit = true;
    } else if policy.editor.iter().any(|e| tags.contains(e)) {
        edit = true;
        access = true;
    }

    if policy.allowed.is_empty() {
        access = true;
    } else if !access {
        access = policy.allowed.iter().any(|a| tags.contains(a));
    }

    PermissionGrant { access, edit }
}
