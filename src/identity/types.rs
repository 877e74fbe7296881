// This file is part of the product RoomGate.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use serde::{Deserialize, Serialize};

/// A resolved user identity, as returned by the userinfo endpoint.
///
/// `preffered_username` is the identity provider's wire name (sic); the
/// cached per-subject documents use the same shape.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct UserIdentity {
    pub sub: String,
    #[serde(default)]
    pub email: String,
    #[serde(rename = "preffered_username", default)]
    pub preferred_username: String,
}

#[derive(Debug, Clone)]
pub enum IdentityError {
    EmptyCredential,
    SubjectMismatch { expected: String, fetched: String },
    Upstream { status: u16 },
    Transport(String),
    Malformed(String),
    CacheRead(String),
    CacheWrite(String),
}

impl IdentityError {
    /// Status carried by the upstream response, when there was one. Used by
    /// the transport layer to relay identity-provider failures verbatim.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            IdentityError::Upstream { status } => Some(*status),
            _ => None,
        }
    }
}

impl std::fmt::Display for IdentityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IdentityError::EmptyCredential => write!(f, "empty access token"),
            IdentityError::SubjectMismatch { expected, fetched } => write!(
                f,
                "fetched subject '{}' does not match requested subject '{}'",
                fetched, expected
            ),
            IdentityError::Upstream { status } => {
                write!(f, "userinfo request failed: {}", status)
            }
            IdentityError::Transport(msg) => write!(f, "userinfo request failed: {}", msg),
            IdentityError::Malformed(msg) => {
                write!(f, "userinfo response is not valid: {}", msg)
            }
            IdentityError::CacheRead(msg) => write!(f, "identity cache read failed: {}", msg),
            IdentityError::CacheWrite(msg) => write!(f, "identity cache write failed: {}", msg),
        }
    }
}

impl std::error::Error for IdentityError {}
