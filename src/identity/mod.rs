// This file is part of the product RoomGate.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

mod cache;
mod resolver;
pub(crate) mod types;

pub use cache::{FileIdentityCache, IdentityCache};
#[cfg(test)]
pub use cache::MemoryIdentityCache;
pub use resolver::{HttpUserinfoFetcher, IdentityResolver, UserinfoFetcher};
pub use types::{IdentityError, UserIdentity};
