// This file is part of the product RoomGate.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use std::sync::Arc;

use crate::access::AccessCoordinator;
use crate::assets::AssetCatalog;
use crate::catalog::RoomCatalog;
use crate::config::ValidatedConfig;
use crate::identity::{IdentityCache, IdentityResolver, UserinfoFetcher};
use crate::permission::TagDirectory;
use uuid::Uuid;

pub struct AppState {
    pub coordinator: AccessCoordinator,
    pub assets: Arc<AssetCatalog>,
    pub uuid_space: Uuid,
}

impl AppState {
    pub fn new(
        config: &ValidatedConfig,
        fetcher: Arc<dyn UserinfoFetcher>,
        cache: Arc<dyn IdentityCache>,
        assets: Arc<AssetCatalog>,
    ) -> Self {
        let catalog = Arc::new(RoomCatalog::new(config));
        let resolver = IdentityResolver::new(fetcher, cache);
        let tags = TagDirectory::new(config.tags.clone());
        let coordinator = AccessCoordinator::new(catalog, resolver, tags, assets.clone());
        Self {
            coordinator,
            assets,
            uuid_space: config.uuid_space,
        }
    }
}
