// This file is part of the product RoomGate.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::assets::AssetCatalog;
use crate::catalog::{CatalogError, RoomCatalog, RoomRecord, RoomResolution, WorldPeer};
use crate::identity::{IdentityError, IdentityResolver, UserIdentity};
use crate::permission::{self, TagDirectory, TagPolicy};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug)]
pub enum AccessError {
    RoomNotFound(String),
    AccessDenied,
    Identity(IdentityError),
}

impl std::fmt::Display for AccessError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccessError::RoomNotFound(uri) => {
                write!(f, "Failed to find matching room: {}", uri)
            }
            AccessError::AccessDenied => write!(f, "You are not in allowed_tags list"),
            AccessError::Identity(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for AccessError {}

impl From<CatalogError> for AccessError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::RoomNotFound(uri) => AccessError::RoomNotFound(uri),
        }
    }
}

impl From<IdentityError> for AccessError {
    fn from(err: IdentityError) -> Self {
        AccessError::Identity(err)
    }
}

/// The permission part of a granted entry.
#[derive(Debug, Clone)]
pub struct AccessDecision {
    pub identity: UserIdentity,
    pub tags: Vec<String>,
    pub can_edit: bool,
}

/// Outcome of an entry check. Redirects and anonymous previews are normal
/// outcomes, distinct from any error.
#[derive(Debug)]
pub enum EntryOutcome {
    Redirect(String),
    Preview(RoomRecord),
    Granted {
        room: RoomRecord,
        decision: AccessDecision,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct TextureEntry {
    pub id: String,
    pub url: String,
}

/// Personalization asset lookups. A miss flips the validity flag and leaves
/// the URL empty; it never fails the request.
#[derive(Debug, Clone)]
pub struct Personalization {
    pub character_textures: Vec<TextureEntry>,
    pub character_textures_valid: bool,
    pub companion_texture: Option<TextureEntry>,
    pub companion_texture_valid: bool,
}

/// Orchestrates room resolution, identity resolution and permission
/// evaluation. Stateless across requests; every invocation is independent.
pub struct AccessCoordinator {
    catalog: Arc<RoomCatalog>,
    resolver: IdentityResolver,
    tags: TagDirectory,
    assets: Arc<AssetCatalog>,
}

impl AccessCoordinator {
    pub fn new(
        catalog: Arc<RoomCatalog>,
        resolver: IdentityResolver,
        tags: TagDirectory,
        assets: Arc<AssetCatalog>,
    ) -> Self {
        Self {
            catalog,
            resolver,
            tags,
            assets,
        }
    }

    /// Entry check for a room. A redirect-table hit returns before any
    /// identity work; with neither identifier nor credential the room is
    /// returned as an anonymous preview.
    pub async fn resolve_entry(
        &self,
        room_uri: &str,
        user_identifier: &str,
        access_token: &str,
    ) -> Result<EntryOutcome, AccessError> {
        let record = match self.catalog.resolve(room_uri)? {
            RoomResolution::Redirect(target) => return Ok(EntryOutcome::Redirect(target)),
            RoomResolution::Room(record) => record,
        };

        if user_identifier.is_empty() && access_token.is_empty() {
            return Ok(EntryOutcome::Preview(record.clone()));
        }

        let identity = self.resolver.resolve(user_identifier, access_token).await?;
        let tags = self.tags.tags_for(&identity.sub);
        let grant = permission::evaluate(
            &TagPolicy {
                allowed: &record.room.allowed_tags,
                editor: &record.room.editor_tags,
            },
            &tags,
        );

        if !grant.access {
            return Err(AccessError::AccessDenied);
        }

        Ok(EntryOutcome::Granted {
            room: record.clone(),
            decision: AccessDecision {
                identity,
                tags,
                can_edit: grant.edit,
            },
        })
    }

    /// All rooms in the same world group as the given room. Legacy redirect
    /// URIs are not rooms and resolve to `RoomNotFound` here.
    pub fn world_peers(&self, room_uri: &str) -> Result<Vec<WorldPeer>, AccessError> {
        let record = self.catalog.room(room_uri)?;
        Ok(self.catalog.rooms_in_world_of(record))
    }

    pub fn personalize(
        &self,
        character_texture_ids: &[String],
        companion_texture_id: Option<&str>,
    ) -> Personalization {
        let mut character_textures_valid = true;
        let character_textures = character_texture_ids
            .iter()
            .map(|id| {
                let url = match self.assets.character_texture_url(id) {
                    Some(url) => url.to_string(),
                    None => {
                        character_textures_valid = false;
                        String::new()
                    }
                };
                TextureEntry {
                    id: id.clone(),
                    url,
                }
            })
            .collect();

        let mut companion_texture_valid = true;
        let companion_texture = companion_texture_id.filter(|id| !id.is_empty()).map(|id| {
            let url = match self.assets.companion_texture_url(id) {
                Some(url) => url.to_string(),
                None => {
                    companion_texture_valid = false;
                    String::new()
                }
            };
            TextureEntry {
                id: id.to_string(),
                url,
            }
        });

        Personalization {
            character_textures,
            character_textures_valid,
            companion_texture,
            companion_texture_valid,
        }
    }
}
