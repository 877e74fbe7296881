// This file is part of the product RoomGate.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::config::{RoomConfig, ValidatedConfig};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub enum CatalogError {
    RoomNotFound(String),
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::RoomNotFound(uri) => {
                write!(f, "Failed to find matching room: {}", uri)
            }
        }
    }
}

impl std::error::Error for CatalogError {}

#[derive(Debug, Clone)]
pub struct RoomRecord {
    pub uri: String,
    pub room: RoomConfig,
}

/// Outcome of a room URI resolution. A redirect hit short-circuits: no room
/// record exists for the legacy URI and none is consulted.
#[derive(Debug)]
pub enum RoomResolution<'a> {
    Redirect(String),
    Room(&'a RoomRecord),
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WorldPeer {
    #[serde(rename = "roomUrl")]
    pub room_url: String,
    #[serde(rename = "wamUrl")]
    pub wam_url: String,
    pub name: String,
}

/// Static room directory. Rooms, redirects and the world-group index are
/// built once from the validated configuration and are read-only afterwards.
pub struct RoomCatalog {
    rooms: HashMap<String, RoomRecord>,
    redirects: HashMap<String, String>,
    groups: HashMap<String, Vec<String>>,
}

impl RoomCatalog {
    pub fn new(config: &ValidatedConfig) -> Self {
        let mut rooms = HashMap::with_capacity(config.maps.len());
        let mut groups: HashMap<String, Vec<String>> = HashMap::new();

        // Index in sorted URI order so peer listings are deterministic.
        let mut uris: Vec<&String> = config.maps.keys().collect();
        uris.sort();
        for uri in uris {
            let room = config.maps[uri].clone();
            groups
                .entry(room.group.clone())
                .or_default()
                .push(uri.clone());
            rooms.insert(
                uri.clone(),
                RoomRecord {
                    uri: uri.clone(),
                    room,
                },
            );
        }

        Self {
            rooms,
            redirects: config.redirects.clone(),
            groups,
        }
    }

    /// Resolve a room URI. The redirect table wins over the room map; a miss
    /// in both is `RoomNotFound` naming the requested URI.
    pub fn resolve(&self, uri: &str) -> Result<RoomResolution<'_>, CatalogError> {
        if let Some(target) = self.redirects.get(uri) {
            return Ok(RoomResolution::Redirect(target.clone()));
        }
        match self.rooms.get(uri) {
            Some(record) => Ok(RoomResolution::Room(record)),
            None => Err(CatalogError::RoomNotFound(uri.to_string())),
        }
    }

    /// Direct room-map lookup, bypassing the redirect table. Legacy URIs are
    /// not rooms and resolve to `RoomNotFound` here.
    pub fn room(&self, uri: &str) -> Result<&RoomRecord, CatalogError> {
        self.rooms
            .get(uri)
            .ok_or_else(|| CatalogError::RoomNotFound(uri.to_string()))
    }

    /// All rooms sharing the record's world group, the record itself
    /// included.
    pub fn rooms_in_world_of(&self, record: &RoomRecord) -> Vec<WorldPeer> {
        let members = match self.groups.get(&record.room.group) {
            Some(members) => members,
            None => return Vec::new(),
        };
        members
            .iter()
            .filter_map(|uri| self.rooms.get(uri))
            .map(|peer| WorldPeer {
                room_url: peer.uri.clone(),
                wam_url: peer.room.wam_url.clone().unwrap_or_default(),
                name: peer.room.room_name.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GatewayConfig;

    fn catalog() -> RoomCatalog {
        let yaml = r#"
token: "secret"
uuid_space: "4ba1d9e2-3a11-4ab0-8a4e-0f7b0a6a6f01"
userinfo_endpoint: "https://idp.example.com/userinfo"
redirects:
  /old-lobby: /lobby
maps:
  /lobby:
    group: "hq"
    roomName: "Lobby"
    wamUrl: "https://maps.example.com/lobby.wam"
  /office:
    group: "hq"
    roomName: "Office"
  /vault:
    group: "secure"
    roomName: "Vault"
    allowed_tags: [vip]
"#;
        let raw: GatewayConfig = serde_yaml::from_str(yaml).expect("parse config");
        RoomCatalog::new(&raw.validate().expect("validate config"))
    }

    #[test]
    fn redirect_wins_over_room_map() {
        let catalog = catalog();
        match catalog.resolve("/old-lobby").expect("resolve") {
            RoomResolution::Redirect(target) => assert_eq!(target, "/lobby"),
            RoomResolution::Room(record) => panic!("unexpected room: {}", record.uri),
        }
    }

    #[test]
    fn resolves_known_room() {
        let catalog = catalog();
        match catalog.resolve("/vault").expect("resolve") {
            RoomResolution::Room(record) => {
                assert_eq!(record.room.group, "secure");
                assert_eq!(record.room.allowed_tags, vec!["vip".to_string()]);
            }
            RoomResolution::Redirect(target) => panic!("unexpected redirect: {}", target),
        }
    }

    #[test]
    fn unknown_uri_is_room_not_found() {
        let catalog = catalog();
        let err = catalog.resolve("/nowhere").expect_err("must fail");
        assert!(matches!(err, CatalogError::RoomNotFound(uri) if uri == "/nowhere"));
    }

    #[test]
    fn legacy_uri_is_not_a_room() {
        let catalog = catalog();
        assert!(catalog.room("/old-lobby").is_err());
    }

    #[test]
    fn world_peers_include_queried_room() {
        let catalog = catalog();
        let lobby = catalog.room("/lobby").expect("lobby");
        let peers = catalog.rooms_in_world_of(lobby);
        let urls: Vec<&str> = peers.iter().map(|p| p.room_url.as_str()).collect();
        assert_eq!(urls, vec!["/lobby", "/office"]);
        assert_eq!(peers[0].wam_url, "https://maps.example.com/lobby.wam");
        assert_eq!(peers[1].wam_url, "");
        assert_eq!(peers[1].name, "Office");
    }

    #[test]
    fn world_peers_same_regardless_of_queried_member() {
        let catalog = catalog();
        let from_lobby = catalog.rooms_in_world_of(catalog.room("/lobby").unwrap());
        let from_office = catalog.rooms_in_world_of(catalog.room("/office").unwrap());
        assert_eq!(from_lobby, from_office);
    }

    #[test]
    fn singleton_group_contains_only_itself() {
        let catalog = catalog();
        let vault = catalog.room("/vault").expect("vault");
        let peers = catalog.rooms_in_world_of(vault);
        assert_eq!(peers.len(), 1);
        assert_eq!(peers[0].room_url, "/vault");
    }
}
