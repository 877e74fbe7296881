// This file is part of the product RoomGate.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use uuid::Uuid;

#[derive(Debug)]
pub enum ConfigError {
    LoadError(String),
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::LoadError(msg) => write!(f, "Configuration load error: {}", msg),
            ConfigError::ValidationError(msg) => {
                write!(f, "Configuration validation error: {}", msg)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Per-room entry in the `maps` section of config.yaml.
///
/// The camelCase names are wire names: the room block is echoed verbatim to
/// clients in map responses, while the tag lists stay server-side.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RoomConfig {
    #[serde(rename = "mapUrl", default, skip_serializing_if = "Option::is_none")]
    pub map_url: Option<String>,
    #[serde(rename = "wamUrl", default, skip_serializing_if = "Option::is_none")]
    pub wam_url: Option<String>,
    pub group: String,
    #[serde(rename = "roomName")]
    pub room_name: String,
    #[serde(default, skip_serializing)]
    pub allowed_tags: Vec<String>,
    #[serde(default, skip_serializing)]
    pub editor_tags: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    pub token: String,
    pub uuid_space: Uuid,
    pub userinfo_endpoint: String,
    #[serde(default = "default_listen")]
    pub listen: String,
    #[serde(default = "default_identity_cache_dir")]
    pub identity_cache_dir: PathBuf,
    #[serde(default = "default_woka_file")]
    pub woka_file: PathBuf,
    #[serde(default = "default_companions_file")]
    pub companions_file: PathBuf,
    #[serde(default)]
    pub redirects: HashMap<String, String>,
    #[serde(default)]
    pub maps: HashMap<String, RoomConfig>,
    #[serde(default)]
    pub tags: HashMap<String, Vec<String>>,
}

fn default_listen() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_identity_cache_dir() -> PathBuf {
    PathBuf::from("users")
}

fn default_woka_file() -> PathBuf {
    PathBuf::from("woka.json")
}

fn default_companions_file() -> PathBuf {
    PathBuf::from("companions.json")
}

/// Configuration after validation; the only shape the rest of the
/// application sees. Built once at startup, never mutated.
#[derive(Debug, Clone)]
pub struct ValidatedConfig {
    pub token: String,
    pub uuid_space: Uuid,
    pub userinfo_endpoint: String,
    pub listen: SocketAddr,
    pub identity_cache_dir: PathBuf,
    pub woka_file: PathBuf,
    pub companions_file: PathBuf,
    pub redirects: HashMap<String, String>,
    pub maps: HashMap<String, RoomConfig>,
    pub tags: HashMap<String, Vec<String>>,
}

pub fn load_config(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::LoadError(format!("Failed to read {}: {}", path.display(), e)))?;
    serde_yaml::from_str(&content)
        .map_err(|e| ConfigError::LoadError(format!("Failed to parse {}: {}", path.display(), e)))
}

impl GatewayConfig {
    pub fn validate(self) -> Result<ValidatedConfig, ConfigError> {
        if self.token.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "token must not be empty".to_string(),
            ));
        }

        if !self.userinfo_endpoint.starts_with("http://")
            && !self.userinfo_endpoint.starts_with("https://")
        {
            return Err(ConfigError::ValidationError(format!(
                "userinfo_endpoint is not an http(s) URL: {}",
                self.userinfo_endpoint
            )));
        }

        let listen: SocketAddr = self.listen.parse().map_err(|e| {
            ConfigError::ValidationError(format!(
                "listen address '{}' is invalid: {}",
                self.listen, e
            ))
        })?;

        for (uri, room) in &self.maps {
            if room.group.trim().is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "room '{}' has an empty group",
                    uri
                )));
            }
            if room.room_name.trim().is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "room '{}' has an empty roomName",
                    uri
                )));
            }
        }

        for (from, to) in &self.redirects {
            if to.trim().is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "redirect '{}' has an empty target",
                    from
                )));
            }
        }

        Ok(ValidatedConfig {
            token: self.token,
            uuid_space: self.uuid_space,
            userinfo_endpoint: self.userinfo_endpoint,
            listen,
            identity_cache_dir: self.identity_cache_dir,
            woka_file: self.woka_file,
            companions_file: self.companions_file,
            redirects: self.redirects,
            maps: self.maps,
            tags: self.tags,
        })
    }
}
