// This file is part of the product RoomGate.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug)]
pub enum AssetError {
    LoadError(String),
    ParseError(String),
}

impl std::fmt::Display for AssetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetError::LoadError(msg) => write!(f, "Asset catalog load error: {}", msg),
            AssetError::ParseError(msg) => write!(f, "Asset catalog parse error: {}", msg),
        }
    }
}

impl std::error::Error for AssetError {}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WokaPart {
    pub required: bool,
    pub collections: Vec<WokaCollection>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WokaCollection {
    pub name: String,
    pub position: i32,
    pub textures: Vec<WokaTexture>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WokaTexture {
    pub id: String,
    pub name: String,
    pub url: String,
    pub position: i32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CompanionCollection {
    pub name: String,
    pub position: i32,
    pub textures: Vec<CompanionTexture>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CompanionTexture {
    pub id: String,
    pub name: String,
    pub behavior: String,
    pub url: String,
}

pub type WokaDocument = HashMap<String, WokaPart>;
pub type CompanionDocument = Vec<CompanionCollection>;

/// Static avatar and companion texture catalogs, loaded once at startup.
/// The nested documents are served verbatim by the list endpoints; the
/// flattened id → url indexes back the personalization validity checks.
#[derive(Debug)]
pub struct AssetCatalog {
    woka: WokaDocument,
    companions: CompanionDocument,
    woka_index: HashMap<String, String>,
    companion_index: HashMap<String, String>,
}

impl AssetCatalog {
    pub fn load(woka_path: &Path, companions_path: &Path) -> Result<Self, AssetError> {
        let woka: WokaDocument = read_json(woka_path)?;
        let companions: CompanionDocument = read_json(companions_path)?;
        Ok(Self::from_documents(woka, companions))
    }

    pub fn from_documents(woka: WokaDocument, companions: CompanionDocument) -> Self {
        let mut woka_index = HashMap::new();
        for part in woka.values() {
            for collection in &part.collections {
                for texture in &collection.textures {
                    woka_index.insert(texture.id.clone(), texture.url.clone());
                }
            }
        }

        let mut companion_index = HashMap::new();
        for collection in &companions {
            for texture in &collection.textures {
                companion_index.insert(texture.id.clone(), texture.url.clone());
            }
        }

        Self {
            woka,
            companions,
            woka_index,
            companion_index,
        }
    }

    pub fn woka_document(&self) -> &WokaDocument {
        &self.woka
    }

    pub fn companion_document(&self) -> &CompanionDocument {
        &self.companions
    }

    pub fn character_texture_url(&self, id: &str) -> Option<&str> {
        self.woka_index.get(id).map(String::as_str)
    }

    pub fn companion_texture_url(&self, id: &str) -> Option<&str> {
        self.companion_index.get(id).map(String::as_str)
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, AssetError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| AssetError::LoadError(format!("Failed to read {}: {}", path.display(), e)))?;
    serde_json::from_str(&content)
        .map_err(|e| AssetError::ParseError(format!("Failed to parse {}: {}", path.display(), e)))
}
