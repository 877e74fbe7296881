// This file is part of the product RoomGate.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::types::{IdentityError, UserIdentity};
use std::io::Write;
use std::path::{Path, PathBuf};

#[cfg(test)]
use std::collections::HashMap;
#[cfg(test)]
use std::sync::{Arc, RwLock};

/// Durable per-subject identity storage. `get` distinguishes an absent entry
/// (`Ok(None)`) from an unreadable one (`Err`); `put` overwrites, last write
/// wins.
pub trait IdentityCache: Send + Sync {
    fn get(&self, sub: &str) -> Result<Option<UserIdentity>, IdentityError>;
    fn put(&self, identity: &UserIdentity) -> Result<(), IdentityError>;
}

pub struct FileIdentityCache {
    dir: PathBuf,
}

impl FileIdentityCache {
    pub fn new(dir: PathBuf) -> Result<Self, IdentityError> {
        if dir.as_os_str().is_empty() {
            return Err(IdentityError::CacheRead(
                "Identity cache directory path is empty".to_string(),
            ));
        }
        std::fs::create_dir_all(&dir).map_err(|e| {
            IdentityError::CacheWrite(format!(
                "Failed to create identity cache directory {}: {}",
                dir.display(),
                e
            ))
        })?;
        Ok(Self { dir })
    }

    // Subjects become file names; anything outside this charset never
    // touches the filesystem.
    fn entry_path(&self, sub: &str) -> Result<PathBuf, IdentityError> {
        if sub.is_empty() {
            return Err(IdentityError::CacheRead(
                "Subject identifier is empty".to_string(),
            ));
        }
        if !sub
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '@' | '-'))
        {
            return Err(IdentityError::CacheRead(format!(
                "Subject identifier '{}' contains invalid characters",
                sub
            )));
        }
        Ok(self.dir.join(format!("{}.json", sub)))
    }

    fn write_entry(&self, path: &Path, content: &str) -> Result<(), IdentityError> {
        let file_name = path
            .file_name()
            .ok_or_else(|| IdentityError::CacheWrite("Cache path has no file name".to_string()))?;
        let (mut file, temp_path) = create_temp_file(&self.dir, file_name)?;

        if let Err(err) = file.write_all(content.as_bytes()) {
            let _ = std::fs::remove_file(&temp_path);
            return Err(IdentityError::CacheWrite(format!(
                "Failed to write identity temp file: {}",
                err
            )));
        }
        if let Err(err) = file.sync_all() {
            let _ = std::fs::remove_file(&temp_path);
            return Err(IdentityError::CacheWrite(format!(
                "Failed to sync identity temp file: {}",
                err
            )));
        }

        if let Err(err) = std::fs::rename(&temp_path, path) {
            let _ = std::fs::remove_file(&temp_path);
            return Err(IdentityError::CacheWrite(format!(
                "Failed to replace identity cache entry: {}",
                err
            )));
        }

        Ok(())
    }
}

fn create_temp_file(
    dir: &Path,
    file_name: &std::ffi::OsStr,
) -> Result<(std::fs::File, PathBuf), IdentityError> {
    use std::fs::OpenOptions;
    const MAX_ATTEMPTS: u32 = 100;
    let base = file_name.to_string_lossy();
    for attempt in 0..MAX_ATTEMPTS {
        let candidate = dir.join(format!(".{}.tmp.{}.{}", base, std::process::id(), attempt));
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&candidate)
        {
            Ok(file) => return Ok((file, candidate)),
            Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => continue,
            Err(err) => {
                return Err(IdentityError::CacheWrite(format!(
                    "Failed to create identity temp file: {}",
                    err
                )));
            }
        }
    }
    Err(IdentityError::CacheWrite(
        "Failed to create identity temp file after repeated attempts".to_string(),
    ))
}

impl IdentityCache for FileIdentityCache {
    fn get(&self, sub: &str) -> Result<Option<UserIdentity>, IdentityError> {
        let path = self.entry_path(sub)?;
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(IdentityError::CacheRead(format!(
                    "Failed to read identity cache entry {}: {}",
                    path.display(),
                    err
                )));
            }
        };
        let identity: UserIdentity = serde_json::from_str(&content).map_err(|e| {
            IdentityError::CacheRead(format!(
                "Identity cache entry {} is corrupt: {}",
                path.display(),
                e
            ))
        })?;
        Ok(Some(identity))
    }

    fn put(&self, identity: &UserIdentity) -> Result<(), IdentityError> {
        let path = self.entry_path(&identity.sub).map_err(|err| match err {
            IdentityError::CacheRead(msg) => IdentityError::CacheWrite(msg),
            other => other,
        })?;
        let content = serde_json::to_string(identity).map_err(|e| {
            IdentityError::CacheWrite(format!("Failed to serialize identity: {}", e))
        })?;
        self.write_entry(&path, &content)
    }
}

#[cfg(test)]
pub struct MemoryIdentityCache {
    entries: Arc<RwLock<HashMap<String, UserIdentity>>>,
}

#[cfg(test)]
impl MemoryIdentityCache {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn with_entry(identity: UserIdentity) -> Self {
        let cache = Self::new();
        cache
            .entries
            .write()
            .expect("cache lock")
            .insert(identity.sub.clone(), identity);
        cache
    }

    pub fn len(&self) -> usize {
        self.entries.read().expect("cache lock").len()
    }
}

#[cfg(test)]
impl IdentityCache for MemoryIdentityCache {
    fn get(&self, sub: &str) -> Result<Option<UserIdentity>, IdentityError> {
        Ok(self.entries.read().expect("cache lock").get(sub).cloned())
    }

    fn put(&self, identity: &UserIdentity) -> Result<(), IdentityError> {
        self.entries
            .write()
            .expect("cache lock")
            .insert(identity.sub.clone(), identity.clone());
        Ok(())
    }
}
