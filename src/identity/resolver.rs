// This file is part of the product RoomGate.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::cache::IdentityCache;
use super::types::{IdentityError, UserIdentity};
use async_trait::async_trait;
use log::{info, warn};
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use std::time::Duration;

const UPSTREAM_TIMEOUT_SECS: u64 = 10;

/// Upstream identity endpoint. One attempt per resolution, no retry.
#[async_trait]
pub trait UserinfoFetcher: Send + Sync {
    async fn fetch(&self, credential: &str) -> Result<UserIdentity, IdentityError>;
}

pub struct HttpUserinfoFetcher {
    client: Client,
    endpoint: String,
}

impl HttpUserinfoFetcher {
    pub fn new(endpoint: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(UPSTREAM_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();
        Self { client, endpoint }
    }
}

#[async_trait]
impl UserinfoFetcher for HttpUserinfoFetcher {
    async fn fetch(&self, credential: &str) -> Result<UserIdentity, IdentityError> {
        let response = self
            .client
            .get(&self.endpoint)
            .bearer_auth(credential)
            .send()
            .await
            .map_err(|e| IdentityError::Transport(e.to_string()))?;

        if response.status() != StatusCode::OK {
            return Err(IdentityError::Upstream {
                status: response.status().as_u16(),
            });
        }

        response
            .json::<UserIdentity>()
            .await
            .map_err(|e| IdentityError::Malformed(e.to_string()))
    }
}

/// Resolves an identity from the upstream endpoint, falling back to the
/// local per-subject cache when the upstream is unavailable. The cache is a
/// degraded-mode fallback: a cache miss surfaces the original fetch failure,
/// never a not-found of its own.
pub struct IdentityResolver {
    fetcher: Arc<dyn UserinfoFetcher>,
    cache: Arc<dyn IdentityCache>,
}

impl IdentityResolver {
    pub fn new(fetcher: Arc<dyn UserinfoFetcher>, cache: Arc<dyn IdentityCache>) -> Self {
        Self { fetcher, cache }
    }

    pub async fn resolve(
        &self,
        subject_hint: &str,
        credential: &str,
    ) -> Result<UserIdentity, IdentityError> {
        let fetch_failure = if credential.is_empty() {
            IdentityError::EmptyCredential
        } else {
            match self.fetcher.fetch(credential).await {
                Ok(fetched) => {
                    if !subject_hint.is_empty() && fetched.sub != subject_hint {
                        // Security check: a credential must never be attached
                        // to a different subject. No cache write happens.
                        return Err(IdentityError::SubjectMismatch {
                            expected: subject_hint.to_string(),
                            fetched: fetched.sub,
                        });
                    }
                    if let Err(err) = self.cache.put(&fetched) {
                        warn!("Identity cache write failed for {}: {}", fetched.sub, err);
                    }
                    return Ok(fetched);
                }
                Err(err) => err,
            }
        };

        if subject_hint.is_empty() {
            return Err(fetch_failure);
        }

        match self.cache.get(subject_hint)? {
            Some(identity) => {
                info!(
                    "Serving cached identity for {} ({})",
                    subject_hint, fetch_failure
                );
                Ok(identity)
            }
            None => Err(fetch_failure),
        }
    }
}
