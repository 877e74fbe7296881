// This file is part of the product RoomGate.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

#![allow(dead_code)]

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::header;
use actix_web::test::TestRequest;
use actix_web::{App, web};
use async_trait::async_trait;
use roomgate::api;
use roomgate::app_state::AppState;
use roomgate::assets::AssetCatalog;
use roomgate::config::{GatewayConfig, ValidatedConfig};
use roomgate::identity::{
    FileIdentityCache, IdentityCache, IdentityError, UserIdentity, UserinfoFetcher,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

pub const ADMIN_TOKEN: &str = "test-admin-token";
pub const UUID_SPACE: &str = "4ba1d9e2-3a11-4ab0-8a4e-0f7b0a6a6f01";

/// How the fake userinfo endpoint behaves for the duration of a test.
pub enum FetchScript {
    Succeed(UserIdentity),
    FailStatus(u16),
    FailTransport,
    /// For flows that must never contact the identity endpoint.
    Unreachable,
}

pub struct ScriptedFetcher {
    script: FetchScript,
    calls: AtomicUsize,
}

impl ScriptedFetcher {
    pub fn new(script: FetchScript) -> Self {
        Self {
            script,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserinfoFetcher for ScriptedFetcher {
    async fn fetch(&self, _credential: &str) -> Result<UserIdentity, IdentityError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.script {
            FetchScript::Succeed(identity) => Ok(identity.clone()),
            FetchScript::FailStatus(status) => Err(IdentityError::Upstream { status: *status }),
            FetchScript::FailTransport => Err(IdentityError::Transport(
                "connection refused".to_string(),
            )),
            FetchScript::Unreachable => panic!("identity endpoint must not be contacted"),
        }
    }
}

pub fn identity(sub: &str) -> UserIdentity {
    UserIdentity {
        sub: sub.to_string(),
        email: format!("{}@example.com", sub),
        preferred_username: format!("{}-name", sub),
    }
}

pub struct TestHarness {
    pub fixture: tempfile::TempDir,
    pub config: ValidatedConfig,
    pub app_state: Arc<AppState>,
    pub fetcher: Arc<ScriptedFetcher>,
    pub cache_dir: PathBuf,
}

fn config_yaml() -> String {
    format!(
        r#"
token: "{token}"
uuid_space: "{space}"
userinfo_endpoint: "https://idp.example.com/userinfo"
redirects:
  /baz: /baz2
maps:
  /foo:
    mapUrl: "https://maps.example.com/foo.json"
    group: "g1"
    roomName: "Foo"
  /bar:
    wamUrl: "https://maps.example.com/bar.wam"
    group: "g1"
    roomName: "Bar"
    allowed_tags:
      - vip
  /baz2:
    group: "g2"
    roomName: "Baz Two"
tags:
  staff-user:
    - staff
  vip-user:
    - vip
"#,
        token = ADMIN_TOKEN,
        space = UUID_SPACE
    )
}

fn sample_woka_json() -> &'static str {
    r#"{
        "body": {
            "required": true,
            "collections": [
                {
                    "name": "default",
                    "position": 0,
                    "textures": [
                        {"id": "body-1", "name": "Body 1", "url": "https://cdn.example.com/body-1.png", "position": 0}
                    ]
                }
            ]
        }
    }"#
}

fn sample_companions_json() -> &'static str {
    r#"[
        {
            "name": "pets",
            "position": 0,
            "textures": [
                {"id": "dog-1", "name": "Dog", "behavior": "dog", "url": "https://cdn.example.com/dog-1.png"}
            ]
        }
    ]"#
}

impl TestHarness {
    pub fn new(script: FetchScript) -> Self {
        let fixture = tempfile::tempdir().expect("fixture root");
        let cache_dir = fixture.path().join("users");

        let raw: GatewayConfig = serde_yaml::from_str(&config_yaml()).expect("parse test config");
        let mut config = raw.validate().expect("validate test config");
        config.identity_cache_dir = cache_dir.clone();

        let woka = serde_json::from_str(sample_woka_json()).expect("woka json");
        let companions = serde_json::from_str(sample_companions_json()).expect("companions json");
        let assets = Arc::new(AssetCatalog::from_documents(woka, companions));

        let cache = Arc::new(FileIdentityCache::new(cache_dir.clone()).expect("identity cache"));
        let fetcher = Arc::new(ScriptedFetcher::new(script));

        let app_state = Arc::new(AppState::new(
            &config,
            fetcher.clone(),
            cache,
            assets,
        ));

        Self {
            fixture,
            config,
            app_state,
            fetcher,
            cache_dir,
        }
    }

    /// Pre-populate the identity cache as if the subject was seen before.
    pub fn seed_cache(&self, identity: &UserIdentity) {
        let cache = FileIdentityCache::new(self.cache_dir.clone()).expect("identity cache");
        cache.put(identity).expect("seed cache entry");
    }

    pub fn cache_entry_path(&self, sub: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", sub))
    }
}

pub fn build_test_app(
    state: Arc<AppState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::from(state))
        .configure(|cfg| api::configure(cfg, ADMIN_TOKEN))
}

pub fn authorized(req: TestRequest) -> TestRequest {
    req.insert_header((header::AUTHORIZATION, ADMIN_TOKEN))
}
