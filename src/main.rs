// This file is part of the product RoomGate.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::rt::System;
use actix_web::{App, HttpServer, middleware::Logger, web};
use log::{LevelFilter, info};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use roomgate::api;
use roomgate::app_state::AppState;
use roomgate::assets::AssetCatalog;
use roomgate::config::{ValidatedConfig, load_config};
use roomgate::identity::{FileIdentityCache, HttpUserinfoFetcher};

fn main() {
    let exit_code = run();
    std::process::exit(exit_code);
}

fn run() -> i32 {
    let mut args = std::env::args().skip(1);
    let config_path = match (args.next(), args.next()) {
        (None, _) => PathBuf::from("config.yaml"),
        (Some(path), None) => PathBuf::from(path),
        (Some(_), Some(_)) => {
            eprintln!("❌ Usage: roomgate [config.yaml]");
            return 1;
        }
    };

    let validated_config = match load_config(&config_path).and_then(|raw| raw.validate()) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("❌ Configuration error: {}", error);
            eprintln!("❌ Application cannot start with invalid configuration.");
            return 1;
        }
    };

    init_logger();

    match System::new().block_on(run_server(validated_config)) {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("❌ Server failed to start: {}", error);
            1
        }
    }
}

fn init_logger() {
    env_logger::Builder::from_default_env()
        .filter_level(LevelFilter::Info)
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] {}: {}",
                chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.3f UTC"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}

async fn run_server(validated_config: ValidatedConfig) -> std::io::Result<()> {
    let assets = match AssetCatalog::load(
        &validated_config.woka_file,
        &validated_config.companions_file,
    ) {
        Ok(assets) => Arc::new(assets),
        Err(error) => {
            eprintln!("❌ Failed to load asset catalogs: {}", error);
            return Err(std::io::Error::other(error.to_string()));
        }
    };

    let cache = match FileIdentityCache::new(validated_config.identity_cache_dir.clone()) {
        Ok(cache) => Arc::new(cache),
        Err(error) => {
            eprintln!("❌ Failed to initialize identity cache: {}", error);
            return Err(std::io::Error::other(error.to_string()));
        }
    };

    let fetcher = Arc::new(HttpUserinfoFetcher::new(
        validated_config.userinfo_endpoint.clone(),
    ));

    let app_state = Arc::new(AppState::new(&validated_config, fetcher, cache, assets));
    info!(
        "✅ Room catalog loaded: {} rooms, {} redirects",
        validated_config.maps.len(),
        validated_config.redirects.len()
    );
    info!(
        "✅ Identity cache directory: {}",
        validated_config.identity_cache_dir.display()
    );

    let listen = validated_config.listen;
    let admin_token = validated_config.token.clone();

    info!("Starting server on {}", listen);
    HttpServer::new(move || {
        let admin_token = admin_token.clone();
        App::new()
            .app_data(web::Data::from(app_state.clone()))
            .wrap(Logger::default())
            .configure(move |cfg| api::configure(cfg, &admin_token))
    })
    .bind(listen)?
    .run()
    .await
}
