// This file is part of the product RoomGate.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::{HttpResponse, web};
use std::collections::BTreeMap;

mod auth;
pub mod error;
mod map;
mod room;
mod textures;

pub use auth::AdminTokenGuard;

pub fn configure(cfg: &mut web::ServiceConfig, admin_token: &str) {
    cfg.service(
        web::scope("/api")
            .route("/capabilities", web::get().to(capabilities))
            .service(
                web::scope("")
                    .wrap(AdminTokenGuard::new(admin_token.to_string()))
                    .route("/map", web::get().to(map::get_map))
                    .route("/room/access", web::get().to(room::get_access))
                    .route("/room/sameWorld", web::get().to(room::get_same_world))
                    .route("/woka/list", web::get().to(textures::woka_list))
                    .route("/companion/list", web::get().to(textures::companion_list)),
            ),
    );
}

async fn capabilities() -> HttpResponse {
    let mut versions = BTreeMap::new();
    versions.insert("api/companion/list", "v1");
    versions.insert("api/woka/list", "v1");
    HttpResponse::Ok().json(versions)
}
