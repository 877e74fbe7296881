// This file is part of the product RoomGate.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::app_state::AppState;
use actix_web::{HttpResponse, web};

pub async fn woka_list(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.assets.woka_document())
}

pub async fn companion_list(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.assets.companion_document())
}
