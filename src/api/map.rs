// This file is part of the product RoomGate.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::error::{access_error_response, invalid_request};
use crate::access::EntryOutcome;
use crate::app_state::AppState;
use crate::config::RoomConfig;
use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Deserialize)]
pub struct MapQuery {
    #[serde(rename = "playUri", default)]
    play_uri: String,
    #[serde(rename = "userId", default)]
    user_id: String,
    #[serde(rename = "accessToken", default)]
    access_token: String,
}

#[derive(Serialize)]
struct RedirectResponse {
    #[serde(rename = "redirectUrl")]
    redirect_url: String,
}

#[derive(Serialize)]
struct MapResponse<'a> {
    #[serde(flatten)]
    room: &'a RoomConfig,
    #[serde(rename = "authenticationMandatory")]
    authentication_mandatory: bool,
    #[serde(rename = "opidWokaNamePolicy")]
    opid_woka_name_policy: &'static str,
}

/// Room metadata for the entry screen. Without an identifier or token this
/// is an anonymous preview; with either, access is enforced first.
pub async fn get_map(query: web::Query<MapQuery>, state: web::Data<AppState>) -> HttpResponse {
    let play_uri = match Url::parse(&query.play_uri) {
        Ok(parsed) => parsed,
        Err(_) => {
            return invalid_request(format!("playUri is not valid url: {}", query.play_uri));
        }
    };
    let map_id = play_uri.path();

    let outcome = state
        .coordinator
        .resolve_entry(map_id, &query.user_id, &query.access_token)
        .await;

    match outcome {
        Ok(EntryOutcome::Redirect(target)) => HttpResponse::Ok().json(RedirectResponse {
            redirect_url: target,
        }),
        Ok(EntryOutcome::Preview(record)) => HttpResponse::Ok().json(MapResponse {
            room: &record.room,
            authentication_mandatory: true,
            opid_woka_name_policy: "allow_override_opid",
        }),
        Ok(EntryOutcome::Granted { room, .. }) => HttpResponse::Ok().json(MapResponse {
            room: &room.room,
            authentication_mandatory: true,
            opid_woka_name_policy: "allow_override_opid",
        }),
        Err(err) => access_error_response(&err),
    }
}
