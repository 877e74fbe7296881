// This file is part of the product RoomGate.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::error::{access_error_response, error_response, invalid_request};
use crate::access::{EntryOutcome, TextureEntry};
use crate::app_state::AppState;
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, web};
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

const VISIT_CARD_URL: &str = "https://example.com";
const WELCOME_MESSAGE: &str = "welcome";

#[derive(Deserialize)]
pub struct RoomAccessQuery {
    #[serde(rename = "userIdentifier", default)]
    user_identifier: String,
    #[serde(rename = "accessToken", default)]
    access_token: String,
    #[serde(rename = "playUri", default)]
    play_uri: String,
    #[serde(rename = "companionTextureId", default)]
    companion_texture_id: String,
}

#[derive(Serialize)]
struct RedirectResponse {
    #[serde(rename = "redirectUrl")]
    redirect_url: String,
}

#[derive(Serialize)]
struct MemberResponse {
    status: &'static str,
    email: String,
    username: String,
    #[serde(rename = "userUuid")]
    user_uuid: String,
    tags: Vec<String>,
    #[serde(rename = "visitCardUrl")]
    visit_card_url: &'static str,
    #[serde(rename = "isCharacterTexturesValid")]
    is_character_textures_valid: bool,
    #[serde(rename = "characterTextures")]
    character_textures: Vec<TextureEntry>,
    #[serde(rename = "isCompanionTextureValid")]
    is_companion_texture_valid: bool,
    #[serde(rename = "companionTexture", skip_serializing_if = "Option::is_none")]
    companion_texture: Option<TextureEntry>,
    messages: Vec<&'static str>,
    #[serde(rename = "canEdit")]
    can_edit: bool,
    world: String,
}

// `characterTextureIds[]` repeats per texture; web::Query cannot bind
// repeated keys, so they come straight off the query string.
fn character_texture_ids(req: &HttpRequest) -> Vec<String> {
    url::form_urlencoded::parse(req.query_string().as_bytes())
        .filter(|(key, _)| key == "characterTextureIds[]")
        .map(|(_, value)| value.into_owned())
        .collect()
}

/// Full access decision for entering a room: identity, tags, deterministic
/// user UUID, personalization validity and edit rights.
pub async fn get_access(
    req: HttpRequest,
    query: web::Query<RoomAccessQuery>,
    state: web::Data<AppState>,
) -> HttpResponse {
    let play_uri = match Url::parse(&query.play_uri) {
        Ok(parsed) => parsed,
        Err(_) => {
            return invalid_request(format!("playUri is not valid url: {}", query.play_uri));
        }
    };
    let map_id = play_uri.path();

    let outcome = state
        .coordinator
        .resolve_entry(map_id, &query.user_identifier, &query.access_token)
        .await;

    let (room, decision) = match outcome {
        Ok(EntryOutcome::Redirect(target)) => {
            return HttpResponse::Ok().json(RedirectResponse {
                redirect_url: target,
            });
        }
        Ok(EntryOutcome::Preview(_)) => {
            // This endpoint has no anonymous mode.
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "FAILED_TO_GET_USERINFO",
                "Failed to get userinfo",
                "empty access token",
            );
        }
        Ok(EntryOutcome::Granted { room, decision }) => (room, decision),
        Err(err) => return access_error_response(&err),
    };

    let companion_id = if query.companion_texture_id.is_empty() {
        None
    } else {
        Some(query.companion_texture_id.as_str())
    };
    let personalization = state
        .coordinator
        .personalize(&character_texture_ids(&req), companion_id);

    let user_uuid = Uuid::new_v5(&state.uuid_space, decision.identity.sub.as_bytes());

    HttpResponse::Ok().json(MemberResponse {
        status: "ok",
        email: decision.identity.email,
        username: decision.identity.preferred_username,
        user_uuid: user_uuid.to_string(),
        tags: decision.tags,
        visit_card_url: VISIT_CARD_URL,
        is_character_textures_valid: personalization.character_textures_valid,
        character_textures: personalization.character_textures,
        is_companion_texture_valid: personalization.companion_texture_valid,
        companion_texture: personalization.companion_texture,
        messages: vec![WELCOME_MESSAGE],
        can_edit: decision.can_edit,
        world: room.room.group,
    })
}

#[derive(Deserialize)]
pub struct SameWorldQuery {
    #[serde(rename = "roomUrl", default)]
    room_url: String,
}

/// Rooms sharing a world with the given room, the room itself included.
pub async fn get_same_world(
    query: web::Query<SameWorldQuery>,
    state: web::Data<AppState>,
) -> HttpResponse {
    let room_url = match Url::parse(&query.room_url) {
        Ok(parsed) => parsed,
        Err(_) => {
            return invalid_request(format!("roomUrl is not valid url: {}", query.room_url));
        }
    };

    match state.coordinator.world_peers(room_url.path()) {
        Ok(peers) => HttpResponse::Ok().json(peers),
        Err(err) => access_error_response(&err),
    }
}
