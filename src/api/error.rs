// This file is part of the product RoomGate.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::access::AccessError;
use crate::identity::IdentityError;
use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::Serialize;

const ERROR_IMAGE: &str = "https://cdn.discordapp.com/emojis/867801176565481472.webp";

/// Wire error envelope. The capitalized field names and the fixed
/// status/type/title/image block are what game clients expect.
#[derive(Serialize)]
pub struct ErrorEnvelope {
    #[serde(rename = "Status")]
    pub status: &'static str,
    #[serde(rename = "Type")]
    pub kind: &'static str,
    #[serde(rename = "Title")]
    pub title: &'static str,
    #[serde(rename = "Image")]
    pub image: &'static str,
    #[serde(rename = "Code")]
    pub code: &'static str,
    #[serde(rename = "Subtitle")]
    pub subtitle: String,
    #[serde(rename = "Details")]
    pub details: String,
}

pub fn error_response(
    status: StatusCode,
    code: &'static str,
    subtitle: impl Into<String>,
    details: impl Into<String>,
) -> HttpResponse {
    HttpResponse::build(status).json(ErrorEnvelope {
        status: "error",
        kind: "error",
        title: "ERROR",
        image: ERROR_IMAGE,
        code,
        subtitle: subtitle.into(),
        details: details.into(),
    })
}

pub fn invalid_request(details: impl Into<String>) -> HttpResponse {
    error_response(
        StatusCode::BAD_REQUEST,
        "INVALID_REQUEST",
        "Failed to bind request",
        details,
    )
}

/// Maps coordinator failures to the wire. Identity-provider failures relay
/// the upstream status when one exists; everything else in that family is a
/// gateway-side 500.
pub fn access_error_response(err: &AccessError) -> HttpResponse {
    match err {
        AccessError::RoomNotFound(uri) => error_response(
            StatusCode::NOT_FOUND,
            "UNKNOWN_ROOM",
            "Unknown room",
            format!("Failed to find matching room: {}", uri),
        ),
        AccessError::AccessDenied => error_response(
            StatusCode::FORBIDDEN,
            "ACCESS_DENIED",
            "You are not allowed to access this room",
            "You are not in allowed_tags list",
        ),
        AccessError::Identity(identity_err) => identity_error_response(identity_err),
    }
}

pub fn identity_error_response(err: &IdentityError) -> HttpResponse {
    let status = err
        .upstream_status()
        .and_then(|code| StatusCode::from_u16(code).ok())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    error_response(
        status,
        "FAILED_TO_GET_USERINFO",
        "Failed to get userinfo",
        err.to_string(),
    )
}
