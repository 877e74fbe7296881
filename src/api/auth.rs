// This file is part of the product RoomGate.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::error::error_response;
use actix_web::Error;
use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::http::{StatusCode, header};
use futures_util::future::LocalBoxFuture;
use std::future::{Ready, ready};
use std::rc::Rc; // Services are per-thread

/// Administrative shared-secret guard. Every guarded route requires the
/// `Authorization` header to equal the configured token; a mismatch is
/// rejected before any other processing.
pub struct AdminTokenGuard {
    token: String,
}

impl AdminTokenGuard {
    pub fn new(token: String) -> Self {
        Self { token }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AdminTokenGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AdminTokenMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AdminTokenMiddleware {
            service: Rc::new(service),
            token: Rc::new(self.token.clone()),
        }))
    }
}

pub struct AdminTokenMiddleware<S> {
    service: Rc<S>,
    token: Rc<String>,
}

impl<S, B> Service<ServiceRequest> for AdminTokenMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let presented = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let expected = self.token.clone();
        let service = self.service.clone();

        Box::pin(async move {
            if presented != *expected {
                let response = error_response(
                    StatusCode::FORBIDDEN,
                    "INVALID_ADMIN_TOKEN",
                    "Failed to authenticate token",
                    "authentication bearer token did not match",
                );
                return Ok(req.into_response(response).map_into_right_body());
            }
            service
                .call(req)
                .await
                .map(|res| res.map_into_left_body())
        })
    }
}
