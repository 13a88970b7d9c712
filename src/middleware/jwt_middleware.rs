/// JWT Authentication Middleware
///
/// Validates bearer tokens from the Authorization header and injects the
/// decoded claims into request extensions for route handlers. Comes in two
/// kinds: the access guard for protected resources and the refresh guard
/// for the refresh endpoint, which verifies against the refresh secret so
/// an access token can never drive a rotation.

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage, HttpResponse,
};
use futures::future::LocalBoxFuture;
use std::rc::Rc;

use crate::auth::{validate_access_token, validate_refresh_token};
use crate::configuration::JwtSettings;

#[derive(Debug, Clone, Copy, PartialEq)]
enum TokenKind {
    Access,
    Refresh,
}

pub struct JwtMiddleware {
    jwt_config: JwtSettings,
    kind: TokenKind,
}

impl JwtMiddleware {
    /// Guard for routes requiring a valid access token
    pub fn access(jwt_config: JwtSettings) -> Self {
        Self {
            jwt_config,
            kind: TokenKind::Access,
        }
    }

    /// Guard for the refresh endpoint; the handler trusts the injected
    /// claim's subject as the user identifier
    pub fn refresh(jwt_config: JwtSettings) -> Self {
        Self {
            jwt_config,
            kind: TokenKind::Refresh,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtMiddlewareService<S>;
    type Future = std::future::Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        std::future::ready(Ok(JwtMiddlewareService {
            service: Rc::new(service),
            jwt_config: self.jwt_config.clone(),
            kind: self.kind,
        }))
    }
}

pub struct JwtMiddlewareService<S> {
    service: Rc<S>,
    jwt_config: JwtSettings,
    kind: TokenKind,
}

impl<S, B> Service<ServiceRequest> for JwtMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let bearer = req
            .headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(str::to_string);

        let token = match bearer {
            Some(token) => token,
            None => {
                tracing::warn!("Missing or invalid Authorization header");
                let response = HttpResponse::Unauthorized().json(serde_json::json!({
                    "error": "Missing authentication token",
                    "code": "AUTH_UNAUTHORIZED"
                }));
                return Box::pin(async move {
                    Err(actix_web::error::InternalError::from_response(
                        "Unauthorized",
                        response,
                    )
                    .into())
                });
            }
        };

        let validated = match self.kind {
            TokenKind::Access => validate_access_token(&token, &self.jwt_config),
            TokenKind::Refresh => validate_refresh_token(&token, &self.jwt_config),
        };

        match validated {
            Ok(claims) => {
                req.extensions_mut().insert(claims.clone());

                tracing::debug!(
                    user_id = %claims.sub,
                    jti = %claims.jti,
                    "Bearer token validated"
                );

                let service = self.service.clone();
                Box::pin(async move { service.call(req).await })
            }
            Err(e) => {
                tracing::warn!("Bearer token validation failed: {}", e);
                let response = HttpResponse::Unauthorized().json(serde_json::json!({
                    "error": "Invalid or expired token",
                    "code": "AUTH_TOKEN_INVALID"
                }));
                Box::pin(async move {
                    Err(actix_web::error::InternalError::from_response(
                        "Invalid token",
                        response,
                    )
                    .into())
                })
            }
        }
    }
}
