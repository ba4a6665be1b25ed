//! Bearer authentication for the `/api` scope
//!
//! Validates the access token with the shared [`JwtService`] and stores the
//! subject in request extensions. Identity endpoints that must work without
//! a token are let through untouched.

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, ResponseError,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::Method,
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use std::sync::Arc;
use tracing::{debug, trace};

use crate::api::ApiError;
use crate::errors::TrakerError;
use crate::security::JwtService;

/// Authenticated caller id (JWT subject)
#[derive(Clone, Debug)]
pub struct AuthenticatedUser(pub String);

/// 无需令牌的接口
const PUBLIC_ENDPOINTS: [&str; 4] = [
    "/api/register",
    "/api/login",
    "/api/refresh",
    "/api/forgotPassword",
];

#[derive(Clone, Default)]
pub struct ApiAuth;

impl<S, B> Transform<S, ServiceRequest> for ApiAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = ApiAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ApiAuthMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct ApiAuthMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> ApiAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    fn is_public_endpoint(req: &ServiceRequest) -> bool {
        let path = req.path().trim_end_matches('/');
        PUBLIC_ENDPOINTS.contains(&path)
    }

    fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
        req.headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.strip_prefix("Bearer "))
            .map(|s| s.trim().to_string())
    }

    fn handle_unauthorized(req: ServiceRequest, message: &str) -> ServiceResponse<EitherBody<B>> {
        debug!("Rejected {} {}: {}", req.method(), req.path(), message);
        let response = ApiError::from(TrakerError::unauthorized(message)).error_response();
        req.into_response(response.map_into_right_body())
    }
}

impl<S, B> Service<ServiceRequest> for ApiAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();

        Box::pin(async move {
            // CORS 预检与公开接口直接放行
            if req.method() == Method::OPTIONS || Self::is_public_endpoint(&req) {
                trace!("Public endpoint accessed: {}", req.path());
                return Ok(srv.call(req).await?.map_into_left_body());
            }

            let Some(token) = Self::extract_bearer_token(&req) else {
                return Ok(Self::handle_unauthorized(req, "Missing bearer token"));
            };

            let Some(jwt) = req.app_data::<web::Data<Arc<JwtService>>>().cloned() else {
                return Ok(Self::handle_unauthorized(req, "Authentication is not configured"));
            };

            match jwt.validate_access_token(&token) {
                Ok(claims) => {
                    trace!("Bearer token accepted for user {}", claims.sub);
                    tracing::Span::current().record("user_id", claims.sub.as_str());
                    req.extensions_mut().insert(AuthenticatedUser(claims.sub));
                    Ok(srv.call(req).await?.map_into_left_body())
                }
                Err(e) => Ok(Self::handle_unauthorized(req, e.message())),
            }
        })
    }
}
