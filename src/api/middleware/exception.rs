//! Centralized fault translation
//!
//! Outermost application middleware. Any response produced from an
//! [`ApiError`] is re-rendered here: validation failures keep their 400
//! problem document, authorization failures become 401, every other fault
//! becomes 500 with the backtrace attached only in development. Server
//! errors raised elsewhere (extractors, other middleware) are re-rendered in
//! the same `AppException` shape with their own status. Faults are always
//! logged.

use actix_service::{Service, Transform};
use actix_web::{
    Error,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::{debug, error, info};

use crate::api::ApiError;
use crate::api::error::render_foreign_fault;
use crate::errors::TrakerError;

#[derive(Clone, Copy, Debug, Default)]
pub struct ExceptionMiddleware {
    development: bool,
}

impl ExceptionMiddleware {
    pub fn new(development: bool) -> Self {
        Self { development }
    }
}

impl<S, B> Transform<S, ServiceRequest> for ExceptionMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = ExceptionService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ExceptionService {
            service: Rc::new(service),
            development: self.development,
        }))
    }
}

pub struct ExceptionService<S> {
    service: Rc<S>,
    development: bool,
}

fn log_api_error(method: &str, path: &str, err: &ApiError) {
    match err.error() {
        TrakerError::Validation(errors) => {
            debug!("{} {} failed validation on {} field(s)", method, path, errors.len());
        }
        TrakerError::Unauthorized(msg) => {
            info!("{} {} unauthorized: {}", method, path, msg);
        }
        other => {
            error!(
                code = other.code(),
                "{} {} failed: {}\n{}",
                method,
                path,
                other,
                err.backtrace().unwrap_or_default()
            );
        }
    }
}

impl<S, B> Service<ServiceRequest> for ExceptionService<S>
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
        let development = self.development;
        let method = req.method().to_string();
        let path = req.path().to_string();

        Box::pin(async move {
            let res = match srv.call(req).await {
                Ok(res) => res,
                Err(e) => {
                    error!("{} {} failed before a response was produced: {}", method, path, e);
                    return Err(e);
                }
            };

            let rendered = match res.response().error() {
                Some(err) => match err.as_error::<ApiError>() {
                    Some(api_err) => {
                        log_api_error(&method, &path, api_err);
                        Some(api_err.render(development))
                    }
                    None if res.status().is_server_error() => {
                        error!("{} {} failed: {}", method, path, err);
                        Some(render_foreign_fault(res.status(), &err.to_string()))
                    }
                    None => None,
                },
                None => None,
            };

            Ok(match rendered {
                Some(response) => res.into_response(response.map_into_right_body()),
                None => res.map_into_left_body(),
            })
        })
    }
}
