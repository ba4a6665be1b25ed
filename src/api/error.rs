//! Fault rendering
//!
//! Handlers return `Result<HttpResponse, ApiError>`. The `ResponseError`
//! impl renders the production shape; [`ExceptionMiddleware`] re-renders
//! with the captured backtrace in development and logs every fault.
//!
//! [`ExceptionMiddleware`]: crate::api::middleware::ExceptionMiddleware

use std::backtrace::Backtrace;
use std::fmt;

use actix_web::http::StatusCode;
use actix_web::http::header::CONTENT_TYPE;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;

use crate::application::core::ValidationErrors;
use crate::errors::TrakerError;

pub const VALIDATION_PROBLEM_TYPE: &str = "ValidationFluent";
pub const VALIDATION_PROBLEM_TITLE: &str = "Validation error";

/// 400 body for request-shape failures
#[derive(Debug, Serialize)]
pub struct ValidationProblemDetails<'a> {
    #[serde(rename = "type")]
    pub problem_type: &'static str,
    pub title: &'static str,
    pub status: u16,
    pub detail: &'a str,
    pub errors: &'a ValidationErrors,
}

/// Body for every other fault
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppException<'a> {
    pub status_code: u16,
    pub message: &'a str,
    pub details: Option<String>,
}

#[derive(Debug)]
pub struct ApiError {
    error: TrakerError,
    backtrace: Option<String>,
}

impl ApiError {
    pub fn new(error: TrakerError) -> Self {
        // 只有未预期的故障才需要堆栈
        let backtrace = match error {
            TrakerError::Validation(_) | TrakerError::Unauthorized(_) => None,
            _ => Some(Backtrace::force_capture().to_string()),
        };
        Self { error, backtrace }
    }

    pub fn error(&self) -> &TrakerError {
        &self.error
    }

    pub fn backtrace(&self) -> Option<&str> {
        self.backtrace.as_deref()
    }

    pub fn is_fault(&self) -> bool {
        !matches!(
            self.error,
            TrakerError::Validation(_) | TrakerError::Unauthorized(_)
        )
    }

    /// Render the response; `include_trace` is only set in development
    pub fn render(&self, include_trace: bool) -> HttpResponse {
        let status = self.status_code();
        let mut builder = HttpResponse::build(status);
        builder.insert_header((CONTENT_TYPE, "application/json; charset=utf-8"));

        match &self.error {
            TrakerError::Validation(errors) => builder.json(ValidationProblemDetails {
                problem_type: VALIDATION_PROBLEM_TYPE,
                title: VALIDATION_PROBLEM_TITLE,
                status: status.as_u16(),
                detail: self.error.message(),
                errors,
            }),
            other => builder.json(AppException {
                status_code: status.as_u16(),
                message: other.message(),
                details: if include_trace {
                    self.backtrace.clone()
                } else {
                    None
                },
            }),
        }
    }
}

/// AppException body for an error raised outside the crate (actix
/// extractors, third-party middleware), keeping its status
pub fn render_foreign_fault(status: StatusCode, message: &str) -> HttpResponse {
    HttpResponse::build(status)
        .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
        .json(AppException {
            status_code: status.as_u16(),
            message,
            details: None,
        })
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.error, f)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self.error {
            TrakerError::Validation(_) => StatusCode::BAD_REQUEST,
            TrakerError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        self.render(false)
    }
}

impl From<TrakerError> for ApiError {
    fn from(error: TrakerError) -> Self {
        Self::new(error)
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        Self::new(TrakerError::Validation(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[actix_rt::test]
    async fn test_validation_problem_document() {
        let mut errors = ValidationErrors::new();
        errors.add("name", "Name is required");

        let response = ApiError::from(errors).render(true);
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["type"], "ValidationFluent");
        assert_eq!(json["title"], "Validation error");
        assert_eq!(json["status"], 400);
        assert_eq!(json["detail"], "One or more validation errors occurred.");
        assert_eq!(json["errors"]["name"][0], "Name is required");
    }

    #[actix_rt::test]
    async fn test_unauthorized_is_401_without_trace() {
        let response = ApiError::from(TrakerError::unauthorized("No user is logged in")).render(true);
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["statusCode"], 401);
        assert_eq!(json["message"], "No user is logged in");
        assert!(json["details"].is_null());
    }

    #[actix_rt::test]
    async fn test_foreign_fault_keeps_status() {
        let response = render_foreign_fault(StatusCode::SERVICE_UNAVAILABLE, "pool exhausted");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let body = to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["statusCode"], 503);
        assert_eq!(json["message"], "pool exhausted");
        assert!(json["details"].is_null());
    }

    #[actix_rt::test]
    async fn test_fault_trace_only_when_requested() {
        let err = ApiError::from(TrakerError::internal("boom"));
        assert!(err.is_fault());

        let body = to_bytes(err.render(false).into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["statusCode"], 500);
        assert_eq!(json["message"], "boom");
        assert!(json["details"].is_null());

        let body = to_bytes(err.render(true).into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(json["details"].is_string());
    }
}
