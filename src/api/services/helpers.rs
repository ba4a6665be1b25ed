//! Envelope → HTTP translation shared by every controller

use actix_multipart::Multipart;
use actix_web::HttpResponse;
use actix_web::http::header::CONTENT_TYPE;
use actix_web::web;
use futures_util::StreamExt;
use serde::Serialize;
use tracing::warn;

use crate::api::ApiError;
use crate::application::core::{HandlerResult, ValidationErrors};
use crate::services::PhotoUpload;

/// 上传图片大小上限
pub const MAX_PHOTO_SIZE: usize = 10 * 1024 * 1024;

/// Translate a handler result, checked in order:
///
/// 1. failure with code 404 → 404, empty body
/// 2. success with payload → 200, payload as JSON
/// 3. success without payload → 204, empty body
/// 4. anything else → 400, error message as body
pub fn handle_result<T: Serialize>(result: HandlerResult<T>) -> HttpResponse {
    if !result.is_success && result.code == 404 {
        return HttpResponse::NotFound().finish();
    }

    if result.is_success {
        return match result.data {
            Some(data) => HttpResponse::Ok().json(data),
            None => HttpResponse::NoContent().finish(),
        };
    }

    HttpResponse::BadRequest()
        .insert_header((CONTENT_TYPE, "text/plain; charset=utf-8"))
        .body(result.error.unwrap_or_default())
}

/// JSON body errors rendered as a validation problem instead of plain text
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let mut errors = ValidationErrors::new();
        errors.add("body", err.to_string());
        ApiError::from(errors).into()
    })
}

fn file_error(message: impl Into<String>) -> ApiError {
    let mut errors = ValidationErrors::new();
    errors.add("file", message);
    ApiError::from(errors)
}

/// Read the `file` part of a multipart upload
///
/// A missing part yields an empty upload; the request's own validation
/// rejects it.
pub async fn read_photo_upload(mut payload: Multipart) -> Result<PhotoUpload, ApiError> {
    let mut upload = PhotoUpload {
        bytes: Vec::new(),
        filename: String::new(),
    };

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| {
            warn!("Failed to parse multipart field: {}", e);
            file_error(format!("Invalid multipart data: {}", e))
        })?;

        if field.name() != Some("file") {
            continue;
        }

        upload.filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .unwrap_or("upload")
            .to_string();

        while let Some(chunk) = field.next().await {
            let bytes = chunk.map_err(|e| file_error(format!("Failed to read file: {}", e)))?;
            if upload.bytes.len() + bytes.len() > MAX_PHOTO_SIZE {
                return Err(file_error(format!(
                    "File size exceeds maximum {} MB",
                    MAX_PHOTO_SIZE / 1024 / 1024
                )));
            }
            upload.bytes.extend_from_slice(&bytes);
        }
    }

    Ok(upload)
}
