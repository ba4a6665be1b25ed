//! External collaborators behind narrow interfaces

pub mod email;
pub mod photos;

use std::sync::Arc;

use tracing::warn;

use crate::config::PhotoConfig;

pub use email::{EmailSender, NoopEmailSender};
pub use photos::{
    CloudinaryPhotoService, DisabledPhotoService, PhotoService, PhotoUpload, PhotoUploadResult,
};

/// Cloudinary when credentials are present, otherwise a service that refuses uploads
pub fn build_photo_service(config: &PhotoConfig) -> Arc<dyn PhotoService> {
    if config.is_configured() {
        Arc::new(CloudinaryPhotoService::new(config))
    } else {
        warn!("Cloudinary credentials not configured, photo uploads are disabled");
        Arc::new(DisabledPhotoService)
    }
}
