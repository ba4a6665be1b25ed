//! The caller's own profile

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::IntoActiveModel;
use tracing::{info, warn};

use crate::application::core::{
    HandlerResult, Request, RequestContext, Services, ValidationErrors,
};
use crate::errors::{Result, TrakerError};
use crate::security::UserInfo;
use crate::services::{PhotoUpload, PhotoUploadResult};

#[derive(Debug, Clone, Default)]
pub struct GetCurrentUser;

#[async_trait]
impl Request for GetCurrentUser {
    type Output = UserInfo;
    const NAME: &'static str = "GetCurrentUser";

    async fn handle(self, services: &Services, ctx: &RequestContext) -> Result<HandlerResult<UserInfo>> {
        let user = services.user_accessor().get_user(ctx).await?;
        Ok(HandlerResult::success(user))
    }
}

#[derive(Debug, Clone)]
pub struct UploadProfilePicture {
    pub file: PhotoUpload,
}

#[async_trait]
impl Request for UploadProfilePicture {
    type Output = PhotoUploadResult;
    const NAME: &'static str = "UploadProfilePicture";

    fn validate(&self, errors: &mut ValidationErrors) {
        if self.file.bytes.is_empty() {
            errors.add("file", "File is required");
        }
    }

    async fn handle(
        self,
        services: &Services,
        ctx: &RequestContext,
    ) -> Result<HandlerResult<PhotoUploadResult>> {
        let user_id = services.user_accessor().user_id(ctx)?;
        let user = services
            .storage
            .find_user(user_id)
            .await?
            .ok_or_else(|| TrakerError::unauthorized("No user is logged in"))?;

        let Some(uploaded) = services.photos.upload(self.file).await? else {
            return Ok(HandlerResult::failure("Problem uploading photo", 400));
        };

        let previous = user.profile_picture_public_id.clone();

        let mut model = user.into_active_model();
        model.profile_picture_url = Set(Some(uploaded.url.clone()));
        model.profile_picture_public_id = Set(Some(uploaded.public_id.clone()));
        model.updated_at = Set(Utc::now());
        services.storage.update_user(model).await?;

        // New picture is already saved; a stale one in the photo store is only logged
        if let Some(previous) = previous {
            match services.photos.delete(&previous).await {
                Ok(status) => info!("Previous profile picture {}: {}", previous, status),
                Err(e) => warn!("Failed to delete previous profile picture {}: {}", previous, e),
            }
        }

        Ok(HandlerResult::success(uploaded))
    }
}
