use async_trait::async_trait;
use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::IntoActiveModel;
use tracing::{info, warn};
use uuid::Uuid;

use super::dto::{CreateBookmakerDto, UpdateBookmakerDto};
use super::validation::validate_bookmaker_fields;
use crate::application::core::{
    HandlerResult, Request, RequestContext, Services, ValidationErrors,
};
use crate::errors::Result;
use crate::services::{PhotoUpload, PhotoUploadResult};

use migration::entities::bookmaker;

fn blank_to_none(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Clone)]
pub struct CreateBookmaker {
    pub dto: CreateBookmakerDto,
}

#[async_trait]
impl Request for CreateBookmaker {
    type Output = String;
    const NAME: &'static str = "CreateBookmaker";

    fn validate(&self, errors: &mut ValidationErrors) {
        validate_bookmaker_fields(errors, &self.dto.name, self.dto.logo_url.as_deref());
    }

    async fn handle(self, services: &Services, _ctx: &RequestContext) -> Result<HandlerResult<String>> {
        let now = Utc::now();
        let id = Uuid::new_v4().to_string();

        let model = bookmaker::ActiveModel {
            id: Set(id.clone()),
            name: Set(self.dto.name.clone()),
            logo_url: Set(blank_to_none(self.dto.logo_url)),
            logo_public_id: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        match services.storage.insert_bookmaker(model).await {
            Ok(rows) if rows > 0 => {
                info!("Bookmaker created: {} ({})", self.dto.name, id);
                Ok(HandlerResult::success(id))
            }
            Ok(_) => Ok(HandlerResult::failure("Failed to create bookmaker", 400)),
            Err(e) if e.is_conflict() => Ok(HandlerResult::failure(
                format!("Bookmaker '{}' already exists", self.dto.name),
                400,
            )),
            Err(e) => Err(e),
        }
    }
}

#[derive(Debug, Clone)]
pub struct UpdateBookmaker {
    pub id: String,
    pub dto: UpdateBookmakerDto,
}

#[async_trait]
impl Request for UpdateBookmaker {
    type Output = ();
    const NAME: &'static str = "UpdateBookmaker";

    fn validate(&self, errors: &mut ValidationErrors) {
        validate_bookmaker_fields(errors, &self.dto.name, self.dto.logo_url.as_deref());
    }

    async fn handle(self, services: &Services, _ctx: &RequestContext) -> Result<HandlerResult<()>> {
        let Some(existing) = services.storage.find_bookmaker(&self.id).await? else {
            return Ok(HandlerResult::not_found("Bookmaker not found"));
        };

        let mut model = existing.into_active_model();
        model.name = Set(self.dto.name.clone());
        model.logo_url = Set(blank_to_none(self.dto.logo_url));
        model.updated_at = Set(Utc::now());

        match services.storage.update_bookmaker(model).await {
            Ok(_) => Ok(HandlerResult::empty()),
            Err(e) if e.is_conflict() => Ok(HandlerResult::failure(
                format!("Bookmaker '{}' already exists", self.dto.name),
                400,
            )),
            Err(e) => Err(e),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DeleteBookmaker {
    pub id: String,
}

#[async_trait]
impl Request for DeleteBookmaker {
    type Output = ();
    const NAME: &'static str = "DeleteBookmaker";

    async fn handle(self, services: &Services, _ctx: &RequestContext) -> Result<HandlerResult<()>> {
        let Some(existing) = services.storage.find_bookmaker(&self.id).await? else {
            return Ok(HandlerResult::not_found("Bookmaker not found"));
        };

        if services.storage.delete_bookmaker(&self.id).await? == 0 {
            return Ok(HandlerResult::failure("Failed to delete bookmaker", 400));
        }
        info!("Bookmaker deleted: {}", self.id);

        // Row is gone already; a stale logo in the photo store is only logged
        if let Some(public_id) = existing.logo_public_id
            && let Err(e) = services.photos.delete(&public_id).await
        {
            warn!("Failed to delete logo {} of bookmaker {}: {}", public_id, self.id, e);
        }

        Ok(HandlerResult::empty())
    }
}

/// Upload a new logo and replace the previous one
#[derive(Debug, Clone)]
pub struct UploadBookmakerLogo {
    pub id: String,
    pub file: PhotoUpload,
}

#[async_trait]
impl Request for UploadBookmakerLogo {
    type Output = PhotoUploadResult;
    const NAME: &'static str = "UploadBookmakerLogo";

    fn validate(&self, errors: &mut ValidationErrors) {
        if self.file.bytes.is_empty() {
            errors.add("file", "File is required");
        }
    }

    async fn handle(
        self,
        services: &Services,
        _ctx: &RequestContext,
    ) -> Result<HandlerResult<PhotoUploadResult>> {
        let Some(existing) = services.storage.find_bookmaker(&self.id).await? else {
            return Ok(HandlerResult::not_found("Bookmaker not found"));
        };

        let Some(uploaded) = services.photos.upload(self.file).await? else {
            return Ok(HandlerResult::failure("Problem uploading photo", 400));
        };

        let previous = existing.logo_public_id.clone();

        let mut model = existing.into_active_model();
        model.logo_url = Set(Some(uploaded.url.clone()));
        model.logo_public_id = Set(Some(uploaded.public_id.clone()));
        model.updated_at = Set(Utc::now());
        services.storage.update_bookmaker(model).await?;

        if let Some(previous) = previous {
            match services.photos.delete(&previous).await {
                Ok(status) => info!("Previous logo {}: {}", previous, status),
                Err(e) => warn!("Failed to delete previous logo {} of bookmaker {}: {}", previous, self.id, e),
            }
        }

        Ok(HandlerResult::success(uploaded))
    }
}
