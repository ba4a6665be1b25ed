//! UTM parameter sets owned by a user

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::core::{
    HandlerResult, Request, RequestContext, Services, ValidationErrors,
};
use crate::errors::Result;

use migration::entities::utm;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUtmDto {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub medium: Option<String>,
    #[serde(default)]
    pub campaign: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UtmDto {
    pub id: String,
    pub name: String,
    pub value: String,
    pub source: Option<String>,
    pub medium: Option<String>,
    pub campaign: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<utm::Model> for UtmDto {
    fn from(model: utm::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            value: model.value,
            source: model.source,
            medium: model.medium,
            campaign: model.campaign,
            created_at: model.created_at,
        }
    }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Debug, Clone)]
pub struct CreateUtm {
    pub dto: CreateUtmDto,
}

#[async_trait]
impl Request for CreateUtm {
    type Output = UtmDto;
    const NAME: &'static str = "CreateUtm";

    fn validate(&self, errors: &mut ValidationErrors) {
        errors
            .field("name", &self.dto.name)
            .not_empty("Name is required")
            .max_length(100, "Name must not exceed 100 characters");
        errors
            .field("value", &self.dto.value)
            .not_empty("Value is required")
            .max_length(500, "Value must not exceed 500 characters");
        errors
            .optional_field("source", self.dto.source.as_deref())
            .max_length(100, "Source must not exceed 100 characters");
        errors
            .optional_field("medium", self.dto.medium.as_deref())
            .max_length(100, "Medium must not exceed 100 characters");
        errors
            .optional_field("campaign", self.dto.campaign.as_deref())
            .max_length(200, "Campaign must not exceed 200 characters");
    }

    async fn handle(self, services: &Services, ctx: &RequestContext) -> Result<HandlerResult<UtmDto>> {
        let user_id = services.user_accessor().user_id(ctx)?.to_string();

        let now = Utc::now();
        let id = Uuid::new_v4().to_string();
        let model = utm::ActiveModel {
            id: Set(id.clone()),
            name: Set(self.dto.name.trim().to_string()),
            value: Set(self.dto.value.trim().to_string()),
            source: Set(trimmed(self.dto.source)),
            medium: Set(trimmed(self.dto.medium)),
            campaign: Set(trimmed(self.dto.campaign)),
            user_id: Set(Some(user_id)),
            created_at: Set(now),
            updated_at: Set(now),
        };

        if services.storage.insert_utm(model).await? == 0 {
            return Ok(HandlerResult::failure("Failed to create UTM", 400));
        }

        Ok(match services.storage.find_utm(&id).await? {
            Some(model) => HandlerResult::success(model.into()),
            None => HandlerResult::failure("Failed to create UTM", 400),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListMyUtms;

#[async_trait]
impl Request for ListMyUtms {
    type Output = Vec<UtmDto>;
    const NAME: &'static str = "ListMyUtms";

    async fn handle(self, services: &Services, ctx: &RequestContext) -> Result<HandlerResult<Vec<UtmDto>>> {
        let user_id = services.user_accessor().user_id(ctx)?;
        let utms = services.storage.list_utms_for_user(user_id).await?;
        Ok(HandlerResult::success(utms.into_iter().map(UtmDto::from).collect()))
    }
}

#[derive(Debug, Clone)]
pub struct DeleteUtm {
    pub id: String,
}

#[async_trait]
impl Request for DeleteUtm {
    type Output = ();
    const NAME: &'static str = "DeleteUtm";

    async fn handle(self, services: &Services, ctx: &RequestContext) -> Result<HandlerResult<()>> {
        let user_id = services.user_accessor().user_id(ctx)?;
        if services.storage.delete_utm(&self.id, user_id).await? == 0 {
            return Ok(HandlerResult::not_found("UTM not found"));
        }
        Ok(HandlerResult::empty())
    }
}
