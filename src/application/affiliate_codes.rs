//! Affiliate codes a user holds at a bookmaker

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::application::core::{
    HandlerResult, Request, RequestContext, Services, ValidationErrors,
};
use crate::errors::Result;

use migration::entities::affiliate_code;

pub const CODE_MAX_LENGTH: usize = 100;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAffiliateCodeDto {
    #[serde(default)]
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AffiliateCodeDto {
    pub id: String,
    pub code: String,
    pub user_id: Option<String>,
    pub bookmaker_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<affiliate_code::Model> for AffiliateCodeDto {
    fn from(model: affiliate_code::Model) -> Self {
        Self {
            id: model.id,
            code: model.code,
            user_id: model.user_id,
            bookmaker_id: model.bookmaker_id,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateAffiliateCode {
    pub bookmaker_id: String,
    pub dto: CreateAffiliateCodeDto,
}

#[async_trait]
impl Request for CreateAffiliateCode {
    type Output = AffiliateCodeDto;
    const NAME: &'static str = "CreateAffiliateCode";

    fn validate(&self, errors: &mut ValidationErrors) {
        errors
            .field("code", &self.dto.code)
            .not_empty("Code is required")
            .max_length(CODE_MAX_LENGTH, "Code must not exceed 100 characters");
    }

    async fn handle(
        self,
        services: &Services,
        ctx: &RequestContext,
    ) -> Result<HandlerResult<AffiliateCodeDto>> {
        let user_id = services.user_accessor().user_id(ctx)?.to_string();

        if services.storage.find_bookmaker(&self.bookmaker_id).await?.is_none() {
            return Ok(HandlerResult::not_found("Bookmaker not found"));
        }

        let now = Utc::now();
        let id = Uuid::new_v4().to_string();
        let model = affiliate_code::ActiveModel {
            id: Set(id.clone()),
            code: Set(self.dto.code.trim().to_string()),
            user_id: Set(Some(user_id)),
            bookmaker_id: Set(Some(self.bookmaker_id.clone())),
            created_at: Set(now),
            updated_at: Set(now),
        };

        if services.storage.insert_affiliate_code(model).await? == 0 {
            return Ok(HandlerResult::failure("Failed to create affiliate code", 400));
        }
        info!("Affiliate code {} created for bookmaker {}", id, self.bookmaker_id);

        Ok(match services.storage.find_affiliate_code(&id).await? {
            Some(model) => HandlerResult::success(model.into()),
            None => HandlerResult::failure("Failed to create affiliate code", 400),
        })
    }
}

#[derive(Debug, Clone)]
pub struct ListBookmakerAffiliateCodes {
    pub bookmaker_id: String,
}

#[async_trait]
impl Request for ListBookmakerAffiliateCodes {
    type Output = Vec<AffiliateCodeDto>;
    const NAME: &'static str = "ListBookmakerAffiliateCodes";

    async fn handle(
        self,
        services: &Services,
        _ctx: &RequestContext,
    ) -> Result<HandlerResult<Vec<AffiliateCodeDto>>> {
        if services.storage.find_bookmaker(&self.bookmaker_id).await?.is_none() {
            return Ok(HandlerResult::not_found("Bookmaker not found"));
        }

        let codes = services
            .storage
            .list_affiliate_codes_for_bookmaker(&self.bookmaker_id)
            .await?;
        Ok(HandlerResult::success(
            codes.into_iter().map(AffiliateCodeDto::from).collect(),
        ))
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListMyAffiliateCodes;

#[async_trait]
impl Request for ListMyAffiliateCodes {
    type Output = Vec<AffiliateCodeDto>;
    const NAME: &'static str = "ListMyAffiliateCodes";

    async fn handle(
        self,
        services: &Services,
        ctx: &RequestContext,
    ) -> Result<HandlerResult<Vec<AffiliateCodeDto>>> {
        let user_id = services.user_accessor().user_id(ctx)?;
        let codes = services.storage.list_affiliate_codes_for_user(user_id).await?;
        Ok(HandlerResult::success(
            codes.into_iter().map(AffiliateCodeDto::from).collect(),
        ))
    }
}

/// Only the owner may delete; someone else's code reads as missing
#[derive(Debug, Clone)]
pub struct DeleteAffiliateCode {
    pub id: String,
}

#[async_trait]
impl Request for DeleteAffiliateCode {
    type Output = ();
    const NAME: &'static str = "DeleteAffiliateCode";

    async fn handle(self, services: &Services, ctx: &RequestContext) -> Result<HandlerResult<()>> {
        let user_id = services.user_accessor().user_id(ctx)?;
        if services.storage.delete_affiliate_code(&self.id, user_id).await? == 0 {
            return Ok(HandlerResult::not_found("Affiliate code not found"));
        }
        Ok(HandlerResult::empty())
    }
}
