//! Telegram accounts linked to users

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

use migration::entities::telegram;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkTelegramDto {
    #[serde(default)]
    pub telegram_id: String,
    #[serde(default)]
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TelegramDto {
    pub id: String,
    pub telegram_id: String,
    pub username: String,
    pub user_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<telegram::Model> for TelegramDto {
    fn from(model: telegram::Model) -> Self {
        Self {
            id: model.id,
            telegram_id: model.telegram_id,
            username: model.username,
            user_id: model.user_id,
            created_at: model.created_at,
        }
    }
}

fn validate_telegram_id(errors: &mut ValidationErrors, telegram_id: &str) {
    errors
        .field("telegramId", telegram_id)
        .not_empty("Telegram id is required")
        .max_length(50, "Telegram id must not exceed 50 characters");
}

/// `@handle` and `handle` name the same account
fn normalize_username(raw: &str) -> &str {
    raw.trim().trim_start_matches('@').trim()
}

#[derive(Debug, Clone)]
pub struct LinkTelegram {
    pub dto: LinkTelegramDto,
}

#[async_trait]
impl Request for LinkTelegram {
    type Output = TelegramDto;
    const NAME: &'static str = "LinkTelegram";

    fn validate(&self, errors: &mut ValidationErrors) {
        validate_telegram_id(errors, &self.dto.telegram_id);
        errors
            .field("username", normalize_username(&self.dto.username))
            .not_empty("Username is required")
            .max_length(100, "Username must not exceed 100 characters");
    }

    async fn handle(
        self,
        services: &Services,
        ctx: &RequestContext,
    ) -> Result<HandlerResult<TelegramDto>> {
        let user_id = services.user_accessor().user_id(ctx)?.to_string();

        let now = Utc::now();
        let id = Uuid::new_v4().to_string();
        let model = telegram::ActiveModel {
            id: Set(id.clone()),
            telegram_id: Set(self.dto.telegram_id.trim().to_string()),
            username: Set(normalize_username(&self.dto.username).to_string()),
            user_id: Set(Some(user_id.clone())),
            created_at: Set(now),
            updated_at: Set(now),
        };

        match services.storage.insert_telegram(model).await {
            Ok(rows) if rows > 0 => {
                info!("Telegram account {} linked to user {}", self.dto.telegram_id, user_id);
            }
            Ok(_) => return Ok(HandlerResult::failure("Failed to link Telegram account", 400)),
            Err(e) if e.is_conflict() => {
                return Ok(HandlerResult::failure("Telegram account is already linked", 400));
            }
            Err(e) => return Err(e),
        }

        Ok(match services.storage.find_telegram(&id).await? {
            Some(model) => HandlerResult::success(model.into()),
            None => HandlerResult::failure("Failed to link Telegram account", 400),
        })
    }
}

/// Lookup by the platform id the bot receives with every update
#[derive(Debug, Clone)]
pub struct GetTelegramByPlatformId {
    pub telegram_id: String,
}

#[async_trait]
impl Request for GetTelegramByPlatformId {
    type Output = TelegramDto;
    const NAME: &'static str = "GetTelegramByPlatformId";

    fn validate(&self, errors: &mut ValidationErrors) {
        validate_telegram_id(errors, &self.telegram_id);
    }

    async fn handle(
        self,
        services: &Services,
        _ctx: &RequestContext,
    ) -> Result<HandlerResult<TelegramDto>> {
        Ok(
            match services
                .storage
                .find_telegram_by_platform_id(&self.telegram_id)
                .await?
            {
                Some(model) => HandlerResult::success(model.into()),
                None => HandlerResult::not_found("Telegram account not found"),
            },
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListMyTelegrams;

#[async_trait]
impl Request for ListMyTelegrams {
    type Output = Vec<TelegramDto>;
    const NAME: &'static str = "ListMyTelegrams";

    async fn handle(
        self,
        services: &Services,
        ctx: &RequestContext,
    ) -> Result<HandlerResult<Vec<TelegramDto>>> {
        let user_id = services.user_accessor().user_id(ctx)?;
        let accounts = services.storage.list_telegrams_for_user(user_id).await?;
        Ok(HandlerResult::success(
            accounts.into_iter().map(TelegramDto::from).collect(),
        ))
    }
}

#[derive(Debug, Clone)]
pub struct UnlinkTelegram {
    pub id: String,
}

#[async_trait]
impl Request for UnlinkTelegram {
    type Output = ();
    const NAME: &'static str = "UnlinkTelegram";

    async fn handle(self, services: &Services, ctx: &RequestContext) -> Result<HandlerResult<()>> {
        let user_id = services.user_accessor().user_id(ctx)?;
        if services.storage.delete_telegram(&self.id, user_id).await? == 0 {
            return Ok(HandlerResult::not_found("Telegram account not found"));
        }
        info!("Telegram account {} unlinked", self.id);
        Ok(HandlerResult::empty())
    }
}
