//! Original links, generated (UTM-tagged, shortened) links and redirects

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::utms::UtmDto;
use crate::application::core::{
    HandlerResult, Request, RequestContext, Services, ValidationErrors,
};
use crate::errors::{Result, TrakerError};
use crate::utils::generate_random_code;
use crate::utils::url_validator::{UrlValidationError, validate_url};

use migration::entities::{generated_link, generated_link_utm, original_link, utm};

pub const URL_MAX_LENGTH: usize = 2048;

/// 短码冲突时的重试次数
const SHORT_CODE_ATTEMPTS: usize = 5;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOriginalLinkDto {
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OriginalLinkDto {
    pub id: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

impl From<original_link::Model> for OriginalLinkDto {
    fn from(model: original_link::Model) -> Self {
        Self {
            id: model.id,
            url: model.url,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateLinkDto {
    #[serde(default)]
    pub original_link_id: String,
    #[serde(default)]
    pub utm_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedLinkDto {
    pub id: String,
    pub original_link_id: String,
    pub new_link: String,
    pub short_link: String,
    pub short_url: String,
    pub clicks: i64,
    pub created_at: DateTime<Utc>,
}

impl GeneratedLinkDto {
    fn from_model(model: generated_link::Model, public_base_url: &str) -> Self {
        let short_url = format!(
            "{}/{}",
            public_base_url.trim_end_matches('/'),
            model.short_link
        );
        Self {
            id: model.id,
            original_link_id: model.original_link_id,
            new_link: model.new_link,
            short_link: model.short_link,
            short_url,
            clicks: model.clicks,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedLinkDetailsDto {
    #[serde(flatten)]
    pub link: GeneratedLinkDto,
    pub utms: Vec<UtmDto>,
}

const TAG_KEYS: [&str; 3] = ["utm_source", "utm_medium", "utm_campaign"];

/// Append the UTM sets to `base` as query parameters
///
/// Every UTM contributes `name=value`. `utm_source`, `utm_medium` and
/// `utm_campaign` appear at most once: the base URL wins, then the first UTM
/// that defines the key, either through its name or its tag fields.
pub fn build_tracked_url(base: &str, utms: &[utm::Model]) -> std::result::Result<String, UrlValidationError> {
    let mut url = validate_url(base)?;
    if utms.is_empty() {
        return Ok(url.to_string());
    }

    let mut seen: HashSet<&'static str> = url
        .query_pairs()
        .filter_map(|(k, _)| tag_key(&k))
        .collect();
    {
        let mut pairs = url.query_pairs_mut();
        for utm in utms {
            let duplicate = tag_key(&utm.name).is_some_and(|key| !seen.insert(key));
            if !duplicate {
                pairs.append_pair(&utm.name, &utm.value);
            }

            let tagged = [
                (TAG_KEYS[0], utm.source.as_deref()),
                (TAG_KEYS[1], utm.medium.as_deref()),
                (TAG_KEYS[2], utm.campaign.as_deref()),
            ];
            for (key, value) in tagged {
                if let Some(value) = value
                    && seen.insert(key)
                {
                    pairs.append_pair(key, value);
                }
            }
        }
    }

    Ok(url.to_string())
}

fn tag_key(name: &str) -> Option<&'static str> {
    TAG_KEYS
        .into_iter()
        .find(|key| key.eq_ignore_ascii_case(name.trim()))
}

#[derive(Debug, Clone)]
pub struct CreateOriginalLink {
    pub dto: CreateOriginalLinkDto,
}

#[async_trait]
impl Request for CreateOriginalLink {
    type Output = OriginalLinkDto;
    const NAME: &'static str = "CreateOriginalLink";

    fn validate(&self, errors: &mut ValidationErrors) {
        errors
            .field("url", &self.dto.url)
            .not_empty("URL is required")
            .max_length(URL_MAX_LENGTH, "URL must not exceed 2048 characters")
            .url("URL must be a valid http(s) URL");
    }

    async fn handle(
        self,
        services: &Services,
        ctx: &RequestContext,
    ) -> Result<HandlerResult<OriginalLinkDto>> {
        let user_id = services.user_accessor().user_id(ctx)?.to_string();

        let now = Utc::now();
        let id = Uuid::new_v4().to_string();
        let model = original_link::ActiveModel {
            id: Set(id.clone()),
            url: Set(self.dto.url.trim().to_string()),
            user_id: Set(Some(user_id)),
            created_at: Set(now),
            updated_at: Set(now),
        };

        if services.storage.insert_original_link(model).await? == 0 {
            return Ok(HandlerResult::failure("Failed to create link", 400));
        }

        Ok(match services.storage.find_original_link(&id).await? {
            Some(model) => HandlerResult::success(model.into()),
            None => HandlerResult::failure("Failed to create link", 400),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListOriginalLinks;

#[async_trait]
impl Request for ListOriginalLinks {
    type Output = Vec<OriginalLinkDto>;
    const NAME: &'static str = "ListOriginalLinks";

    async fn handle(
        self,
        services: &Services,
        ctx: &RequestContext,
    ) -> Result<HandlerResult<Vec<OriginalLinkDto>>> {
        let user_id = services.user_accessor().user_id(ctx)?;
        let links = services.storage.list_original_links_for_user(user_id).await?;
        Ok(HandlerResult::success(
            links.into_iter().map(OriginalLinkDto::from).collect(),
        ))
    }
}

#[derive(Debug, Clone)]
pub struct GenerateLink {
    pub dto: GenerateLinkDto,
}

#[async_trait]
impl Request for GenerateLink {
    type Output = GeneratedLinkDetailsDto;
    const NAME: &'static str = "GenerateLink";

    fn validate(&self, errors: &mut ValidationErrors) {
        errors
            .field("originalLinkId", &self.dto.original_link_id)
            .not_empty("Original link is required");
        if self.dto.utm_ids.iter().any(|id| id.trim().is_empty()) {
            errors.add("utmIds", "UTM ids must not be empty");
        }
    }

    async fn handle(
        self,
        services: &Services,
        ctx: &RequestContext,
    ) -> Result<HandlerResult<GeneratedLinkDetailsDto>> {
        let user_id = services.user_accessor().user_id(ctx)?.to_string();

        let original = match services
            .storage
            .find_original_link(&self.dto.original_link_id)
            .await?
        {
            Some(link) if link.user_id.as_deref() == Some(user_id.as_str()) => link,
            _ => return Ok(HandlerResult::not_found("Original link not found")),
        };

        let mut utm_ids = self.dto.utm_ids;
        utm_ids.sort();
        utm_ids.dedup();

        let utms = services.storage.find_user_utms(&user_id, &utm_ids).await?;
        if utms.len() != utm_ids.len() {
            return Ok(HandlerResult::failure("One or more UTMs were not found", 400));
        }

        let new_link = build_tracked_url(&original.url, &utms)
            .map_err(|e| TrakerError::internal(format!("Stored link is not a valid URL: {}", e)))?;
        if new_link.chars().count() > URL_MAX_LENGTH {
            return Ok(HandlerResult::failure(
                "Generated link must not exceed 2048 characters",
                400,
            ));
        }

        let id = Uuid::new_v4().to_string();
        let mut inserted = false;
        for attempt in 1..=SHORT_CODE_ATTEMPTS {
            let now = Utc::now();
            let short_link = generate_random_code(services.links.short_code_length);
            let model = generated_link::ActiveModel {
                id: Set(id.clone()),
                new_link: Set(new_link.clone()),
                short_link: Set(short_link.clone()),
                clicks: Set(0),
                original_link_id: Set(original.id.clone()),
                user_id: Set(user_id.clone()),
                created_at: Set(now),
                updated_at: Set(now),
            };
            let joins = utm_ids
                .iter()
                .map(|utm_id| generated_link_utm::ActiveModel {
                    generated_link_id: Set(id.clone()),
                    utm_id: Set(utm_id.clone()),
                })
                .collect();

            match services.storage.insert_generated_link(model, joins).await {
                Ok(_) => {
                    info!("Generated link {} -> {}", short_link, new_link);
                    inserted = true;
                    break;
                }
                Err(e) if e.is_conflict() => {
                    debug!("Short code collision on attempt {}: {}", attempt, short_link);
                }
                Err(e) => return Err(e),
            }
        }

        if !inserted {
            warn!("Could not allocate a unique short code after {} attempts", SHORT_CODE_ATTEMPTS);
            return Ok(HandlerResult::failure("Failed to generate a unique short link", 400));
        }

        Ok(
            match services.storage.find_generated_link_with_utms(&id).await? {
                Some(found) => HandlerResult::success(GeneratedLinkDetailsDto {
                    link: GeneratedLinkDto::from_model(found.link, &services.links.public_base_url),
                    utms: found.utms.into_iter().map(UtmDto::from).collect(),
                }),
                None => HandlerResult::failure("Failed to generate link", 400),
            },
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListGeneratedLinks;

#[async_trait]
impl Request for ListGeneratedLinks {
    type Output = Vec<GeneratedLinkDto>;
    const NAME: &'static str = "ListGeneratedLinks";

    async fn handle(
        self,
        services: &Services,
        ctx: &RequestContext,
    ) -> Result<HandlerResult<Vec<GeneratedLinkDto>>> {
        let user_id = services.user_accessor().user_id(ctx)?;
        let links = services.storage.list_generated_links_for_user(user_id).await?;
        let base = &services.links.public_base_url;
        Ok(HandlerResult::success(
            links
                .into_iter()
                .map(|model| GeneratedLinkDto::from_model(model, base))
                .collect(),
        ))
    }
}

#[derive(Debug, Clone)]
pub struct GetGeneratedLink {
    pub id: String,
}

#[async_trait]
impl Request for GetGeneratedLink {
    type Output = GeneratedLinkDetailsDto;
    const NAME: &'static str = "GetGeneratedLink";

    async fn handle(
        self,
        services: &Services,
        ctx: &RequestContext,
    ) -> Result<HandlerResult<GeneratedLinkDetailsDto>> {
        let user_id = services.user_accessor().user_id(ctx)?;

        Ok(
            match services.storage.find_generated_link_with_utms(&self.id).await? {
                Some(found) if found.link.user_id == user_id => {
                    HandlerResult::success(GeneratedLinkDetailsDto {
                        link: GeneratedLinkDto::from_model(
                            found.link,
                            &services.links.public_base_url,
                        ),
                        utms: found.utms.into_iter().map(UtmDto::from).collect(),
                    })
                }
                _ => HandlerResult::not_found("Link not found"),
            },
        )
    }
}

#[derive(Debug, Clone)]
pub struct DeleteGeneratedLink {
    pub id: String,
}

#[async_trait]
impl Request for DeleteGeneratedLink {
    type Output = ();
    const NAME: &'static str = "DeleteGeneratedLink";

    async fn handle(self, services: &Services, ctx: &RequestContext) -> Result<HandlerResult<()>> {
        let user_id = services.user_accessor().user_id(ctx)?;
        if services.storage.delete_generated_link(&self.id, user_id).await? == 0 {
            return Ok(HandlerResult::not_found("Link not found"));
        }
        Ok(HandlerResult::empty())
    }
}

/// Resolve a short code to its target, counting the click
#[derive(Debug, Clone)]
pub struct FollowShortLink {
    pub short_link: String,
}

#[async_trait]
impl Request for FollowShortLink {
    type Output = String;
    const NAME: &'static str = "FollowShortLink";

    fn validate(&self, errors: &mut ValidationErrors) {
        errors
            .field("shortLink", &self.short_link)
            .must(crate::utils::is_valid_short_code, "Invalid short link");
    }

    async fn handle(self, services: &Services, _ctx: &RequestContext) -> Result<HandlerResult<String>> {
        Ok(match services.storage.record_click(&self.short_link).await? {
            Some(target) => HandlerResult::success(target),
            None => HandlerResult::not_found("Link not found"),
        })
    }
}

/// Resolve a short code without counting a click (HEAD requests, link previews)
#[derive(Debug, Clone)]
pub struct PeekShortLink {
    pub short_link: String,
}

#[async_trait]
impl Request for PeekShortLink {
    type Output = String;
    const NAME: &'static str = "PeekShortLink";

    async fn handle(self, services: &Services, _ctx: &RequestContext) -> Result<HandlerResult<String>> {
        Ok(match services.storage.find_short_link_target(&self.short_link).await? {
            Some(target) => HandlerResult::success(target),
            None => HandlerResult::not_found("Link not found"),
        })
    }
}
