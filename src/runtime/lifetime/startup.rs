//! Start-up wiring
//!
//! Builds the dependency graph once (storage, collaborators, mediator) and
//! hands it to the HTTP layer explicitly.

use std::sync::Arc;

use actix_web::web;
use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::api::services::helpers::json_config;
use crate::api::services::{AppStartTime, api_routes, health_routes, redirect_routes};
use crate::application::core::{LinkSettings, Mediator, Services};
use crate::config::StaticConfig;
use crate::security::JwtService;
use crate::services::{NoopEmailSender, build_photo_service};
use crate::storage::{SeaOrmStorage, StorageFactory, seed};

/// 请求体大小上限（图片上传走 multipart，不受此限制）
const JSON_PAYLOAD_LIMIT: usize = 1024 * 1024;

/// Everything the HTTP workers share
#[derive(Clone)]
pub struct StartupContext {
    pub storage: Arc<SeaOrmStorage>,
    pub jwt: Arc<JwtService>,
    pub mediator: web::Data<Mediator>,
    pub start_time: AppStartTime,
}

impl StartupContext {
    pub fn new(services: Services) -> Self {
        Self {
            storage: services.storage.clone(),
            jwt: services.jwt.clone(),
            mediator: web::Data::new(Mediator::new(services)),
            start_time: AppStartTime {
                start_datetime: chrono::Utc::now(),
            },
        }
    }

    /// Register shared state and every route on an `App`
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.mediator.clone())
            .app_data(web::Data::new(self.storage.clone()))
            .app_data(web::Data::new(self.jwt.clone()))
            .app_data(web::Data::new(self.start_time.clone()))
            .app_data(json_config().limit(JSON_PAYLOAD_LIMIT))
            .service(health_routes())
            .service(api_routes())
            .service(redirect_routes());
    }
}

/// Collaborators and settings built from configuration
pub fn build_services(storage: Arc<SeaOrmStorage>, config: &StaticConfig) -> Services {
    Services {
        storage,
        photos: build_photo_service(&config.photos),
        email: Arc::new(NoopEmailSender),
        jwt: Arc::new(JwtService::from_config(&config.auth)),
        links: LinkSettings {
            short_code_length: config.links.short_code_length,
            public_base_url: config.links.public_base_url.clone(),
        },
    }
}

/// Connect (running migrations), seed and build the shared context
pub async fn prepare_server_startup(config: &StaticConfig) -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let storage = StorageFactory::create(&config.database)
        .await
        .context("Failed to create storage backend")?;
    info!("Using storage backend: {}", storage.backend_name());

    if config.seed.enabled {
        seed::seed_data(&storage, &config.seed)
            .await
            .context("Failed to seed initial data")?;
    }

    let context = StartupContext::new(build_services(storage, config));

    info!("Pre-startup completed in {:?}", start_time.elapsed());
    Ok(context)
}
