use actix_web::{HttpResponse, Responder, web};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, trace};

use crate::storage::SeaOrmStorage;

// 应用启动时间
#[derive(Clone, Debug)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub uptime: u64,
    pub database: DatabaseCheck,
    pub response_time_ms: u64,
}

#[derive(Debug, Serialize)]
pub struct DatabaseCheck {
    pub status: &'static str,
    pub backend: String,
    pub error: Option<String>,
}

/// Health Service
///
/// Talks to storage directly; a health check must not depend on the request pipeline.
pub struct HealthService;

impl HealthService {
    pub async fn health_check(
        storage: web::Data<Arc<SeaOrmStorage>>,
        app_start_time: web::Data<AppStartTime>,
    ) -> impl Responder {
        let start_time = Instant::now();
        trace!("Received health check request");

        let (status, error) = match tokio::time::timeout(Duration::from_secs(5), storage.ping()).await {
            Ok(Ok(())) => ("healthy", None),
            Ok(Err(e)) => {
                error!("Database health check failed: {}", e);
                ("unhealthy", Some(format!("database error: {}", e)))
            }
            Err(_) => {
                error!("Database health check timeout");
                ("unhealthy", Some("timeout".to_string()))
            }
        };

        let now = chrono::Utc::now();
        let body = HealthResponse {
            status,
            timestamp: now.to_rfc3339(),
            uptime: (now - app_start_time.start_datetime).num_seconds().max(0) as u64,
            database: DatabaseCheck {
                status,
                backend: storage.backend_name().to_string(),
                error,
            },
            response_time_ms: start_time.elapsed().as_millis() as u64,
        };

        let mut response = if status == "healthy" {
            HttpResponse::Ok()
        } else {
            HttpResponse::ServiceUnavailable()
        };
        response.json(body)
    }

    // 活跃性检查
    pub async fn liveness_check() -> impl Responder {
        trace!("Received liveness check request");
        HttpResponse::NoContent().finish()
    }
}

pub fn health_routes() -> actix_web::Scope {
    web::scope("/health")
        .route("", web::get().to(HealthService::health_check))
        .route("", web::head().to(HealthService::health_check))
        .route("/live", web::get().to(HealthService::liveness_check))
}
