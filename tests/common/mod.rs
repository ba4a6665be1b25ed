//! Shared fixtures: a migrated SQLite database in a temp dir, a recording
//! photo store and helpers for users and bearer tokens.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::ActiveValue::Set;
use tempfile::TempDir;
use uuid::Uuid;

use trakerbot::application::core::{LinkSettings, Mediator, RequestContext, Services};
use trakerbot::config::SeedConfig;
use trakerbot::errors::{Result, TrakerError};
use trakerbot::runtime::lifetime::startup::StartupContext;
use trakerbot::security::JwtService;
use trakerbot::security::password::hash_password;
use trakerbot::services::{NoopEmailSender, PhotoService, PhotoUpload, PhotoUploadResult};
use trakerbot::storage::{SeaOrmStorage, normalize_key, seed};

use migration::entities::user;

pub const TEST_SECRET: &str = "integration-test-secret";
pub const TEST_PASSWORD: &str = "Hadouken@69";

/// Photo store double: uploads succeed, every call is recorded
#[derive(Default)]
pub struct RecordingPhotoService {
    pub uploaded: Mutex<Vec<String>>,
    pub deleted: Mutex<Vec<String>>,
    fail_deletes: AtomicBool,
}

impl RecordingPhotoService {
    /// Make every later `delete` report a remote error
    pub fn fail_deletes(&self) {
        self.fail_deletes.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl PhotoService for RecordingPhotoService {
    async fn upload(&self, file: PhotoUpload) -> Result<Option<PhotoUploadResult>> {
        if file.bytes.is_empty() {
            return Ok(None);
        }
        let public_id = format!("photos/{}", Uuid::new_v4());
        self.uploaded.lock().unwrap().push(file.filename);
        Ok(Some(PhotoUploadResult {
            url: format!("https://img.example.com/{}.png", public_id),
            public_id,
        }))
    }

    async fn delete(&self, public_id: &str) -> Result<String> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(TrakerError::photo_service("Resource not found"));
        }
        self.deleted.lock().unwrap().push(public_id.to_string());
        Ok("Photo deleted successfully".to_string())
    }
}

pub struct TestEnv {
    _dir: TempDir,
    pub db_url: String,
    pub storage: Arc<SeaOrmStorage>,
    pub photos: Arc<RecordingPhotoService>,
    pub services: Services,
}

impl TestEnv {
    pub async fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let db_url = format!("sqlite://{}?mode=rwc", dir.path().join("test.db").display());

        let storage = Arc::new(
            SeaOrmStorage::new(&db_url, "sqlite", 1)
                .await
                .expect("failed to create storage"),
        );

        // roles only, no administrator
        seed::seed_data(
            &storage,
            &SeedConfig {
                enabled: true,
                admin_email: "admin@admin.com".to_string(),
                admin_password: String::new(),
            },
        )
        .await
        .expect("failed to seed roles");

        let photos = Arc::new(RecordingPhotoService::default());
        let services = Services {
            storage: storage.clone(),
            photos: photos.clone(),
            email: Arc::new(NoopEmailSender),
            jwt: Arc::new(JwtService::new(TEST_SECRET, 60, 7)),
            links: LinkSettings {
                short_code_length: 8,
                public_base_url: "https://trk.example.com/r".to_string(),
            },
        };

        Self {
            _dir: dir,
            db_url,
            storage,
            photos,
            services,
        }
    }

    pub fn mediator(&self) -> Mediator {
        Mediator::new(self.services.clone())
    }

    pub fn startup(&self) -> StartupContext {
        StartupContext::new(self.services.clone())
    }

    /// Insert a user with the `User` role, returning its id
    pub async fn create_user(&self, email: &str) -> String {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        self.storage
            .insert_user(user::ActiveModel {
                id: Set(id.clone()),
                email: Set(email.to_string()),
                normalized_email: Set(normalize_key(email)),
                password_hash: Set(hash_password(TEST_PASSWORD).unwrap()),
                first_name: Set("Test".to_string()),
                last_name: Set("User".to_string()),
                profile_picture_url: Set(None),
                profile_picture_public_id: Set(None),
                date_of_birth: Set(None),
                email_confirmed: Set(true),
                created_at: Set(now),
                updated_at: Set(now),
            })
            .await
            .expect("failed to insert user");

        let role = self
            .storage
            .find_role_by_name(seed::ROLE_USER)
            .await
            .unwrap()
            .expect("User role seeded");
        self.storage.assign_role(&id, &role.id).await.unwrap();
        id
    }

    pub fn ctx(&self, user_id: &str) -> RequestContext {
        RequestContext::for_user(user_id)
    }

    pub fn bearer(&self, user_id: &str) -> (&'static str, String) {
        let token = self.services.jwt.generate_access_token(user_id).unwrap();
        ("Authorization", format!("Bearer {}", token))
    }
}

/// Full application as served, with the fault translator configured for
/// the given environment
#[macro_export]
macro_rules! init_app {
    ($env:expr) => {
        init_app!($env, true)
    };
    ($env:expr, $development:expr) => {{
        let startup = $env.startup();
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap(trakerbot::api::middleware::ExceptionMiddleware::new($development))
                .wrap(trakerbot::api::middleware::RequestIdMiddleware)
                .configure(|cfg| startup.configure(cfg)),
        )
        .await
    }};
}
