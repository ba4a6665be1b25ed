//! Initial data: default roles and the administrator account.
//!
//! Every step checks before writing, so running it repeatedly is harmless.

use chrono::Utc;
use sea_orm::ActiveValue::Set;
use tracing::{info, warn};
use uuid::Uuid;

use super::{SeaOrmStorage, normalize_key};
use crate::config::SeedConfig;
use crate::errors::Result;
use crate::security::password::hash_password;

use migration::entities::{role, user};

pub const ROLE_ADMIN: &str = "Admin";
pub const ROLE_USER: &str = "User";
pub const ROLE_EXPERT: &str = "Expert";

const DEFAULT_ROLES: [&str; 3] = [ROLE_ADMIN, ROLE_USER, ROLE_EXPERT];

pub async fn seed_data(storage: &SeaOrmStorage, config: &SeedConfig) -> Result<()> {
    if storage.count_roles().await? == 0 {
        for name in DEFAULT_ROLES {
            let now = Utc::now();
            storage
                .insert_role(role::ActiveModel {
                    id: Set(Uuid::new_v4().to_string()),
                    name: Set(name.to_string()),
                    normalized_name: Set(normalize_key(name)),
                    created_at: Set(now),
                    updated_at: Set(now),
                })
                .await?;
        }
        info!("Seeded {} default roles", DEFAULT_ROLES.len());
    }

    if storage.count_users().await? == 0 {
        if config.admin_password.is_empty() {
            warn!("seed.admin_password is empty, skipping administrator account");
        } else {
            let now = Utc::now();
            storage
                .insert_user(user::ActiveModel {
                    id: Set(Uuid::new_v4().to_string()),
                    email: Set(config.admin_email.clone()),
                    normalized_email: Set(normalize_key(&config.admin_email)),
                    password_hash: Set(hash_password(&config.admin_password)?),
                    first_name: Set("Admin".to_string()),
                    last_name: Set("Admin".to_string()),
                    profile_picture_url: Set(None),
                    profile_picture_public_id: Set(None),
                    date_of_birth: Set(None),
                    email_confirmed: Set(true),
                    created_at: Set(now),
                    updated_at: Set(now),
                })
                .await?;
            info!("Seeded administrator account {}", config.admin_email);
        }
    }

    if let (Some(admin), Some(admin_role)) = (
        storage.find_user_by_email(&config.admin_email).await?,
        storage.find_role_by_name(ROLE_ADMIN).await?,
    ) && !storage.has_role(&admin.id, &admin_role.id).await?
    {
        storage.assign_role(&admin.id, &admin_role.id).await?;
        info!("Assigned {} role to {}", ROLE_ADMIN, admin.email);
    }

    Ok(())
}
