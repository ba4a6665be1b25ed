//! Schema rules and seeding against a real SQLite file

mod common;

use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use uuid::Uuid;

use common::TestEnv;
use trakerbot::config::SeedConfig;
use trakerbot::storage::{normalize_key, seed};

use migration::entities::{
    affiliate_code, bookmaker, generated_link, generated_link_utm, original_link, telegram, utm,
};

async fn insert_bookmaker(env: &TestEnv, name: &str) -> String {
    let id = Uuid::new_v4().to_string();
    let now = Utc::now();
    env.storage
        .insert_bookmaker(bookmaker::ActiveModel {
            id: Set(id.clone()),
            name: Set(name.to_string()),
            logo_url: Set(None),
            logo_public_id: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        })
        .await
        .unwrap();
    id
}

/// A user owning an original link and one generated link tagged with one UTM
async fn insert_tracked_link(env: &TestEnv, user_id: &str) {
    let now = Utc::now();
    env.storage
        .insert_original_link(original_link::ActiveModel {
            id: Set("origin-1".to_string()),
            url: Set("https://bet.example.com/promo".to_string()),
            user_id: Set(Some(user_id.to_string())),
            created_at: Set(now),
            updated_at: Set(now),
        })
        .await
        .unwrap();
    env.storage
        .insert_utm(utm::ActiveModel {
            id: Set("utm-tg".to_string()),
            name: Set("channel".to_string()),
            value: Set("telegram".to_string()),
            source: Set(Some("tg".to_string())),
            medium: Set(None),
            campaign: Set(None),
            user_id: Set(Some(user_id.to_string())),
            created_at: Set(now),
            updated_at: Set(now),
        })
        .await
        .unwrap();
    env.storage
        .insert_generated_link(
            generated_link::ActiveModel {
                id: Set("gen-1".to_string()),
                new_link: Set("https://bet.example.com/promo?utm_source=tg".to_string()),
                short_link: Set("AbCdEfGh".to_string()),
                clicks: Set(0),
                original_link_id: Set("origin-1".to_string()),
                user_id: Set(user_id.to_string()),
                created_at: Set(now),
                updated_at: Set(now),
            },
            vec![generated_link_utm::ActiveModel {
                generated_link_id: Set("gen-1".to_string()),
                utm_id: Set("utm-tg".to_string()),
            }],
        )
        .await
        .unwrap();

    assert!(env.storage.find_generated_link("gen-1").await.unwrap().is_some());
    assert_eq!(join_rows(env).await, 1);
}

async fn join_rows(env: &TestEnv) -> u64 {
    generated_link_utm::Entity::find()
        .filter(generated_link_utm::Column::GeneratedLinkId.eq("gen-1"))
        .count(env.storage.get_db())
        .await
        .unwrap()
}

#[actix_rt::test]
async fn test_deleting_user_removes_generated_links() {
    let env = TestEnv::new().await;
    let user_id = env.create_user("owner@example.com").await;
    insert_tracked_link(&env, &user_id).await;

    assert_eq!(env.storage.delete_user(&user_id).await.unwrap(), 1);

    assert!(env.storage.find_generated_link("gen-1").await.unwrap().is_none());
    assert_eq!(join_rows(&env).await, 0);
    // the tagged UTM and the original link are only detached
    let utm = env.storage.find_utm("utm-tg").await.unwrap().unwrap();
    assert_eq!(utm.user_id, None);
    assert!(env.storage.find_original_link("origin-1").await.unwrap().is_some());
}

#[actix_rt::test]
async fn test_deleting_original_link_removes_generated_links() {
    let env = TestEnv::new().await;
    let user_id = env.create_user("owner@example.com").await;
    insert_tracked_link(&env, &user_id).await;

    let deleted = original_link::Entity::delete_by_id("origin-1".to_string())
        .exec(env.storage.get_db())
        .await
        .unwrap();
    assert_eq!(deleted.rows_affected, 1);

    assert!(env.storage.find_generated_link("gen-1").await.unwrap().is_none());
    assert_eq!(join_rows(&env).await, 0);
    assert!(env.storage.find_utm("utm-tg").await.unwrap().is_some());
    assert!(env.storage.find_user(&user_id).await.unwrap().is_some());
}

#[actix_rt::test]
async fn test_seeding_twice_is_harmless() {
    let env = TestEnv::new().await;
    let config = SeedConfig {
        enabled: true,
        admin_email: "admin@admin.com".to_string(),
        admin_password: "Hadouken@69".to_string(),
    };

    seed::seed_data(&env.storage, &config).await.unwrap();
    seed::seed_data(&env.storage, &config).await.unwrap();

    assert_eq!(env.storage.count_roles().await.unwrap(), 3);
    assert_eq!(env.storage.count_users().await.unwrap(), 1);

    let admin = env
        .storage
        .find_user_by_email("ADMIN@admin.com")
        .await
        .unwrap()
        .unwrap();
    let role = env
        .storage
        .find_role_by_name(seed::ROLE_ADMIN)
        .await
        .unwrap()
        .unwrap();
    assert!(env.storage.has_role(&admin.id, &role.id).await.unwrap());
}

#[actix_rt::test]
async fn test_deleting_user_keeps_shared_rows() {
    let env = TestEnv::new().await;
    let user_id = env.create_user("leaver@example.com").await;
    let bookmaker_id = insert_bookmaker(&env, "Betsson").await;
    let now = Utc::now();

    env.storage
        .insert_affiliate_code(affiliate_code::ActiveModel {
            id: Set("code-1".to_string()),
            code: Set("AFF".to_string()),
            user_id: Set(Some(user_id.clone())),
            bookmaker_id: Set(Some(bookmaker_id.clone())),
            created_at: Set(now),
            updated_at: Set(now),
        })
        .await
        .unwrap();
    env.storage
        .insert_original_link(original_link::ActiveModel {
            id: Set("link-1".to_string()),
            url: Set("https://bet.example.com/".to_string()),
            user_id: Set(Some(user_id.clone())),
            created_at: Set(now),
            updated_at: Set(now),
        })
        .await
        .unwrap();
    env.storage
        .insert_utm(utm::ActiveModel {
            id: Set("utm-1".to_string()),
            name: Set("src".to_string()),
            value: Set("tg".to_string()),
            source: Set(None),
            medium: Set(None),
            campaign: Set(None),
            user_id: Set(Some(user_id.clone())),
            created_at: Set(now),
            updated_at: Set(now),
        })
        .await
        .unwrap();
    env.storage
        .insert_telegram(telegram::ActiveModel {
            id: Set("tg-1".to_string()),
            telegram_id: Set("1001".to_string()),
            username: Set("leaver".to_string()),
            user_id: Set(Some(user_id.clone())),
            created_at: Set(now),
            updated_at: Set(now),
        })
        .await
        .unwrap();

    assert_eq!(env.storage.delete_user(&user_id).await.unwrap(), 1);

    let code = env.storage.find_affiliate_code("code-1").await.unwrap().unwrap();
    assert_eq!(code.user_id, None);
    assert_eq!(code.bookmaker_id.as_deref(), Some(bookmaker_id.as_str()));

    let link = env.storage.find_original_link("link-1").await.unwrap().unwrap();
    assert_eq!(link.user_id, None);
    let utm = env.storage.find_utm("utm-1").await.unwrap().unwrap();
    assert_eq!(utm.user_id, None);
    let account = env.storage.find_telegram("tg-1").await.unwrap().unwrap();
    assert_eq!(account.user_id, None);
    assert!(env.storage.find_role_assignment(&user_id).await.unwrap().is_none());
}

#[actix_rt::test]
async fn test_bookmaker_name_is_unique() {
    let env = TestEnv::new().await;
    insert_bookmaker(&env, "Bwin").await;

    let now = Utc::now();
    let err = env
        .storage
        .insert_bookmaker(bookmaker::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            name: Set("Bwin".to_string()),
            logo_url: Set(None),
            logo_public_id: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        })
        .await
        .unwrap_err();
    assert!(err.is_conflict());
}

#[actix_rt::test]
async fn test_health_ping() {
    let env = TestEnv::new().await;
    env.storage.ping().await.unwrap();
    assert_eq!(env.storage.backend_name(), "sqlite");
    assert_eq!(normalize_key("Admin@Admin.com"), "ADMIN@ADMIN.COM");
}
