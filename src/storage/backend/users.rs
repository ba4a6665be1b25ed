//! Identity persistence: users, roles and role assignments

use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter,
};

use super::SeaOrmStorage;
use crate::errors::Result;

use migration::entities::{role, user, user_role};

/// Normalized form used for unique lookups (emails, role names)
pub fn normalize_key(value: &str) -> String {
    value.trim().to_uppercase()
}

impl SeaOrmStorage {
    pub async fn insert_user(&self, model: user::ActiveModel) -> Result<u64> {
        Ok(user::Entity::insert(model)
            .exec_without_returning(&self.db)
            .await?)
    }

    pub async fn update_user(&self, model: user::ActiveModel) -> Result<user::Model> {
        Ok(model.update(&self.db).await?)
    }

    pub async fn delete_user(&self, id: &str) -> Result<u64> {
        let result = user::Entity::delete_by_id(id.to_string())
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }

    pub async fn find_user(&self, id: &str) -> Result<Option<user::Model>> {
        Ok(user::Entity::find_by_id(id.to_string()).one(&self.db).await?)
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<user::Model>> {
        Ok(user::Entity::find()
            .filter(user::Column::NormalizedEmail.eq(normalize_key(email)))
            .one(&self.db)
            .await?)
    }

    pub async fn count_users(&self) -> Result<u64> {
        Ok(user::Entity::find().count(&self.db).await?)
    }

    pub async fn count_roles(&self) -> Result<u64> {
        Ok(role::Entity::find().count(&self.db).await?)
    }

    pub async fn insert_role(&self, model: role::ActiveModel) -> Result<u64> {
        Ok(role::Entity::insert(model)
            .exec_without_returning(&self.db)
            .await?)
    }

    pub async fn find_role(&self, id: &str) -> Result<Option<role::Model>> {
        Ok(role::Entity::find_by_id(id.to_string()).one(&self.db).await?)
    }

    pub async fn find_role_by_name(&self, name: &str) -> Result<Option<role::Model>> {
        Ok(role::Entity::find()
            .filter(role::Column::NormalizedName.eq(normalize_key(name)))
            .one(&self.db)
            .await?)
    }

    /// First role assignment row of a user, if any
    pub async fn find_role_assignment(&self, user_id: &str) -> Result<Option<user_role::Model>> {
        Ok(user_role::Entity::find()
            .filter(user_role::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?)
    }

    pub async fn has_role(&self, user_id: &str, role_id: &str) -> Result<bool> {
        let found = user_role::Entity::find_by_id((user_id.to_string(), role_id.to_string()))
            .one(&self.db)
            .await?;
        Ok(found.is_some())
    }

    pub async fn assign_role(&self, user_id: &str, role_id: &str) -> Result<()> {
        let model = user_role::ActiveModel {
            user_id: Set(user_id.to_string()),
            role_id: Set(role_id.to_string()),
        };
        user_role::Entity::insert(model)
            .exec_without_returning(&self.db)
            .await?;
        Ok(())
    }
}
