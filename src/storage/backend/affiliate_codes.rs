use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};

use super::SeaOrmStorage;
use crate::errors::Result;

use migration::entities::affiliate_code;

impl SeaOrmStorage {
    pub async fn insert_affiliate_code(&self, model: affiliate_code::ActiveModel) -> Result<u64> {
        Ok(affiliate_code::Entity::insert(model)
            .exec_without_returning(&self.db)
            .await?)
    }

    pub async fn find_affiliate_code(&self, id: &str) -> Result<Option<affiliate_code::Model>> {
        Ok(affiliate_code::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await?)
    }

    pub async fn list_affiliate_codes_for_bookmaker(
        &self,
        bookmaker_id: &str,
    ) -> Result<Vec<affiliate_code::Model>> {
        Ok(affiliate_code::Entity::find()
            .filter(affiliate_code::Column::BookmakerId.eq(bookmaker_id))
            .order_by_asc(affiliate_code::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }

    pub async fn list_affiliate_codes_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<affiliate_code::Model>> {
        Ok(affiliate_code::Entity::find()
            .filter(affiliate_code::Column::UserId.eq(user_id))
            .order_by_desc(affiliate_code::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }

    /// Delete only when owned by `user_id`; returns rows removed
    pub async fn delete_affiliate_code(&self, id: &str, user_id: &str) -> Result<u64> {
        let result = affiliate_code::Entity::delete_many()
            .filter(affiliate_code::Column::Id.eq(id))
            .filter(affiliate_code::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }
}
