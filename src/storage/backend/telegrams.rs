use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};

use super::SeaOrmStorage;
use crate::errors::Result;

use migration::entities::telegram;

impl SeaOrmStorage {
    pub async fn insert_telegram(&self, model: telegram::ActiveModel) -> Result<u64> {
        Ok(telegram::Entity::insert(model)
            .exec_without_returning(&self.db)
            .await?)
    }

    pub async fn find_telegram(&self, id: &str) -> Result<Option<telegram::Model>> {
        Ok(telegram::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await?)
    }

    /// Lookup by the Telegram platform id (not the row id)
    pub async fn find_telegram_by_platform_id(
        &self,
        telegram_id: &str,
    ) -> Result<Option<telegram::Model>> {
        Ok(telegram::Entity::find()
            .filter(telegram::Column::TelegramId.eq(telegram_id))
            .one(&self.db)
            .await?)
    }

    pub async fn list_telegrams_for_user(&self, user_id: &str) -> Result<Vec<telegram::Model>> {
        Ok(telegram::Entity::find()
            .filter(telegram::Column::UserId.eq(user_id))
            .order_by_asc(telegram::Column::Username)
            .all(&self.db)
            .await?)
    }

    pub async fn delete_telegram(&self, id: &str, user_id: &str) -> Result<u64> {
        let result = telegram::Entity::delete_many()
            .filter(telegram::Column::Id.eq(id))
            .filter(telegram::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }
}
