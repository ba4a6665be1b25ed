use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};

use super::SeaOrmStorage;
use crate::errors::Result;

use migration::entities::utm;

impl SeaOrmStorage {
    pub async fn insert_utm(&self, model: utm::ActiveModel) -> Result<u64> {
        Ok(utm::Entity::insert(model)
            .exec_without_returning(&self.db)
            .await?)
    }

    pub async fn find_utm(&self, id: &str) -> Result<Option<utm::Model>> {
        Ok(utm::Entity::find_by_id(id.to_string()).one(&self.db).await?)
    }

    pub async fn list_utms_for_user(&self, user_id: &str) -> Result<Vec<utm::Model>> {
        Ok(utm::Entity::find()
            .filter(utm::Column::UserId.eq(user_id))
            .order_by_asc(utm::Column::Name)
            .all(&self.db)
            .await?)
    }

    /// UTMs from `ids` that belong to `user_id`
    pub async fn find_user_utms(&self, user_id: &str, ids: &[String]) -> Result<Vec<utm::Model>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        Ok(utm::Entity::find()
            .filter(utm::Column::UserId.eq(user_id))
            .filter(utm::Column::Id.is_in(ids.iter().cloned()))
            .all(&self.db)
            .await?)
    }

    pub async fn delete_utm(&self, id: &str, user_id: &str) -> Result<u64> {
        let result = utm::Entity::delete_many()
            .filter(utm::Column::Id.eq(id))
            .filter(utm::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }
}
