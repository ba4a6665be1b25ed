//! Bookmaker persistence

use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{ActiveModelTrait, EntityTrait, ExprTrait, QueryFilter, QueryOrder};

use super::SeaOrmStorage;
use crate::errors::Result;

use migration::entities::bookmaker;

const LIKE_ESCAPE: char = '\\';

fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

impl SeaOrmStorage {
    /// Insert a new bookmaker, returning the number of rows written
    pub async fn insert_bookmaker(&self, model: bookmaker::ActiveModel) -> Result<u64> {
        let rows = bookmaker::Entity::insert(model)
            .exec_without_returning(&self.db)
            .await?;
        Ok(rows)
    }

    pub async fn update_bookmaker(&self, model: bookmaker::ActiveModel) -> Result<bookmaker::Model> {
        Ok(model.update(&self.db).await?)
    }

    /// Delete a bookmaker; affiliate codes go with it (cascade)
    pub async fn delete_bookmaker(&self, id: &str) -> Result<u64> {
        let result = bookmaker::Entity::delete_by_id(id.to_string())
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }

    pub async fn find_bookmaker(&self, id: &str) -> Result<Option<bookmaker::Model>> {
        Ok(bookmaker::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await?)
    }

    /// Case-insensitive exact name lookup
    pub async fn find_bookmaker_by_name(&self, name: &str) -> Result<Option<bookmaker::Model>> {
        Ok(bookmaker::Entity::find()
            .filter(
                Expr::expr(Func::lower(Expr::col(bookmaker::Column::Name)))
                    .eq(name.trim().to_lowercase()),
            )
            .one(&self.db)
            .await?)
    }

    /// Case-insensitive substring search on the name
    ///
    /// `%` and `_` in the query match themselves, not any text.
    pub async fn search_bookmakers(&self, query: &str) -> Result<Vec<bookmaker::Model>> {
        let pattern = format!("%{}%", escape_like(&query.trim().to_lowercase()));
        Ok(bookmaker::Entity::find()
            .filter(
                Expr::expr(Func::lower(Expr::col(bookmaker::Column::Name)))
                    .like(LikeExpr::new(pattern).escape(LIKE_ESCAPE)),
            )
            .order_by_asc(bookmaker::Column::Name)
            .all(&self.db)
            .await?)
    }

    pub async fn list_bookmakers(&self) -> Result<Vec<bookmaker::Model>> {
        Ok(bookmaker::Entity::find()
            .order_by_asc(bookmaker::Column::Name)
            .all(&self.db)
            .await?)
    }
}
