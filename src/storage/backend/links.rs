//! Original / generated link persistence

use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, EntityTrait, ExprTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};
use tracing::trace;

use super::SeaOrmStorage;
use crate::errors::Result;

use migration::entities::{generated_link, generated_link_utm, original_link, utm};

/// Generated link together with the UTMs attached to it
#[derive(Debug, Clone)]
pub struct GeneratedLinkWithUtms {
    pub link: generated_link::Model,
    pub utms: Vec<utm::Model>,
}

impl SeaOrmStorage {
    pub async fn insert_original_link(&self, model: original_link::ActiveModel) -> Result<u64> {
        Ok(original_link::Entity::insert(model)
            .exec_without_returning(&self.db)
            .await?)
    }

    pub async fn find_original_link(&self, id: &str) -> Result<Option<original_link::Model>> {
        Ok(original_link::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await?)
    }

    pub async fn list_original_links_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<original_link::Model>> {
        Ok(original_link::Entity::find()
            .filter(original_link::Column::UserId.eq(user_id))
            .order_by_desc(original_link::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }

    /// Insert a generated link and its UTM associations in one transaction
    pub async fn insert_generated_link(
        &self,
        model: generated_link::ActiveModel,
        utm_links: Vec<generated_link_utm::ActiveModel>,
    ) -> Result<u64> {
        let txn = self.db.begin().await?;

        let rows = generated_link::Entity::insert(model)
            .exec_without_returning(&txn)
            .await?;

        if !utm_links.is_empty() {
            generated_link_utm::Entity::insert_many(utm_links)
                .exec(&txn)
                .await?;
        }

        txn.commit().await?;
        Ok(rows)
    }

    pub async fn find_generated_link(&self, id: &str) -> Result<Option<generated_link::Model>> {
        Ok(generated_link::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await?)
    }

    pub async fn find_generated_link_with_utms(
        &self,
        id: &str,
    ) -> Result<Option<GeneratedLinkWithUtms>> {
        let Some(link) = self.find_generated_link(id).await? else {
            return Ok(None);
        };

        let utm_ids: Vec<String> = generated_link_utm::Entity::find()
            .select_only()
            .column(generated_link_utm::Column::UtmId)
            .filter(generated_link_utm::Column::GeneratedLinkId.eq(id))
            .into_tuple::<String>()
            .all(&self.db)
            .await?;

        let utms = if utm_ids.is_empty() {
            Vec::new()
        } else {
            utm::Entity::find()
                .filter(utm::Column::Id.is_in(utm_ids))
                .order_by_asc(utm::Column::Name)
                .all(&self.db)
                .await?
        };

        Ok(Some(GeneratedLinkWithUtms { link, utms }))
    }

    pub async fn list_generated_links_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<generated_link::Model>> {
        Ok(generated_link::Entity::find()
            .filter(generated_link::Column::UserId.eq(user_id))
            .order_by_desc(generated_link::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }

    pub async fn delete_generated_link(&self, id: &str, user_id: &str) -> Result<u64> {
        let result = generated_link::Entity::delete_many()
            .filter(generated_link::Column::Id.eq(id))
            .filter(generated_link::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }

    /// Bump the click counter of a short link and return its target
    ///
    /// The increment is a single `UPDATE ... SET clicks = clicks + 1`, so
    /// concurrent redirects never lose counts.
    pub async fn record_click(&self, short_link: &str) -> Result<Option<String>> {
        let updated = generated_link::Entity::update_many()
            .col_expr(
                generated_link::Column::Clicks,
                Expr::col(generated_link::Column::Clicks).add(1),
            )
            .filter(generated_link::Column::ShortLink.eq(short_link))
            .exec(&self.db)
            .await?;

        if updated.rows_affected == 0 {
            trace!("Short link not found: {}", short_link);
            return Ok(None);
        }

        self.find_short_link_target(short_link).await
    }

    /// Target of a short link, leaving the click counter alone
    pub async fn find_short_link_target(&self, short_link: &str) -> Result<Option<String>> {
        Ok(generated_link::Entity::find()
            .select_only()
            .column(generated_link::Column::NewLink)
            .filter(generated_link::Column::ShortLink.eq(short_link))
            .into_tuple::<String>()
            .one(&self.db)
            .await?)
    }
}
