use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "bookmakers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub name: String,
    pub logo_url: Option<String>,
    /// Photo store identifier of the current logo, used to delete it on replacement
    pub logo_public_id: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::affiliate_code::Entity")]
    AffiliateCode,
}

impl Related<super::affiliate_code::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AffiliateCode.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
