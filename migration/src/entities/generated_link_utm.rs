//! Join table between generated links and UTMs

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "generated_link_utms")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub generated_link_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub utm_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::generated_link::Entity",
        from = "Column::GeneratedLinkId",
        to = "super::generated_link::Column::Id",
        on_delete = "Cascade"
    )]
    GeneratedLink,
    #[sea_orm(
        belongs_to = "super::utm::Entity",
        from = "Column::UtmId",
        to = "super::utm::Column::Id",
        on_delete = "Cascade"
    )]
    Utm,
}

impl Related<super::generated_link::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GeneratedLink.def()
    }
}

impl Related<super::utm::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Utm.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
