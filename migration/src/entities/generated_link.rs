use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "generated_links")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Original URL rewritten with the attached UTM parameters
    #[sea_orm(column_type = "Text")]
    pub new_link: String,
    #[sea_orm(unique)]
    pub short_link: String,
    pub clicks: i64,
    pub original_link_id: String,
    pub user_id: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::original_link::Entity",
        from = "Column::OriginalLinkId",
        to = "super::original_link::Column::Id",
        on_delete = "Cascade"
    )]
    OriginalLink,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(has_many = "super::generated_link_utm::Entity")]
    GeneratedLinkUtm,
}

impl Related<super::original_link::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OriginalLink.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::generated_link_utm::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GeneratedLinkUtm.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
