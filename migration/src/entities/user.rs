//! Identity principal. Credentials live on the same row (one set per user).

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub email: String,
    #[sea_orm(unique)]
    pub normalized_email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub profile_picture_url: Option<String>,
    pub profile_picture_public_id: Option<String>,
    pub date_of_birth: Option<Date>,
    pub email_confirmed: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::telegram::Entity")]
    Telegram,
    #[sea_orm(has_many = "super::original_link::Entity")]
    OriginalLink,
    #[sea_orm(has_many = "super::generated_link::Entity")]
    GeneratedLink,
    #[sea_orm(has_many = "super::utm::Entity")]
    Utm,
    #[sea_orm(has_many = "super::user_role::Entity")]
    UserRole,
}

impl Related<super::telegram::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Telegram.def()
    }
}

impl Related<super::original_link::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OriginalLink.def()
    }
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

impl Related<super::user_role::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserRole.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
