use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use migration::entities::bookmaker;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookmakerDto {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub logo_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookmakerDto {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub logo_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmakerDto {
    pub id: String,
    pub name: String,
    pub logo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<bookmaker::Model> for BookmakerDto {
    fn from(model: bookmaker::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            logo_url: model.logo_url,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
