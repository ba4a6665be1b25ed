use async_trait::async_trait;

use super::dto::BookmakerDto;
use super::validation::NAME_MAX_LENGTH;
use crate::application::core::{
    HandlerResult, Request, RequestContext, Services, ValidationErrors,
};
use crate::errors::Result;

#[derive(Debug, Clone)]
pub struct GetBookmaker {
    pub id: String,
}

#[async_trait]
impl Request for GetBookmaker {
    type Output = BookmakerDto;
    const NAME: &'static str = "GetBookmaker";

    async fn handle(self, services: &Services, _ctx: &RequestContext) -> Result<HandlerResult<BookmakerDto>> {
        Ok(match services.storage.find_bookmaker(&self.id).await? {
            Some(model) => HandlerResult::success(model.into()),
            None => HandlerResult::not_found("Bookmaker not found"),
        })
    }
}

/// Case-insensitive exact match, used by the Telegram bot to check a house
#[derive(Debug, Clone)]
pub struct GetBookmakerByName {
    pub name: String,
}

#[async_trait]
impl Request for GetBookmakerByName {
    type Output = BookmakerDto;
    const NAME: &'static str = "GetBookmakerByName";

    fn validate(&self, errors: &mut ValidationErrors) {
        errors
            .field("name", &self.name)
            .not_empty("Name is required")
            .max_length(NAME_MAX_LENGTH, "Name must not exceed 100 characters");
    }

    async fn handle(self, services: &Services, _ctx: &RequestContext) -> Result<HandlerResult<BookmakerDto>> {
        Ok(match services.storage.find_bookmaker_by_name(&self.name).await? {
            Some(model) => HandlerResult::success(model.into()),
            None => HandlerResult::not_found("Bookmaker not found"),
        })
    }
}

#[derive(Debug, Clone)]
pub struct SearchBookmakers {
    pub query: String,
}

#[async_trait]
impl Request for SearchBookmakers {
    type Output = Vec<BookmakerDto>;
    const NAME: &'static str = "SearchBookmakers";

    fn validate(&self, errors: &mut ValidationErrors) {
        errors
            .field("q", &self.query)
            .not_empty("Search query is required")
            .max_length(NAME_MAX_LENGTH, "Search query must not exceed 100 characters");
    }

    async fn handle(
        self,
        services: &Services,
        _ctx: &RequestContext,
    ) -> Result<HandlerResult<Vec<BookmakerDto>>> {
        let found = services.storage.search_bookmakers(&self.query).await?;
        Ok(HandlerResult::success(
            found.into_iter().map(BookmakerDto::from).collect(),
        ))
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListBookmakers;

#[async_trait]
impl Request for ListBookmakers {
    type Output = Vec<BookmakerDto>;
    const NAME: &'static str = "ListBookmakers";

    async fn handle(
        self,
        services: &Services,
        _ctx: &RequestContext,
    ) -> Result<HandlerResult<Vec<BookmakerDto>>> {
        let all = services.storage.list_bookmakers().await?;
        Ok(HandlerResult::success(
            all.into_iter().map(BookmakerDto::from).collect(),
        ))
    }
}
