//! Telegram account endpoints, also used by the bot itself

use actix_web::{HttpResponse, Scope, web};

use super::helpers::handle_result;
use crate::api::ApiError;
use crate::application::core::{Mediator, RequestContext};
use crate::application::telegrams::{
    GetTelegramByPlatformId, LinkTelegram, LinkTelegramDto, ListMyTelegrams, UnlinkTelegram,
};

pub async fn list_telegrams(
    mediator: web::Data<Mediator>,
    ctx: RequestContext,
) -> Result<HttpResponse, ApiError> {
    let result = mediator.send(ListMyTelegrams, &ctx).await?;
    Ok(handle_result(result))
}

pub async fn link_telegram(
    mediator: web::Data<Mediator>,
    ctx: RequestContext,
    body: web::Json<LinkTelegramDto>,
) -> Result<HttpResponse, ApiError> {
    let result = mediator
        .send(LinkTelegram { dto: body.into_inner() }, &ctx)
        .await?;
    Ok(handle_result(result))
}

pub async fn get_by_telegram_id(
    mediator: web::Data<Mediator>,
    ctx: RequestContext,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let result = mediator
        .send(GetTelegramByPlatformId { telegram_id: path.into_inner() }, &ctx)
        .await?;
    Ok(handle_result(result))
}

pub async fn unlink_telegram(
    mediator: web::Data<Mediator>,
    ctx: RequestContext,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let result = mediator
        .send(UnlinkTelegram { id: path.into_inner() }, &ctx)
        .await?;
    Ok(handle_result(result))
}

pub fn telegrams_routes() -> Scope {
    web::scope("/telegrams")
        .route("", web::get().to(list_telegrams))
        .route("", web::post().to(link_telegram))
        .route("/by-telegram-id/{telegram_id}", web::get().to(get_by_telegram_id))
        .route("/{id}", web::delete().to(unlink_telegram))
}
