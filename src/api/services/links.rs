//! Original and generated link endpoints

use actix_web::{HttpResponse, Scope, web};
use tracing::info;

use super::helpers::handle_result;
use crate::api::ApiError;
use crate::application::core::{Mediator, RequestContext};
use crate::application::links::{
    CreateOriginalLink, CreateOriginalLinkDto, DeleteGeneratedLink, GenerateLink,
    GenerateLinkDto, GetGeneratedLink, ListGeneratedLinks, ListOriginalLinks,
};

pub async fn list_original_links(
    mediator: web::Data<Mediator>,
    ctx: RequestContext,
) -> Result<HttpResponse, ApiError> {
    let result = mediator.send(ListOriginalLinks, &ctx).await?;
    Ok(handle_result(result))
}

pub async fn create_original_link(
    mediator: web::Data<Mediator>,
    ctx: RequestContext,
    body: web::Json<CreateOriginalLinkDto>,
) -> Result<HttpResponse, ApiError> {
    let result = mediator
        .send(CreateOriginalLink { dto: body.into_inner() }, &ctx)
        .await?;
    Ok(handle_result(result))
}

pub async fn list_generated_links(
    mediator: web::Data<Mediator>,
    ctx: RequestContext,
) -> Result<HttpResponse, ApiError> {
    let result = mediator.send(ListGeneratedLinks, &ctx).await?;
    Ok(handle_result(result))
}

pub async fn generate_link(
    mediator: web::Data<Mediator>,
    ctx: RequestContext,
    body: web::Json<GenerateLinkDto>,
) -> Result<HttpResponse, ApiError> {
    info!(
        "Generate link request for original {} with {} UTM(s)",
        body.original_link_id,
        body.utm_ids.len()
    );
    let result = mediator
        .send(GenerateLink { dto: body.into_inner() }, &ctx)
        .await?;
    Ok(handle_result(result))
}

pub async fn get_generated_link(
    mediator: web::Data<Mediator>,
    ctx: RequestContext,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let result = mediator
        .send(GetGeneratedLink { id: path.into_inner() }, &ctx)
        .await?;
    Ok(handle_result(result))
}

pub async fn delete_generated_link(
    mediator: web::Data<Mediator>,
    ctx: RequestContext,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let result = mediator
        .send(DeleteGeneratedLink { id: path.into_inner() }, &ctx)
        .await?;
    Ok(handle_result(result))
}

pub fn links_routes() -> Scope {
    web::scope("/links")
        .route("", web::get().to(list_generated_links))
        .route("", web::post().to(generate_link))
        .route("/original", web::get().to(list_original_links))
        .route("/original", web::post().to(create_original_link))
        .route("/{id}", web::get().to(get_generated_link))
        .route("/{id}", web::delete().to(delete_generated_link))
}
