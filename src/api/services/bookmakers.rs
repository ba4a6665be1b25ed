//! Bookmaker endpoints

use actix_multipart::Multipart;
use actix_web::{HttpResponse, Scope, web};
use serde::Deserialize;
use tracing::{info, trace};

use super::helpers::{handle_result, read_photo_upload};
use crate::api::ApiError;
use crate::application::affiliate_codes::{
    CreateAffiliateCode, CreateAffiliateCodeDto, ListBookmakerAffiliateCodes,
};
use crate::application::bookmakers::{
    CreateBookmaker, CreateBookmakerDto, DeleteBookmaker, GetBookmaker, GetBookmakerByName,
    ListBookmakers, SearchBookmakers, UpdateBookmaker, UpdateBookmakerDto, UploadBookmakerLogo,
};
use crate::application::core::{Mediator, RequestContext};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

pub async fn list_bookmakers(
    mediator: web::Data<Mediator>,
    ctx: RequestContext,
) -> Result<HttpResponse, ApiError> {
    trace!("Listing bookmakers");
    let result = mediator.send(ListBookmakers, &ctx).await?;
    Ok(handle_result(result))
}

pub async fn create_bookmaker(
    mediator: web::Data<Mediator>,
    ctx: RequestContext,
    body: web::Json<CreateBookmakerDto>,
) -> Result<HttpResponse, ApiError> {
    info!("Create bookmaker request: {}", body.name);
    let result = mediator
        .send(CreateBookmaker { dto: body.into_inner() }, &ctx)
        .await?;
    Ok(handle_result(result))
}

pub async fn search_bookmakers(
    mediator: web::Data<Mediator>,
    ctx: RequestContext,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse, ApiError> {
    let result = mediator
        .send(SearchBookmakers { query: query.into_inner().q }, &ctx)
        .await?;
    Ok(handle_result(result))
}

pub async fn get_bookmaker_by_name(
    mediator: web::Data<Mediator>,
    ctx: RequestContext,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let result = mediator
        .send(GetBookmakerByName { name: path.into_inner() }, &ctx)
        .await?;
    Ok(handle_result(result))
}

pub async fn get_bookmaker(
    mediator: web::Data<Mediator>,
    ctx: RequestContext,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let result = mediator.send(GetBookmaker { id: path.into_inner() }, &ctx).await?;
    Ok(handle_result(result))
}

pub async fn update_bookmaker(
    mediator: web::Data<Mediator>,
    ctx: RequestContext,
    path: web::Path<String>,
    body: web::Json<UpdateBookmakerDto>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    info!("Update bookmaker request: {}", id);
    let result = mediator
        .send(UpdateBookmaker { id, dto: body.into_inner() }, &ctx)
        .await?;
    Ok(handle_result(result))
}

pub async fn delete_bookmaker(
    mediator: web::Data<Mediator>,
    ctx: RequestContext,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    info!("Delete bookmaker request: {}", id);
    let result = mediator.send(DeleteBookmaker { id }, &ctx).await?;
    Ok(handle_result(result))
}

pub async fn upload_logo(
    mediator: web::Data<Mediator>,
    ctx: RequestContext,
    path: web::Path<String>,
    payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    let file = read_photo_upload(payload).await?;
    let result = mediator
        .send(UploadBookmakerLogo { id: path.into_inner(), file }, &ctx)
        .await?;
    Ok(handle_result(result))
}

pub async fn list_affiliate_codes(
    mediator: web::Data<Mediator>,
    ctx: RequestContext,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let result = mediator
        .send(ListBookmakerAffiliateCodes { bookmaker_id: path.into_inner() }, &ctx)
        .await?;
    Ok(handle_result(result))
}

pub async fn create_affiliate_code(
    mediator: web::Data<Mediator>,
    ctx: RequestContext,
    path: web::Path<String>,
    body: web::Json<CreateAffiliateCodeDto>,
) -> Result<HttpResponse, ApiError> {
    let result = mediator
        .send(
            CreateAffiliateCode {
                bookmaker_id: path.into_inner(),
                dto: body.into_inner(),
            },
            &ctx,
        )
        .await?;
    Ok(handle_result(result))
}

pub fn bookmakers_routes() -> Scope {
    web::scope("/bookmakers")
        .route("", web::get().to(list_bookmakers))
        .route("", web::post().to(create_bookmaker))
        .route("/search", web::get().to(search_bookmakers))
        .route("/name/{name}", web::get().to(get_bookmaker_by_name))
        .route("/{id}", web::get().to(get_bookmaker))
        .route("/{id}", web::put().to(update_bookmaker))
        .route("/{id}", web::delete().to(delete_bookmaker))
        .route("/{id}/logo", web::post().to(upload_logo))
        .route("/{id}/affiliate-codes", web::get().to(list_affiliate_codes))
        .route("/{id}/affiliate-codes", web::post().to(create_affiliate_code))
}
