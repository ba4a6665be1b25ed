use actix_web::{HttpResponse, Scope, web};

use super::helpers::handle_result;
use crate::api::ApiError;
use crate::application::core::{Mediator, RequestContext};
use crate::application::utms::{CreateUtm, CreateUtmDto, DeleteUtm, ListMyUtms};

pub async fn list_utms(
    mediator: web::Data<Mediator>,
    ctx: RequestContext,
) -> Result<HttpResponse, ApiError> {
    let result = mediator.send(ListMyUtms, &ctx).await?;
    Ok(handle_result(result))
}

pub async fn create_utm(
    mediator: web::Data<Mediator>,
    ctx: RequestContext,
    body: web::Json<CreateUtmDto>,
) -> Result<HttpResponse, ApiError> {
    let result = mediator.send(CreateUtm { dto: body.into_inner() }, &ctx).await?;
    Ok(handle_result(result))
}

pub async fn delete_utm(
    mediator: web::Data<Mediator>,
    ctx: RequestContext,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let result = mediator.send(DeleteUtm { id: path.into_inner() }, &ctx).await?;
    Ok(handle_result(result))
}

pub fn utms_routes() -> Scope {
    web::scope("/utms")
        .route("", web::get().to(list_utms))
        .route("", web::post().to(create_utm))
        .route("/{id}", web::delete().to(delete_utm))
}
