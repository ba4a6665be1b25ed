use actix_multipart::Multipart;
use actix_web::{HttpResponse, Scope, web};

use super::helpers::{handle_result, read_photo_upload};
use crate::api::ApiError;
use crate::application::account::{GetCurrentUser, UploadProfilePicture};
use crate::application::core::{Mediator, RequestContext};

pub async fn current_user(
    mediator: web::Data<Mediator>,
    ctx: RequestContext,
) -> Result<HttpResponse, ApiError> {
    let result = mediator.send(GetCurrentUser, &ctx).await?;
    Ok(handle_result(result))
}

pub async fn upload_photo(
    mediator: web::Data<Mediator>,
    ctx: RequestContext,
    payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    let file = read_photo_upload(payload).await?;
    let result = mediator.send(UploadProfilePicture { file }, &ctx).await?;
    Ok(handle_result(result))
}

pub fn account_routes() -> Scope {
    web::scope("/account")
        .route("/me", web::get().to(current_user))
        .route("/photo", web::post().to(upload_photo))
}
