use actix_web::{HttpResponse, Scope, web};

use super::helpers::handle_result;
use crate::api::ApiError;
use crate::application::affiliate_codes::{DeleteAffiliateCode, ListMyAffiliateCodes};
use crate::application::core::{Mediator, RequestContext};

pub async fn list_my_affiliate_codes(
    mediator: web::Data<Mediator>,
    ctx: RequestContext,
) -> Result<HttpResponse, ApiError> {
    let result = mediator.send(ListMyAffiliateCodes, &ctx).await?;
    Ok(handle_result(result))
}

pub async fn delete_affiliate_code(
    mediator: web::Data<Mediator>,
    ctx: RequestContext,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let result = mediator
        .send(DeleteAffiliateCode { id: path.into_inner() }, &ctx)
        .await?;
    Ok(handle_result(result))
}

pub fn affiliate_codes_routes() -> Scope {
    web::scope("/affiliate-codes")
        .route("", web::get().to(list_my_affiliate_codes))
        .route("/{id}", web::delete().to(delete_affiliate_code))
}
