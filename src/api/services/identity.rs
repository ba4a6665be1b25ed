//! Identity endpoints (`/api/register`, `/api/login`, ...)

use actix_web::{HttpResponse, web};

use super::helpers::handle_result;
use crate::api::ApiError;
use crate::application::core::{Mediator, RequestContext};
use crate::application::identity::{
    ForgotPassword, ForgotPasswordDto, Login, LoginDto, ManageInfo, RefreshDto, RefreshToken,
    Register, RegisterDto,
};

pub async fn register(
    mediator: web::Data<Mediator>,
    ctx: RequestContext,
    body: web::Json<RegisterDto>,
) -> Result<HttpResponse, ApiError> {
    let result = mediator.send(Register { dto: body.into_inner() }, &ctx).await?;
    Ok(handle_result(result))
}

pub async fn login(
    mediator: web::Data<Mediator>,
    ctx: RequestContext,
    body: web::Json<LoginDto>,
) -> Result<HttpResponse, ApiError> {
    let result = mediator.send(Login { dto: body.into_inner() }, &ctx).await?;
    Ok(handle_result(result))
}

pub async fn refresh(
    mediator: web::Data<Mediator>,
    ctx: RequestContext,
    body: web::Json<RefreshDto>,
) -> Result<HttpResponse, ApiError> {
    let result = mediator
        .send(RefreshToken { dto: body.into_inner() }, &ctx)
        .await?;
    Ok(handle_result(result))
}

pub async fn forgot_password(
    mediator: web::Data<Mediator>,
    ctx: RequestContext,
    body: web::Json<ForgotPasswordDto>,
) -> Result<HttpResponse, ApiError> {
    let result = mediator
        .send(ForgotPassword { dto: body.into_inner() }, &ctx)
        .await?;
    Ok(handle_result(result))
}

pub async fn manage_info(
    mediator: web::Data<Mediator>,
    ctx: RequestContext,
) -> Result<HttpResponse, ApiError> {
    let result = mediator.send(ManageInfo, &ctx).await?;
    Ok(handle_result(result))
}

/// Registered directly on the `/api` scope
pub fn identity_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/register", web::post().to(register))
        .route("/login", web::post().to(login))
        .route("/refresh", web::post().to(refresh))
        .route("/forgotPassword", web::post().to(forgot_password))
        .route("/manage/info", web::get().to(manage_info));
}
