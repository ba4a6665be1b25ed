//! Short link redirects
//!
//! Lives outside `/api` and outside the envelope table: a hit is a 307 to
//! the tagged URL, an invalid or unknown code is a plain 404. Only GET
//! counts as a click; HEAD answers the same way without touching the counter.

use actix_web::http::{Method, StatusCode};
use actix_web::{HttpRequest, HttpResponse, web};
use tracing::{debug, trace};

use crate::api::ApiError;
use crate::application::core::{Mediator, RequestContext};
use crate::application::links::{FollowShortLink, PeekShortLink};
use crate::utils::is_valid_short_code;

pub struct RedirectService;

impl RedirectService {
    pub async fn handle_redirect(
        req: HttpRequest,
        mediator: web::Data<Mediator>,
        ctx: RequestContext,
        path: web::Path<String>,
    ) -> Result<HttpResponse, ApiError> {
        let short_link = path.into_inner();

        // 非法短码直接 404，不查库
        if !is_valid_short_code(&short_link) {
            trace!("Invalid short code rejected: {}", short_link);
            return Ok(Self::not_found_response());
        }

        let result = if req.method() == Method::HEAD {
            mediator.send(PeekShortLink { short_link: short_link.clone() }, &ctx).await?
        } else {
            mediator.send(FollowShortLink { short_link: short_link.clone() }, &ctx).await?
        };

        Ok(match result.data {
            Some(target) if result.is_success => {
                debug!("Redirecting {} -> {}", short_link, target);
                HttpResponse::TemporaryRedirect()
                    .insert_header(("Location", target))
                    .insert_header(("Cache-Control", "no-cache"))
                    .finish()
            }
            _ => Self::not_found_response(),
        })
    }

    #[inline]
    fn not_found_response() -> HttpResponse {
        HttpResponse::build(StatusCode::NOT_FOUND)
            .insert_header(("Content-Type", "text/html; charset=utf-8"))
            .body("Not Found")
    }
}

pub fn redirect_routes() -> actix_web::Scope {
    web::scope("/r")
        .route("/{short_link}", web::get().to(RedirectService::handle_redirect))
        .route("/{short_link}", web::head().to(RedirectService::handle_redirect))
}
