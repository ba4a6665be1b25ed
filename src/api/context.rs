//! `RequestContext` as an actix extractor
//!
//! The auth middleware stores the bearer subject and the request-id
//! middleware stores the request id in request extensions; this turns them
//! into the explicit context every handler receives.

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest};
use futures_util::future::{Ready, ready};

use crate::api::middleware::{AuthenticatedUser, RequestId};
use crate::application::core::RequestContext;

impl FromRequest for RequestContext {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let extensions = req.extensions();
        ready(Ok(RequestContext {
            user_id: extensions.get::<AuthenticatedUser>().map(|u| u.0.clone()),
            request_id: extensions.get::<RequestId>().map(|r| r.0.clone()),
        }))
    }
}
