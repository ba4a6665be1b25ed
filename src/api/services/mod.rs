pub mod account;
pub mod affiliate_codes;
pub mod bookmakers;
pub mod health;
pub mod helpers;
pub mod identity;
pub mod links;
pub mod redirect;
pub mod telegrams;
pub mod utms;

pub use account::account_routes;
pub use affiliate_codes::affiliate_codes_routes;
pub use bookmakers::bookmakers_routes;
pub use health::{AppStartTime, HealthService, health_routes};
pub use identity::identity_routes;
pub use links::links_routes;
pub use redirect::{RedirectService, redirect_routes};
pub use telegrams::telegrams_routes;
pub use utms::utms_routes;

use actix_web::dev::HttpServiceFactory;
use actix_web::web;

use crate::api::middleware::ApiAuth;

/// `/api` scope with bearer authentication
pub fn api_routes() -> impl HttpServiceFactory {
    web::scope("/api")
        .wrap(ApiAuth)
        .configure(identity_routes)
        .service(bookmakers_routes())
        .service(affiliate_codes_routes())
        .service(links_routes())
        .service(utms_routes())
        .service(telegrams_routes())
        .service(account_routes())
}
