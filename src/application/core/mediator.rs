//! Request dispatch
//!
//! Each request type implements [`Request`] and so carries its own handler.
//! The request-to-handler mapping is resolved at compile time; sending a type
//! without a handler does not build. [`Mediator::send`] always runs the
//! validation stage first and only reaches the handler when it passes.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, trace};

use super::{HandlerResult, RequestContext, ValidationErrors};
use crate::errors::{Result, TrakerError};
use crate::security::{JwtService, UserAccessor};
use crate::services::{EmailSender, PhotoService};
use crate::storage::SeaOrmStorage;

/// Settings for generated short links
#[derive(Debug, Clone)]
pub struct LinkSettings {
    pub short_code_length: usize,
    /// Base used to render full short URLs, e.g. `https://trk.example.com/r`
    pub public_base_url: String,
}

impl Default for LinkSettings {
    fn default() -> Self {
        Self {
            short_code_length: 8,
            public_base_url: "http://127.0.0.1:8080/r".to_string(),
        }
    }
}

/// Dependency graph handed to every handler, built once at start-up.
#[derive(Clone)]
pub struct Services {
    pub storage: Arc<SeaOrmStorage>,
    pub photos: Arc<dyn PhotoService>,
    pub email: Arc<dyn EmailSender>,
    pub jwt: Arc<JwtService>,
    pub links: LinkSettings,
}

impl Services {
    pub fn user_accessor(&self) -> UserAccessor<'_> {
        UserAccessor::new(&self.storage)
    }
}

#[async_trait]
pub trait Request: Send + Sized + 'static {
    type Output: Send;

    /// Name used in logs
    const NAME: &'static str;

    fn validate(&self, _errors: &mut ValidationErrors) {}

    async fn handle(
        self,
        services: &Services,
        ctx: &RequestContext,
    ) -> Result<HandlerResult<Self::Output>>;
}

pub struct Mediator {
    services: Services,
}

impl Mediator {
    pub fn new(services: Services) -> Self {
        Self { services }
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    pub async fn send<R: Request>(
        &self,
        request: R,
        ctx: &RequestContext,
    ) -> Result<HandlerResult<R::Output>> {
        let mut errors = ValidationErrors::new();
        request.validate(&mut errors);

        if !errors.is_empty() {
            debug!(
                request = R::NAME,
                fields = errors.len(),
                "Request rejected by validation"
            );
            return Err(TrakerError::Validation(errors));
        }

        trace!(request = R::NAME, "Dispatching request");
        request.handle(&self.services, ctx).await
    }
}
