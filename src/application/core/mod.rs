//! Request pipeline building blocks shared by every use case.

mod context;
mod mediator;
mod result;
mod validation;

pub use context::RequestContext;
pub use mediator::{LinkSettings, Mediator, Request, Services};
pub use result::HandlerResult;
pub use validation::{FieldRules, ValidationErrors};
