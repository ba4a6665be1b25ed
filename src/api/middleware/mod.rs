pub mod auth;
pub mod exception;
pub mod request_id;

pub use auth::{ApiAuth, AuthenticatedUser};
pub use exception::ExceptionMiddleware;
pub use request_id::{RequestId, RequestIdMiddleware};
