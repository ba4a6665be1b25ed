//! Email collaborator. This deployment delivers nothing: every message is
//! logged and treated as sent.

use async_trait::async_trait;
use tracing::debug;

use crate::errors::Result;

#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send_confirmation_link(&self, email: &str, link: &str) -> Result<()>;

    async fn send_password_reset_link(&self, email: &str, link: &str) -> Result<()>;

    async fn send_password_reset_code(&self, email: &str, code: &str) -> Result<()>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopEmailSender;

#[async_trait]
impl EmailSender for NoopEmailSender {
    async fn send_confirmation_link(&self, email: &str, _link: &str) -> Result<()> {
        debug!("Confirmation link for {} accepted (not delivered)", email);
        Ok(())
    }

    async fn send_password_reset_link(&self, email: &str, _link: &str) -> Result<()> {
        debug!("Password reset link for {} accepted (not delivered)", email);
        Ok(())
    }

    async fn send_password_reset_code(&self, email: &str, _code: &str) -> Result<()> {
        debug!("Password reset code for {} accepted (not delivered)", email);
        Ok(())
    }
}
