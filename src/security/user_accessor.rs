//! Caller identity resolution
//!
//! Read-only view of "the current user" for handlers that scope queries or
//! mutations to the caller. The caller id comes from the explicit
//! [`RequestContext`], never from ambient state.

use serde::Serialize;

use crate::application::core::RequestContext;
use crate::errors::{Result, TrakerError};
use crate::storage::SeaOrmStorage;

/// Role name used when an assignment exists but its role cannot be resolved
pub const FALLBACK_ROLE: &str = "User";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub profile_picture_url: String,
    pub role_name: String,
}

pub struct UserAccessor<'a> {
    storage: &'a SeaOrmStorage,
}

impl<'a> UserAccessor<'a> {
    pub fn new(storage: &'a SeaOrmStorage) -> Self {
        Self { storage }
    }

    /// Caller id, or an authorization failure when nobody is logged in
    pub fn user_id<'c>(&self, ctx: &'c RequestContext) -> Result<&'c str> {
        ctx.user_id
            .as_deref()
            .ok_or_else(|| TrakerError::unauthorized("No user is logged in"))
    }

    /// Caller profile; fails when the id does not match a stored user
    pub async fn get_user(&self, ctx: &RequestContext) -> Result<UserInfo> {
        let user_id = self.user_id(ctx)?;
        let user = self
            .storage
            .find_user(user_id)
            .await?
            .ok_or_else(|| TrakerError::unauthorized("No user is logged in"))?;

        let role_name = self.role_name(&user.id).await?;

        Ok(UserInfo {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            profile_picture_url: user.profile_picture_url.unwrap_or_default(),
            role_name,
        })
    }

    /// Role name of a user
    ///
    /// No assignment row at all is an error; an assignment whose role row is
    /// missing falls back to [`FALLBACK_ROLE`].
    pub async fn role_name(&self, user_id: &str) -> Result<String> {
        let assignment = self
            .storage
            .find_role_assignment(user_id)
            .await?
            .ok_or_else(|| TrakerError::internal("User not found"))?;

        let role = self.storage.find_role(&assignment.role_id).await?;
        Ok(role
            .map(|r| r.name)
            .unwrap_or_else(|| FALLBACK_ROLE.to_string()))
    }
}
