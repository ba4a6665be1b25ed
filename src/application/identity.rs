//! Account registration and bearer-token issuance
//!
//! Mirrors the minimal identity endpoint set: register, login, refresh,
//! forgot-password and manage/info. Confirmation and reset messages go
//! through the [`EmailSender`](crate::services::EmailSender) collaborator.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::ActiveValue::Set;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::application::core::{
    HandlerResult, Request, RequestContext, Services, ValidationErrors,
};
use crate::errors::{Result, TrakerError};
use crate::security::TokenPair;
use crate::security::password::{hash_password, password_policy_violations, verify_password};
use crate::storage::normalize_key;
use crate::storage::seed::ROLE_USER;
use crate::utils::generate_random_code;

use migration::entities::user;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterDto {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginDto {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshDto {
    #[serde(default)]
    pub refresh_token: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPasswordDto {
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoResponse {
    pub email: String,
    pub is_email_confirmed: bool,
}

fn validate_email(errors: &mut ValidationErrors, email: &str) {
    errors
        .field("email", email)
        .not_empty("Email is required")
        .email("Email is not valid");
}

#[derive(Debug, Clone)]
pub struct Register {
    pub dto: RegisterDto,
}

#[async_trait]
impl Request for Register {
    type Output = ();
    const NAME: &'static str = "Register";

    fn validate(&self, errors: &mut ValidationErrors) {
        validate_email(errors, &self.dto.email);

        if self.dto.password.is_empty() {
            errors.add("password", "Password is required");
        } else {
            for violation in password_policy_violations(&self.dto.password) {
                errors.add("password", violation);
            }
        }

        errors
            .field("firstName", &self.dto.first_name)
            .not_empty("First name is required")
            .max_length(100, "First name must not exceed 100 characters");
        errors
            .field("lastName", &self.dto.last_name)
            .not_empty("Last name is required")
            .max_length(100, "Last name must not exceed 100 characters");
    }

    async fn handle(self, services: &Services, _ctx: &RequestContext) -> Result<HandlerResult<()>> {
        let email = self.dto.email.trim().to_string();
        let taken = || HandlerResult::failure(format!("Email '{}' is already taken.", email), 400);

        if services.storage.find_user_by_email(&email).await?.is_some() {
            return Ok(taken());
        }

        let now = Utc::now();
        let id = Uuid::new_v4().to_string();
        let model = user::ActiveModel {
            id: Set(id.clone()),
            email: Set(email.clone()),
            normalized_email: Set(normalize_key(&email)),
            password_hash: Set(hash_password(&self.dto.password)?),
            first_name: Set(self.dto.first_name.trim().to_string()),
            last_name: Set(self.dto.last_name.trim().to_string()),
            profile_picture_url: Set(None),
            profile_picture_public_id: Set(None),
            date_of_birth: Set(None),
            email_confirmed: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
        };

        match services.storage.insert_user(model).await {
            Ok(_) => {}
            Err(e) if e.is_conflict() => return Ok(taken()),
            Err(e) => return Err(e),
        }

        match services.storage.find_role_by_name(ROLE_USER).await? {
            Some(role) => services.storage.assign_role(&id, &role.id).await?,
            None => warn!("Role {} missing, user {} registered without a role", ROLE_USER, id),
        }

        let code = generate_random_code(32);
        let link = format!("/api/confirmEmail?userId={}&code={}", id, code);
        services.email.send_confirmation_link(&email, &link).await?;

        info!("User registered: {}", email);
        Ok(HandlerResult::empty())
    }
}

/// Bad credentials are an authorization fault, rendered as 401
#[derive(Debug, Clone)]
pub struct Login {
    pub dto: LoginDto,
}

#[async_trait]
impl Request for Login {
    type Output = TokenPair;
    const NAME: &'static str = "Login";

    fn validate(&self, errors: &mut ValidationErrors) {
        validate_email(errors, &self.dto.email);
        errors
            .field("password", &self.dto.password)
            .not_empty("Password is required");
    }

    async fn handle(self, services: &Services, _ctx: &RequestContext) -> Result<HandlerResult<TokenPair>> {
        let user = services
            .storage
            .find_user_by_email(&self.dto.email)
            .await?
            .ok_or_else(|| TrakerError::unauthorized(INVALID_CREDENTIALS))?;

        if !verify_password(&self.dto.password, &user.password_hash)? {
            warn!("Failed login attempt for {}", user.email);
            return Err(TrakerError::unauthorized(INVALID_CREDENTIALS));
        }

        info!("User logged in: {}", user.email);
        Ok(HandlerResult::success(services.jwt.issue_pair(&user.id)?))
    }
}

#[derive(Debug, Clone)]
pub struct RefreshToken {
    pub dto: RefreshDto,
}

#[async_trait]
impl Request for RefreshToken {
    type Output = TokenPair;
    const NAME: &'static str = "RefreshToken";

    fn validate(&self, errors: &mut ValidationErrors) {
        errors
            .field("refreshToken", &self.dto.refresh_token)
            .not_empty("Refresh token is required");
    }

    async fn handle(self, services: &Services, _ctx: &RequestContext) -> Result<HandlerResult<TokenPair>> {
        let claims = services.jwt.validate_refresh_token(&self.dto.refresh_token)?;

        // 用户已被删除的刷新令牌不再有效
        if services.storage.find_user(&claims.sub).await?.is_none() {
            return Err(TrakerError::unauthorized("Invalid refresh token"));
        }

        Ok(HandlerResult::success(services.jwt.issue_pair(&claims.sub)?))
    }
}

/// Always succeeds so the endpoint does not reveal which emails exist
#[derive(Debug, Clone)]
pub struct ForgotPassword {
    pub dto: ForgotPasswordDto,
}

#[async_trait]
impl Request for ForgotPassword {
    type Output = ();
    const NAME: &'static str = "ForgotPassword";

    fn validate(&self, errors: &mut ValidationErrors) {
        validate_email(errors, &self.dto.email);
    }

    async fn handle(self, services: &Services, _ctx: &RequestContext) -> Result<HandlerResult<()>> {
        if let Some(user) = services.storage.find_user_by_email(&self.dto.email).await? {
            let code = generate_random_code(32);
            services.email.send_password_reset_code(&user.email, &code).await?;
        }
        Ok(HandlerResult::empty())
    }
}

#[derive(Debug, Clone, Default)]
pub struct ManageInfo;

#[async_trait]
impl Request for ManageInfo {
    type Output = InfoResponse;
    const NAME: &'static str = "ManageInfo";

    async fn handle(self, services: &Services, ctx: &RequestContext) -> Result<HandlerResult<InfoResponse>> {
        let user_id = services.user_accessor().user_id(ctx)?;
        let user = services
            .storage
            .find_user(user_id)
            .await?
            .ok_or_else(|| TrakerError::unauthorized("No user is logged in"))?;

        Ok(HandlerResult::success(InfoResponse {
            email: user.email,
            is_email_confirmed: user.email_confirmed,
        }))
    }
}
