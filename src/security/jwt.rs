//! Bearer token issuance and validation

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::AuthConfig;
use crate::errors::{Result, TrakerError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
    pub token_type: TokenKind,
}

/// Login / refresh response body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub token_type: String,
    pub access_token: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
    pub refresh_token: String,
}

pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_minutes: u64,
    refresh_token_days: u64,
}

impl JwtService {
    pub fn new(secret: &str, access_token_minutes: u64, refresh_token_days: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_token_minutes,
            refresh_token_days,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        let secret = if config.jwt_secret.is_empty() {
            warn!("auth.jwt_secret not configured, generating a random secret for this process");
            crate::utils::generate_random_code(48)
        } else {
            config.jwt_secret.clone()
        };

        Self::new(
            &secret,
            config.access_token_minutes,
            config.refresh_token_days,
        )
    }

    fn issue(&self, user_id: &str, kind: TokenKind, lifetime: Duration) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + lifetime).timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
            token_type: kind,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| TrakerError::internal(format!("Failed to sign token: {}", e)))
    }

    fn verify(&self, token: &str, expected: TokenKind) -> Result<Claims> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map_err(|e| TrakerError::unauthorized(format!("Invalid token: {}", e)))?;

        if data.claims.token_type != expected {
            return Err(TrakerError::unauthorized("Invalid token type"));
        }

        Ok(data.claims)
    }

    pub fn generate_access_token(&self, user_id: &str) -> Result<String> {
        self.issue(
            user_id,
            TokenKind::Access,
            Duration::minutes(self.access_token_minutes as i64),
        )
    }

    pub fn generate_refresh_token(&self, user_id: &str) -> Result<String> {
        self.issue(
            user_id,
            TokenKind::Refresh,
            Duration::days(self.refresh_token_days as i64),
        )
    }

    pub fn issue_pair(&self, user_id: &str) -> Result<TokenPair> {
        Ok(TokenPair {
            token_type: "Bearer".to_string(),
            access_token: self.generate_access_token(user_id)?,
            expires_in: (self.access_token_minutes * 60) as i64,
            refresh_token: self.generate_refresh_token(user_id)?,
        })
    }

    pub fn validate_access_token(&self, token: &str) -> Result<Claims> {
        self.verify(token, TokenKind::Access)
    }

    pub fn validate_refresh_token(&self, token: &str) -> Result<Claims> {
        self.verify(token, TokenKind::Refresh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test_secret_key_32_bytes_long!!";

    fn service() -> JwtService {
        JwtService::new(SECRET, 15, 7)
    }

    #[test]
    fn test_access_token_carries_user_id() {
        let service = service();
        let token = service.generate_access_token("user-1").unwrap();
        let claims = service.validate_access_token(&token).unwrap();

        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.token_type, TokenKind::Access);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_token_kinds_are_not_interchangeable() {
        let service = service();
        let access = service.generate_access_token("u").unwrap();
        let refresh = service.generate_refresh_token("u").unwrap();

        assert!(service.validate_refresh_token(&access).is_err());
        assert!(service.validate_access_token(&refresh).is_err());
        assert!(service.validate_refresh_token(&refresh).is_ok());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = service().generate_access_token("u").unwrap();
        let other = JwtService::new("different_secret_key_32_bytes!!", 15, 7);
        assert!(matches!(
            other.validate_access_token(&token),
            Err(TrakerError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_expired_token_rejected() {
        let now = Utc::now();
        let claims = Claims {
            sub: "u".to_string(),
            iat: (now - Duration::hours(2)).timestamp(),
            exp: (now - Duration::hours(1)).timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
            token_type: TokenKind::Access,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(service().validate_access_token(&token).is_err());
    }

    #[test]
    fn test_issue_pair() {
        let pair = service().issue_pair("u").unwrap();
        assert_eq!(pair.token_type, "Bearer");
        assert_eq!(pair.expires_in, 900);
        assert_ne!(pair.access_token, pair.refresh_token);
    }
}
