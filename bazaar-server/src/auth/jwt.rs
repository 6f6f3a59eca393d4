//! JWT token service
//!
//! Issues and validates HS256 bearer tokens carrying the account id and role.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use shared::models::{Account, Role};
use thiserror::Error;

use crate::core::Config;
use crate::utils::{AppError, ErrorCode};

/// JWT configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Signing key (at least 32 bytes outside development)
    pub secret: String,
    /// Token lifetime in minutes
    pub expiration_minutes: i64,
    pub issuer: String,
    pub audience: String,
}

impl From<&Config> for JwtConfig {
    fn from(config: &Config) -> Self {
        Self {
            secret: config.jwt_secret.clone(),
            expiration_minutes: config.jwt_expiration_minutes,
            issuer: config.jwt_issuer.clone(),
            audience: config.jwt_audience.clone(),
        }
    }
}

/// Claims stored in the token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Account id
    pub sub: String,
    /// Role name (customer | shopkeeper | admin)
    pub role: String,
    /// Display name
    pub name: String,
    pub exp: i64,
    pub iat: i64,
    pub iss: String,
    pub aud: String,
}

#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token expired")]
    ExpiredToken,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Token generation failed: {0}")]
    GenerationFailed(String),
}

/// JWT token service
#[derive(Debug, Clone)]
pub struct JwtService {
    pub config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    pub fn with_config(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Issue a token for an account
    pub fn generate_token(&self, account: &Account) -> Result<String, JwtError> {
        let now = Utc::now();
        let expiration = now + Duration::minutes(self.config.expiration_minutes);

        let claims = Claims {
            sub: account.id.clone(),
            role: account.role.to_string(),
            name: account.full_name.clone(),
            exp: expiration.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    /// Validate and decode a token
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.config.audience]);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss", "aud"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                ErrorKind::InvalidToken => JwtError::InvalidToken(e.to_string()),
                _ => JwtError::InvalidToken(format!("Token validation failed: {e}")),
            }
        })?;

        Ok(token_data.claims)
    }

    /// Token part of an `Authorization: Bearer ...` header
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ").map(str::trim).filter(|t| !t.is_empty())
    }
}

/// Verified caller identity
///
/// Produced by the extractor from a valid token and passed explicitly into
/// handlers, then on into the checkout engine and status workflow as plain ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: String,
    pub name: String,
    pub role: Role,
}

impl TryFrom<Claims> for CurrentUser {
    type Error = shared::models::ParseEnumError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        Ok(Self {
            role: claims.role.parse()?,
            id: claims.sub,
            name: claims.name,
        })
    }
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Fail with 403 unless the caller has exactly `role`
    pub fn require_role(&self, role: Role) -> Result<(), AppError> {
        if self.role == role {
            return Ok(());
        }
        crate::security_log!(
            "WARN",
            "role_denied",
            user_id = self.id.as_str(),
            role = self.role.as_str(),
            required = role.as_str()
        );
        let code = if role == Role::Admin {
            ErrorCode::AdminRequired
        } else {
            ErrorCode::RoleRequired
        };
        Err(AppError::with_message(code, format!("{role} role required"))
            .with_detail("required_role", role.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::AccountStatus;

    fn service() -> JwtService {
        JwtService::with_config(JwtConfig::from(&Config::default()))
    }

    fn account(role: Role) -> Account {
        Account {
            id: "C11111".into(),
            role,
            full_name: "Ada Lovelace".into(),
            email: "ada@example.com".into(),
            mobile: None,
            password_hash: String::new(),
            shop_name: None,
            address: None,
            status: AccountStatus::Active,
            created_at: 0,
        }
    }

    #[test]
    fn test_jwt_generation_and_validation() {
        let service = service();
        let token = service.generate_token(&account(Role::Customer)).unwrap();
        let claims = service.validate_token(&token).unwrap();

        assert_eq!(claims.sub, "C11111");
        assert_eq!(claims.role, "customer");
        assert_eq!(claims.name, "Ada Lovelace");
        assert_eq!(claims.iss, "bazaar");

        let user = CurrentUser::try_from(claims).unwrap();
        assert_eq!(user.role, Role::Customer);
        assert!(!user.is_admin());
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = service().generate_token(&account(Role::Admin)).unwrap();
        let other = JwtService::with_config(JwtConfig {
            secret: "another-secret-that-is-long-enough-123".into(),
            ..JwtConfig::from(&Config::default())
        });
        assert!(matches!(
            other.validate_token(&token).unwrap_err(),
            JwtError::InvalidSignature
        ));
    }

    #[test]
    fn test_expired_token() {
        let service = JwtService::with_config(JwtConfig {
            expiration_minutes: -10,
            ..JwtConfig::from(&Config::default())
        });
        let token = service.generate_token(&account(Role::Customer)).unwrap();
        assert!(matches!(
            service.validate_token(&token).unwrap_err(),
            JwtError::ExpiredToken
        ));
    }

    #[test]
    fn test_extract_from_header() {
        assert_eq!(JwtService::extract_from_header("Bearer abc"), Some("abc"));
        assert_eq!(JwtService::extract_from_header("Basic abc"), None);
        assert_eq!(JwtService::extract_from_header("Bearer "), None);
    }

    #[test]
    fn test_require_role() {
        let user = CurrentUser {
            id: "S1111".into(),
            name: "Shop".into(),
            role: Role::Shopkeeper,
        };
        assert!(user.require_role(Role::Shopkeeper).is_ok());
        assert_eq!(
            user.require_role(Role::Customer).unwrap_err().code,
            ErrorCode::RoleRequired
        );
        assert_eq!(
            user.require_role(Role::Admin).unwrap_err().code,
            ErrorCode::AdminRequired
        );
    }

    #[test]
    fn test_unknown_role_claim_is_rejected() {
        let claims = Claims {
            sub: "X1".into(),
            role: "superuser".into(),
            name: "x".into(),
            exp: 0,
            iat: 0,
            iss: "bazaar".into(),
            aud: "bazaar-clients".into(),
        };
        assert!(CurrentUser::try_from(claims).is_err());
    }
}
