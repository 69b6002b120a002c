//! Auth Service
//!
//! HS256 session tokens signed with the configured credential secret.
//! Tokens carry subject, email, and role with an expiry claim; there is no
//! refresh rotation or revocation list, so a token stays valid until expiry.

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::domain::{UserAccount, UserRole};
use crate::error::{ContentError, Result};

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub issuer: String,
    pub token_expiry_secs: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret: "dev-secret-change-me".to_string(),
            issuer: "plinth".to_string(),
            token_expiry_secs: 8 * 3600,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// User id
    pub sub: String,
    pub email: String,
    pub role: UserRole,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
}

pub struct AuthService {
    config: AuthConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl AuthService {
    pub fn new(config: AuthConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    pub fn token_expiry_secs(&self) -> i64 {
        self.config.token_expiry_secs
    }

    pub fn generate_token(&self, user: &UserAccount) -> Result<String> {
        let now = Utc::now().timestamp();
        let claims = SessionClaims {
            sub: user.id.clone(),
            email: user.email.clone(),
            role: user.role,
            iss: self.config.issuer.clone(),
            iat: now,
            exp: now + self.config.token_expiry_secs,
        };
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| ContentError::internal(format!("token signing failed: {}", e)))
    }

    pub fn validate_token(&self, token: &str) -> Result<SessionClaims> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.config.issuer]);
        decode::<SessionClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|_| ContentError::unauthorized("invalid or expired token"))
    }
}

/// Pull the token out of an `Authorization: Bearer <token>` header value.
pub fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> UserAccount {
        UserAccount::new("Pat", "pat@x.com", "hash").with_role(UserRole::Admin)
    }

    #[test]
    fn test_token_roundtrip() {
        let service = AuthService::new(AuthConfig::default());
        let user = test_user();

        let token = service.generate_token(&user).unwrap();
        let claims = service.validate_token(&token).unwrap();

        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.email, "pat@x.com");
        assert_eq!(claims.role, UserRole::Admin);
    }

    #[test]
    fn test_token_rejected_with_wrong_secret() {
        let issuer = AuthService::new(AuthConfig {
            secret: "secret-a".to_string(),
            ..AuthConfig::default()
        });
        let verifier = AuthService::new(AuthConfig {
            secret: "secret-b".to_string(),
            ..AuthConfig::default()
        });

        let token = issuer.generate_token(&test_user()).unwrap();
        assert!(verifier.validate_token(&token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let service = AuthService::new(AuthConfig {
            token_expiry_secs: -120,
            ..AuthConfig::default()
        });
        let token = service.generate_token(&test_user()).unwrap();
        assert!(service.validate_token(&token).is_err());
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(extract_bearer_token("Basic abc"), None);
        assert_eq!(extract_bearer_token("Bearer "), None);
    }
}
