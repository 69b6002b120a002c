//! Service Layer
//!
//! Credential primitives: password hashing and session token issuance.

pub mod auth;
pub mod password;

pub use auth::{extract_bearer_token, AuthConfig, AuthService, SessionClaims};
pub use password::PasswordService;
