//! Auth API Endpoints
//!
//! - POST /api/auth/register - Create an account, returns a session token
//! - POST /api/auth/login - Password-based login

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{UserAccount, UserRole};
use crate::error::ContentError;
use crate::repository::UserRepository;
use crate::service::{AuthService, PasswordService};

/// Registration request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// User DTO; never carries the password hash
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub created_at: String,
}

impl From<UserAccount> for UserResponse {
    fn from(user: UserAccount) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

/// Session response
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

/// Auth service state
#[derive(Clone)]
pub struct AuthState {
    pub auth_service: Arc<AuthService>,
    pub password_service: Arc<PasswordService>,
    pub user_repo: Arc<UserRepository>,
}

/// Register a new account
#[utoipa::path(
    post,
    path = "/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn register(
    State(state): State<AuthState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ContentError> {
    if req.name.trim().is_empty() {
        return Err(ContentError::missing_field("name"));
    }
    if req.email.trim().is_empty() {
        return Err(ContentError::missing_field("email"));
    }
    if req.password.is_empty() {
        return Err(ContentError::missing_field("password"));
    }

    if state.user_repo.exists_by_email(&req.email).await? {
        return Err(ContentError::duplicate("User", "email", &req.email));
    }

    let hash = state.password_service.hash_password(&req.password)?;
    let user = UserAccount::new(&req.name, &req.email, hash);
    state.user_repo.insert(&user).await?;

    let token = state.auth_service.generate_token(&user)?;
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: user.into(),
        }),
    ))
}

/// Login with email and password.
///
/// An unknown email and a wrong password produce the identical error
/// payload so callers cannot enumerate accounts.
#[utoipa::path(
    post,
    path = "/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AuthState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ContentError> {
    let user = state
        .user_repo
        .find_by_email(&req.email)
        .await?
        .ok_or(ContentError::InvalidCredentials)?;

    let password_valid = state
        .password_service
        .verify_password(&req.password, &user.password_hash)
        .unwrap_or(false);
    if !password_valid {
        return Err(ContentError::InvalidCredentials);
    }

    if !user.active {
        return Err(ContentError::unauthorized("Account is not active"));
    }

    let token = state.auth_service.generate_token(&user)?;
    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}

/// Create the auth router
pub fn auth_router(state: AuthState) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_deserialization() {
        let json = r#"{"name":"Pat","email":"pat@x.com","password":"secret"}"#;
        let req: RegisterRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.name, "Pat");
        assert_eq!(req.email, "pat@x.com");
    }

    #[test]
    fn test_user_response_hides_password_hash() {
        let user = UserAccount::new("Pat", "pat@x.com", "$argon2id$secret");
        let response: UserResponse = user.into();
        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("argon2id"));
        assert!(!json.contains("passwordHash"));
        assert!(json.contains("createdAt"));
    }

    #[test]
    fn test_auth_response_serialization() {
        let user = UserAccount::new("Pat", "pat@x.com", "h");
        let response = AuthResponse {
            token: "token123".to_string(),
            user: user.into(),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"token\":\"token123\""));
        assert!(json.contains("\"user\""));
    }
}
