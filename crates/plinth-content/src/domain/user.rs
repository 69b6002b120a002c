//! User Account Entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Editor,
}

impl Default for UserRole {
    fn default() -> Self {
        Self::Editor
    }
}

/// An account that can authenticate against the admin console.
/// The password hash never leaves the repository layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    #[serde(rename = "_id")]
    pub id: String,

    pub name: String,

    /// Unique, lowercased
    pub email: String,

    /// Argon2id PHC string
    pub password_hash: String,

    #[serde(default)]
    pub role: UserRole,

    pub active: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserAccount {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            email: email.into().trim().to_lowercase(),
            password_hash: password_hash.into(),
            role: UserRole::default(),
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_role(mut self, role: UserRole) -> Self {
        self.role = role;
        self
    }

    pub fn deactivate(&mut self) {
        self.active = false;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_is_active_editor() {
        let user = UserAccount::new("Pat", "Pat@X.com", "$argon2id$...");
        assert!(user.active);
        assert_eq!(user.role, UserRole::Editor);
        assert_eq!(user.email, "pat@x.com");
    }

    #[test]
    fn test_with_role_and_deactivate() {
        let mut user = UserAccount::new("Pat", "pat@x.com", "h").with_role(UserRole::Admin);
        assert_eq!(user.role, UserRole::Admin);
        user.deactivate();
        assert!(!user.active);
    }
}
