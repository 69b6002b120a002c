use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

// ============================================================================
// Notification Event Types
// ============================================================================

/// Ephemeral event emitted when publishable content is created.
///
/// Never persisted: produced by the lifecycle engine, consumed immediately
/// by the notification worker, gone afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentEvent {
    pub id: String,
    /// Resource tag the content belongs to (e.g. "news", "fee-structure")
    pub resource: String,
    pub title: String,
    pub message: String,
    /// Absolute link to the published content on the public site
    pub link: String,
    pub created_at: DateTime<Utc>,
}

impl ContentEvent {
    pub fn new(
        resource: impl Into<String>,
        title: impl Into<String>,
        message: impl Into<String>,
        link: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            resource: resource.into(),
            title: title.into(),
            message: message.into(),
            link: link.into(),
            created_at: Utc::now(),
        }
    }
}

// ============================================================================
// Configuration Types
// ============================================================================

/// Process configuration, loaded from the environment.
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | `PLINTH_MONGO_URL` | `mongodb://localhost:27017` | MongoDB connection URL |
/// | `PLINTH_MONGO_DB` | `plinth` | MongoDB database name |
/// | `PLINTH_API_PORT` | `8080` | HTTP API port |
/// | `PLINTH_METRICS_PORT` | `9090` | Metrics/health port |
/// | `PLINTH_BASE_URL` | `http://localhost:3000` | Public site URL used in notification links |
/// | `PLINTH_JWT_SECRET` | `dev-secret-change-me` | Credential-signing secret |
/// | `PLINTH_MAIL_ENDPOINT` | - | Mail transport API endpoint (log-only when unset) |
/// | `PLINTH_MAIL_API_KEY` | - | Bearer key for the mail transport |
/// | `PLINTH_STORAGE_KEY` | - | Object-storage credential (media collaborator) |
/// | `PLINTH_STORAGE_SECRET` | - | Object-storage credential (media collaborator) |
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub mongo_url: String,
    pub mongo_db: String,
    pub api_port: u16,
    pub metrics_port: u16,
    pub base_url: String,
    pub jwt_secret: String,
    pub mail_endpoint: Option<String>,
    pub mail_api_key: Option<String>,
    pub storage_key: Option<String>,
    pub storage_secret: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            mongo_url: "mongodb://localhost:27017".to_string(),
            mongo_db: "plinth".to_string(),
            api_port: 8080,
            metrics_port: 9090,
            base_url: "http://localhost:3000".to_string(),
            jwt_secret: "dev-secret-change-me".to_string(),
            mail_endpoint: None,
            mail_api_key: None,
            storage_key: None,
            storage_secret: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            mongo_url: env_or("PLINTH_MONGO_URL", &defaults.mongo_url),
            mongo_db: env_or("PLINTH_MONGO_DB", &defaults.mongo_db),
            api_port: env_or_parse("PLINTH_API_PORT", defaults.api_port),
            metrics_port: env_or_parse("PLINTH_METRICS_PORT", defaults.metrics_port),
            base_url: env_or("PLINTH_BASE_URL", &defaults.base_url),
            jwt_secret: env_or("PLINTH_JWT_SECRET", &defaults.jwt_secret),
            mail_endpoint: std::env::var("PLINTH_MAIL_ENDPOINT").ok(),
            mail_api_key: std::env::var("PLINTH_MAIL_API_KEY").ok(),
            storage_key: std::env::var("PLINTH_STORAGE_KEY").ok(),
            storage_secret: std::env::var("PLINTH_STORAGE_SECRET").ok(),
        }
    }
}

pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

pub fn env_or_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_event_has_generated_id() {
        let a = ContentEvent::new("news", "Title", "Body", "http://x/news");
        let b = ContentEvent::new("news", "Title", "Body", "http://x/news");
        assert_ne!(a.id, b.id);
        assert_eq!(a.resource, "news");
    }

    #[test]
    fn test_content_event_serializes_snake_case() {
        let event = ContentEvent::new("events", "Open day", "Join us", "http://x/events");
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"resource\":\"events\""));
        assert!(json.contains("created_at"));
    }

    #[test]
    fn test_config_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.api_port, 8080);
        assert_eq!(config.mongo_db, "plinth");
        assert!(config.mail_endpoint.is_none());
    }
}
