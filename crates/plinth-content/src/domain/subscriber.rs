//! Subscriber Entity
//!
//! An email address registered to receive notification events.
//! Unique by address: re-subscribing a previously unsubscribed address
//! reactivates the existing record rather than duplicating it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SubscriberStatus {
    Active,
    Unsubscribed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscriber {
    #[serde(rename = "_id")]
    pub id: String,

    pub email: String,

    pub status: SubscriberStatus,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub unsubscribed_at: Option<DateTime<Utc>>,
}

impl Subscriber {
    pub fn new(email: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            email: email.into().trim().to_lowercase(),
            status: SubscriberStatus::Active,
            created_at: now,
            updated_at: now,
            unsubscribed_at: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == SubscriberStatus::Active
    }

    pub fn unsubscribe(&mut self) {
        let now = Utc::now();
        self.status = SubscriberStatus::Unsubscribed;
        self.unsubscribed_at = Some(now);
        self.updated_at = now;
    }

    pub fn reactivate(&mut self) {
        self.status = SubscriberStatus::Active;
        self.unsubscribed_at = None;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_subscriber_is_active() {
        let sub = Subscriber::new("A@Example.COM ");
        assert!(sub.is_active());
        assert_eq!(sub.email, "a@example.com");
        assert!(sub.unsubscribed_at.is_none());
    }

    #[test]
    fn test_unsubscribe_then_reactivate_keeps_identity() {
        let mut sub = Subscriber::new("a@x.com");
        let id = sub.id.clone();

        sub.unsubscribe();
        assert!(!sub.is_active());
        assert!(sub.unsubscribed_at.is_some());

        sub.reactivate();
        assert!(sub.is_active());
        assert!(sub.unsubscribed_at.is_none());
        assert_eq!(sub.id, id);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&SubscriberStatus::Active).unwrap(),
            "\"active\""
        );
        assert_eq!(
            serde_json::to_string(&SubscriberStatus::Unsubscribed).unwrap(),
            "\"unsubscribed\""
        );
    }
}
