//! Notification Worker
//!
//! Detached task consuming content events and attempting delivery to each
//! active subscriber independently. One recipient failing never aborts
//! dispatch to the rest, and nothing here reports back to the writer.

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{error, info, warn};

use plinth_common::ContentEvent;

use crate::transport::MailTransport;

/// Source of active subscriber addresses; implemented by the content store.
#[async_trait::async_trait]
pub trait SubscriberDirectory: Send + Sync {
    async fn active_emails(&self) -> anyhow::Result<Vec<String>>;
}

/// Per-event delivery outcome
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    pub sent: usize,
    pub failed: usize,
}

pub struct NotificationWorker {
    directory: Arc<dyn SubscriberDirectory>,
    transport: Arc<dyn MailTransport>,
}

impl NotificationWorker {
    pub fn new(directory: Arc<dyn SubscriberDirectory>, transport: Arc<dyn MailTransport>) -> Self {
        Self { directory, transport }
    }

    /// Consume events until the sending side is dropped.
    pub async fn run(self, mut events: UnboundedReceiver<ContentEvent>) {
        info!("Notification worker started");
        while let Some(event) = events.recv().await {
            let stats = self.dispatch(&event).await;
            if stats.failed > 0 {
                warn!(
                    event = %event.id,
                    sent = stats.sent,
                    failed = stats.failed,
                    "event dispatched with delivery failures"
                );
            }
        }
        info!("Notification channel closed, worker stopping");
    }

    /// Fan one event out to every active subscriber.
    pub async fn dispatch(&self, event: &ContentEvent) -> DispatchStats {
        let emails = match self.directory.active_emails().await {
            Ok(emails) => emails,
            Err(e) => {
                error!(event = %event.id, "failed to load subscribers: {}", e);
                return DispatchStats::default();
            }
        };

        let body = format!("{}\n\n{}", event.message, event.link);
        let mut stats = DispatchStats::default();

        for email in &emails {
            match self.transport.send(email, &event.title, &body).await {
                Ok(()) => stats.sent += 1,
                Err(e) => {
                    stats.failed += 1;
                    error!(recipient = %email, event = %event.id, "mail delivery failed: {}", e);
                }
            }
        }
        stats
    }
}
