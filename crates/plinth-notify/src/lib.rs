//! Plinth Notification Dispatcher
//!
//! Consumes content events from an in-process channel and fans each one out
//! to every active subscriber, one delivery attempt per recipient.
//! Best-effort by contract: a failed send is logged and lost; delivery never
//! blocks or fails the write that produced the event.

pub mod transport;
pub mod worker;

pub use transport::{HttpMailTransport, HttpMailTransportConfig, LogMailTransport, MailTransport};
pub use worker::{DispatchStats, NotificationWorker, SubscriberDirectory};
