//! API Layer
//!
//! REST endpoints for the public site and the admin console.

pub mod auth;
pub mod common;
pub mod content;
pub mod middleware;
pub mod newsletter;
pub mod openapi;

pub use common::*;
pub use middleware::{AppState, Authenticated};

pub use auth::{auth_router, AuthState};
pub use content::{content_router, ContentState};
pub use newsletter::{newsletter_router, NewsletterState};
pub use openapi::PlinthApiDoc;
