//! Plinth Content Core
//!
//! Content-management backend for an institutional website:
//! - Persistence gateway (shared, lazily connected MongoDB handle)
//! - Resource schema registry (declarative per-resource document shapes)
//! - Resource lifecycle engine (generic CRUD + singleton upsert + notify)
//! - Subscriber and user account entities with repositories
//! - Credential services (Argon2id password hashing, JWT sessions)
//! - REST API layer (axum)

pub mod api;
pub mod domain;
pub mod engine;
pub mod error;
pub mod repository;
pub mod schema;
pub mod service;
pub mod slug;
pub mod store;

pub use engine::LifecycleEngine;
pub use error::{ContentError, Result};
pub use store::Gateway;
