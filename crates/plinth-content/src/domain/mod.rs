//! Domain Models
//!
//! Typed entities with fixed shapes: newsletter subscribers and admin user
//! accounts. Content documents are schema-driven and live in the engine.

pub mod subscriber;
pub mod user;

pub use subscriber::*;
pub use user::*;
