//! Repository Layer
//!
//! MongoDB repositories for the typed entities.

pub mod subscriber;
pub mod user;

pub use subscriber::SubscriberRepository;
pub use user::UserRepository;
