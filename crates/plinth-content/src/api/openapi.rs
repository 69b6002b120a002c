//! OpenAPI documentation for the typed endpoints.
//!
//! The schema-driven content endpoints accept and return free-form JSON per
//! the resource registry and are not enumerated here.

use utoipa::OpenApi;

use crate::api::{auth, common, newsletter};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Plinth API",
        description = "Content-management backend for an institutional website"
    ),
    paths(
        auth::register,
        auth::login,
        newsletter::subscribe,
        newsletter::unsubscribe,
        newsletter::list_subscribers,
    ),
    components(schemas(
        auth::RegisterRequest,
        auth::LoginRequest,
        auth::AuthResponse,
        auth::UserResponse,
        newsletter::SubscribeRequest,
        newsletter::SubscriberResponse,
        common::ApiError,
        common::SuccessResponse,
        common::DeletedResponse,
    )),
    tags(
        (name = "auth", description = "Account registration and login"),
        (name = "newsletter", description = "Subscriber management"),
    )
)]
pub struct PlinthApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_document_builds() {
        let doc = PlinthApiDoc::openapi();
        let json = doc.to_json().unwrap();
        assert!(json.contains("/login"));
        assert!(json.contains("SubscribeRequest"));
    }
}
