//! Newsletter API Endpoints
//!
//! - POST /api/newsletter - Subscribe (public)
//! - DELETE /api/newsletter/:email - Unsubscribe (public)
//! - GET /api/newsletter - List subscribers (admin)

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::common::SuccessResponse;
use crate::api::middleware::Authenticated;
use crate::domain::{Subscriber, SubscriberStatus};
use crate::error::ContentError;
use crate::repository::SubscriberRepository;

/// Subscribe request
#[derive(Debug, Deserialize, ToSchema)]
pub struct SubscribeRequest {
    pub email: String,
}

/// Subscriber DTO
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubscriberResponse {
    pub id: String,
    pub email: String,
    pub status: SubscriberStatus,
    pub created_at: String,
}

impl From<Subscriber> for SubscriberResponse {
    fn from(s: Subscriber) -> Self {
        Self {
            id: s.id,
            email: s.email,
            status: s.status,
            created_at: s.created_at.to_rfc3339(),
        }
    }
}

/// Newsletter service state
#[derive(Clone)]
pub struct NewsletterState {
    pub subscriber_repo: Arc<SubscriberRepository>,
}

/// Subscribe an email address.
///
/// A previously unsubscribed address is reactivated in place; the same
/// address never yields two subscriber documents.
#[utoipa::path(
    post,
    path = "/",
    tag = "newsletter",
    request_body = SubscribeRequest,
    responses(
        (status = 200, description = "Subscribed", body = SuccessResponse),
        (status = 409, description = "Already subscribed")
    )
)]
pub async fn subscribe(
    State(state): State<NewsletterState>,
    Json(req): Json<SubscribeRequest>,
) -> Result<Json<SuccessResponse>, ContentError> {
    let email = req.email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(ContentError::validation("a valid email address is required"));
    }

    match state.subscriber_repo.find_by_email(&email).await? {
        Some(mut existing) if !existing.is_active() => {
            existing.reactivate();
            state.subscriber_repo.update(&existing).await?;
            Ok(Json(SuccessResponse::with_message("Subscription reactivated")))
        }
        Some(_) => Err(ContentError::duplicate("Subscriber", "email", &email)),
        None => {
            let subscriber = Subscriber::new(&email);
            state.subscriber_repo.insert(&subscriber).await?;
            Ok(Json(SuccessResponse::with_message("Subscribed")))
        }
    }
}

/// Unsubscribe an email address (soft: the record is retained).
#[utoipa::path(
    delete,
    path = "/{email}",
    tag = "newsletter",
    params(("email" = String, Path, description = "Subscriber email")),
    responses(
        (status = 200, description = "Unsubscribed", body = SuccessResponse),
        (status = 404, description = "Unknown subscriber")
    )
)]
pub async fn unsubscribe(
    State(state): State<NewsletterState>,
    Path(email): Path<String>,
) -> Result<Json<SuccessResponse>, ContentError> {
    let mut subscriber = state
        .subscriber_repo
        .find_by_email(&email)
        .await?
        .ok_or_else(|| ContentError::not_found("Subscriber"))?;

    subscriber.unsubscribe();
    state.subscriber_repo.update(&subscriber).await?;

    Ok(Json(SuccessResponse::with_message("Unsubscribed")))
}

/// List all subscribers (admin)
#[utoipa::path(
    get,
    path = "/",
    tag = "newsletter",
    responses(
        (status = 200, description = "All subscribers", body = [SubscriberResponse]),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_subscribers(
    _auth: Authenticated,
    State(state): State<NewsletterState>,
) -> Result<Json<Vec<SubscriberResponse>>, ContentError> {
    let subscribers = state.subscriber_repo.find_all().await?;
    Ok(Json(subscribers.into_iter().map(Into::into).collect()))
}

/// Create the newsletter router
pub fn newsletter_router(state: NewsletterState) -> Router {
    Router::new()
        .route("/", get(list_subscribers).post(subscribe))
        .route("/:email", axum::routing::delete(unsubscribe))
        .with_state(state)
}
