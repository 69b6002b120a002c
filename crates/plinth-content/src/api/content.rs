//! Content API
//!
//! One set of handlers serves every registered resource; the path tag
//! selects the schema and the lifecycle engine does the rest.
//!
//! Mounted at `/api` (and `/api/content` as an alias):
//!
//! - GET    /api/:resource          - list / singleton read (public)
//! - POST   /api/:resource          - create / singleton upsert
//! - PUT    /api/:resource          - update by body `_id` / singleton upsert
//! - DELETE /api/:resource?id=...   - single delete (soft or hard)
//! - DELETE /api/:resource/all      - bulk delete, returns the count

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use serde::Deserialize;
use serde_json::Value;

use crate::api::common::{DeletedResponse, SuccessResponse};
use crate::api::middleware::Authenticated;
use crate::engine::{LifecycleEngine, ListOptions};
use crate::error::ContentError;

/// Query parameters for content reads and deletes
#[derive(Debug, Deserialize, Default)]
pub struct ContentQuery {
    /// Include inactive documents in list reads
    #[serde(default)]
    pub admin: bool,
    /// Equality filter on the resource's `category` field
    pub category: Option<String>,
    /// Target document for single deletes
    pub id: Option<String>,
}

/// Content service state
#[derive(Clone)]
pub struct ContentState {
    pub engine: Arc<LifecycleEngine>,
}

/// Read a resource: singleton document or (filtered) list.
pub async fn read_resource(
    State(state): State<ContentState>,
    Path(resource): Path<String>,
    Query(query): Query<ContentQuery>,
) -> Result<Json<Value>, ContentError> {
    let spec = state.engine.spec(&resource)?;

    if spec.is_singleton() {
        let document = state.engine.get_singleton(&resource).await?;
        return Ok(Json(document));
    }

    let documents = state
        .engine
        .list(
            &resource,
            ListOptions {
                admin: query.admin,
                category: query.category,
            },
        )
        .await?;
    Ok(Json(Value::Array(documents)))
}

/// Create a document (201), or upsert for singleton resources (200).
pub async fn create_resource(
    _auth: Authenticated,
    State(state): State<ContentState>,
    Path(resource): Path<String>,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<Value>), ContentError> {
    let spec = state.engine.spec(&resource)?;

    if spec.is_singleton() {
        let document = state.engine.upsert_singleton(&resource, payload).await?;
        return Ok((StatusCode::OK, Json(document)));
    }

    let document = state.engine.create(&resource, payload).await?;
    Ok((StatusCode::CREATED, Json(document)))
}

/// Update a document by its body `_id`, or upsert for singleton resources.
pub async fn update_resource(
    _auth: Authenticated,
    State(state): State<ContentState>,
    Path(resource): Path<String>,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, ContentError> {
    let spec = state.engine.spec(&resource)?;

    if spec.is_singleton() {
        let document = state.engine.upsert_singleton(&resource, payload).await?;
        return Ok(Json(document));
    }

    let id = payload
        .get("_id")
        .and_then(Value::as_str)
        .ok_or_else(|| ContentError::missing_field("_id"))?
        .to_string();

    let document = state.engine.update(&resource, &id, payload).await?;
    Ok(Json(document))
}

/// Delete a single document; soft or hard per the resource descriptor.
pub async fn delete_resource(
    _auth: Authenticated,
    State(state): State<ContentState>,
    Path(resource): Path<String>,
    Query(query): Query<ContentQuery>,
) -> Result<Json<SuccessResponse>, ContentError> {
    let id = query
        .id
        .ok_or_else(|| ContentError::validation("query parameter 'id' is required"))?;

    state.engine.delete(&resource, &id).await?;
    Ok(Json(SuccessResponse::ok()))
}

/// Bulk-remove every document of a resource. Destructive; no dry-run.
pub async fn delete_all_resource(
    _auth: Authenticated,
    State(state): State<ContentState>,
    Path(resource): Path<String>,
) -> Result<Json<DeletedResponse>, ContentError> {
    let deleted_count = state.engine.delete_all(&resource).await?;
    Ok(Json(DeletedResponse { deleted_count }))
}

/// Create the content router
pub fn content_router(state: ContentState) -> Router {
    Router::new()
        .route(
            "/:resource",
            get(read_resource)
                .post(create_resource)
                .put(update_resource)
                .delete(delete_resource),
        )
        .route("/:resource/all", delete(delete_all_resource))
        .with_state(state)
}
