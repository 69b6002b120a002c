//! Resource Lifecycle Engine
//!
//! Generic CRUD + singleton upsert + notification emission over any
//! registered resource schema. Every endpoint in the content API is an
//! instantiation of this one engine; no per-resource handler code exists.
//!
//! Singleton materialization and upsert are single atomic
//! `find_one_and_update(upsert)` calls keyed on a fixed `_id`, so the
//! unique index makes concurrent first reads or writes converge on one
//! document.

use std::sync::Arc;

use bson::{doc, Bson, Document};
use futures::TryStreamExt;
use mongodb::options::ReturnDocument;
use mongodb::Collection;
use serde_json::Value;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

use plinth_common::ContentEvent;

use crate::error::{ContentError, Result};
use crate::schema::{DeleteMode, Registry, ResourceSpec};
use crate::slug;
use crate::store::Gateway;

/// Options for list reads
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    /// Admin callers see inactive documents too
    pub admin: bool,
    /// Optional equality filter on a `category` field
    pub category: Option<String>,
}

pub struct LifecycleEngine {
    gateway: Arc<Gateway>,
    registry: Registry,
    base_url: String,
    events: Option<UnboundedSender<ContentEvent>>,
}

impl LifecycleEngine {
    pub fn new(gateway: Arc<Gateway>, base_url: impl Into<String>) -> Self {
        Self {
            gateway,
            registry: Registry::standard(),
            base_url: base_url.into(),
            events: None,
        }
    }

    /// Attach the channel publishable creations are announced on.
    pub fn with_events(mut self, events: UnboundedSender<ContentEvent>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn spec(&self, tag: &str) -> Result<&ResourceSpec> {
        self.registry
            .get(tag)
            .ok_or_else(|| ContentError::not_found("Resource"))
    }

    async fn collection(&self, spec: &ResourceSpec) -> Result<Collection<Document>> {
        let db = self.gateway.ensure_connected().await?;
        Ok(db.collection::<Document>(spec.collection))
    }

    /// List documents, active-only unless the caller is an admin.
    /// An empty match is an empty vec, never an error.
    pub async fn list(&self, tag: &str, opts: ListOptions) -> Result<Vec<Value>> {
        let spec = self.spec(tag)?.clone();
        let collection = self.collection(&spec).await?;

        let filter = list_filter(&opts);
        let cursor = collection.find(filter).sort(spec.sort.to_doc()).await?;
        let documents: Vec<Document> = cursor.try_collect().await?;

        Ok(documents.into_iter().map(doc_to_json).collect())
    }

    /// Return the sole document of a singleton resource, materializing the
    /// documented defaults atomically if none exists yet.
    pub async fn get_singleton(&self, tag: &str) -> Result<Value> {
        let spec = self.spec(tag)?.clone();
        if !spec.is_singleton() {
            return Err(ContentError::validation(format!(
                "resource '{}' is not a singleton",
                tag
            )));
        }
        let collection = self.collection(&spec).await?;

        let mut on_insert = spec.default_document()?;
        stamp_on_insert(&mut on_insert);

        let document = collection
            .find_one_and_update(singleton_filter(&spec), doc! { "$setOnInsert": on_insert })
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await?
            .ok_or_else(|| ContentError::internal("singleton upsert returned no document"))?;

        Ok(doc_to_json(document))
    }

    /// Insert a new document; publishable resources announce the creation.
    pub async fn create(&self, tag: &str, payload: Value) -> Result<Value> {
        let spec = self.spec(tag)?.clone();
        let collection = self.collection(&spec).await?;

        let mut document = spec.validate_create(&payload)?;

        let generated_slug = spec.slug_from.map(|field| {
            let title = document.get_str(field).unwrap_or_default();
            slug::generate(title)
        });
        if let Some(s) = &generated_slug {
            document.insert("slug", s.clone());
        }

        document.insert("_id", uuid::Uuid::new_v4().to_string());
        document.insert("isActive", true);
        let now = bson::DateTime::now();
        document.insert("createdAt", now);
        document.insert("updatedAt", now);

        collection.insert_one(&document).await?;
        debug!(resource = tag, "created document");

        if spec.publishable {
            self.emit_created(&spec, &document, generated_slug.as_deref());
        }

        Ok(doc_to_json(document))
    }

    /// Replace a singleton's fields, creating it if absent. Atomic: never
    /// leaves two documents even under concurrent first-time writers.
    pub async fn upsert_singleton(&self, tag: &str, payload: Value) -> Result<Value> {
        let spec = self.spec(tag)?.clone();
        if !spec.is_singleton() {
            return Err(ContentError::validation(format!(
                "resource '{}' is not a singleton",
                tag
            )));
        }
        let collection = self.collection(&spec).await?;

        let mut set = spec.validate_update(&payload)?;
        set.insert("updatedAt", bson::DateTime::now());

        let mut on_insert = Document::new();
        stamp_on_insert(&mut on_insert);

        let document = collection
            .find_one_and_update(singleton_filter(&spec), doc! { "$set": set, "$setOnInsert": on_insert })
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await?
            .ok_or_else(|| ContentError::internal("singleton upsert returned no document"))?;

        Ok(doc_to_json(document))
    }

    /// Set only the supplied fields on an existing document.
    pub async fn update(&self, tag: &str, id: &str, payload: Value) -> Result<Value> {
        let spec = self.spec(tag)?.clone();
        let collection = self.collection(&spec).await?;

        let mut set = spec.validate_update(&payload)?;
        set.insert("updatedAt", bson::DateTime::now());

        let document = collection
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await?
            .ok_or_else(|| ContentError::not_found(spec.display_name))?;

        Ok(doc_to_json(document))
    }

    /// Remove a document: reversible (`isActive: false`) or permanent,
    /// per the resource descriptor.
    pub async fn delete(&self, tag: &str, id: &str) -> Result<()> {
        let spec = self.spec(tag)?.clone();
        if spec.is_singleton() {
            return Err(ContentError::validation(format!(
                "singleton resource '{}' cannot be deleted; use upsert to change it",
                tag
            )));
        }
        let collection = self.collection(&spec).await?;

        match spec.delete_mode {
            DeleteMode::Soft => {
                let result = collection
                    .update_one(
                        doc! { "_id": id },
                        doc! { "$set": { "isActive": false, "updatedAt": bson::DateTime::now() } },
                    )
                    .await?;
                if result.matched_count == 0 {
                    return Err(ContentError::not_found(spec.display_name));
                }
            }
            DeleteMode::Hard => {
                let result = collection.delete_one(doc! { "_id": id }).await?;
                if result.deleted_count == 0 {
                    return Err(ContentError::not_found(spec.display_name));
                }
            }
        }
        Ok(())
    }

    /// Remove every document of a resource. Administrative reset: permanent
    /// regardless of the resource's delete mode, returns the removed count.
    pub async fn delete_all(&self, tag: &str) -> Result<u64> {
        let spec = self.spec(tag)?.clone();
        let collection = self.collection(&spec).await?;

        let result = collection.delete_many(doc! {}).await?;
        Ok(result.deleted_count)
    }

    /// Fire-and-forget: a send failure is logged and never fails the create.
    fn emit_created(&self, spec: &ResourceSpec, document: &Document, slug: Option<&str>) {
        let Some(events) = &self.events else { return };

        let title = spec
            .title_field()
            .and_then(|f| document.get_str(f).ok())
            .unwrap_or(spec.display_name)
            .to_string();
        let message = format!("New {} published: {}", spec.display_name.to_lowercase(), title);
        let link = notification_link(&self.base_url, spec.tag, slug);

        let event = ContentEvent::new(spec.tag, title, message, link);
        if let Err(e) = events.send(event) {
            warn!(resource = spec.tag, "notification channel closed, event dropped: {}", e);
        }
    }
}

/// Singletons live under a fixed `_id` (the resource tag). The `_id`
/// unique index is what serializes concurrent upserts: both writers
/// target the same key, so the server converges them on one document.
fn singleton_filter(spec: &ResourceSpec) -> Document {
    doc! { "_id": spec.tag }
}

/// Bookkeeping fields for upsert inserts. The `_id` comes from the
/// filter, never from here.
fn stamp_on_insert(on_insert: &mut Document) {
    on_insert.insert("isActive", true);
    on_insert.insert("createdAt", bson::DateTime::now());
}

/// Default public filter excludes soft-deleted documents.
fn list_filter(opts: &ListOptions) -> Document {
    let mut filter = Document::new();
    if !opts.admin {
        filter.insert("isActive", true);
    }
    if let Some(category) = &opts.category {
        filter.insert("category", category.clone());
    }
    filter
}

fn notification_link(base_url: &str, tag: &str, slug: Option<&str>) -> String {
    let base = base_url.trim_end_matches('/');
    match slug {
        Some(s) => format!("{}/{}/{}", base, tag, s),
        None => format!("{}/{}", base, tag),
    }
}

/// Convert a stored document into its JSON wire form.
/// Timestamps render as RFC 3339 strings rather than extended-JSON wrappers.
pub fn doc_to_json(document: Document) -> Value {
    bson_to_json(Bson::Document(document))
}

fn bson_to_json(value: Bson) -> Value {
    match value {
        Bson::Document(doc) => Value::Object(
            doc.into_iter()
                .map(|(k, v)| (k, bson_to_json(v)))
                .collect(),
        ),
        Bson::Array(items) => Value::Array(items.into_iter().map(bson_to_json).collect()),
        Bson::String(s) => Value::String(s),
        Bson::Boolean(b) => Value::Bool(b),
        Bson::Int32(n) => Value::from(n),
        Bson::Int64(n) => Value::from(n),
        Bson::Double(n) => serde_json::Number::from_f64(n)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        Bson::Null => Value::Null,
        Bson::DateTime(dt) => dt
            .try_to_rfc3339_string()
            .map(Value::String)
            .unwrap_or_else(|_| Value::from(dt.timestamp_millis())),
        other => other.into_relaxed_extjson(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_filter_defaults_to_active_only() {
        let filter = list_filter(&ListOptions::default());
        assert_eq!(filter, doc! { "isActive": true });
    }

    #[test]
    fn test_list_filter_admin_is_unfiltered() {
        let filter = list_filter(&ListOptions { admin: true, category: None });
        assert!(filter.is_empty());
    }

    #[test]
    fn test_list_filter_category() {
        let filter = list_filter(&ListOptions {
            admin: false,
            category: Some("sports".to_string()),
        });
        assert_eq!(filter, doc! { "isActive": true, "category": "sports" });
    }

    #[test]
    fn test_notification_link_with_slug() {
        assert_eq!(
            notification_link("http://site.example/", "news", Some("opening-day-abc1")),
            "http://site.example/news/opening-day-abc1"
        );
        assert_eq!(
            notification_link("http://site.example", "notice", None),
            "http://site.example/notice"
        );
    }

    #[test]
    fn test_doc_to_json_renders_datetime_as_rfc3339() {
        let document = doc! {
            "_id": "abc",
            "title": "t",
            "isActive": true,
            "createdAt": bson::DateTime::from_millis(1_700_000_000_000),
            "rank": 3_i32,
        };
        let json = doc_to_json(document);
        assert_eq!(json["_id"], "abc");
        assert_eq!(json["isActive"], true);
        assert_eq!(json["rank"], 3);
        let created = json["createdAt"].as_str().unwrap();
        assert!(created.starts_with("2023-11-14T"));
    }

    #[test]
    fn test_doc_to_json_nested() {
        let document = doc! {
            "items": [ { "label": "Tuition", "amount": 1200_i64 } ],
            "notes": Bson::Null,
        };
        let json = doc_to_json(document);
        assert_eq!(json["items"][0]["label"], "Tuition");
        assert_eq!(json["items"][0]["amount"], 1200);
        assert!(json["notes"].is_null());
    }

    #[test]
    fn test_stamp_on_insert_bookkeeping() {
        let mut doc = Document::new();
        stamp_on_insert(&mut doc);
        assert!(!doc.contains_key("_id"));
        assert!(doc.get_bool("isActive").unwrap());
        assert!(doc.get_datetime("createdAt").is_ok());
    }

    #[test]
    fn test_singleton_filter_pins_the_document_id() {
        // Both concurrent upserters must target the same key, or the
        // upsert degenerates into two inserts.
        let registry = Registry::standard();
        let spec = registry.get("site-settings").unwrap();
        assert_eq!(singleton_filter(spec), doc! { "_id": "site-settings" });
    }

    #[tokio::test]
    async fn test_singleton_delete_is_rejected_before_store_access() {
        // The empty-URL gateway would surface a Connection error if the
        // store were touched; the guard must fire first.
        let engine = LifecycleEngine::new(Arc::new(Gateway::new("", "plinth")), "http://site");
        let err = engine.delete("site-settings", "anything").await.unwrap_err();
        assert!(matches!(err, ContentError::Validation { .. }));
    }
}
