//! Resource Schema Registry
//!
//! Declarative document shapes for every content resource. Each resource is
//! described once (fields, kind, delete mode, sort, publishable flag) and the
//! lifecycle engine drives all CRUD behavior off the descriptor, instead of
//! reimplementing near-identical handlers per resource.
//!
//! Validation is structural only: required-ness and field kind, checked at
//! write time. There is no cross-field or cross-resource validation.

use std::collections::HashMap;

use bson::{doc, Bson, Document};
use serde_json::Value;

use crate::error::{ContentError, Result};

/// Structural kind of a document field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    Flag,
    List,
    Object,
}

impl FieldKind {
    fn matches(&self, value: &Value) -> bool {
        match self {
            FieldKind::Text => value.is_string(),
            FieldKind::Number => value.is_number(),
            FieldKind::Flag => value.is_boolean(),
            FieldKind::List => value.is_array(),
            FieldKind::Object => value.is_object(),
        }
    }

    fn empty_value(&self) -> Value {
        match self {
            FieldKind::Text => Value::String(String::new()),
            FieldKind::Number => Value::from(0),
            FieldKind::Flag => Value::Bool(false),
            FieldKind::List => Value::Array(Vec::new()),
            FieldKind::Object => Value::Object(serde_json::Map::new()),
        }
    }
}

/// A single field in a resource schema
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub default: Option<Value>,
}

impl FieldSpec {
    pub fn required(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind, required: true, default: None }
    }

    pub fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind, required: false, default: None }
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }
}

/// Singleton resources hold at most one meaningful document;
/// collection resources hold many.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Singleton,
    Collection,
}

/// Whether a delete flips `isActive` or removes the document permanently
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteMode {
    Soft,
    Hard,
}

/// Natural sort key for list reads
#[derive(Debug, Clone, Copy)]
pub struct SortKey {
    pub field: &'static str,
    pub ascending: bool,
}

impl SortKey {
    pub fn asc(field: &'static str) -> Self {
        Self { field, ascending: true }
    }

    pub fn newest_first() -> Self {
        Self { field: "createdAt", ascending: false }
    }

    pub fn to_doc(&self) -> Document {
        doc! { self.field: if self.ascending { 1 } else { -1 } }
    }
}

/// Full descriptor for a content resource
#[derive(Debug, Clone)]
pub struct ResourceSpec {
    /// URL tag, e.g. "academic-calendar"
    pub tag: &'static str,
    /// Human name used in error messages, e.g. "Calendar"
    pub display_name: &'static str,
    /// Store collection name
    pub collection: &'static str,
    pub kind: ResourceKind,
    pub delete_mode: DeleteMode,
    /// Creation triggers subscriber notification
    pub publishable: bool,
    pub sort: SortKey,
    /// Field a slug is derived from at creation time, if any
    pub slug_from: Option<&'static str>,
    pub fields: Vec<FieldSpec>,
}

impl ResourceSpec {
    pub fn collection(tag: &'static str, display_name: &'static str, collection: &'static str) -> Self {
        Self {
            tag,
            display_name,
            collection,
            kind: ResourceKind::Collection,
            delete_mode: DeleteMode::Soft,
            publishable: false,
            sort: SortKey::newest_first(),
            slug_from: None,
            fields: Vec::new(),
        }
    }

    pub fn singleton(tag: &'static str, display_name: &'static str, collection: &'static str) -> Self {
        Self {
            tag,
            display_name,
            collection,
            kind: ResourceKind::Singleton,
            delete_mode: DeleteMode::Soft,
            publishable: false,
            sort: SortKey::newest_first(),
            slug_from: None,
            fields: Vec::new(),
        }
    }

    pub fn publishable(mut self) -> Self {
        self.publishable = true;
        self
    }

    pub fn hard_delete(mut self) -> Self {
        self.delete_mode = DeleteMode::Hard;
        self
    }

    pub fn sorted_by(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }

    pub fn slugged(mut self, slug_from: &'static str) -> Self {
        self.slug_from = slug_from.into();
        self
    }

    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    pub fn is_singleton(&self) -> bool {
        self.kind == ResourceKind::Singleton
    }

    /// Field used as the notification title, when one exists
    pub fn title_field(&self) -> Option<&'static str> {
        self.slug_from.or_else(|| {
            self.fields
                .iter()
                .find(|f| f.name == "title" || f.name == "name")
                .map(|f| f.name)
        })
    }

    /// The default field set a singleton is materialized from
    pub fn default_document(&self) -> Result<Document> {
        let mut out = Document::new();
        for field in &self.fields {
            let value = field
                .default
                .clone()
                .unwrap_or_else(|| field.kind.empty_value());
            out.insert(field.name, json_to_bson(&value)?);
        }
        Ok(out)
    }

    /// Validate a create payload: required fields enforced, defaults applied,
    /// unregistered fields dropped.
    pub fn validate_create(&self, payload: &Value) -> Result<Document> {
        let object = payload
            .as_object()
            .ok_or_else(|| ContentError::validation("request body must be a JSON object"))?;

        let mut out = Document::new();
        for field in &self.fields {
            match object.get(field.name) {
                Some(value) if !value.is_null() => {
                    if !field.kind.matches(value) {
                        return Err(kind_mismatch(field));
                    }
                    out.insert(field.name, json_to_bson(value)?);
                }
                _ if field.required => {
                    return Err(ContentError::missing_field(field.name));
                }
                _ => {
                    if let Some(default) = &field.default {
                        out.insert(field.name, json_to_bson(default)?);
                    }
                }
            }
        }
        Ok(out)
    }

    /// Validate an update payload: only supplied fields, type-checked; a
    /// required field explicitly set to null is rejected.
    pub fn validate_update(&self, payload: &Value) -> Result<Document> {
        let object = payload
            .as_object()
            .ok_or_else(|| ContentError::validation("request body must be a JSON object"))?;

        let mut out = Document::new();
        for field in &self.fields {
            match object.get(field.name) {
                Some(value) if value.is_null() => {
                    if field.required {
                        return Err(ContentError::missing_field(field.name));
                    }
                    out.insert(field.name, Bson::Null);
                }
                Some(value) => {
                    if !field.kind.matches(value) {
                        return Err(kind_mismatch(field));
                    }
                    out.insert(field.name, json_to_bson(value)?);
                }
                None => {}
            }
        }
        Ok(out)
    }
}

fn kind_mismatch(field: &FieldSpec) -> ContentError {
    ContentError::validation(format!(
        "field '{}' has the wrong type (expected {:?})",
        field.name, field.kind
    ))
}

fn json_to_bson(value: &Value) -> Result<Bson> {
    Bson::try_from(value.clone())
        .map_err(|e| ContentError::validation(format!("unsupported field value: {}", e)))
}

/// All registered resources, looked up by URL tag
pub struct Registry {
    specs: HashMap<&'static str, ResourceSpec>,
}

impl Registry {
    pub fn standard() -> Self {
        let mut specs = HashMap::new();
        for spec in standard_specs() {
            specs.insert(spec.tag, spec);
        }
        Self { specs }
    }

    pub fn get(&self, tag: &str) -> Option<&ResourceSpec> {
        self.specs.get(tag)
    }

    pub fn tags(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.specs.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::standard()
    }
}

fn standard_specs() -> Vec<ResourceSpec> {
    use FieldKind::*;

    vec![
        // ---- Singletons ------------------------------------------------
        ResourceSpec::singleton("site-settings", "Settings", "site_settings")
            .field(FieldSpec::optional("siteName", Text).with_default("Institution".into()))
            .field(FieldSpec::optional("tagline", Text))
            .field(FieldSpec::optional("logoUrl", Text))
            .field(FieldSpec::optional("contactEmail", Text))
            .field(FieldSpec::optional("socialLinks", Object)),
        ResourceSpec::singleton("about-us", "About", "about_us")
            .field(FieldSpec::optional("heading", Text).with_default("About Us".into()))
            .field(FieldSpec::optional("body", Text))
            .field(FieldSpec::optional("mission", Text))
            .field(FieldSpec::optional("vision", Text))
            .field(FieldSpec::optional("imageUrl", Text)),
        ResourceSpec::singleton("homepage", "Homepage", "homepage")
            .field(FieldSpec::optional("heroTitle", Text))
            .field(FieldSpec::optional("heroSubtitle", Text))
            .field(FieldSpec::optional("bannerUrls", List))
            .field(FieldSpec::optional("highlights", List)),
        ResourceSpec::singleton("contact-info", "Contact", "contact_info")
            .field(FieldSpec::optional("address", Text))
            .field(FieldSpec::optional("phone", Text))
            .field(FieldSpec::optional("email", Text))
            .field(FieldSpec::optional("mapEmbedUrl", Text)),
        ResourceSpec::singleton("admission-info", "Admission", "admission_info")
            .field(FieldSpec::optional("heading", Text).with_default("Admissions".into()))
            .field(FieldSpec::optional("body", Text))
            .field(FieldSpec::optional("requirements", List))
            .field(FieldSpec::optional("deadline", Text)),
        // ---- Publishable collections -----------------------------------
        ResourceSpec::collection("news", "News", "news")
            .publishable()
            .slugged("title")
            .field(FieldSpec::required("title", Text))
            .field(FieldSpec::required("body", Text))
            .field(FieldSpec::optional("category", Text))
            .field(FieldSpec::optional("imageUrl", Text)),
        ResourceSpec::collection("events", "Event", "events")
            .publishable()
            .slugged("title")
            .field(FieldSpec::required("title", Text))
            .field(FieldSpec::required("date", Text))
            .field(FieldSpec::optional("location", Text))
            .field(FieldSpec::optional("body", Text)),
        ResourceSpec::collection("notice", "Notice", "notices")
            .publishable()
            .field(FieldSpec::required("title", Text))
            .field(FieldSpec::required("body", Text))
            .field(FieldSpec::optional("category", Text))
            .field(FieldSpec::optional("attachmentUrl", Text)),
        ResourceSpec::collection("academic-calendar", "Calendar", "academic_calendars")
            .publishable()
            .field(FieldSpec::required("title", Text))
            .field(FieldSpec::required("year", Text))
            .field(FieldSpec::optional("entries", List))
            .field(FieldSpec::optional("fileUrl", Text)),
        ResourceSpec::collection("class-routine", "Routine", "class_routines")
            .publishable()
            .sorted_by(SortKey::asc("className"))
            .field(FieldSpec::required("className", Text))
            .field(FieldSpec::required("section", Text))
            .field(FieldSpec::optional("periods", List))
            .field(FieldSpec::optional("fileUrl", Text)),
        ResourceSpec::collection("fee-structure", "Fee structure", "fee_structures")
            .publishable()
            .sorted_by(SortKey::asc("className"))
            .field(FieldSpec::required("className", Text))
            .field(FieldSpec::required("items", List))
            .field(FieldSpec::optional("session", Text))
            .field(FieldSpec::optional("notes", Text)),
        ResourceSpec::collection("curriculum", "Curriculum", "curricula")
            .publishable()
            .sorted_by(SortKey::asc("className"))
            .field(FieldSpec::required("className", Text))
            .field(FieldSpec::required("subjects", List))
            .field(FieldSpec::optional("session", Text)),
        ResourceSpec::collection("syllabus", "Syllabus", "syllabi")
            .publishable()
            .sorted_by(SortKey::asc("className"))
            .field(FieldSpec::required("className", Text))
            .field(FieldSpec::required("subject", Text))
            .field(FieldSpec::optional("outline", List))
            .field(FieldSpec::optional("fileUrl", Text)),
        // ---- Soft-delete collections -----------------------------------
        ResourceSpec::collection("committee", "Committee member", "committee_members")
            .sorted_by(SortKey::asc("name"))
            .field(FieldSpec::required("name", Text))
            .field(FieldSpec::required("designation", Text))
            .field(FieldSpec::optional("photoUrl", Text))
            .field(FieldSpec::optional("rank", Number)),
        ResourceSpec::collection("review", "Review", "reviews")
            .field(FieldSpec::required("author", Text))
            .field(FieldSpec::required("body", Text))
            .field(FieldSpec::optional("rating", Number))
            .field(FieldSpec::optional("photoUrl", Text)),
        ResourceSpec::collection("gallery", "Gallery item", "gallery_items")
            .field(FieldSpec::required("imageUrl", Text))
            .field(FieldSpec::optional("caption", Text))
            .field(FieldSpec::optional("category", Text)),
        ResourceSpec::collection("staff", "Staff member", "staff_members")
            .sorted_by(SortKey::asc("name"))
            .field(FieldSpec::required("name", Text))
            .field(FieldSpec::required("designation", Text))
            .field(FieldSpec::optional("subject", Text))
            .field(FieldSpec::optional("photoUrl", Text)),
        // ---- Hard-delete collections (no undo requirement) -------------
        ResourceSpec::collection("assignment", "Assignment", "assignments")
            .hard_delete()
            .field(FieldSpec::required("title", Text))
            .field(FieldSpec::required("className", Text))
            .field(FieldSpec::optional("dueDate", Text))
            .field(FieldSpec::optional("fileUrl", Text)),
        ResourceSpec::collection("message", "Message", "messages")
            .hard_delete()
            .field(FieldSpec::required("name", Text))
            .field(FieldSpec::required("email", Text))
            .field(FieldSpec::required("body", Text)),
        ResourceSpec::collection("exam-result", "Exam result", "exam_results")
            .hard_delete()
            .sorted_by(SortKey::asc("className"))
            .field(FieldSpec::required("className", Text))
            .field(FieldSpec::required("examName", Text))
            .field(FieldSpec::optional("results", List))
            .field(FieldSpec::optional("fileUrl", Text)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn news_spec() -> ResourceSpec {
        Registry::standard().get("news").unwrap().clone()
    }

    #[test]
    fn test_registry_contains_expected_resources() {
        let registry = Registry::standard();
        assert!(registry.get("site-settings").is_some());
        assert!(registry.get("academic-calendar").is_some());
        assert!(registry.get("exam-result").is_some());
        assert!(registry.get("nonexistent").is_none());
        assert_eq!(registry.get("academic-calendar").unwrap().display_name, "Calendar");
    }

    #[test]
    fn test_singletons_are_flagged() {
        let registry = Registry::standard();
        assert!(registry.get("about-us").unwrap().is_singleton());
        assert!(!registry.get("news").unwrap().is_singleton());
    }

    #[test]
    fn test_delete_modes() {
        let registry = Registry::standard();
        assert_eq!(registry.get("news").unwrap().delete_mode, DeleteMode::Soft);
        assert_eq!(registry.get("message").unwrap().delete_mode, DeleteMode::Hard);
        assert_eq!(registry.get("assignment").unwrap().delete_mode, DeleteMode::Hard);
    }

    #[test]
    fn test_validate_create_accepts_valid_payload() {
        let doc = news_spec()
            .validate_create(&json!({"title": "Opening day", "body": "Doors at 9"}))
            .unwrap();
        assert_eq!(doc.get_str("title").unwrap(), "Opening day");
        assert_eq!(doc.get_str("body").unwrap(), "Doors at 9");
    }

    #[test]
    fn test_validate_create_rejects_missing_required() {
        let err = news_spec()
            .validate_create(&json!({"title": "No body"}))
            .unwrap_err();
        assert!(matches!(err, ContentError::MissingField { ref field } if field == "body"));
    }

    #[test]
    fn test_validate_create_rejects_wrong_kind() {
        let err = news_spec()
            .validate_create(&json!({"title": 42, "body": "x"}))
            .unwrap_err();
        assert!(matches!(err, ContentError::Validation { .. }));
    }

    #[test]
    fn test_validate_create_drops_unregistered_fields() {
        let doc = news_spec()
            .validate_create(&json!({"title": "t", "body": "b", "isActive": false, "evil": 1}))
            .unwrap();
        assert!(!doc.contains_key("evil"));
        assert!(!doc.contains_key("isActive"));
    }

    #[test]
    fn test_validate_create_applies_defaults() {
        let spec = Registry::standard().get("site-settings").unwrap().clone();
        let doc = spec.validate_create(&json!({})).unwrap();
        assert_eq!(doc.get_str("siteName").unwrap(), "Institution");
        assert!(!doc.contains_key("tagline"));
    }

    #[test]
    fn test_validate_update_only_supplied_fields() {
        let doc = news_spec()
            .validate_update(&json!({"title": "New title"}))
            .unwrap();
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.get_str("title").unwrap(), "New title");
    }

    #[test]
    fn test_validate_update_rejects_null_required() {
        let err = news_spec()
            .validate_update(&json!({"title": null}))
            .unwrap_err();
        assert!(matches!(err, ContentError::MissingField { .. }));
    }

    #[test]
    fn test_validate_update_nulls_optional_field() {
        let doc = news_spec()
            .validate_update(&json!({"category": null}))
            .unwrap();
        assert_eq!(doc.get("category"), Some(&Bson::Null));
    }

    #[test]
    fn test_default_document_covers_all_fields() {
        let spec = Registry::standard().get("homepage").unwrap().clone();
        let doc = spec.default_document().unwrap();
        assert!(doc.contains_key("heroTitle"));
        assert!(doc.contains_key("bannerUrls"));
    }

    #[test]
    fn test_sort_key_docs() {
        assert_eq!(SortKey::newest_first().to_doc(), doc! { "createdAt": -1 });
        assert_eq!(SortKey::asc("name").to_doc(), doc! { "name": 1 });
    }
}
