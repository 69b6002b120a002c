//! Content Error Types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("{entity} not found")]
    NotFound { entity: String },

    #[error("Duplicate {entity}: {field}={value}")]
    Duplicate { entity: String, field: String, value: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("Store connection error: {message}")]
    Connection { message: String },

    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] bson::ser::Error),

    #[error("Deserialization error: {0}")]
    Deserialization(#[from] bson::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl ContentError {
    pub fn not_found(entity: impl Into<String>) -> Self {
        Self::NotFound { entity: entity.into() }
    }

    pub fn duplicate(
        entity: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::Duplicate {
            entity: entity.into(),
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation { message: message.into() }
    }

    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField { field: field.into() }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized { message: message.into() }
    }

    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection { message: message.into() }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal { message: message.into() }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Duplicate { .. } => StatusCode::CONFLICT,
            Self::Validation { .. } | Self::MissingField { .. } => StatusCode::BAD_REQUEST,
            Self::InvalidCredentials | Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short technical error string carried in the `error` field of the body.
    fn error_string(&self) -> String {
        match self {
            Self::NotFound { entity } => format!("{} not found", entity),
            Self::InvalidCredentials => "Invalid credentials".to_string(),
            Self::Database(_) | Self::Serialization(_) | Self::Deserialization(_) => {
                "Storage error".to_string()
            }
            other => other.to_string(),
        }
    }

    fn message_string(&self) -> String {
        match self {
            Self::NotFound { entity } => {
                format!("The requested {} does not exist", entity.to_lowercase())
            }
            Self::InvalidCredentials => "Invalid credentials".to_string(),
            Self::Database(_) | Self::Serialization(_) | Self::Deserialization(_) => {
                "A storage error occurred".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ContentError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = crate::api::common::ApiError {
            error: self.error_string(),
            message: self.message_string(),
        };
        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ContentError>;
