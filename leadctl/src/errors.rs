use crate::db::errors::DbError;
use crate::types::BatchId;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::sync::OnceLock;
use thiserror::Error as ThisError;

/// Whether error responses carry the underlying error detail.
///
/// Set once at startup from config; defaults to off so internal detail is
/// never leaked unless explicitly enabled for diagnostics.
static EXPOSE_ERROR_DETAIL: OnceLock<bool> = OnceLock::new();

pub fn set_expose_error_detail(expose: bool) {
    let _ = EXPOSE_ERROR_DETAIL.set(expose);
}

fn expose_error_detail() -> bool {
    *EXPOSE_ERROR_DETAIL.get().unwrap_or(&false)
}

#[derive(ThisError, Debug)]
pub enum Error {
    /// Uploaded file could not be decoded
    #[error("Error parsing file: {message}")]
    Parse { message: String },

    /// Parsed data failed the required-column check (or the file was empty)
    #[error("{message}")]
    Validation {
        message: String,
        /// Columns actually present in the first record, for diagnostics
        columns_found: Vec<String>,
    },

    /// No agents exist in the system
    #[error("No agents found. Please add agents before uploading a list")]
    NoAgents,

    /// Fewer agents than a distribution requires
    #[error("Need at least 5 agents for distribution. You currently have {available} agent(s)")]
    InsufficientAgents { available: usize },

    /// Batch identifier collision on creation
    #[error("Batch {id} already exists")]
    DuplicateBatch { id: BatchId },

    /// Requested resource not found
    #[error("{resource} not found")]
    NotFound { resource: String, id: String },

    /// Batch status value outside the three-value enum
    #[error("Invalid status. Status must be one of: active, completed, archived")]
    InvalidStatus { value: String },

    /// Batch deletion blocked by items still in a non-completed status
    #[error("Cannot delete batch with {remaining} active items. Complete all tasks or update their status first.")]
    BatchNotEmpty { remaining: i64 },

    /// Upload exceeds the configured size limit
    #[error("{message}")]
    PayloadTooLarge { message: String },

    /// Invalid request data (bad extension, malformed multipart, bad id format)
    #[error("{message}")]
    BadRequest { message: String },

    /// Database operation error
    #[error(transparent)]
    Database(#[from] DbError),

    /// Unexpected error with full context chain
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Parse { .. }
            | Error::Validation { .. }
            | Error::NoAgents
            | Error::InsufficientAgents { .. }
            | Error::InvalidStatus { .. }
            | Error::BatchNotEmpty { .. }
            | Error::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::DuplicateBatch { .. } => StatusCode::CONFLICT,
            Error::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Error::Database(db_err) => match db_err {
                DbError::NotFound => StatusCode::NOT_FOUND,
                DbError::UniqueViolation { .. } => StatusCode::CONFLICT,
                DbError::ForeignKeyViolation { .. } => StatusCode::BAD_REQUEST,
                DbError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Error::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// User-safe message, without internal implementation detail
    pub fn user_message(&self) -> String {
        match self {
            Error::InsufficientAgents { available } => format!(
                "Need at least 5 agents for distribution. You currently have {} agent(s). Please add {} more agent(s).",
                available,
                5 - available
            ),
            Error::NotFound { resource, .. } => format!("{resource} not found"),
            Error::Database(db_err) => match db_err {
                DbError::NotFound => "Resource not found".to_string(),
                DbError::UniqueViolation { .. } => "Resource already exists".to_string(),
                DbError::ForeignKeyViolation { .. } => "Invalid reference to related resource".to_string(),
                DbError::Other(_) => "Server error".to_string(),
            },
            Error::Other(_) => "Server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        // Log full detail server-side; severity matches the error class
        match &self {
            Error::Database(DbError::Other(_)) | Error::Other(_) => {
                tracing::error!("Internal service error: {:#}", self);
            }
            Error::Database(_) | Error::DuplicateBatch { .. } => {
                tracing::warn!("Storage constraint error: {}", self);
            }
            Error::Validation { columns_found, .. } => {
                tracing::debug!(?columns_found, "Validation error: {}", self);
            }
            _ => {
                tracing::debug!("Client error: {}", self);
            }
        }

        let status = self.status_code();
        let body = if expose_error_detail() {
            json!({
                "success": false,
                "message": self.user_message(),
                "error": format!("{:#}", self),
            })
        } else {
            json!({
                "success": false,
                "message": self.user_message(),
            })
        };

        (status, axum::Json(body)).into_response()
    }
}

/// Type alias for service operation results
pub type Result<T> = std::result::Result<T, Error>;
