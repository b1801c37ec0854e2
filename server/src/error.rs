//! API error type and its HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::error;
use userbase_store::StoreError;

/// Result type for request handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors a request can end in.
#[derive(Debug, Error)]
pub enum ApiError {
    /// One or more declared arguments failed their type or choice check.
    /// Maps field name to its help text.
    #[error("invalid arguments: {}", .0.keys().cloned().collect::<Vec<_>>().join(", "))]
    InvalidArguments(BTreeMap<String, String>),

    /// Strict parsing saw fields nobody declared.
    #[error("Unknown arguments: {}", .0.join(", "))]
    UnknownArguments(Vec<String>),

    /// The body could not be read as a JSON object or form.
    #[error("malformed request body: {0}")]
    MalformedBody(String),

    /// No user with the requested id.
    #[error("not found")]
    NotFound,

    #[error("method not allowed")]
    MethodNotAllowed,

    #[error(transparent)]
    Store(#[from] StoreError),

    /// A blocking store call panicked or was cancelled.
    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ApiError {
    /// HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidArguments(_) | Self::UnknownArguments(_) | Self::MalformedBody(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::NotFound | Self::Store(StoreError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Store(StoreError::DuplicateName(_)) => StatusCode::CONFLICT,
            Self::Store(_) | Self::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> Value {
        match self {
            Self::InvalidArguments(fields) => {
                let fields: Map<String, Value> = fields
                    .iter()
                    .map(|(name, help)| (name.clone(), Value::from(help.as_str())))
                    .collect();
                json!({ "message": fields })
            }
            Self::NotFound | Self::Store(StoreError::NotFound(_)) => json!({}),
            Self::Store(StoreError::DuplicateName(_))
            | Self::UnknownArguments(_)
            | Self::MalformedBody(_)
            | Self::MethodNotAllowed => json!({ "message": self.to_string() }),
            Self::Store(_) | Self::Task(_) => json!({ "message": "Internal Server Error" }),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("request failed: {}", self);
        }
        (status, Json(self.body())).into_response()
    }
}
