use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use crate::models::ErrorDetail;
use std::fmt;

/// Failure of one of the backing data sources behind the aggregation path.
#[derive(Debug, Clone, PartialEq)]
pub enum UpstreamError {
    /// The source could not be reached or answered with a failure status.
    Unavailable {
        /// Which retrieval failed (summary, tickets, account).
        source: &'static str,
        message: String,
    },
    /// The source reported that the customer does not exist.
    NotFound(String),
    /// The source answered but the payload could not be used.
    InvalidResponse {
        /// Which retrieval failed (summary, tickets, account).
        source: &'static str,
        message: String,
    },
}

impl fmt::Display for UpstreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpstreamError::Unavailable { source, message } => {
                write!(f, "{} source unavailable: {}", source, message)
            }
            UpstreamError::NotFound(customer_id) => {
                write!(f, "Customer {} not found", customer_id)
            }
            UpstreamError::InvalidResponse { source, message } => {
                write!(f, "Invalid {} response: {}", source, message)
            }
        }
    }
}

impl std::error::Error for UpstreamError {}

/// Application-specific error types.
#[derive(Debug, Clone)]
pub enum AppError {
    /// A backing data source failed.
    Upstream(UpstreamError),
    /// Error with context chain for better debugging.
    WithContext {
        /// The underlying source of the error.
        source: Box<AppError>,
        /// Additional context message.
        context: String,
    },
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Upstream(e) => write!(f, "{}", e),
            AppError::WithContext { source, context } => {
                write!(f, "{}: {}", context, source)
            }
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    /// Converts the error into an HTTP response.
    ///
    /// Every variant becomes a 500 carrying the error text under `detail`.
    /// Not-found and unavailable upstreams share the same status.
    fn into_response(self) -> Response {
        match &self {
            AppError::Upstream(UpstreamError::NotFound(customer_id)) => {
                tracing::warn!("Upstream reported customer {} missing", customer_id);
            }
            AppError::Upstream(e) => tracing::error!("Upstream error: {}", e),
            AppError::WithContext { source, context } => {
                tracing::error!("Error with context: {} -> {}", context, source);
            }
        }

        let body = Json(ErrorDetail {
            detail: self.to_string(),
        });

        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

impl From<UpstreamError> for AppError {
    fn from(err: UpstreamError) -> Self {
        AppError::Upstream(err)
    }
}

/// Extension trait for adding context to errors.
/// Similar to `anyhow::Context` but for our `AppError` type.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T, AppError>;

    /// Add context lazily (only evaluated on error).
    fn with_context<F>(self, f: F) -> Result<T, AppError>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T, UpstreamError> {
    fn context(self, context: impl Into<String>) -> Result<T, AppError> {
        self.map_err(|e| AppError::WithContext {
            source: Box::new(AppError::Upstream(e)),
            context: context.into(),
        })
    }

    fn with_context<F>(self, f: F) -> Result<T, AppError>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| AppError::WithContext {
            source: Box::new(AppError::Upstream(e)),
            context: f(),
        })
    }
}
