use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Every failure the relay can surface to a caller.
/// The request handlers convert these into `{ error, details? }` JSON bodies.
#[derive(Debug, Error)]
pub enum AppError {
    // ── Request validation ───────────────────────────────────────────────────
    #[error("Message is required.")]
    MissingInput,

    // ── Upstream (Gemini) ────────────────────────────────────────────────────
    #[error("Gemini API key not set.")]
    MissingCredential,

    #[error("Gemini request failed: {message}")]
    UpstreamError { message: String, status: Option<u16> },

    // ── Conversation store ───────────────────────────────────────────────────
    #[error("Conversation store not connected.")]
    StoreUnavailable,

    #[error("Database query failed: {message}")]
    DatabaseQueryFailed {
        message: String,
        #[source]
        source: sqlx::Error,
    },
}

impl AppError {
    pub fn db_query(message: impl Into<String>, source: sqlx::Error) -> Self {
        AppError::DatabaseQueryFailed { message: message.into(), source }
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        AppError::UpstreamError { message: message.into(), status: None }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::MissingInput)
    }

    pub fn status_code(&self) -> StatusCode {
        if self.is_validation() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    /// The message shown to HTTP callers. Upstream and database detail stays in the logs.
    pub fn public_message(&self) -> &'static str {
        match self {
            AppError::MissingInput => "Message is required.",
            AppError::MissingCredential => "Gemini API key not set.",
            AppError::UpstreamError { .. } => "Error contacting Gemini API.",
            AppError::StoreUnavailable => "Conversation store not connected.",
            AppError::DatabaseQueryFailed { .. } => "Error fetching chat history.",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = match &self {
            AppError::UpstreamError { status: Some(status), .. } => json!({
                "error": self.public_message(),
                "details": { "status": status },
            }),
            _ => json!({ "error": self.public_message() }),
        };
        (self.status_code(), Json(body)).into_response()
    }
}
