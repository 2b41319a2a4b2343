//! Unified error handling
//!
//! Generation failures are classified by [`FailureKind`] so the HTTP layer
//! can tell an authentication problem from a rate limit or a network fault
//! without exposing provider bodies.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::services::export::ExportError;
use crate::services::validator::ResponseViolation;

/// Failure of a single round trip to the LLM provider.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("LLM provider returned {status}: {body}")]
    Http {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("LLM provider request failed: {0}")]
    Network(#[source] reqwest::Error),

    #[error("malformed LLM provider response: {0}")]
    MalformedResponse(String),

    #[error("LLM provider request cancelled")]
    Cancelled,
}

/// Why one generation attempt did not produce a document.
#[derive(Debug, Error)]
pub enum AttemptError {
    #[error("empty response")]
    EmptyOutput,

    #[error("malformed JSON: {0}")]
    MalformedPayload(String),

    #[error("invalid response structure: {0}")]
    StructuralInvalid(#[from] ResponseViolation),
}

/// Terminal outcome of a failed generation call.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("AI generation failed after {attempts} attempt(s): {last}")]
    Exhausted { attempts: u32, last: AttemptError },

    #[error(transparent)]
    Transport(CompletionError),

    #[error("document generation was cancelled")]
    Cancelled,

    #[error("failed to serialize model context: {0}")]
    Prompt(#[from] serde_json::Error),

    #[error("AI generation failed after all retry attempts")]
    NoAttempts,
}

/// Failure classes surfaced to the shell for user-facing messaging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Authentication,
    RateLimited,
    ProviderUnavailable,
    ProviderRejected,
    Network,
    EmptyOutput,
    MalformedPayload,
    StructuralInvalid,
    Cancelled,
    Exhausted,
    Internal,
}

impl CompletionError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Http { status, .. } => match status.as_u16() {
                401 | 403 => FailureKind::Authentication,
                429 => FailureKind::RateLimited,
                500..=599 => FailureKind::ProviderUnavailable,
                _ => FailureKind::ProviderRejected,
            },
            Self::Network(_) => FailureKind::Network,
            Self::MalformedResponse(_) => FailureKind::MalformedPayload,
            Self::Cancelled => FailureKind::Cancelled,
        }
    }
}

impl AttemptError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::EmptyOutput => FailureKind::EmptyOutput,
            Self::MalformedPayload(_) => FailureKind::MalformedPayload,
            Self::StructuralInvalid(_) => FailureKind::StructuralInvalid,
        }
    }
}

impl GenerationError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Exhausted { last, .. } => last.kind(),
            Self::Transport(e) => e.kind(),
            Self::Cancelled => FailureKind::Cancelled,
            Self::Prompt(_) => FailureKind::Internal,
            Self::NoAttempts => FailureKind::Exhausted,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not implemented: {0}")]
    NotImplemented(String),

    #[error("Generation failed: {0}")]
    Generation(#[from] GenerationError),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

/// JSON error body. A copy rides in the response extensions so
/// [`attach_request_id`](crate::middleware::attach_request_id) can re-emit it
/// with the request id filled in.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<FailureKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// Non-standard status used when the caller abandoned the request.
const CLIENT_CLOSED_REQUEST: u16 = 499;

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotImplemented(_) => StatusCode::NOT_IMPLEMENTED,
            Self::Generation(e) => match e.kind() {
                FailureKind::RateLimited => StatusCode::TOO_MANY_REQUESTS,
                FailureKind::ProviderUnavailable => StatusCode::SERVICE_UNAVAILABLE,
                FailureKind::Network => StatusCode::GATEWAY_TIMEOUT,
                FailureKind::Cancelled => StatusCode::from_u16(CLIENT_CLOSED_REQUEST)
                    .unwrap_or(StatusCode::BAD_REQUEST),
                FailureKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
                _ => StatusCode::BAD_GATEWAY,
            },
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::NotImplemented(_) => "NOT_IMPLEMENTED",
            Self::Generation(e) => match e.kind() {
                FailureKind::Authentication => "AI_AUTH_FAILED",
                FailureKind::RateLimited => "AI_RATE_LIMITED",
                FailureKind::ProviderUnavailable => "AI_UNAVAILABLE",
                FailureKind::Network => "AI_NETWORK_ERROR",
                FailureKind::Cancelled => "CANCELLED",
                FailureKind::Internal => "INTERNAL_ERROR",
                _ => "AI_GENERATION_FAILED",
            },
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn public_message(&self) -> String {
        match self {
            Self::BadRequest(msg) => msg.clone(),
            Self::NotImplemented(msg) => msg.clone(),
            // Provider bodies stay in the logs
            Self::Generation(e) => match e.kind() {
                FailureKind::Authentication => {
                    "The AI provider rejected the configured credentials".to_string()
                }
                FailureKind::RateLimited => {
                    "The AI provider rate limit was reached, try again later".to_string()
                }
                FailureKind::ProviderUnavailable => "The AI provider is unavailable".to_string(),
                FailureKind::ProviderRejected => "The AI provider rejected the request".to_string(),
                FailureKind::Network => "Could not reach the AI provider".to_string(),
                FailureKind::EmptyOutput => "The AI returned an empty response".to_string(),
                FailureKind::MalformedPayload => "The AI returned malformed output".to_string(),
                FailureKind::StructuralInvalid => {
                    "The AI returned an incomplete document".to_string()
                }
                FailureKind::Cancelled => "Document generation was cancelled".to_string(),
                FailureKind::Exhausted => "Document generation failed".to_string(),
                FailureKind::Internal => "An internal error occurred".to_string(),
            },
            Self::Internal(_) => "An internal error occurred".to_string(),
        }
    }

    fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Self::Generation(e) => Some(e.kind()),
            _ => None,
        }
    }
}

impl From<ExportError> for ApiError {
    fn from(e: ExportError) -> Self {
        match e {
            ExportError::Unsupported(format) => {
                Self::NotImplemented(format!("{} export is not available yet", format.label()))
            }
            ExportError::Io(e) => Self::Internal(e.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::Generation(e) if e.is_cancelled() => {
                tracing::info!("Document generation cancelled");
            }
            Self::Generation(e) => {
                tracing::error!(error = %e, kind = ?e.kind(), "Document generation failed");
            }
            Self::Internal(e) => {
                tracing::error!(error = ?e, "Internal server error");
            }
            _ => {
                tracing::warn!(error = %self, "API error");
            }
        }

        let status = self.status_code();
        let body = ErrorResponse {
            code: self.error_code().to_string(),
            message: self.public_message(),
            kind: self.failure_kind(),
            request_id: None,
        };

        let mut response = (status, Json(body.clone())).into_response();
        response.extensions_mut().insert(body);
        response
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
