//! API error types and responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use oddslab_core::{AccessDecision, GateError, Tier};
use oddslab_store::StoreError;

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Bad request - invalid input.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Conflict - resource already exists.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Daily limit reached for a gated feature.
    ///
    /// Not a failure of the service: the request was understood and denied
    /// by policy, so the decision travels in the error details, together
    /// with the cheapest tier that would lift the limit when one exists.
    #[error("daily limit reached for {}", .decision.feature)]
    LimitReached {
        /// The denying access decision.
        decision: AccessDecision,
        /// Cheapest tier that lifts the limit, if any.
        upgrade: Option<Tier>,
    },

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

/// JSON error response body.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match &self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone(), None),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone(), None),
            Self::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg.clone(), None),
            Self::LimitReached { decision, upgrade } => {
                let mut details = serde_json::to_value(decision)
                    .unwrap_or_else(|_| serde_json::Value::Null);
                if let Some(map) = details.as_object_mut() {
                    map.insert("limit_reached".into(), serde_json::Value::Bool(true));
                    if let Some(tier) = upgrade {
                        map.insert(
                            "upgrade_hint".into(),
                            serde_json::Value::String(tier.as_str().to_string()),
                        );
                    }
                }
                (
                    StatusCode::TOO_MANY_REQUESTS,
                    "limit_reached",
                    self.to_string(),
                    Some(details),
                )
            }
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message,
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<GateError> for ApiError {
    fn from(err: GateError) -> Self {
        match err {
            GateError::UserNotFound { user_id } => Self::NotFound(format!("user not found: {user_id}")),
            // Feature keys are validated at the request boundary; this
            // escaping the core is a bug, not a client error.
            GateError::InvalidFeature { .. } | GateError::Store(_) => Self::Internal(err.to_string()),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UserNotFound { user_id } => {
                Self::NotFound(format!("user not found: {user_id}"))
            }
            StoreError::UserAlreadyExists { user_id } => {
                Self::Conflict(format!("user already exists: {user_id}"))
            }
            StoreError::Database(_) | StoreError::Corrupt(_) => Self::Internal(err.to_string()),
        }
    }
}
