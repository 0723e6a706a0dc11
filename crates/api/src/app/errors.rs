use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use escola_infra::store::StoreError;

pub const PROFESSOR_NOT_FOUND: &str = "Professor não encontrado";
pub const USER_NOT_FOUND: &str = "Usuário não encontrado";

/// Error response body, discriminated by `kind`.
///
/// Not-found bodies carry `message`, the others carry `error`; existing
/// clients read those keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ApiError {
    NotFound { message: String },
    Validation { error: String },
    Fault { error: String },
}

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn validation(error: impl Into<String>) -> Self {
        Self::Validation {
            error: error.into(),
        }
    }

    pub fn fault(error: impl Into<String>) -> Self {
        Self::Fault {
            error: error.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::Fault { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Create reports every failure as a client error.
    pub fn into_validation(self) -> Self {
        match self {
            Self::Fault { error } => Self::Validation { error },
            other => other,
        }
    }
}

/// Every store failure is a fault; create downgrades it with `into_validation`.
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        tracing::error!(error = %err, "store operation failed");
        Self::fault(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}
