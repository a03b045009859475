use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Failures reported by the account and catalog stores.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("email already registered")]
    DuplicateEmail,
    #[error("record not found")]
    NotFound,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// A single rejected input field.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    /// `fields` is `None` when detail is withheld (production).
    #[error("validation failed")]
    Validation { fields: Option<Vec<FieldError>> },
    #[error("email already registered")]
    DuplicateEmail,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("unauthorized: {0}")]
    Unauthorized(&'static str),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("request deadline exceeded")]
    Timeout,
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl AppError {
    pub fn validation(fields: Vec<FieldError>, expose_details: bool) -> Self {
        Self::Validation {
            fields: expose_details.then_some(fields),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } | AppError::DuplicateEmail => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Timeout => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DuplicateEmail => AppError::DuplicateEmail,
            StoreError::NotFound => AppError::NotFound("record"),
            StoreError::Database(e) => AppError::Internal(anyhow::Error::new(e).context("store")),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            AppError::Validation { fields } => ErrorResponse {
                error: "VALIDATION_ERROR",
                message: "Invalid request".into(),
                details: fields.map(|f| serde_json::json!({ "fields": f })),
            },
            AppError::DuplicateEmail => ErrorResponse {
                error: "DUPLICATE_EMAIL",
                message: "Email already registered".into(),
                details: None,
            },
            AppError::InvalidCredentials => ErrorResponse {
                error: "INVALID_CREDENTIALS",
                message: "Invalid credentials".into(),
                details: None,
            },
            AppError::Unauthorized(reason) => ErrorResponse {
                error: "UNAUTHORIZED",
                message: reason.into(),
                details: None,
            },
            AppError::NotFound(what) => ErrorResponse {
                error: "NOT_FOUND",
                message: format!("{what} not found"),
                details: None,
            },
            AppError::Timeout => ErrorResponse {
                error: "TIMEOUT",
                message: "Request took too long to complete".into(),
                details: None,
            },
            AppError::Internal(e) => {
                error!(error = ?e, "request failed");
                ErrorResponse {
                    error: "INTERNAL_ERROR",
                    message: "An internal server error occurred".into(),
                    details: None,
                }
            }
        };
        (status, Json(body)).into_response()
    }
}
