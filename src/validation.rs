use async_trait::async_trait;
use axum::extract::{rejection::JsonRejection, FromRequest, Request};
use lazy_static::lazy_static;
use regex::Regex;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::{
    error::{AppError, FieldError},
    state::AppState,
};

pub const MIN_PASSWORD_LEN: usize = 8;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Collects field errors for one request body.
#[derive(Debug, Default)]
pub struct Checks {
    errors: Vec<FieldError>,
}

impl Checks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn require(&mut self, ok: bool, field: &'static str, message: &str) -> &mut Self {
        if !ok {
            self.errors.push(FieldError {
                field,
                message: message.to_string(),
            });
        }
        self
    }

    pub fn not_blank(&mut self, value: &str, field: &'static str) -> &mut Self {
        self.require(!value.trim().is_empty(), field, "must not be empty")
    }

    pub fn email(&mut self, value: &str, field: &'static str) -> &mut Self {
        self.require(is_valid_email(value), field, "must be a valid email address")
    }

    /// Returns the collected errors, if any, as a validation failure.
    pub fn finish(&mut self, state: &AppState) -> Result<(), AppError> {
        if self.errors.is_empty() {
            return Ok(());
        }
        let fields = std::mem::take(&mut self.errors);
        warn!(fields = ?fields.iter().map(|f| f.field).collect::<Vec<_>>(), "validation failed");
        Err(AppError::validation(
            fields,
            state.config.exposes_error_details(),
        ))
    }
}

/// JSON body extractor whose rejections use the API error format.
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<T> FromRequest<AppState> for ApiJson<T>
where
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => Err(json_rejection(rejection, state)),
        }
    }
}

fn json_rejection(rejection: JsonRejection, state: &AppState) -> AppError {
    warn!(error = %rejection.body_text(), "rejected request body");
    AppError::validation(
        vec![FieldError {
            field: "body",
            message: rejection.body_text(),
        }],
        state.config.exposes_error_details(),
    )
}
