//! Request/response models for the HTTP echo endpoints.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum length accepted for [`EchoRequest::text`].
pub const MAX_TEXT_LEN: usize = 255;
/// Upper bound accepted for [`EchoRequest::number`].
pub const MAX_NUMBER: i64 = 999_999;

/// Closed set of choices for the `choices_text` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextChoice {
    First,
    Second,
    Third,
}

/// Body of `POST /request/`, echoed back verbatim when it validates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EchoRequest {
    pub text: String,
    pub choices_text: TextChoice,
    pub number: i64,
    pub some_date: NaiveDate,
    pub list_field: Vec<String>,
}

/// Validation failure for an [`EchoRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("`text` must be at most {MAX_TEXT_LEN} characters (got {0})")]
    TextTooLong(usize),
    #[error("`number` must be between 0 and {MAX_NUMBER} (got {0})")]
    NumberOutOfRange(i64),
    #[error("`some_date` must not be in the future")]
    DateInFuture,
}

impl IntoResponse for ValidationError {
    fn into_response(self) -> Response {
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(serde_json::json!({ "detail": self.to_string() })),
        )
            .into_response()
    }
}

impl EchoRequest {
    /// Check the field constraints, with `today` injected so validation is
    /// deterministic in tests.
    pub fn validate(&self, today: NaiveDate) -> Result<(), ValidationError> {
        if self.text.chars().count() > MAX_TEXT_LEN {
            return Err(ValidationError::TextTooLong(self.text.chars().count()));
        }
        if !(0..=MAX_NUMBER).contains(&self.number) {
            return Err(ValidationError::NumberOutOfRange(self.number));
        }
        if self.some_date > today {
            return Err(ValidationError::DateInFuture);
        }
        Ok(())
    }
}

/// One item of the `GET /list-request/` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItemResponse {
    pub number: usize,
    pub choices_text: Option<TextChoice>,
}
