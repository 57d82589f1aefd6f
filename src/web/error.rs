//! Handler error type and its HTTP mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::store::StoreError;

/// Every failure a handler can answer with
///
/// Each variant maps to one status code and an `{"error": ...}` body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Body could not be decoded as the expected JSON shape
    #[error("Invalid request body")]
    MalformedRequest,

    /// Text is empty
    #[error("Invalid input body, must be a non-zero length string in specified format")]
    InvalidInput,

    /// Text is longer than the configured limit
    #[error("Input text length must be in range 1-{limit}")]
    TextTooLong { limit: usize },

    /// No id in the request path
    #[error("Message id not passed in the request. Retry in the format: /v1/messages/{{id}} ")]
    MissingParameter,

    /// Id is not a positive integer
    #[error("Invalid message id value, should be a valid positive integer")]
    InvalidIdentifier,

    /// Query string is not `?is-palindrome` with no value
    #[error("Incorrect URL structure, should be passed as: /v1/messages/{{id}}?is-palindrome ")]
    MalformedQuery,

    /// Store lookup came back empty
    #[error(transparent)]
    NotFound(#[from] StoreError),

    /// No route matched
    #[error("resource not found")]
    UnknownRoute,

    /// Request was not handled within the write timeout
    #[error("request timed out")]
    RequestTimeout,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MalformedRequest
            | ApiError::InvalidInput
            | ApiError::TextTooLong { .. }
            | ApiError::MissingParameter
            | ApiError::InvalidIdentifier
            | ApiError::MalformedQuery => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) | ApiError::UnknownRoute => StatusCode::NOT_FOUND,
            ApiError::RequestTimeout => StatusCode::REQUEST_TIMEOUT,
        }
    }
}

/// Error body sent to clients
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
