//! HTTP handlers for the message API
//!
//! All input validation lives here; the store trusts what it is given.

use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::error::ApiError;
use super::palindrome::is_palindrome;
use crate::store::{Message, MessageStore};

/// Name of the query flag requesting the palindrome check
pub const PALINDROME_FLAG: &str = "is-palindrome";

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// The message store, shared by every request
    pub store: Arc<MessageStore>,

    /// Maximum text length in characters
    pub char_limit: usize,
}

impl AppState {
    pub fn new(store: Arc<MessageStore>, char_limit: usize) -> Self {
        AppState { store, char_limit }
    }
}

/// Request body for message creation
#[derive(Debug, Deserialize)]
pub struct CreateMessageRequest {
    /// Missing or null `text` decodes as empty and is rejected by validation
    #[serde(default)]
    pub text: Option<String>,
}

/// Welcome handler
pub async fn root() -> Json<String> {
    Json(format!("Welcome, it's {} now", Utc::now()))
}

/// Create a message
pub async fn create_message(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Message>, ApiError> {
    let body = body.map_err(|e| {
        warn!("Error while reading request body: {}", e);
        ApiError::MalformedRequest
    })?;
    debug!("POST: received request body: {}", String::from_utf8_lossy(&body));

    let req: CreateMessageRequest = serde_json::from_slice(&body).map_err(|e| {
        warn!("Error while decoding request body: {}", e);
        ApiError::MalformedRequest
    })?;

    let text = req.text.unwrap_or_default();
    validate_text(&text, state.char_limit)?;

    let msg = state.store.create(text);
    info!("Added message with id {} successfully", msg.id);
    Ok(Json(msg))
}

/// Get a message, optionally with the palindrome flag
pub async fn get_message(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<Message>, ApiError> {
    let id = parse_id(path_param(id)?.as_deref())?;
    let check_palindrome = palindrome_requested(query)?;

    let msg = state.store.get(id).map_err(|e| {
        warn!("Error while retrieving message: {}", e);
        ApiError::from(e)
    })?;

    let msg = if check_palindrome {
        let result = is_palindrome(&msg.text);
        info!("Result of palindrome check for message {}: {}", id, result);
        msg.with_palindrome(result)
    } else {
        msg
    };

    info!("Retrieved message {} successfully", id);
    Ok(Json(msg))
}

/// List every message
pub async fn list_messages(State(state): State<AppState>) -> Result<Json<Vec<Message>>, ApiError> {
    let messages = state.store.list().map_err(|e| {
        warn!("Error while retrieving messages: {}", e);
        ApiError::from(e)
    })?;

    info!("Retrieved all {} messages successfully", messages.len());
    Ok(Json(messages))
}

/// Delete a message
pub async fn delete_message(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(path_param(id)?.as_deref())?;

    state.store.delete(id).map_err(|e| {
        warn!("Error while deleting message: {}", e);
        ApiError::from(e)
    })?;

    info!("Deleted message {} successfully", id);
    Ok(StatusCode::NO_CONTENT)
}

/// Fallback for unrouted paths
pub async fn not_found() -> ApiError {
    ApiError::UnknownRoute
}

/// Check that text is non-empty and within `limit` characters
fn validate_text(text: &str, limit: usize) -> Result<(), ApiError> {
    let len = text.chars().count();
    if len == 0 {
        warn!("Incorrect input format or message length zero");
        return Err(ApiError::InvalidInput);
    }
    if len > limit {
        warn!("Message length {} greater than limit {}", len, limit);
        return Err(ApiError::TextTooLong { limit });
    }
    Ok(())
}

/// Raw id segment, `None` when the route carried no parameter at all
///
/// A segment that is present but undecodable is an invalid id, not a
/// missing one.
fn path_param(id: Result<Path<String>, PathRejection>) -> Result<Option<String>, ApiError> {
    match id {
        Ok(Path(raw)) => Ok(Some(raw)),
        Err(PathRejection::MissingPathParams(_)) => Ok(None),
        Err(e) => {
            warn!("Message id could not be decoded: {}", e);
            Err(ApiError::InvalidIdentifier)
        }
    }
}

/// Parse a positive message id
///
/// Ids are signed 64-bit on the wire, so anything above `i64::MAX` is
/// rejected even though the store counts in `u64`.
fn parse_id(raw: Option<&str>) -> Result<u64, ApiError> {
    let Some(raw) = raw else {
        warn!("id param not present in request path");
        return Err(ApiError::MissingParameter);
    };

    match raw.parse::<i64>() {
        Ok(id) if id > 0 => {
            debug!("Validated message id {}", id);
            Ok(id as u64)
        }
        _ => {
            warn!("Invalid message id value: {:?}", raw);
            Err(ApiError::InvalidIdentifier)
        }
    }
}

/// Whether `?is-palindrome` was passed, rejecting it when it carries a value
fn palindrome_requested(
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<bool, ApiError> {
    let Query(params) = query.map_err(|e| {
        warn!("Query string could not be decoded: {}", e);
        ApiError::MalformedQuery
    })?;

    match params.iter().find(|(key, _)| key == PALINDROME_FLAG) {
        None => Ok(false),
        Some((_, value)) if value.is_empty() => Ok(true),
        Some((_, value)) => {
            warn!("Query param {} passed with value {:?}", PALINDROME_FLAG, value);
            Err(ApiError::MalformedQuery)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreError;
    use axum::extract::FromRequestParts;
    use axum::http::Request;

    fn state(limit: usize) -> AppState {
        AppState::new(Arc::new(MessageStore::new()), limit)
    }

    fn path(id: &str) -> Result<Path<String>, PathRejection> {
        Ok(Path(id.to_string()))
    }

    /// Extract from a request that never went through the router
    async fn no_path() -> Result<Path<String>, PathRejection> {
        let (mut parts, _) = Request::new(()).into_parts();
        Path::<String>::from_request_parts(&mut parts, &()).await
    }

    fn flag(value: Option<&str>) -> Result<Query<Vec<(String, String)>>, QueryRejection> {
        let params = value
            .map(|v| vec![(PALINDROME_FLAG.to_string(), v.to_string())])
            .unwrap_or_default();
        Ok(Query(params))
    }

    #[test]
    fn test_validate_text() {
        assert_eq!(validate_text("", 5), Err(ApiError::InvalidInput));
        assert_eq!(validate_text("hello", 5), Ok(()));
        assert_eq!(
            validate_text("hello!", 5),
            Err(ApiError::TextTooLong { limit: 5 })
        );
    }

    #[test]
    fn test_validate_text_counts_characters() {
        // 3 characters, 9 bytes
        assert_eq!(validate_text("日本語", 3), Ok(()));
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id(Some("42")), Ok(42));
        assert_eq!(parse_id(None), Err(ApiError::MissingParameter));
        assert_eq!(parse_id(Some("0")), Err(ApiError::InvalidIdentifier));
        assert_eq!(parse_id(Some("-3")), Err(ApiError::InvalidIdentifier));
        assert_eq!(parse_id(Some("abc")), Err(ApiError::InvalidIdentifier));
    }

    #[test]
    fn test_parse_id_signed_range() {
        assert_eq!(
            parse_id(Some("9223372036854775807")),
            Ok(i64::MAX as u64)
        );
        assert_eq!(
            parse_id(Some("9223372036854775808")),
            Err(ApiError::InvalidIdentifier)
        );
        assert_eq!(
            parse_id(Some("18446744073709551615")),
            Err(ApiError::InvalidIdentifier)
        );
    }

    #[tokio::test]
    async fn test_path_param() {
        assert_eq!(path_param(path("7")), Ok(Some("7".to_string())));

        let missing = no_path().await;
        assert!(matches!(missing, Err(PathRejection::MissingPathParams(_))));
        assert_eq!(path_param(missing), Ok(None));
    }

    #[test]
    fn test_palindrome_requested() {
        assert_eq!(palindrome_requested(flag(None)), Ok(false));
        assert_eq!(palindrome_requested(flag(Some(""))), Ok(true));
        assert_eq!(
            palindrome_requested(flag(Some("true"))),
            Err(ApiError::MalformedQuery)
        );
    }

    #[tokio::test]
    async fn test_get_message_missing_id() {
        let result = get_message(State(state(10)), no_path().await, flag(None)).await;
        assert_eq!(result.unwrap_err(), ApiError::MissingParameter);
    }

    #[tokio::test]
    async fn test_delete_message_missing_id() {
        let result = delete_message(State(state(10)), no_path().await).await;
        assert_eq!(result.unwrap_err(), ApiError::MissingParameter);
    }

    #[tokio::test]
    async fn test_get_message_with_flag() {
        let state = state(10);
        state.store.create("sample");
        state.store.create("malayalam");

        let Json(msg) = get_message(State(state.clone()), path("2"), flag(Some("")))
            .await
            .unwrap();
        assert_eq!(msg, Message::new(2, "malayalam").with_palindrome(true));

        let Json(msg) = get_message(State(state), path("1"), flag(None))
            .await
            .unwrap();
        assert_eq!(msg, Message::new(1, "sample"));
    }

    #[tokio::test]
    async fn test_bad_flag_rejected_before_lookup() {
        let result = get_message(State(state(10)), path("7"), flag(Some("yes"))).await;
        assert_eq!(result.unwrap_err(), ApiError::MalformedQuery);
    }

    #[tokio::test]
    async fn test_get_unknown_message() {
        let result = get_message(State(state(10)), path("1"), flag(None)).await;
        assert_eq!(
            result.unwrap_err(),
            ApiError::NotFound(StoreError::NotFound(1))
        );
    }
}
