/// Route handlers
///
/// - `articles`: article CRUD
/// - `auth`: registration and login
/// - `health`: operational health check
///
/// Article and auth handlers are called by [`crate::dispatch`] with an
/// already resolved route, so they take plain arguments rather than axum
/// extractors.

pub mod articles;
pub mod auth;
pub mod health;

use serde::de::DeserializeOwned;
use validator::ValidationErrors;

use crate::error::{ApiError, ApiResult};

/// Parses a JSON request body
pub(crate) fn parse_body<T: DeserializeOwned>(body: &[u8]) -> ApiResult<T> {
    serde_json::from_slice(body).map_err(|err| {
        tracing::debug!(error = %err, "Rejected malformed JSON body");
        ApiError::BadRequest("Invalid JSON body".to_string())
    })
}

/// True when a required string field is missing or whitespace only
pub(crate) fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Flattens validator errors into one message, ordered by field name
pub(crate) fn validation_message(errors: &ValidationErrors) -> String {
    let mut messages: Vec<(String, String)> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field));
                (field.to_string(), message)
            })
        })
        .collect();

    messages.sort();
    messages
        .into_iter()
        .map(|(_, message)| message)
        .collect::<Vec<_>>()
        .join("; ")
}
