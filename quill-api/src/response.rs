/// Uniform response envelope
///
/// Every response body, success or failure, has the shape
///
/// ```json
/// { "status": "success" | "error", "data": <optional payload>, "message": "..." }
/// ```
///
/// `data` is omitted entirely when there is no payload.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Outcome marker carried in every envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

/// The `{status, data?, message}` wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub status: Status,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    pub message: String,
}

impl<T: Serialize> Envelope<T> {
    /// Success envelope with a payload
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            status: Status::Success,
            data: Some(data),
            message: message.into(),
        }
    }

    /// Wraps the envelope with an HTTP status into a response
    pub fn into_response_with(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

impl Envelope<()> {
    /// Success envelope without a payload
    pub fn success_message(message: impl Into<String>) -> Self {
        Self {
            status: Status::Success,
            data: None,
            message: message.into(),
        }
    }

    /// Error envelope
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            data: None,
            message: message.into(),
        }
    }
}

/// 200 with payload
pub fn ok<T: Serialize>(data: T, message: &str) -> Response {
    Envelope::success(data, message).into_response_with(StatusCode::OK)
}

/// 201 with payload
pub fn created<T: Serialize>(data: T, message: &str) -> Response {
    Envelope::success(data, message).into_response_with(StatusCode::CREATED)
}

/// Success without payload, at the given status
pub fn message(status: StatusCode, message: &str) -> Response {
    Envelope::success_message(message).into_response_with(status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_envelope_shape() {
        let value = serde_json::to_value(Envelope::success(json!({"id": 3}), "Created")).unwrap();
        assert_eq!(
            value,
            json!({"status": "success", "data": {"id": 3}, "message": "Created"})
        );
    }

    #[test]
    fn test_data_omitted_when_absent() {
        let value = serde_json::to_value(Envelope::success_message("Updated")).unwrap();
        assert_eq!(value, json!({"status": "success", "message": "Updated"}));

        let value = serde_json::to_value(Envelope::error("Nope")).unwrap();
        assert_eq!(value, json!({"status": "error", "message": "Nope"}));
    }

    #[test]
    fn test_helpers_set_status() {
        assert_eq!(ok(1, "x").status(), StatusCode::OK);
        assert_eq!(created(1, "x").status(), StatusCode::CREATED);
        assert_eq!(message(StatusCode::NO_CONTENT, "x").status(), StatusCode::NO_CONTENT);
    }
}
