//! API response types
//!
//! Every error body carries a stable `message` field; backend failures never
//! leak internal detail to the caller.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// JSON body with the stable `message` field
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Build a well-formed JSON error response.
pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(MessageBody::new(message))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_body_serialization() {
        let body = MessageBody::new("Missing 'name' query parameter");
        let json = serde_json::to_string(&body).expect("serializable");
        assert_eq!(json, r#"{"message":"Missing 'name' query parameter"}"#);
    }

    #[test]
    fn test_error_response_status() {
        let response = error_response(StatusCode::BAD_REQUEST, "bad input");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
