use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ErrorMessage {
    pub message: String,
}

/// JSON body of every failed request: `{ "error": { "message": "..." } }`.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error: ErrorMessage,
}

impl ErrorResponse {
    pub fn new(msg: &str) -> Self {
        ErrorResponse {
            error: ErrorMessage {
                message: msg.to_owned(),
            },
        }
    }
}

pub fn error_response(status: StatusCode, msg: &str) -> Response {
    (status, Json(ErrorResponse::new(msg))).into_response()
}

pub fn no_content() -> Response {
    StatusCode::NO_CONTENT.into_response()
}
