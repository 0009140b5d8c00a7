use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::api::error_response;

pub const NOT_FOUND_MESSAGE: &str = "Bookmark not found";
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized request";
pub const SERVER_ERROR_MESSAGE: &str = "server error";

#[derive(Debug, Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    pub fn new(msg: impl Into<String>) -> Self {
        ValidationError(msg.into())
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized")]
    Unauthorized,
    #[error("NotFound")]
    NotFound,
    #[error("ValidationError: {0}")]
    Validation(#[from] ValidationError),
    #[error("PersistenceError: {0:#}")]
    Persistence(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        use ApiError::*;
        match self {
            Unauthorized => StatusCode::UNAUTHORIZED,
            NotFound => StatusCode::NOT_FOUND,
            Validation(_) => StatusCode::BAD_REQUEST,
            Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        use ApiError::*;
        let status = self.status();
        match self {
            Unauthorized => error_response(status, UNAUTHORIZED_MESSAGE),
            NotFound => error_response(status, NOT_FOUND_MESSAGE),
            Validation(e) => error_response(status, &e.0),
            Persistence(e) => {
                let source: &dyn std::error::Error = &*e;
                tracing::error!(error = %crate::unpack_error(source), "storage failure");
                error_response(status, SERVER_ERROR_MESSAGE)
            }
        }
    }
}
