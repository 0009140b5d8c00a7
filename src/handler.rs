use std::sync::Arc;

use axum::{http::StatusCode, response::Response};

use crate::api::error_response;
use crate::db::Database;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub api_token: Arc<str>,
}

impl AppState {
    pub fn new(db: Arc<Database>, api_token: &str) -> Self {
        AppState {
            db,
            api_token: Arc::from(api_token),
        }
    }
}

pub async fn not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}
