use axum::{Router, http::Method, middleware};
use std::error::Error;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::handler::AppState;

pub mod api;
pub mod auth;
pub mod bookmarks;
pub mod config;
pub mod db;
pub mod error;
pub mod handler;
pub mod model;
pub mod sanitize;

/// Full HTTP surface: the bookmarks resource behind the bearer-token gate.
/// Unknown paths are gated too, then answered with a JSON 404. The gate sits
/// outside CORS so only genuine preflights reach the CORS layer unauthenticated.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers(Any);

    Router::new()
        .nest(bookmarks::BASE_PATH, bookmarks::routes())
        .fallback(handler::not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn_with_state(state.clone(), auth::require_bearer))
                .layer(cors),
        )
        .with_state(state)
}

pub fn unpack_error(err: &dyn Error) -> String {
    let mut parts = Vec::new();
    parts.push(err.to_string());
    let mut current = err.source();
    while let Some(source) = current {
        parts.push(source.to_string());
        current = source.source();
    }
    parts.join(": ")
}
