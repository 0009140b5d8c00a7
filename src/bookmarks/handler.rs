//! HTTP Handlers for the Bookmarks API

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

use super::BASE_PATH;
use super::service::{BookmarksResource, parse_id};
use crate::api::no_content;
use crate::error::ApiError;
use crate::handler::AppState;

fn failed(action: &str, id: Option<&str>, err: ApiError) -> Response {
    match &err {
        ApiError::NotFound => tracing::info!(id = ?id, "{action}: bookmark not found"),
        ApiError::Validation(e) => tracing::info!(reason = %e, "{action}: rejected payload"),
        _ => {}
    }
    err.into_response()
}

pub async fn list_bookmarks(State(state): State<AppState>) -> Response {
    let resource = BookmarksResource::new(&state.db);

    match resource.list().await {
        Ok(bookmarks) => (StatusCode::OK, Json(bookmarks)).into_response(),
        Err(e) => failed("list", None, e),
    }
}

pub async fn get_bookmark(State(state): State<AppState>, Path(raw_id): Path<String>) -> Response {
    let resource = BookmarksResource::new(&state.db);

    let result = match parse_id(&raw_id) {
        Ok(id) => resource.get(id).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(bookmark) => (StatusCode::OK, Json(bookmark)).into_response(),
        Err(e) => failed("get", Some(&raw_id), e),
    }
}

pub async fn create_bookmark(State(state): State<AppState>, body: Bytes) -> Response {
    let resource = BookmarksResource::new(&state.db);

    match resource.create(&body).await {
        Ok(bookmark) => {
            let location = format!("{}/{}", BASE_PATH, bookmark.id);
            (StatusCode::CREATED, [(header::LOCATION, location)], Json(bookmark)).into_response()
        }
        Err(e) => failed("create", None, e),
    }
}

pub async fn delete_bookmark(State(state): State<AppState>, Path(raw_id): Path<String>) -> Response {
    let resource = BookmarksResource::new(&state.db);

    let result = match parse_id(&raw_id) {
        Ok(id) => resource.remove(id).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => no_content(),
        Err(e) => failed("delete", Some(&raw_id), e),
    }
}

pub async fn update_bookmark(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> Response {
    let resource = BookmarksResource::new(&state.db);

    let result = match parse_id(&raw_id) {
        Ok(id) => resource.update(id, &body).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(_) => no_content(),
        Err(e) => failed("update", Some(&raw_id), e),
    }
}
