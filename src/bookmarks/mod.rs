//! Bookmarks Resource
//!
//! CRUD over the `bookmarks_list` table, mounted at `/api/bookmarks`.
//!
//! # Lifecycle
//!
//! A bookmark is created by `POST` (the store assigns its id), may be
//! patched any number of times, and is gone for good after `DELETE`.
//! Title and description are HTML-escaped before every write.
//!
//! # Usage
//!
//! ```rust,ignore
//! use bookmarks::bookmarks;
//!
//! let app = Router::new()
//!     .nest(bookmarks::BASE_PATH, bookmarks::routes())
//!     .with_state(app_state);
//!
//! // Or drive the resource directly
//! let resource = bookmarks::BookmarksResource::new(&db);
//! let created = resource.create(body).await?;
//! ```

mod handler;
mod routes;
mod service;

/// Mount point of the resource; also the prefix of `Location` headers.
pub const BASE_PATH: &str = "/api/bookmarks";

pub use routes::routes;
pub use service::BookmarksResource;
