use crate::db::Database;
use crate::error::{ApiError, ValidationError};
use crate::model::{Bookmark, BookmarkPatch, NewBookmark};

const EMPTY_PATCH_MESSAGE: &str = "Request body must contain either 'title', 'url', 'description' or 'rating'";

/// Request-scoped view over the bookmark store. Holds no state of its own;
/// every call goes straight to the database handle it was built with.
pub struct BookmarksResource<'a> {
    db: &'a Database,
}

/// Path ids that are not integers cannot name a stored bookmark.
pub fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>().map_err(|_| ApiError::NotFound)
}

impl<'a> BookmarksResource<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> Result<Vec<Bookmark>, ApiError> {
        Ok(self.db.list_bookmarks().await?)
    }

    pub async fn get(&self, id: i64) -> Result<Bookmark, ApiError> {
        self.db.get_bookmark(id).await?.ok_or(ApiError::NotFound)
    }

    pub async fn create(&self, body: &[u8]) -> Result<Bookmark, ApiError> {
        let input = NewBookmark::from_json(body)?.sanitized();
        let bookmark = self.db.insert_bookmark(&input).await?;
        tracing::info!(id = bookmark.id, "bookmark created");
        Ok(bookmark)
    }

    pub async fn remove(&self, id: i64) -> Result<(), ApiError> {
        if !self.db.delete_bookmark(id).await? {
            return Err(ApiError::NotFound);
        }
        tracing::info!(id, "bookmark deleted");
        Ok(())
    }

    /// Existence is checked before the body is looked at, so an unknown id
    /// is a 404 even when the payload is empty or malformed.
    pub async fn update(&self, id: i64, body: &[u8]) -> Result<Bookmark, ApiError> {
        let existing = self.get(id).await?;

        let patch = BookmarkPatch::from_json(body)?;
        if patch.is_empty() {
            return Err(ValidationError::new(EMPTY_PATCH_MESSAGE).into());
        }

        let merged = patch.merge(existing);
        merged.validate()?;
        let merged = merged.sanitized();

        // Deleted between the read and the write.
        if !self.db.update_bookmark(&merged).await? {
            return Err(ApiError::NotFound);
        }
        tracing::info!(id, "bookmark updated");
        Ok(merged)
    }
}
