use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ValidationError;
use crate::sanitize::{escape_html, escape_optional};

pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: i64,
    pub title: String,
    pub url: String,
    pub description: Option<String>,
    pub rating: Option<i64>,
}

/// A validated bookmark that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBookmark {
    pub title: String,
    pub url: String,
    pub description: Option<String>,
    pub rating: Option<i64>,
}

/// Fields supplied by a PATCH request. The outer `Option` on `description`
/// and `rating` tells "not sent" apart from an explicit `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookmarkPatch {
    pub title: Option<String>,
    pub url: Option<String>,
    pub description: Option<Option<String>>,
    pub rating: Option<Option<i64>>,
}

fn parse_object(body: &[u8]) -> Result<Map<String, Value>, ValidationError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        _ => Err(ValidationError::new("Request body must be a JSON object")),
    }
}

fn required_text(map: &Map<String, Value>, field: &str) -> Result<Option<String>, ValidationError> {
    match map.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(ValidationError::new(format!("'{field}' must be a string"))),
    }
}

fn optional_text(map: &Map<String, Value>, field: &str) -> Result<Option<Option<String>>, ValidationError> {
    match map.get(field) {
        None => Ok(None),
        Some(Value::Null) => Ok(Some(None)),
        Some(Value::String(s)) => Ok(Some(Some(s.clone()))),
        Some(_) => Err(ValidationError::new(format!("'{field}' must be a string"))),
    }
}

fn optional_rating(map: &Map<String, Value>) -> Result<Option<Option<i64>>, ValidationError> {
    match map.get("rating") {
        None => Ok(None),
        Some(Value::Null) => Ok(Some(None)),
        Some(v) => match v.as_i64() {
            Some(r) => Ok(Some(Some(r))),
            None => Err(rating_error()),
        },
    }
}

fn rating_error() -> ValidationError {
    ValidationError::new(format!(
        "'rating' must be an integer between {MIN_RATING} and {MAX_RATING}"
    ))
}

pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::new("'title' is required"));
    }
    Ok(())
}

/// Accepts absolute http(s) URLs that name a host.
pub fn validate_url(raw: &str) -> Result<(), ValidationError> {
    let invalid = || ValidationError::new("'url' must be a valid URL");
    if raw.trim().is_empty() {
        return Err(ValidationError::new("'url' is required"));
    }
    let parsed = url::Url::parse(raw).map_err(|_| invalid())?;
    match parsed.scheme() {
        "http" | "https" if parsed.host_str().is_some_and(|h| !h.is_empty()) => Ok(()),
        _ => Err(invalid()),
    }
}

pub fn validate_rating(rating: Option<i64>) -> Result<(), ValidationError> {
    match rating {
        Some(r) if !(MIN_RATING..=MAX_RATING).contains(&r) => Err(rating_error()),
        _ => Ok(()),
    }
}

impl BookmarkPatch {
    pub fn from_json(body: &[u8]) -> Result<Self, ValidationError> {
        let map = parse_object(body)?;

        let title = match map.get("title") {
            Some(Value::Null) => return Err(ValidationError::new("'title' is required")),
            _ => required_text(&map, "title")?,
        };
        if let Some(title) = &title {
            validate_title(title)?;
        }

        let url = match map.get("url") {
            Some(Value::Null) => return Err(ValidationError::new("'url' is required")),
            _ => required_text(&map, "url")?,
        };
        if let Some(url) = &url {
            validate_url(url)?;
        }

        let description = optional_text(&map, "description")?;

        let rating = optional_rating(&map)?;
        validate_rating(rating.flatten())?;

        Ok(BookmarkPatch {
            title,
            url,
            description,
            rating,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.url.is_none() && self.description.is_none() && self.rating.is_none()
    }

    /// Overlays the supplied fields on `existing`; everything else is kept.
    pub fn merge(self, existing: Bookmark) -> Bookmark {
        Bookmark {
            id: existing.id,
            title: self.title.unwrap_or(existing.title),
            url: self.url.unwrap_or(existing.url),
            description: self.description.unwrap_or(existing.description),
            rating: self.rating.unwrap_or(existing.rating),
        }
    }
}

impl NewBookmark {
    pub fn from_json(body: &[u8]) -> Result<Self, ValidationError> {
        let map = parse_object(body)?;

        let title = required_text(&map, "title")?.ok_or_else(|| ValidationError::new("'title' is required"))?;
        validate_title(&title)?;

        let url = required_text(&map, "url")?.ok_or_else(|| ValidationError::new("'url' is required"))?;
        validate_url(&url)?;

        let description = optional_text(&map, "description")?.flatten();

        let rating = optional_rating(&map)?.flatten();
        validate_rating(rating)?;

        Ok(NewBookmark {
            title,
            url,
            description,
            rating,
        })
    }

    pub fn sanitized(self) -> Self {
        NewBookmark {
            title: escape_html(&self.title).into_owned(),
            description: escape_optional(self.description),
            ..self
        }
    }
}

impl Bookmark {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_title(&self.title)?;
        validate_url(&self.url)?;
        validate_rating(self.rating)
    }

    pub fn sanitized(self) -> Self {
        Bookmark {
            title: escape_html(&self.title).into_owned(),
            description: escape_optional(self.description),
            ..self
        }
    }
}
