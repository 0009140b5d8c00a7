//! Bearer-token gate in front of every route.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, Method, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::ApiError;
use crate::handler::AppState;

/// Pulls the token out of `Authorization: Bearer <token>`. The scheme is
/// matched case-insensitively; everything after the single separating space
/// is the token, byte for byte.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    (!token.is_empty()).then_some(token)
}

/// A CORS preflight: `OPTIONS` announcing the method it wants to use.
/// Browsers never attach credentials to these.
pub fn is_preflight(request: &Request) -> bool {
    request.method() == Method::OPTIONS
        && request.headers().contains_key(header::ACCESS_CONTROL_REQUEST_METHOD)
}

pub fn is_authorized(headers: &HeaderMap, expected: &str) -> bool {
    matches!(bearer_token(headers), Some(token) if token == expected)
}

pub async fn require_bearer(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if is_preflight(&request) {
        return next.run(request).await;
    }
    if !is_authorized(request.headers(), &state.api_token) {
        tracing::warn!(method = %request.method(), path = %request.uri().path(), "unauthorized request");
        return ApiError::Unauthorized.into_response();
    }
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        h
    }

    #[test]
    fn test_bearer_token_extraction() {
        assert_eq!(bearer_token(&headers("Bearer abc123")), Some("abc123"));
        assert_eq!(bearer_token(&headers("bearer abc123")), Some("abc123"));
        assert_eq!(bearer_token(&headers("Basic abc123")), None);
        assert_eq!(bearer_token(&headers("Bearer ")), None);
        assert_eq!(bearer_token(&headers("Bearer  abc123")), Some(" abc123"));
        assert_eq!(bearer_token(&headers("abc123")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn test_token_must_match_exactly() {
        assert!(is_authorized(&headers("Bearer s3cret"), "s3cret"));
        assert!(!is_authorized(&headers("Bearer s3cret2"), "s3cret"));
        assert!(!is_authorized(&headers("Bearer S3CRET"), "s3cret"));
        assert!(!is_authorized(&headers("Bearer  s3cret"), "s3cret"));
        assert!(!is_authorized(&headers("Bearer s3cret "), "s3cret"));
    }

    #[test]
    fn test_preflight_detection() {
        let preflight = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/bookmarks")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(axum::body::Body::empty())
            .unwrap();
        assert!(is_preflight(&preflight));

        let bare_options = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/bookmarks")
            .body(axum::body::Body::empty())
            .unwrap();
        assert!(!is_preflight(&bare_options));

        let get = Request::builder()
            .method(Method::GET)
            .uri("/api/bookmarks")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(axum::body::Body::empty())
            .unwrap();
        assert!(!is_preflight(&get));
    }
}
