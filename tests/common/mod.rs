//! Shared fixtures and an in-process client for the endpoint tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, Bytes},
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use bookmarks::db::Database;
use bookmarks::handler::AppState;
use bookmarks::model::Bookmark;

pub const TOKEN: &str = "test-api-token";

pub fn make_bookmarks_array() -> Vec<Bookmark> {
    vec![
        Bookmark {
            id: 1,
            title: "Thinkful".into(),
            url: "https://www.thinkful.com".into(),
            description: Some("Think outside the classroom".into()),
            rating: Some(5),
        },
        Bookmark {
            id: 2,
            title: "Google".into(),
            url: "https://www.google.com".into(),
            description: Some("Where we find everything else".into()),
            rating: Some(4),
        },
        Bookmark {
            id: 3,
            title: "MDN".into(),
            url: "https://developer.mozilla.org".into(),
            description: Some("The only place to find web documentation".into()),
            rating: Some(5),
        },
    ]
}

/// A payload carrying script injection, and what the service must hand back.
pub fn make_malicious_bookmark() -> (Value, Value) {
    let malicious = serde_json::json!({
        "title": r#"Naughty naughty very naughty <script>alert("xss");</script>"#,
        "url": "https://www.hackers.com",
        "description": r#"Bad image <img src="https://url.to.file.which/does-not.exist" onerror="alert(document.cookie);">. But not <strong>all</strong> bad."#,
        "rating": 1,
    });
    let expected = serde_json::json!({
        "title": r#"Naughty naughty very naughty &lt;script&gt;alert("xss");&lt;/script&gt;"#,
        "url": "https://www.hackers.com",
        "description": r#"Bad image &lt;img src="https://url.to.file.which/does-not.exist" onerror="alert(document.cookie);"&gt;. But not &lt;strong&gt;all&lt;/strong&gt; bad."#,
        "rating": 1,
    });
    (malicious, expected)
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body)
            .unwrap_or_else(|e| panic!("body is not JSON ({e}): {:?}", self.body))
    }

    pub fn location(&self) -> Option<&str> {
        self.headers.get(header::LOCATION).and_then(|v| v.to_str().ok())
    }
}

pub struct TestApp {
    pub db: Arc<Database>,
    pub router: Router,
}

impl TestApp {
    /// Fresh in-memory store, reset before use so each case starts empty.
    pub async fn new() -> Self {
        let db = Arc::new(Database::open_in_memory().await.expect("in-memory database"));
        db.reset().await.expect("reset bookmarks_list");
        let router = bookmarks::router(AppState::new(db.clone(), TOKEN));
        TestApp { db, router }
    }

    pub async fn with_bookmarks() -> Self {
        let app = Self::new().await;
        app.db.seed(&make_bookmarks_array()).await.expect("seed fixtures");
        app
    }

    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
        self.send_with_auth(method, uri, body, Some(&format!("Bearer {TOKEN}"))).await
    }

    /// Sends a request with arbitrary headers and no body.
    pub async fn send_with_headers(
        &self,
        method: Method,
        uri: &str,
        headers: &[(header::HeaderName, &str)],
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        for (name, value) in headers {
            builder = builder.header(name, *value);
        }
        self.dispatch(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn send_with_auth(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        authorization: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(auth) = authorization {
            builder = builder.header(header::AUTHORIZATION, auth);
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.dispatch(request).await
    }

    async fn dispatch(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        TestResponse { status, headers, body }
    }
}
