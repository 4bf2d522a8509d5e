#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use lesson_catalog_backend::{
    config::CatalogConfig,
    routes::api_router,
    state::AppState,
    store::{CatalogSource, LessonStore},
};
use serde::de::DeserializeOwned;
use tower::ServiceExt;

/// Router over the built-in seed catalog (memory source).
pub async fn memory_app() -> Router {
    app_with_source(CatalogSource::Memory).await
}

/// Router over the sample file shipped in `static/`.
pub async fn static_app() -> Router {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("static/lessons.json");
    app_with_source(CatalogSource::Static { path }).await
}

pub async fn app_with_source(source: CatalogSource) -> Router {
    let store = LessonStore::open(source).await;
    let state = AppState::with_store(CatalogConfig::default(), store);
    api_router(Arc::new(state))
}

/// Helper to make requests to the test app
pub struct TestClient {
    router: Router,
}

impl TestClient {
    pub fn new(router: Router) -> Self {
        Self { router }
    }

    /// Send a request and get the response
    pub async fn request(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read response body")
            .to_bytes();

        TestResponse {
            status,
            body: body_bytes.to_vec(),
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send("GET", uri, None).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.send("DELETE", uri, None).await
    }

    pub async fn post(&self, uri: &str) -> TestResponse {
        self.send("POST", uri, None).await
    }

    pub async fn post_json<T: serde::Serialize>(&self, uri: &str, body: &T) -> TestResponse {
        let json_body = serde_json::to_string(body).expect("Failed to serialize body");
        self.send("POST", uri, Some(json_body)).await
    }

    pub async fn put_json<T: serde::Serialize>(&self, uri: &str, body: &T) -> TestResponse {
        let json_body = serde_json::to_string(body).expect("Failed to serialize body");
        self.send("PUT", uri, Some(json_body)).await
    }

    async fn send(&self, method: &str, uri: &str, json_body: Option<String>) -> TestResponse {
        let builder = Request::builder().method(method).uri(uri);
        let request = match json_body {
            Some(b) => builder
                .header("content-type", "application/json")
                .body(Body::from(b)),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");
        self.request(request).await
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn assert_status(&self, expected: StatusCode) {
        assert_eq!(
            self.status,
            expected,
            "unexpected status, body: {}",
            String::from_utf8_lossy(&self.body)
        );
    }

    pub fn json<T: DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body).expect("Failed to parse JSON response")
    }
}
