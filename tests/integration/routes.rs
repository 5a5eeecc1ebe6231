//! Routing surface

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use tower::ServiceExt;

use crate::common::{seed, spawn_app};

#[tokio::test]
async fn test_unknown_path_renders_not_found_page() {
    let app = spawn_app(seed()).await;

    let response = app
        .router
        .clone()
        .oneshot(Request::builder().uri("/shelves").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let html = String::from_utf8(body.to_vec()).unwrap();
    assert!(html.contains("No page at /shelves"));
}

#[tokio::test]
async fn test_navbar_marks_current_page() {
    let app = spawn_app(seed()).await;

    let response = app
        .router
        .clone()
        .oneshot(Request::builder().uri("/borrow-summary").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let html = String::from_utf8(body.to_vec()).unwrap();
    assert!(html.contains(r#"<a href="/borrow-summary" class="active">Borrow Summary</a>"#));
}

#[tokio::test]
async fn test_health_reports_cache_stats() {
    let app = spawn_app(seed()).await;
    app.page("/").await;
    app.page("/").await;

    let body: serde_json::Value = app
        .client
        .get(app.url("/health"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["status"], "healthy");
    assert_eq!(body["cache"]["entries"], 1);
    assert_eq!(body["cache"]["hits"], 1);
    assert_eq!(body["cache"]["misses"], 1);
}
