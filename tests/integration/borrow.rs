//! Borrow requests and the borrow summary page

use chrono::Utc;
use reqwest::StatusCode;

use crate::common::{seed, spawn_app, spawn_app_without_api};

fn tomorrow() -> String {
    Utc::now()
        .date_naive()
        .succ_opt()
        .unwrap()
        .format("%Y-%m-%d")
        .to_string()
}

#[tokio::test]
async fn test_borrow_refreshes_books_and_summary() {
    let app = spawn_app(seed()).await;

    let (_, html) = app.page("/borrow-summary").await;
    assert!(html.contains("No borrowing data available"));
    assert!(html.contains("No Data"));
    app.page("/").await;

    let due = tomorrow();
    let (status, html) = app
        .submit("/books/b1/borrow", &[("quantity", "2"), ("returnDate", &due)])
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Borrow request created successfully"));
    assert_eq!(app.library.book("b1").unwrap().copies, 1);
    assert_eq!(app.library.book_reads(), 2);

    app.submit("/books/b2/borrow", &[("quantity", "1"), ("returnDate", &due)])
        .await;

    let html = tokio_test::assert_ok!(
        app.client.get(app.url("/borrow-summary")).send().await.unwrap().text().await
    );
    assert!(html.contains(r#"<div class="value">2</div><div class="label">Total Books Borrowed</div>"#));
    assert!(html.contains(r#"<div class="value">3</div><div class="label">Total Quantity Borrowed</div>"#));
    assert!(html.contains(r#"<div class="value">Dune</div><div class="label">Most Borrowed (2 times)</div>"#));
    assert_eq!(app.library.summary_reads(), 2);
}

#[tokio::test]
async fn test_borrow_over_copies_is_rejected() {
    let app = spawn_app(seed()).await;

    let due = tomorrow();
    let (status, html) = app
        .submit("/books/b2/borrow", &[("quantity", "5"), ("returnDate", &due)])
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(html.contains("Quantity cannot exceed available copies (1)"));
    assert!(html.contains("<h2>Borrow Book</h2>"));
    assert!(html.contains(r#"<div class="backdrop"></div>"#));
    assert_eq!(app.library.book("b2").unwrap().copies, 1);
}

#[tokio::test]
async fn test_borrow_unknown_book() {
    let app = spawn_app(seed()).await;

    let due = tomorrow();
    let (status, _) = app
        .submit("/books/nope/borrow", &[("quantity", "1"), ("returnDate", &due)])
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_summary_refresh() {
    let app = spawn_app(seed()).await;

    app.page("/borrow-summary").await;
    app.page("/borrow-summary").await;
    assert_eq!(app.library.summary_reads(), 1);

    let (status, _) = app.page("/borrow-summary?refresh=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.library.summary_reads(), 2);
}

#[tokio::test]
async fn test_borrow_with_api_down_shows_error_toast() {
    let app = spawn_app_without_api().await;

    let (status, html) = app
        .submit("/books/b1/borrow", &[("quantity", "1"), ("returnDate", "2099-01-01")])
        .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(html.contains(r#"<div class="toast error" role="alert">Failed to create borrow request</div>"#));
    assert!(html.contains("Error loading books"));
    assert!(!html.contains("404 Not Found"));
}

#[tokio::test]
async fn test_malformed_return_date_keeps_form_open() {
    let app = spawn_app(seed()).await;

    let (status, html) = app
        .submit("/books/b1/borrow", &[("quantity", "1"), ("returnDate", "2026-13-40")])
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(html.contains("<h2>Borrow Book</h2>"));
    assert!(html.contains(r#"<div class="toast error" role="alert">Please enter a valid return date</div>"#));
    assert_eq!(app.library.book("b1").unwrap().copies, 3);
}
