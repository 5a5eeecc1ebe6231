//! Book list page and book mutations

use reqwest::StatusCode;

use crate::common::{book, seed, spawn_app, spawn_app_without_api};

#[tokio::test]
async fn test_list_is_served_from_cache() {
    let app = spawn_app(seed()).await;

    let (status, html) = app.page("/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Dune"));
    assert!(html.contains("Neuromancer"));
    assert!(html.contains(r#"<span class="badge no">Unavailable</span>"#));

    app.page("/").await;
    app.page("/?menu=1").await;
    assert_eq!(app.library.book_reads(), 1);

    app.page("/?refresh=1").await;
    assert_eq!(app.library.book_reads(), 2);
}

#[tokio::test]
async fn test_delete_removes_book_from_next_render() {
    let app = spawn_app(seed()).await;

    let (_, before) = app.page("/").await;
    assert!(before.contains("Dune"));

    let (status, after) = app.submit("/books/b1/delete", &[]).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!after.contains("Dune"));
    assert!(after.contains("Neuromancer"));
    assert!(after.contains("Book deleted successfully"));
    assert!(!after.contains(r#"role="dialog""#));
    assert_eq!(app.library.book_reads(), 2);
}

#[tokio::test]
async fn test_mutation_redirects_with_notice() {
    let app = spawn_app(seed()).await;

    let response = app
        .raw_client
        .post(app.url("/books/b2/delete"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers()["location"].to_str().unwrap(),
        "/?notice=book-deleted"
    );
}

#[tokio::test]
async fn test_add_book() {
    let app = spawn_app(seed()).await;
    app.page("/").await;

    let (status, html) = app
        .submit(
            "/books",
            &[
                ("title", "Foundation"),
                ("author", "Isaac Asimov"),
                ("genre", "FICTION"),
                ("isbn", "9780553293357"),
                ("description", ""),
                ("copies", "4"),
            ],
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Book added successfully"));
    assert!(html.contains("Foundation"));

    let added = app.library.book("b4").expect("book created upstream");
    assert_eq!(added.copies, 4);
    assert!(added.available);
    assert_eq!(added.description, None);
}

#[tokio::test]
async fn test_edit_book() {
    let app = spawn_app(seed()).await;

    let (_, html) = app.page("/?modal=edit&id=b2").await;
    assert!(html.contains("<h2>Edit Book</h2>"));
    assert!(html.contains(r#"value="Neuromancer""#));

    let (status, html) = app
        .submit(
            "/books/b2",
            &[
                ("title", "Neuromancer"),
                ("author", "William Gibson"),
                ("genre", "SCIENCE"),
                ("isbn", "9780441569595"),
                ("copies", "0"),
            ],
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Book updated successfully"));
    let updated = app.library.book("b2").unwrap();
    assert_eq!(updated.author, "William Gibson");
    // unticked checkbox
    assert!(!updated.available);
}

#[tokio::test]
async fn test_failed_create_keeps_form_open_and_cache_fresh() {
    let app = spawn_app(seed()).await;
    app.page("/").await;

    let (status, html) = app
        .submit(
            "/books",
            &[
                ("title", "Dune Messiah"),
                ("author", "Frank Herbert"),
                ("genre", "FICTION"),
                // duplicate ISBN is rejected upstream
                ("isbn", "9780441013593"),
                ("copies", "2"),
            ],
        )
        .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(html.contains("Something went wrong"));
    assert!(html.contains("<h2>Add New Book</h2>"));
    assert!(html.contains(r#"value="Dune Messiah""#));
    assert_eq!(app.library.book_reads(), 1);
}

#[tokio::test]
async fn test_invalid_form_is_not_sent() {
    let app = spawn_app(seed()).await;

    let (status, html) = app
        .submit("/books", &[("title", "Untitled"), ("genre", ""), ("copies", "1")])
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(html.contains("Please select a genre"));
    assert!(app.library.book("b4").is_none());
}

#[tokio::test]
async fn test_modal_for_unknown_book_is_ignored() {
    let app = spawn_app(seed()).await;

    let (status, html) = app.page("/?modal=delete&id=missing").await;
    assert_eq!(status, StatusCode::OK);
    assert!(!html.contains(r#"role="dialog""#));

    let (_, html) = app.page("/?modal=delete&id=b3").await;
    assert!(html.contains(r#"role="dialog""#));
    assert!(html.contains("<strong>Hyperion</strong>"));
}

#[tokio::test]
async fn test_edit_with_api_down_keeps_form_open() {
    let app = spawn_app_without_api().await;

    let (status, html) = app
        .submit(
            "/books/b1",
            &[
                ("title", "Dune Messiah"),
                ("author", "Frank Herbert"),
                ("genre", "FICTION"),
                ("isbn", "9780441172696"),
                ("copies", "2"),
            ],
        )
        .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(html.contains("<h2>Edit Book</h2>"));
    assert!(html.contains(r#"action="/books/b1""#));
    assert!(html.contains(r#"value="Dune Messiah""#));
    assert!(html.contains("Something went wrong"));
}

#[tokio::test]
async fn test_id_with_reserved_characters() {
    let app = spawn_app(vec![book("x/y&z#1", "Odd One", "111", 1, true)]).await;

    let (_, html) = app.page("/").await;
    assert!(html.contains(r#"href="/?modal=delete&amp;id=x%2Fy%26z%231""#));

    let (_, html) = app.page("/?modal=delete&id=x%2Fy%26z%231").await;
    assert!(html.contains(r#"action="/books/x%2Fy%26z%231/delete""#));

    let (status, html) = app.submit("/books/x%2Fy%26z%231/delete", &[]).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Book deleted successfully"));
    assert!(app.library.book("x/y&z#1").is_none());
}
