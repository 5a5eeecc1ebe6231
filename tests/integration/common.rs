//! Test harness: a fake library API plus a booklib server pointed at it

use std::{
    net::SocketAddr,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch},
    Json, Router,
};
use parking_lot::Mutex;
use serde::Deserialize;
use serde_json::{json, Value};

use booklib::{
    config::AppConfig,
    create_router,
    models::{Book, Genre},
    repository::HttpTransport,
    services::{cache::QueryCache, DataAccess},
    AppState,
};

/// In-memory stand-in for the remote library API
#[derive(Default)]
pub struct FakeLibrary {
    books: Mutex<Vec<Book>>,
    /// (book id, quantity) per borrow request
    borrows: Mutex<Vec<(String, u32)>>,
    next_id: AtomicUsize,
    book_reads: AtomicUsize,
    summary_reads: AtomicUsize,
}

impl FakeLibrary {
    pub fn with_books(books: Vec<Book>) -> Self {
        let library = Self::default();
        library.next_id.store(books.len() + 1, Ordering::SeqCst);
        *library.books.lock() = books;
        library
    }

    pub fn book(&self, id: &str) -> Option<Book> {
        self.books.lock().iter().find(|b| b.id == id).cloned()
    }

    pub fn book_reads(&self) -> usize {
        self.book_reads.load(Ordering::SeqCst)
    }

    pub fn summary_reads(&self) -> usize {
        self.summary_reads.load(Ordering::SeqCst)
    }
}

pub fn book(id: &str, title: &str, isbn: &str, copies: u32, available: bool) -> Book {
    Book {
        id: id.to_string(),
        title: title.to_string(),
        author: "Test Author".to_string(),
        genre: Genre::Fiction,
        isbn: isbn.to_string(),
        copies,
        available,
        description: None,
    }
}

pub fn seed() -> Vec<Book> {
    vec![
        book("b1", "Dune", "9780441013593", 3, true),
        book("b2", "Neuromancer", "9780441569595", 1, true),
        book("b3", "Hyperion", "9780553283686", 0, false),
    ]
}

fn failure(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "success": false, "message": message }))).into_response()
}

fn ok(data: Value) -> Response {
    Json(json!({ "success": true, "message": "ok", "data": data })).into_response()
}

#[derive(Deserialize)]
struct BookFields {
    title: String,
    author: String,
    genre: Genre,
    isbn: String,
    copies: u32,
    available: bool,
    description: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BorrowBody {
    book: String,
    quantity: u32,
    #[allow(dead_code)]
    due_date: String,
}

async fn list_books(State(lib): State<Arc<FakeLibrary>>) -> Response {
    lib.book_reads.fetch_add(1, Ordering::SeqCst);
    ok(json!(*lib.books.lock()))
}

async fn create_book(State(lib): State<Arc<FakeLibrary>>, Json(fields): Json<BookFields>) -> Response {
    let mut books = lib.books.lock();
    if books.iter().any(|b| b.isbn == fields.isbn) {
        return failure(StatusCode::BAD_REQUEST, "ISBN already exists");
    }
    let id = format!("b{}", lib.next_id.fetch_add(1, Ordering::SeqCst));
    let book = Book {
        id,
        title: fields.title,
        author: fields.author,
        genre: fields.genre,
        isbn: fields.isbn,
        copies: fields.copies,
        available: fields.available,
        description: fields.description,
    };
    books.push(book.clone());
    ok(json!(book))
}

async fn update_book(
    State(lib): State<Arc<FakeLibrary>>,
    Path(id): Path<String>,
    Json(fields): Json<BookFields>,
) -> Response {
    let mut books = lib.books.lock();
    let Some(book) = books.iter_mut().find(|b| b.id == id) else {
        return failure(StatusCode::NOT_FOUND, "Book not found");
    };
    book.title = fields.title;
    book.author = fields.author;
    book.genre = fields.genre;
    book.isbn = fields.isbn;
    book.copies = fields.copies;
    book.available = fields.available;
    book.description = fields.description;
    ok(json!(book))
}

async fn delete_book(State(lib): State<Arc<FakeLibrary>>, Path(id): Path<String>) -> Response {
    let mut books = lib.books.lock();
    let before = books.len();
    books.retain(|b| b.id != id);
    if books.len() == before {
        return failure(StatusCode::NOT_FOUND, "Book not found");
    }
    ok(Value::Null)
}

async fn create_borrow(State(lib): State<Arc<FakeLibrary>>, Json(body): Json<BorrowBody>) -> Response {
    let mut books = lib.books.lock();
    let Some(book) = books.iter_mut().find(|b| b.id == body.book) else {
        return failure(StatusCode::NOT_FOUND, "Book not found");
    };
    if body.quantity > book.copies {
        return failure(StatusCode::BAD_REQUEST, "Not enough copies available");
    }
    book.copies -= body.quantity;
    book.available = book.copies > 0;
    lib.borrows.lock().push((body.book.clone(), body.quantity));
    ok(json!({ "book": body.book, "quantity": body.quantity }))
}

async fn borrow_summary(State(lib): State<Arc<FakeLibrary>>) -> Response {
    lib.summary_reads.fetch_add(1, Ordering::SeqCst);
    let books = lib.books.lock();
    let mut totals: Vec<(String, u32)> = Vec::new();
    for (id, quantity) in lib.borrows.lock().iter() {
        match totals.iter_mut().find(|(seen, _)| seen == id) {
            Some((_, total)) => *total += quantity,
            None => totals.push((id.clone(), *quantity)),
        }
    }
    let rows: Vec<Value> = totals
        .into_iter()
        .filter_map(|(id, total)| {
            books.iter().find(|b| b.id == id).map(|b| {
                json!({ "totalQuantity": total, "book": { "title": b.title, "isbn": b.isbn } })
            })
        })
        .collect();
    ok(json!(rows))
}

fn fake_api(library: Arc<FakeLibrary>) -> Router {
    Router::new()
        .route("/api/books", get(list_books).post(create_book))
        .route("/api/books/:id", patch(update_book).delete(delete_book))
        .route("/api/borrow", get(borrow_summary).post(create_borrow))
        .with_state(library)
}

async fn serve(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("test server");
    });
    addr
}

pub struct TestApp {
    pub base_url: String,
    /// Follows the post/redirect/get hop
    pub client: reqwest::Client,
    /// Stops at redirects
    pub raw_client: reqwest::Client,
    pub library: Arc<FakeLibrary>,
    pub router: Router,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn page(&self, path: &str) -> (reqwest::StatusCode, String) {
        let response = self.client.get(self.url(path)).send().await.expect("GET page");
        let status = response.status();
        (status, response.text().await.expect("page body"))
    }

    pub async fn submit(&self, path: &str, form: &[(&str, &str)]) -> (reqwest::StatusCode, String) {
        let response = self
            .client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("POST form");
        let status = response.status();
        (status, response.text().await.expect("page body"))
    }
}

pub async fn spawn_app(books: Vec<Book>) -> TestApp {
    let library = Arc::new(FakeLibrary::with_books(books));
    let upstream = serve(fake_api(library.clone())).await;
    spawn_frontend(format!("http://{}/api", upstream), library).await
}

/// booklib pointed at a port nothing listens on
pub async fn spawn_app_without_api() -> TestApp {
    let library = Arc::new(FakeLibrary::with_books(Vec::new()));
    spawn_frontend("http://127.0.0.1:1/api".to_string(), library).await
}

async fn spawn_frontend(api_base_url: String, library: Arc<FakeLibrary>) -> TestApp {
    let mut config = AppConfig::default();
    config.api.base_url = api_base_url;
    config.api.timeout_secs = Some(5);

    let transport = HttpTransport::new(&config.api).expect("transport");
    let state = AppState {
        config: Arc::new(config),
        api: DataAccess::new(Arc::new(transport), Arc::new(QueryCache::new())),
    };
    let router = create_router(state);
    let addr = serve(router.clone()).await;

    TestApp {
        base_url: format!("http://{}", addr),
        client: reqwest::Client::new(),
        raw_client: reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("client"),
        library,
        router,
    }
}
