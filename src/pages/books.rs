//! Book list page and its modal workflows

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_with::{serde_as, NoneAsEmptyString};

use crate::{
    error::{AppError, AppResult},
    models::Book,
    repository::encode_component,
    services::{endpoints::GetBooks, QueryResult},
    ui::{html, Column, Notice, RowAction, Table, Toast},
    AppState,
};

use super::{
    book_form::{self, BookFormData},
    borrow_form::{self, BorrowFormData},
    delete_dialog,
};

/// Query string of `GET /`
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct BooksQuery {
    /// `add`, `edit`, `borrow` or `delete`
    pub modal: Option<String>,
    pub id: Option<String>,
    /// Row whose mobile action menu is open
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub menu: Option<usize>,
    pub notice: Option<String>,
    pub refresh: Option<String>,
}

/// The one modal shown over the list, if any
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActiveModal {
    None,
    Add(BookFormData),
    /// Book id and the form values
    Edit(String, BookFormData),
    Borrow(Book, BorrowFormData),
    Delete(Book),
}

impl ActiveModal {
    /// Resolve the modal named in the URL. Row modals go through the table's
    /// action dispatch, so a disabled action or an unknown book opens nothing.
    pub fn resolve(
        kind: Option<&str>,
        id: Option<&str>,
        books: &[Book],
        table: &mut Table<Book>,
    ) -> Self {
        match (kind, id) {
            (Some("add"), _) => ActiveModal::Add(BookFormData::default()),
            (Some(kind), Some(id)) => {
                let Some(book) = books.iter().find(|b| b.id == id) else {
                    return ActiveModal::None;
                };
                let mut modal = ActiveModal::None;
                table.handle_action(kind, book, |key, book| {
                    modal = ActiveModal::for_action(key, book);
                });
                modal
            }
            _ => ActiveModal::None,
        }
    }

    fn for_action(key: &str, book: &Book) -> Self {
        match key {
            "edit" => ActiveModal::Edit(book.id.clone(), BookFormData::from(book)),
            "borrow" => ActiveModal::Borrow(book.clone(), BorrowFormData::default()),
            "delete" => ActiveModal::Delete(book.clone()),
            _ => ActiveModal::None,
        }
    }

    /// A `resubmitting` modal follows a failed write: the backdrop no longer
    /// dismisses it, only Cancel and the close button do.
    fn render(&self, today: NaiveDate, resubmitting: bool) -> String {
        let (modal, body) = match self {
            ActiveModal::None => return String::new(),
            ActiveModal::Add(values) => (book_form::modal(), book_form::render(None, values)),
            ActiveModal::Edit(id, values) => {
                (book_form::modal(), book_form::render(Some(id), values))
            }
            ActiveModal::Borrow(book, values) => {
                (borrow_form::modal(), borrow_form::render(book, values, today))
            }
            ActiveModal::Delete(book) => (delete_dialog::modal(), delete_dialog::render(book)),
        };

        let modal = if resubmitting {
            modal.prevent_close_on_click_outside()
        } else {
            modal
        };
        modal.render(true, "/", &body)
    }
}

fn status_badge(book: &Book) -> String {
    if book.available {
        r#"<span class="badge ok">Available</span>"#.to_string()
    } else {
        r#"<span class="badge no">Unavailable</span>"#.to_string()
    }
}

pub fn books_table() -> Table<Book> {
    Table::new("Book Library")
        .column(Column::new("title", "Title", |b: &Book| b.title.clone()).primary().no_wrap())
        .column(Column::new("author", "Author", |b: &Book| b.author.clone()).no_wrap())
        .column(Column::new("genre", "Genre", |b: &Book| b.genre.to_string()).no_wrap())
        .column(Column::new("isbn", "ISBN", |b: &Book| b.isbn.clone()).no_wrap())
        .column(Column::new("copies", "Copies", |b: &Book| b.copies.to_string()).no_wrap())
        .column(
            Column::new("available", "Status", |b: &Book| b.available.to_string())
                .render(status_badge)
                .no_wrap(),
        )
        .action(RowAction::new("edit", "Edit", "&#9998;"))
        .action(RowAction::new("borrow", "Borrow", "&#128214;").disabled_when(|b: &Book| !b.can_borrow()))
        .action(RowAction::new("delete", "Delete", "&#128465;"))
        .empty_message("No books available")
}

fn action_href(key: &str, book: &Book) -> String {
    format!("/?modal={}&id={}", key, encode_component(&book.id))
}

fn menu_href(row: Option<usize>) -> String {
    match row {
        Some(row) => format!("/?menu={}", row),
        None => "/".to_string(),
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

pub fn render_page(
    books: &QueryResult<Arc<Vec<Book>>>,
    table: &Table<Book>,
    modal: &ActiveModal,
    toast: Option<&Toast>,
    today: NaiveDate,
) -> String {
    let banner = match books {
        QueryResult::Loading => r#"<div class="banner">Loading books...</div>"#,
        QueryResult::Error(_) => r#"<div class="banner error">Error loading books</div>"#,
        QueryResult::Success(_) => "",
    };
    let rows = books.data().map(|b| b.as_slice()).unwrap_or(&[]);

    let body = format!(
        r#"<div class="container"><div class="header"><h1>Books</h1><a class="btn btn-primary" href="/?modal=add">+ Add New Book</a></div>{}{}</div>{}{}"#,
        banner,
        table.render(rows, action_href, menu_href),
        modal.render(today, toast.is_some_and(Toast::is_error)),
        toast.map(Toast::render).unwrap_or_default(),
    );
    html::page("Books", "/", &body)
}

/// `GET /`
pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<BooksQuery>,
) -> Html<String> {
    let books = if params.refresh.is_some() {
        state.api.refetch::<GetBooks>(&()).await
    } else {
        state.api.get_books().await
    };

    let mut table = books_table().with_open_menu(params.menu);
    let modal = ActiveModal::resolve(
        params.modal.as_deref(),
        params.id.as_deref(),
        books.data().map(|b| b.as_slice()).unwrap_or(&[]),
        &mut table,
    );
    let toast = params
        .notice
        .as_deref()
        .and_then(Notice::from_key)
        .map(Toast::from);

    Html(render_page(&books, &table, &modal, toast.as_ref(), today()))
}

/// Look a book up in the (cached) list. `Ok(None)` means the list loaded
/// without it.
async fn find_book(state: &AppState, id: &str) -> AppResult<Option<Book>> {
    let books = state.api.get_books().await.into_result()?;
    Ok(books.iter().find(|b| b.id == id).cloned())
}

fn notice_redirect(notice: Notice) -> Response {
    Redirect::to(&format!("/?notice={}", notice.key())).into_response()
}

/// Re-render the list with the failed form still open
async fn failed(state: &AppState, modal: ActiveModal, err: AppError, message: &str) -> Response {
    tracing::warn!("form submission failed: {}", err);
    let message = match &err {
        AppError::Validation(msg) => msg.clone(),
        _ => message.to_string(),
    };

    let books = state.api.get_books().await;
    let html = render_page(
        &books,
        &books_table(),
        &modal,
        Some(&Toast::error(message)),
        today(),
    );
    (err.status_code(), Html(html)).into_response()
}

/// `POST /books`
pub async fn create(State(state): State<AppState>, Form(form): Form<BookFormData>) -> Response {
    let outcome = match form.clone().into_input(false) {
        Ok(input) => state.api.create_book(input).await.map(|_| ()),
        Err(e) => Err(e),
    };

    match outcome {
        Ok(()) => notice_redirect(Notice::BookAdded),
        Err(e) => failed(&state, ActiveModal::Add(form), e, "Something went wrong").await,
    }
}

/// `POST /books/{id}`
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<BookFormData>,
) -> Response {
    let outcome = match form.clone().into_input(true) {
        Ok(input) => state.api.update_book(id.clone(), input).await.map(|_| ()),
        Err(e) => Err(e),
    };

    match outcome {
        Ok(()) => notice_redirect(Notice::BookUpdated),
        Err(e) => failed(&state, ActiveModal::Edit(id, form), e, "Something went wrong").await,
    }
}

/// `POST /books/{id}/delete`
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.api.delete_book(id.clone()).await {
        Ok(()) => notice_redirect(Notice::BookDeleted),
        Err(e) => {
            let modal = match find_book(&state, &id).await {
                Ok(Some(book)) => ActiveModal::Delete(book),
                Ok(None) => ActiveModal::None,
                Err(lookup) => {
                    tracing::warn!("could not reload book {} for the delete dialog: {}", id, lookup);
                    ActiveModal::None
                }
            };
            failed(&state, modal, e, "Failed to delete book").await
        }
    }
}

/// `POST /books/{id}/borrow`
pub async fn borrow(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<BorrowFormData>,
) -> AppResult<Response> {
    let book = match find_book(&state, &id).await {
        Ok(Some(book)) => book,
        Ok(None) => return Err(AppError::NotFound(format!("Book {} not found", id))),
        Err(e) => {
            return Ok(failed(&state, ActiveModal::None, e, "Failed to create borrow request").await)
        }
    };

    let outcome = match form.into_request(&book, today()) {
        Ok(request) => state.api.create_borrow_request(request).await.map(|_| ()),
        Err(e) => Err(e),
    };

    Ok(match outcome {
        Ok(()) => notice_redirect(Notice::BorrowCreated),
        Err(e) => {
            failed(
                &state,
                ActiveModal::Borrow(book, form),
                e,
                "Failed to create borrow request",
            )
            .await
        }
    })
}
