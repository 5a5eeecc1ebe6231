//! Query and mutation declarations for the library API

use serde::{de::DeserializeOwned, Serialize};

use crate::{
    error::AppResult,
    models::{ApiResponse, Book, BookInput, BookUpdate, BorrowRequest, BorrowSummaryRow},
    repository::{encode_component, ApiRequest},
};

use super::tags::Tag;

/// A cached read
pub trait Query: Send + Sync + 'static {
    /// Operation name, first half of the cache key
    const NAME: &'static str;
    type Arg: Serialize + Send + Sync;
    type Output: DeserializeOwned + Send + Sync + 'static;

    /// Tags attached to the cached result
    fn provides() -> &'static [Tag];

    fn request(arg: &Self::Arg) -> AppResult<ApiRequest>;

    fn decode(body: serde_json::Value) -> AppResult<Self::Output> {
        ApiResponse::decode_data(body)
    }
}

/// A write that invalidates cached reads on success
pub trait Mutation: Send + Sync + 'static {
    const NAME: &'static str;
    type Payload: Send + Sync;
    type Output: DeserializeOwned + Send;

    /// Tags whose cached queries become stale after success
    fn invalidates() -> &'static [Tag];

    fn request(payload: &Self::Payload) -> AppResult<ApiRequest>;

    fn decode(body: serde_json::Value) -> AppResult<Self::Output> {
        ApiResponse::decode_data(body)
    }
}

/// `GET /books`
pub struct GetBooks;

impl Query for GetBooks {
    const NAME: &'static str = "getBooks";
    type Arg = ();
    type Output = Vec<Book>;

    fn provides() -> &'static [Tag] {
        &[Tag::Books]
    }

    fn request(_: &()) -> AppResult<ApiRequest> {
        Ok(ApiRequest::get("/books"))
    }
}

/// `GET /borrow`
pub struct GetBorrowSummary;

impl Query for GetBorrowSummary {
    const NAME: &'static str = "getBorrowSummary";
    type Arg = ();
    type Output = Vec<BorrowSummaryRow>;

    fn provides() -> &'static [Tag] {
        &[Tag::BorrowRequests]
    }

    fn request(_: &()) -> AppResult<ApiRequest> {
        Ok(ApiRequest::get("/borrow"))
    }
}

/// `POST /books`
pub struct CreateBook;

impl Mutation for CreateBook {
    const NAME: &'static str = "createBook";
    type Payload = BookInput;
    type Output = Book;

    fn invalidates() -> &'static [Tag] {
        &[Tag::Books]
    }

    fn request(input: &BookInput) -> AppResult<ApiRequest> {
        ApiRequest::post("/books", input)
    }
}

/// `PATCH /books/{id}`
pub struct UpdateBook;

impl Mutation for UpdateBook {
    const NAME: &'static str = "updateBook";
    type Payload = BookUpdate;
    type Output = Book;

    fn invalidates() -> &'static [Tag] {
        &[Tag::Books]
    }

    fn request(update: &BookUpdate) -> AppResult<ApiRequest> {
        ApiRequest::patch(format!("/books/{}", encode_component(&update.id)), &update.input)
    }
}

/// `DELETE /books/{id}`
pub struct DeleteBook;

impl Mutation for DeleteBook {
    const NAME: &'static str = "deleteBook";
    type Payload = String;
    type Output = ();

    fn invalidates() -> &'static [Tag] {
        &[Tag::Books]
    }

    fn request(id: &String) -> AppResult<ApiRequest> {
        Ok(ApiRequest::delete(format!("/books/{}", encode_component(id))))
    }

    fn decode(_: serde_json::Value) -> AppResult<()> {
        Ok(())
    }
}

/// `POST /borrow`
pub struct CreateBorrowRequest;

impl Mutation for CreateBorrowRequest {
    const NAME: &'static str = "createBorrowRequest";
    type Payload = BorrowRequest;
    /// The API's echo of the request; its shape is not relied upon
    type Output = serde_json::Value;

    fn invalidates() -> &'static [Tag] {
        &[Tag::BorrowRequests, Tag::Books]
    }

    fn request(request: &BorrowRequest) -> AppResult<ApiRequest> {
        ApiRequest::post("/borrow", request)
    }

    fn decode(body: serde_json::Value) -> AppResult<serde_json::Value> {
        Ok(body.get("data").cloned().unwrap_or(body))
    }
}
