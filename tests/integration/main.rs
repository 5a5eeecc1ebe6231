//! End-to-end tests: browser-style requests against booklib backed by a fake
//! library API

mod books;
mod borrow;
mod common;
mod routes;
