//! BookLib front end
//!
//! A server-rendered web front end for a library REST API: lists books,
//! manages book records and borrow requests, and shows borrowing statistics.
//! Reads go through a tag-invalidated query cache that mutations keep coherent.

use std::sync::Arc;

pub mod config;
pub mod error;
pub mod models;
pub mod pages;
pub mod repository;
pub mod routes;
pub mod services;
pub mod ui;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use routes::create_router;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub api: services::DataAccess,
}
