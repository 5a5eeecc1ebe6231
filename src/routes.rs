//! HTTP routes

use axum::{
    http::Uri,
    routing::{get, post},
    Router,
};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use crate::{error::AppError, pages, AppState};

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Book list and its modal forms
        .route("/", get(pages::books::index))
        .route("/books", post(pages::books::create))
        .route("/books/:id", post(pages::books::update))
        .route("/books/:id/delete", post(pages::books::delete))
        .route("/books/:id/borrow", post(pages::books::borrow))
        // Borrow summary
        .route("/borrow-summary", get(pages::borrow_summary::index))
        // Health check
        .route("/health", get(pages::health::health_check))
        .fallback(not_found)
        .with_state(state)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No page at {}", uri.path()))
}
