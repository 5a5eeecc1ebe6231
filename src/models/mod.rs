//! Data models for BookLib

pub mod book;
pub mod borrow;
pub mod response;

// Re-export commonly used types
pub use book::{Book, BookInput, BookUpdate, Genre};
pub use borrow::{BorrowRequest, BorrowStats, BorrowSummaryRow};
pub use response::ApiResponse;
