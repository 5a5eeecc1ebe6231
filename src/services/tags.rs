//! Cache tags shared by query and mutation declarations

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Tag {
    Books,
    BorrowRequests,
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tag::Books => write!(f, "Books"),
            Tag::BorrowRequests => write!(f, "BorrowRequests"),
        }
    }
}
