//! Book model and related types

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::AppError;

/// Book genre classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Genre {
    Fiction,
    NonFiction,
    Science,
    History,
    Biography,
    Fantasy,
}

impl Genre {
    /// All genres in display order
    pub const ALL: [Genre; 6] = [
        Genre::Fiction,
        Genre::NonFiction,
        Genre::Science,
        Genre::History,
        Genre::Biography,
        Genre::Fantasy,
    ];

    /// Wire representation used by the library API and the HTML forms
    pub fn as_str(&self) -> &'static str {
        match self {
            Genre::Fiction => "FICTION",
            Genre::NonFiction => "NON_FICTION",
            Genre::Science => "SCIENCE",
            Genre::History => "HISTORY",
            Genre::Biography => "BIOGRAPHY",
            Genre::Fantasy => "FANTASY",
        }
    }
}

impl std::fmt::Display for Genre {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Genre::Fiction => "Fiction",
            Genre::NonFiction => "Non-Fiction",
            Genre::Science => "Science",
            Genre::History => "History",
            Genre::Biography => "Biography",
            Genre::Fantasy => "Fantasy",
        };
        write!(f, "{}", label)
    }
}

impl FromStr for Genre {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Genre::ALL
            .into_iter()
            .find(|g| g.as_str() == s)
            .ok_or_else(|| AppError::Validation("Please select a genre".to_string()))
    }
}

/// Book record as returned by the library API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub author: String,
    pub genre: Genre,
    pub isbn: String,
    pub copies: u32,
    pub available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Book {
    /// Borrowing is offered on the availability flag alone; copy counts are the API's concern
    pub fn can_borrow(&self) -> bool {
        self.available
    }
}

/// Create/update payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookInput {
    pub title: String,
    pub author: String,
    pub genre: Genre,
    pub isbn: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub copies: u32,
    pub available: bool,
}

/// Update payload: the id goes in the path, the fields in the body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookUpdate {
    pub id: String,
    pub input: BookInput,
}
