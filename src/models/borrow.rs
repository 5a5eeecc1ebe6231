//! Borrow request model and borrow summary aggregates

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Create borrow request payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BorrowRequest {
    /// Book ID
    pub book: String,
    pub quantity: u32,
    pub due_date: DateTime<Utc>,
}

impl BorrowRequest {
    /// Due date is sent as midnight UTC of the chosen day
    pub fn new(book: impl Into<String>, quantity: u32, due: NaiveDate) -> Self {
        Self {
            book: book.into(),
            quantity,
            due_date: due.and_time(chrono::NaiveTime::MIN).and_utc(),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryEntryWire {
    total_quantity: u64,
    book: SummaryBookWire,
}

#[derive(Deserialize)]
struct SummaryBookWire {
    title: String,
    isbn: String,
}

/// One aggregated row of the borrow summary, computed by the API
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "SummaryEntryWire")]
pub struct BorrowSummaryRow {
    pub book_title: String,
    pub isbn: String,
    pub total_quantity_borrowed: u64,
}

impl From<SummaryEntryWire> for BorrowSummaryRow {
    fn from(wire: SummaryEntryWire) -> Self {
        Self {
            book_title: wire.book.title,
            isbn: wire.book.isbn,
            total_quantity_borrowed: wire.total_quantity,
        }
    }
}

/// Client-side statistics over the borrow summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BorrowStats<'a> {
    /// Distinct books with at least one borrow
    pub total_books: usize,
    pub total_quantity: u64,
    /// Rounded half up
    pub average_per_book: u64,
    /// `None` when nothing has been borrowed
    pub most_borrowed: Option<&'a BorrowSummaryRow>,
}

impl<'a> BorrowStats<'a> {
    pub fn compute(rows: &'a [BorrowSummaryRow]) -> Self {
        let total_books = rows.len();
        let total_quantity = rows.iter().map(|r| r.total_quantity_borrowed).sum::<u64>();
        let average_per_book = match total_books as u64 {
            0 => 0,
            n => (2 * total_quantity + n) / (2 * n),
        };

        // ties keep the earlier row
        let most_borrowed = rows.iter().fold(None, |best: Option<&BorrowSummaryRow>, row| match best {
            Some(b) if b.total_quantity_borrowed >= row.total_quantity_borrowed => Some(b),
            _ => Some(row),
        });

        Self {
            total_books,
            total_quantity,
            average_per_book,
            most_borrowed,
        }
    }
}
