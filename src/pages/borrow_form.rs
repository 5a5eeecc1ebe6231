//! Borrow request form

use chrono::NaiveDate;
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::{Book, BorrowRequest},
    repository::encode_component,
    ui::{html::escape, Modal},
};

/// Raw field text; both fields are checked in [`BorrowFormData::into_request`]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BorrowFormData {
    #[serde(default)]
    pub quantity: String,
    /// `YYYY-MM-DD` as sent by the date input
    #[serde(default, rename = "returnDate")]
    pub return_date: String,
}

impl Default for BorrowFormData {
    fn default() -> Self {
        Self {
            quantity: "1".to_string(),
            return_date: String::new(),
        }
    }
}

impl BorrowFormData {
    /// Unparsable input counts as 1
    pub fn quantity(&self) -> u32 {
        self.quantity.trim().parse().unwrap_or(1)
    }

    /// `None` when the field was left empty
    pub fn return_date(&self) -> AppResult<Option<NaiveDate>> {
        let raw = self.return_date.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| AppError::Validation("Please enter a valid return date".to_string()))
    }

    /// Apply the form constraints (quantity within 1..=copies, return date
    /// not before `today`) and build the request
    pub fn into_request(&self, book: &Book, today: NaiveDate) -> AppResult<BorrowRequest> {
        let quantity = self.quantity();
        if quantity < 1 {
            return Err(AppError::Validation("Quantity must be at least 1".to_string()));
        }
        if quantity > book.copies {
            return Err(AppError::Validation(format!(
                "Quantity cannot exceed available copies ({})",
                book.copies
            )));
        }

        let due = self
            .return_date()?
            .ok_or_else(|| AppError::Validation("Return date is required".to_string()))?;
        if due < today {
            return Err(AppError::Validation(
                "Return date cannot be in the past".to_string(),
            ));
        }

        Ok(BorrowRequest::new(book.id.clone(), quantity, due))
    }
}

pub fn modal() -> Modal {
    Modal::new().width("500px").padding("0px").border_radius("8px")
}

pub fn render(book: &Book, values: &BorrowFormData, today: NaiveDate) -> String {
    format!(
        concat!(
            r#"<div class="modal-head"><h2>Borrow Book</h2><a class="action" href="/" aria-label="Close">&#10005;</a></div>"#,
            r#"<form method="post" action="/books/{id}/borrow"><div class="modal-body">"#,
            r#"<div class="panel"><h3>{title}</h3><p>by {author}</p><p>Available copies: {copies}</p></div>"#,
            r#"<div class="field"><label for="quantity">Quantity</label><input id="quantity" name="quantity" type="number" min="1" max="{copies}" value="{quantity}" placeholder="Enter quantity" required></div>"#,
            r#"<div class="field"><label for="returnDate">Return Date</label><input id="returnDate" name="returnDate" type="date" min="{today}" value="{return_date}" required></div>"#,
            r#"</div><div class="modal-foot"><a class="btn" href="/">Cancel</a><button class="btn btn-primary" type="submit">Borrow Book</button></div></form>"#,
        ),
        id = escape(&encode_component(&book.id)),
        title = escape(&book.title),
        author = escape(&book.author),
        copies = book.copies,
        quantity = escape(&values.quantity),
        today = today.format("%Y-%m-%d"),
        return_date = escape(&values.return_date),
    )
}
