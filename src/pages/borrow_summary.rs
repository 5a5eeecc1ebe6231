//! Borrow summary page

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::Html,
};
use serde::Deserialize;

use crate::{
    models::{BorrowStats, BorrowSummaryRow},
    services::{endpoints::GetBorrowSummary, QueryResult},
    ui::{html, html::escape, Column, Table},
    AppState,
};

#[derive(Debug, Default, Deserialize)]
pub struct SummaryQuery {
    pub refresh: Option<String>,
}

pub fn summary_table() -> Table<BorrowSummaryRow> {
    Table::new("Borrow Summary")
        .column(Column::new("bookTitle", "Book Title", |r: &BorrowSummaryRow| r.book_title.clone()).primary())
        .column(Column::new("isbn", "ISBN", |r: &BorrowSummaryRow| r.isbn.clone()).no_wrap())
        .column(
            Column::new("totalQuantityBorrowed", "Total Quantity Borrowed", |r: &BorrowSummaryRow| {
                r.total_quantity_borrowed.to_string()
            })
            .render(|r: &BorrowSummaryRow| {
                format!(r#"<span class="badge count">{}</span>"#, r.total_quantity_borrowed)
            })
            .no_wrap(),
        )
        .empty_message("No borrowing data available")
}

fn tile(value: &str, label: &str) -> String {
    format!(
        r#"<div class="panel tile"><div class="value">{}</div><div class="label">{}</div></div>"#,
        escape(value),
        escape(label)
    )
}

fn render_tiles(stats: &BorrowStats<'_>) -> String {
    let most_borrowed = match stats.most_borrowed {
        Some(row) => tile(
            &row.book_title,
            &format!("Most Borrowed ({} times)", row.total_quantity_borrowed),
        ),
        None => tile("No Data", "No books borrowed yet"),
    };

    format!(
        r#"<div class="tiles">{}{}{}{}</div>"#,
        tile(&stats.total_books.to_string(), "Total Books Borrowed"),
        tile(&stats.total_quantity.to_string(), "Total Quantity Borrowed"),
        tile(&stats.average_per_book.to_string(), "Average per Book"),
        most_borrowed
    )
}

fn render_skeleton() -> String {
    let mut out = String::from(r#"<div class="tiles">"#);
    for _ in 0..4 {
        out.push_str(r#"<div class="panel tile"><div class="skeleton"></div><div class="skeleton"></div></div>"#);
    }
    out.push_str(r#"</div><div class="panel"><div class="skeleton"></div>"#);
    for _ in 0..5 {
        out.push_str(r#"<div class="skeleton"></div>"#);
    }
    out.push_str("</div>");
    out
}

pub fn render_page(summary: &QueryResult<Arc<Vec<BorrowSummaryRow>>>) -> String {
    let content = match summary {
        QueryResult::Loading => render_skeleton(),
        QueryResult::Error(_) => concat!(
            r#"<div class="panel error"><strong>Error loading borrow summary</strong>"#,
            "<p>Failed to load borrowing data. Please try again later.</p></div>",
        )
        .to_string(),
        QueryResult::Success(rows) => {
            let stats = BorrowStats::compute(rows);
            format!(
                r#"{}<div class="header"><h1>Borrow Summary</h1><a class="btn" href="/borrow-summary?refresh=1">Refresh</a></div>{}"#,
                render_tiles(&stats),
                summary_table().render(rows, |_, _| String::new(), |_| String::new())
            )
        }
    };

    html::page(
        "Borrow Summary",
        "/borrow-summary",
        &format!(r#"<div class="container">{}</div>"#, content),
    )
}

/// `GET /borrow-summary`
pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<SummaryQuery>,
) -> Html<String> {
    let summary = if params.refresh.is_some() {
        state.api.refetch::<GetBorrowSummary>(&()).await
    } else {
        state.api.get_borrow_summary().await
    };

    Html(render_page(&summary))
}
