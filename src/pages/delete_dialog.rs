//! Delete confirmation dialog

use crate::{
    models::Book,
    repository::encode_component,
    ui::{html::escape, Modal},
};

pub fn modal() -> Modal {
    Modal::new().width("400px").padding("24px").border_radius("8px")
}

pub fn render(book: &Book) -> String {
    format!(
        concat!(
            "<h2>Delete Book</h2>",
            r#"<p>Are you sure you want to delete "<strong>{title}</strong>"? This action cannot be undone.</p>"#,
            r#"<form method="post" action="/books/{id}/delete"><div class="modal-foot">"#,
            r#"<a class="btn" href="/">Cancel</a><button class="btn btn-danger" type="submit">Delete Book</button>"#,
            "</div></form>",
        ),
        title = escape(&book.title),
        id = escape(&encode_component(&book.id)),
    )
}
