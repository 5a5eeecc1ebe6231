//! Add/edit book form

use serde::Deserialize;
use serde_with::{serde_as, NoneAsEmptyString};
use validator::{Validate, ValidationError};

use crate::{
    error::AppResult,
    models::{Book, BookInput, Genre},
    repository::encode_component,
    ui::{html::escape, Modal},
};

/// Submitted (or prefilled) book form values
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
pub struct BookFormData {
    #[serde(default)]
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Author is required"))]
    pub author: String,
    #[serde(default)]
    #[validate(custom(function = "validate_genre"))]
    pub genre: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "ISBN is required"))]
    pub isbn: String,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub description: Option<String>,
    /// Raw field text; anything that is not a non-negative integer counts as 0
    #[serde(default)]
    pub copies: String,
    /// Checkbox, present only when ticked
    #[serde(default)]
    pub available: Option<String>,
}

fn validate_genre(genre: &str) -> Result<(), ValidationError> {
    genre
        .parse::<Genre>()
        .map(|_| ())
        .map_err(|_| ValidationError::new("genre").with_message("Please select a genre".into()))
}

impl From<&Book> for BookFormData {
    fn from(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author.clone(),
            genre: book.genre.as_str().to_string(),
            isbn: book.isbn.clone(),
            description: book.description.clone(),
            copies: book.copies.to_string(),
            available: book.available.then(|| "on".to_string()),
        }
    }
}

impl BookFormData {
    pub fn copies(&self) -> u32 {
        self.copies.trim().parse().unwrap_or(0)
    }

    pub fn is_available(&self) -> bool {
        self.available.is_some()
    }

    /// Validate and build the API payload. New books are always available;
    /// edits take the checkbox.
    pub fn into_input(self, editing: bool) -> AppResult<BookInput> {
        self.validate()?;
        let genre = self.genre.parse::<Genre>()?;
        let available = !editing || self.is_available();

        Ok(BookInput {
            copies: self.copies(),
            title: self.title,
            author: self.author,
            genre,
            isbn: self.isbn,
            description: self.description,
            available,
        })
    }
}

pub fn modal() -> Modal {
    Modal::new().width("500px").padding("0px").border_radius("8px")
}

fn text_field(name: &str, label: &str, value: &str, placeholder: &str) -> String {
    format!(
        r#"<div class="field"><label for="{name}">{label}</label><input id="{name}" name="{name}" type="text" value="{value}" placeholder="{placeholder}" required></div>"#,
        name = name,
        label = label,
        value = escape(value),
        placeholder = placeholder,
    )
}

/// Form markup; `id` is the book being edited, `None` when adding
pub fn render(id: Option<&str>, values: &BookFormData) -> String {
    let (heading, submit, action) = match id {
        Some(id) => ("Edit Book", "Update Book", format!("/books/{}", encode_component(id))),
        None => ("Add New Book", "Add Book", "/books".to_string()),
    };

    let options: String = Genre::ALL
        .iter()
        .map(|g| {
            let selected = if values.genre == g.as_str() { " selected" } else { "" };
            format!(r#"<option value="{}"{}>{}</option>"#, g.as_str(), selected, g)
        })
        .collect();

    let available = if id.is_some() {
        let checked = if values.is_available() { " checked" } else { "" };
        format!(
            r#"<div class="field"><label><input name="available" type="checkbox"{}> Available</label></div>"#,
            checked
        )
    } else {
        String::new()
    };

    format!(
        concat!(
            r#"<div class="modal-head"><h2>{heading}</h2><a class="action" href="/" aria-label="Close">&#10005;</a></div>"#,
            r#"<form method="post" action="{action}"><div class="modal-body">"#,
            "{title}{author}",
            r#"<div class="field"><label for="genre">Genre</label><select id="genre" name="genre" required><option value="">Select a genre</option>{options}</select></div>"#,
            "{isbn}",
            r#"<div class="field"><label for="description">Description</label><textarea id="description" name="description" rows="3" placeholder="Enter book description">{description}</textarea></div>"#,
            r#"<div class="field"><label for="copies">Copies</label><input id="copies" name="copies" type="number" min="0" value="{copies}" placeholder="Enter number of copies" required></div>"#,
            "{available}",
            r#"</div><div class="modal-foot"><a class="btn" href="/">Cancel</a><button class="btn btn-primary" type="submit">{submit}</button></div></form>"#,
        ),
        heading = heading,
        action = escape(&action),
        title = text_field("title", "Title", &values.title, "Enter book title"),
        author = text_field("author", "Author", &values.author, "Enter author name"),
        options = options,
        isbn = text_field("isbn", "ISBN", &values.isbn, "Enter ISBN"),
        description = escape(values.description.as_deref().unwrap_or("")),
        copies = escape(&values.copies),
        available = available,
        submit = submit,
    )
}
