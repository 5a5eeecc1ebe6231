//! Page handlers rendering HTML over the data-access layer

pub mod book_form;
pub mod books;
pub mod borrow_form;
pub mod borrow_summary;
pub mod delete_dialog;
pub mod health;
