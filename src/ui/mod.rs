//! Presentation components rendered to HTML strings

pub mod html;
pub mod modal;
pub mod table;
pub mod toast;

pub use modal::Modal;
pub use table::{Column, RowAction, Table};
pub use toast::{Notice, Toast};
