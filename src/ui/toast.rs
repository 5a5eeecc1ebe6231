//! Transient notifications

use super::html::escape;

/// Success notices carried across a redirect in the `notice` query parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    BookAdded,
    BookUpdated,
    BorrowCreated,
    BookDeleted,
}

impl Notice {
    const ALL: [Notice; 4] = [
        Notice::BookAdded,
        Notice::BookUpdated,
        Notice::BorrowCreated,
        Notice::BookDeleted,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Notice::BookAdded => "book-added",
            Notice::BookUpdated => "book-updated",
            Notice::BorrowCreated => "borrow-created",
            Notice::BookDeleted => "book-deleted",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|n| n.key() == key)
    }

    pub fn message(self) -> &'static str {
        match self {
            Notice::BookAdded => "Book added successfully",
            Notice::BookUpdated => "Book updated successfully",
            Notice::BorrowCreated => "Borrow request created successfully",
            Notice::BookDeleted => "Book deleted successfully",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == ToastKind::Error
    }

    pub fn render(&self) -> String {
        let (class, role) = match self.kind {
            ToastKind::Success => ("success", "status"),
            ToastKind::Error => ("error", "alert"),
        };
        format!(
            r#"<div class="toast {}" role="{}">{}</div>"#,
            class,
            role,
            escape(&self.message)
        )
    }
}

impl From<Notice> for Toast {
    fn from(notice: Notice) -> Self {
        Toast::success(notice.message())
    }
}
