//! Generic table renderer
//!
//! Renders records as a desktop table plus a mobile card list. The only state
//! it holds is which row's action menu is open.

use std::fmt::Write;

use super::html::escape;

type Accessor<T> = Box<dyn Fn(&T) -> String + Send + Sync>;
type Predicate<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;

/// Column descriptor with a typed accessor
pub struct Column<T> {
    pub key: &'static str,
    pub label: &'static str,
    accessor: Accessor<T>,
    render: Option<Accessor<T>>,
    /// `false` keeps the cell on a single line
    pub wrap: bool,
    /// Emphasized in the mobile card header
    pub primary: bool,
}

impl<T> Column<T> {
    pub fn new(
        key: &'static str,
        label: &'static str,
        accessor: impl Fn(&T) -> String + Send + Sync + 'static,
    ) -> Self {
        Self {
            key,
            label,
            accessor: Box::new(accessor),
            render: None,
            wrap: true,
            primary: false,
        }
    }

    /// Custom renderer returning markup; replaces the escaped accessor text
    pub fn render(mut self, render: impl Fn(&T) -> String + Send + Sync + 'static) -> Self {
        self.render = Some(Box::new(render));
        self
    }

    pub fn no_wrap(mut self) -> Self {
        self.wrap = false;
        self
    }

    pub fn primary(mut self) -> Self {
        self.primary = true;
        self
    }

    /// Plain value of the cell
    pub fn value(&self, item: &T) -> String {
        (self.accessor)(item)
    }

    /// Cell markup
    pub fn cell(&self, item: &T) -> String {
        match &self.render {
            Some(render) => render(item),
            None => escape(&self.value(item)),
        }
    }
}

/// Per-row action
pub struct RowAction<T> {
    pub key: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
    disabled: Option<Predicate<T>>,
}

impl<T> RowAction<T> {
    pub fn new(key: &'static str, label: &'static str, icon: &'static str) -> Self {
        Self {
            key,
            label,
            icon,
            disabled: None,
        }
    }

    pub fn disabled_when(mut self, predicate: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        self.disabled = Some(Box::new(predicate));
        self
    }

    pub fn is_disabled(&self, item: &T) -> bool {
        self.disabled.as_ref().map(|p| p(item)).unwrap_or(false)
    }
}

pub struct Table<T> {
    pub title: String,
    columns: Vec<Column<T>>,
    actions: Vec<RowAction<T>>,
    empty_message: String,
    open_menu: Option<usize>,
}

impl<T> Table<T> {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            columns: Vec::new(),
            actions: Vec::new(),
            empty_message: "No data available".to_string(),
            open_menu: None,
        }
    }

    pub fn column(mut self, column: Column<T>) -> Self {
        self.columns.push(column);
        self
    }

    pub fn action(mut self, action: RowAction<T>) -> Self {
        self.actions.push(action);
        self
    }

    pub fn empty_message(mut self, message: impl Into<String>) -> Self {
        self.empty_message = message.into();
        self
    }

    pub fn columns(&self) -> &[Column<T>] {
        &self.columns
    }

    pub fn actions(&self) -> &[RowAction<T>] {
        &self.actions
    }

    pub fn open_menu(&self) -> Option<usize> {
        self.open_menu
    }

    /// Restore the open menu, e.g. from a request parameter
    pub fn with_open_menu(mut self, row: Option<usize>) -> Self {
        self.open_menu = row;
        self
    }

    /// Open the menu of `row`, closing any other; toggling the open row closes it
    pub fn toggle_menu(&mut self, row: usize) {
        self.open_menu = if self.open_menu == Some(row) { None } else { Some(row) };
    }

    /// Dispatch an action on a record. Unknown or disabled actions do nothing and
    /// return `false`; otherwise the callback runs and the menu closes.
    pub fn handle_action<F>(&mut self, key: &str, item: &T, on_action: F) -> bool
    where
        F: FnOnce(&str, &T),
    {
        match self.actions.iter().find(|a| a.key == key) {
            Some(action) if !action.is_disabled(item) => {
                on_action(action.key, item);
                self.open_menu = None;
                true
            }
            _ => false,
        }
    }

    /// Render the records.
    ///
    /// `action_href(key, item)` builds the link of an enabled action;
    /// `menu_href(row)` builds the link that opens (`Some`) or closes (`None`)
    /// a row's mobile menu.
    pub fn render<A, M>(&self, rows: &[T], action_href: A, menu_href: M) -> String
    where
        A: Fn(&str, &T) -> String,
        M: Fn(Option<usize>) -> String,
    {
        if rows.is_empty() {
            return format!(
                r#"<div class="empty">{}</div>"#,
                escape(&self.empty_message)
            );
        }

        let mut out = String::new();
        self.render_desktop(&mut out, rows, &action_href);
        self.render_cards(&mut out, rows, &action_href, &menu_href);
        out
    }

    fn render_desktop<A>(&self, out: &mut String, rows: &[T], action_href: &A)
    where
        A: Fn(&str, &T) -> String,
    {
        let _ = write!(
            out,
            r#"<div class="table-wrap"><table aria-label="{}"><thead><tr>"#,
            escape(&self.title)
        );
        for column in &self.columns {
            let _ = write!(out, "<th>{}</th>", escape(column.label));
        }
        if !self.actions.is_empty() {
            out.push_str("<th>Actions</th>");
        }
        out.push_str("</tr></thead><tbody>");

        for item in rows {
            out.push_str("<tr>");
            for column in &self.columns {
                let class = if column.wrap { "" } else { r#" class="nowrap""# };
                let _ = write!(out, "<td{}>{}</td>", class, column.cell(item));
            }
            if !self.actions.is_empty() {
                out.push_str(r#"<td class="nowrap">"#);
                for action in &self.actions {
                    out.push_str(&self.action_button(action, item, action_href, true));
                }
                out.push_str("</td>");
            }
            out.push_str("</tr>");
        }
        out.push_str("</tbody></table></div>");
    }

    fn render_cards<A, M>(&self, out: &mut String, rows: &[T], action_href: &A, menu_href: &M)
    where
        A: Fn(&str, &T) -> String,
        M: Fn(Option<usize>) -> String,
    {
        out.push_str(r#"<div class="cards">"#);
        for (index, item) in rows.iter().enumerate() {
            out.push_str(r#"<div class="card"><div class="card-head">"#);
            for column in self.columns.iter().take(2) {
                let class = if column.primary { "primary" } else { "secondary" };
                let _ = write!(out, r#"<div class="{}">{}</div>"#, class, column.cell(item));
            }

            if !self.actions.is_empty() {
                let open = self.open_menu == Some(index);
                let toggle = if open { None } else { Some(index) };
                let _ = write!(
                    out,
                    r#"<a class="action" href="{}" aria-expanded="{}">&#8942;</a>"#,
                    escape(&menu_href(toggle)),
                    open
                );
                if open {
                    out.push_str(r#"<div class="menu">"#);
                    for action in &self.actions {
                        out.push_str(&self.action_button(action, item, action_href, false));
                    }
                    out.push_str("</div>");
                }
            }
            out.push_str("</div>");

            if self.columns.len() > 2 {
                out.push_str(r#"<div class="card-body">"#);
                for column in self.columns.iter().skip(2) {
                    let _ = write!(
                        out,
                        "<div><span>{}:</span> <span>{}</span></div>",
                        escape(column.label),
                        column.cell(item)
                    );
                }
                out.push_str("</div>");
            }
            out.push_str("</div>");
        }
        out.push_str("</div>");
    }

    fn action_button<A>(&self, action: &RowAction<T>, item: &T, action_href: &A, icon: bool) -> String
    where
        A: Fn(&str, &T) -> String,
    {
        let text = if icon { action.icon } else { action.label };
        if action.is_disabled(item) {
            format!(
                r#"<button class="action disabled" title="{}" disabled>{}</button>"#,
                escape(action.label),
                text
            )
        } else {
            format!(
                r#"<a class="action" href="{}" title="{}">{}</a>"#,
                escape(&action_href(action.key, item)),
                escape(action.label),
                text
            )
        }
    }
}
