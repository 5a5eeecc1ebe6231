//! HTML helpers and the page shell (navbar, footer)

use axum::http::StatusCode;
use chrono::Datelike;

/// Navbar entries: label and route
pub const NAV_ITEMS: [(&str, &str); 2] = [("All Books", "/"), ("Borrow Summary", "/borrow-summary")];

const STYLES: &str = r#"
body { margin: 0; font-family: system-ui, sans-serif; color: #111827; background: #fff; }
a { color: inherit; text-decoration: none; }
.container { max-width: 80rem; margin: 0 auto; padding: 2rem 1.5rem; }
nav { border-bottom: 1px solid #f3f4f6; position: sticky; top: 0; background: #fff; z-index: 50; }
nav .inner { max-width: 80rem; margin: 0 auto; padding: 0 1.5rem; height: 4rem; display: flex; justify-content: space-between; align-items: center; }
nav .brand { font-size: 1.125rem; font-weight: 500; }
nav .links a { margin-left: 2rem; font-size: .875rem; color: #4b5563; }
nav .links a.active { color: #111827; font-weight: 600; }
main { min-height: 90vh; }
footer { border-top: 1px solid #f3f4f6; padding: 2rem 1.5rem; color: #6b7280; font-size: .875rem; text-align: center; }
.header { display: flex; justify-content: space-between; align-items: center; margin-bottom: 1.5rem; }
.header h1 { font-size: 1.5rem; font-weight: 500; margin: 0; }
.btn { display: inline-block; padding: .5rem 1rem; font-size: .875rem; border-radius: .375rem; border: 1px solid #e5e7eb; background: #fff; cursor: pointer; }
.btn-primary { color: #fff; background: #1f2937; border-color: #1f2937; }
.btn-danger { color: #fff; background: #dc2626; border-color: #dc2626; }
.banner { text-align: center; padding: 1rem 0; }
.banner.error { color: #dc2626; }
.panel { border: 1px solid #e5e7eb; border-radius: .5rem; padding: 1.5rem; }
.panel.error { background: #fef2f2; border-color: #fecaca; color: #dc2626; }
.table-wrap { border: 1px solid #e5e7eb; border-radius: .5rem; overflow: hidden; }
table { width: 100%; border-collapse: collapse; }
th { padding: .75rem 1.5rem; text-align: left; font-size: .75rem; color: #6b7280; text-transform: uppercase; background: #f9fafb; }
td { padding: 1rem 1.5rem; border-top: 1px solid #e5e7eb; }
td.nowrap { white-space: nowrap; }
.empty { border: 1px solid #e5e7eb; border-radius: .5rem; padding: 3rem; text-align: center; color: #6b7280; font-size: 1.125rem; }
.badge { display: inline-flex; padding: .25rem .5rem; font-size: .75rem; border-radius: 9999px; }
.badge.ok { background: #dcfce7; color: #166534; }
.badge.no { background: #fee2e2; color: #991b1b; }
.badge.count { background: #f3f4f6; color: #1f2937; }
.action { padding: .25rem; color: #9ca3af; }
.action.disabled { color: #d1d5db; cursor: not-allowed; }
.cards { display: none; }
.card { border: 1px solid #e5e7eb; border-radius: .5rem; padding: 1rem; margin-bottom: 1rem; }
.card .primary { font-weight: 500; }
.card .secondary { font-size: .875rem; color: #4b5563; }
.card .menu { border: 1px solid #e5e7eb; border-radius: .375rem; }
.card .menu a, .card .menu button { display: block; width: 100%; text-align: left; padding: .5rem .75rem; font-size: .875rem; }
.tiles { display: grid; grid-template-columns: repeat(4, 1fr); gap: 1.5rem; margin-bottom: 2rem; }
.tile .value { font-size: 1.5rem; font-weight: 500; }
.tile .label { font-size: .875rem; color: #4b5563; }
.skeleton { background: #e5e7eb; border-radius: .25rem; height: 1.5rem; margin-bottom: .5rem; }
.overlay { position: fixed; inset: 0; display: flex; align-items: center; justify-content: center; background: rgba(0,0,0,.5); }
.overlay .backdrop { position: absolute; inset: 0; }
.modal { position: relative; background: #fff; max-height: 90%; overflow-y: auto; box-shadow: 0 20px 25px rgba(0,0,0,.15); }
.field { margin-bottom: 1rem; }
.field label { display: block; font-size: .875rem; color: #374151; margin-bottom: .25rem; }
.field input, .field select, .field textarea { width: 100%; box-sizing: border-box; padding: .5rem .75rem; border: 1px solid #e5e7eb; border-radius: .375rem; }
.modal-head, .modal-foot { display: flex; justify-content: space-between; align-items: center; padding: 1.5rem; }
.modal-head { border-bottom: 1px solid #f3f4f6; }
.modal-foot { border-top: 1px solid #f3f4f6; justify-content: flex-end; gap: .75rem; }
.modal-body { padding: 1.5rem; }
.toast { position: fixed; top: 1rem; right: 1rem; padding: .75rem 1rem; border-radius: .375rem; z-index: 1000; }
.toast.success { background: #ecfdf5; color: #065f46; }
.toast.error { background: #fef2f2; color: #991b1b; }
@media (max-width: 1024px) { .table-wrap { display: none; } .cards { display: block; } .tiles { grid-template-columns: 1fr; } }
"#;

/// Escape text for use in element content and quoted attributes
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn navbar(current_path: &str) -> String {
    let links: String = NAV_ITEMS
        .iter()
        .map(|(name, href)| {
            let class = if *href == current_path { " class=\"active\"" } else { "" };
            format!(r#"<a href="{}"{}>{}</a>"#, href, class, name)
        })
        .collect();

    format!(
        r#"<nav><div class="inner"><a class="brand" href="/">&#128214; BookLib</a><div class="links">{}</div></div></nav>"#,
        links
    )
}

fn footer() -> String {
    format!(
        "<footer><strong>BookLib</strong> &middot; A modern library management system designed to simplify book borrowing, tracking, and organization. &copy; {} BookLib. All rights reserved.</footer>",
        chrono::Utc::now().year()
    )
}

/// Complete HTML document: navbar, page body, footer
pub fn page(title: &str, current_path: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} | BookLib</title>
<style>{styles}</style>
</head>
<body>
{nav}
<main>{body}</main>
{footer}
</body>
</html>"#,
        title = escape(title),
        styles = STYLES,
        nav = navbar(current_path),
        body = body,
        footer = footer(),
    )
}

/// Standalone error document
pub fn error_page(status: StatusCode, message: &str) -> String {
    let body = format!(
        r#"<div class="container"><div class="panel error"><h2>{} {}</h2><p>{}</p><p><a class="btn" href="/">Back to books</a></p></div></div>"#,
        status.as_u16(),
        escape(status.canonical_reason().unwrap_or("Error")),
        escape(message)
    );
    page("Error", "", &body)
}
