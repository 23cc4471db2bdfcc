use std::fmt::Write as _;

use phdigest_core::{ResultRow, COLUMNS};

const TABLE_CLASSES: &str = "dataframe table table-striped";

const STYLE: &str = "\
body { font-family: -apple-system, BlinkMacSystemFont, \"Segoe UI\", sans-serif; margin: 2rem; }
table.table { border-collapse: collapse; width: 100%; }
table.table th, table.table td { border: 1px solid #dee2e6; padding: 0.4rem 0.6rem; text-align: left; }
table.table thead th { background: #f1f3f5; }
table.table-striped tbody tr:nth-of-type(odd) { background: #f8f9fa; }
td.num { text-align: right; }
";

/// Minimal escaping for text placed in element content or quoted attributes.
#[must_use]
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
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

/// Renders the rows as a `<table>` fragment.
#[must_use]
pub fn render_table(rows: &[ResultRow]) -> String {
    let mut html = format!("<table border=\"1\" class=\"{TABLE_CLASSES}\">\n  <thead>\n    <tr>");
    for column in COLUMNS {
        let _ = write!(html, "<th>{column}</th>");
    }
    html.push_str("</tr>\n  </thead>\n  <tbody>\n");

    for row in rows {
        let [date, name, tagline, upvotes, url] = row.cells();
        let _ = writeln!(
            html,
            "    <tr><td>{}</td><td>{}</td><td>{}</td><td class=\"num\">{}</td><td>{}</td></tr>",
            escape_html(&date),
            escape_html(&name),
            escape_html(&tagline),
            escape_html(&upvotes),
            escape_html(&url),
        );
    }

    html.push_str("  </tbody>\n</table>");
    html
}

/// Renders a standalone HTML document containing the table.
#[must_use]
pub fn render_document(title: &str, rows: &[ResultRow]) -> String {
    let title = escape_html(title);
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n<style>\n{STYLE}</style>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        render_table(rows)
    )
}
