//! Dashboard HTML.

use phdigest_client::RankingReport;
use phdigest_core::RunSettings;
use phdigest_export::{escape_html, render_table};

const STYLE: &str = "\
body { font-family: -apple-system, BlinkMacSystemFont, \"Segoe UI\", sans-serif; margin: 2rem auto; max-width: 72rem; padding: 0 1rem; }
table.table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
table.table th, table.table td { border: 1px solid #dee2e6; padding: 0.4rem 0.6rem; text-align: left; }
table.table thead th { background: #f1f3f5; position: sticky; top: 0; }
table.table-striped tbody tr:nth-of-type(odd) { background: #f8f9fa; }
td.num { text-align: right; }
.notice { padding: 0.75rem 1rem; border-radius: 0.4rem; margin: 0.5rem 0; }
.warning { background: #fff3cd; color: #664d03; }
.error { background: #f8d7da; color: #842029; }
a.download { display: inline-block; padding: 0.5rem 1rem; border-radius: 0.4rem; background: #da552f; color: #fff; text-decoration: none; }
";

/// What the page body shows below the heading.
pub(super) enum PageBody<'a> {
    Report(&'a RankingReport),
    Failure(&'a str),
}

pub(super) fn render_dashboard(run: RunSettings, body: &PageBody<'_>) -> String {
    let mut content = String::new();

    match body {
        PageBody::Report(report) => {
            for skipped in &report.skipped {
                content.push_str(&format!(
                    "<div class=\"notice warning\">Failed to fetch data for {} (HTTP {})</div>\n",
                    skipped.date.format("%Y-%m-%d"),
                    skipped.status
                ));
            }
            content.push_str(&render_table(&report.rows));
            content.push_str(
                "\n<p><a class=\"download\" href=\"/download\">\u{1f4e5} Download Excel file</a></p>\n",
            );
        }
        PageBody::Failure(message) => {
            content.push_str(&format!(
                "<div class=\"notice error\">Error: {}</div>\n",
                escape_html(message)
            ));
        }
    }

    format!(
        "<!DOCTYPE html>
<html lang=\"en\">
<head>
<meta charset=\"utf-8\">
<title>Product Hunt Top Products</title>
<style>
{STYLE}</style>
</head>
<body>
<h1>\u{1f680} Product Hunt Top Products (Last {days} Days)</h1>
<p>Displays the top {top} most upvoted products for each day.</p>
{content}
</body>
</html>
",
        days = run.days(),
        top = run.top_n(),
    )
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use phdigest_client::SkippedDay;
    use phdigest_core::ResultRow;

    use super::*;

    #[test]
    fn report_page_lists_rows_warnings_and_download() {
        let date = NaiveDate::from_ymd_opt(2025, 8, 1).unwrap();
        let report = RankingReport {
            rows: vec![ResultRow {
                date,
                product_name: "Alpha".to_string(),
                tagline: "tl".to_string(),
                upvotes: 10,
                url: "https://ph.test/a".to_string(),
            }],
            skipped: vec![SkippedDay {
                date: date.pred_opt().unwrap(),
                status: 502,
            }],
        };

        let html = render_dashboard(RunSettings::default(), &PageBody::Report(&report));

        assert!(html.contains("Last 21 Days"));
        assert!(html.contains("top 10 most upvoted"));
        assert!(html.contains("Failed to fetch data for 2025-07-31 (HTTP 502)"));
        assert!(html.contains("<td>Alpha</td>"));
        assert!(html.contains("href=\"/download\""));
    }

    #[test]
    fn failure_page_shows_escaped_message_without_download() {
        let html = render_dashboard(
            RunSettings::default(),
            &PageBody::Failure("failed to get access token: <invalid_client>"),
        );

        assert!(html.contains("Error: failed to get access token: &lt;invalid_client&gt;"));
        assert!(!html.contains("href=\"/download\""));
        assert!(!html.contains("<table"));
    }
}
