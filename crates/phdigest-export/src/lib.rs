pub mod console;
pub mod error;
pub mod html;
pub mod naming;
pub mod xlsx;

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use phdigest_core::ResultRow;

pub use console::format_table;
pub use error::ExportError;
pub use html::{escape_html, render_document, render_table};
pub use naming::export_file_name;
pub use xlsx::{workbook_bytes, write_xlsx, XLSX_CONTENT_TYPE};

/// Files written by [`write_exports`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPaths {
    pub xlsx: PathBuf,
    pub html: PathBuf,
}

/// Writes `{prefix}_{date}.xlsx` and `{prefix}_{date}.html` into `dir`.
///
/// # Errors
///
/// Returns [`ExportError`] if either file cannot be built or written.
pub fn write_exports(
    rows: &[ResultRow],
    dir: &Path,
    prefix: &str,
    date: NaiveDate,
) -> Result<ExportPaths, ExportError> {
    let xlsx = dir.join(export_file_name(prefix, date, "xlsx"));
    write_xlsx(rows, &xlsx)?;

    let html = dir.join(export_file_name(prefix, date, "html"));
    let document = render_document(prefix, rows);
    std::fs::write(&html, document).map_err(|source| ExportError::Io {
        path: html.clone(),
        source,
    })?;

    tracing::info!(
        xlsx = %xlsx.display(),
        html = %html.display(),
        rows = rows.len(),
        "exports written"
    );
    Ok(ExportPaths { xlsx, html })
}
