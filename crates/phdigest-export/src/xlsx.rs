//! Spreadsheet export.
//!
//! One worksheet named `Sheet1`, a bold header row of [`COLUMNS`], then one
//! row per [`ResultRow`]. `upvotes` is written as a number, everything else
//! as text, so a reader gets the same types back.

use std::path::Path;

use phdigest_core::{ResultRow, COLUMNS};
use rust_xlsxwriter::{Format, FormatBorder, RowNum, Workbook, XlsxError};

use crate::error::ExportError;

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const SHEET_NAME: &str = "Sheet1";

/// Column widths in characters, matched to [`COLUMNS`].
const COLUMN_WIDTHS: [f64; 5] = [12.0, 28.0, 48.0, 10.0, 56.0];

fn build_workbook(rows: &[ResultRow]) -> Result<Workbook, XlsxError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold().set_border(FormatBorder::Thin);

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for ((col, header), width) in (0_u16..).zip(COLUMNS).zip(COLUMN_WIDTHS) {
        worksheet.write_string_with_format(0, col, header, &header_format)?;
        worksheet.set_column_width(col, width)?;
    }

    for (index, row) in rows.iter().enumerate() {
        let r = RowNum::try_from(index + 1).map_err(|_| XlsxError::RowColumnLimitError)?;
        worksheet.write_string(r, 0, row.date.format("%Y-%m-%d").to_string())?;
        worksheet.write_string(r, 1, &row.product_name)?;
        worksheet.write_string(r, 2, &row.tagline)?;
        worksheet.write_number(r, 3, f64::from(row.upvotes))?;
        worksheet.write_string(r, 4, &row.url)?;
    }

    Ok(workbook)
}

/// Serializes `rows` to an in-memory XLSX file.
///
/// # Errors
///
/// Returns [`ExportError::Xlsx`] if the workbook cannot be assembled.
pub fn workbook_bytes(rows: &[ResultRow]) -> Result<Vec<u8>, ExportError> {
    let mut workbook = build_workbook(rows)?;
    Ok(workbook.save_to_buffer()?)
}

/// Writes `rows` as an XLSX file at `path`.
///
/// # Errors
///
/// Returns [`ExportError::Xlsx`] if the workbook cannot be assembled or saved.
pub fn write_xlsx(rows: &[ResultRow], path: &Path) -> Result<(), ExportError> {
    let mut workbook = build_workbook(rows)?;
    workbook.save(path)?;
    Ok(())
}
