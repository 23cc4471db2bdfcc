use chrono::NaiveDate;

/// `{prefix}_{YYYY-MM-DD}.{extension}`
#[must_use]
pub fn export_file_name(prefix: &str, date: NaiveDate, extension: &str) -> String {
    format!("{prefix}_{}.{extension}", date.format("%Y-%m-%d"))
}
