//! Batch export: fetch every planned day, print the table, write the files.

use chrono::Local;
use phdigest_core::AppConfig;
use phdigest_export::{format_table, write_exports, ExportPaths};

/// Fetch the configured day range and write `{prefix}_{date}.xlsx` and
/// `{prefix}_{date}.html`, dated with the local calendar day.
///
/// Nothing is printed or written until every day has been attempted.
///
/// # Errors
///
/// Returns an error if the token exchange fails, a day's request fails for
/// any reason other than a non-200 status, or an export file cannot be
/// written.
pub(crate) async fn run_batch(config: &AppConfig) -> anyhow::Result<ExportPaths> {
    let report = phdigest_client::run(config).await?;

    println!(
        "\nTop {} Most Upvoted Products per Day (Last {} Days):\n",
        config.run.top_n(),
        config.run.days()
    );
    println!("{}", format_table(&report.rows));

    let today = Local::now().date_naive();
    let paths = write_exports(
        &report.rows,
        &config.output_dir,
        &config.export_prefix,
        today,
    )?;

    println!("\nExcel file saved as '{}'", file_name(&paths.xlsx));
    println!("HTML file saved as '{}'", file_name(&paths.html));

    Ok(paths)
}

/// The one line printed when a batch run fails.
pub(crate) fn failure_line(err: &anyhow::Error) -> String {
    format!("Error: {err:#}")
}

fn file_name(path: &std::path::Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}
