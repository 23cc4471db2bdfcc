//! The shared fetch pipeline used by both the batch CLI and the server.
//!
//! Token exchange, then one ranking request per planned day, strictly in
//! order. Nothing is returned until every day has been attempted.

use chrono::NaiveDate;
use phdigest_core::{past_days, AppConfig, Credentials, ResultRow};
use serde::Serialize;

use crate::client::ProductHuntClient;
use crate::error::ClientError;
use crate::normalize::flatten_day;

/// A day that contributed no rows because its request failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedDay {
    pub date: NaiveDate,
    pub status: u16,
}

/// Rows in day-then-rank order plus the days that were skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RankingReport {
    pub rows: Vec<ResultRow>,
    pub skipped: Vec<SkippedDay>,
}

/// Run the full pipeline for the configured day range.
///
/// # Errors
///
/// Returns [`ClientError::Authentication`] if the token exchange fails, in
/// which case no ranking requests are made. See [`run_with_client`] for the
/// per-day policy.
pub async fn run(config: &AppConfig) -> Result<RankingReport, ClientError> {
    let client = ProductHuntClient::with_base_url(
        &config.api_base_url,
        config.request_timeout_secs,
        &config.user_agent,
    )?;
    let days = past_days(config.run.days());
    run_with_client(&client, &config.credentials, &days, config.run.top_n()).await
}

/// Run the pipeline for an explicit list of days.
///
/// Any status other than 200 for a day is logged and that day contributes
/// no rows. Any other failure aborts the run.
///
/// # Errors
///
/// - [`ClientError::Authentication`] if the token exchange fails.
/// - [`ClientError::Http`], [`ClientError::Api`] or
///   [`ClientError::Deserialize`] from any day's request.
pub async fn run_with_client(
    client: &ProductHuntClient,
    credentials: &Credentials,
    days: &[NaiveDate],
    top_n: usize,
) -> Result<RankingReport, ClientError> {
    let token = client.fetch_access_token(credentials).await?;
    let mut report = RankingReport::default();

    for &day in days {
        match client.fetch_day_posts(&token, day).await {
            Ok(entries) => {
                let rows = flatten_day(day, entries, top_n);
                tracing::debug!(%day, rows = rows.len(), "fetched day rankings");
                report.rows.extend(rows);
            }
            Err(ClientError::UnexpectedStatus { status, .. }) => {
                tracing::warn!(%day, status, "failed to fetch rankings for day; skipping");
                report.skipped.push(SkippedDay { date: day, status });
            }
            Err(e) => return Err(e),
        }
    }

    tracing::info!(
        days = days.len(),
        rows = report.rows.len(),
        skipped = report.skipped.len(),
        "ranking fetch complete"
    );
    Ok(report)
}
