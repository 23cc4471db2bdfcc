use chrono::NaiveDate;
use phdigest_core::ResultRow;

use crate::types::RankingEntry;

/// Flattens one day's entries into rows, keeping upstream order and at most
/// `top_n` of them. A missing tagline becomes an empty string.
#[must_use]
pub fn flatten_day(day: NaiveDate, entries: Vec<RankingEntry>, top_n: usize) -> Vec<ResultRow> {
    entries
        .into_iter()
        .take(top_n)
        .map(|entry| ResultRow {
            date: day,
            product_name: entry.name,
            tagline: entry.tagline.unwrap_or_default(),
            upvotes: entry.votes_count,
            url: entry.url,
        })
        .collect()
}
