use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Column headers, in export order.
pub const COLUMNS: [&str; 5] = ["date", "product_name", "tagline", "upvotes", "url"];

/// One ranked product on one day, as exported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRow {
    pub date: NaiveDate,
    pub product_name: String,
    pub tagline: String,
    pub upvotes: u32,
    pub url: String,
}

impl ResultRow {
    /// Cell values as display strings, in [`COLUMNS`] order.
    #[must_use]
    pub fn cells(&self) -> [String; 5] {
        [
            self.date.format("%Y-%m-%d").to_string(),
            self.product_name.clone(),
            self.tagline.clone(),
            self.upvotes.to_string(),
            self.url.clone(),
        ]
    }
}
