//! Day-range planning and per-day UTC query windows.

use chrono::{Days, NaiveDate, Utc};

/// Returns `n` calendar dates, newest first, starting at today's UTC date.
#[must_use]
pub fn past_days(n: usize) -> Vec<NaiveDate> {
    plan_days(Utc::now().date_naive(), n)
}

/// Returns `today, today - 1, ..., today - (n - 1)`.
///
/// Stops early only if the calendar runs out (before year -262143).
#[must_use]
pub fn plan_days(today: NaiveDate, n: usize) -> Vec<NaiveDate> {
    (0..n as u64)
        .map_while(|offset| today.checked_sub_days(Days::new(offset)))
        .collect()
}

/// Inclusive UTC bounds used as `postedAfter` / `postedBefore` for one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayWindow {
    pub date: NaiveDate,
    /// `YYYY-MM-DDT00:00:00Z`
    pub start: String,
    /// `YYYY-MM-DDT23:59:59.999999Z`
    pub end: String,
}

impl DayWindow {
    #[must_use]
    pub fn for_date(date: NaiveDate) -> Self {
        let day = date.format("%Y-%m-%d");
        Self {
            date,
            start: format!("{day}T00:00:00Z"),
            end: format!("{day}T23:59:59.999999Z"),
        }
    }
}
