pub mod client;
pub mod error;
pub mod normalize;
pub mod pipeline;
pub mod types;

pub use client::{AccessToken, ProductHuntClient};
pub use error::ClientError;
pub use normalize::flatten_day;
pub use pipeline::{run, run_with_client, RankingReport, SkippedDay};
pub use types::RankingEntry;
