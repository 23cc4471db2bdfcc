//! Product Hunt API request and response types.
//!
//! Only the fields the daily ranking needs are modelled; everything else in
//! the payload is ignored by serde.

use serde::{Deserialize, Serialize};

/// Posts query for one day. `first` is the page size and bounds `top_n`.
pub const POSTS_QUERY: &str = r"
query ($date: DateTime!, $dateEnd: DateTime!) {
  posts(first: 10, order: VOTES, postedAfter: $date, postedBefore: $dateEnd) {
    edges {
      node {
        name
        tagline
        votesCount
        url
      }
    }
  }
}
";

// ---------------------------------------------------------------------------
// OAuth token
// ---------------------------------------------------------------------------

/// Successful body of `POST /v2/oauth/token`.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
}

// ---------------------------------------------------------------------------
// GraphQL
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct GraphqlRequest<'a, V: Serialize> {
    pub query: &'a str,
    pub variables: V,
}

/// Variables for [`POSTS_QUERY`]: ISO-8601 UTC instants with a trailing `Z`.
#[derive(Debug, Serialize)]
pub struct PostsVariables<'a> {
    pub date: &'a str,
    #[serde(rename = "dateEnd")]
    pub date_end: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct PostsResponse {
    pub data: PostsData,
}

#[derive(Debug, Deserialize)]
pub struct PostsData {
    pub posts: PostConnection,
}

#[derive(Debug, Deserialize)]
pub struct PostConnection {
    pub edges: Vec<PostEdge>,
}

#[derive(Debug, Deserialize)]
pub struct PostEdge {
    pub node: RankingEntry,
}

/// A ranked post as returned upstream.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RankingEntry {
    pub name: String,
    /// Absent or `null` upstream becomes `None`.
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(rename = "votesCount")]
    pub votes_count: u32,
    pub url: String,
}
