//! HTTP client for the Product Hunt v2 API.
//!
//! Covers the two calls the daily ranking needs: the OAuth
//! `client_credentials` exchange and the GraphQL `posts` query. Each call is
//! a single attempt; there is no retry and no token refresh.

use std::time::Duration;

use chrono::NaiveDate;
use phdigest_core::{Credentials, DayWindow};
use reqwest::{Client, StatusCode, Url};

use crate::error::ClientError;
use crate::types::{
    GraphqlRequest, PostsResponse, PostsVariables, RankingEntry, TokenResponse, POSTS_QUERY,
};

const TOKEN_PATH: &str = "v2/oauth/token";
const GRAPHQL_PATH: &str = "v2/api/graphql";

/// Bearer token valid for the current run only.
#[derive(Clone)]
pub struct AccessToken(String);

impl AccessToken {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken([redacted])")
    }
}

/// Client for the Product Hunt API, rooted at a configurable base URL so
/// tests can point it at a mock server.
pub struct ProductHuntClient {
    client: Client,
    token_url: Url,
    graphql_url: Url,
}

impl ProductHuntClient {
    /// Creates a client whose endpoints live under `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ClientError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so `join` appends instead of replacing
        // the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let invalid = |reason: String| ClientError::InvalidBaseUrl {
            base_url: base_url.to_string(),
            reason,
        };
        let base = Url::parse(&normalised).map_err(|e| invalid(e.to_string()))?;
        let token_url = base.join(TOKEN_PATH).map_err(|e| invalid(e.to_string()))?;
        let graphql_url = base.join(GRAPHQL_PATH).map_err(|e| invalid(e.to_string()))?;

        Ok(Self {
            client,
            token_url,
            graphql_url,
        })
    }

    /// Exchanges client credentials for a bearer token.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Authentication`] on any status other than 200,
    ///   carrying the raw response body.
    /// - [`ClientError::Http`] on network failure.
    /// - [`ClientError::Deserialize`] if the body lacks `access_token`.
    pub async fn fetch_access_token(
        &self,
        credentials: &Credentials,
    ) -> Result<AccessToken, ClientError> {
        let response = self
            .client
            .post(self.token_url.clone())
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", credentials.client_id.as_str()),
                ("client_secret", credentials.client_secret.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if status != StatusCode::OK {
            return Err(ClientError::Authentication {
                status: status.as_u16(),
                body,
            });
        }

        let token: TokenResponse =
            serde_json::from_str(&body).map_err(|e| ClientError::Deserialize {
                context: "oauth token".to_string(),
                source: e,
            })?;
        tracing::debug!("obtained access token");

        Ok(AccessToken::new(token.access_token))
    }

    /// Fetches the vote-ordered posts for one UTC day, in upstream order.
    ///
    /// # Errors
    ///
    /// - [`ClientError::UnexpectedStatus`] on any status other than 200.
    /// - [`ClientError::Api`] if the body carries GraphQL `errors` and no data.
    /// - [`ClientError::Http`] on network failure.
    /// - [`ClientError::Deserialize`] if the body does not match the
    ///   expected shape.
    pub async fn fetch_day_posts(
        &self,
        token: &AccessToken,
        day: NaiveDate,
    ) -> Result<Vec<RankingEntry>, ClientError> {
        let window = DayWindow::for_date(day);
        let request = GraphqlRequest {
            query: POSTS_QUERY,
            variables: PostsVariables {
                date: &window.start,
                date_end: &window.end,
            },
        };

        let response = self
            .client
            .post(self.graphql_url.clone())
            .bearer_auth(token.as_str())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ClientError::UnexpectedStatus {
                status: status.as_u16(),
                context: format!("posts(day={day})"),
            });
        }

        let text = response.text().await?;
        let body: serde_json::Value =
            serde_json::from_str(&text).map_err(|e| ClientError::Deserialize {
                context: format!("posts(day={day})"),
                source: e,
            })?;
        Self::check_api_error(&body)?;

        let parsed: PostsResponse =
            serde_json::from_value(body).map_err(|e| ClientError::Deserialize {
                context: format!("posts(day={day})"),
                source: e,
            })?;

        Ok(parsed
            .data
            .posts
            .edges
            .into_iter()
            .map(|edge| edge.node)
            .collect())
    }

    /// Surfaces a GraphQL `errors` array when no `data` came back with it.
    fn check_api_error(body: &serde_json::Value) -> Result<(), ClientError> {
        let has_data = body.get("data").is_some_and(|d| !d.is_null());
        let Some(errors) = body.get("errors").and_then(serde_json::Value::as_array) else {
            return Ok(());
        };
        if has_data || errors.is_empty() {
            return Ok(());
        }

        let msg = errors
            .first()
            .and_then(|e| e.get("message"))
            .and_then(serde_json::Value::as_str)
            .unwrap_or("unknown error")
            .to_string();
        Err(ClientError::Api(msg))
    }
}
