use std::future::Future;

use reqwest::header::ACCEPT;
use serde::Serialize;
use serde_json::Value;

use crate::config::UpstreamConfig;

/// Filters forwarded to the listings provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingQuery {
    pub city: String,
    pub state: String,
    pub limit: u32,
}

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("listings API key is not configured (set RENTCAST_API_KEY)")]
    MissingApiKey,
    #[error("listings request failed: {0}")]
    Transport(String),
    #[error("listings API responded with HTTP {status}")]
    Status { status: u16 },
    #[error("listings API returned an unreadable payload: {0}")]
    Decode(String),
}

/// Provider of raw listing payloads.
pub trait ListingsSource: Send + Sync {
    fn fetch_listings(
        &self,
        query: &ListingQuery,
    ) -> impl Future<Output = Result<Value, SourceError>> + Send;
}

/// RentCast `/listings/sale` client.
#[derive(Clone)]
pub struct RentcastSource {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl std::fmt::Debug for RentcastSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RentcastSource")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl RentcastSource {
    pub fn new(config: &UpstreamConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }
}

impl ListingsSource for RentcastSource {
    async fn fetch_listings(&self, query: &ListingQuery) -> Result<Value, SourceError> {
        let api_key = self.api_key.as_deref().ok_or(SourceError::MissingApiKey)?;
        let url = format!("{}/listings/sale", self.base_url);
        let limit = query.limit.to_string();

        let response = self
            .client
            .get(url)
            .header("X-Api-Key", api_key)
            .header(ACCEPT, "application/json")
            .query(&[
                ("city", query.city.as_str()),
                ("state", query.state.as_str()),
                ("limit", limit.as_str()),
                ("status", "Active"),
            ])
            .send()
            .await
            .map_err(|err| SourceError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|err| SourceError::Decode(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn missing_api_key_fails_before_any_request() {
        let source = RentcastSource::new(&UpstreamConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            api_key: None,
            timeout: Duration::from_secs(1),
        })
        .expect("client builds");

        let query = ListingQuery {
            city: "Seattle".to_string(),
            state: "WA".to_string(),
            limit: 10,
        };
        let error = source.fetch_listings(&query).await.expect_err("key required");
        assert!(matches!(error, SourceError::MissingApiKey));
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let source = RentcastSource::new(&UpstreamConfig {
            base_url: "https://api.rentcast.io/v1/".to_string(),
            api_key: Some("top-secret".to_string()),
            timeout: Duration::from_secs(1),
        })
        .expect("client builds");
        let rendered = format!("{source:?}");
        assert!(!rendered.contains("top-secret"));
        assert!(rendered.contains("https://api.rentcast.io/v1\""));
    }
}
