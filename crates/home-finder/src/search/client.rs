use std::io::Cursor;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;

use crate::listings::{read_records, FetchRequest, FetchResponse, FetchSummary, PropertyRecord};
use crate::location::Location;

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("could not reach the property data service: {0}")]
    Unreachable(String),
    #[error("property data service reported an error: {0}")]
    Service(String),
    #[error("results file '{0}' was not found")]
    MissingFile(String),
    #[error("results file could not be parsed: {0}")]
    Parse(#[from] csv::Error),
}

/// Collaborator that runs a search and hands back the stored results.
pub trait PropertySearch {
    fn search(&self, location: &Location, limit: u32) -> Result<FetchSummary, SearchError>;

    fn load(&self, summary: &FetchSummary) -> Result<Vec<PropertyRecord>, SearchError>;
}

/// Blocking HTTP client for the fetch service.
#[derive(Debug, Clone)]
pub struct HttpPropertySearch {
    client: Client,
    base_url: String,
}

impl HttpPropertySearch {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }
}

impl PropertySearch for HttpPropertySearch {
    fn search(&self, location: &Location, limit: u32) -> Result<FetchSummary, SearchError> {
        let request = FetchRequest {
            city: Some(location.city.clone()),
            state: Some(location.state.clone()),
            limit: Some(limit),
        };

        let response = self
            .client
            .post(format!("{}/fetch-city-data", self.base_url))
            .json(&request)
            .send()
            .map_err(|err| SearchError::Unreachable(err.to_string()))?;

        let status = response.status();
        let body = response
            .json::<FetchResponse>()
            .map_err(|err| SearchError::Service(format!("HTTP {status}: {err}")))?;

        body.into_result().map_err(SearchError::Service)
    }

    fn load(&self, summary: &FetchSummary) -> Result<Vec<PropertyRecord>, SearchError> {
        let response = self
            .client
            .get(format!("{}/download/{}", self.base_url, summary.filename))
            .send()
            .map_err(|err| SearchError::Unreachable(err.to_string()))?;

        match response.status() {
            StatusCode::NOT_FOUND => return Err(SearchError::MissingFile(summary.filename.clone())),
            status if !status.is_success() => {
                return Err(SearchError::Service(format!(
                    "download of {} failed with HTTP {status}",
                    summary.filename
                )))
            }
            _ => {}
        }

        let bytes = response
            .bytes()
            .map_err(|err| SearchError::Unreachable(err.to_string()))?;
        Ok(read_records(Cursor::new(bytes))?)
    }
}
