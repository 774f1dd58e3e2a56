use chrono::Utc;
use tracing::{error, info};

use super::normalizer::normalize_payload;
use super::protocol::{FetchResponse, FetchSummary};
use super::source::{ListingQuery, ListingsSource, SourceError};
use super::store::{PropertyStore, StoreError};

pub const DEFAULT_LIMIT: u32 = 100;
pub const MAX_LIMIT: u32 = 500;

/// Result of one fetch. Failures are values, never propagated errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Completed(FetchSummary),
    Failed { error: String },
}

impl FetchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, FetchOutcome::Completed(_))
    }

    pub fn into_response(self) -> FetchResponse {
        match self {
            FetchOutcome::Completed(summary) => FetchResponse::completed(summary),
            FetchOutcome::Failed { error } => FetchResponse::failure(error),
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum FetchError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Fetches listings for a city, normalizes them, and writes the results slot.
#[derive(Debug)]
pub struct PropertyFetcher<S> {
    source: S,
    store: PropertyStore,
}

impl<S: ListingsSource> PropertyFetcher<S> {
    pub fn new(source: S, store: PropertyStore) -> Self {
        Self { source, store }
    }

    pub fn store(&self) -> &PropertyStore {
        &self.store
    }

    pub async fn fetch(&self, city: &str, state: &str, limit: u32) -> FetchOutcome {
        let query = ListingQuery {
            city: city.trim().to_string(),
            state: state.trim().to_ascii_uppercase(),
            limit: limit.clamp(1, MAX_LIMIT),
        };

        match self.fetch_and_store(&query).await {
            Ok(summary) => {
                info!(
                    city = %summary.city,
                    state = %summary.state,
                    total = summary.total_properties,
                    filename = %summary.filename,
                    "stored normalized listings"
                );
                FetchOutcome::Completed(summary)
            }
            Err(err) => {
                error!(city = %query.city, state = %query.state, error = %err, "listing fetch failed");
                FetchOutcome::Failed {
                    error: err.to_string(),
                }
            }
        }
    }

    async fn fetch_and_store(&self, query: &ListingQuery) -> Result<FetchSummary, FetchError> {
        let payload = self.source.fetch_listings(query).await?;
        let fetched_at = Utc::now();
        let records = normalize_payload(&payload, &query.city, &query.state, fetched_at);
        let store = self.store.clone();
        let (city, state) = (query.city.clone(), query.state.clone());
        let stored = tokio::task::spawn_blocking(move || {
            store.save(&records, &city, &state, fetched_at)
        })
        .await
        .map_err(|err| StoreError::Task(err.to_string()))??;

        Ok(FetchSummary {
            total_properties: stored.count,
            filename: stored.filename,
            city: query.city.clone(),
            state: query.state.clone(),
            timestamp: stored.saved_at,
        })
    }
}
