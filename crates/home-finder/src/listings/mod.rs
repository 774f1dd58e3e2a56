//! Listing pipeline of the fetch service: pull raw listings from the
//! provider, normalize them into `PropertyRecord`s, persist them to the
//! shared flat-file directory, and expose the whole thing over HTTP.

mod normalizer;
pub mod protocol;
mod record;
mod router;
mod service;
mod source;
mod store;

pub use normalizer::{extract_listings, normalize_payload, resolve_address, ExtractionStrategy};
pub use protocol::{FetchRequest, FetchResponse, FetchSummary};
pub use record::{PropertyRecord, ADDRESS_NOT_AVAILABLE, CSV_COLUMNS};
pub use router::fetch_router;
pub use service::{FetchOutcome, PropertyFetcher, DEFAULT_LIMIT, MAX_LIMIT};
pub use source::{ListingQuery, ListingsSource, RentcastSource, SourceError};
pub use store::{
    read_records, write_records, PropertyStore, StoreError, StoredSearch, METADATA_FILENAME,
    RESULTS_FILENAME,
};
