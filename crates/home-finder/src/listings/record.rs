use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Address emitted when no address field can be resolved from a listing.
pub const ADDRESS_NOT_AVAILABLE: &str = "Address not available";

/// Column order of the results file. Matches the field order of `PropertyRecord`.
pub const CSV_COLUMNS: [&str; 13] = [
    "address",
    "price",
    "bedrooms",
    "bathrooms",
    "square_footage",
    "year_built",
    "neighborhood",
    "property_type",
    "listing_id",
    "city",
    "state",
    "zip_code",
    "last_updated",
];

/// Normalized listing as persisted to the results file and loaded by the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyRecord {
    pub address: String,
    pub price: u64,
    pub bedrooms: f64,
    pub bathrooms: f64,
    pub square_footage: u32,
    pub year_built: Option<u16>,
    pub neighborhood: String,
    pub property_type: String,
    pub listing_id: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub last_updated: DateTime<Utc>,
}
