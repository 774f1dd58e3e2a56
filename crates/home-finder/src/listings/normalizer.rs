use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use super::record::{PropertyRecord, ADDRESS_NOT_AVAILABLE};

/// Ways a provider payload may carry its listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionStrategy {
    /// The payload is the list itself.
    DirectList,
    /// An object wrapping the list under the given key.
    WrappedList(&'static str),
    /// A single listing object, recognized by its `price` key.
    SingleRecord,
}

const EXTRACTION_ORDER: [ExtractionStrategy; 7] = [
    ExtractionStrategy::DirectList,
    ExtractionStrategy::WrappedList("listings"),
    ExtractionStrategy::WrappedList("properties"),
    ExtractionStrategy::WrappedList("data"),
    ExtractionStrategy::WrappedList("results"),
    ExtractionStrategy::WrappedList("items"),
    ExtractionStrategy::SingleRecord,
];

impl ExtractionStrategy {
    fn extract<'a>(&self, payload: &'a Value) -> Option<Vec<&'a Value>> {
        match self {
            ExtractionStrategy::DirectList => payload.as_array().map(|items| items.iter().collect()),
            ExtractionStrategy::WrappedList(key) => payload
                .get(*key)
                .and_then(Value::as_array)
                .map(|items| items.iter().collect()),
            ExtractionStrategy::SingleRecord => payload
                .as_object()
                .filter(|object| object.contains_key("price"))
                .map(|_| vec![payload]),
        }
    }
}

/// Applies the extraction strategies in order and returns the first match.
pub fn extract_listings(payload: &Value) -> Option<(ExtractionStrategy, Vec<&Value>)> {
    EXTRACTION_ORDER.iter().find_map(|strategy| {
        strategy
            .extract(payload)
            .map(|listings| (*strategy, listings))
    })
}

/// Turns a provider payload into retained property records. Land parcels,
/// listings without a positive price, and listings whose address resolves to
/// an empty string are dropped.
pub fn normalize_payload(
    payload: &Value,
    city: &str,
    state: &str,
    observed_at: DateTime<Utc>,
) -> Vec<PropertyRecord> {
    let Some((strategy, listings)) = extract_listings(payload) else {
        tracing::warn!("listings payload matched no known shape");
        return Vec::new();
    };
    tracing::debug!(?strategy, raw = listings.len(), "extracted listings");

    listings
        .into_iter()
        .filter_map(Value::as_object)
        .filter_map(|listing| normalize_listing(listing, city, state, observed_at))
        .collect()
}

fn normalize_listing(
    listing: &Map<String, Value>,
    city: &str,
    state: &str,
    observed_at: DateTime<Utc>,
) -> Option<PropertyRecord> {
    let property_type = text(listing, "propertyType");
    if property_type.trim().eq_ignore_ascii_case("land") {
        return None;
    }

    let price = number(listing, &["price"])
        .map(f64::round)
        .filter(|price| *price >= 1.0)?;
    let address = resolve_address(listing);
    if address.trim().is_empty() {
        return None;
    }

    Some(PropertyRecord {
        address,
        price: price as u64,
        bedrooms: number(listing, &["bedrooms", "beds"]).unwrap_or(0.0),
        bathrooms: number(listing, &["bathrooms", "baths"]).unwrap_or(0.0),
        square_footage: number(listing, &["squareFootage", "sqft"])
            .map(|sqft| sqft.max(0.0).round() as u32)
            .unwrap_or(0),
        year_built: number(listing, &["yearBuilt"])
            .filter(|year| *year >= 1.0 && *year <= f64::from(u16::MAX))
            .map(|year| year as u16),
        neighborhood: text(listing, "neighborhood"),
        property_type,
        listing_id: text(listing, "id"),
        city: text_or(listing, "city", city),
        state: text_or(listing, "state", state),
        zip_code: text(listing, "zipCode"),
        last_updated: observed_at,
    })
}

/// Resolves a display address: `formattedAddress`, then `address`, then
/// `addressLine1`, then the street parts, then the sentinel.
pub fn resolve_address(listing: &Map<String, Value>) -> String {
    for key in ["formattedAddress", "address", "addressLine1"] {
        if let Some(value) = present(listing, key) {
            return scalar_text(value);
        }
    }

    let parts: Vec<String> = ["streetNumber", "streetName", "streetType"]
        .into_iter()
        .filter_map(|key| present(listing, key))
        .map(scalar_text)
        .collect();

    if parts.is_empty() {
        ADDRESS_NOT_AVAILABLE.to_string()
    } else {
        parts.join(" ")
    }
}

fn present<'a>(listing: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    listing.get(key).filter(|value| !value.is_null())
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.trim().to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn text(listing: &Map<String, Value>, key: &str) -> String {
    present(listing, key).map(scalar_text).unwrap_or_default()
}

fn text_or(listing: &Map<String, Value>, key: &str, fallback: &str) -> String {
    let value = text(listing, key);
    if value.is_empty() {
        fallback.to_string()
    } else {
        value
    }
}

fn number(listing: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    keys.iter()
        .find_map(|key| present(listing, key))
        .and_then(|value| match value {
            Value::Number(number) => number.as_f64(),
            Value::String(text) => text.trim().replace(',', "").parse().ok(),
            _ => None,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn observed_at() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-10-19T12:00:00Z")
            .expect("valid timestamp")
            .with_timezone(&Utc)
    }

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().expect("object literal")
    }

    #[test]
    fn drops_land_and_keeps_single_family() {
        let payload = json!([
            { "formattedAddress": "1 Empty Lot Rd", "price": 90000, "propertyType": "Land" },
            { "formattedAddress": "12 Pine St, Seattle, WA 98101", "price": 400000, "propertyType": "Single Family" }
        ]);
        let records = normalize_payload(&payload, "Seattle", "WA", observed_at());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].address, "12 Pine St, Seattle, WA 98101");
        assert_eq!(records[0].price, 400000);
        assert_eq!(records[0].property_type, "Single Family");
    }

    #[test]
    fn unwraps_each_known_wrapper_key() {
        for key in ["listings", "properties", "data", "results", "items"] {
            let payload = json!({ key: [{ "address": "5 Elm St", "price": 250000 }] });
            let (strategy, listings) = extract_listings(&payload).expect("wrapper recognized");
            assert_eq!(strategy, ExtractionStrategy::WrappedList(key));
            assert_eq!(listings.len(), 1);
        }
    }

    #[test]
    fn wrapper_keys_are_checked_in_order() {
        let payload = json!({
            "items": [{ "address": "late", "price": 1 }],
            "listings": [{ "address": "early", "price": 1 }]
        });
        let (strategy, listings) = extract_listings(&payload).expect("wrapper recognized");
        assert_eq!(strategy, ExtractionStrategy::WrappedList("listings"));
        assert_eq!(listings[0]["address"], "early");
    }

    #[test]
    fn single_record_payload_is_treated_as_one_listing() {
        let payload = json!({ "addressLine1": "9 Oak Ave", "price": 310000, "beds": 3, "baths": 2.5, "sqft": 1640 });
        let records = normalize_payload(&payload, "Tacoma", "WA", observed_at());
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.address, "9 Oak Ave");
        assert_eq!(record.bedrooms, 3.0);
        assert_eq!(record.bathrooms, 2.5);
        assert_eq!(record.square_footage, 1640);
        assert_eq!(record.city, "Tacoma");
        assert_eq!(record.state, "WA");
        assert_eq!(record.last_updated, observed_at());
    }

    #[test]
    fn unrecognized_payloads_yield_nothing() {
        assert!(extract_listings(&json!({ "message": "rate limited" })).is_none());
        assert!(normalize_payload(&json!("oops"), "Seattle", "WA", observed_at()).is_empty());
    }

    #[test]
    fn drops_listings_without_positive_price() {
        let payload = json!([
            { "address": "1 A St" },
            { "address": "2 B St", "price": 0 },
            { "address": "3 C St", "price": -10 },
            { "address": "4 D St", "price": "425,000" }
        ]);
        let records = normalize_payload(&payload, "Seattle", "WA", observed_at());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].price, 425000);
    }

    #[test]
    fn fractional_prices_that_round_to_zero_are_dropped() {
        let payload = json!([
            { "address": "1 A St", "price": 0.4 },
            { "address": "2 B St", "price": "0.49" },
            { "address": "3 C St", "price": 1.6 }
        ]);
        let records = normalize_payload(&payload, "Seattle", "WA", observed_at());
        let prices: Vec<u64> = records.iter().map(|record| record.price).collect();
        assert_eq!(prices, vec![2]);
        assert!(records.iter().all(|record| record.price > 0));
    }

    #[test]
    fn drops_listings_with_blank_resolved_address() {
        let payload = json!([{ "formattedAddress": "   ", "address": "ignored", "price": 100000 }]);
        assert!(normalize_payload(&payload, "Seattle", "WA", observed_at()).is_empty());
    }

    #[test]
    fn address_precedence_follows_field_order() {
        let listing = object(json!({
            "address": "generic",
            "addressLine1": "line one",
            "formattedAddress": "formatted"
        }));
        assert_eq!(resolve_address(&listing), "formatted");

        let listing = object(json!({ "addressLine1": "line one", "address": "generic" }));
        assert_eq!(resolve_address(&listing), "generic");

        let listing = object(json!({ "streetNumber": 742, "streetName": "Evergreen", "streetType": "Terrace" }));
        assert_eq!(resolve_address(&listing), "742 Evergreen Terrace");

        let listing = object(json!({ "streetName": "Main" }));
        assert_eq!(resolve_address(&listing), "Main");

        let listing = object(json!({ "price": 1 }));
        assert_eq!(resolve_address(&listing), ADDRESS_NOT_AVAILABLE);
    }

    #[test]
    fn sentinel_address_is_retained() {
        let payload = json!([{ "price": 199000, "id": "abc", "zipCode": "98101", "yearBuilt": 1978 }]);
        let records = normalize_payload(&payload, "Seattle", "WA", observed_at());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].address, ADDRESS_NOT_AVAILABLE);
        assert_eq!(records[0].listing_id, "abc");
        assert_eq!(records[0].zip_code, "98101");
        assert_eq!(records[0].year_built, Some(1978));
    }
}
