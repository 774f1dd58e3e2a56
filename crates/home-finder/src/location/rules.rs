use super::domain::{Location, ValidationOutcome};

pub const MIN_CITY_LEN: usize = 2;
pub const MAX_CITY_LEN: usize = 50;

pub const STATE_CODES: [&str; 50] = [
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "FL", "GA", "HI", "ID", "IL", "IN", "IA",
    "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH", "NJ",
    "NM", "NY", "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VT",
    "VA", "WA", "WV", "WI", "WY",
];

const STATE_NAMES: [(&str, &str); 50] = [
    ("ALABAMA", "AL"),
    ("ALASKA", "AK"),
    ("ARIZONA", "AZ"),
    ("ARKANSAS", "AR"),
    ("CALIFORNIA", "CA"),
    ("COLORADO", "CO"),
    ("CONNECTICUT", "CT"),
    ("DELAWARE", "DE"),
    ("FLORIDA", "FL"),
    ("GEORGIA", "GA"),
    ("HAWAII", "HI"),
    ("IDAHO", "ID"),
    ("ILLINOIS", "IL"),
    ("INDIANA", "IN"),
    ("IOWA", "IA"),
    ("KANSAS", "KS"),
    ("KENTUCKY", "KY"),
    ("LOUISIANA", "LA"),
    ("MAINE", "ME"),
    ("MARYLAND", "MD"),
    ("MASSACHUSETTS", "MA"),
    ("MICHIGAN", "MI"),
    ("MINNESOTA", "MN"),
    ("MISSISSIPPI", "MS"),
    ("MISSOURI", "MO"),
    ("MONTANA", "MT"),
    ("NEBRASKA", "NE"),
    ("NEVADA", "NV"),
    ("NEW HAMPSHIRE", "NH"),
    ("NEW JERSEY", "NJ"),
    ("NEW MEXICO", "NM"),
    ("NEW YORK", "NY"),
    ("NORTH CAROLINA", "NC"),
    ("NORTH DAKOTA", "ND"),
    ("OHIO", "OH"),
    ("OKLAHOMA", "OK"),
    ("OREGON", "OR"),
    ("PENNSYLVANIA", "PA"),
    ("RHODE ISLAND", "RI"),
    ("SOUTH CAROLINA", "SC"),
    ("SOUTH DAKOTA", "SD"),
    ("TENNESSEE", "TN"),
    ("TEXAS", "TX"),
    ("UTAH", "UT"),
    ("VERMONT", "VT"),
    ("VIRGINIA", "VA"),
    ("WASHINGTON", "WA"),
    ("WEST VIRGINIA", "WV"),
    ("WISCONSIN", "WI"),
    ("WYOMING", "WY"),
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocationRuleError {
    #[error("City name must be at least 2 characters long")]
    CityTooShort,
    #[error("City name contains invalid characters")]
    CityInvalidCharacters,
    #[error("City name must be at most 50 characters long")]
    CityTooLong,
    #[error("'{input}' is not a valid US state abbreviation (expected exactly 2 letters)")]
    StateWrongLength { input: String },
    #[error("'{input}' is not a valid US state abbreviation")]
    UnknownState { input: String },
}

impl LocationRuleError {
    pub fn suggestion(&self) -> Option<String> {
        match self {
            LocationRuleError::CityTooShort => None,
            LocationRuleError::CityInvalidCharacters => Some(
                "Use only letters, spaces, hyphens, periods, and apostrophes".to_string(),
            ),
            LocationRuleError::CityTooLong => None,
            LocationRuleError::StateWrongLength { input } => Some(
                state_for_name(input)
                    .map(|code| format!("Did you mean {code}?"))
                    .unwrap_or_else(|| "Use a two-letter code such as WA or CA".to_string()),
            ),
            LocationRuleError::UnknownState { .. } => {
                Some("Use a two-letter code such as WA or CA".to_string())
            }
        }
    }
}

/// Checks a raw city string and returns its canonical form.
pub fn validate_city(raw: &str) -> Result<String, LocationRuleError> {
    let trimmed = raw.trim();
    if trimmed.chars().count() < MIN_CITY_LEN {
        return Err(LocationRuleError::CityTooShort);
    }

    let allowed = |c: char| c.is_ascii_alphabetic() || c.is_ascii_whitespace() || "-.'".contains(c);
    if !trimmed.chars().all(allowed) {
        return Err(LocationRuleError::CityInvalidCharacters);
    }

    if trimmed.chars().count() > MAX_CITY_LEN {
        return Err(LocationRuleError::CityTooLong);
    }

    Ok(canonical_city(trimmed))
}

/// Checks a raw state code and returns it uppercased.
pub fn validate_state(raw: &str) -> Result<String, LocationRuleError> {
    let code = raw.trim().to_ascii_uppercase();
    if code.chars().count() != 2 {
        return Err(LocationRuleError::StateWrongLength { input: code });
    }

    if !STATE_CODES.contains(&code.as_str()) {
        return Err(LocationRuleError::UnknownState { input: code });
    }

    Ok(code)
}

pub fn validate_location(city: &str, state: &str) -> ValidationOutcome {
    let checked = validate_city(city).and_then(|city| {
        let state = validate_state(state)?;
        Ok(Location { city, state })
    });

    match checked {
        Ok(location) => ValidationOutcome::Valid(location),
        Err(err) => ValidationOutcome::Invalid {
            error: err.to_string(),
            suggestion: err.suggestion(),
        },
    }
}

fn canonical_city(trimmed: &str) -> String {
    trimmed
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn state_for_name(input: &str) -> Option<&'static str> {
    let collapsed = input.split_whitespace().collect::<Vec<_>>().join(" ");
    STATE_NAMES
        .iter()
        .find(|(name, _)| *name == collapsed)
        .map(|(_, code)| *code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seattle_washington_is_valid() {
        let outcome = validate_location("Seattle", "WA");
        let location = outcome.location().expect("valid location");
        assert_eq!(location.formatted(), "Seattle, WA");
        assert!(outcome.error().is_none());
    }

    #[test]
    fn single_letter_city_is_too_short() {
        let outcome = validate_location("S", "WA");
        assert_eq!(
            outcome.error(),
            Some("City name must be at least 2 characters long")
        );
    }

    #[test]
    fn short_city_detection_ignores_surrounding_whitespace() {
        for city in ["", " ", "  a  ", "\tX\n"] {
            assert_eq!(validate_city(city), Err(LocationRuleError::CityTooShort));
        }
    }

    #[test]
    fn city_rejects_digits_and_symbols() {
        assert_eq!(
            validate_city("Seattle 98101"),
            Err(LocationRuleError::CityInvalidCharacters)
        );
        assert_eq!(
            validate_city("Boise!"),
            Err(LocationRuleError::CityInvalidCharacters)
        );
    }

    #[test]
    fn city_rejects_names_over_fifty_characters() {
        let long = "a".repeat(51);
        assert_eq!(validate_city(&long), Err(LocationRuleError::CityTooLong));
        assert!(validate_city(&"a".repeat(50)).is_ok());
    }

    #[test]
    fn city_accepts_punctuated_names_and_canonicalizes_case() {
        assert_eq!(validate_city("  st. louis ").unwrap(), "St. Louis");
        assert_eq!(validate_city("coeur d'alene").unwrap(), "Coeur D'alene");
        assert_eq!(validate_city("winston-salem").unwrap(), "Winston-salem");
        assert_eq!(validate_city("new   york").unwrap(), "New York");
    }

    #[test]
    fn state_is_trimmed_and_uppercased() {
        assert_eq!(validate_state(" wa ").unwrap(), "WA");
    }

    #[test]
    fn every_listed_state_code_is_accepted_in_any_case() {
        for code in STATE_CODES {
            assert_eq!(validate_state(code).unwrap(), code);
            assert_eq!(validate_state(&code.to_ascii_lowercase()).unwrap(), code);
        }
    }

    #[test]
    fn unknown_states_reference_the_input() {
        for input in ["ZZ", "xx", "DC", "PR", "WAA", "W", ""] {
            let outcome = validate_location("Seattle", input);
            let error = outcome.error().expect("state rejected");
            assert!(error.contains("is not a valid US state abbreviation"));
            assert!(error.contains(&format!("'{}'", input.trim().to_ascii_uppercase())));
        }
    }

    #[test]
    fn full_state_names_suggest_the_abbreviation() {
        let outcome = validate_location("Seattle", "Washington");
        assert_eq!(outcome.suggestion(), Some("Did you mean WA?"));

        let outcome = validate_location("Albany", "new  york");
        assert_eq!(outcome.suggestion(), Some("Did you mean NY?"));
    }

    #[test]
    fn city_errors_take_precedence_over_state_errors() {
        let outcome = validate_location("S", "ZZ");
        assert_eq!(
            outcome.error(),
            Some("City name must be at least 2 characters long")
        );
    }
}
