use serde::{Deserialize, Serialize};

use super::domain::{Location, ValidationOutcome};

/// Line sent by a client to ask the validation service to stop.
pub const SHUTDOWN_SENTINEL: &str = "Q";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationRequest {
    pub city: String,
    pub state: String,
}

impl ValidationRequest {
    pub fn new(city: &str, state: &str) -> Self {
        Self {
            city: city.to_string(),
            state: state.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResponse {
    pub valid: bool,
    pub city: String,
    pub state: String,
    #[serde(default)]
    pub formatted_location: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl ValidationResponse {
    pub fn from_outcome(request: &ValidationRequest, outcome: &ValidationOutcome) -> Self {
        match outcome {
            ValidationOutcome::Valid(location) => Self {
                valid: true,
                city: location.city.clone(),
                state: location.state.clone(),
                formatted_location: Some(location.formatted()),
                error: None,
                suggestion: None,
            },
            ValidationOutcome::Invalid { error, suggestion } => Self {
                valid: false,
                city: request.city.trim().to_string(),
                state: request.state.trim().to_string(),
                formatted_location: None,
                error: Some(error.clone()),
                suggestion: suggestion.clone(),
            },
        }
    }

    pub fn malformed(detail: impl std::fmt::Display) -> Self {
        Self {
            valid: false,
            city: String::new(),
            state: String::new(),
            formatted_location: None,
            error: Some(format!("malformed request: {detail}")),
            suggestion: None,
        }
    }

    pub fn into_outcome(self) -> ValidationOutcome {
        if self.valid {
            ValidationOutcome::Valid(Location {
                city: self.city,
                state: self.state,
            })
        } else {
            ValidationOutcome::Invalid {
                error: self
                    .error
                    .unwrap_or_else(|| "location rejected by validation service".to_string()),
                suggestion: self.suggestion,
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShutdownAck {
    pub acknowledged: bool,
}

/// One inbound line on the validation channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelMessage {
    Validate(ValidationRequest),
    Shutdown,
}

impl ChannelMessage {
    pub fn parse(line: &str) -> Result<Self, serde_json::Error> {
        let line = line.trim();
        if line == SHUTDOWN_SENTINEL {
            return Ok(ChannelMessage::Shutdown);
        }
        serde_json::from_str(line).map(ChannelMessage::Validate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_shutdown_sentinel_and_requests() {
        assert_eq!(ChannelMessage::parse("Q\n").unwrap(), ChannelMessage::Shutdown);
        assert_eq!(
            ChannelMessage::parse(r#"{"city":"Seattle","state":"WA"}"#).unwrap(),
            ChannelMessage::Validate(ValidationRequest::new("Seattle", "WA"))
        );
        assert!(ChannelMessage::parse("hello").is_err());
    }

    #[test]
    fn valid_response_carries_formatted_location_and_null_error() {
        let request = ValidationRequest::new("seattle", "wa");
        let outcome = ValidationOutcome::Valid(Location {
            city: "Seattle".to_string(),
            state: "WA".to_string(),
        });
        let response = ValidationResponse::from_outcome(&request, &outcome);
        let payload = serde_json::to_value(&response).unwrap();
        assert_eq!(
            payload,
            json!({
                "valid": true,
                "city": "Seattle",
                "state": "WA",
                "formatted_location": "Seattle, WA",
                "error": null,
            })
        );
    }

    #[test]
    fn invalid_response_converts_back_to_outcome() {
        let payload = json!({
            "valid": false,
            "city": "Seattle",
            "state": "Washington",
            "formatted_location": null,
            "error": "'WASHINGTON' is not a valid US state abbreviation",
            "suggestion": "Did you mean WA?",
        });
        let response: ValidationResponse = serde_json::from_value(payload).unwrap();
        let outcome = response.into_outcome();
        assert!(!outcome.is_valid());
        assert_eq!(outcome.suggestion(), Some("Did you mean WA?"));
    }
}
