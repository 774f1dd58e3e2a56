use serde::{Deserialize, Serialize};
use std::fmt;

/// A validated city/state pair, immutable once accepted for a search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub city: String,
    pub state: String,
}

impl Location {
    /// Canonical "City, ST" display string.
    pub fn formatted(&self) -> String {
        format!("{}, {}", self.city, self.state)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.city, self.state)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Valid(Location),
    Invalid {
        error: String,
        suggestion: Option<String>,
    },
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationOutcome::Valid(_))
    }

    pub fn location(&self) -> Option<&Location> {
        match self {
            ValidationOutcome::Valid(location) => Some(location),
            ValidationOutcome::Invalid { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ValidationOutcome::Valid(_) => None,
            ValidationOutcome::Invalid { error, .. } => Some(error),
        }
    }

    pub fn suggestion(&self) -> Option<&str> {
        match self {
            ValidationOutcome::Valid(_) => None,
            ValidationOutcome::Invalid { suggestion, .. } => suggestion.as_deref(),
        }
    }
}
