//! JSON bodies exchanged between the client and the fetch service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchRequest {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

/// Handle to a completed fetch; the records themselves stay in the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSummary {
    pub total_properties: usize,
    pub filename: String,
    pub city: String,
    pub state: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_properties: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FetchResponse {
    pub fn completed(summary: FetchSummary) -> Self {
        Self {
            success: true,
            total_properties: Some(summary.total_properties),
            filename: Some(summary.filename),
            city: Some(summary.city),
            state: Some(summary.state),
            timestamp: Some(summary.timestamp),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            total_properties: None,
            filename: None,
            city: None,
            state: None,
            timestamp: None,
            error: Some(error.into()),
        }
    }

    /// Interprets the body on the client side. A success without a filename
    /// is reported as a failure.
    pub fn into_result(self) -> Result<FetchSummary, String> {
        if !self.success {
            return Err(self
                .error
                .unwrap_or_else(|| "fetch failed without an error message".to_string()));
        }

        let filename = self
            .filename
            .ok_or_else(|| "fetch response did not include a filename".to_string())?;

        Ok(FetchSummary {
            total_properties: self.total_properties.unwrap_or(0),
            filename,
            city: self.city.unwrap_or_default(),
            state: self.state.unwrap_or_default(),
            timestamp: self.timestamp.unwrap_or_else(Utc::now),
        })
    }
}
