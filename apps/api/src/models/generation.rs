use serde::{Deserialize, Serialize};

/// One side of a comparison: the submission text plus which criteria it
/// demonstrates (world-class) or misses (not-approved).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Example {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub criteria_covered: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub criteria_missing: Option<Vec<String>>,
}

impl Example {
    pub fn world_class(text: impl Into<String>, covered: Vec<String>) -> Self {
        Self {
            text: text.into(),
            criteria_covered: Some(covered),
            criteria_missing: None,
        }
    }

    pub fn not_approved(text: impl Into<String>, missing: Vec<String>) -> Self {
        Self {
            text: text.into(),
            criteria_covered: None,
            criteria_missing: Some(missing),
        }
    }
}

/// The response shape consumed by the UI. Must stay stable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    pub world_class: Example,
    pub not_approved: Example,
    pub criteria_all: Vec<String>,
    /// True when the Fallback Generator produced this result.
    pub is_mock_data: bool,
    /// Short diagnostic, present only on mock results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_error: Option<String>,
}
