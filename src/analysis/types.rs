use serde::{Deserialize, Serialize};

use crate::crm::Customer;

/// What the analysis backend returns for an uploaded recording.
///
/// Only `text` and `sentiment` are guaranteed; tone and explanation are
/// filled client-side when the backend omits them.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisResponse {
    #[serde(default)]
    pub text: String,
    #[serde(default = "neutral")]
    pub sentiment: String,
    #[serde(default)]
    pub tone: Option<String>,
    #[serde(default)]
    pub explanation: Option<String>,
}

fn neutral() -> String {
    "Neutral".to_string()
}

/// Payload for the post-call summary endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryRequest {
    pub transcript: String,
    pub sentiment: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<Customer>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SummaryResponse {
    #[serde(default)]
    pub summary: Option<String>,
}
