use serde::{Deserialize, Serialize};

/// A claim the model flagged as ready to move forward.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadyClaim {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub next_step: Option<String>,
}

/// The JSON-shaped claims breakdown the hosted model is asked to produce.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClaimsSummary {
    #[serde(default)]
    pub total_claims: u64,
    #[serde(default)]
    pub ready_claims: Vec<ReadyClaim>,
    #[serde(default)]
    pub attention_items: Vec<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Result of one summarization run, derived from exactly one page extract.
///
/// When the model reply does not parse as JSON the verbatim text is kept
/// in the `Raw` variant rather than failing the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum SummaryResult {
    Structured(ClaimsSummary),
    Raw(String),
}
