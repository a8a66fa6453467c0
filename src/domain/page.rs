use chrono::{DateTime, Utc};

/// Outcome of one authentication attempt. Produced once per attempt and
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthResult {
    pub success: bool,
    pub reason: Option<String>,
}

impl AuthResult {
    pub fn ok() -> Self {
        Self {
            success: true,
            reason: None,
        }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            success: false,
            reason: Some(reason.into()),
        }
    }
}

/// One extracted table: rows of plain-text cells in document order.
/// The first row is conventionally rendered as the header.
pub type Table = Vec<Vec<String>>;

/// Snapshot of one scraped page. Immutable once created.
#[derive(Debug, Clone)]
pub struct PageExtract {
    pub url: String,
    pub raw_text: String,
    pub tables: Vec<Table>,
    pub fetched_at: DateTime<Utc>,
    /// Diagnostic count of embedded frames, for operator visibility.
    pub frame_count: usize,
    /// Diagnostic count of script blocks.
    pub script_count: usize,
}

impl PageExtract {
    /// A sparse page is a valid outcome to surface to the operator,
    /// but there is nothing in it worth summarizing.
    pub fn is_empty(&self) -> bool {
        self.raw_text.is_empty() && self.tables.is_empty()
    }
}
