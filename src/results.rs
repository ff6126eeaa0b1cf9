use serde::{Deserialize, Serialize};

/// One crawled hyperlink with the status code its destination answered with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    /// Page the link was found on
    #[serde(rename = "Fuente")]
    pub source: String,

    /// URL the link points to
    #[serde(rename = "Destino")]
    pub destination: String,

    /// Visible link text (empty cells load as None)
    #[serde(rename = "Ancla")]
    pub anchor: Option<String>,

    /// HTTP status code of the destination
    #[serde(rename = "Código de estado")]
    pub status: u16,
}

impl LinkRecord {
    /// Create a new link record
    pub fn new(source: &str, destination: &str, anchor: Option<&str>, status: u16) -> Self {
        Self {
            source: source.to_string(),
            destination: destination.to_string(),
            anchor: anchor.map(|a| a.to_string()),
            status,
        }
    }
}

/// Outcome of one AI analysis request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum AiReportResult {
    /// Model output, verbatim
    Generated(String),

    /// User-facing error message
    Failed(String),
}

impl AiReportResult {
    /// Text to display, whichever way the request went
    pub fn text(&self) -> &str {
        match self {
            AiReportResult::Generated(text) | AiReportResult::Failed(text) => text,
        }
    }

    pub fn is_generated(&self) -> bool {
        matches!(self, AiReportResult::Generated(_))
    }
}
