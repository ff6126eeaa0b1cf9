use crate::aggregate::Denominator;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Report flavours. Each one fixes how rows are counted and which codes
/// fall in the redirect and critical groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Every link occurrence counts once
    #[default]
    Links,
    /// Each destination URL counts once
    Destinations,
}

impl Variant {
    pub fn denominator(&self) -> Denominator {
        match self {
            Variant::Links => Denominator::Links,
            Variant::Destinations => Denominator::DistinctDestinations,
        }
    }

    /// Status codes reported as redirects
    pub fn redirect_codes(&self) -> &'static [u16] {
        match self {
            Variant::Links => &[301, 302],
            Variant::Destinations => &[301, 302, 308],
        }
    }

    /// Client and server errors reported apart from 404
    pub fn critical_codes(&self) -> &'static [u16] {
        match self {
            Variant::Links => &[400, 403],
            Variant::Destinations => &[400, 403, 500],
        }
    }

    /// Codes that get their own card in the distribution section
    pub fn card_codes(&self) -> &'static [u16] {
        match self {
            Variant::Links => &[301, 403, 404, 302, 400],
            Variant::Destinations => &[301, 403, 404, 302, 308, 400],
        }
    }

    /// Whether the prompt includes top destinations and 404 anchors
    pub fn extended_prompt(&self) -> bool {
        matches!(self, Variant::Destinations)
    }
}

/// Settings for building a report and requesting the AI analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Messages API endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Model identifier sent with every request
    #[serde(default = "default_model")]
    pub model: String,

    /// Output token budget for the generated report
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Value of the `anthropic-version` header
    #[serde(default = "default_anthropic_version")]
    pub anthropic_version: String,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Rows shown per detail table before the rest are summarized
    #[serde(default = "default_detail_row_cap")]
    pub detail_row_cap: usize,

    /// Distinct 404 anchors listed before the rest are summarized
    #[serde(default = "default_anchor_cap")]
    pub anchor_cap: usize,

    /// Entries in the top sources / destinations lists
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Only keep rows whose source page is on this host
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_domain: Option<String>,

    /// Regex patterns a source URL must match (any of them) to be kept
    #[serde(default)]
    pub include_patterns: Vec<String>,

    /// Regex patterns that drop a row when its source URL matches
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            anthropic_version: default_anthropic_version(),
            api_key_env: default_api_key_env(),
            detail_row_cap: default_detail_row_cap(),
            anchor_cap: default_anchor_cap(),
            top_n: default_top_n(),
            required_domain: None,
            include_patterns: Vec::new(),
            exclude_patterns: Vec::new(),
        }
    }
}

impl ReportConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config)
    }
}

fn default_endpoint() -> String {
    "https://api.anthropic.com/v1/messages".to_string()
}

fn default_model() -> String {
    "claude-sonnet-4-20250514".to_string()
}

fn default_max_tokens() -> u32 {
    2000
}

fn default_anthropic_version() -> String {
    "2023-06-01".to_string()
}

fn default_api_key_env() -> String {
    "ANTHROPIC_API_KEY".to_string()
}

fn default_detail_row_cap() -> usize {
    10
}

fn default_anchor_cap() -> usize {
    15
}

fn default_top_n() -> usize {
    5
}
