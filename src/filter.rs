use crate::config::ReportConfig;
use crate::results::LinkRecord;
use regex::Regex;
use url::Url;

/// Keeps or drops link rows by their source page.
///
/// Rows are dropped when the source URL matches an exclude pattern, when
/// include patterns exist and none of them match, or when a domain is
/// required and the source is on another host. Exclusions take precedence.
#[derive(Debug, Default)]
pub struct RowFilter {
    required_domain: Option<String>,
    include_regexes: Vec<Regex>,
    exclude_regexes: Vec<Regex>,
}

impl RowFilter {
    /// Compile the patterns of a report configuration
    pub fn new(config: &ReportConfig) -> Result<Self, regex::Error> {
        let mut include_regexes = Vec::with_capacity(config.include_patterns.len());
        for pattern in &config.include_patterns {
            include_regexes.push(Regex::new(pattern)?);
        }

        let mut exclude_regexes = Vec::with_capacity(config.exclude_patterns.len());
        for pattern in &config.exclude_patterns {
            exclude_regexes.push(Regex::new(pattern)?);
        }

        Ok(Self {
            required_domain: config.required_domain.clone(),
            include_regexes,
            exclude_regexes,
        })
    }

    /// True when no rule is configured and every row passes
    pub fn is_empty(&self) -> bool {
        self.required_domain.is_none()
            && self.include_regexes.is_empty()
            && self.exclude_regexes.is_empty()
    }

    /// Decide whether a row belongs in the report
    pub fn keep(&self, record: &LinkRecord) -> bool {
        if !self.is_in_domain_scope(&record.source) {
            return false;
        }

        if self
            .exclude_regexes
            .iter()
            .any(|regex| regex.is_match(&record.source))
        {
            return false;
        }

        self.include_regexes.is_empty()
            || self
                .include_regexes
                .iter()
                .any(|regex| regex.is_match(&record.source))
    }

    /// Filter a loaded table, preserving row order
    pub fn apply(&self, records: Vec<LinkRecord>) -> Vec<LinkRecord> {
        if self.is_empty() {
            return records;
        }

        let before = records.len();
        let kept: Vec<LinkRecord> = records.into_iter().filter(|r| self.keep(r)).collect();
        ::log::info!("Row filter kept {} of {} links", kept.len(), before);
        kept
    }

    fn is_in_domain_scope(&self, source: &str) -> bool {
        let Some(required_domain) = &self.required_domain else {
            return true;
        };

        match Url::parse(source) {
            Ok(url) => url.domain() == Some(required_domain.as_str()),
            Err(e) => {
                ::log::debug!("Dropping row with unparseable source {}: {}", source, e);
                false
            }
        }
    }
}
