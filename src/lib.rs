// Re-export modules
pub mod aggregate;
pub mod analysis;
pub mod config;
pub mod error;
pub mod filter;
pub mod loaders;
pub mod render;
pub mod report;
pub mod results;
pub mod utils;

// Re-export commonly used types for convenience
pub use config::{ReportConfig, Variant};
pub use loaders::InputSource;
pub use results::{AiReportResult, LinkRecord};

use aggregate::Aggregation;
use analysis::{AnalysisSession, AnalysisState, AnthropicClient};
use filter::RowFilter;
use report::StatusReport;
use std::error::Error;
use std::path::Path;

/// Main builder for link status reports
pub struct Audit {
    source: InputSource,
    variant: Variant,
    config: ReportConfig,
}

impl Audit {
    /// Create a new Audit builder for the given input
    pub fn new(source: InputSource) -> Self {
        Self {
            source,
            variant: Variant::default(),
            config: ReportConfig::default(),
        }
    }

    /// Choose how rows are counted and grouped
    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.variant = variant;
        self
    }

    pub fn with_config(mut self, config: ReportConfig) -> Self {
        self.config = config;
        self
    }

    /// Load configuration from a JSON file
    pub fn with_config_file(self, path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let config = ReportConfig::from_file(path)?;
        Ok(self.with_config(config))
    }

    /// Load configuration from a JSON string
    pub fn with_config_str(self, config_str: &str) -> Result<Self, Box<dyn Error>> {
        let config = ReportConfig::from_json(config_str)?;
        Ok(self.with_config(config))
    }

    /// Set the number of rows shown per detail table
    pub fn with_detail_row_cap(mut self, cap: usize) -> Self {
        self.config.detail_row_cap = cap;
        self
    }

    /// Keep only rows whose source URL matches one of these patterns
    pub fn with_include_patterns(mut self, patterns: Vec<String>) -> Self {
        self.config.include_patterns.extend(patterns);
        self
    }

    /// Drop rows whose source URL matches one of these patterns
    pub fn with_exclude_patterns(mut self, patterns: Vec<String>) -> Self {
        self.config.exclude_patterns.extend(patterns);
        self
    }

    /// Keep only rows whose source page is on this host
    pub fn with_required_domain(mut self, domain: Option<String>) -> Self {
        if domain.is_some() {
            self.config.required_domain = domain;
        }
        self
    }

    pub fn with_model(mut self, model: Option<String>) -> Self {
        if let Some(model) = model {
            self.config.model = model;
        }
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        if let Some(max_tokens) = max_tokens {
            self.config.max_tokens = max_tokens;
        }
        self
    }

    /// Read and filter the link table. Any load error aborts the report.
    pub fn load(self) -> Result<AuditRun, Box<dyn Error>> {
        let filter = RowFilter::new(&self.config)?;
        let records = filter.apply(loaders::load(&self.source)?);

        Ok(AuditRun {
            records,
            variant: self.variant,
            config: self.config,
            demo: self.source.is_demo(),
        })
    }
}

/// A loaded link table ready to be reported on
#[derive(Debug)]
pub struct AuditRun {
    records: Vec<LinkRecord>,
    variant: Variant,
    config: ReportConfig,
    demo: bool,
}

impl AuditRun {
    pub fn records(&self) -> &[LinkRecord] {
        &self.records
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// True when the built-in demo table stands in for a real export
    pub fn is_demo(&self) -> bool {
        self.demo
    }

    pub fn aggregation(&self) -> Aggregation<'_> {
        Aggregation::new(&self.records, self.variant.denominator())
    }

    pub fn report(&self) -> StatusReport {
        StatusReport::build(&self.aggregation(), self.variant, &self.config)
    }

    pub fn prompt(&self) -> String {
        analysis::prompt::build(&self.aggregation(), self.variant, &self.config)
    }

    /// A fresh analysis session reading the key named in the configuration
    pub fn session(&self) -> AnalysisSession {
        AnalysisSession::from_env(&self.config.api_key_env)
    }

    /// Request the AI analysis through the Anthropic API
    pub async fn analyze(&self, session: &mut AnalysisSession) -> AnalysisState {
        let prompt = self.prompt();
        ::log::debug!("Analysis prompt is {} chars", prompt.len());
        session
            .request(|key| AnthropicClient::new(&self.config, key), &prompt)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis::ApiCredential;

    #[test]
    fn test_demo_run() {
        let run = Audit::new(InputSource::Demo).load().unwrap();
        assert!(run.is_demo());
        assert_eq!(run.records().len(), 30);

        let report = run.report();
        assert_eq!(report.metrics.total, 30);
        assert_eq!(report.metrics.not_found, 20);
    }

    #[test]
    fn test_filtered_run() {
        let run = Audit::new(InputSource::Demo)
            .with_exclude_patterns(vec!["pagina3$".to_string()])
            .load()
            .unwrap();
        assert_eq!(run.records().len(), 20);
        assert_eq!(run.report().metrics.redirects, 0);
    }

    #[test]
    fn test_config_str_and_overrides() {
        let run = Audit::new(InputSource::Demo)
            .with_config_str(r#"{"detail_row_cap": 4}"#)
            .unwrap()
            .with_variant(Variant::Destinations)
            .with_model(Some("modelo-x".to_string()))
            .with_max_tokens(None)
            .load()
            .unwrap();

        assert_eq!(run.config().detail_row_cap, 4);
        assert_eq!(run.config().model, "modelo-x");
        assert_eq!(run.config().max_tokens, 2000);
        assert_eq!(run.report().not_found.items.len(), 4);
        assert!(run.prompt().contains("URLs de destino únicas con problemas: 3"));
    }

    #[test]
    fn test_bad_input_fails_whole_run() {
        let result = Audit::new(InputSource::Bytes(b"Fuente;Destino\nx;y\n".to_vec())).load();
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_pattern_fails_run() {
        let result = Audit::new(InputSource::Demo)
            .with_include_patterns(vec!["[".to_string()])
            .load();
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_analyze_without_key_is_disabled() {
        let run = Audit::new(InputSource::Demo).load().unwrap();
        let mut session = AnalysisSession::new(None, "ANTHROPIC_API_KEY");
        let state = run.analyze(&mut session).await;
        assert!(matches!(state, AnalysisState::Disabled { .. }));
    }

    #[tokio::test]
    async fn test_analyze_against_unreachable_endpoint() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let run = Audit::new(InputSource::Demo)
            .with_config_str(&format!(r#"{{"endpoint": "http://{}/v1/messages"}}"#, addr))
            .unwrap()
            .load()
            .unwrap();
        let mut session = AnalysisSession::new(ApiCredential::new("sk-test"), "ANTHROPIC_API_KEY");
        let state = run.analyze(&mut session).await;

        match state {
            AnalysisState::Completed(result) => {
                assert!(!result.is_generated());
                assert!(result.text().contains("Error al generar análisis"));
            }
            other => panic!("expected failed analysis, got {:?}", other),
        }
    }
}
