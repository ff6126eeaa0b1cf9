pub mod anthropic;
pub mod backend;
pub mod prompt;

pub use anthropic::AnthropicClient;
pub use backend::{ApiCredential, CompletionBackend};

use crate::error::AnalysisError;
use crate::results::AiReportResult;
use std::io;
use std::path::Path;

/// Default name of the downloaded analysis file
pub const ANALYSIS_FILE_NAME: &str = "analisis_seo_ia.txt";

/// Guidance shown while no API key is configured
pub fn disabled_guidance(api_key_env: &str) -> String {
    format!(
        "💡 El análisis con IA estará disponible cuando configures tu API key de Anthropic.\n\
         Agrega tu API key en la variable de entorno {api_key_env}:\n\
         \n    export {api_key_env}=\"tu_key_aquí\""
    )
}

/// What the analysis section should show
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisState {
    /// No credential; the feature is off
    Disabled { guidance: String },
    /// Credential present, nothing requested yet (or cleared)
    Idle,
    /// Last request finished, successfully or not
    Completed(AiReportResult),
}

/// Holds the latest analysis result of one session
#[derive(Debug, Default)]
pub struct AnalysisSlot {
    result: Option<AiReportResult>,
}

impl AnalysisSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace whatever was stored before
    pub fn store(&mut self, result: AiReportResult) -> &AiReportResult {
        self.result.insert(result)
    }

    pub fn get(&self) -> Option<&AiReportResult> {
        self.result.as_ref()
    }

    pub fn clear(&mut self) {
        self.result = None;
    }
}

/// Write a generated analysis to `path`, verbatim.
///
/// Returns `Ok(false)` without touching the filesystem when there is no
/// generated text (disabled, idle or failed).
pub fn save(state: &AnalysisState, path: &Path) -> io::Result<bool> {
    let AnalysisState::Completed(AiReportResult::Generated(text)) = state else {
        return Ok(false);
    };
    std::fs::write(path, text)?;
    Ok(true)
}

/// Send a prompt and turn any failure into display text
pub async fn generate<B: CompletionBackend>(backend: &B, prompt: &str) -> AiReportResult {
    match backend.complete(prompt).await {
        Ok(text) => {
            ::log::info!("Analysis generated ({} chars)", text.len());
            AiReportResult::Generated(text)
        }
        Err(e) => {
            ::log::warn!("Analysis request failed: {}", e);
            AiReportResult::Failed(failure_message(&e))
        }
    }
}

fn failure_message(error: &AnalysisError) -> String {
    format!(
        "❌ Error al generar análisis: {error}\n\n\
         Verifica que tu API key esté configurada correctamente."
    )
}

/// Per-session analysis state: the credential and the result holder.
#[derive(Debug)]
pub struct AnalysisSession {
    credential: Option<ApiCredential>,
    api_key_env: String,
    slot: AnalysisSlot,
}

impl AnalysisSession {
    pub fn new(credential: Option<ApiCredential>, api_key_env: &str) -> Self {
        Self {
            credential,
            api_key_env: api_key_env.to_string(),
            slot: AnalysisSlot::new(),
        }
    }

    /// Build a session with the key read from `api_key_env`
    pub fn from_env(api_key_env: &str) -> Self {
        Self::new(ApiCredential::from_env(api_key_env), api_key_env)
    }

    pub fn is_enabled(&self) -> bool {
        self.credential.is_some()
    }

    pub fn state(&self) -> AnalysisState {
        if !self.is_enabled() {
            return AnalysisState::Disabled {
                guidance: disabled_guidance(&self.api_key_env),
            };
        }
        match self.slot.get() {
            Some(result) => AnalysisState::Completed(result.clone()),
            None => AnalysisState::Idle,
        }
    }

    pub fn result(&self) -> Option<&AiReportResult> {
        self.slot.get()
    }

    pub fn clear(&mut self) {
        self.slot.clear();
    }

    /// Run one analysis request and overwrite the stored result.
    ///
    /// Without a credential the backend is never built and nothing is sent.
    pub async fn request<B, F>(&mut self, connect: F, prompt: &str) -> AnalysisState
    where
        B: CompletionBackend,
        F: FnOnce(&ApiCredential) -> Result<B, AnalysisError>,
    {
        let Some(credential) = &self.credential else {
            ::log::info!("{} not configured, AI analysis disabled", self.api_key_env);
            return self.state();
        };

        let result = match connect(credential) {
            Ok(backend) => generate(&backend, prompt).await,
            Err(e) => {
                ::log::warn!("Could not create analysis client: {}", e);
                AiReportResult::Failed(failure_message(&e))
            }
        };
        self.slot.store(result);
        self.state()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Backend that records calls and replies with a canned outcome
    #[derive(Clone)]
    struct MockBackend {
        calls: Arc<AtomicUsize>,
        reply: Result<String, (u16, String)>,
    }

    impl MockBackend {
        fn ok(text: &str) -> Self {
            Self {
                calls: Arc::new(AtomicUsize::new(0)),
                reply: Ok(text.to_string()),
            }
        }

        fn failing(status: u16, body: &str) -> Self {
            Self {
                calls: Arc::new(AtomicUsize::new(0)),
                reply: Err((status, body.to_string())),
            }
        }
    }

    impl CompletionBackend for MockBackend {
        async fn complete(&self, _prompt: &str) -> Result<String, AnalysisError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err((status, body)) => Err(AnalysisError::Api {
                    status: *status,
                    body: body.clone(),
                }),
            }
        }
    }

    #[test]
    fn test_slot_lifecycle() {
        let mut slot = AnalysisSlot::new();
        assert!(slot.get().is_none());

        slot.store(AiReportResult::Generated("uno".to_string()));
        slot.store(AiReportResult::Failed("dos".to_string()));
        assert_eq!(slot.get(), Some(&AiReportResult::Failed("dos".to_string())));

        slot.clear();
        assert!(slot.get().is_none());
    }

    #[tokio::test]
    async fn test_generate_returns_text_verbatim() {
        let backend = MockBackend::ok("  **DIAGNÓSTICO**\n\n- [ ] algo  ");
        let result = generate(&backend, "prompt").await;
        assert_eq!(
            result,
            AiReportResult::Generated("  **DIAGNÓSTICO**\n\n- [ ] algo  ".to_string())
        );
    }

    #[tokio::test]
    async fn test_generate_failure_becomes_message() {
        let backend = MockBackend::failing(401, "invalid x-api-key");
        let result = generate(&backend, "prompt").await;

        assert!(!result.is_generated());
        assert!(result.text().starts_with("❌ Error al generar análisis"));
        assert!(result.text().contains("401"));
        assert!(result.text().contains("invalid x-api-key"));
    }

    #[tokio::test]
    async fn test_missing_credential_never_calls_backend() {
        let backend = MockBackend::ok("texto");
        let calls = backend.calls.clone();
        let mut session = AnalysisSession::new(None, "ANTHROPIC_API_KEY");
        let mut connected = false;

        let state = session
            .request(
                |_| {
                    connected = true;
                    Ok(backend)
                },
                "prompt",
            )
            .await;

        assert!(!connected);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        match state {
            AnalysisState::Disabled { guidance } => {
                assert!(guidance.contains("ANTHROPIC_API_KEY"));
            }
            other => panic!("expected disabled state, got {:?}", other),
        }
        assert!(session.result().is_none());
    }

    #[tokio::test]
    async fn test_request_overwrites_previous_result() {
        let mut session = AnalysisSession::new(ApiCredential::new("sk-test"), "ANTHROPIC_API_KEY");
        assert_eq!(session.state(), AnalysisState::Idle);

        let first = MockBackend::ok("primero");
        session.request(|_| Ok(first), "prompt").await;
        assert_eq!(
            session.result(),
            Some(&AiReportResult::Generated("primero".to_string()))
        );

        let second = MockBackend::failing(529, "overloaded");
        let state = session.request(|_| Ok(second), "prompt").await;
        match state {
            AnalysisState::Completed(AiReportResult::Failed(text)) => {
                assert!(text.contains("overloaded"));
            }
            other => panic!("expected failed result, got {:?}", other),
        }

        session.clear();
        assert_eq!(session.state(), AnalysisState::Idle);
    }

    #[tokio::test]
    async fn test_client_construction_failure_is_displayed() {
        let mut session = AnalysisSession::new(ApiCredential::new("sk-test"), "ANTHROPIC_API_KEY");
        let state = session
            .request(
                |_| -> Result<MockBackend, AnalysisError> {
                    Err(AnalysisError::MalformedResponse("boom".to_string()))
                },
                "prompt",
            )
            .await;

        match state {
            AnalysisState::Completed(result) => assert!(result.text().contains("boom")),
            other => panic!("expected completed state, got {:?}", other),
        }
    }

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("link-audit-{}-{}.txt", std::process::id(), name))
    }

    #[test]
    fn test_save_writes_generated_text_verbatim() {
        let path = temp_path("generated");
        let text = "**DIAGNÓSTICO**\n- [ ] Corregir 404  \n\n";
        let state = AnalysisState::Completed(AiReportResult::Generated(text.to_string()));

        assert!(save(&state, &path).unwrap());
        let written = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(written, text);
    }

    #[test]
    fn test_save_skips_everything_but_generated() {
        let path = temp_path("skipped");
        let _ = std::fs::remove_file(&path);

        let states = [
            AnalysisState::Completed(AiReportResult::Failed("❌ Error".to_string())),
            AnalysisState::Idle,
            AnalysisState::Disabled {
                guidance: disabled_guidance("ANTHROPIC_API_KEY"),
            },
        ];
        for state in &states {
            assert!(!save(state, &path).unwrap());
            assert!(!path.exists(), "{:?} created a file", state);
        }
    }

    #[test]
    fn test_save_reports_write_failure() {
        let path = temp_path("missing-dir").join("analisis.txt");
        let state = AnalysisState::Completed(AiReportResult::Generated("ok".to_string()));
        assert!(save(&state, &path).is_err());
    }

    #[tokio::test]
    async fn test_unreachable_api_is_displayed_as_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let config = crate::config::ReportConfig {
            endpoint: format!("http://{}/v1/messages", addr),
            ..crate::config::ReportConfig::default()
        };
        let mut session = AnalysisSession::new(ApiCredential::new("sk-test"), "ANTHROPIC_API_KEY");
        let state = session
            .request(|key| AnthropicClient::new(&config, key), "prompt")
            .await;

        match state {
            AnalysisState::Completed(AiReportResult::Failed(text)) => {
                assert!(text.contains("❌"));
            }
            other => panic!("expected failed result, got {:?}", other),
        }
    }
}
