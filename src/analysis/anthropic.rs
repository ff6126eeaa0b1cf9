use crate::analysis::backend::{ApiCredential, CompletionBackend};
use crate::config::ReportConfig;
use crate::error::AnalysisError;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use url::Url;

/// Client for the Anthropic Messages API.
///
/// Sends one non-streaming request per prompt. There are no retries and the
/// HTTP client keeps its default timeouts.
#[derive(Debug, Clone)]
pub struct AnthropicClient {
    http: Client,
    endpoint: Url,
    api_key: ApiCredential,
    model: String,
    max_tokens: u32,
    anthropic_version: String,
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: [Message<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

impl AnthropicClient {
    pub fn new(config: &ReportConfig, api_key: &ApiCredential) -> Result<Self, AnalysisError> {
        let endpoint = Url::parse(&config.endpoint)?;
        let http = Client::builder().build()?;

        Ok(Self {
            http,
            endpoint,
            api_key: api_key.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            anthropic_version: config.anthropic_version.clone(),
        })
    }

    fn request_body<'a>(&'a self, prompt: &'a str) -> MessagesRequest<'a> {
        MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: [Message {
                role: "user",
                content: prompt,
            }],
        }
    }
}

impl CompletionBackend for AnthropicClient {
    async fn complete(&self, prompt: &str) -> Result<String, AnalysisError> {
        ::log::info!(
            "Requesting analysis from {} (model {}, max_tokens {})",
            self.endpoint,
            self.model,
            self.max_tokens
        );

        let response = self
            .http
            .post(self.endpoint.clone())
            .header("x-api-key", self.api_key.expose())
            .header("anthropic-version", &self.anthropic_version)
            .header(CONTENT_TYPE, "application/json")
            .json(&self.request_body(prompt))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(AnalysisError::Api {
                status: status.as_u16(),
                body,
            });
        }

        first_text(&body)
    }
}

/// Text of the first content block of a Messages API response
fn first_text(body: &str) -> Result<String, AnalysisError> {
    let response: MessagesResponse = serde_json::from_str(body)
        .map_err(|e| AnalysisError::MalformedResponse(e.to_string()))?;

    let first = response
        .content
        .into_iter()
        .next()
        .ok_or_else(|| AnalysisError::MalformedResponse("response has no content".to_string()))?;

    first.text.ok_or_else(|| {
        AnalysisError::MalformedResponse(format!(
            "first content block is `{}`, not text",
            first.kind
        ))
    })
}
