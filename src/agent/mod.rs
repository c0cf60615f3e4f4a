use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::config::RelayConfig;
use crate::errors::AppError;
use crate::service::prompt::Prompt;

/// Something that can turn a prompt into reply text.
///
/// `Ok(None)` means the upstream answered but carried no usable text;
/// callers substitute their own fallback in that case.
#[async_trait]
pub trait ReplyAgent: Send + Sync {
    async fn generate(&self, prompt: &Prompt) -> Result<Option<String>, AppError>;
}

// ── Wire types ────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
}

// Every level is optional: a reply that is shaped differently decodes to "no text".
#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Default, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentResponse {
    fn into_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
            .filter(|t| !t.is_empty())
    }
}

// ── Gemini client ─────────────────────────────────────────────────────────────

// Sent as a header so the key never appears in a logged URL.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Calls the Gemini `generateContent` REST endpoint, one stateless turn per request.
#[derive(Clone)]
pub struct GeminiAgentService {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiAgentService {
    pub fn new(base_url: &str, model: &str, api_key: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Returns `None` when no credential is configured.
    pub fn from_config(config: &RelayConfig) -> Option<Self> {
        config
            .gemini_api_key
            .as_deref()
            .map(|key| Self::new(&config.gemini_base_url, &config.gemini_model, key))
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl ReplyAgent for GeminiAgentService {
    async fn generate(&self, prompt: &Prompt) -> Result<Option<String>, AppError> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: &prompt.text }],
            }],
            generation_config: prompt
                .max_output_tokens
                .map(|max_output_tokens| GenerationConfig { max_output_tokens }),
        };

        let resp = self
            .http
            .post(self.endpoint())
            .header(API_KEY_HEADER, self.api_key.as_str())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                let e = e.without_url();
                error!("Gemini request to model {} failed: {e}", self.model);
                AppError::upstream(format!("request error: {e}"))
            })?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            error!("Gemini returned {status}: {detail}");
            return Err(AppError::UpstreamError {
                message: format!("upstream returned {status}"),
                status: Some(status.as_u16()),
            });
        }

        let raw: serde_json::Value = resp.json().await.map_err(|e| {
            let e = e.without_url();
            error!("Gemini response was not JSON: {e}");
            AppError::upstream(format!("response parse error: {e}"))
        })?;
        debug!("Gemini API response: {raw}");

        let parsed: GenerateContentResponse = serde_json::from_value(raw).unwrap_or_default();
        Ok(parsed.into_text())
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const MODEL_PATH: &str = "/models/gemini-test:generateContent";

    fn agent_for(server: &MockServer) -> GeminiAgentService {
        GeminiAgentService::new(&server.uri(), "gemini-test", "secret-key")
    }

    fn candidate(text: &str) -> serde_json::Value {
        json!({ "candidates": [ { "content": { "parts": [ { "text": text } ], "role": "model" } } ] })
    }

    #[tokio::test]
    async fn extracts_first_candidate_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(MODEL_PATH))
            .and(header("x-goog-api-key", "secret-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(candidate("Recursion is...")))
            .mount(&server)
            .await;

        let reply = agent_for(&server)
            .generate(&Prompt::for_message("Explain recursion"))
            .await
            .unwrap();
        assert_eq!(reply.as_deref(), Some("Recursion is..."));
    }

    #[tokio::test]
    async fn greeting_sends_output_length_hint() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(MODEL_PATH))
            .and(body_partial_json(json!({ "generationConfig": { "maxOutputTokens": 40 } })))
            .respond_with(ResponseTemplate::new(200).set_body_json(candidate("Hey!")))
            .expect(1)
            .mount(&server)
            .await;

        let reply = agent_for(&server).generate(&Prompt::for_message("hi")).await.unwrap();
        assert_eq!(reply.as_deref(), Some("Hey!"));
    }

    #[tokio::test]
    async fn missing_text_is_not_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "promptFeedback": {} })))
            .mount(&server)
            .await;

        let reply = agent_for(&server).generate(&Prompt::for_message("hello there")).await.unwrap();
        assert_eq!(reply, None);
    }

    #[tokio::test]
    async fn error_status_becomes_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let err = agent_for(&server)
            .generate(&Prompt::for_message("hello there"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UpstreamError { status: Some(503), .. }));
    }

    #[tokio::test]
    async fn non_json_body_becomes_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = agent_for(&server)
            .generate(&Prompt::for_message("hello there"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UpstreamError { status: None, .. }));
    }

    #[tokio::test]
    async fn unreachable_host_becomes_upstream_error() {
        let agent = GeminiAgentService::new("http://127.0.0.1:9", "gemini-test", "k");
        let err = agent.generate(&Prompt::for_message("hello there")).await.unwrap_err();
        assert!(matches!(err, AppError::UpstreamError { status: None, .. }));
    }

    #[tokio::test]
    async fn api_key_stays_out_of_error_text() {
        let agent = GeminiAgentService::new("http://127.0.0.1:9", "gemini-test", "SECRET-KEY-123");
        let err = agent.generate(&Prompt::for_message("hello there")).await.unwrap_err();
        assert!(!err.to_string().contains("SECRET-KEY-123"), "leaked: {err}");
        assert!(!format!("{err:?}").contains("SECRET-KEY-123"), "leaked: {err:?}");
    }

    #[tokio::test]
    async fn api_key_is_not_sent_in_the_url() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(candidate("ok")))
            .mount(&server)
            .await;

        agent_for(&server).generate(&Prompt::for_message("hello there")).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].url.query().is_none());
        assert_eq!(requests[0].headers.get("x-goog-api-key").unwrap(), "secret-key");
    }
}
