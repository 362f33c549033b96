//! Google Gemini `generateContent` client.
//! See: <https://ai.google.dev/api/rest>

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{provider_error, require_key, ChatProvider, LlmError, Message, Role};

#[derive(Debug, Clone)]
pub struct GeminiClient {
    api_key: String,
    base_url: String,
    model: String,
    http: reqwest::Client,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            http: reqwest::Client::new(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn handle_error_response(status: reqwest::StatusCode, body: &str) -> LlmError {
        match serde_json::from_str::<GeminiErrorResponse>(body) {
            Ok(err) => LlmError::Provider(format!(
                "Gemini error ({}): {}",
                err.error.code, err.error.message
            )),
            Err(_) => provider_error("Gemini", status, body),
        }
    }
}

#[async_trait]
impl ChatProvider for GeminiClient {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn ask(&self, messages: &[Message], system: &str) -> Result<String, LlmError> {
        require_key("Gemini", &self.api_key)?;

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let body = GeminiRequest::new(messages, system);
        debug!(model = %self.model, messages = messages.len(), "sending Gemini request");

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", self.api_key.as_str())
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Http(e.without_url()))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| LlmError::Http(e.without_url()))?;

        if !status.is_success() {
            return Err(Self::handle_error_response(status, &text));
        }

        let parsed: GeminiResponse = serde_json::from_str(&text)?;
        parsed.into_text()
    }
}

// --- Gemini API Request/Response Types ---

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiSystemInstruction>,
    contents: Vec<GeminiContent>,
}

impl GeminiRequest {
    fn new(messages: &[Message], system: &str) -> Self {
        let system_instruction = (!system.is_empty()).then(|| GeminiSystemInstruction {
            parts: vec![GeminiPart {
                text: system.to_string(),
            }],
        });
        Self {
            system_instruction,
            contents: messages.iter().map(GeminiContent::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
struct GeminiSystemInstruction {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
enum GeminiRole {
    User,
    Model,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default = "default_role")]
    role: GeminiRole,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

fn default_role() -> GeminiRole {
    GeminiRole::Model
}

impl From<&Message> for GeminiContent {
    fn from(msg: &Message) -> Self {
        let role = match msg.role {
            Role::User => GeminiRole::User,
            Role::Assistant => GeminiRole::Model,
        };
        Self {
            role,
            parts: vec![GeminiPart {
                text: msg.content.clone(),
            }],
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

impl GeminiResponse {
    fn into_text(self) -> Result<String, LlmError> {
        let content = self
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .ok_or(LlmError::EmptyResponse)?;
        let text: String = content.parts.into_iter().map(|p| p.text).collect();
        Ok(text)
    }
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    // Absent when the candidate was blocked (e.g. `finishReason: SAFETY`).
    content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorResponse {
    error: GeminiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorDetail {
    code: u16,
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn request_carries_system_instruction_and_roles() {
        let messages = vec![Message::user("hi"), Message::assistant("hello")];
        let body = serde_json::to_value(GeminiRequest::new(&messages, "be brief")).unwrap();

        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "be brief");
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][1]["role"], "model");
        assert_eq!(body["contents"][1]["parts"][0]["text"], "hello");
    }

    #[test]
    fn empty_system_is_omitted() {
        let body = serde_json::to_value(GeminiRequest::new(&[Message::user("x")], "")).unwrap();
        assert!(body.get("systemInstruction").is_none());
    }

    #[tokio::test]
    async fn ask_returns_concatenated_parts() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-2.5-pro:generateContent"))
            .and(header("x-goog-api-key", "test-key"))
            .and(body_partial_json(json!({
                "systemInstruction": { "parts": [{ "text": "sys" }] }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": { "role": "model", "parts": [{ "text": "[{\"title\":" }, { "text": "\"x\"}]" }] },
                    "finishReason": "STOP"
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = GeminiClient::new("test-key", server.uri(), "gemini-2.5-pro");
        let text = client.ask(&[Message::user("go")], "sys").await.unwrap();
        assert_eq!(text, "[{\"title\":\"x\"}]");
    }

    #[tokio::test]
    async fn provider_error_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "error": { "code": 403, "message": "API key not valid", "status": "PERMISSION_DENIED" }
            })))
            .mount(&server)
            .await;

        let client = GeminiClient::new("bad", server.uri(), "gemini-2.5-pro");
        let err = client.ask(&[Message::user("go")], "sys").await.unwrap_err();
        match err {
            LlmError::Provider(msg) => assert!(msg.contains("API key not valid")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn blocked_candidate_is_empty_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{ "finishReason": "SAFETY", "index": 0 }]
            })))
            .mount(&server)
            .await;

        let client = GeminiClient::new("test-key", server.uri(), "gemini-2.5-pro");
        let err = client.ask(&[Message::user("go")], "sys").await.unwrap_err();
        assert!(matches!(err, LlmError::EmptyResponse));
    }

    #[tokio::test]
    async fn transport_error_does_not_expose_key() {
        let client = GeminiClient::new("SECRET-GEMINI-KEY", "http://127.0.0.1:1", "gemini-2.5-pro");
        let err = client.ask(&[Message::user("go")], "sys").await.unwrap_err();

        assert!(matches!(err, LlmError::Http(_)));
        assert!(!err.to_string().contains("SECRET-GEMINI-KEY"));
        assert!(!format!("{err:?}").contains("SECRET-GEMINI-KEY"));
    }

    #[tokio::test]
    async fn missing_key_fails_before_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = GeminiClient::new("", server.uri(), "gemini-2.5-pro");
        let err = client.ask(&[Message::user("go")], "sys").await.unwrap_err();
        assert!(matches!(err, LlmError::Config(_)));
    }
}
