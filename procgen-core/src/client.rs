use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{config::ModelInfo, error::GenerationServiceError, prompt::GenerationRequest};

const TEMPERATURE: f32 = 0.3;

/// The model's reply as parsed, before any shape checks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GeneratedPayload {
    pub procedure: Option<ProcedurePayload>,
    pub api: Option<ApiPayload>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProcedurePayload {
    pub name: Option<String>,
    pub sql: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "RawApiPayload")]
pub struct ApiPayload {
    pub name: Option<String>,
    pub code: Option<String>,
}

/// The contract asks for `js`; some models answer with `code`, or both.
#[derive(Deserialize)]
struct RawApiPayload {
    name: Option<String>,
    js: Option<String>,
    code: Option<String>,
}

impl From<RawApiPayload> for ApiPayload {
    fn from(raw: RawApiPayload) -> Self {
        Self {
            name: raw.name,
            code: raw.js.or(raw.code),
        }
    }
}

#[async_trait]
pub trait CodeGenerator {
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GeneratedPayload, GenerationServiceError>;
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    response_format: ResponseFormat,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    r#type: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

/// Chat-completions client for OpenAI-compatible endpoints.
pub struct OpenAiClient {
    http: reqwest::Client,
    info: ModelInfo,
}

impl OpenAiClient {
    pub fn new(info: ModelInfo) -> Self {
        Self {
            http: reqwest::Client::new(),
            info,
        }
    }

    fn body<'a>(&'a self, request: &'a GenerationRequest) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.info.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &request.system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user_prompt,
                },
            ],
            response_format: ResponseFormat {
                r#type: "json_object",
            },
            temperature: TEMPERATURE,
        }
    }
}

pub fn parse_reply(content: &str) -> Result<GeneratedPayload, GenerationServiceError> {
    Ok(serde_json::from_str(content)?)
}

#[async_trait]
impl CodeGenerator for OpenAiClient {
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GeneratedPayload, GenerationServiceError> {
        let Some(api_key) = &self.info.api_key else {
            return Err(GenerationServiceError::MissingCredential);
        };
        debug!(
            "Requesting {} with {} byte system prompt",
            self.info.model,
            request.system_prompt.len()
        );
        let response = self
            .http
            .post(format!(
                "{}/chat/completions",
                self.info.base_url.trim_end_matches('/')
            ))
            .bearer_auth(api_key)
            .json(&self.body(request))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationServiceError::Status { status, body });
        }
        let reply: ChatResponse = response.json().await?;
        let content = reply
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(GenerationServiceError::EmptyReply)?;
        parse_reply(&content)
    }
}
