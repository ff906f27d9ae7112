use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, info};

use crate::completion::{Completion, CompletionClient, CompletionRequest};
use crate::data_source::SourceError;
use crate::http_client::{HttpAuth, HttpClient, HttpRequest, ReqwestHttpClient};
use crate::{ConfigError, ProviderId, ServiceConfig};

const CHAT_ENDPOINT: &str = "https://api.groq.com/openai/v1/chat/completions";

/// Groq's OpenAI-compatible chat completions endpoint.
#[derive(Clone)]
pub struct GroqAdapter {
    http_client: Arc<dyn HttpClient>,
    auth: HttpAuth,
    timeout_ms: u64,
}

impl std::fmt::Debug for GroqAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroqAdapter")
            .field("auth", &self.auth)
            .field("timeout_ms", &self.timeout_ms)
            .finish_non_exhaustive()
    }
}

impl GroqAdapter {
    /// Fails with [`ConfigError::MissingCredential`] when no API key is configured.
    pub fn new(config: &ServiceConfig) -> Result<Self, ConfigError> {
        Self::with_http_client(config, Arc::new(ReqwestHttpClient::new()))
    }

    pub fn with_http_client(
        config: &ServiceConfig,
        http_client: Arc<dyn HttpClient>,
    ) -> Result<Self, ConfigError> {
        let key = config.require_groq_api_key()?;
        Ok(Self {
            http_client,
            auth: HttpAuth::BearerToken(key.to_owned()),
            timeout_ms: config.http_timeout_ms,
        })
    }

    async fn chat(&self, req: CompletionRequest) -> Result<Completion, SourceError> {
        let body = serde_json::to_string(&req).map_err(|e| {
            SourceError::internal(format!("failed to encode completion request: {e}"))
        })?;
        debug!(model = %req.model, messages = req.messages.len(), "groq completion request");

        let request = HttpRequest::post(CHAT_ENDPOINT)
            .with_auth(&self.auth)
            .with_json_body(body)
            .with_timeout_ms(self.timeout_ms);

        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|e| {
                SourceError::unavailable(format!("groq transport error: {}", e.message()))
            })?;

        if !response.is_success() {
            return Err(SourceError::from_status(ProviderId::Groq, response.status));
        }

        let completion = parse_completion(&response.body, &req.model)?;
        info!(model = %completion.model, chars = completion.text.len(), "groq completion received");
        Ok(completion)
    }
}

impl CompletionClient for GroqAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Groq
    }

    fn complete<'a>(
        &'a self,
        req: CompletionRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Completion, SourceError>> + Send + 'a>> {
        Box::pin(async move { self.chat(req).await })
    }
}

fn parse_completion(body: &str, requested_model: &str) -> Result<Completion, SourceError> {
    let payload: ChatResponse = serde_json::from_str(body)
        .map_err(|e| SourceError::internal(format!("failed to parse groq response: {e}")))?;

    let text = payload
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| SourceError::internal("groq response contained no completion text"))?;

    Ok(Completion {
        text,
        model: payload
            .model
            .unwrap_or_else(|| requested_model.to_owned()),
    })
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}
