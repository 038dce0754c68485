use crate::{Completion, LLMError, LLMResult, OllamaConfig};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const NO_RESPONSE_FOUND: &str = "No response found in the API output.";

/// Body of `POST /api/generate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    pub stream: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub model: Option<String>,
    pub response: Option<String>,
    pub done: Option<bool>,
}

pub struct OllamaClient {
    client: reqwest::Client,
    config: OllamaConfig,
}

impl OllamaClient {
    pub fn new(config: OllamaConfig) -> LLMResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl Completion for OllamaClient {
    #[tracing::instrument(name = "OllamaClient::get_completion", err(Debug), skip_all, fields(model = %self.config.model))]
    async fn get_completion(&self, prompt: &str) -> Result<String, LLMError> {
        let payload = GenerateRequest {
            model: self.config.model.clone(),
            prompt: prompt.to_string(),
            stream: false,
        };

        debug!("ollama url: {}", self.config.api_url);

        let resp = self
            .client
            .post(self.config.api_url.clone())
            .json(&payload)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(LLMError::Status { status, body });
        }

        let resp = resp.json::<GenerateResponse>().await?;
        debug!("ollama done: {:?}", resp.done);

        Ok(resp
            .response
            .unwrap_or_else(|| NO_RESPONSE_FOUND.to_string()))
    }
}
