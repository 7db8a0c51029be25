//! Gemini client implementation

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, info, instrument, warn};

use super::wire::{ApiErrorBody, GenerateContentRequest, GenerateContentResponse, GenerationConfig};
use crate::config::InferenceConfig;
use crate::error::InferenceError;
use crate::ports::{InferenceEngine, InferenceRequest, InferenceResponse};

/// Inference engine backed by the Gemini `generateContent` API
#[derive(Debug, Clone)]
pub struct GeminiInferenceEngine {
    client: Client,
    config: InferenceConfig,
}

impl GeminiInferenceEngine {
    /// Create a new Gemini inference engine
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be built. A missing API key is not an error.
    pub fn new(config: InferenceConfig) -> Result<Self, InferenceError> {
        config
            .validate()
            .map_err(|e| InferenceError::RequestFailed(format!("Invalid configuration: {e}")))?;

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| InferenceError::ConnectionFailed(e.to_string()))?;

        info!(
            model = %config.default_model,
            configured = config.is_configured(),
            "Initialized Gemini inference engine"
        );

        Ok(Self { client, config })
    }

    /// Build the `generateContent` URL for a model
    fn generate_url(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            model
        )
    }

    fn error_from_status(status: StatusCode, body: &str) -> InferenceError {
        let parsed = serde_json::from_str::<ApiErrorBody>(body).ok();
        let message = parsed
            .as_ref()
            .map(|e| e.error.message.as_str())
            .filter(|m| !m.is_empty())
            .unwrap_or(body);

        if status == StatusCode::TOO_MANY_REQUESTS {
            return InferenceError::RateLimited;
        }

        let code = parsed
            .as_ref()
            .and_then(|e| e.error.status.as_deref())
            .map_or_else(String::new, |s| format!(" {s}"));

        InferenceError::ServerError(format!("Status {}{code}: {message}", status.as_u16()))
    }
}

#[async_trait]
impl InferenceEngine for GeminiInferenceEngine {
    #[instrument(skip(self, request), fields(model = %self.config.default_model, prompt_len = request.prompt.len()))]
    async fn generate(
        &self,
        request: InferenceRequest,
    ) -> Result<InferenceResponse, InferenceError> {
        let api_key = self.config.api_key_str().ok_or_else(|| {
            InferenceError::NotConfigured("Gemini API key is not configured".to_string())
        })?;

        let model = self.config.default_model.clone();
        let body = GenerateContentRequest::new(
            &request.prompt,
            self.config.system_prompt.as_deref(),
            GenerationConfig {
                temperature: self.config.temperature,
                max_output_tokens: self.config.max_tokens,
            },
        );

        debug!("Sending request to Gemini");

        let response = self
            .client
            .post(self.generate_url(&model))
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| InferenceError::from_transport(&e, self.config.timeout_ms))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "Inference request failed");
            return Err(Self::error_from_status(status, &body));
        }

        let reply: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| InferenceError::InvalidResponse(e.to_string()))?;

        let Some(candidate) = reply.candidates.first() else {
            return Err(reply
                .prompt_feedback
                .and_then(|feedback| feedback.block_reason)
                .map_or_else(
                    || InferenceError::InvalidResponse("Response has no candidates".to_string()),
                    InferenceError::Blocked,
                ));
        };

        let content = candidate.text();
        let finish_reason = candidate.finish_reason.clone();

        if content.is_empty() && finish_reason.as_deref() == Some("SAFETY") {
            return Err(InferenceError::Blocked("SAFETY".to_string()));
        }

        let usage = reply.usage_metadata.map(Into::into);

        debug!(
            tokens = ?usage,
            finish_reason = ?finish_reason,
            "Inference completed"
        );

        Ok(InferenceResponse {
            content,
            model: reply.model_version.unwrap_or(model),
            usage,
            finish_reason,
        })
    }

    fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    fn default_model(&self) -> &str {
        &self.config.default_model
    }
}
