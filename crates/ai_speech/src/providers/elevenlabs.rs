//! ElevenLabs Speech Provider
//!
//! Implements `TextToSpeech` against the ElevenLabs streaming endpoint
//! (`POST /text-to-speech/{voice_id}/stream`). Audio is handed to the caller
//! as it arrives; nothing is buffered beyond the current chunk.

use std::time::Duration;

use async_trait::async_trait;
use futures::TryStreamExt;
use reqwest::{Client, Response, StatusCode, Url, header::HeaderMap};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::config::SpeechConfig;
use crate::error::SpeechError;
use crate::ports::TextToSpeech;
use crate::stream::AudioStream;
use crate::types::{OutputFormat, SpeechSynthesis, SynthesisMetadata};

const CHARACTER_COUNT_HEADER: &str = "x-character-count";
const REQUEST_ID_HEADER: &str = "request-id";

/// ElevenLabs speech provider
#[derive(Debug, Clone)]
pub struct ElevenLabsSpeechProvider {
    client: Client,
    config: SpeechConfig,
}

impl ElevenLabsSpeechProvider {
    /// Create a new ElevenLabs speech provider
    ///
    /// A missing API key is logged but accepted; synthesis then fails with
    /// `SpeechError::Configuration` on each call.
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::Configuration` if the configuration is invalid.
    pub fn new(config: SpeechConfig) -> Result<Self, SpeechError> {
        config.validate().map_err(SpeechError::Configuration)?;

        if !config.has_api_key() {
            warn!("ElevenLabs API key not configured, speech synthesis requests will fail");
        }

        let client = Client::builder()
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .build()
            .map_err(|e| {
                SpeechError::Configuration(format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self { client, config })
    }

    /// Build the streaming endpoint URL for `voice`
    ///
    /// The voice id is percent-encoded as a single path segment.
    fn stream_url(&self, voice: &str) -> Result<Url, SpeechError> {
        let mut url = Url::parse(&self.config.base_url)
            .map_err(|e| SpeechError::Configuration(format!("Invalid base URL: {e}")))?;

        url.path_segments_mut()
            .map_err(|()| {
                SpeechError::Configuration(format!(
                    "Base URL cannot carry a path: {}",
                    self.config.base_url
                ))
            })?
            .pop_if_empty()
            .extend(["text-to-speech", voice, "stream"]);

        Ok(url)
    }

    fn check_text(&self, text: &str) -> Result<(), SpeechError> {
        if text.trim().is_empty() {
            return Err(SpeechError::SynthesisFailed(
                "Text cannot be empty".to_string(),
            ));
        }

        let chars = text.chars().count();
        if chars > self.config.max_text_chars {
            return Err(SpeechError::SynthesisFailed(format!(
                "Text too long: {chars} characters exceeds {} limit",
                self.config.max_text_chars
            )));
        }

        Ok(())
    }

    /// Map a non-success response to a `SpeechError`
    async fn error_from_response(response: Response, voice: &str) -> SpeechError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let parsed = serde_json::from_str::<ApiErrorBody>(&body).ok();

        let code = parsed.as_ref().and_then(|e| e.detail.status());
        let message = parsed
            .as_ref()
            .map(|e| e.detail.message())
            .filter(|m| !m.is_empty())
            .unwrap_or(body);

        map_status(status, code, message, voice)
    }
}

/// Classify a provider rejection
fn map_status(status: StatusCode, code: Option<&str>, message: String, voice: &str) -> SpeechError {
    match (status, code) {
        (StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN, _) => SpeechError::Unauthorized(message),
        (StatusCode::NOT_FOUND, _) | (_, Some("voice_not_found")) => {
            SpeechError::VoiceNotFound(voice.to_string())
        },
        (StatusCode::TOO_MANY_REQUESTS, _) => SpeechError::RateLimited,
        _ => SpeechError::SynthesisFailed(format!("HTTP {}: {message}", status.as_u16())),
    }
}

fn metadata_from_headers(headers: &HeaderMap) -> SynthesisMetadata {
    let header_str = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());

    SynthesisMetadata {
        character_count: header_str(CHARACTER_COUNT_HEADER).and_then(|v| v.trim().parse().ok()),
        request_id: header_str(REQUEST_ID_HEADER).map(ToString::to_string),
    }
}

/// ElevenLabs TTS request body
#[derive(Debug, Serialize)]
struct TextToSpeechBody<'a> {
    text: &'a str,
    model_id: &'a str,
}

/// ElevenLabs API error response
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    detail: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ApiErrorDetail {
    Structured {
        #[serde(default)]
        status: Option<String>,
        message: String,
    },
    Plain(String),
    Validation(Vec<ValidationIssue>),
}

#[derive(Debug, Deserialize)]
struct ValidationIssue {
    msg: String,
}

impl ApiErrorDetail {
    fn status(&self) -> Option<&str> {
        match self {
            Self::Structured { status, .. } => status.as_deref(),
            Self::Plain(_) | Self::Validation(_) => None,
        }
    }

    fn message(&self) -> String {
        match self {
            Self::Structured { message, .. } | Self::Plain(message) => message.clone(),
            Self::Validation(issues) => issues
                .iter()
                .map(|issue| issue.msg.as_str())
                .collect::<Vec<_>>()
                .join("; "),
        }
    }
}

#[async_trait]
impl TextToSpeech for ElevenLabsSpeechProvider {
    #[instrument(
        skip(self, text),
        fields(text_len = text.len(), voice = %voice.unwrap_or(&self.config.default_voice))
    )]
    async fn synthesize_stream(
        &self,
        text: &str,
        voice: Option<&str>,
    ) -> Result<SpeechSynthesis, SpeechError> {
        let api_key = self.config.api_key_str().ok_or_else(|| {
            SpeechError::Configuration("ElevenLabs API key is not configured".to_string())
        })?;

        self.check_text(text)?;

        let voice = voice.unwrap_or(&self.config.default_voice);
        let format = self.config.output_format;
        let url = self.stream_url(voice)?;

        debug!(model = %self.config.model_id, %format, "Requesting ElevenLabs speech stream");

        let response = self
            .client
            .post(url)
            .query(&[("output_format", format.as_str())])
            .header("xi-api-key", api_key)
            .header(reqwest::header::ACCEPT, format.mime_type())
            .json(&TextToSpeechBody {
                text,
                model_id: &self.config.model_id,
            })
            .send()
            .await
            .map_err(|e| SpeechError::from_transport(&e, self.config.connect_timeout_ms))?;

        if !response.status().is_success() {
            let err = Self::error_from_response(response, voice).await;
            warn!(error = %err, "ElevenLabs rejected synthesis request");
            return Err(err);
        }

        let metadata = metadata_from_headers(response.headers());
        debug!(
            character_count = ?metadata.character_count,
            request_id = ?metadata.request_id,
            "ElevenLabs accepted synthesis request"
        );

        let audio = AudioStream::new(
            response
                .bytes_stream()
                .map_err(|e| SpeechError::Stream(e.to_string())),
        );

        Ok(SpeechSynthesis {
            metadata,
            format,
            audio,
        })
    }

    fn model_name(&self) -> &str {
        &self.config.model_id
    }

    fn default_voice(&self) -> &str {
        &self.config.default_voice
    }

    fn output_format(&self) -> OutputFormat {
        self.config.output_format
    }

    fn is_configured(&self) -> bool {
        self.config.has_api_key()
    }
}
