//! Speech adapter - Implements SpeechPort using the ai_speech crate

use std::sync::Arc;

use ai_speech::{
    ElevenLabsSpeechProvider, SpeechConfig, SpeechError, SynthesisMetadata, TextToSpeech,
};
use application::error::ApplicationError;
use application::ports::{SpeechMetadata, SpeechPort, SpeechStream};
use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use tracing::{debug, instrument, warn};

/// Adapter relaying ElevenLabs audio through the application speech port
pub struct ElevenLabsSpeechAdapter {
    provider: Arc<dyn TextToSpeech>,
}

impl std::fmt::Debug for ElevenLabsSpeechAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElevenLabsSpeechAdapter")
            .field("model", &self.provider.model_name())
            .field("format", &self.provider.output_format())
            .field("configured", &self.provider.is_configured())
            .finish_non_exhaustive()
    }
}

impl ElevenLabsSpeechAdapter {
    /// Create a new speech adapter
    ///
    /// A missing API key is logged and tolerated; synthesis then fails per
    /// request with a configuration error.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: SpeechConfig) -> Result<Self, ApplicationError> {
        let provider = ElevenLabsSpeechProvider::new(config)
            .map_err(|e: SpeechError| ApplicationError::Configuration(e.to_string()))?;

        Ok(Self::with_provider(Arc::new(provider)))
    }

    /// Wrap an existing text-to-speech provider
    pub fn with_provider(provider: Arc<dyn TextToSpeech>) -> Self {
        Self { provider }
    }

    fn map_metadata(metadata: SynthesisMetadata) -> SpeechMetadata {
        SpeechMetadata {
            character_count: metadata.character_count,
            upstream_request_id: metadata.request_id,
        }
    }

    /// Map speech error to application error
    ///
    /// Only caller-input problems may become client errors; an unknown voice
    /// is a provider failure.
    fn map_error(err: SpeechError) -> ApplicationError {
        match err {
            SpeechError::Configuration(e) => ApplicationError::Configuration(e),
            SpeechError::ConnectionFailed(e) | SpeechError::RequestFailed(e) => {
                ApplicationError::ExternalService(e)
            },
            SpeechError::SynthesisFailed(e) => {
                ApplicationError::ExternalService(format!("Synthesis failed: {e}"))
            },
            SpeechError::Stream(e) => {
                ApplicationError::ExternalService(format!("Audio stream interrupted: {e}"))
            },
            SpeechError::Timeout(ms) => {
                ApplicationError::ExternalService(format!("Speech service timeout after {ms}ms"))
            },
            SpeechError::RateLimited => ApplicationError::RateLimited,
            SpeechError::Unauthorized(e) => ApplicationError::NotAuthorized(e),
            SpeechError::VoiceNotFound(v) => {
                ApplicationError::ExternalService(format!("Voice not found: {v}"))
            },
        }
    }
}

#[async_trait]
impl SpeechPort for ElevenLabsSpeechAdapter {
    #[instrument(skip(self, text), fields(text_len = text.len(), voice = %voice_id))]
    async fn synthesize_stream(
        &self,
        text: String,
        voice_id: String,
    ) -> Result<SpeechStream, ApplicationError> {
        let synthesis = self
            .provider
            .synthesize_stream(&text, Some(&voice_id))
            .await
            .map_err(|e| {
                warn!(error = %e, "Speech synthesis could not start");
                Self::map_error(e)
            })?;

        debug!(format = %synthesis.format, "Speech synthesis accepted");

        Ok(SpeechStream {
            content_type: synthesis.format.mime_type().to_string(),
            metadata: Self::map_metadata(synthesis.metadata),
            audio: synthesis.audio.map_err(Self::map_error).boxed(),
        })
    }

    fn default_voice(&self) -> String {
        self.provider.default_voice().to_string()
    }

    fn is_configured(&self) -> bool {
        self.provider.is_configured()
    }
}
