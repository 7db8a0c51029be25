//! Speech relay service - Streams synthesized audio to the caller

use std::{fmt, sync::Arc};

use domain::SpeechRequest;
use futures::StreamExt;
use tracing::{debug, instrument, warn};

use crate::{
    error::ApplicationError,
    ports::{SpeechPort, SpeechStream},
};

/// Service relaying text-to-speech audio from the provider to the caller
pub struct SpeechRelayService {
    speech: Arc<dyn SpeechPort>,
}

impl fmt::Debug for SpeechRelayService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpeechRelayService")
            .field("configured", &self.speech.is_configured())
            .finish_non_exhaustive()
    }
}

impl SpeechRelayService {
    /// Create a new relay service
    pub fn new(speech: Arc<dyn SpeechPort>) -> Self {
        Self { speech }
    }

    /// Start relaying speech for `request`
    ///
    /// Waits for the first non-empty audio chunk before returning, so a
    /// synthesis that fails or produces nothing is reported as an error
    /// instead of an empty success. The returned stream yields that chunk
    /// first, followed by the rest of the upstream audio in order.
    #[instrument(skip(self, request), fields(text_len = request.text().len(), voice = request.voice_id()))]
    pub async fn relay(&self, request: &SpeechRequest) -> Result<SpeechStream, ApplicationError> {
        let default_voice = self.speech.default_voice();
        let voice = request.voice_or(&default_voice).to_string();

        let SpeechStream {
            content_type,
            metadata,
            mut audio,
        } = self
            .speech
            .synthesize_stream(request.text().to_string(), voice)
            .await?;

        let first = loop {
            match audio.next().await {
                Some(Ok(chunk)) if chunk.is_empty() => {},
                Some(Ok(chunk)) => break chunk,
                Some(Err(e)) => {
                    warn!(error = %e, "Speech synthesis failed before first chunk");
                    return Err(e);
                },
                None => {
                    return Err(ApplicationError::ExternalService(
                        "Speech provider returned no audio".to_string(),
                    ));
                },
            }
        };

        debug!(
            first_chunk_len = first.len(),
            character_count = ?metadata.character_count,
            "Speech synthesis started"
        );

        let audio = futures::stream::iter([Ok(first)]).chain(audio).boxed();

        Ok(SpeechStream {
            content_type,
            metadata,
            audio,
        })
    }

    /// Voice used when a request does not name one
    pub fn default_voice(&self) -> String {
        self.speech.default_voice()
    }
}
