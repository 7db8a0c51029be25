//! Speech port - Interface for streaming text-to-speech

use std::{fmt, pin::Pin};

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Audio bytes in playback order
pub type AudioByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, ApplicationError>> + Send>>;

/// Provider metadata known before the first audio byte
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpeechMetadata {
    /// Characters billed for the synthesis
    pub character_count: Option<u32>,
    /// Provider-side request identifier
    pub upstream_request_id: Option<String>,
}

/// A started synthesis
pub struct SpeechStream {
    /// MIME type of the audio
    pub content_type: String,
    /// Provider metadata
    pub metadata: SpeechMetadata,
    /// Lazily produced audio
    pub audio: AudioByteStream,
}

impl fmt::Debug for SpeechStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpeechStream")
            .field("content_type", &self.content_type)
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

/// Port for speech synthesis operations
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SpeechPort: Send + Sync {
    /// Start synthesizing `text` with `voice_id`
    ///
    /// Returns once the provider accepted the request. Audio is pulled from
    /// the returned stream; dropping it releases the provider connection.
    async fn synthesize_stream(
        &self,
        text: String,
        voice_id: String,
    ) -> Result<SpeechStream, ApplicationError>;

    /// Voice used when a request does not name one
    fn default_voice(&self) -> String;

    /// Whether a credential is configured
    fn is_configured(&self) -> bool;
}
