//! Port definitions for speech synthesis
//!
//! Defines the trait that speech synthesis adapters must implement.

use async_trait::async_trait;

use crate::error::SpeechError;
use crate::types::{OutputFormat, SpeechSynthesis};

/// Port for streaming Text-to-Speech (TTS) implementations
///
/// # Example
///
/// ```ignore
/// use ai_speech::TextToSpeech;
/// use futures::StreamExt;
///
/// async fn first_chunk_len(tts: &impl TextToSpeech) -> Result<usize, SpeechError> {
///     let mut synthesis = tts.synthesize_stream("Hello", None).await?;
///     let chunk = synthesis.audio.next().await.transpose()?;
///     Ok(chunk.map_or(0, |c| c.len()))
/// }
/// ```
#[async_trait]
pub trait TextToSpeech: Send + Sync {
    /// Start synthesizing `text` and return the audio as a stream
    ///
    /// Resolves once the provider has accepted the request, before any
    /// audio has been read. Uses the default voice when `voice` is `None`.
    ///
    /// # Errors
    ///
    /// Returns `SpeechError` if the request is rejected or cannot be sent.
    async fn synthesize_stream(
        &self,
        text: &str,
        voice: Option<&str>,
    ) -> Result<SpeechSynthesis, SpeechError>;

    /// Get the name of the synthesis model
    fn model_name(&self) -> &str;

    /// Get the default voice ID
    fn default_voice(&self) -> &str;

    /// Encoding of the produced audio
    fn output_format(&self) -> OutputFormat;

    /// Whether a credential is configured
    fn is_configured(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use futures::StreamExt;

    use super::*;
    use crate::stream::AudioStream;
    use crate::types::SynthesisMetadata;

    struct MockTextToSpeech {
        model: String,
        voice: String,
        configured: bool,
    }

    #[async_trait]
    impl TextToSpeech for MockTextToSpeech {
        async fn synthesize_stream(
            &self,
            text: &str,
            _voice: Option<&str>,
        ) -> Result<SpeechSynthesis, SpeechError> {
            if !self.configured {
                return Err(SpeechError::Configuration("missing API key".to_string()));
            }
            Ok(SpeechSynthesis {
                metadata: SynthesisMetadata {
                    character_count: u32::try_from(text.len()).ok(),
                    request_id: None,
                },
                format: OutputFormat::Mp3_44100_128,
                audio: AudioStream::from_chunks(vec![Bytes::from_static(&[0, 1, 2, 3])]),
            })
        }

        fn model_name(&self) -> &str {
            &self.model
        }

        fn default_voice(&self) -> &str {
            &self.voice
        }

        fn output_format(&self) -> OutputFormat {
            OutputFormat::Mp3_44100_128
        }

        fn is_configured(&self) -> bool {
            self.configured
        }
    }

    fn mock(configured: bool) -> MockTextToSpeech {
        MockTextToSpeech {
            model: "mock-tts".to_string(),
            voice: "mock-voice".to_string(),
            configured,
        }
    }

    #[tokio::test]
    async fn mock_tts_streams_audio() {
        let tts = mock(true);

        let mut synthesis = tts.synthesize_stream("Hello", None).await.unwrap();
        let chunk = synthesis.audio.next().await.unwrap().unwrap();

        assert_eq!(chunk.as_ref(), &[0, 1, 2, 3]);
        assert_eq!(synthesis.metadata.character_count, Some(5));
    }

    #[tokio::test]
    async fn unconfigured_mock_fails() {
        let tts = mock(false);
        let result = tts.synthesize_stream("Hello", None).await;
        assert!(matches!(result, Err(SpeechError::Configuration(_))));
    }

    #[test]
    fn mock_tts_default_voice() {
        let tts = mock(true);
        assert_eq!(tts.default_voice(), "mock-voice");
        assert_eq!(tts.model_name(), "mock-tts");
    }

    #[test]
    fn trait_is_object_safe() {
        let tts: Box<dyn TextToSpeech> = Box::new(mock(true));
        assert!(tts.is_configured());
        assert_eq!(tts.output_format(), OutputFormat::Mp3_44100_128);
    }
}
