//! Types for speech synthesis

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::stream::AudioStream;

/// Output encodings accepted by the provider's `output_format` parameter
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// MP3, 22.05kHz, 32kbps
    Mp3_22050_32,
    /// MP3, 44.1kHz, 64kbps
    Mp3_44100_64,
    /// MP3, 44.1kHz, 96kbps
    Mp3_44100_96,
    /// MP3, 44.1kHz, 128kbps
    #[default]
    Mp3_44100_128,
    /// MP3, 44.1kHz, 192kbps
    Mp3_44100_192,
    /// Raw 16-bit PCM, 16kHz
    Pcm_16000,
    /// Raw 16-bit PCM, 22.05kHz
    Pcm_22050,
    /// Raw 16-bit PCM, 24kHz
    Pcm_24000,
    /// Raw 16-bit PCM, 44.1kHz
    Pcm_44100,
    /// μ-law, 8kHz
    Ulaw_8000,
}

impl OutputFormat {
    /// Value of the `output_format` query parameter
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Mp3_22050_32 => "mp3_22050_32",
            Self::Mp3_44100_64 => "mp3_44100_64",
            Self::Mp3_44100_96 => "mp3_44100_96",
            Self::Mp3_44100_128 => "mp3_44100_128",
            Self::Mp3_44100_192 => "mp3_44100_192",
            Self::Pcm_16000 => "pcm_16000",
            Self::Pcm_22050 => "pcm_22050",
            Self::Pcm_24000 => "pcm_24000",
            Self::Pcm_44100 => "pcm_44100",
            Self::Ulaw_8000 => "ulaw_8000",
        }
    }

    /// MIME type of audio in this format
    #[must_use]
    pub const fn mime_type(&self) -> &'static str {
        match self {
            Self::Mp3_22050_32
            | Self::Mp3_44100_64
            | Self::Mp3_44100_96
            | Self::Mp3_44100_128
            | Self::Mp3_44100_192 => "audio/mpeg",
            Self::Pcm_16000 | Self::Pcm_22050 | Self::Pcm_24000 | Self::Pcm_44100 => "audio/pcm",
            Self::Ulaw_8000 => "audio/basic",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata the provider reports alongside the audio
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SynthesisMetadata {
    /// Characters billed for this synthesis (`x-character-count`)
    pub character_count: Option<u32>,
    /// Provider-side request identifier (`request-id`)
    pub request_id: Option<String>,
}

/// An in-flight synthesis: metadata plus the lazily produced audio
#[derive(Debug)]
pub struct SpeechSynthesis {
    /// Provider metadata, known before the first audio byte
    pub metadata: SynthesisMetadata,
    /// Encoding of the audio bytes
    pub format: OutputFormat,
    /// Audio chunks in upstream order
    pub audio: AudioStream,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_format_is_mp3_44100_128() {
        assert_eq!(OutputFormat::default(), OutputFormat::Mp3_44100_128);
    }

    #[test]
    fn query_values_match_provider_names() {
        assert_eq!(OutputFormat::Mp3_44100_128.as_str(), "mp3_44100_128");
        assert_eq!(OutputFormat::Pcm_16000.as_str(), "pcm_16000");
        assert_eq!(OutputFormat::Ulaw_8000.to_string(), "ulaw_8000");
    }

    #[test]
    fn serde_names_match_query_values() {
        for format in [
            OutputFormat::Mp3_22050_32,
            OutputFormat::Mp3_44100_192,
            OutputFormat::Pcm_24000,
            OutputFormat::Ulaw_8000,
        ] {
            let json = serde_json::to_string(&format).unwrap();
            assert_eq!(json, format!("\"{}\"", format.as_str()));
        }
    }

    #[test]
    fn mp3_formats_are_audio_mpeg() {
        assert_eq!(OutputFormat::Mp3_44100_128.mime_type(), "audio/mpeg");
        assert_eq!(OutputFormat::Mp3_22050_32.mime_type(), "audio/mpeg");
        assert_eq!(OutputFormat::Pcm_44100.mime_type(), "audio/pcm");
    }

    #[test]
    fn metadata_default_is_empty() {
        let metadata = SynthesisMetadata::default();
        assert!(metadata.character_count.is_none());
        assert!(metadata.request_id.is_none());
    }
}
