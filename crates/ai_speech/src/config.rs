//! Configuration for speech synthesis

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::types::OutputFormat;

/// Voice used when a request does not name one
pub const DEFAULT_VOICE_ID: &str = "21m00Tcm4TlvDq8ikWAM";

/// Configuration for the ElevenLabs speech service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// ElevenLabs API key (sensitive - uses SecretString)
    #[serde(default, skip_serializing)]
    pub api_key: Option<SecretString>,

    /// API base URL (for custom endpoints and tests)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Synthesis model
    #[serde(default = "default_model_id")]
    pub model_id: String,

    /// Voice used when a request does not specify one
    #[serde(default = "default_voice")]
    pub default_voice: String,

    /// Encoding requested from the provider
    #[serde(default)]
    pub output_format: OutputFormat,

    /// Connection timeout in milliseconds
    ///
    /// Only connection setup is bounded; a long synthesis keeps streaming.
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    /// Maximum text length in characters
    #[serde(default = "default_max_text_chars")]
    pub max_text_chars: usize,
}

fn default_base_url() -> String {
    "https://api.elevenlabs.io/v1".to_string()
}

fn default_model_id() -> String {
    "eleven_multilingual_v2".to_string()
}

fn default_voice() -> String {
    DEFAULT_VOICE_ID.to_string()
}

const fn default_connect_timeout_ms() -> u64 {
    10_000 // 10 seconds
}

const fn default_max_text_chars() -> usize {
    5_000
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            model_id: default_model_id(),
            default_voice: default_voice(),
            output_format: OutputFormat::default(),
            connect_timeout_ms: default_connect_timeout_ms(),
            max_text_chars: default_max_text_chars(),
        }
    }
}

impl SpeechConfig {
    /// Set the API key
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::from(key.into()));
        self
    }

    /// Get the API key as a string reference (for API calls)
    #[must_use]
    pub fn api_key_str(&self) -> Option<&str> {
        self.api_key
            .as_ref()
            .map(ExposeSecret::expose_secret)
            .filter(|key| !key.trim().is_empty())
    }

    /// Whether a non-blank API key is present
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.api_key_str().is_some()
    }

    /// Validate the configuration
    ///
    /// A missing API key is not an error here: the provider is still built
    /// and reports the problem per request.
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.trim().is_empty() {
            return Err("Speech base URL must not be empty".to_string());
        }

        if self.model_id.trim().is_empty() {
            return Err("Speech model id must not be empty".to_string());
        }

        if self.default_voice.trim().is_empty() {
            return Err("Default voice must not be empty".to_string());
        }

        if self.connect_timeout_ms == 0 {
            return Err("Connect timeout must be greater than 0".to_string());
        }

        if self.max_text_chars == 0 {
            return Err("Max text length must be greater than 0".to_string());
        }

        Ok(())
    }
}
