//! Speech synthesis errors

use thiserror::Error;

/// Errors that can occur during speech synthesis
#[derive(Debug, Error)]
pub enum SpeechError {
    /// Failed to connect to speech service
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request to speech service failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Synthesis was rejected or produced no audio
    #[error("Synthesis failed: {0}")]
    SynthesisFailed(String),

    /// The audio stream broke after synthesis started
    #[error("Audio stream interrupted: {0}")]
    Stream(String),

    /// Timeout while connecting to the speech service
    #[error("Speech service timeout after {0}ms")]
    Timeout(u64),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimited,

    /// The provider rejected the credential
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Voice not found
    #[error("Voice not found: {0}")]
    VoiceNotFound(String),

    /// Invalid or missing configuration
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl SpeechError {
    /// Map a transport error, using `timeout_ms` for timeouts
    pub(crate) fn from_transport(err: &reqwest::Error, timeout_ms: u64) -> Self {
        if err.is_timeout() {
            Self::Timeout(timeout_ms)
        } else if err.is_connect() {
            Self::ConnectionFailed(err.to_string())
        } else {
            Self::RequestFailed(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_failed_error_message() {
        let err = SpeechError::ConnectionFailed("refused".to_string());
        assert_eq!(err.to_string(), "Connection failed: refused");
    }

    #[test]
    fn synthesis_failed_error_message() {
        let err = SpeechError::SynthesisFailed("HTTP 500: boom".to_string());
        assert_eq!(err.to_string(), "Synthesis failed: HTTP 500: boom");
    }

    #[test]
    fn stream_error_message() {
        let err = SpeechError::Stream("connection reset".to_string());
        assert_eq!(err.to_string(), "Audio stream interrupted: connection reset");
    }

    #[test]
    fn timeout_error_message() {
        let err = SpeechError::Timeout(10_000);
        assert_eq!(err.to_string(), "Speech service timeout after 10000ms");
    }

    #[test]
    fn rate_limited_error_message() {
        assert_eq!(SpeechError::RateLimited.to_string(), "Rate limit exceeded");
    }

    #[test]
    fn unauthorized_error_message() {
        let err = SpeechError::Unauthorized("invalid api key".to_string());
        assert_eq!(err.to_string(), "Unauthorized: invalid api key");
    }

    #[test]
    fn voice_not_found_error_message() {
        let err = SpeechError::VoiceNotFound("nope".to_string());
        assert_eq!(err.to_string(), "Voice not found: nope");
    }

    #[test]
    fn configuration_error_message() {
        let err = SpeechError::Configuration("missing API key".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing API key");
    }
}
