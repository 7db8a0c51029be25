//! Speech request entity

use crate::errors::DomainError;

/// A request to synthesize speech from text
///
/// Constructed once per HTTP call and discarded afterwards. The text is
/// guaranteed to contain at least one non-whitespace character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechRequest {
    text: String,
    voice_id: Option<String>,
}

impl SpeechRequest {
    /// Create a new speech request
    ///
    /// A blank `voice_id` is treated the same as an absent one.
    pub fn new(text: impl Into<String>, voice_id: Option<String>) -> Result<Self, DomainError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(DomainError::validation("text must not be empty"));
        }

        let voice_id = voice_id
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        Ok(Self { text, voice_id })
    }

    /// Text to synthesize, as received
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Explicitly requested voice, if any
    #[must_use]
    pub fn voice_id(&self) -> Option<&str> {
        self.voice_id.as_deref()
    }

    /// Requested voice, or `default` when none was given
    #[must_use]
    pub fn voice_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.voice_id.as_deref().unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_keeps_text_verbatim() {
        let request = SpeechRequest::new("  Hello there ", None).unwrap();
        assert_eq!(request.text(), "  Hello there ");
    }

    #[test]
    fn empty_text_is_rejected() {
        assert!(SpeechRequest::new("", None).is_err());
    }

    #[test]
    fn whitespace_text_is_rejected() {
        let err = SpeechRequest::new(" \n\t", Some("voice".to_string())).unwrap_err();
        assert!(err.to_string().contains("text must not be empty"));
    }

    #[test]
    fn voice_id_is_optional() {
        let request = SpeechRequest::new("Hi", None).unwrap();
        assert!(request.voice_id().is_none());
        assert_eq!(request.voice_or("fallback-voice"), "fallback-voice");
    }

    #[test]
    fn explicit_voice_id_wins() {
        let request = SpeechRequest::new("Hi", Some("JBFqnCBsd6RMkjVDRZzb".to_string())).unwrap();
        assert_eq!(request.voice_id(), Some("JBFqnCBsd6RMkjVDRZzb"));
        assert_eq!(request.voice_or("fallback-voice"), "JBFqnCBsd6RMkjVDRZzb");
    }

    #[test]
    fn blank_voice_id_counts_as_absent() {
        let request = SpeechRequest::new("Hi", Some("   ".to_string())).unwrap();
        assert!(request.voice_id().is_none());
    }
}
