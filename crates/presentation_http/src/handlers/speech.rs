//! Text-to-speech relay handler

use application::ports::SpeechStream;
use axum::{
    body::Body,
    extract::State,
    http::{
        HeaderName, HeaderValue,
        header::{CACHE_CONTROL, CONTENT_TYPE},
    },
    response::Response,
};
use domain::SpeechRequest;
use futures::TryStreamExt;
use serde::Deserialize;
use tracing::{error, info, instrument, warn};
use validator::Validate;

use crate::{error::ApiError, middleware::ValidatedJson, state::AppState};

/// Characters the provider billed for the synthesis
pub const X_CHARACTER_COUNT: HeaderName = HeaderName::from_static("x-character-count");

/// Provider-side identifier of the synthesis
pub const X_UPSTREAM_REQUEST_ID: HeaderName = HeaderName::from_static("x-upstream-request-id");

const FALLBACK_CONTENT_TYPE: &str = "audio/mpeg";

/// Speech request body
#[derive(Debug, Deserialize, Validate)]
pub struct TtsRequest {
    /// Text to synthesize
    #[validate(length(min = 1, message = "must not be empty"))]
    pub text: String,
    /// Voice to use; the configured default when absent
    #[serde(default)]
    pub voice_id: Option<String>,
}

/// Relay synthesized speech for the given text
///
/// Responds only after the first audio chunk arrived, so failures before
/// that point are a 500 with `{detail}`. A failure later aborts the body.
#[instrument(skip(state, body), fields(text_len = body.text.len(), voice = ?body.voice_id))]
pub async fn text_to_speech(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<TtsRequest>,
) -> Result<Response, ApiError> {
    let request = SpeechRequest::new(body.text, body.voice_id)?;

    let SpeechStream {
        content_type,
        metadata,
        audio,
    } = state.speech_service.relay(&request).await.map_err(|e| {
        error!(error = %e, "Speech relay failed");
        ApiError::from(e)
    })?;

    info!(
        character_count = ?metadata.character_count,
        upstream_request_id = ?metadata.upstream_request_id,
        "Streaming synthesized audio"
    );

    let audio = audio.inspect_err(|e| warn!(error = %e, "Audio stream aborted mid-response"));
    let mut response = Response::new(Body::from_stream(audio));

    let headers = response.headers_mut();
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_str(&content_type)
            .unwrap_or_else(|_| HeaderValue::from_static(FALLBACK_CONTENT_TYPE)),
    );
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
    if let Some(count) = metadata.character_count {
        headers.insert(X_CHARACTER_COUNT, HeaderValue::from(count));
    }
    if let Some(id) = metadata
        .upstream_request_id
        .as_deref()
        .and_then(|id| HeaderValue::from_str(id).ok())
    {
        headers.insert(X_UPSTREAM_REQUEST_ID, id);
    }

    Ok(response)
}
