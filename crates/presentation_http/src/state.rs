//! Application state shared across handlers

use std::sync::Arc;

use application::{
    SpeechRelayService, TipService,
    ports::{InferencePort, SpeechPort},
};
use infrastructure::AppConfig;

/// Shared application state
///
/// Holds only immutable, reference-counted services; cloning is cheap.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Streams synthesized speech
    pub speech_service: Arc<SpeechRelayService>,
    /// Produces tips with fallback
    pub tip_service: Arc<TipService>,
    /// Application configuration
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Build the state from port implementations
    pub fn new(
        speech: Arc<dyn SpeechPort>,
        inference: Arc<dyn InferencePort>,
        config: AppConfig,
    ) -> Self {
        Self {
            speech_service: Arc::new(SpeechRelayService::new(speech)),
            tip_service: Arc::new(TipService::new(inference)),
            config: Arc::new(config),
        }
    }
}
