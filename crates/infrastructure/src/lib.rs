//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer over the ElevenLabs and
//! Gemini clients, and owns configuration loading and tracing setup.

pub mod adapters;
pub mod config;
pub mod telemetry;

pub use adapters::{ElevenLabsSpeechAdapter, GeminiInferenceAdapter};
pub use config::{AppConfig, Environment, ServerConfig};
pub use telemetry::{DEFAULT_LOG_FILTER, LogFormat, TelemetryError, init_tracing};
