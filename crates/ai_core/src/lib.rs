//! AI Core - Text generation engine
//!
//! Provides the `InferenceEngine` port and a Google Gemini implementation
//! that turns a single prompt into a short generated reply.

pub mod config;
pub mod error;
pub mod gemini;
pub mod ports;

pub use config::InferenceConfig;
pub use error::InferenceError;
pub use gemini::GeminiInferenceEngine;
pub use ports::{InferenceEngine, InferenceRequest, InferenceResponse, TokenUsage};
