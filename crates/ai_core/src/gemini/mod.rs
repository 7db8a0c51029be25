//! Google Gemini integration
//!
//! Talks to the Generative Language API `generateContent` endpoint.

mod client;
mod wire;

pub use client::GeminiInferenceEngine;
