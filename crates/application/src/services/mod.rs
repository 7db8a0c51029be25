//! Application services - Use case implementations

mod speech_relay_service;
mod tip_service;

pub use speech_relay_service::SpeechRelayService;
pub use tip_service::{DegradationReason, Tip, TipOutcome, TipService, TipSource, build_prompt};
