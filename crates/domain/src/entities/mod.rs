//! Domain entities - Per-request values exchanged with the relay

mod speech_request;
mod tip;

pub use speech_request::SpeechRequest;
pub use tip::{TipAction, TipRequest, fallback_tip, format_amount};
