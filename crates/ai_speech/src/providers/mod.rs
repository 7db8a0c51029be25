//! Speech synthesis provider implementations
//!
//! Contains concrete implementations of the `TextToSpeech` trait.

pub mod elevenlabs;

pub use elevenlabs::ElevenLabsSpeechProvider;
