//! AI Speech - Streaming text-to-speech abstractions
//!
//! Provides the `TextToSpeech` port and an ElevenLabs implementation that
//! yields synthesized audio as a lazy, ordered stream of byte chunks.
//!
//! # Architecture
//!
//! This crate follows the ports & adapters pattern:
//! - `ports` module defines the trait (port)
//! - `providers` module contains concrete implementations (adapters)
//! - `stream` module holds the `AudioStream` producer handed to callers
//!
//! # Example
//!
//! ```ignore
//! use ai_speech::{ElevenLabsSpeechProvider, SpeechConfig, TextToSpeech};
//! use futures::StreamExt;
//!
//! let provider = ElevenLabsSpeechProvider::new(config)?;
//! let mut synthesis = provider.synthesize_stream("Hello, world!", None).await?;
//! while let Some(chunk) = synthesis.audio.next().await {
//!     sink.write_all(&chunk?).await?;
//! }
//! ```

pub mod config;
pub mod error;
pub mod ports;
pub mod providers;
pub mod stream;
pub mod types;

pub use config::{DEFAULT_VOICE_ID, SpeechConfig};
pub use error::SpeechError;
pub use ports::TextToSpeech;
pub use providers::elevenlabs::ElevenLabsSpeechProvider;
pub use stream::AudioStream;
pub use types::{OutputFormat, SpeechSynthesis, SynthesisMetadata};
