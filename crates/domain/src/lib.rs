//! Domain layer for the allowance coach relay
//!
//! Contains the request entities exchanged with the relay, the rule-based
//! fallback tip renderer, and domain errors. No I/O happens here.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::DomainError;
