//! Text-to-speech abstraction layer for SpeakNotes
//!
//! This crate provides the foundational types and traits for speech synthesis:
//! per-request settings, voice enumeration, and the engine trait that concrete
//! backends implement.

pub mod engine;
pub mod error;
pub mod types;

pub use engine::TtsEngine;
pub use error::{TtsError, TtsResult};
pub use types::{TtsSettings, VoiceInfo};
