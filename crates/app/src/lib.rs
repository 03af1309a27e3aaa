//! SpeakNotes application library
//!
//! Preset and session settings resolution, text utilities, the persisted
//! history/config/draft stores, and the job controller that drives the TTS
//! engine.

pub mod config;
pub mod draft;
pub mod history;
pub mod jobs;
pub mod presets;
pub mod session;
pub mod text;
