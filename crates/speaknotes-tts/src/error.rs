//! Error types for TTS functionality

use thiserror::Error;

/// TTS error types
#[derive(Error, Debug)]
pub enum TtsError {
    /// No synthesis backend is installed or reachable
    #[error("TTS engine not available: {0}")]
    EngineNotAvailable(String),

    /// Voice not found or not supported
    #[error("Voice not found: {0}")]
    VoiceNotFound(String),

    /// The backend reported a synthesis failure
    #[error("Synthesis failed: {0}")]
    SynthesisFailed(String),

    /// Invalid text input
    #[error("Invalid text input: {0}")]
    InvalidInput(String),

    /// IO error (file operations, process spawning, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for TTS operations
pub type TtsResult<T> = Result<T, TtsError>;
