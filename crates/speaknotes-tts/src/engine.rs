//! TTS engine abstraction

use std::path::Path;

use async_trait::async_trait;

use crate::error::TtsResult;
use crate::types::{TtsSettings, VoiceInfo};

/// Core TTS engine interface
///
/// Implementations wrap a concrete synthesis backend (the platform `say`
/// command, espeak, etc.). Both synthesis operations block until the backend
/// finishes; callers that need a responsive surface dispatch them from a task.
#[async_trait]
pub trait TtsEngine: Send + Sync {
    /// Get engine name/identifier
    fn name(&self) -> &str;

    /// File extension (without dot) of audio files this engine exports
    fn output_extension(&self) -> &str;

    /// Check if the engine's backend is available on this system
    async fn is_available(&self) -> bool;

    /// Speak text immediately; resolves when playback has finished
    async fn speak(&self, text: &str, settings: &TtsSettings) -> TtsResult<()>;

    /// Synthesize text into an audio file at `path`, creating parent
    /// directories as needed
    async fn synthesize_to_file(
        &self,
        text: &str,
        path: &Path,
        settings: &TtsSettings,
    ) -> TtsResult<()>;

    /// Enumerate available voices
    async fn list_voices(&self) -> TtsResult<Vec<VoiceInfo>>;
}
