//! Core types for speech synthesis

use serde::{Deserialize, Serialize};

/// Settings for a single synthesis request.
///
/// Values are immutable once built; construct a new one whenever a control
/// changes. The UI layer is responsible for keeping rate and volume inside
/// its exposed bounds before handing settings to an engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TtsSettings {
    /// Speaking rate in approximate words per minute
    pub rate: u32,
    /// Volume in [0.0, 1.0]
    pub volume: f32,
    /// Engine voice identifier; `None` means the system default voice
    pub voice: Option<String>,
}

impl Default for TtsSettings {
    fn default() -> Self {
        Self {
            rate: 175,
            volume: 1.0,
            voice: None,
        }
    }
}

/// An available voice as reported by an engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceInfo {
    /// Engine-specific voice identifier
    pub id: String,
    /// Human-readable voice name
    pub name: String,
}
