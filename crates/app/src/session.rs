//! Session settings resolution
//!
//! `SessionState` is the explicit home for what the original tool kept as
//! ambient UI fields: the selected preset, live rate/volume slider values,
//! the chosen voice name, and where the current text came from. Control
//! changes arrive as discriminated [`SessionEvent`]s, so applying a preset
//! (which pushes its values into the sliders) is distinguishable from a user
//! moving a slider (which demotes the selection to `custom`).

use std::path::PathBuf;

use speaknotes_tts::{TtsSettings, VoiceInfo};

use crate::config::ConfigSnapshot;
use crate::presets::{PresetTable, CUSTOM_PRESET, DEFAULT_PRESET};

/// Rate slider bounds, in words per minute
pub const RATE_MIN: u32 = 120;
pub const RATE_MAX: u32 = 260;

/// Where the current input text came from. Last writer wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextSource {
    Manual,
    File(PathBuf),
}

impl TextSource {
    pub fn label(&self) -> &'static str {
        match self {
            TextSource::Manual => "manual",
            TextSource::File(_) => "file",
        }
    }

    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            TextSource::Manual => None,
            TextSource::File(path) => Some(path),
        }
    }
}

/// A control change originating from direct user interaction
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// A named preset was selected; its rate/volume are pushed into the sliders
    PresetSelected(String),
    /// The rate slider moved
    RateChanged(u32),
    /// The volume slider moved
    VolumeChanged(f32),
    /// A voice was picked by display name; `None` selects the system default
    VoiceSelected(Option<String>),
    /// The text buffer was edited by hand
    TextEdited,
    /// The text buffer was replaced with a file's contents
    TextLoadedFromFile(PathBuf),
}

pub struct SessionState {
    presets: PresetTable,
    preset: String,
    rate: u32,
    volume: f32,
    voice: Option<String>,
    source: TextSource,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    pub fn new() -> Self {
        let presets = PresetTable::new();
        let seed = presets.get(DEFAULT_PRESET);
        Self {
            presets,
            preset: DEFAULT_PRESET.to_string(),
            rate: seed.rate,
            volume: seed.volume,
            voice: None,
            source: TextSource::Manual,
        }
    }

    /// Rebuild the session from the last persisted snapshot
    pub fn restore(snapshot: &ConfigSnapshot) -> Self {
        let mut state = Self::new();
        state.apply(SessionEvent::PresetSelected(snapshot.preset.clone()));
        if state.preset == CUSTOM_PRESET {
            // Custom has no baked-in values; the snapshot's sliders are them
            state.rate = snapshot.rate.clamp(RATE_MIN, RATE_MAX);
            state.volume = snapshot.volume.clamp(0.0, 1.0);
            state.presets.set_custom(state.rate, state.volume);
        }
        if !snapshot.voice.is_empty() {
            state.voice = Some(snapshot.voice.clone());
        }
        state
    }

    pub fn preset(&self) -> &str {
        &self.preset
    }

    pub fn rate(&self) -> u32 {
        self.rate
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn voice(&self) -> Option<&str> {
        self.voice.as_deref()
    }

    pub fn source(&self) -> &TextSource {
        &self.source
    }

    pub fn apply(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::PresetSelected(name) => {
                let name = if PresetTable::is_known(&name) {
                    name
                } else {
                    DEFAULT_PRESET.to_string()
                };
                let preset = self.presets.get(&name);
                self.preset = name;
                self.rate = preset.rate;
                self.volume = preset.volume;
            }
            SessionEvent::RateChanged(rate) => {
                self.rate = rate.clamp(RATE_MIN, RATE_MAX);
                self.demote_to_custom();
            }
            SessionEvent::VolumeChanged(volume) => {
                self.volume = volume.clamp(0.0, 1.0);
                self.demote_to_custom();
            }
            SessionEvent::VoiceSelected(voice) => {
                self.voice = voice;
            }
            SessionEvent::TextEdited => {
                self.source = TextSource::Manual;
            }
            SessionEvent::TextLoadedFromFile(path) => {
                self.source = TextSource::File(path);
            }
        }
    }

    fn demote_to_custom(&mut self) {
        self.preset = CUSTOM_PRESET.to_string();
        self.presets.set_custom(self.rate, self.volume);
    }

    /// Build effective settings from the live slider values.
    ///
    /// The selected voice name resolves to an engine identifier only when it
    /// appears in the enumerated list; anything else means system default.
    pub fn resolve(&self, voices: &[VoiceInfo]) -> TtsSettings {
        let voice = self
            .voice
            .as_ref()
            .and_then(|name| voices.iter().find(|v| &v.name == name))
            .map(|v| v.id.clone());
        TtsSettings {
            rate: self.rate,
            volume: self.volume,
            voice,
        }
    }

    /// Project the session into the persisted snapshot shape
    pub fn to_snapshot(&self, mode: &str) -> ConfigSnapshot {
        ConfigSnapshot {
            preset: self.preset.clone(),
            voice: self.voice.clone().unwrap_or_default(),
            mode: mode.to_string(),
            rate: self.rate,
            volume: self.volume,
        }
    }
}
