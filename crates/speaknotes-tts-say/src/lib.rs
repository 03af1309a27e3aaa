//! Speech-command TTS engine for SpeakNotes
//!
//! Drives the platform speech command as a subprocess: `say` on macOS, with
//! `espeak-ng`/`espeak` as fallbacks elsewhere. Exported audio is AIFF under
//! `say` and WAV under espeak.

use std::path::Path;

use async_trait::async_trait;
use regex::Regex;
use speaknotes_tts::{TtsEngine, TtsError, TtsResult, TtsSettings, VoiceInfo};
use tokio::process::Command;
use tracing::debug;


/// Which speech command backs the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeechCommand {
    Say,
    EspeakNg,
    Espeak,
}

impl SpeechCommand {
    pub fn program(&self) -> &'static str {
        match self {
            SpeechCommand::Say => "say",
            SpeechCommand::EspeakNg => "espeak-ng",
            SpeechCommand::Espeak => "espeak",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            SpeechCommand::Say => "aiff",
            SpeechCommand::EspeakNg | SpeechCommand::Espeak => "wav",
        }
    }

    /// Arguments that make the command print its voice list and exit
    fn voice_list_args(&self) -> &'static [&'static str] {
        match self {
            SpeechCommand::Say => &["-v", "?"],
            SpeechCommand::EspeakNg | SpeechCommand::Espeak => &["--voices"],
        }
    }
}

pub struct SayEngine {
    command: SpeechCommand,
}

impl SayEngine {
    /// Build an engine around a specific speech command without probing for it
    pub fn with_command(command: SpeechCommand) -> Self {
        Self { command }
    }

    /// Probe for an available speech command, in preference order
    pub async fn detect() -> TtsResult<Self> {
        for command in [
            SpeechCommand::Say,
            SpeechCommand::EspeakNg,
            SpeechCommand::Espeak,
        ] {
            if Self::command_available(command).await {
                debug!("Using speech command: {}", command.program());
                return Ok(Self { command });
            }
        }
        Err(TtsError::EngineNotAvailable(
            "no speech command found; install macOS `say` or espeak-ng".to_string(),
        ))
    }

    async fn command_available(command: SpeechCommand) -> bool {
        Command::new(command.program())
            .args(command.voice_list_args())
            .output()
            .await
            .map(|out| out.status.success())
            .unwrap_or(false)
    }

    fn speak_args(&self, text: &str, settings: &TtsSettings) -> Vec<String> {
        let mut args = Vec::new();
        match self.command {
            SpeechCommand::Say => {
                // `say` has no volume flag; playback volume follows the system
                if let Some(voice) = &settings.voice {
                    args.push("-v".to_string());
                    args.push(voice.clone());
                }
                args.push("-r".to_string());
                args.push(settings.rate.to_string());
            }
            SpeechCommand::EspeakNg | SpeechCommand::Espeak => {
                if let Some(voice) = &settings.voice {
                    args.push("-v".to_string());
                    args.push(voice.clone());
                }
                args.push("-s".to_string());
                args.push(settings.rate.to_string());
                // espeak amplitude range is 0..=200
                let amplitude = (settings.volume.clamp(0.0, 1.0) * 200.0) as u32;
                args.push("-a".to_string());
                args.push(amplitude.to_string());
            }
        }
        args.push(text.to_string());
        args
    }

    fn export_args(&self, text: &str, path: &Path, settings: &TtsSettings) -> Vec<String> {
        let output_flag = match self.command {
            SpeechCommand::Say => "-o",
            SpeechCommand::EspeakNg | SpeechCommand::Espeak => "-w",
        };
        let mut args = vec![output_flag.to_string(), path.display().to_string()];
        args.extend(self.speak_args(text, settings));
        args
    }

    async fn run_command(&self, args: &[String]) -> TtsResult<()> {
        debug!("Running {} {:?}", self.command.program(), args);
        let output = Command::new(self.command.program())
            .args(args)
            .output()
            .await?;
        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(TtsError::SynthesisFailed(format!(
                "{} exited with {}: {}",
                self.command.program(),
                output.status,
                stderr.trim()
            )))
        }
    }
}

#[async_trait]
impl TtsEngine for SayEngine {
    fn name(&self) -> &str {
        self.command.program()
    }

    fn output_extension(&self) -> &str {
        self.command.extension()
    }

    async fn is_available(&self) -> bool {
        Self::command_available(self.command).await
    }

    async fn speak(&self, text: &str, settings: &TtsSettings) -> TtsResult<()> {
        if text.trim().is_empty() {
            return Err(TtsError::InvalidInput("empty text".to_string()));
        }
        self.run_command(&self.speak_args(text, settings)).await
    }

    async fn synthesize_to_file(
        &self,
        text: &str,
        path: &Path,
        settings: &TtsSettings,
    ) -> TtsResult<()> {
        if text.trim().is_empty() {
            return Err(TtsError::InvalidInput("empty text".to_string()));
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        self.run_command(&self.export_args(text, path, settings))
            .await
    }

    async fn list_voices(&self) -> TtsResult<Vec<VoiceInfo>> {
        let output = Command::new(self.command.program())
            .args(self.command.voice_list_args())
            .output()
            .await?;
        let listing = String::from_utf8_lossy(&output.stdout);
        let voices = match self.command {
            SpeechCommand::Say => parse_say_voices(&listing),
            SpeechCommand::EspeakNg | SpeechCommand::Espeak => parse_espeak_voices(&listing),
        };
        debug!("Loaded {} voices from {}", voices.len(), self.command.program());
        Ok(voices)
    }
}

/// Parse `say -v ?` output.
///
/// Each line looks like: `Alex                en_US    # Most people ...`
/// The voice name doubles as its identifier.
pub fn parse_say_voices(listing: &str) -> Vec<VoiceInfo> {
    let line_re = Regex::new(r"^(\S.*?)\s{2,}[a-zA-Z]{2}[_-][A-Za-z0-9-]+\s+#").unwrap();
    let mut voices = Vec::new();
    for line in listing.lines() {
        if let Some(captures) = line_re.captures(line) {
            let name = captures.get(1).map_or("", |m| m.as_str()).to_string();
            voices.push(VoiceInfo {
                id: name.clone(),
                name,
            });
        }
    }
    voices
}

/// Parse `espeak --voices` output.
///
/// Format: `Pty Language Age/Gender VoiceName File Other`
/// Example: ` 5  en             M  en                 (en 2)`
pub fn parse_espeak_voices(listing: &str) -> Vec<VoiceInfo> {
    let line_re = Regex::new(r"^\s*(\d+)\s+([\w-]+)\s+([MF+-]?)\s+([\w\-_]+)\s+").unwrap();
    let mut voices = Vec::new();
    for line in listing.lines().skip(1) {
        if let Some(captures) = line_re.captures(line) {
            let language = captures.get(2).map_or("unknown", |m| m.as_str());
            let voice_id = captures.get(4).map_or("unknown", |m| m.as_str()).to_string();
            voices.push(VoiceInfo {
                id: voice_id.clone(),
                name: format!("{} ({})", language, voice_id),
            });
        }
    }
    voices
}
