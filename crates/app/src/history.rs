//! Append-only synthesis history, persisted as a JSON array
//!
//! Loading never fails: a missing or unparsable file reads as an empty
//! history. Appending rewrites the whole array; a write failure is surfaced
//! because losing the record of an export is a correctness issue.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use serde::{Deserialize, Serialize};
use speaknotes_tts::TtsSettings;
use thiserror::Error;
use tracing::debug;

use crate::session::TextSource;
use crate::text::preview_snippet;

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("failed to write history file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode history: {0}")]
    Encode(#[from] serde_json::Error),
}

/// One completed synthesis event. Never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub date: String,
    pub file: String,
    pub rate: u32,
    pub volume: f32,
    pub voice: String,
    pub mode: String,
    pub source: String,
    pub source_path: String,
    pub text_preview: String,
}

impl HistoryEntry {
    pub fn new(
        file: &Path,
        settings: &TtsSettings,
        mode: &str,
        source: &TextSource,
        text: &str,
    ) -> Self {
        let absolute = std::path::absolute(file).unwrap_or_else(|_| file.to_path_buf());
        Self {
            date: Local::now().format("%Y-%m-%dT%H:%M:%S").to_string(),
            file: absolute.display().to_string(),
            rate: settings.rate,
            volume: settings.volume,
            voice: settings
                .voice
                .clone()
                .unwrap_or_else(|| "default".to_string()),
            mode: mode.to_string(),
            source: source.label().to_string(),
            source_path: source
                .path()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            text_preview: preview_snippet(text),
        }
    }
}

pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the full ordered history. Missing or corrupt files read as empty.
    pub fn load(&self) -> Vec<HistoryEntry> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                debug!("History file unparsable, treating as empty: {}", e);
                Vec::new()
            }),
            Err(_) => Vec::new(),
        }
    }

    /// Append one entry, rewriting the whole array
    pub fn append(&self, entry: HistoryEntry) -> Result<(), HistoryError> {
        let mut entries = self.load();
        entries.push(entry);
        let json = serde_json::to_string_pretty(&entries)?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    /// Rewrite relative `file` paths to absolute ones, resolved against
    /// `app_root`, keeping only rewrites whose target actually exists.
    /// Returns the number of entries updated.
    pub fn migrate_paths(&self, app_root: &Path) -> Result<usize, HistoryError> {
        let mut entries = self.load();
        let mut changed = 0;
        for entry in &mut entries {
            if entry.file.is_empty() {
                continue;
            }
            let path = PathBuf::from(&entry.file);
            if path.is_absolute() {
                continue;
            }
            let candidate = app_root.join(&path);
            if candidate.exists() {
                entry.file = candidate.display().to_string();
                changed += 1;
            }
        }
        if changed > 0 {
            let json = serde_json::to_string_pretty(&entries)?;
            fs::write(&self.path, json)?;
        }
        Ok(changed)
    }
}
