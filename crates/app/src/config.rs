//! Last-used-preferences persistence
//!
//! A single JSON object, fully overwritten on every save. Missing or corrupt
//! files load as the default snapshot; this is deliberate, never an error.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to write config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode config: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Last known UI state. A singleton, not a history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigSnapshot {
    pub preset: String,
    /// Selected voice display name; empty string means system default
    pub voice: String,
    pub mode: String,
    pub rate: u32,
    pub volume: f32,
}

impl Default for ConfigSnapshot {
    fn default() -> Self {
        Self {
            preset: "study".to_string(),
            voice: String::new(),
            mode: "export".to_string(),
            rate: 175,
            volume: 1.0,
        }
    }
}

pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the snapshot, falling back to defaults on any read/parse failure
    pub fn load(&self) -> ConfigSnapshot {
        match fs::read_to_string(&self.path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                debug!("Config file unparsable, using defaults: {}", e);
                ConfigSnapshot::default()
            }),
            Err(_) => ConfigSnapshot::default(),
        }
    }

    /// Overwrite the stored snapshot. Last writer wins, no merging.
    pub fn save(&self, snapshot: &ConfigSnapshot) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(snapshot)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}
