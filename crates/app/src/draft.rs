//! Draft autosave
//!
//! Keeps the not-yet-exported input buffer on disk so unsent work survives a
//! restart. The buffer is persisted on a timer and at shutdown; a failed save
//! is logged and ignored so it can never block either path.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::debug;

/// How often the autosave task writes the buffer
pub const AUTOSAVE_INTERVAL: Duration = Duration::from_secs(5);

pub struct DraftStore {
    path: PathBuf,
    buffer: Arc<Mutex<String>>,
}

impl DraftStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            buffer: Arc::new(Mutex::new(String::new())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// One-time restore at startup. Returns the draft text only when a
    /// non-empty draft file exists, loading it into the buffer as well.
    pub fn restore(&self) -> Option<String> {
        let content = fs::read_to_string(&self.path).ok()?;
        if content.trim().is_empty() {
            return None;
        }
        *self.buffer.lock() = content.clone();
        Some(content)
    }

    /// Replace the in-memory buffer (what the autosave task persists)
    pub fn set_text(&self, text: &str) {
        *self.buffer.lock() = text.to_string();
    }

    /// Persist the buffer now. Failures are ignored by design.
    pub fn save_now(&self) {
        let content = self.buffer.lock().clone();
        if let Err(e) = fs::write(&self.path, content) {
            debug!("Draft save failed (ignored): {}", e);
        }
    }

    /// Spawn the periodic autosave task
    pub fn spawn_autosave(&self, interval: Duration) -> JoinHandle<()> {
        let path = self.path.clone();
        let buffer = Arc::clone(&self.buffer);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick fires immediately; skip it
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let content = buffer.lock().clone();
                if let Err(e) = fs::write(&path, content) {
                    debug!("Draft autosave failed (ignored): {}", e);
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn restore_returns_none_for_missing_or_blank_draft() {
        let dir = tempdir().unwrap();
        let store = DraftStore::new(dir.path().join("draft.txt"));
        assert!(store.restore().is_none());

        fs::write(store.path(), "   \n").unwrap();
        assert!(store.restore().is_none());
    }

    #[test]
    fn save_then_restore_round_trips() {
        let dir = tempdir().unwrap();
        let store = DraftStore::new(dir.path().join("draft.txt"));
        store.set_text("half-written note");
        store.save_now();

        let reopened = DraftStore::new(store.path());
        assert_eq!(reopened.restore().as_deref(), Some("half-written note"));
    }

    #[test]
    fn save_failure_is_silent() {
        let store = DraftStore::new("/nonexistent-dir/draft.txt");
        store.set_text("anything");
        // Must not panic
        store.save_now();
    }
}
