//! Job controller: the one stateful orchestrator
//!
//! Resolves each request into engine calls, guards against concurrent jobs,
//! appends history on successful exports, and reports progress through an
//! event channel rather than touching the interactive surface directly.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Local;
use parking_lot::Mutex;
use speaknotes_tts::TtsEngine;
use tokio::process::Command;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::history::{HistoryEntry, HistoryStore};
use crate::jobs::{
    next_job_id, BulkOutcome, JobError, JobEvent, JobMode, JobOutcome, JobRequest,
};
use crate::session::TextSource;
use crate::text::{derive_file_stem, split_into_paragraphs, ChunkTag};

/// Minimum paragraph count for a bulk export to make sense
const BULK_MIN_CHUNKS: usize = 2;

/// RAII in-flight flag: acquired when a job starts, released on every exit
/// path, including panics and early returns.
struct JobGuard {
    busy: Arc<AtomicBool>,
}

impl JobGuard {
    fn acquire(busy: &Arc<AtomicBool>) -> Result<Self, JobError> {
        if busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(JobError::Busy);
        }
        Ok(Self {
            busy: Arc::clone(busy),
        })
    }
}

impl Drop for JobGuard {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::SeqCst);
    }
}

pub struct JobController {
    engine: Arc<dyn TtsEngine>,
    history: HistoryStore,
    output_dir: PathBuf,
    events: mpsc::UnboundedSender<JobEvent>,
    busy: Arc<AtomicBool>,
    last_export: Mutex<Option<PathBuf>>,
}

impl JobController {
    /// Build a controller and the receiving end of its event channel.
    ///
    /// The last successful export is re-seeded from history so "play latest"
    /// works across restarts, but only if the file still exists.
    pub fn new(
        engine: Arc<dyn TtsEngine>,
        history: HistoryStore,
        output_dir: impl Into<PathBuf>,
    ) -> (Self, mpsc::UnboundedReceiver<JobEvent>) {
        let (events, events_rx) = mpsc::unbounded_channel();
        let last_export = history.load().iter().rev().find_map(|entry| {
            let path = PathBuf::from(&entry.file);
            path.exists().then_some(path)
        });
        (
            Self {
                engine,
                history,
                output_dir: output_dir.into(),
                events,
                busy: Arc::new(AtomicBool::new(false)),
                last_export: Mutex::new(last_export),
            },
            events_rx,
        )
    }

    pub fn output_dir(&self) -> &PathBuf {
        &self.output_dir
    }

    pub fn last_export_path(&self) -> Option<PathBuf> {
        self.last_export.lock().clone()
    }

    fn emit(&self, event: JobEvent) {
        // The receiver may already be gone during shutdown
        let _ = self.events.send(event);
    }

    fn output_path(&self, text: &str, chunk: Option<ChunkTag>) -> Result<PathBuf, JobError> {
        std::fs::create_dir_all(&self.output_dir)?;
        let stem = derive_file_stem(text, Local::now(), chunk);
        Ok(self
            .output_dir
            .join(format!("{}.{}", stem, self.engine.output_extension())))
    }

    /// Run one preview/export/both job.
    ///
    /// Empty text is rejected before any side effect. Preview, when
    /// requested, completes before the export step begins; the result
    /// reflects the export outcome.
    pub async fn run(&self, request: JobRequest) -> Result<JobOutcome, JobError> {
        if request.text.trim().is_empty() {
            return Err(JobError::EmptyInput);
        }
        let _guard = JobGuard::acquire(&self.busy)?;
        let job_id = next_job_id();
        info!(job_id, mode = request.mode.as_str(), "Starting job");

        match self.execute(job_id, &request).await {
            Ok(outcome) => {
                self.emit(JobEvent::Finished {
                    job_id,
                    output: outcome.output.clone(),
                });
                Ok(outcome)
            }
            Err(e) => {
                warn!(job_id, "Job failed: {}", e);
                self.emit(JobEvent::Failed {
                    job_id,
                    error: e.to_string(),
                });
                Err(e)
            }
        }
    }

    async fn execute(&self, job_id: u64, request: &JobRequest) -> Result<JobOutcome, JobError> {
        let text = request.text.trim();

        if request.mode.includes_preview() {
            self.emit(JobEvent::Status {
                job_id,
                message: "Previewing speech...".to_string(),
            });
            self.engine.speak(text, &request.settings).await?;
        }

        let mut output = None;
        if request.mode.includes_export() {
            self.emit(JobEvent::Status {
                job_id,
                message: "Exporting audio file...".to_string(),
            });
            let path = self.output_path(text, None)?;
            self.engine
                .synthesize_to_file(text, &path, &request.settings)
                .await?;
            self.history.append(HistoryEntry::new(
                &path,
                &request.settings,
                request.mode.as_str(),
                &request.source,
                text,
            ))?;
            *self.last_export.lock() = Some(path.clone());
            debug!(job_id, path = %path.display(), "Export written and logged");
            output = Some(path);
        }

        Ok(JobOutcome { output })
    }

    /// Export every paragraph of file-sourced text to its own audio file.
    ///
    /// Chunks run strictly in order; a failure aborts the remainder but
    /// leaves already-written chunks and their history entries intact.
    pub async fn run_bulk(&self, request: JobRequest) -> Result<BulkOutcome, JobError> {
        if !matches!(request.source, TextSource::File(_)) {
            return Err(JobError::BulkNotApplicable);
        }
        let chunks = split_into_paragraphs(&request.text);
        if chunks.len() < BULK_MIN_CHUNKS {
            return Err(JobError::BulkNotApplicable);
        }

        let _guard = JobGuard::acquire(&self.busy)?;
        let job_id = next_job_id();
        let total = chunks.len();
        info!(job_id, total, "Starting bulk export");

        let mut written = Vec::new();
        for (i, chunk) in chunks.iter().enumerate() {
            let tag = ChunkTag {
                index: i + 1,
                total,
            };
            self.emit(JobEvent::Progress {
                job_id,
                index: tag.index,
                total,
            });

            let result: Result<PathBuf, JobError> = async {
                let path = self.output_path(chunk, Some(tag))?;
                self.engine
                    .synthesize_to_file(chunk, &path, &request.settings)
                    .await?;
                self.history.append(HistoryEntry::new(
                    &path,
                    &request.settings,
                    JobMode::Export.as_str(),
                    &request.source,
                    chunk,
                ))?;
                Ok(path)
            }
            .await;

            match result {
                Ok(path) => {
                    *self.last_export.lock() = Some(path.clone());
                    written.push(path);
                }
                Err(e) => {
                    warn!(job_id, chunk = tag.index, "Bulk export aborted: {}", e);
                    self.emit(JobEvent::Failed {
                        job_id,
                        error: format!("chunk {} of {}: {}", tag.index, total, e),
                    });
                    return Err(e);
                }
            }
        }

        self.emit(JobEvent::Finished {
            job_id,
            output: written.last().cloned(),
        });
        Ok(BulkOutcome { written })
    }

    fn surviving_export(&self) -> Result<PathBuf, JobError> {
        let path = self.last_export.lock().clone().ok_or(JobError::NoExportYet)?;
        if !path.exists() {
            return Err(JobError::NoExportYet);
        }
        Ok(path)
    }

    /// Play the most recent export with the system audio player
    pub async fn play_latest(&self) -> Result<PathBuf, JobError> {
        let path = self.surviving_export()?;
        let program = if cfg!(target_os = "macos") {
            "afplay"
        } else {
            "xdg-open"
        };
        debug!("Playing {} with {}", path.display(), program);
        Command::new(program).arg(&path).status().await?;
        Ok(path)
    }

    /// Reveal the most recent export's folder in the system file browser
    pub async fn reveal_latest(&self) -> Result<PathBuf, JobError> {
        let path = self.surviving_export()?;
        let folder = path
            .parent()
            .map(PathBuf::from)
            .unwrap_or_else(|| self.output_dir.clone());
        let program = if cfg!(target_os = "macos") {
            "open"
        } else if cfg!(target_os = "windows") {
            "explorer"
        } else {
            "xdg-open"
        };
        Command::new(program).arg(&folder).spawn()?;
        Ok(folder)
    }
}
