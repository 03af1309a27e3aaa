//! Job types and the controller that executes them

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use speaknotes_tts::{TtsError, TtsSettings};
use thiserror::Error;

use crate::history::HistoryError;
use crate::session::TextSource;

pub mod controller;

pub use controller::JobController;

/// Generates unique job IDs for logging and event correlation
static JOB_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

pub fn next_job_id() -> u64 {
    JOB_ID_COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// What a job does with the text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobMode {
    Preview,
    Export,
    Both,
}

impl JobMode {
    pub fn includes_preview(&self) -> bool {
        matches!(self, JobMode::Preview | JobMode::Both)
    }

    pub fn includes_export(&self) -> bool {
        matches!(self, JobMode::Export | JobMode::Both)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JobMode::Preview => "preview",
            JobMode::Export => "export",
            JobMode::Both => "both",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "preview" => Some(JobMode::Preview),
            "export" => Some(JobMode::Export),
            "both" => Some(JobMode::Both),
            _ => None,
        }
    }
}

/// One user-triggered synthesis operation. Ephemeral; projected into a
/// history entry on completion.
#[derive(Debug, Clone)]
pub struct JobRequest {
    pub text: String,
    pub settings: TtsSettings,
    pub mode: JobMode,
    pub source: TextSource,
}

/// Status messages marshaled from running jobs back to the caller's loop
#[derive(Debug, Clone)]
pub enum JobEvent {
    Status { job_id: u64, message: String },
    Progress { job_id: u64, index: usize, total: usize },
    Finished { job_id: u64, output: Option<PathBuf> },
    Failed { job_id: u64, error: String },
}

/// Outcome of a single job
#[derive(Debug, Clone)]
pub struct JobOutcome {
    /// The exported file, when the mode included an export step
    pub output: Option<PathBuf>,
}

/// Outcome of a bulk export run
#[derive(Debug, Clone)]
pub struct BulkOutcome {
    /// Chunk files written, in order
    pub written: Vec<PathBuf>,
}

#[derive(Error, Debug)]
pub enum JobError {
    #[error("no text supplied")]
    EmptyInput,

    #[error("bulk export needs text loaded from a file with at least two paragraphs")]
    BulkNotApplicable,

    #[error("no exported audio yet")]
    NoExportYet,

    #[error("another job is already running")]
    Busy,

    #[error("synthesis failed: {0}")]
    Synthesis(#[from] TtsError),

    #[error("failed to record history: {0}")]
    History(#[from] HistoryError),

    #[error("could not launch system command: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_parse_accepts_known_values() {
        assert_eq!(JobMode::parse(" Export "), Some(JobMode::Export));
        assert_eq!(JobMode::parse("both"), Some(JobMode::Both));
        assert_eq!(JobMode::parse("loud"), None);
    }

    #[test]
    fn mode_steps() {
        assert!(JobMode::Both.includes_preview());
        assert!(JobMode::Both.includes_export());
        assert!(!JobMode::Preview.includes_export());
        assert!(!JobMode::Export.includes_preview());
    }

    #[test]
    fn job_ids_are_unique_and_increasing() {
        let a = next_job_id();
        let b = next_job_id();
        assert!(b > a);
    }
}
